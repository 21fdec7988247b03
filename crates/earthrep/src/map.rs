//! The map collaborator.
//!
//! The interactive map widget is external; [`MapView`] is the part of its
//! API the app drives. [`RecordingMap`] is a headless implementation that
//! keeps the resulting view state and a log of every call.

use std::time::Duration;

use tracing::trace;

use crate::error::{Error, Result};
use crate::record::Coordinates;

/// Popup display options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupOptions {
    /// Maximum popup width in pixels.
    pub max_width: u32,
    /// Minimum popup width in pixels.
    pub min_width: u32,
    /// Close when another popup opens.
    pub auto_close: bool,
    /// Close when the map is clicked.
    pub close_on_click: bool,
    /// CSS class for the popup.
    pub class_name: String,
}

impl Default for PopupOptions {
    fn default() -> Self {
        Self {
            max_width: 250,
            min_width: 100,
            auto_close: false,
            close_on_click: false,
            class_name: "earthquake-popup".to_string(),
        }
    }
}

/// A marker popup: content plus options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    /// Popup content.
    pub content: String,
    /// Display options.
    pub options: PopupOptions,
}

/// How to move the view when recentering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimateOptions {
    /// Animate the move.
    pub animate: bool,
    /// Duration of the pan animation.
    pub pan_duration: Duration,
}

impl AnimateOptions {
    /// Animated pan taking `pan_duration`.
    #[must_use]
    pub fn pan(pan_duration: Duration) -> Self {
        Self {
            animate: true,
            pan_duration,
        }
    }
}

/// Operations the app needs from an interactive map.
///
/// Map clicks flow the other way: the host delivers them as
/// [`crate::events::AppEvent::MapClick`].
pub trait MapView {
    /// Create the map centered on `center`.
    ///
    /// # Errors
    ///
    /// Returns an error if the map cannot be created.
    fn create_map(&mut self, center: Coordinates, zoom: u8) -> Result<()>;

    /// Add a tile layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the map has not been created.
    fn add_tile_layer(&mut self, url_template: &str, attribution: &str) -> Result<()>;

    /// Place a marker with an open popup.
    ///
    /// # Errors
    ///
    /// Returns an error if the map has not been created.
    fn add_marker_with_popup(&mut self, coords: Coordinates, popup: &Popup) -> Result<()>;

    /// Move the view to `coords` at `zoom`.
    ///
    /// # Errors
    ///
    /// Returns an error if the map has not been created.
    fn recenter(&mut self, coords: Coordinates, zoom: u8, options: AnimateOptions) -> Result<()>;
}

/// A call made on a [`RecordingMap`].
#[derive(Debug, Clone, PartialEq)]
pub enum MapCall {
    /// `create_map`
    Create {
        /// Initial center.
        center: Coordinates,
        /// Initial zoom.
        zoom: u8,
    },
    /// `add_tile_layer`
    TileLayer {
        /// URL template.
        url_template: String,
    },
    /// `add_marker_with_popup`
    Marker {
        /// Marker position.
        coords: Coordinates,
        /// Popup content.
        content: String,
    },
    /// `recenter`
    Recenter {
        /// New center.
        coords: Coordinates,
        /// New zoom.
        zoom: u8,
        /// Animation used.
        options: AnimateOptions,
    },
}

/// A placed marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Marker position.
    pub coords: Coordinates,
    /// Its popup.
    pub popup: Popup,
}

/// Current state of a headless map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapState {
    /// View center.
    pub center: Coordinates,
    /// View zoom.
    pub zoom: u8,
    /// Tile layer URL template, if one was added.
    pub tile_url: Option<String>,
    /// Tile layer attribution, if one was added.
    pub attribution: Option<String>,
    /// Placed markers in insertion order.
    pub markers: Vec<Marker>,
}

/// Headless map that records what was asked of it.
#[derive(Debug, Clone, Default)]
pub struct RecordingMap {
    state: Option<MapState>,
    calls: Vec<MapCall>,
}

impl RecordingMap {
    /// Create a map that has not been initialized yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current view, once the map has been created.
    #[must_use]
    pub fn state(&self) -> Option<&MapState> {
        self.state.as_ref()
    }

    /// Every call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> &[MapCall] {
        &self.calls
    }

    fn state_mut(&mut self) -> Result<&mut MapState> {
        self.state.as_mut().ok_or(Error::MapNotInitialized)
    }
}

impl MapView for RecordingMap {
    fn create_map(&mut self, center: Coordinates, zoom: u8) -> Result<()> {
        trace!(%center, zoom, "create_map");
        self.state = Some(MapState {
            center,
            zoom,
            tile_url: None,
            attribution: None,
            markers: Vec::new(),
        });
        self.calls.push(MapCall::Create { center, zoom });
        Ok(())
    }

    fn add_tile_layer(&mut self, url_template: &str, attribution: &str) -> Result<()> {
        let state = self.state_mut()?;
        state.tile_url = Some(url_template.to_string());
        state.attribution = Some(attribution.to_string());
        self.calls.push(MapCall::TileLayer {
            url_template: url_template.to_string(),
        });
        Ok(())
    }

    fn add_marker_with_popup(&mut self, coords: Coordinates, popup: &Popup) -> Result<()> {
        trace!(%coords, "add_marker_with_popup");
        self.state_mut()?.markers.push(Marker {
            coords,
            popup: popup.clone(),
        });
        self.calls.push(MapCall::Marker {
            coords,
            content: popup.content.clone(),
        });
        Ok(())
    }

    fn recenter(&mut self, coords: Coordinates, zoom: u8, options: AnimateOptions) -> Result<()> {
        trace!(%coords, zoom, "recenter");
        let state = self.state_mut()?;
        state.center = coords;
        state.zoom = zoom;
        self.calls.push(MapCall::Recenter {
            coords,
            zoom,
            options,
        });
        Ok(())
    }
}
