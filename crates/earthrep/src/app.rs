//! The application context.
//!
//! [`App`] holds all mutable state of a session (store, form, rendered list,
//! map readiness) together with its collaborators. Host callbacks become
//! method calls on it; the event loop in [`crate::events`] owns it and makes
//! those calls one at a time.

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::form::{Form, FormInput, SubmitError};
use crate::geolocation::GeolocationProvider;
use crate::map::{AnimateOptions, MapView};
use crate::notify::Notifier;
use crate::persist;
use crate::record::{Coordinates, Record, RecordId};
use crate::render::{self, ClickTarget, ListEntry};
use crate::storage::KeyValueStorage;
use crate::store::RecordStore;

/// Message shown when no position can be obtained.
pub const POSITION_UNAVAILABLE_MESSAGE: &str = "Could not get your position";

/// Outcome of a form submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// A record was created, stored and persisted.
    Accepted(Record),
    /// Nothing changed; the user was notified.
    Rejected(SubmitError),
}

impl Submission {
    /// Whether the submission created a record.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// Session state plus collaborators.
#[derive(Debug)]
pub struct App<S, M, N> {
    config: Config,
    storage: S,
    map: M,
    notifier: N,
    store: RecordStore,
    form: Form,
    list: Vec<ListEntry>,
    map_ready: bool,
}

impl<S, M, N> App<S, M, N>
where
    S: KeyValueStorage,
    M: MapView,
    N: Notifier,
{
    /// Start a session: load stored records and render their list entries.
    ///
    /// The map is not ready until a position arrives (see
    /// [`App::locate_user`]).
    ///
    /// # Errors
    ///
    /// Returns an error if durable storage cannot be read.
    pub fn boot(config: Config, storage: S, map: M, notifier: N) -> Result<Self> {
        let store = persist::load(&storage, &config.storage.key)?;
        let list = store.iter().rev().map(ListEntry::for_record).collect();
        info!("Loaded {} stored reports", store.len());

        Ok(Self {
            config,
            storage,
            map,
            notifier,
            store,
            form: Form::new(),
            list,
            map_ready: false,
        })
    }

    /// Ask the geolocation collaborator for a position and set up the map.
    ///
    /// # Errors
    ///
    /// Returns an error if the map collaborator fails.
    pub async fn locate_user<G>(&mut self, provider: &G) -> Result<bool>
    where
        G: GeolocationProvider + ?Sized,
    {
        match provider.current_position().await {
            Ok(position) => {
                self.load_map(position)?;
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "Geolocation unavailable; map not loaded");
                self.notifier.alert(POSITION_UNAVAILABLE_MESSAGE);
                Ok(false)
            }
        }
    }

    /// Create the map at `position` and place markers for stored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the map collaborator fails.
    pub fn load_map(&mut self, position: Coordinates) -> Result<()> {
        self.map.create_map(position, self.config.map.zoom_level)?;
        self.map
            .add_tile_layer(&self.config.map.tile_url, &self.config.map.attribution)?;
        self.map_ready = true;

        for record in &self.store {
            self.map
                .add_marker_with_popup(record.coords(), &render::popup(record))?;
        }
        debug!("Map loaded at {} with {} markers", position, self.store.len());
        Ok(())
    }

    /// Handle a click on the map: open the form for that location.
    ///
    /// Ignored while the map isn't loaded.
    pub fn map_click(&mut self, coords: Coordinates) {
        if !self.map_ready {
            debug!("Ignoring map click at {} before the map is loaded", coords);
            return;
        }
        self.form.open(coords);
        debug!("Form opened for {}", coords);
    }

    /// Replace the form's field values.
    pub fn fill_form(&mut self, input: FormInput) {
        self.form.fill(input);
    }

    /// Submit the form.
    ///
    /// Rejections notify the user and change nothing. On acceptance the
    /// store with the new record is persisted first; only then is the record
    /// kept, rendered, and the form cleared and hidden.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting or rendering on the map fails. A
    /// persist failure leaves the store, list and form as they were.
    pub fn submit(&mut self) -> Result<Submission> {
        let (coords, values) = match self.form.check() {
            Ok(checked) => checked,
            Err(rejection) => {
                warn!(reason = %rejection, "Report rejected");
                self.notifier.alert(&rejection.user_message());
                return Ok(Submission::Rejected(rejection));
            }
        };

        let record = Record::new(
            coords,
            values.strength,
            values.duration_secs,
            values.minutes_ago,
            values.material_damage,
        );
        let mut next = self.store.clone();
        next.push(record.clone());
        persist::save(&mut self.storage, &self.config.storage.key, &next)?;
        self.store = next;
        info!(id = %record.id(), "Recorded {}", record.label());

        self.list.insert(0, ListEntry::for_record(&record));
        self.form.close_after_submit();

        if self.map_ready {
            self.map
                .add_marker_with_popup(record.coords(), &render::popup(&record))?;
        }
        Ok(Submission::Accepted(record))
    }

    /// Fill the form and submit it in one step, as a form submit event does.
    ///
    /// # Errors
    ///
    /// See [`App::submit`].
    pub fn submit_input(&mut self, input: FormInput) -> Result<Submission> {
        self.fill_form(input);
        self.submit()
    }

    /// Make the hidden form displayable again.
    pub fn restore_form_display(&mut self) {
        self.form.restore_display();
    }

    /// Focus the map on the record whose list entry was clicked.
    ///
    /// Returns the focused record's id, or `None` when the click wasn't on
    /// an entry, the entry matches no record, or the map isn't loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the map collaborator fails.
    pub fn locate_from_list_click(&mut self, target: &ClickTarget) -> Result<Option<RecordId>> {
        let Some(id) = target.entry_id() else {
            return Ok(None);
        };
        let Some(record) = self.store.find(&id) else {
            debug!(%id, "No report for clicked entry");
            return Ok(None);
        };
        if !self.map_ready {
            return Ok(None);
        }

        let coords = record.coords();
        self.map.recenter(
            coords,
            self.config.map.zoom_level,
            AnimateOptions::pan(self.config.pan_duration()),
        )?;
        debug!(%id, "Map focused on {}", coords);
        Ok(Some(id))
    }

    /// Discard every stored report and start over with an empty session.
    ///
    /// The map has to be loaded again afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if durable storage cannot be written.
    pub fn reset(&mut self) -> Result<()> {
        persist::clear(&mut self.storage, &self.config.storage.key)?;
        self.store = RecordStore::new();
        self.list.clear();
        self.form = Form::new();
        self.map_ready = false;
        info!("All reports discarded");
        Ok(())
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Records of the session.
    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// The report form.
    #[must_use]
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Rendered list entries, newest first.
    #[must_use]
    pub fn list(&self) -> &[ListEntry] {
        &self.list
    }

    /// Whether the map has been loaded.
    #[must_use]
    pub fn is_map_ready(&self) -> bool {
        self.map_ready
    }

    /// Durable storage.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Map collaborator.
    #[must_use]
    pub fn map(&self) -> &M {
        &self.map
    }

    /// Notifier.
    #[must_use]
    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}
