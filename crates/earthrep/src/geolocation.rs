//! The geolocation collaborator.

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Error, Result};
use crate::record::Coordinates;

/// Source of the user's current position.
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    /// Resolve the current position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GeolocationUnavailable`] if no position can be
    /// obtained.
    async fn current_position(&self) -> Result<Coordinates>;
}

/// Provider that always reports the same position, or none at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPosition {
    position: Option<Coordinates>,
}

impl FixedPosition {
    /// Always report `position`.
    #[must_use]
    pub fn new(position: Coordinates) -> Self {
        Self {
            position: Some(position),
        }
    }

    /// Never report a position.
    #[must_use]
    pub fn unavailable() -> Self {
        Self { position: None }
    }

    /// Report `position` if there is one.
    #[must_use]
    pub fn from_option(position: Option<Coordinates>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl GeolocationProvider for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates> {
        let position = self
            .position
            .ok_or_else(|| Error::geolocation_unavailable("no position configured"))?;
        debug!("https://www.google.com/maps/@{},{}", position.lat, position.lng);
        Ok(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_position() {
        let provider = FixedPosition::new(Coordinates::new(45.0, 15.0));
        assert_eq!(
            provider.current_position().await.unwrap(),
            Coordinates::new(45.0, 15.0)
        );
    }

    #[tokio::test]
    async fn test_unavailable() {
        let err = FixedPosition::unavailable()
            .current_position()
            .await
            .unwrap_err();
        assert!(err.is_geolocation_unavailable());
    }

    #[tokio::test]
    async fn test_from_option() {
        assert!(FixedPosition::from_option(None)
            .current_position()
            .await
            .is_err());
        assert!(FixedPosition::from_option(Some(Coordinates::new(1.0, 2.0)))
            .current_position()
            .await
            .is_ok());
    }
}
