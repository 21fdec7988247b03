//! Error types for earthrep.
//!
//! Infrastructure failures (storage, configuration, I/O) live here. Form
//! rejections are domain outcomes and have their own types in [`crate::form`].

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for earthrep operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Collaborator Errors ===
    /// The geolocation collaborator could not supply a position.
    #[error("could not get your position: {reason}")]
    GeolocationUnavailable {
        /// Why the position is unavailable.
        reason: String,
    },

    /// A map operation was requested before the map was created.
    #[error("map is not initialized")]
    MapNotInitialized,

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for earthrep operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a geolocation unavailable error.
    #[must_use]
    pub fn geolocation_unavailable(reason: impl Into<String>) -> Self {
        Self::GeolocationUnavailable {
            reason: reason.into(),
        }
    }

    /// Check if this error means no position could be obtained.
    #[must_use]
    pub fn is_geolocation_unavailable(&self) -> bool {
        matches!(self, Self::GeolocationUnavailable { .. })
    }
}
