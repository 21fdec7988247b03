//! `earthrep` - Report earthquakes at a map location
//!
//! This library provides the report model, form validation, the persisted
//! record store, and the event-driven app that ties them to a map, a
//! geolocation source and a notifier.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod form;
pub mod geolocation;
pub mod logging;
pub mod map;
pub mod notify;
pub mod persist;
pub mod record;
pub mod render;
pub mod storage;
pub mod store;

pub use app::{App, Submission};
pub use config::Config;
pub use error::{Error, Result};
pub use form::{FormInput, SubmitError, ValidationError};
pub use geolocation::{FixedPosition, GeolocationProvider};
pub use logging::init_logging;
pub use map::MapView;
pub use notify::Notifier;
pub use record::{Coordinates, Record, RecordId};
pub use storage::{KeyValueStorage, MemoryStorage, SqliteStorage, StorageStats};
pub use store::RecordStore;
