//! Configuration management for earthrep.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::Coordinates;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "earthrep";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "storage.db";

/// Default durable storage key for the record list.
pub const DEFAULT_STORAGE_KEY: &str = "earthquakes";

/// Default tile layer URL template.
pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png";

/// Default tile layer attribution.
pub const DEFAULT_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// Highest zoom level accepted by the map collaborator.
const MAX_ZOOM_LEVEL: u8 = 22;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `EARTHREP_`, sections split by `__`)
/// 2. TOML config file at `~/.config/earthrep/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Durable storage configuration.
    pub storage: StorageConfig,
    /// Map collaborator configuration.
    pub map: MapConfig,
    /// Report form configuration.
    pub form: FormConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/earthrep/storage.db`
    pub database_path: Option<PathBuf>,
    /// Key the serialized record list is stored under.
    pub key: String,
}

/// Map-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Zoom level used for the initial view and when focusing a record.
    pub zoom_level: u8,
    /// Duration of the pan animation when focusing a record.
    pub pan_duration_ms: u64,
    /// Tile layer URL template.
    pub tile_url: String,
    /// Tile layer attribution HTML.
    pub attribution: String,
    /// Fixed position reported by the headless geolocation provider.
    /// When unset, geolocation is unavailable.
    pub home: Option<[f64; 2]>,
}

/// Form-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Delay before a hidden form becomes displayable again.
    pub restore_delay_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Resolved at runtime
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom_level: 13,
            pan_duration_ms: 1000,
            tile_url: DEFAULT_TILE_URL.to_string(),
            attribution: DEFAULT_ATTRIBUTION.to_string(),
            home: None,
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            restore_delay_ms: 1000,
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("EARTHREP_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "storage key must not be empty".to_string(),
            });
        }

        if self.map.zoom_level > MAX_ZOOM_LEVEL {
            return Err(Error::ConfigValidation {
                message: format!(
                    "zoom_level ({}) must be at most {MAX_ZOOM_LEVEL}",
                    self.map.zoom_level
                ),
            });
        }

        if self.map.pan_duration_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "pan_duration_ms must be greater than 0".to_string(),
            });
        }

        for placeholder in ["{z}", "{x}", "{y}"] {
            if !self.map.tile_url.contains(placeholder) {
                return Err(Error::ConfigValidation {
                    message: format!("tile_url is missing the {placeholder} placeholder"),
                });
            }
        }

        if let Some([lat, lng]) = self.map.home {
            if Coordinates::try_new(lat, lng).is_none() {
                return Err(Error::ConfigValidation {
                    message: format!("home position [{lat}, {lng}] is not a finite location"),
                });
            }
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the configured home position, if any.
    #[must_use]
    pub fn home(&self) -> Option<Coordinates> {
        self.map
            .home
            .and_then(|[lat, lng]| Coordinates::try_new(lat, lng))
    }

    /// Get the pan animation duration.
    #[must_use]
    pub fn pan_duration(&self) -> Duration {
        Duration::from_millis(self.map.pan_duration_ms)
    }

    /// Get the form display restore delay.
    #[must_use]
    pub fn restore_delay(&self) -> Duration {
        Duration::from_millis(self.form.restore_delay_ms)
    }
}
