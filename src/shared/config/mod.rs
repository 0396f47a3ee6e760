//! Application configuration module
//!
//! Configuration is read from an optional TOML file, then overridden by
//! environment variables:
//!
//! - `HEARTHLIST_COLLECTION` - active collection name
//! - `HEARTHLIST_SAMPLE_URL` - base URL of the sample-data endpoint
//! - `HEARTHLIST_FALLBACK_PATH` - SQLite file for the local fallback store

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Default collection name
pub const DEFAULT_COLLECTION: &str = "shopping";
/// Default order field
pub const DEFAULT_ORDER_FIELD: &str = "position";
/// Default sample-data endpoint
pub const DEFAULT_SAMPLE_URL: &str = "http://127.0.0.1:3000";
/// Default sample server port
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Collection the session opens by default
    pub collection: String,
    /// Document field that defines list order
    pub order_field: String,
    /// Commit a normalising batch when a snapshot has duplicate positions
    pub repair_collisions: bool,
    /// Sample-data endpoint
    pub sample_url: String,
    /// Local fallback database file
    pub fallback_path: PathBuf,
    /// Port the sample server binds to
    pub server_port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            order_field: DEFAULT_ORDER_FIELD.to_string(),
            repair_collisions: true,
            sample_url: DEFAULT_SAMPLE_URL.to_string(),
            fallback_path: default_fallback_path(),
            server_port: DEFAULT_SERVER_PORT,
        }
    }
}

/// `<data dir>/hearthlist/fallback.sqlite`, or the working directory when no
/// data dir is known for this platform
fn default_fallback_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("hearthlist"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fallback.sqlite")
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Parse a TOML document; missing keys take their defaults
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: AppConfig =
            toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file (if it exists) and apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = if path.exists() {
            let source = std::fs::read_to_string(path)
                .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
            Self::from_toml_str(&source)?
        } else {
            tracing::debug!("[Config] {} not found, using defaults", path.display());
            Self::default()
        };
        let config = config.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `HEARTHLIST_*` environment overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(collection) = std::env::var("HEARTHLIST_COLLECTION") {
            self.collection = collection;
        }
        if let Ok(url) = std::env::var("HEARTHLIST_SAMPLE_URL") {
            self.sample_url = url;
        }
        if let Ok(path) = std::env::var("HEARTHLIST_FALLBACK_PATH") {
            self.fallback_path = PathBuf::from(path);
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collection.trim().is_empty() {
            return Err(ConfigError::MissingValue("collection"));
        }
        if self.order_field.trim().is_empty() {
            return Err(ConfigError::MissingValue("order_field"));
        }
        reqwest::Url::parse(&self.sample_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", self.sample_url, e)))?;
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    collection: Option<String>,
    order_field: Option<String>,
    repair_collisions: Option<bool>,
    sample_url: Option<String>,
    fallback_path: Option<PathBuf>,
    server_port: Option<u16>,
}

impl AppConfigBuilder {
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.collection = Some(name.into());
        self
    }

    pub fn order_field(mut self, field: impl Into<String>) -> Self {
        self.order_field = Some(field.into());
        self
    }

    pub fn repair_collisions(mut self, enabled: bool) -> Self {
        self.repair_collisions = Some(enabled);
        self
    }

    /// Set the sample-data endpoint URL
    pub fn sample_url(mut self, url: impl Into<String>) -> Self {
        self.sample_url = Some(url.into());
        self
    }

    pub fn fallback_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.fallback_path = Some(path.into());
        self
    }

    pub fn server_port(mut self, port: u16) -> Self {
        self.server_port = Some(port);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            collection: self.collection.unwrap_or(defaults.collection),
            order_field: self.order_field.unwrap_or(defaults.order_field),
            repair_collisions: self.repair_collisions.unwrap_or(defaults.repair_collisions),
            sample_url: self.sample_url.unwrap_or(defaults.sample_url),
            fallback_path: self.fallback_path.unwrap_or(defaults.fallback_path),
            server_port: self.server_port.unwrap_or(defaults.server_port),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(String),
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}
