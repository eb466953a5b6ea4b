//! Configuration for shelf-cb
//!
//! Priority: command line / environment (handled by clap) → TOML file →
//! compiled defaults. A missing or broken TOML file never stops startup.

use serde::{Deserialize, Serialize};
use shelf_common::config::{default_config_path, default_data_dir, read_toml_file, LoggingConfig};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::services::catalog_client::{DEFAULT_LIMIT, DEFAULT_MARKET, SPOTIFY_API_BASE_URL};

pub const MODULE_NAME: &str = "shelf-cb";
pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:3000";

/// Browser configuration (TOML layout)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Base URL of the token relay
    #[serde(default = "default_relay_url")]
    pub relay_url: String,

    /// Base URL of the catalog API
    #[serde(default = "default_catalog_base_url")]
    pub catalog_base_url: String,

    /// Market passed to catalog queries
    #[serde(default = "default_market")]
    pub market: String,

    /// Page size for catalog queries
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,

    /// Directory holding the stored collection (platform default if unset)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_relay_url() -> String {
    DEFAULT_RELAY_URL.to_string()
}

fn default_catalog_base_url() -> String {
    SPOTIFY_API_BASE_URL.to_string()
}

fn default_market() -> String {
    DEFAULT_MARKET.to_string()
}

fn default_search_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            relay_url: default_relay_url(),
            catalog_base_url: default_catalog_base_url(),
            market: default_market(),
            search_limit: default_search_limit(),
            data_dir: None,
            logging: LoggingConfig::default(),
        }
    }
}

/// Values given on the command line or via environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub relay_url: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Where a loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    File,
    /// No file at the path
    Defaults,
    /// File present but unreadable; defaults used
    Invalid(String),
}

impl ConfigOrigin {
    pub fn log(&self, path: &Path) {
        match self {
            ConfigOrigin::File => info!("Loaded configuration from {}", path.display()),
            ConfigOrigin::Defaults => info!("No config file at {}, using defaults", path.display()),
            ConfigOrigin::Invalid(reason) => warn!("Ignoring unreadable config file: {}", reason),
        }
    }
}

impl BrowserConfig {
    /// Default TOML location, e.g. `~/.config/spinshelf/shelf-cb.toml`
    pub fn default_path() -> PathBuf {
        default_config_path(MODULE_NAME)
    }

    /// Load from `path`, falling back to defaults on any problem
    ///
    /// Nothing is logged here so the file can be read before the tracing
    /// subscriber exists; report the returned origin once it does.
    pub fn load(path: &Path) -> (Self, ConfigOrigin) {
        match read_toml_file::<BrowserConfig>(path) {
            Ok(Some(config)) => (config, ConfigOrigin::File),
            Ok(None) => (Self::default(), ConfigOrigin::Defaults),
            Err(e) => (Self::default(), ConfigOrigin::Invalid(e.to_string())),
        }
    }

    pub fn apply_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(relay_url) = overrides.relay_url {
            self.relay_url = relay_url;
        }
        if let Some(data_dir) = overrides.data_dir {
            self.data_dir = Some(data_dir);
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        self
    }

    /// Directory holding the stored collection
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }
}
