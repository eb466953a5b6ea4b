//! Configuration helpers shared by the relay and the browser
//!
//! Resolution follows the same priority everywhere:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Missing config files are never fatal: callers get `None` and fall back to
//! defaults.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Application directory name under the platform config/data directories
pub const APP_DIR_NAME: &str = "spinshelf";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Return the first variable in `names` that `lookup` resolves to a
/// non-blank value.
///
/// `lookup` is usually [`env_lookup`]; tests pass a closure over a map so
/// they do not have to mutate the process environment.
pub fn first_defined<F>(names: &[&str], lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    names.iter().find_map(|name| {
        lookup(name).filter(|value| !value.trim().is_empty())
    })
}

/// Process-environment lookup for use with [`first_defined`]
pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Default path of a module's TOML config file
///
/// `~/.config/spinshelf/<module>.toml` on Linux, the platform equivalent
/// elsewhere, `./<module>.toml` when no config directory is known.
pub fn default_config_path(module_name: &str) -> PathBuf {
    let file_name = format!("{}.toml", module_name);
    dirs::config_dir()
        .map(|d| d.join(APP_DIR_NAME).join(&file_name))
        .unwrap_or_else(|| PathBuf::from(file_name))
}

/// Default directory for locally persisted data
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("./spinshelf_data"))
}

/// Read and parse a TOML file
///
/// Returns `Ok(None)` if the file does not exist. Parse errors are reported
/// as [`Error::Config`].
pub fn read_toml_file<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        debug!("Config file not found: {}", path.display());
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let parsed = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))?;
    Ok(Some(parsed))
}

/// Write `contents` to `path` atomically
///
/// Writes to `<path>.tmp` first, then renames over the target, so readers
/// never observe a half-written file. Missing parent directories are
/// created.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp_path = PathBuf::from(tmp);

    std::fs::write(&tmp_path, contents)?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        // Leave no stray temp file behind
        if let Err(cleanup) = std::fs::remove_file(&tmp_path) {
            warn!("Failed to remove temp file {}: {}", tmp_path.display(), cleanup);
        }
        return Err(e.into());
    }

    Ok(())
}
