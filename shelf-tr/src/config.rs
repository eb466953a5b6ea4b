//! Relay configuration and client credential resolution
//!
//! Credentials are read from the process environment on every token request,
//! so rotating them does not need a restart. Two naming schemes are accepted;
//! for each value the first non-blank variable wins:
//!
//! | value         | primary                 | fallback                     |
//! |---------------|-------------------------|------------------------------|
//! | client id     | `SPOTIFY_CLIENT_ID`     | `VITE_SPOTIFY_CLIENT_ID`     |
//! | client secret | `SPOTIFY_CLIENT_SECRET` | `VITE_SPOTIFY_CLIENT_SECRET` |

use shelf_common::api::TokenConfigReport;
use shelf_common::config::{env_lookup, first_defined};
use std::fmt;
use std::path::PathBuf;

pub const CLIENT_ID_VARS: [&str; 2] = ["SPOTIFY_CLIENT_ID", "VITE_SPOTIFY_CLIENT_ID"];
pub const CLIENT_SECRET_VARS: [&str; 2] = ["SPOTIFY_CLIENT_SECRET", "VITE_SPOTIFY_CLIENT_SECRET"];

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "dist";
pub const DEFAULT_INDEX_FILE: &str = "index.html";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Static configuration fixed at startup
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Identity endpoint performing the client-credentials exchange
    pub token_url: String,
    /// Directory of prebuilt assets
    pub static_dir: PathBuf,
    /// File served for `/`
    pub index_file: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            token_url: DEFAULT_TOKEN_URL.to_string(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            index_file: DEFAULT_INDEX_FILE.to_string(),
        }
    }
}

impl RelayConfig {
    pub fn index_path(&self) -> PathBuf {
        self.static_dir.join(&self.index_file)
    }
}

/// OAuth client id/secret pair, either half possibly missing
///
/// `Debug` never prints the secret.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ClientCredentials {
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl ClientCredentials {
    /// Blank values are treated as missing
    pub fn new(client_id: Option<String>, client_secret: Option<String>) -> Self {
        let keep = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            client_id: keep(client_id),
            client_secret: keep(client_secret),
        }
    }

    /// Resolve both halves through `lookup` using the accepted variable names
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            client_id: first_defined(&CLIENT_ID_VARS, &lookup),
            client_secret: first_defined(&CLIENT_SECRET_VARS, &lookup),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    /// Both halves, if both are configured
    pub fn pair(&self) -> Option<(&str, &str)> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => Some((id.as_str(), secret.as_str())),
            _ => None,
        }
    }

    /// Names of the primary variables that are unset, for error messages
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.client_id.is_none() {
            missing.push(CLIENT_ID_VARS[0]);
        }
        if self.client_secret.is_none() {
            missing.push(CLIENT_SECRET_VARS[0]);
        }
        missing
    }

    /// Presence/length report, safe to expose
    pub fn report(&self) -> TokenConfigReport {
        let len = |v: &Option<String>| v.as_deref().map(str::len).unwrap_or(0);
        TokenConfigReport {
            client_id_present: self.client_id.is_some(),
            client_secret_present: self.client_secret.is_some(),
            client_id_length: len(&self.client_id),
            client_secret_length: len(&self.client_secret),
        }
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("ClientCredentials")
            .field("client_id", &mask(&self.client_id))
            .field("client_secret", &mask(&self.client_secret))
            .finish()
    }
}

/// Where the relay gets credentials from on each request
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// Read the process environment every time
    Environment,
    /// Fixed pair, used by tests and embedders
    Fixed(ClientCredentials),
}

impl CredentialSource {
    pub fn resolve(&self) -> ClientCredentials {
        match self {
            CredentialSource::Environment => ClientCredentials::from_env(),
            CredentialSource::Fixed(creds) => creds.clone(),
        }
    }
}
