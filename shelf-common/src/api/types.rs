//! Shared API request/response types
//!
//! The relay produces these and the browser consumes them, so both sides
//! agree on field names without duplicating structs.

use serde::{Deserialize, Serialize};

/// Successful `GET /api/token` body
///
/// Mirrors the identity service's client-credentials response, which the
/// relay forwards verbatim.
///
/// # Examples
///
/// ```
/// use shelf_common::api::types::TokenResponse;
///
/// let body = r#"{"access_token":"abc","token_type":"Bearer","expires_in":3600}"#;
/// let token: TokenResponse = serde_json::from_str(body).unwrap();
/// assert_eq!(token.expires_in, 3600);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime in seconds
    pub expires_in: u64,
}

/// Error body used by the relay for failures it produces itself
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorBody {
    /// Machine-readable code, e.g. `missing_client_credentials`
    pub error: String,
    /// Human-readable description (never contains credential values)
    pub message: String,
}

/// `GET /api/token-config` diagnostic body
///
/// Reports presence and length of the configured credentials only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenConfigReport {
    pub client_id_present: bool,
    pub client_secret_present: bool,
    pub client_id_length: usize,
    pub client_secret_length: usize,
}

/// `GET /health` body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}
