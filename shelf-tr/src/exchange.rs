//! Client-credentials exchange against the identity service
//!
//! One POST per call: HTTP Basic auth with `id:secret`, form body
//! `grant_type=client_credentials`. No caching, no retries, no timeout.

use crate::error::{RelayError, RelayResult};
use serde_json::Value;

/// Upstream reply, kept as-is for forwarding
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: Value,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Perform the exchange
///
/// Any HTTP status from the identity service is a successful call from the
/// relay's point of view. Only transport failures and non-JSON bodies are
/// errors.
pub async fn exchange_client_credentials(
    http_client: &reqwest::Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
) -> RelayResult<UpstreamReply> {
    tracing::debug!(url = %token_url, "Requesting client-credentials token");

    let response = http_client
        .post(token_url)
        .basic_auth(client_id, Some(client_secret))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await
        .map_err(|e| RelayError::Exchange(e.to_string()))?;

    let status = response.status().as_u16();

    let body: Value = response
        .json()
        .await
        .map_err(|e| RelayError::Exchange(format!("upstream returned unreadable body: {}", e)))?;

    Ok(UpstreamReply { status, body })
}
