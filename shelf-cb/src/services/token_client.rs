//! Bearer token acquisition from the relay
//!
//! The browser never sees client credentials: it asks the relay's
//! `/api/token` and keeps the returned bearer token together with the time
//! it was obtained, so expiry can be checked before each search.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Tokens this close to expiry are treated as expired, capped at half the
/// token's lifetime
const EXPIRY_MARGIN_SECS: i64 = 30;

/// Token client errors
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Relay answered, but without an `access_token`
    #[error("Token endpoint returned unexpected response ({status}): {body}")]
    UnexpectedResponse { status: u16, body: String },

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Bearer token with optional known expiry
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    access_token: String,
    token_type: String,
    expires_at: Option<DateTime<Utc>>,
    refresh_at: Option<DateTime<Utc>>,
}

impl Token {
    /// `expires_in` is the lifetime in seconds counted from `obtained_at`;
    /// `None` means the relay did not say.
    pub fn new(
        access_token: impl Into<String>,
        token_type: impl Into<String>,
        expires_in: Option<u64>,
        obtained_at: DateTime<Utc>,
    ) -> Self {
        let lifetime = expires_in.and_then(|secs| i64::try_from(secs).ok());
        let expires_at = lifetime.map(|secs| obtained_at + Duration::seconds(secs));
        let refresh_at = lifetime
            .map(|secs| obtained_at + Duration::seconds(secs - EXPIRY_MARGIN_SECS.min(secs / 2)));
        Self {
            access_token: access_token.into(),
            token_type: token_type.into(),
            expires_at,
            refresh_at,
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// True once the token is inside its refresh margin
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.refresh_at.is_some_and(|at| now >= at)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Anything that can hand out a bearer token
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch_token(&self) -> Result<Token, TokenError>;
}

/// Token source backed by the relay's `GET /api/token`
pub struct RelayTokenClient {
    http_client: reqwest::Client,
    token_url: String,
}

impl RelayTokenClient {
    /// `relay_url` is the relay's base URL, e.g. `http://127.0.0.1:3000`
    pub fn new(relay_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), relay_url)
    }

    pub fn with_client(http_client: reqwest::Client, relay_url: &str) -> Self {
        Self {
            http_client,
            token_url: format!("{}/api/token", relay_url.trim_end_matches('/')),
        }
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }
}

#[async_trait]
impl TokenSource for RelayTokenClient {
    async fn fetch_token(&self) -> Result<Token, TokenError> {
        tracing::debug!(url = %self.token_url, "Requesting token from relay");

        let response = self
            .http_client
            .get(&self.token_url)
            .send()
            .await
            .map_err(|e| TokenError::NetworkError(e.to_string()))?;

        let status = response.status().as_u16();
        let body: Value = response
            .json()
            .await
            .map_err(|e| TokenError::ParseError(e.to_string()))?;

        let token = token_from_body(&body, Utc::now()).ok_or_else(|| {
            TokenError::UnexpectedResponse {
                status,
                body: body.to_string(),
            }
        })?;

        tracing::info!(expires_at = ?token.expires_at(), "Obtained bearer token from relay");
        Ok(token)
    }
}

/// Accept any body carrying a non-empty `access_token`
fn token_from_body(body: &Value, now: DateTime<Utc>) -> Option<Token> {
    let access_token = body
        .get("access_token")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())?;
    let token_type = body
        .get("token_type")
        .and_then(Value::as_str)
        .unwrap_or("Bearer");
    let expires_in = body.get("expires_in").and_then(Value::as_u64);

    Some(Token::new(access_token, token_type, expires_in, now))
}
