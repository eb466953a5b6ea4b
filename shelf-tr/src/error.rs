//! Error types for shelf-tr
//!
//! Failures the relay produces itself are reported as `{error, message}`
//! bodies. Upstream failures are not errors here: their status and body are
//! forwarded to the caller unchanged.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shelf_common::api::ErrorBody;
use thiserror::Error;

/// Relay error type
#[derive(Debug, Error)]
pub enum RelayError {
    /// Client id and/or secret not configured (500)
    #[error("Spotify client credentials are not configured (missing: {})", .missing.join(", "))]
    MissingCredentials { missing: Vec<&'static str> },

    /// The outbound exchange could not be completed (502)
    #[error("Token exchange failed: {0}")]
    Exchange(String),
}

impl RelayError {
    fn code(&self) -> &'static str {
        match self {
            RelayError::MissingCredentials { .. } => "missing_client_credentials",
            RelayError::Exchange(_) => "token_exchange_failed",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingCredentials { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::Exchange(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.code().to_string(),
            message: self.to_string(),
        });

        (self.status(), body).into_response()
    }
}

/// Result type for relay handlers
pub type RelayResult<T> = Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials_message_names_variables() {
        let err = RelayError::MissingCredentials {
            missing: vec!["SPOTIFY_CLIENT_ID", "SPOTIFY_CLIENT_SECRET"],
        };
        assert_eq!(
            err.to_string(),
            "Spotify client credentials are not configured (missing: SPOTIFY_CLIENT_ID, SPOTIFY_CLIENT_SECRET)"
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_exchange_maps_to_bad_gateway() {
        let err = RelayError::Exchange("connection refused".to_string());
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.code(), "token_exchange_failed");
    }
}
