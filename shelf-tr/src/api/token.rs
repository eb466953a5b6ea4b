//! Token endpoints
//!
//! `GET /api/token` exchanges the configured client credentials for a bearer
//! token on every call. `GET /api/token-config` reports whether credentials
//! are configured without revealing them.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use shelf_common::api::TokenConfigReport;
use tracing::{error, info, warn};

use crate::error::{RelayError, RelayResult};
use crate::exchange::exchange_client_credentials;
use crate::AppState;

/// GET /api/token
///
/// **Response:** the identity service's JSON body and status, forwarded
/// unchanged (`{access_token, token_type, expires_in}` on success).
///
/// **Errors:**
/// - 500 `missing_client_credentials`: id or secret not configured
/// - 502 `token_exchange_failed`: identity service unreachable or replied
///   with a non-JSON body
pub async fn get_token(State(state): State<AppState>) -> RelayResult<Response> {
    let credentials = state.credentials.resolve();

    let Some((client_id, client_secret)) = credentials.pair() else {
        let missing = credentials.missing();
        error!(missing = ?missing, "Token requested but client credentials are not configured");
        return Err(RelayError::MissingCredentials { missing });
    };

    let reply = exchange_client_credentials(
        &state.http_client,
        &state.config.token_url,
        client_id,
        client_secret,
    )
    .await
    .map_err(|e| {
        error!("Token exchange failed: {}", e);
        e
    })?;

    if reply.is_success() {
        info!(status = reply.status, "Issued token from identity service");
    } else {
        warn!(status = reply.status, "Identity service rejected token request; forwarding");
    }

    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((status, Json(reply.body)).into_response())
}

/// GET /api/token-config
///
/// Diagnostic only: presence and length of each credential.
pub async fn get_token_config(State(state): State<AppState>) -> Json<TokenConfigReport> {
    Json(state.credentials.resolve().report())
}

/// Build token routes
pub fn token_routes() -> Router<AppState> {
    Router::new()
        .route("/api/token", get(get_token))
        .route("/api/token-config", get(get_token_config))
}
