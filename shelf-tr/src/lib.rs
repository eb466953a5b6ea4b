//! shelf-tr library - Token Relay
//!
//! Keeps the OAuth client secret on the server: the browser asks
//! `/api/token`, the relay performs the client-credentials exchange and hands
//! back the bearer token. Every other path is served from the static asset
//! directory.

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod error;
pub mod exchange;

pub use config::{ClientCredentials, CredentialSource, RelayConfig};
pub use error::{RelayError, RelayResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Outbound client for the identity service (no timeout configured)
    pub http_client: reqwest::Client,
    /// Where credentials come from on each request
    pub credentials: CredentialSource,
    pub config: RelayConfig,
}

impl AppState {
    pub fn new(config: RelayConfig, credentials: CredentialSource) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            credentials,
            config,
        }
    }
}

/// Build application router
///
/// API routes take precedence; `/` serves the configured index file and any
/// other path falls through to the static directory.
pub fn build_router(state: AppState) -> Router {
    let index = ServeFile::new(state.config.index_path());
    let assets = ServeDir::new(&state.config.static_dir);

    Router::new()
        .merge(api::token_routes())
        .merge(api::health_routes())
        .route_service("/", index)
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
