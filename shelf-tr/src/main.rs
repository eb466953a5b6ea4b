//! shelf-tr (Token Relay) - Main entry point
//!
//! Serves the prebuilt browser assets and exchanges the OAuth client
//! credentials for bearer tokens on behalf of the browser.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use shelf_tr::config::{DEFAULT_INDEX_FILE, DEFAULT_PORT, DEFAULT_STATIC_DIR, DEFAULT_TOKEN_URL};
use shelf_tr::{build_router, AppState, ClientCredentials, CredentialSource, RelayConfig};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for shelf-tr
#[derive(Parser, Debug)]
#[command(name = "shelf-tr")]
#[command(about = "Token relay and static asset server for Spinshelf")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PORT")]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0", env = "SHELF_BIND")]
    bind: std::net::IpAddr,

    /// Directory of prebuilt static assets
    #[arg(long, default_value = DEFAULT_STATIC_DIR, env = "SHELF_STATIC_DIR")]
    static_dir: PathBuf,

    /// File served for `/`
    #[arg(long, default_value = DEFAULT_INDEX_FILE, env = "SHELF_INDEX_FILE")]
    index_file: String,

    /// Identity endpoint for the client-credentials exchange
    #[arg(long, default_value = DEFAULT_TOKEN_URL, env = "SHELF_TOKEN_URL")]
    token_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shelf_tr=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Spinshelf Token Relay (shelf-tr) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let config = RelayConfig {
        token_url: args.token_url,
        static_dir: args.static_dir,
        index_file: args.index_file,
    };

    if !config.static_dir.is_dir() {
        warn!("Static directory {} does not exist", config.static_dir.display());
    }
    info!("Serving static assets from {}", config.static_dir.display());

    // Credentials are re-read per request; this is only a startup hint
    let report = ClientCredentials::from_env().report();
    if report.client_id_present && report.client_secret_present {
        info!("✓ Spotify client credentials configured");
    } else {
        warn!(
            client_id_present = report.client_id_present,
            client_secret_present = report.client_secret_present,
            "Spotify client credentials incomplete; /api/token will fail until they are set"
        );
    }

    let state = AppState::new(config, CredentialSource::Environment);
    let app = build_router(state);

    let addr = SocketAddr::new(args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Server listening on port {}", args.port);
    info!("Token endpoint: http://{}/api/token", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
