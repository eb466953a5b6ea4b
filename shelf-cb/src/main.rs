//! shelf-cb (Catalog Browser) - Main entry point
//!
//! Interactive album search and collection keeper. Log output goes to
//! stderr so it never interleaves with the command prompt on stdout.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use shelf_cb::config::{BrowserConfig, ConfigOverrides};
use shelf_cb::services::{RelayTokenClient, SpotifyCatalogClient};
use shelf_cb::store::JsonFileStore;
use shelf_cb::{repl, AppController};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for shelf-cb
#[derive(Parser, Debug)]
#[command(name = "shelf-cb")]
#[command(about = "Search the music catalog and keep an album collection")]
#[command(version)]
struct Args {
    /// Path to TOML config file
    #[arg(short, long, env = "SHELF_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the token relay
    #[arg(long, env = "SHELF_RELAY_URL")]
    relay_url: Option<String>,

    /// Directory holding the stored collection
    #[arg(long, env = "SHELF_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(BrowserConfig::default_path);
    let overrides = ConfigOverrides {
        relay_url: args.relay_url,
        data_dir: args.data_dir,
        log_level: args.log_level,
    };

    let (config, origin) = BrowserConfig::load(&config_path);
    let config = config.apply_overrides(overrides);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("shelf_cb={}", config.logging.level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    info!("Starting Spinshelf Catalog Browser (shelf-cb) v{}", env!("CARGO_PKG_VERSION"));
    origin.log(&config_path);

    let data_dir = config.data_dir();
    info!(relay = %config.relay_url, data_dir = %data_dir.display(), "Configuration resolved");

    let tokens = RelayTokenClient::new(&config.relay_url);
    let catalog = SpotifyCatalogClient::new(&config.catalog_base_url, &config.market, config.search_limit);
    let store = JsonFileStore::in_dir(&data_dir);

    let mut controller = AppController::new(store);
    controller.acquire_token(&tokens).await;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    repl::render_status(&controller, &mut out)?;
    drop(out);

    let stdin = io::stdin();
    repl::run(&mut controller, &catalog, &tokens, stdin.lock(), io::stdout()).await?;

    info!("Goodbye");
    Ok(())
}
