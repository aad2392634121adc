//! Overtime server.
//!
//! Serves the match listing, the player and the stream relay.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser                 ┌──────────────────────────────────────────────┐
//!     ───────────────────────▶│  http::server (axum, request id, tracing)    │
//!                             │      │                                        │
//!                             │      ├── pages ──┐                            │
//!                             │      ├── api ────┼──▶ catalog ──▶ feed store ─┼──▶ JSON feed
//!                             │      │           │                            │
//!                             │      └── relay (CORS, header injection) ──────┼──▶ stream CDN
//!                             └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use overtime::config::resolve_config;
use overtime::http::HttpServer;
use overtime::lifecycle::Shutdown;
use overtime::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "overtime")]
#[command(about = "Live match listing, player and stream relay", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = resolve_config(args.config.as_deref())?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("overtime v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        feed_url = %config.feed.url,
        cache_ttl_secs = config.feed.cache_ttl_secs,
        rewrite_playlists = config.relay.rewrite_playlists,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
