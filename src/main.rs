//! Route dispatch server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http (axum, request id, trace, timeout)
//!                         │
//!                         ▼
//!                     routing::request (split + decode path)
//!                         │
//!                         ▼
//!                     routing::dispatch ──▶ pattern ──▶ subsite
//!                         │
//!                         ▼
//!     ◀────────────── 200 route JSON / 405 / 404
//!
//!     config (TOML) ──▶ validation ──▶ site::Site::compile (once, at startup)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use route_dispatch::config::load_config;
use route_dispatch::observability::{logging, metrics};
use route_dispatch::{HttpServer, Shutdown, Site};

#[derive(Parser)]
#[command(name = "route-dispatch")]
#[command(about = "Serve a configured route tree over HTTP", long_about = None)]
struct Args {
    /// Path to the TOML route configuration.
    #[arg(short, long, default_value = "routes.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(&args.config)?;

    logging::init_logging(&config.observability);
    tracing::info!("route-dispatch v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        path = %args.config.display(),
        bind_address = %config.server.bind_address,
        routes = config.routes.len(),
        subsites = config.subsites.len(),
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

    let site = Arc::new(Site::compile(&config)?);

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    HttpServer::new(site, &config.server)
        .run(listener, server_shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
