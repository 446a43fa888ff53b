//! Dust scanner service.
//!
//! # Architecture Overview
//!
//! ```text
//!   GET /api/evm-tokens ──▶ http ──▶ aggregator ──▶ strategies (one per chain)
//!                                                        │
//!                                                        ▼
//!                                       tokens (metadata, dust, spam)
//!                                                        │
//!   GET /api/tokens ──────▶ http ──▶ solana collector    │
//!                                          │             │
//!                                          ▼             ▼
//!                                     provider (reqwest transport, JSON-RPC)
//!                                          │
//!                                          ▼
//!                          explorers, RPC endpoints, token indexes
//!
//!   cross-cutting: config · observability · lifecycle
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use dust_scanner::config::{load_config, ScannerConfig};
use dust_scanner::lifecycle::{shutdown_on_signal, Shutdown};
use dust_scanner::observability::{logging, metrics};
use dust_scanner::HttpServer;

#[derive(Parser)]
#[command(name = "dust-scanner", version, about = "Multi-chain wallet token-balance scanner")]
struct Args {
    /// TOML config file; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ScannerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "dust-scanner starting");
    tracing::info!(
        config = ?args.config,
        bind_address = %config.listener.bind_address,
        chains = config.chains.len(),
        request_timeout_secs = config.listener.request_timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics listener");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    let shutdown_rx = shutdown.subscribe();
    tokio::spawn(shutdown_on_signal(shutdown.clone()));

    HttpServer::new(config).run(listener, shutdown_rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
