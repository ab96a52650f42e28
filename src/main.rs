//! Proxy binary entry point.
//!
//! Startup order: parse CLI → init logging → load config (or built-in
//! Polymarket routes) → bind listener → serve until Ctrl-C.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use cors_proxy::config::{load_config, ProxyConfig};
use cors_proxy::observability::init_logging;
use cors_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "cors-proxy")]
#[command(about = "CORS forwarding proxy for Polymarket market-data APIs", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Without it the built-in Polymarket
    /// route table is used.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::builtin(),
    };

    init_logging(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        fetch_enabled = config.fetch.enabled,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let handle = shutdown.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            shutdown.trigger();
        }
    });

    let server = HttpServer::new(config)?;
    server.run(listener, handle).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
