//! HTTP forwarding proxy.
//!
//! Relays inbound requests to a caller-supplied target URL and streams the
//! origin's response back, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────┐
//!                      │                  RELAY PROXY                     │
//!                      │                                                  │
//!   Client Request     │  ┌─────────┐   ┌──────────────────────────────┐ │
//!   ──────────────────┼─▶│  http   │──▶│ request adapter              │ │
//!                      │  │ server  │   │ (target, body, header        │ │
//!                      │  └─────────┘   │  hygiene)                    │ │
//!                      │                └──────────────┬───────────────┘ │
//!                      │                               ▼                 │
//!                      │                ┌──────────────────────────────┐ │
//!   Client Response    │  ┌─────────┐   │ origin forwarder             │ │      Origin
//!   ◀──────────────────┼──│response │◀──│ (reqwest: redirects, 30s    │◀┼────▶ Server
//!                      │  │ relay   │   │  timeout, decompression)     │ │
//!                      │  └─────────┘   └──────────────────────────────┘ │
//!                      │                                                  │
//!                      │  ┌────────────────────────────────────────────┐ │
//!                      │  │ Cross-Cutting: config · observability ·    │ │
//!                      │  │ lifecycle (signals, graceful shutdown)     │ │
//!                      │  └────────────────────────────────────────────┘ │
//!                      └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use tokio::net::TcpListener;

use relay_proxy::config::{load_config, ProxyConfig};
use relay_proxy::http::HttpServer;
use relay_proxy::lifecycle::{signals, Shutdown};
use relay_proxy::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "relay-proxy", version, about = "HTTP forwarding proxy")]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!("relay-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        relay_timeout_secs = config.relay.timeout_secs,
        max_redirects = config.relay.max_redirects,
        max_body_bytes = config.limits.max_body_bytes,
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

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::listen_for_signals(&shutdown).await;
    });

    let server = HttpServer::new(config);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
