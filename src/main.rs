//! Alpaca Relay
//!
//! A backend relay that forwards a trusted frontend's HTTP requests to the
//! Alpaca brokerage API, injecting server-held credentials on the way out.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────┐
//!                          │                 ALPACA RELAY                  │
//!                          │                                               │
//!     Frontend Request     │  ┌─────────┐   ┌──────────┐   ┌───────────┐  │
//!     ─────────────────────┼─▶│  cors   │──▶│   rate   │──▶│ forwarding│  │
//!                          │  │  layer  │   │  limit   │   │ handlers  │  │
//!                          │  └─────────┘   └──────────┘   └─────┬─────┘  │
//!                          │                                      │        │
//!                          │                                      ▼        │
//!     Frontend Response    │  ┌─────────┐                 ┌───────────┐   │
//!     ◀────────────────────┼──│response │◀────────────────│  upstream │◀──┼── Alpaca API
//!                          │  │ mapping │                 │   client  │   │   (paper / data)
//!                          │  └─────────┘                 └───────────┘   │
//!                          │                                               │
//!                          │  ┌─────────────────────────────────────────┐ │
//!                          │  │          Cross-Cutting Concerns          │ │
//!                          │  │  config   observability   lifecycle      │ │
//!                          │  └─────────────────────────────────────────┘ │
//!                          └──────────────────────────────────────────────┘
//! ```

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use alpaca_relay::config;
use alpaca_relay::http::HttpServer;
use alpaca_relay::lifecycle::Shutdown;
use alpaca_relay::observability::metrics;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alpaca_relay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("alpaca-relay v0.1.0 starting");

    // Load configuration from the process environment
    let relay_config = config::from_env()?;

    tracing::info!(
        bind_address = %relay_config.listener.bind_address,
        trading_mode = %relay_config.upstream.mode,
        allowed_origins = ?relay_config.cors.allowed_origins,
        upstream_timeout_secs = relay_config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    // Bind TCP listener
    let listener = TcpListener::bind(&relay_config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // Initialize metrics exporter
    if relay_config.observability.metrics_enabled {
        if let Ok(addr) = relay_config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %relay_config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Create and run HTTP server
    let shutdown = Shutdown::new();
    let server = HttpServer::new(relay_config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
