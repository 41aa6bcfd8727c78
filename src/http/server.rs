//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the relay's fixed route set
//! - Wire up middleware (request ID, tracing, timeout, CORS, rate limit)
//! - Bind the server to a listener with graceful shutdown
//!
//! # Middleware ordering (outermost first)
//! request id → trace → timeout → CORS → rate limit → handlers.
//! CORS sits outside the limiter so preflights are answered even for
//! clients that have exhausted their window.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::http::handlers;
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::security::{cors_layer, rate_limit_middleware, RateLimiterState};
use crate::upstream::{AlpacaClient, UpstreamError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub client: AlpacaClient,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, UpstreamError> {
        let client = AlpacaClient::from_config(&config)?;
        let state = AppState {
            config: Arc::new(config.clone()),
            client,
        };
        let router = Self::build_router(&config, state);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let limiter = Arc::new(RateLimiterState::new(&config.rate_limit));

        Router::new()
            .route("/health", get(handlers::health))
            .route("/api/account", get(handlers::get_account))
            .route("/api/positions", get(handlers::list_positions))
            .route(
                "/api/orders",
                get(handlers::list_orders).post(handlers::submit_order),
            )
            .route("/api/orders/{order_id}", delete(handlers::cancel_order))
            .route("/api/bars/{symbol}", get(handlers::get_bars))
            .route("/api/quote/{symbol}", get(handlers::get_latest_quote))
            .route("/api/clock", get(handlers::market_clock))
            .with_state(state)
            .layer(middleware::from_fn_with_state(
                limiter,
                rate_limit_middleware,
            ))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::with_status_code(
                        StatusCode::REQUEST_TIMEOUT,
                        Duration::from_secs(config.timeouts.request_secs),
                    ))
                    .layer(cors_layer(&config.cors)),
            )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Wait for Ctrl+C or a coordinator-triggered shutdown.
async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if result.is_ok() {
                tracing::info!("Shutdown signal received");
            }
        }
        _ = shutdown.recv() => {
            tracing::info!("Shutdown requested");
        }
    }
}
