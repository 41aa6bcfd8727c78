//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits so tests and future config files can
//! deserialize them directly.

use serde::{Deserialize, Serialize};

use crate::upstream::TradingMode;

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Brokerage API credentials.
    pub credentials: CredentialsConfig,

    /// Upstream host selection.
    pub upstream: UpstreamConfig,

    /// Inbound origin allow-list.
    pub cors: CorsConfig,

    /// Per-client rate limiting.
    pub rate_limit: RateLimitConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Brokerage API credential pair. Loaded once at startup, immutable for
/// the process lifetime, never exposed to callers.
#[derive(Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CredentialsConfig {
    /// API key id (`APCA_API_KEY_ID`).
    pub key_id: String,

    /// API secret key (`APCA_API_SECRET_KEY`). Never serialized; the
    /// secret must not leave the process via dumped config.
    #[serde(skip_serializing)]
    pub secret_key: String,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("key_id", &self.key_id)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Upstream host selection.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Trading mode; selects the trading-operations host.
    pub mode: TradingMode,

    /// Override for the trading-operations base URL. Used by tests to
    /// point the relay at a local mock upstream.
    pub trading_url: Option<String>,

    /// Override for the market-data base URL.
    pub data_url: Option<String>,
}

impl UpstreamConfig {
    /// Base URL of the trading-operations host.
    pub fn trading_base(&self) -> &str {
        self.trading_url
            .as_deref()
            .unwrap_or_else(|| self.mode.trading_host())
    }

    /// Base URL of the market-data host.
    pub fn data_base(&self) -> &str {
        self.data_url
            .as_deref()
            .unwrap_or(crate::upstream::mode::DATA_HOST)
    }
}

/// Inbound CORS allow-list.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins permitted to call the relay. Exact match, credentials
    /// mode enabled, so wildcards are rejected by validation.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
            ],
        }
    }
}

/// Per-client-address rate limiting.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable the rate limiter.
    pub enabled: bool,

    /// Maximum requests per client address within one window.
    pub max_requests: u32,

    /// Window length in seconds.
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 100,
            window_secs: 60,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Inbound request timeout in seconds.
    pub request_secs: u64,

    /// Outbound upstream call timeout in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 45,
            upstream_secs: 30,
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Expose a Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Address for the metrics endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
