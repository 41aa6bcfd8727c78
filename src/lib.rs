//! Alpaca Relay Library

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod market_data;
pub mod observability;
pub mod security;
pub mod upstream;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
