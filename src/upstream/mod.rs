//! Upstream brokerage API subsystem.
//!
//! # Data Flow
//! ```text
//! Forwarding handler:
//!     → mode.rs (resolve trading host by mode)
//!     → client.rs (build URL, inject credential headers, issue call)
//!     → Alpaca REST API (trading-operations or market-data host)
//! ```
//!
//! # Design Decisions
//! - Exactly one outbound call per inbound request; no retries
//! - Credentials attached as a prebuilt header map, never logged
//! - Explicit 30s outbound timeout instead of the client default

pub mod client;
pub mod mode;

pub use client::{AlpacaClient, UpstreamError};
pub use mode::TradingMode;
