//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → cors.rs (origin allow-list, preflight)
//!     → rate_limit.rs (per-IP windowed counter)
//!     → Pass to forwarding handlers
//! ```
//!
//! # Design Decisions
//! - Origins matched exactly against the configured allow-list
//! - Fail closed: unknown origins get no CORS grant, over-cap clients get 429
//! - No trust in client input; path params validated at the handler

pub mod cors;
pub mod rate_limit;

pub use cors::cors_layer;
pub use rate_limit::{rate_limit_middleware, RateLimiterState};
