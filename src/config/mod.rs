//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment
//!     → loader.rs (read env vars, apply defaults)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → shared via Arc to all handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields have defaults so tests can build a config inline
//! - Credentials are required and validated at startup rather than
//!   discovered missing on the first upstream call

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{from_env, ConfigError};
pub use schema::{
    CorsConfig, CredentialsConfig, ListenerConfig, ObservabilityConfig, RateLimitConfig,
    RelayConfig, TimeoutConfig, UpstreamConfig,
};
