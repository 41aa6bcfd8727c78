//! Lifecycle management subsystem.
//!
//! # Design Decisions
//! - Shutdown is a broadcast channel: ctrl-c (or a test harness) triggers,
//!   the server drains in-flight requests and exits

pub mod shutdown;

pub use shutdown::Shutdown;
