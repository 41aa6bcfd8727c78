//! Market-data helpers.

pub mod window;

pub use window::{LookbackWindow, WindowError, DEFAULT_LIMIT};
