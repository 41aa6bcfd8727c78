//! Trading mode and upstream host lookup.
//!
//! The frontend historically passed a free-form "mode" string that always
//! resolved to the paper account. It is modeled here as an explicit enum
//! resolved through a fixed table; live-mode routing exists but has never
//! been exercised against real-money credentials.

use serde::{Deserialize, Serialize};

/// Market-data host, shared by both trading modes.
pub const DATA_HOST: &str = "https://data.alpaca.markets";

const PAPER_TRADING_HOST: &str = "https://paper-api.alpaca.markets";
const LIVE_TRADING_HOST: &str = "https://api.alpaca.markets";

/// Brokerage account context: simulated (paper) or real-money (live).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    #[default]
    Paper,
    Live,
}

impl TradingMode {
    /// Trading-operations host for this mode.
    pub fn trading_host(&self) -> &'static str {
        match self {
            TradingMode::Paper => PAPER_TRADING_HOST,
            TradingMode::Live => LIVE_TRADING_HOST,
        }
    }
}

impl std::fmt::Display for TradingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradingMode::Paper => write!(f, "paper"),
            TradingMode::Live => write!(f, "live"),
        }
    }
}
