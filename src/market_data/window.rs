//! Lookback window calculation for bar requests.
//!
//! # Responsibilities
//! - Parse a timeframe descriptor ("1Min", "4Hour", "1Day", "1Week")
//! - Derive the start/end timestamp range sent to the market-data host
//!
//! # Design Decisions
//! - Unit resolved by substring match, precedence Min > Hour > Day > Week;
//!   an unrecognized token falls back to days
//! - A ×3 safety buffer widens the window unconditionally so non-trading
//!   hours and weekends still yield roughly `limit` bars
//! - Unparsable magnitudes default to 1 for Day/Week; for Min/Hour they
//!   are rejected rather than emitting an invalid upstream query

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use thiserror::Error;

/// Default bar count when the caller omits or mangles `limit`.
pub const DEFAULT_LIMIT: u32 = 100;

/// Widening factor compensating for non-trading hours and weekends.
const SAFETY_MULTIPLIER: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Minute,
    Hour,
    Day,
    Week,
}

impl Unit {
    fn seconds(self) -> i64 {
        match self {
            Unit::Minute => 60,
            Unit::Hour => 3_600,
            Unit::Day => 86_400,
            Unit::Week => 604_800,
        }
    }
}

/// Error computing a lookback window.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("timeframe {0:?} has no parsable magnitude")]
    InvalidMagnitude(String),

    #[error("window for timeframe {0:?} exceeds the representable range")]
    SpanTooLarge(String),
}

/// Start/end timestamp pair for a bars query. `end` is "now"; `start`
/// reaches back far enough that the upstream returns roughly `limit` bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl LookbackWindow {
    /// Compute a window ending at the current time.
    pub fn compute(timeframe: &str, limit: u32) -> Result<Self, WindowError> {
        Self::compute_at(timeframe, limit, Utc::now())
    }

    /// Compute a window ending at `end`. Split out for deterministic tests.
    pub fn compute_at(timeframe: &str, limit: u32, end: DateTime<Utc>) -> Result<Self, WindowError> {
        let unit = if timeframe.contains("Min") {
            Unit::Minute
        } else if timeframe.contains("Hour") {
            Unit::Hour
        } else if timeframe.contains("Day") {
            Unit::Day
        } else if timeframe.contains("Week") {
            Unit::Week
        } else {
            Unit::Day
        };

        let magnitude = match leading_digits(timeframe) {
            Some(m) => m,
            None => match unit {
                Unit::Day | Unit::Week => 1,
                Unit::Minute | Unit::Hour => {
                    return Err(WindowError::InvalidMagnitude(timeframe.to_string()))
                }
            },
        };

        let span = i64::from(limit)
            .checked_mul(unit.seconds())
            .and_then(|s| s.checked_mul(magnitude))
            .and_then(|s| s.checked_mul(SAFETY_MULTIPLIER))
            .and_then(Duration::try_seconds)
            .ok_or_else(|| WindowError::SpanTooLarge(timeframe.to_string()))?;
        let start = end
            .checked_sub_signed(span)
            .ok_or_else(|| WindowError::SpanTooLarge(timeframe.to_string()))?;
        Ok(Self { start, end })
    }

    /// Window start as an RFC 3339 timestamp.
    pub fn start_rfc3339(&self) -> String {
        self.start.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// Window end as an RFC 3339 timestamp.
    pub fn end_rfc3339(&self) -> String {
        self.end.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

fn leading_digits(s: &str) -> Option<i64> {
    let digits: &str = {
        let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        &s[..end]
    };
    digits.parse().ok()
}
