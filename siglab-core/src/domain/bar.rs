//! Bar — one OHLCV record for a single time period.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// OHLCV bar for a single period.
///
/// Bars are owned by the caller and read-only to the engine. Indicator
/// values live in the surrounding [`crate::domain::Series`] as named
/// columns, not on the bar itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Basic OHLC sanity check: positive prices, high >= max(open, close),
    /// low <= min(open, close).
    pub fn is_sane(&self) -> bool {
        if self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
    }
}
