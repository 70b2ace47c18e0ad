//! Equity curve point — mark-to-market portfolio value at one bar.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One point of the equity curve.
///
/// The replay engine appends exactly one point per bar processed: capital
/// when flat, the open position marked to the bar close otherwise. The
/// first point always equals the initial capital.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}
