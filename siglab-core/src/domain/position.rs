//! Position — the single currently open trade.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An open long position.
///
/// At most one position exists per replay run. Created by the tracker when
/// a Buy signal is accepted, destroyed (converted into a
/// [`crate::domain::Trade`]) on Sell or at end of data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Index of the bar the position opened on.
    pub entry_bar: usize,
    pub entry_date: NaiveDate,
    /// Fill price: bar close adjusted for slippage.
    pub entry_price: f64,
    pub quantity: f64,
}

impl Position {
    /// Current market value at the given price.
    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity * price
    }

    /// Unrealized profit/loss at the given price, before exit costs.
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        (price - self.entry_price) * self.quantity
    }
}
