//! Trade — a completed round trip with realized profit and loss.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    /// The strategy emitted Sell.
    Signal,
    /// The series ended with the position still open; the engine
    /// force-closed it at the final bar's close.
    EndOfData,
}

/// An immutable record of one completed entry + exit.
///
/// `net_pnl` nets the commission of BOTH fills (entry and exit), so summing
/// `net_pnl` over all trades reproduces the run's capital change exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub entry_bar: usize,
    pub entry_date: NaiveDate,
    pub entry_price: f64,

    pub exit_bar: usize,
    pub exit_date: NaiveDate,
    pub exit_price: f64,

    pub quantity: f64,

    /// (exit_price - entry_price) * quantity, before costs.
    pub gross_pnl: f64,
    /// Total commission paid across both fills.
    pub commission: f64,
    pub net_pnl: f64,

    pub bars_held: usize,
    pub exit_reason: ExitReason,
}

impl Trade {
    /// Realized return as a fraction of entry cost.
    pub fn return_pct(&self) -> f64 {
        if self.entry_price == 0.0 || self.quantity == 0.0 {
            return 0.0;
        }
        self.net_pnl / (self.entry_price * self.quantity)
    }

    pub fn is_winner(&self) -> bool {
        self.net_pnl > 0.0
    }

    pub fn was_forced(&self) -> bool {
        self.exit_reason == ExitReason::EndOfData
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trade() -> Trade {
        Trade {
            entry_bar: 4,
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            entry_price: 100.0,
            exit_bar: 8,
            exit_date: NaiveDate::from_ymd_opt(2024, 1, 11).unwrap(),
            exit_price: 110.0,
            quantity: 50.0,
            gross_pnl: 500.0,
            commission: 10.0,
            net_pnl: 490.0,
            bars_held: 4,
            exit_reason: ExitReason::Signal,
        }
    }

    #[test]
    fn return_pct_calculation() {
        let trade = sample_trade();
        let expected = 490.0 / (100.0 * 50.0);
        assert!((trade.return_pct() - expected).abs() < 1e-10);
    }

    #[test]
    fn winner_and_forced_flags() {
        let mut trade = sample_trade();
        assert!(trade.is_winner());
        assert!(!trade.was_forced());

        trade.exit_reason = ExitReason::EndOfData;
        trade.net_pnl = -25.0;
        assert!(!trade.is_winner());
        assert!(trade.was_forced());
    }

    #[test]
    fn trade_serialization_roundtrip() {
        let trade = sample_trade();
        let json = serde_json::to_string(&trade).unwrap();
        let deser: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(trade, deser);
    }
}
