//! Position/trade tracker — pure open/close arithmetic.
//!
//! These functions own all fill economics so the replay loop stays
//! declarative. They are pure over explicit inputs: no hidden state, no
//! side effects beyond the returned value.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{ExitReason, Position, Trade};

/// A Buy signal that cannot be filled: capital after commission leaves no
/// positive quantity. Recovered locally by the engine as an implicit Hold.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("cannot open position: capital {capital} minus commission {commission} buys no quantity")]
pub struct InsufficientCapital {
    pub capital: f64,
    pub commission: f64,
}

/// Open a long position at the bar's close.
///
/// Fill price is `close * (1 + slippage)`; quantity is everything the
/// remaining capital (after the entry commission) can buy.
pub fn open_position(
    bar_index: usize,
    date: NaiveDate,
    close: f64,
    capital: f64,
    commission: f64,
    slippage: f64,
) -> Result<Position, InsufficientCapital> {
    let entry_price = close * (1.0 + slippage);
    let quantity = (capital - commission) / entry_price;
    if !(quantity > 0.0) {
        return Err(InsufficientCapital {
            capital,
            commission,
        });
    }
    Ok(Position {
        entry_bar: bar_index,
        entry_date: date,
        entry_price,
        quantity,
    })
}

/// Close a position at the bar's close, producing the immutable trade.
///
/// Fill price is `close * (1 - slippage)`. The trade's `net_pnl` nets the
/// commission of both fills, so capital after the round trip is exactly
/// `capital_at_entry + net_pnl`.
pub fn close_position(
    position: &Position,
    bar_index: usize,
    date: NaiveDate,
    close: f64,
    commission: f64,
    slippage: f64,
    exit_reason: ExitReason,
) -> Trade {
    let exit_price = close * (1.0 - slippage);
    let gross_pnl = (exit_price - position.entry_price) * position.quantity;
    let total_commission = 2.0 * commission;
    Trade {
        entry_bar: position.entry_bar,
        entry_date: position.entry_date,
        entry_price: position.entry_price,
        exit_bar: bar_index,
        exit_date: date,
        exit_price,
        quantity: position.quantity,
        gross_pnl,
        commission: total_commission,
        net_pnl: gross_pnl - total_commission,
        bars_held: bar_index - position.entry_bar,
        exit_reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn open_frictionless() {
        let pos = open_position(3, date(5), 100.0, 10_000.0, 0.0, 0.0).unwrap();
        assert_eq!(pos.entry_price, 100.0);
        assert_eq!(pos.quantity, 100.0);
        assert_eq!(pos.entry_bar, 3);
    }

    #[test]
    fn open_applies_slippage_and_commission() {
        let pos = open_position(0, date(2), 100.0, 10_000.0, 10.0, 0.01).unwrap();
        assert!((pos.entry_price - 101.0).abs() < 1e-10);
        assert!((pos.quantity - 9_990.0 / 101.0).abs() < 1e-10);
    }

    #[test]
    fn open_fails_when_commission_eats_capital() {
        let err = open_position(0, date(2), 100.0, 5.0, 10.0, 0.0).unwrap_err();
        assert_eq!(err.capital, 5.0);
        assert_eq!(err.commission, 10.0);
    }

    #[test]
    fn open_fails_on_nan_capital() {
        assert!(open_position(0, date(2), 100.0, f64::NAN, 0.0, 0.0).is_err());
    }

    #[test]
    fn close_round_trip_economics() {
        let pos = open_position(2, date(4), 100.0, 10_000.0, 5.0, 0.0).unwrap();
        let trade = close_position(&pos, 7, date(11), 110.0, 5.0, 0.0, ExitReason::Signal);

        assert_eq!(trade.exit_price, 110.0);
        assert_eq!(trade.bars_held, 5);
        assert_eq!(trade.commission, 10.0);
        let expected_gross = (110.0 - 100.0) * pos.quantity;
        assert!((trade.gross_pnl - expected_gross).abs() < 1e-10);
        assert!((trade.net_pnl - (expected_gross - 10.0)).abs() < 1e-10);

        // Capital identity: entry capital + net_pnl equals exit proceeds
        // minus the exit commission.
        let proceeds = trade.exit_price * trade.quantity - 5.0;
        assert!((10_000.0 + trade.net_pnl - proceeds).abs() < 1e-9);
    }

    #[test]
    fn close_applies_exit_slippage() {
        let pos = open_position(0, date(2), 100.0, 10_000.0, 0.0, 0.02).unwrap();
        let trade = close_position(&pos, 4, date(8), 110.0, 0.0, 0.02, ExitReason::Signal);
        assert!((pos.entry_price - 102.0).abs() < 1e-10);
        assert!((trade.exit_price - 107.8).abs() < 1e-10);
    }

    #[test]
    fn forced_close_is_tagged() {
        let pos = open_position(0, date(2), 100.0, 10_000.0, 0.0, 0.0).unwrap();
        let trade = close_position(&pos, 9, date(15), 95.0, 0.0, 0.0, ExitReason::EndOfData);
        assert!(trade.was_forced());
        assert!(!trade.is_winner());
    }
}
