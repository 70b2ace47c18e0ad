//! Breakout confirmation — two consecutive closes above the channel,
//! ATR-based protective exit.
//!
//! A single close above the prior-window high is often a false break; this
//! variant waits for the previous bar to have closed above its own channel
//! as well. Once in, the exit is a volatility stop: close below
//! entry_price - atr_mult * ATR.

use super::{Signal, Strategy};
use crate::domain::{BarView, Position};

#[derive(Debug, Clone)]
pub struct BreakoutConfirm {
    atr_mult: f64,
    upper_column: String,
    atr_column: String,
}

impl BreakoutConfirm {
    pub fn new(entry_period: usize, atr_period: usize, atr_mult: f64) -> Self {
        assert!(atr_mult > 0.0, "ATR multiple must be positive");
        Self {
            atr_mult,
            upper_column: format!("donchian_upper_{entry_period}"),
            atr_column: format!("atr_{atr_period}"),
        }
    }
}

impl Default for BreakoutConfirm {
    /// 20-bar channel, 2x ATR(14) stop.
    fn default() -> Self {
        Self::new(20, 14, 2.0)
    }
}

impl Strategy for BreakoutConfirm {
    fn name(&self) -> &str {
        "breakout_confirm"
    }

    fn required_indicators(&self) -> Vec<String> {
        vec![self.upper_column.clone(), self.atr_column.clone()]
    }

    fn evaluate(&self, view: &BarView<'_>, position: Option<&Position>) -> Signal {
        let (Some(upper), Some(atr)) = (
            view.indicator(&self.upper_column),
            view.indicator(&self.atr_column),
        ) else {
            return Signal::Hold;
        };
        let close = view.close();

        match position {
            None => {
                let confirmed = match (
                    view.close_back(1),
                    view.indicator_back(&self.upper_column, 1),
                ) {
                    (Some(prev_close), Some(prev_upper)) => prev_close > prev_upper,
                    _ => false,
                };
                if close > upper && confirmed {
                    Signal::Buy
                } else {
                    Signal::Hold
                }
            }
            Some(pos) => {
                if close < pos.entry_price - self.atr_mult * atr {
                    Signal::Sell
                } else {
                    Signal::Hold
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BarView, IndicatorColumns, Position};
    use crate::indicators::make_bars;
    use chrono::NaiveDate;

    fn columns(uppers: Vec<f64>, atrs: Vec<f64>) -> IndicatorColumns {
        let mut cols = IndicatorColumns::new();
        cols.insert("donchian_upper_20", uppers);
        cols.insert("atr_14", atrs);
        cols
    }

    fn open_position(entry_price: f64) -> Position {
        Position {
            entry_bar: 0,
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            entry_price,
            quantity: 10.0,
        }
    }

    #[test]
    fn buys_only_on_second_closing_break() {
        let bars = make_bars(&[104.0, 106.0, 107.0]);
        let cols = columns(vec![105.0, 105.0, 105.5], vec![2.0, 2.0, 2.0]);

        // Bar 1: first close above the channel — not yet confirmed.
        let first = BarView::new(&bars[..=1], &cols);
        assert_eq!(BreakoutConfirm::default().evaluate(&first, None), Signal::Hold);

        // Bar 2: previous bar also closed above its channel — confirmed.
        let second = BarView::new(&bars[..=2], &cols);
        assert_eq!(BreakoutConfirm::default().evaluate(&second, None), Signal::Buy);
    }

    #[test]
    fn atr_stop_triggers_sell() {
        let bars = make_bars(&[95.0]);
        let cols = columns(vec![105.0], vec![2.0]);
        let view = BarView::new(&bars, &cols);
        let pos = open_position(100.0);
        // Stop level: 100 - 2*2 = 96; close 95 is below.
        assert_eq!(
            BreakoutConfirm::default().evaluate(&view, Some(&pos)),
            Signal::Sell
        );
    }

    #[test]
    fn holds_above_stop() {
        let bars = make_bars(&[97.0]);
        let cols = columns(vec![105.0], vec![2.0]);
        let view = BarView::new(&bars, &cols);
        let pos = open_position(100.0);
        assert_eq!(
            BreakoutConfirm::default().evaluate(&view, Some(&pos)),
            Signal::Hold
        );
    }
}
