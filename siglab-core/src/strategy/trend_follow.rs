//! Trend following — dual moving average alignment gated by ADX strength.
//!
//! Buy when the close is above the fast SMA, the fast SMA is above the
//! slow SMA, and ADX confirms a trending regime. Sell when the averages
//! cross back down or the close breaks the slow average.

use super::{Signal, Strategy};
use crate::domain::{BarView, Position};

#[derive(Debug, Clone)]
pub struct TrendFollow {
    adx_min: f64,
    fast_column: String,
    slow_column: String,
    adx_column: String,
}

impl TrendFollow {
    pub fn new(fast: usize, slow: usize, adx_period: usize, adx_min: f64) -> Self {
        assert!(fast < slow, "fast SMA period must be below slow");
        Self {
            adx_min,
            fast_column: format!("sma_{fast}"),
            slow_column: format!("sma_{slow}"),
            adx_column: format!("adx_{adx_period}"),
        }
    }
}

impl Default for TrendFollow {
    /// SMA 20/50, ADX(14) >= 20.
    fn default() -> Self {
        Self::new(20, 50, 14, 20.0)
    }
}

impl Strategy for TrendFollow {
    fn name(&self) -> &str {
        "trend_follow"
    }

    fn required_indicators(&self) -> Vec<String> {
        vec![
            self.fast_column.clone(),
            self.slow_column.clone(),
            self.adx_column.clone(),
        ]
    }

    fn evaluate(&self, view: &BarView<'_>, position: Option<&Position>) -> Signal {
        let (Some(fast), Some(slow), Some(adx)) = (
            view.indicator(&self.fast_column),
            view.indicator(&self.slow_column),
            view.indicator(&self.adx_column),
        ) else {
            return Signal::Hold;
        };
        let close = view.close();

        match position {
            None if close > fast && fast > slow && adx >= self.adx_min => Signal::Buy,
            Some(_) if fast < slow || close < slow => Signal::Sell,
            _ => Signal::Hold,
        }
    }
}
