//! Momentum breakout — Donchian channel break on above-average volume.
//!
//! Buy when the close clears the upper channel of the prior 20 bars with
//! volume at least 1.5x its average. Sell when the close falls through the
//! lower channel of the prior 10 bars.

use super::{Signal, Strategy};
use crate::domain::{BarView, Position};

#[derive(Debug, Clone)]
pub struct MomentumBreakout {
    volume_min: f64,
    upper_column: String,
    lower_column: String,
    volume_column: String,
}

impl MomentumBreakout {
    pub fn new(entry_period: usize, exit_period: usize, volume_period: usize, volume_min: f64) -> Self {
        Self {
            volume_min,
            upper_column: format!("donchian_upper_{entry_period}"),
            lower_column: format!("donchian_lower_{exit_period}"),
            volume_column: format!("vol_ratio_{volume_period}"),
        }
    }
}

impl Default for MomentumBreakout {
    /// 20-bar entry channel, 10-bar exit channel, 1.5x volume gate.
    fn default() -> Self {
        Self::new(20, 10, 20, 1.5)
    }
}

impl Strategy for MomentumBreakout {
    fn name(&self) -> &str {
        "momentum_breakout"
    }

    fn required_indicators(&self) -> Vec<String> {
        vec![
            self.upper_column.clone(),
            self.lower_column.clone(),
            self.volume_column.clone(),
        ]
    }

    fn evaluate(&self, view: &BarView<'_>, position: Option<&Position>) -> Signal {
        let (Some(upper), Some(lower), Some(vol_ratio)) = (
            view.indicator(&self.upper_column),
            view.indicator(&self.lower_column),
            view.indicator(&self.volume_column),
        ) else {
            return Signal::Hold;
        };
        let close = view.close();

        match position {
            None if close > upper && vol_ratio >= self.volume_min => Signal::Buy,
            Some(_) if close < lower => Signal::Sell,
            _ => Signal::Hold,
        }
    }
}
