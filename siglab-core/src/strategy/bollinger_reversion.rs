//! Bollinger mean reversion — buy the lower band, exit at the middle.
//!
//! Buy when the close drops below the lower band (stretched move). Sell
//! once the close reverts to or beyond the middle band.

use super::{Signal, Strategy};
use crate::domain::{BarView, Position};

#[derive(Debug, Clone)]
pub struct BollingerReversion {
    lower_column: String,
    middle_column: String,
}

impl BollingerReversion {
    pub fn new(period: usize, multiplier: f64) -> Self {
        Self {
            lower_column: format!("bb_lower_{period}_{multiplier}"),
            middle_column: format!("bb_middle_{period}_{multiplier}"),
        }
    }
}

impl Default for BollingerReversion {
    /// Bands over 20 bars at 2 standard deviations.
    fn default() -> Self {
        Self::new(20, 2.0)
    }
}

impl Strategy for BollingerReversion {
    fn name(&self) -> &str {
        "bollinger_reversion"
    }

    fn required_indicators(&self) -> Vec<String> {
        vec![self.lower_column.clone(), self.middle_column.clone()]
    }

    fn evaluate(&self, view: &BarView<'_>, position: Option<&Position>) -> Signal {
        let (Some(lower), Some(middle)) = (
            view.indicator(&self.lower_column),
            view.indicator(&self.middle_column),
        ) else {
            return Signal::Hold;
        };
        let close = view.close();

        match position {
            None if close < lower => Signal::Buy,
            Some(_) if close >= middle => Signal::Sell,
            _ => Signal::Hold,
        }
    }
}
