//! RSI/MACD confluence — oversold entries confirmed by MACD momentum.
//!
//! Buy when RSI is below the oversold threshold while the MACD line is
//! above its signal line (momentum already turning up). Sell when RSI
//! reaches the overbought threshold or MACD momentum flips back down.

use super::{Signal, Strategy};
use crate::domain::{BarView, Position};

#[derive(Debug, Clone)]
pub struct RsiMacd {
    oversold: f64,
    overbought: f64,
    rsi_column: String,
    macd_column: String,
    signal_column: String,
}

impl RsiMacd {
    pub fn new(rsi_period: usize, oversold: f64, overbought: f64) -> Self {
        assert!(oversold < overbought, "oversold must be below overbought");
        Self {
            oversold,
            overbought,
            rsi_column: format!("rsi_{rsi_period}"),
            macd_column: "macd_12_26".to_string(),
            signal_column: "macd_signal_12_26_9".to_string(),
        }
    }
}

impl Default for RsiMacd {
    /// RSI(14), oversold 35, overbought 65.
    fn default() -> Self {
        Self::new(14, 35.0, 65.0)
    }
}

impl Strategy for RsiMacd {
    fn name(&self) -> &str {
        "rsi_macd"
    }

    fn required_indicators(&self) -> Vec<String> {
        vec![
            self.rsi_column.clone(),
            self.macd_column.clone(),
            self.signal_column.clone(),
        ]
    }

    fn evaluate(&self, view: &BarView<'_>, position: Option<&Position>) -> Signal {
        let (Some(rsi), Some(macd), Some(signal)) = (
            view.indicator(&self.rsi_column),
            view.indicator(&self.macd_column),
            view.indicator(&self.signal_column),
        ) else {
            return Signal::Hold;
        };

        match position {
            None if rsi < self.oversold && macd > signal => Signal::Buy,
            Some(_) if rsi > self.overbought || macd < signal => Signal::Sell,
            _ => Signal::Hold,
        }
    }
}
