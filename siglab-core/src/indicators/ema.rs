//! Exponential Moving Average over closes.
//!
//! Seeded with the SMA of the first `period` closes, then
//! EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1], alpha = 2/(period+1).
//! Lookback: period - 1.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }

    /// EMA over an arbitrary value series (used by MACD for its signal line).
    ///
    /// NaN inputs keep the output NaN until a full seed window of valid
    /// values is available.
    pub fn compute_values(period: usize, values: &[f64]) -> Vec<f64> {
        let n = values.len();
        let mut result = vec![f64::NAN; n];

        // First index where a full window of non-NaN values exists.
        let Some(first_valid) = values.iter().position(|v| !v.is_nan()) else {
            return result;
        };
        let seed_end = first_valid + period;
        if seed_end > n {
            return result;
        }
        let seed_window = &values[first_valid..seed_end];
        if seed_window.iter().any(|v| v.is_nan()) {
            return result;
        }

        let mut ema: f64 = seed_window.iter().sum::<f64>() / period as f64;
        result[seed_end - 1] = ema;

        let alpha = 2.0 / (period as f64 + 1.0);
        for i in seed_end..n {
            if values[i].is_nan() {
                return result;
            }
            ema = alpha * values[i] + (1.0 - alpha) * ema;
            result[i] = ema;
        }
        result
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        Self::compute_values(self.period, &closes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    #[test]
    fn ema_seeds_with_sma() {
        let bars = make_bars(&[1.0, 2.0, 3.0, 4.0]);
        let result = Ema::new(3).compute(&bars);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 2.0, 1e-10);
        // alpha = 0.5: 0.5*4 + 0.5*2 = 3.0
        assert_approx(result[3], 3.0, 1e-10);
    }

    #[test]
    fn ema_converges_toward_constant_input() {
        let bars = make_bars(&[100.0; 30]);
        let result = Ema::new(5).compute(&bars);
        assert_approx(result[29], 100.0, 1e-10);
    }

    #[test]
    fn ema_of_values_respects_leading_nans() {
        let values = [f64::NAN, f64::NAN, 1.0, 2.0, 3.0, 4.0];
        let result = Ema::compute_values(3, &values);
        assert!(result[3].is_nan());
        assert_approx(result[4], 2.0, 1e-10);
        assert_approx(result[5], 3.0, 1e-10);
    }
}
