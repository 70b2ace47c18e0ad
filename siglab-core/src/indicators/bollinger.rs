//! Bollinger Bands — moving average +/- standard deviation multiplier.
//!
//! Three bands (separate Indicator instances):
//! - Middle: SMA(close, period)
//! - Upper: middle + mult * stddev(close, period)
//! - Lower: middle - mult * stddev(close, period)
//!
//! Uses population stddev (divide by N).
//! Lookback: period - 1.

use super::Indicator;
use crate::domain::Bar;

/// Which band of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::make(period, multiplier, BollingerBand::Upper, "upper")
    }

    pub fn middle(period: usize, multiplier: f64) -> Self {
        Self::make(period, multiplier, BollingerBand::Middle, "middle")
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::make(period, multiplier, BollingerBand::Lower, "lower")
    }

    fn make(period: usize, multiplier: f64, band: BollingerBand, label: &str) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        Self {
            period,
            multiplier,
            band,
            name: format!("bb_{label}_{period}_{multiplier}"),
        }
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];
        if n < self.period {
            return result;
        }

        for i in (self.period - 1)..n {
            let window = &bars[i + 1 - self.period..=i];
            let mean = window.iter().map(|b| b.close).sum::<f64>() / self.period as f64;
            if mean.is_nan() {
                continue;
            }
            result[i] = match self.band {
                BollingerBand::Middle => mean,
                BollingerBand::Upper | BollingerBand::Lower => {
                    let variance = window
                        .iter()
                        .map(|b| (b.close - mean).powi(2))
                        .sum::<f64>()
                        / self.period as f64;
                    let offset = self.multiplier * variance.sqrt();
                    if self.band == BollingerBand::Upper {
                        mean + offset
                    } else {
                        mean - offset
                    }
                }
            };
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    #[test]
    fn bands_collapse_on_constant_prices() {
        let bars = make_bars(&[100.0; 10]);
        let upper = Bollinger::upper(5, 2.0).compute(&bars);
        let middle = Bollinger::middle(5, 2.0).compute(&bars);
        let lower = Bollinger::lower(5, 2.0).compute(&bars);
        assert_approx(upper[9], 100.0, 1e-10);
        assert_approx(middle[9], 100.0, 1e-10);
        assert_approx(lower[9], 100.0, 1e-10);
    }

    #[test]
    fn upper_above_middle_above_lower() {
        let closes: Vec<f64> = (0..30)
            .map(|i| 100.0 + (i as f64 * 0.9).sin() * 5.0)
            .collect();
        let bars = make_bars(&closes);
        let upper = Bollinger::upper(10, 2.0).compute(&bars);
        let middle = Bollinger::middle(10, 2.0).compute(&bars);
        let lower = Bollinger::lower(10, 2.0).compute(&bars);
        for i in 9..30 {
            assert!(upper[i] >= middle[i]);
            assert!(middle[i] >= lower[i]);
        }
    }

    #[test]
    fn known_window_values() {
        let bars = make_bars(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        // Window [1..5]: mean 3, population variance 2.
        let middle = Bollinger::middle(5, 2.0).compute(&bars);
        let upper = Bollinger::upper(5, 2.0).compute(&bars);
        assert_approx(middle[4], 3.0, 1e-10);
        assert_approx(upper[4], 3.0 + 2.0 * 2.0_f64.sqrt(), 1e-10);
    }
}
