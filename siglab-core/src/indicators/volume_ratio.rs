//! Volume ratio — current volume relative to its n-bar average.
//!
//! ratio[t] = volume[t] / mean(volume[t-period+1..=t]).
//! Values above 1.0 mean above-average participation.
//! Lookback: period - 1.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct VolumeRatio {
    period: usize,
    name: String,
}

impl VolumeRatio {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "volume ratio period must be >= 1");
        Self {
            period,
            name: format!("vol_ratio_{period}"),
        }
    }
}

impl Indicator for VolumeRatio {
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

        let mut sum: f64 = bars[..self.period].iter().map(|b| b.volume as f64).sum();
        result[self.period - 1] = ratio(bars[self.period - 1].volume, sum, self.period);

        for i in self.period..n {
            sum += bars[i].volume as f64 - bars[i - self.period].volume as f64;
            result[i] = ratio(bars[i].volume, sum, self.period);
        }
        result
    }
}

fn ratio(volume: u64, window_sum: f64, period: usize) -> f64 {
    let mean = window_sum / period as f64;
    if mean == 0.0 {
        f64::NAN
    } else {
        volume as f64 / mean
    }
}
