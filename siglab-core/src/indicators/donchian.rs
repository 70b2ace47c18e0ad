//! Donchian Channel — highest high / lowest low over the *prior* window.
//!
//! Two bands (separate Indicator instances):
//! - Upper: max(high[t-period..t])
//! - Lower: min(low[t-period..t])
//!
//! The window ends at the prior bar, so `close > upper` at bar t is a
//! genuine breakout of the previous `period` bars (a window including the
//! current bar could never be exceeded by its own close).
//! Lookback: period.

use super::Indicator;
use crate::domain::Bar;

/// Which band of the Donchian channel to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonchianBand {
    Upper,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Donchian {
    period: usize,
    band: DonchianBand,
    name: String,
}

impl Donchian {
    pub fn upper(period: usize) -> Self {
        assert!(period >= 1, "Donchian period must be >= 1");
        Self {
            period,
            band: DonchianBand::Upper,
            name: format!("donchian_upper_{period}"),
        }
    }

    pub fn lower(period: usize) -> Self {
        assert!(period >= 1, "Donchian period must be >= 1");
        Self {
            period,
            band: DonchianBand::Lower,
            name: format!("donchian_lower_{period}"),
        }
    }
}

impl Indicator for Donchian {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        for i in self.period..n {
            let window = &bars[i - self.period..i];
            result[i] = match self.band {
                DonchianBand::Upper => window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max),
                DonchianBand::Lower => window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min),
            };
        }
        result
    }
}
