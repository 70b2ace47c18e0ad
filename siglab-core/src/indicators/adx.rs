//! Average Directional Index (trend strength, 0-100).
//!
//! Wilder's construction: smoothed +DM / -DM over smoothed TR give DI+ and
//! DI-, DX = 100 * |DI+ - DI-| / (DI+ + DI-), and ADX is the Wilder
//! average of DX. Lookback: 2 * period - 1.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    name: String,
}

impl Adx {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ADX period must be >= 1");
        Self {
            period,
            name: format!("adx_{period}"),
        }
    }
}

impl Indicator for Adx {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        2 * self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];
        if n < 2 * self.period {
            return result;
        }

        // Per-bar directional movement and true range (index 0 unused).
        let mut plus_dm = vec![0.0; n];
        let mut minus_dm = vec![0.0; n];
        let mut tr = vec![0.0; n];
        for i in 1..n {
            let up = bars[i].high - bars[i - 1].high;
            let down = bars[i - 1].low - bars[i].low;
            plus_dm[i] = if up > down && up > 0.0 { up } else { 0.0 };
            minus_dm[i] = if down > up && down > 0.0 { down } else { 0.0 };
            let hl = bars[i].high - bars[i].low;
            let hc = (bars[i].high - bars[i - 1].close).abs();
            let lc = (bars[i].low - bars[i - 1].close).abs();
            tr[i] = hl.max(hc).max(lc);
        }

        // Wilder-smoothed sums seeded over the first `period` movements.
        let mut sm_plus: f64 = plus_dm[1..=self.period].iter().sum();
        let mut sm_minus: f64 = minus_dm[1..=self.period].iter().sum();
        let mut sm_tr: f64 = tr[1..=self.period].iter().sum();

        let mut dx = vec![f64::NAN; n];
        dx[self.period] = dx_value(sm_plus, sm_minus, sm_tr);

        for i in (self.period + 1)..n {
            sm_plus = sm_plus - sm_plus / self.period as f64 + plus_dm[i];
            sm_minus = sm_minus - sm_minus / self.period as f64 + minus_dm[i];
            sm_tr = sm_tr - sm_tr / self.period as f64 + tr[i];
            dx[i] = dx_value(sm_plus, sm_minus, sm_tr);
        }

        // ADX: Wilder average of DX, seeded with the mean of the first
        // `period` DX values.
        let seed_start = self.period;
        let seed_end = 2 * self.period - 1;
        let mut adx = dx[seed_start..=seed_end].iter().sum::<f64>() / self.period as f64;
        result[seed_end] = adx;
        for i in (seed_end + 1)..n {
            adx = (adx * (self.period as f64 - 1.0) + dx[i]) / self.period as f64;
            result[i] = adx;
        }
        result
    }
}

fn dx_value(sm_plus: f64, sm_minus: f64, sm_tr: f64) -> f64 {
    if sm_tr == 0.0 {
        return 0.0;
    }
    let di_plus = 100.0 * sm_plus / sm_tr;
    let di_minus = 100.0 * sm_minus / sm_tr;
    let sum = di_plus + di_minus;
    if sum == 0.0 {
        0.0
    } else {
        100.0 * (di_plus - di_minus).abs() / sum
    }
}
