//! MACD — Moving Average Convergence/Divergence.
//!
//! Three outputs (separate Indicator instances, same pattern as the
//! Bollinger bands):
//! - Line: EMA(close, fast) - EMA(close, slow)
//! - Signal: EMA(line, signal_period)
//! - Histogram: line - signal
//!
//! Lookback: slow - 1 for the line, slow + signal_period - 2 for signal
//! and histogram.

use super::ema::Ema;
use super::Indicator;
use crate::domain::Bar;

/// Which MACD output to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdOutput {
    Line,
    Signal,
    Histogram,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal_period: usize,
    output: MacdOutput,
    name: String,
}

impl Macd {
    pub fn line(fast: usize, slow: usize) -> Self {
        assert!(fast >= 1 && slow > fast, "MACD requires 1 <= fast < slow");
        Self {
            fast,
            slow,
            signal_period: 0,
            output: MacdOutput::Line,
            name: format!("macd_{fast}_{slow}"),
        }
    }

    pub fn signal_line(fast: usize, slow: usize, signal_period: usize) -> Self {
        assert!(fast >= 1 && slow > fast, "MACD requires 1 <= fast < slow");
        assert!(signal_period >= 1, "MACD signal period must be >= 1");
        Self {
            fast,
            slow,
            signal_period,
            output: MacdOutput::Signal,
            name: format!("macd_signal_{fast}_{slow}_{signal_period}"),
        }
    }

    pub fn histogram(fast: usize, slow: usize, signal_period: usize) -> Self {
        assert!(fast >= 1 && slow > fast, "MACD requires 1 <= fast < slow");
        assert!(signal_period >= 1, "MACD signal period must be >= 1");
        Self {
            fast,
            slow,
            signal_period,
            output: MacdOutput::Histogram,
            name: format!("macd_hist_{fast}_{slow}_{signal_period}"),
        }
    }

    fn macd_line(&self, bars: &[Bar]) -> Vec<f64> {
        let fast = Ema::new(self.fast).compute(bars);
        let slow = Ema::new(self.slow).compute(bars);
        fast.iter()
            .zip(&slow)
            .map(|(f, s)| {
                if f.is_nan() || s.is_nan() {
                    f64::NAN
                } else {
                    f - s
                }
            })
            .collect()
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.output {
            MacdOutput::Line => self.slow - 1,
            MacdOutput::Signal | MacdOutput::Histogram => self.slow + self.signal_period - 2,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let line = self.macd_line(bars);
        match self.output {
            MacdOutput::Line => line,
            MacdOutput::Signal => Ema::compute_values(self.signal_period, &line),
            MacdOutput::Histogram => {
                let signal = Ema::compute_values(self.signal_period, &line);
                line.iter()
                    .zip(&signal)
                    .map(|(l, s)| {
                        if l.is_nan() || s.is_nan() {
                            f64::NAN
                        } else {
                            l - s
                        }
                    })
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    #[test]
    fn macd_line_zero_on_constant_prices() {
        let bars = make_bars(&[100.0; 40]);
        let result = Macd::line(12, 26).compute(&bars);
        assert!(result[24].is_nan());
        assert_approx(result[25], 0.0, 1e-10);
        assert_approx(result[39], 0.0, 1e-10);
    }

    #[test]
    fn macd_line_positive_in_uptrend() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&closes);
        let result = Macd::line(12, 26).compute(&bars);
        assert!(result[59] > 0.0, "fast EMA should lead in an uptrend");
    }

    #[test]
    fn macd_histogram_is_line_minus_signal() {
        let closes: Vec<f64> = (0..80)
            .map(|i| 100.0 + (i as f64 * 0.35).sin() * 8.0)
            .collect();
        let bars = make_bars(&closes);
        let line = Macd::line(12, 26).compute(&bars);
        let signal = Macd::signal_line(12, 26, 9).compute(&bars);
        let hist = Macd::histogram(12, 26, 9).compute(&bars);
        for i in 0..bars.len() {
            if !hist[i].is_nan() {
                assert_approx(hist[i], line[i] - signal[i], 1e-10);
            }
        }
    }

    #[test]
    fn macd_warmup_lengths() {
        let bars = make_bars(&[100.0; 50]);
        let line = Macd::line(12, 26).compute(&bars);
        let signal = Macd::signal_line(12, 26, 9).compute(&bars);
        assert!(line[..25].iter().all(|v| v.is_nan()));
        assert!(!line[25].is_nan());
        assert!(signal[..33].iter().all(|v| v.is_nan()));
        assert!(!signal[33].is_nan());
    }
}
