//! Indicator layer — pure functions from bar history to numeric columns.
//!
//! Indicators are precomputed once and attached to the [`Series`] as named
//! columns before the replay loop; the engine never recomputes them per bar.
//!
//! Multi-series indicators (Bollinger, Donchian, MACD) are exposed as
//! separate named instances per output, keeping the single-series
//! `Indicator` trait unchanged.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod donchian;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod volume_ratio;

pub use adx::Adx;
pub use atr::Atr;
pub use bollinger::{Bollinger, BollingerBand};
pub use donchian::{Donchian, DonchianBand};
pub use ema::Ema;
pub use macd::{Macd, MacdOutput};
pub use rsi::Rsi;
pub use sma::Sma;
pub use volume_ratio::VolumeRatio;

use crate::domain::{Bar, DataError, Series};

/// Trait for indicators.
///
/// Indicators take a full bar series and produce a numeric output series of
/// the same length. The first `lookback()` values are `f64::NAN` (warm-up).
///
/// # Look-ahead contamination guard
/// No indicator value at bar t may depend on price data from bar t+1 or
/// later. Every indicator must pass the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Column name (e.g., "sma_20", "rsi_14").
    fn name(&self) -> &str;

    /// Number of bars before the indicator produces valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    ///
    /// Returns a `Vec<f64>` of the same length as `bars`, NaN for the
    /// first `lookback()` values.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// The explicit table of columns the builtin strategies consume.
///
/// Column names double as the strategy side's `required_indicators()`
/// entries, so the registry and this table must stay in sync.
pub fn standard_columns() -> Vec<Box<dyn Indicator>> {
    vec![
        Box::new(Sma::new(20)),
        Box::new(Sma::new(50)),
        Box::new(Rsi::new(14)),
        Box::new(Macd::line(12, 26)),
        Box::new(Macd::signal_line(12, 26, 9)),
        Box::new(Macd::histogram(12, 26, 9)),
        Box::new(Atr::new(14)),
        Box::new(Adx::new(14)),
        Box::new(Bollinger::upper(20, 2.0)),
        Box::new(Bollinger::middle(20, 2.0)),
        Box::new(Bollinger::lower(20, 2.0)),
        Box::new(Donchian::upper(20)),
        Box::new(Donchian::lower(10)),
        Box::new(VolumeRatio::new(20)),
    ]
}

/// Compute the standard column set and attach it to the series.
pub fn attach_standard(series: &mut Series) -> Result<(), DataError> {
    let bars = series.bars.clone();
    for indicator in standard_columns() {
        let values = indicator.compute(&bars);
        series.attach(indicator.name().to_string(), values)?;
    }
    Ok(())
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev close (or close for the first
/// bar), high = max(open, close) + 1.0, low = min(open, close) - 1.0.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}
