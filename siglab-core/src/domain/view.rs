//! BarView — the read-only window a strategy sees at one bar.
//!
//! The engine constructs a view from a *prefix slice* of the series, ending
//! at the bar being evaluated. A strategy holding a `BarView` can reach the
//! current bar and everything before it, and nothing after it: no-lookahead
//! is a property of the borrow, not a convention.

use super::bar::Bar;
use super::series::IndicatorColumns;
use chrono::NaiveDate;

/// Read-only view over `(bars[..=i], indicator columns)` for the bar at
/// index `i` (the last bar of the slice).
#[derive(Debug, Clone, Copy)]
pub struct BarView<'a> {
    bars: &'a [Bar],
    indicators: &'a IndicatorColumns,
}

impl<'a> BarView<'a> {
    /// Build a view whose current bar is the last bar of `bars`.
    ///
    /// `bars` must be a prefix of the series the columns were computed on,
    /// and must be non-empty.
    pub fn new(bars: &'a [Bar], indicators: &'a IndicatorColumns) -> Self {
        assert!(!bars.is_empty(), "BarView requires at least one bar");
        Self { bars, indicators }
    }

    /// Index of the current bar within the series.
    pub fn index(&self) -> usize {
        self.bars.len() - 1
    }

    /// The current bar.
    pub fn bar(&self) -> &Bar {
        &self.bars[self.bars.len() - 1]
    }

    pub fn date(&self) -> NaiveDate {
        self.bar().date
    }

    pub fn open(&self) -> f64 {
        self.bar().open
    }

    pub fn high(&self) -> f64 {
        self.bar().high
    }

    pub fn low(&self) -> f64 {
        self.bar().low
    }

    pub fn close(&self) -> f64 {
        self.bar().close
    }

    pub fn volume(&self) -> u64 {
        self.bar().volume
    }

    /// All bars up to and including the current one.
    pub fn history(&self) -> &'a [Bar] {
        self.bars
    }

    /// Indicator value at the current bar. `None` when the column is
    /// missing or the value is NaN (warm-up).
    pub fn indicator(&self, name: &str) -> Option<f64> {
        self.indicators
            .get(name, self.index())
            .filter(|v| !v.is_nan())
    }

    /// Indicator value `bars_back` bars before the current one.
    ///
    /// `bars_back = 0` is the current bar. `None` when the offset reaches
    /// before the start of the series, the column is missing, or the value
    /// is NaN.
    pub fn indicator_back(&self, name: &str, bars_back: usize) -> Option<f64> {
        let idx = self.index().checked_sub(bars_back)?;
        self.indicators.get(name, idx).filter(|v| !v.is_nan())
    }

    /// Close price `bars_back` bars before the current one.
    pub fn close_back(&self, bars_back: usize) -> Option<f64> {
        let idx = self.index().checked_sub(bars_back)?;
        self.bars.get(idx).map(|b| b.close)
    }
}
