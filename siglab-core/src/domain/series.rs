//! Series — an ordered bar table with named indicator columns.
//!
//! The series is the engine's only input data structure: OHLCV bars in
//! strict date order plus per-bar indicator columns of the same length.
//! Indicator columns are precomputed once before the replay loop; the
//! engine never recomputes them per bar.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use super::bar::Bar;

/// Malformed input data. Fatal to a single backtest run; the ranking
/// harness catches this per strategy and continues with the rest.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DataError {
    #[error("series '{symbol}' has {len} bars, fewer than the required minimum {min}")]
    TooFewBars { symbol: String, len: usize, min: usize },

    #[error("series '{symbol}' has out-of-order timestamps at bar {index}")]
    OutOfOrderTimestamps { symbol: String, index: usize },

    #[error("series '{symbol}' has a duplicate timestamp at bar {index}")]
    DuplicateTimestamp { symbol: String, index: usize },

    #[error("indicator column '{name}' has length {len}, expected {expected}")]
    ColumnLengthMismatch {
        name: String,
        len: usize,
        expected: usize,
    },

    #[error("required indicator column '{0}' is missing from the series")]
    MissingIndicator(String),
}

/// Container for precomputed indicator columns.
///
/// Built once before the replay loop, then queried by bar index. Values
/// are `f64::NAN` during each indicator's warm-up period.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndicatorColumns {
    columns: HashMap<String, Vec<f64>>,
}

impl IndicatorColumns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.columns.insert(name.into(), values);
    }

    /// Value of a named column at a bar index.
    pub fn get(&self, name: &str, bar_index: usize) -> Option<f64> {
        self.columns
            .get(name)
            .and_then(|v| v.get(bar_index).copied())
    }

    /// Full series for a named column.
    pub fn get_series(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(|v| v.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in arbitrary order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|s| s.as_str())
    }
}

/// Ordered bar sequence for one symbol, with indicator columns attached.
///
/// Immutable to the engine: replay reads bars and columns, never writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    pub symbol: String,
    pub bars: Vec<Bar>,
    indicators: IndicatorColumns,
}

impl Series {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            bars,
            indicators: IndicatorColumns::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn indicators(&self) -> &IndicatorColumns {
        &self.indicators
    }

    /// Attach a named indicator column. The column must have one value per bar.
    pub fn attach(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<(), DataError> {
        let name = name.into();
        if values.len() != self.bars.len() {
            return Err(DataError::ColumnLengthMismatch {
                name,
                len: values.len(),
                expected: self.bars.len(),
            });
        }
        self.indicators.insert(name, values);
        Ok(())
    }

    /// Validate the ordering contract: at least `min_bars` bars, strictly
    /// increasing dates, no duplicates. Gaps (weekends, holidays) are fine.
    pub fn validate(&self, min_bars: usize) -> Result<(), DataError> {
        if self.bars.len() < min_bars {
            return Err(DataError::TooFewBars {
                symbol: self.symbol.clone(),
                len: self.bars.len(),
                min: min_bars,
            });
        }
        for (i, pair) in self.bars.windows(2).enumerate() {
            if pair[1].date == pair[0].date {
                return Err(DataError::DuplicateTimestamp {
                    symbol: self.symbol.clone(),
                    index: i + 1,
                });
            }
            if pair[1].date < pair[0].date {
                return Err(DataError::OutOfOrderTimestamps {
                    symbol: self.symbol.clone(),
                    index: i + 1,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(day: u32, close: f64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        }
    }

    fn sample_series() -> Series {
        Series::new("TEST", vec![bar(2, 100.0), bar(3, 101.0), bar(4, 102.0)])
    }

    #[test]
    fn validate_passes_ordered_series() {
        assert_eq!(sample_series().validate(3), Ok(()));
    }

    #[test]
    fn validate_rejects_short_series() {
        let err = sample_series().validate(10).unwrap_err();
        assert!(matches!(err, DataError::TooFewBars { len: 3, min: 10, .. }));
    }

    #[test]
    fn validate_rejects_duplicate_dates() {
        let mut series = sample_series();
        series.bars[2].date = series.bars[1].date;
        let err = series.validate(1).unwrap_err();
        assert!(matches!(err, DataError::DuplicateTimestamp { index: 2, .. }));
    }

    #[test]
    fn validate_rejects_out_of_order_dates() {
        let mut series = sample_series();
        series.bars.swap(0, 2);
        let err = series.validate(1).unwrap_err();
        assert!(matches!(err, DataError::OutOfOrderTimestamps { .. }));
    }

    #[test]
    fn validate_permits_gaps() {
        let series = Series::new("TEST", vec![bar(2, 100.0), bar(5, 101.0), bar(15, 102.0)]);
        assert_eq!(series.validate(3), Ok(()));
    }

    #[test]
    fn attach_checks_length() {
        let mut series = sample_series();
        assert!(series.attach("sma_2", vec![f64::NAN, 100.5, 101.5]).is_ok());
        let err = series.attach("bad", vec![1.0]).unwrap_err();
        assert!(matches!(err, DataError::ColumnLengthMismatch { len: 1, expected: 3, .. }));
    }

    #[test]
    fn indicator_columns_insert_and_get() {
        let mut cols = IndicatorColumns::new();
        cols.insert("rsi_14", vec![f64::NAN, 55.0, 60.0]);
        assert!(cols.get("rsi_14", 0).unwrap().is_nan());
        assert_eq!(cols.get("rsi_14", 1), Some(55.0));
        assert_eq!(cols.get("rsi_14", 3), None); // out of bounds
        assert_eq!(cols.get("missing", 0), None);
    }
}
