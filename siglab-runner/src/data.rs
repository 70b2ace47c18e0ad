//! Data loading: CSV input, synthetic fallback, dataset fingerprinting.
//!
//! Real data enters as CSV (`date,open,high,low,close,volume`, ISO dates).
//! The synthetic generator is a seeded random walk for demos and tests —
//! results computed on it carry its hash like any other dataset, so runs
//! stay reproducible either way.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use siglab_core::domain::{Bar, Series};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error in '{path}': {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("bad date '{value}' at data row {row} (expected YYYY-MM-DD)")]
    BadDate { value: String, row: usize },
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

/// Load a bar series from a CSV file with columns
/// `date,open,high,low,close,volume`.
///
/// Ordering and duplicate checks happen in `Series::validate` when the
/// engine runs, not here.
pub fn load_csv(path: &Path, symbol: &str) -> Result<Series, LoadError> {
    let display = path.display().to_string();
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: display.clone(),
        source,
    })?;

    let mut reader = csv::Reader::from_reader(file);
    let mut bars = Vec::new();
    for (row, record) in reader.deserialize::<CsvRow>().enumerate() {
        let record = record.map_err(|source| LoadError::Csv {
            path: display.clone(),
            source,
        })?;
        let date = NaiveDate::parse_from_str(&record.date, "%Y-%m-%d").map_err(|_| {
            LoadError::BadDate {
                value: record.date.clone(),
                row: row + 1,
            }
        })?;
        bars.push(Bar {
            date,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            volume: record.volume,
        });
    }
    Ok(Series::new(symbol, bars))
}

/// Generate a seeded random-walk series: same (symbol, n, seed) always
/// yields the same bars.
pub fn synthetic_series(symbol: &str, n: usize, seed: u64) -> Series {
    let mut rng = StdRng::seed_from_u64(seed);
    let base_date = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    let mut price: f64 = 100.0;
    let bars = (0..n)
        .map(|i| {
            let drift: f64 = rng.gen_range(-2.0..2.2);
            let open = price;
            price = (price + drift).max(5.0);
            let close = price;
            let wick: f64 = rng.gen_range(0.1..1.5);
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + wick,
                low: (open.min(close) - wick).max(1.0),
                close,
                volume: rng.gen_range(500..20_000),
            }
        })
        .collect();
    Series::new(symbol, bars)
}

/// BLAKE3 fingerprint over the symbol and every bar.
///
/// Stamped into each `BacktestResult`: two results with the same hash were
/// computed on identical data.
pub fn dataset_hash(series: &Series) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(series.symbol.as_bytes());
    for bar in &series.bars {
        hasher.update(bar.date.to_string().as_bytes());
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.high.to_le_bytes());
        hasher.update(&bar.low.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
        hasher.update(&bar.volume.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
