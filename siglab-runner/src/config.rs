//! Run configuration — a TOML file with every knob explicit.
//!
//! There are no module-level defaults anywhere in the engine; what you
//! see in this struct (and its serde defaults, listed on each field) is
//! the entire configuration surface of a run.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use siglab_core::engine::EngineConfig;

use crate::ranking::{RankingConfig, RankingMetric};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid engine parameter: {0}")]
    Engine(#[from] siglab_core::engine::ConfigError),

    #[error("{0}")]
    BadMetric(String),
}

/// A complete run configuration.
///
/// ```toml
/// symbol = "SPY"
/// csv = "data/spy.csv"
/// initial_capital = 10000.0
/// commission = 1.0
/// slippage = 0.001
/// min_trades = 5
/// metric = "total_return"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Symbol label for results. Default: "SYNTH".
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// CSV file with `date,open,high,low,close,volume`. When absent, the
    /// CLI falls back to a seeded synthetic series.
    #[serde(default)]
    pub csv: Option<PathBuf>,

    /// Default: 10_000.
    #[serde(default = "default_capital")]
    pub initial_capital: f64,

    /// Currency units per fill. Default: 0.
    #[serde(default)]
    pub commission: f64,

    /// Fraction of the close per fill. Default: 0.
    #[serde(default)]
    pub slippage: f64,

    /// Minimum series length the engine accepts. Default: 30.
    #[serde(default = "default_min_bars")]
    pub min_bars: usize,

    /// Sharpe annualization factor. Default: 252 (daily bars).
    #[serde(default = "default_periods")]
    pub trading_periods_per_year: u32,

    /// Results with fewer trades are flagged insufficient-sample and
    /// excluded from ranking. Default: 5.
    #[serde(default = "default_min_trades")]
    pub min_trades: usize,

    /// Ranking metric: total_return, sharpe, profit_factor, win_rate, or
    /// max_drawdown. Default: total_return.
    #[serde(default = "default_metric")]
    pub metric: String,
}

fn default_symbol() -> String {
    "SYNTH".to_string()
}
fn default_capital() -> f64 {
    10_000.0
}
fn default_min_bars() -> usize {
    30
}
fn default_periods() -> u32 {
    252
}
fn default_min_trades() -> usize {
    5
}
fn default_metric() -> String {
    "total_return".to_string()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            csv: None,
            initial_capital: default_capital(),
            commission: 0.0,
            slippage: 0.0,
            min_bars: default_min_bars(),
            trading_periods_per_year: default_periods(),
            min_trades: default_min_trades(),
            metric: default_metric(),
        }
    }
}

impl RunConfig {
    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&raw)?;
        config.engine_config()?; // validates engine parameters
        config.ranking_config()?; // validates the metric name
        Ok(config)
    }

    /// Engine parameters for this run, validated.
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let config = EngineConfig {
            initial_capital: self.initial_capital,
            commission: self.commission,
            slippage: self.slippage,
            min_bars: self.min_bars,
            trading_periods_per_year: self.trading_periods_per_year,
        };
        config.validate()?;
        Ok(config)
    }

    /// Ranking parameters for this run, with the metric name resolved.
    pub fn ranking_config(&self) -> Result<RankingConfig, ConfigError> {
        let metric = self
            .metric
            .parse::<RankingMetric>()
            .map_err(ConfigError::BadMetric)?;
        Ok(RankingConfig {
            min_trades: self.min_trades,
            metric,
        })
    }
}
