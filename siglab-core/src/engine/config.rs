//! Engine configuration and its validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid run parameters. Fatal to the run; reported to the caller and
/// never recovered internally.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("initial capital must be positive, got {0}")]
    NonPositiveCapital(f64),

    #[error("commission must be non-negative, got {0}")]
    NegativeCommission(f64),

    #[error("slippage fraction must be in [0, 1), got {0}")]
    SlippageOutOfRange(f64),

    #[error("trading periods per year must be at least 1")]
    ZeroPeriodsPerYear,
}

/// Configuration for a single replay run.
///
/// Replaces any notion of module-level defaults: every knob is explicit
/// here and carried into the run by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub initial_capital: f64,
    /// Currency units charged per fill (entry and exit each pay once).
    pub commission: f64,
    /// Fraction of the close paid as slippage: entries fill at
    /// close * (1 + slippage), exits at close * (1 - slippage).
    pub slippage: f64,
    /// Minimum series length accepted by the engine.
    pub min_bars: usize,
    /// Annualization factor for the Sharpe ratio (daily bars: 252).
    pub trading_periods_per_year: u32,
}

impl EngineConfig {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            initial_capital,
            ..Self::default()
        }
    }

    /// A frictionless config for tests and quick experiments.
    pub fn frictionless(initial_capital: f64) -> Self {
        Self {
            initial_capital,
            commission: 0.0,
            slippage: 0.0,
            min_bars: 2,
            trading_periods_per_year: 252,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.initial_capital > 0.0) {
            return Err(ConfigError::NonPositiveCapital(self.initial_capital));
        }
        if !(self.commission >= 0.0) {
            return Err(ConfigError::NegativeCommission(self.commission));
        }
        if !(0.0..1.0).contains(&self.slippage) {
            return Err(ConfigError::SlippageOutOfRange(self.slippage));
        }
        if self.trading_periods_per_year == 0 {
            return Err(ConfigError::ZeroPeriodsPerYear);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_capital: 10_000.0,
            commission: 0.0,
            slippage: 0.0,
            min_bars: 30,
            trading_periods_per_year: 252,
        }
    }
}
