//! Single-backtest runner: replay one strategy, aggregate its metrics.

use serde::{Deserialize, Serialize};
use siglab_core::domain::{EquityPoint, Series, Trade};
use siglab_core::engine::{run_replay, EngineConfig, EngineError};
use siglab_core::strategy::Strategy;

use crate::data::dataset_hash;
use crate::metrics::PerformanceMetrics;

/// Complete result of one (strategy, series) backtest.
///
/// Immutable after construction; exposes everything the reporting side
/// needs as plain data, no formatting or I/O here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub symbol: String,
    pub strategy: String,
    pub initial_capital: f64,
    pub final_capital: f64,
    pub metrics: PerformanceMetrics,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
    pub bar_count: usize,
    pub warmup_bars: usize,
    /// The final bar force-closed an open position (also visible as the
    /// last trade's exit reason).
    pub forced_exit: bool,
    /// Buy signals dropped for lack of capital during the run.
    pub insufficient_capital_holds: usize,
    /// BLAKE3 fingerprint of the input series, for reproducibility checks.
    pub dataset_hash: String,
}

/// Run one strategy over one series and aggregate metrics.
///
/// The series must already carry the strategy's required indicator
/// columns (see `siglab_core::indicators::attach_standard`).
pub fn run_strategy(
    series: &Series,
    strategy: &dyn Strategy,
    config: &EngineConfig,
) -> Result<BacktestResult, EngineError> {
    let replay = run_replay(series, strategy, config)?;
    let metrics = PerformanceMetrics::compute(
        &replay.equity_curve,
        &replay.trades,
        replay.initial_capital,
        config.trading_periods_per_year,
    );

    Ok(BacktestResult {
        symbol: series.symbol.clone(),
        strategy: strategy.name().to_string(),
        initial_capital: replay.initial_capital,
        final_capital: replay.final_capital,
        metrics,
        trades: replay.trades,
        equity_curve: replay.equity_curve,
        bar_count: replay.bar_count,
        warmup_bars: replay.warmup_bars,
        forced_exit: replay.forced_exit,
        insufficient_capital_holds: replay.insufficient_capital_holds,
        dataset_hash: dataset_hash(series),
    })
}
