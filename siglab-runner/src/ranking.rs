//! Strategy ranking harness — run a battery over one series, rank the
//! survivors.
//!
//! Each strategy is backtested independently (rayon fan-out); a failure in
//! one never aborts the batch. Results below the minimum trade count are
//! retained but flagged as insufficient sample and excluded from ranking.
//! The final order depends only on metric values, never on completion
//! order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use tracing::warn;

use siglab_core::domain::Series;
use siglab_core::engine::EngineConfig;
use siglab_core::strategy::Strategy;

use crate::runner::{run_strategy, BacktestResult};

/// Metric used to order the ranking table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMetric {
    TotalReturn,
    Sharpe,
    ProfitFactor,
    WinRate,
    /// Drawdowns are negative; descending order puts the shallowest first.
    MaxDrawdown,
}

impl RankingMetric {
    /// Extract this metric's value from a result.
    pub fn value(&self, result: &BacktestResult) -> f64 {
        match self {
            Self::TotalReturn => result.metrics.total_return_pct,
            Self::Sharpe => result.metrics.sharpe_ratio,
            Self::ProfitFactor => result.metrics.profit_factor,
            Self::WinRate => result.metrics.win_rate,
            Self::MaxDrawdown => result.metrics.max_drawdown_pct,
        }
    }
}

impl FromStr for RankingMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "total_return" => Ok(Self::TotalReturn),
            "sharpe" => Ok(Self::Sharpe),
            "profit_factor" => Ok(Self::ProfitFactor),
            "win_rate" => Ok(Self::WinRate),
            "max_drawdown" => Ok(Self::MaxDrawdown),
            other => Err(format!(
                "unknown ranking metric '{other}' (expected one of: total_return, sharpe, \
                 profit_factor, win_rate, max_drawdown)"
            )),
        }
    }
}

/// Harness configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Results with fewer trades are flagged and excluded from ranking.
    pub min_trades: usize,
    pub metric: RankingMetric,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            min_trades: 5,
            metric: RankingMetric::TotalReturn,
        }
    }
}

/// A ranked entry: 1-based rank plus the full result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    pub rank: usize,
    pub result: BacktestResult,
}

/// A strategy whose backtest failed (config or data error).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyFailure {
    pub strategy: String,
    pub error: String,
}

/// Output of one ranking run. Nothing is silently dropped: every strategy
/// lands in exactly one of the three lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingReport {
    /// Survivors, best first by the configured metric.
    pub ranked: Vec<RankedResult>,
    /// Backtests that completed with fewer than `min_trades` trades.
    pub insufficient_sample: Vec<BacktestResult>,
    /// Backtests that could not run at all.
    pub failures: Vec<StrategyFailure>,
    pub metric: RankingMetric,
    pub min_trades: usize,
}

/// Backtest every strategy over the series and rank the survivors.
///
/// Strategy evaluations are independent, so they run on rayon workers;
/// the sort afterwards is keyed purely on metric values (ties broken by
/// Sharpe, then by name) and is therefore deterministic.
pub fn rank_strategies(
    series: &Series,
    strategies: &[Box<dyn Strategy>],
    engine_config: &EngineConfig,
    config: &RankingConfig,
) -> RankingReport {
    let outcomes: Vec<(String, Result<BacktestResult, _>)> = strategies
        .par_iter()
        .map(|strategy| {
            (
                strategy.name().to_string(),
                run_strategy(series, strategy.as_ref(), engine_config),
            )
        })
        .collect();

    let mut eligible: Vec<BacktestResult> = Vec::new();
    let mut insufficient_sample: Vec<BacktestResult> = Vec::new();
    let mut failures: Vec<StrategyFailure> = Vec::new();

    for (name, outcome) in outcomes {
        match outcome {
            Ok(result) => {
                if result.metrics.trade_count < config.min_trades {
                    insufficient_sample.push(result);
                } else {
                    eligible.push(result);
                }
            }
            Err(err) => {
                warn!(strategy = %name, error = %err, "backtest failed, continuing batch");
                failures.push(StrategyFailure {
                    strategy: name,
                    error: err.to_string(),
                });
            }
        }
    }

    eligible.sort_by(|a, b| {
        desc(config.metric.value(a), config.metric.value(b))
            .then_with(|| desc(a.metrics.sharpe_ratio, b.metrics.sharpe_ratio))
            .then_with(|| a.strategy.cmp(&b.strategy))
    });

    let ranked = eligible
        .into_iter()
        .enumerate()
        .map(|(i, result)| RankedResult {
            rank: i + 1,
            result,
        })
        .collect();

    RankingReport {
        ranked,
        insufficient_sample,
        failures,
        metric: config.metric,
        min_trades: config.min_trades,
    }
}

/// Descending order with NaN sorted last (worst). +inf sorts first, which
/// is what an infinite profit factor deserves.
fn desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater, // NaN after everything
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
