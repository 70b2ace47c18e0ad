//! The bar-by-bar replay loop.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::domain::{BarView, DataError, EquityPoint, ExitReason, Position, Series, Trade};
use crate::engine::config::{ConfigError, EngineConfig};
use crate::engine::tracker;
use crate::strategy::{Signal, Strategy};

/// Errors that abort a single replay run.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] DataError),
}

/// Raw output of one replay: the equity curve, the closed trades, and the
/// run flags. Metric aggregation lives in the runner crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayResult {
    /// One point per bar processed; first point equals initial capital.
    pub equity_curve: Vec<EquityPoint>,
    /// Closed trades in chronological order.
    pub trades: Vec<Trade>,
    pub initial_capital: f64,
    pub final_capital: f64,
    pub bar_count: usize,
    /// Leading bars skipped because a required indicator was still NaN.
    pub warmup_bars: usize,
    /// True when the final bar force-closed an open position.
    pub forced_exit: bool,
    /// Buy signals dropped because capital could not fill them.
    pub insufficient_capital_holds: usize,
}

/// Replay one strategy over one series.
///
/// Deterministic: same series, strategy, and config always produce the
/// same result. The strategy is evaluated on a prefix-slice [`BarView`],
/// so it cannot observe bars after the one being processed.
pub fn run_replay(
    series: &Series,
    strategy: &dyn Strategy,
    config: &EngineConfig,
) -> Result<ReplayResult, EngineError> {
    config.validate()?;
    series.validate(config.min_bars.max(1))?;

    let required = strategy.required_indicators();
    for name in &required {
        if !series.indicators().contains(name) {
            return Err(DataError::MissingIndicator(name.clone()).into());
        }
    }

    let bars = &series.bars;
    let mut capital = config.initial_capital;
    let mut position: Option<Position> = None;
    let mut trades: Vec<Trade> = Vec::new();
    let mut equity_curve: Vec<EquityPoint> = Vec::with_capacity(bars.len());
    let mut insufficient_capital_holds = 0usize;
    let mut first_ready: Option<usize> = None;

    for (i, bar) in bars.iter().enumerate() {
        let ready = required
            .iter()
            .all(|name| series.indicators().get(name, i).is_some_and(|v| !v.is_nan()));

        if ready {
            first_ready.get_or_insert(i);
            let view = BarView::new(&bars[..=i], series.indicators());
            let signal = strategy.evaluate(&view, position.as_ref());

            // Buy while open and Sell while flat fall through as no-ops;
            // Hold is Hold.
            match signal {
                Signal::Buy if position.is_none() => {
                    match tracker::open_position(
                        i,
                        bar.date,
                        bar.close,
                        capital,
                        config.commission,
                        config.slippage,
                    ) {
                        Ok(opened) => position = Some(opened),
                        Err(err) => {
                            warn!(
                                strategy = strategy.name(),
                                symbol = %series.symbol,
                                bar = i,
                                %err,
                                "buy signal dropped, treating as hold"
                            );
                            insufficient_capital_holds += 1;
                        }
                    }
                }
                Signal::Sell => {
                    if let Some(open) = position.take() {
                        let trade = tracker::close_position(
                            &open,
                            i,
                            bar.date,
                            bar.close,
                            config.commission,
                            config.slippage,
                            ExitReason::Signal,
                        );
                        capital += trade.net_pnl;
                        trades.push(trade);
                    }
                }
                _ => {}
            }
        }

        let equity = match &position {
            Some(open) => open.market_value(bar.close),
            None => capital,
        };
        equity_curve.push(EquityPoint {
            date: bar.date,
            equity,
        });
    }

    // End of data with a position still open: force-close at the final
    // close and flag it. The last equity point is rewritten to the post-
    // close capital so the curve agrees with final_capital.
    let mut forced_exit = false;
    if let Some(open) = position.take() {
        let last_index = bars.len() - 1;
        let last_bar = &bars[last_index];
        let trade = tracker::close_position(
            &open,
            last_index,
            last_bar.date,
            last_bar.close,
            config.commission,
            config.slippage,
            ExitReason::EndOfData,
        );
        capital += trade.net_pnl;
        trades.push(trade);
        forced_exit = true;
        if let Some(last_point) = equity_curve.last_mut() {
            last_point.equity = capital;
        }
    }

    Ok(ReplayResult {
        equity_curve,
        trades,
        initial_capital: config.initial_capital,
        final_capital: capital,
        bar_count: bars.len(),
        warmup_bars: first_ready.unwrap_or(bars.len()),
        forced_exit,
        insufficient_capital_holds,
    })
}
