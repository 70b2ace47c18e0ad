//! Signal scan — what does each strategy say at the most recent bar?
//!
//! The scan replays each strategy over the full series and reads the
//! state of the final bar:
//! - a position opened on the final bar  -> BUY alert
//! - a signal exit on the final bar      -> SELL alert
//! - a held position with a fresh Buy    -> WATCH alert (signal present,
//!   entry rule suppressed because the position is already open)
//!
//! Formatting and delivery (terminal, chat, CSV) belong to the caller;
//! this module only produces plain data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use siglab_core::domain::{BarView, Position, Series};
use siglab_core::engine::{run_replay, EngineConfig};
use siglab_core::strategy::{Signal, Strategy};

/// Kind of alert emitted for the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    Buy,
    Sell,
    Watch,
}

/// One actionable signal at the latest bar of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub symbol: String,
    pub strategy: String,
    pub kind: AlertKind,
    pub date: NaiveDate,
    pub close: f64,
}

/// Scan every strategy against the latest bar of the series.
///
/// Strategies whose replay fails (bad data for their indicator needs) are
/// skipped with a warning — a scan is a best-effort sweep, not a batch
/// that must be complete.
pub fn scan(
    series: &Series,
    strategies: &[Box<dyn Strategy>],
    config: &EngineConfig,
) -> Vec<Alert> {
    strategies
        .iter()
        .filter_map(|strategy| match scan_strategy(series, strategy.as_ref(), config) {
            Ok(alert) => alert,
            Err(err) => {
                warn!(strategy = strategy.name(), %err, "scan skipped strategy");
                None
            }
        })
        .collect()
}

fn scan_strategy(
    series: &Series,
    strategy: &dyn Strategy,
    config: &EngineConfig,
) -> Result<Option<Alert>, siglab_core::engine::EngineError> {
    let result = run_replay(series, strategy, config)?;
    let Some(last_bar) = series.bars.last() else {
        return Ok(None);
    };
    let last_index = series.len() - 1;

    let alert = |kind: AlertKind| {
        Some(Alert {
            symbol: series.symbol.clone(),
            strategy: strategy.name().to_string(),
            kind,
            date: last_bar.date,
            close: last_bar.close,
        })
    };

    // An entry on the final bar shows up as the forced trade opening there.
    if let Some(last_trade) = result.trades.last() {
        if last_trade.was_forced() && last_trade.entry_bar == last_index {
            return Ok(alert(AlertKind::Buy));
        }
        if !last_trade.was_forced() && last_trade.exit_bar == last_index {
            return Ok(alert(AlertKind::Sell));
        }
    }

    // Position carried into the final bar: re-evaluate the strategy there
    // to see whether it is still signalling entry (WATCH).
    if result.forced_exit {
        if let Some(trade) = result.trades.last() {
            let held = Position {
                entry_bar: trade.entry_bar,
                entry_date: trade.entry_date,
                entry_price: trade.entry_price,
                quantity: trade.quantity,
            };
            let view = BarView::new(&series.bars, series.indicators());
            if strategy.evaluate(&view, Some(&held)) == Signal::Buy {
                return Ok(alert(AlertKind::Watch));
            }
        }
    }

    Ok(None)
}
