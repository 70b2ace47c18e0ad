//! Report export — ranking tables and trade tapes as CSV/JSON.
//!
//! Every strategy that entered the ranking run appears in the export:
//! ranked rows, insufficient-sample rows (flagged), and failure rows.
//! Exclusions are visible, never dropped.

use std::path::Path;
use thiserror::Error;

use siglab_core::domain::Trade;

use crate::ranking::RankingReport;
use crate::runner::BacktestResult;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write the ranking report as CSV, one row per strategy.
///
/// The `status` column is `ranked`, `insufficient_sample`, or `failed`;
/// an infinite profit factor prints as `inf`.
pub fn write_report_csv(path: &Path, report: &RankingReport) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "rank",
        "status",
        "strategy",
        "symbol",
        "total_return_pct",
        "sharpe_ratio",
        "max_drawdown_pct",
        "win_rate",
        "profit_factor",
        "trades",
        "forced_exit",
    ])?;

    for entry in &report.ranked {
        write_result_row(&mut writer, &entry.rank.to_string(), "ranked", &entry.result)?;
    }
    for result in &report.insufficient_sample {
        write_result_row(&mut writer, "", "insufficient_sample", result)?;
    }
    for failure in &report.failures {
        writer.write_record([
            "",
            "failed",
            failure.strategy.as_str(),
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn write_result_row<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    rank: &str,
    status: &str,
    result: &BacktestResult,
) -> Result<(), ExportError> {
    writer.write_record([
        rank.to_string(),
        status.to_string(),
        result.strategy.clone(),
        result.symbol.clone(),
        format!("{:.4}", result.metrics.total_return_pct),
        format!("{:.4}", result.metrics.sharpe_ratio),
        format!("{:.4}", result.metrics.max_drawdown_pct),
        format!("{:.4}", result.metrics.win_rate),
        format!("{}", result.metrics.profit_factor),
        result.metrics.trade_count.to_string(),
        result.forced_exit.to_string(),
    ])?;
    Ok(())
}

/// Write the full ranking report (all fields, all trades) as pretty JSON.
pub fn write_report_json(path: &Path, report: &RankingReport) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Write a trade tape as CSV.
pub fn write_trades_csv(path: &Path, trades: &[Trade]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "entry_date",
        "exit_date",
        "entry_price",
        "exit_price",
        "quantity",
        "gross_pnl",
        "commission",
        "net_pnl",
        "bars_held",
        "exit_reason",
    ])?;
    for trade in trades {
        let exit_reason = if trade.was_forced() { "end_of_data" } else { "signal" };
        writer.write_record([
            trade.entry_date.to_string(),
            trade.exit_date.to_string(),
            format!("{:.4}", trade.entry_price),
            format!("{:.4}", trade.exit_price),
            format!("{:.6}", trade.quantity),
            format!("{:.4}", trade.gross_pnl),
            format!("{:.4}", trade.commission),
            format!("{:.4}", trade.net_pnl),
            trade.bars_held.to_string(),
            exit_reason.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
