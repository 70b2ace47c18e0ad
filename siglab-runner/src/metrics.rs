//! Performance analyzer — pure functions from trades + equity curve to
//! comparable scalar metrics.
//!
//! Every metric is a pure function of its explicit inputs; nothing here
//! re-runs the replay. Division-by-zero cases are defined, not panics:
//! zero trades give a 0 win rate, a flat curve gives a 0 Sharpe.

use serde::{Deserialize, Serialize};
use siglab_core::domain::{EquityPoint, Trade};

/// Aggregate performance metrics for a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// (final - initial) / initial * 100.
    pub total_return_pct: f64,
    /// Annualized mean/stdev of per-bar equity returns; 0 when flat.
    pub sharpe_ratio: f64,
    /// Largest peak-to-trough decline as a negative percentage.
    pub max_drawdown_pct: f64,
    /// Fraction of trades with positive net P/L; 0 with no trades.
    pub win_rate: f64,
    /// Gross wins / gross losses. `f64::INFINITY` when there are winners
    /// and no losers — callers must special-case it, it is never silently
    /// collapsed to 0. Zero when there are no trades at all.
    pub profit_factor: f64,
    pub trade_count: usize,
    /// Mean holding duration in bars; 0 with no trades.
    pub avg_holding_bars: f64,
}

impl PerformanceMetrics {
    /// Compute all metrics from one run's outputs.
    pub fn compute(
        equity_curve: &[EquityPoint],
        trades: &[Trade],
        initial_capital: f64,
        periods_per_year: u32,
    ) -> Self {
        Self {
            total_return_pct: total_return_pct(equity_curve, initial_capital),
            sharpe_ratio: sharpe_ratio(equity_curve, periods_per_year),
            max_drawdown_pct: max_drawdown_pct(equity_curve),
            win_rate: win_rate(trades),
            profit_factor: profit_factor(trades),
            trade_count: trades.len(),
            avg_holding_bars: avg_holding_bars(trades),
        }
    }
}

// ─── Individual metric functions ─────────────────────────────────────

/// Total return in percent: (final - initial) / initial * 100.
pub fn total_return_pct(equity_curve: &[EquityPoint], initial_capital: f64) -> f64 {
    let Some(last) = equity_curve.last() else {
        return 0.0;
    };
    if initial_capital <= 0.0 {
        return 0.0;
    }
    (last.equity - initial_capital) / initial_capital * 100.0
}

/// Annualized Sharpe ratio over per-bar equity returns.
///
/// mean(r) / stdev(r) * sqrt(periods_per_year), sample stdev. Returns 0.0
/// (never NaN) for flat or too-short curves.
pub fn sharpe_ratio(equity_curve: &[EquityPoint], periods_per_year: u32) -> f64 {
    let returns = bar_returns(equity_curve);
    if returns.len() < 2 {
        return 0.0;
    }
    let mean = mean(&returns);
    let std = std_dev(&returns);
    if std < 1e-15 {
        return 0.0;
    }
    mean / std * (periods_per_year as f64).sqrt()
}

/// Maximum drawdown as a negative percentage (e.g., -25.0 for a 25%
/// decline). One linear running-maximum pass; 0.0 for monotone curves.
pub fn max_drawdown_pct(equity_curve: &[EquityPoint]) -> f64 {
    if equity_curve.len() < 2 {
        return 0.0;
    }
    let mut peak = equity_curve[0].equity;
    let mut max_dd = 0.0f64;
    for point in equity_curve {
        if point.equity > peak {
            peak = point.equity;
        }
        if peak > 0.0 {
            let dd = (point.equity - peak) / peak * 100.0;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Fraction of trades with positive net P/L. 0.0 with no trades — the
/// insufficient-sample condition is flagged by the ranking harness, never
/// raised here.
pub fn win_rate(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    winners as f64 / trades.len() as f64
}

/// Gross wins / gross losses.
///
/// With winners and no losers this is `f64::INFINITY`: the documented
/// sentinel the caller must special-case. With no trades it is 0.0.
pub fn profit_factor(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let gross_profit: f64 = trades
        .iter()
        .filter(|t| t.net_pnl > 0.0)
        .map(|t| t.net_pnl)
        .sum();
    let gross_loss: f64 = trades
        .iter()
        .filter(|t| t.net_pnl < 0.0)
        .map(|t| t.net_pnl.abs())
        .sum();

    if gross_loss == 0.0 {
        if gross_profit > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    } else {
        gross_profit / gross_loss
    }
}

/// Mean holding duration in bars.
pub fn avg_holding_bars(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    trades.iter().map(|t| t.bars_held as f64).sum::<f64>() / trades.len() as f64
}

// ─── Helpers ─────────────────────────────────────────────────────────

/// Per-bar percentage changes of the equity curve.
pub fn bar_returns(equity_curve: &[EquityPoint]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .map(|w| {
            if w[0].equity > 0.0 {
                (w[1].equity - w[0].equity) / w[0].equity
            } else {
                0.0
            }
        })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use siglab_core::domain::ExitReason;

    fn curve(values: &[f64]) -> Vec<EquityPoint> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &equity)| EquityPoint {
                date: base + chrono::Duration::days(i as i64),
                equity,
            })
            .collect()
    }

    fn make_trade(net_pnl: f64) -> Trade {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        Trade {
            entry_bar: 0,
            entry_date: date,
            entry_price: 100.0,
            exit_bar: 5,
            exit_date: date + chrono::Duration::days(5),
            exit_price: 100.0 + net_pnl / 50.0,
            quantity: 50.0,
            gross_pnl: net_pnl,
            commission: 0.0,
            net_pnl,
            bars_held: 5,
            exit_reason: ExitReason::Signal,
        }
    }

    // ── Total return ──

    #[test]
    fn total_return_positive() {
        let eq = curve(&[10_000.0, 10_500.0, 11_000.0]);
        assert!((total_return_pct(&eq, 10_000.0) - 10.0).abs() < 1e-10);
    }

    #[test]
    fn total_return_negative() {
        let eq = curve(&[10_000.0, 9_000.0]);
        assert!((total_return_pct(&eq, 10_000.0) - (-10.0)).abs() < 1e-10);
    }

    #[test]
    fn total_return_empty_curve() {
        assert_eq!(total_return_pct(&[], 10_000.0), 0.0);
    }

    // ── Drawdown ──

    #[test]
    fn drawdown_known_case() {
        // Peak 120, trough 90: (90-120)/120 * 100 = -25%.
        let eq = curve(&[100.0, 120.0, 90.0, 150.0]);
        assert!((max_drawdown_pct(&eq) - (-25.0)).abs() < 1e-10);
    }

    #[test]
    fn drawdown_monotone_increase_is_zero() {
        let eq = curve(&[100.0, 110.0, 120.0, 130.0]);
        assert_eq!(max_drawdown_pct(&eq), 0.0);
    }

    #[test]
    fn drawdown_is_never_positive() {
        let eq = curve(&[100.0, 95.0, 105.0, 99.0, 110.0]);
        assert!(max_drawdown_pct(&eq) <= 0.0);
    }

    #[test]
    fn drawdown_empty_and_single() {
        assert_eq!(max_drawdown_pct(&[]), 0.0);
        assert_eq!(max_drawdown_pct(&curve(&[100.0])), 0.0);
    }

    // ── Sharpe ──

    #[test]
    fn sharpe_flat_curve_is_zero_not_nan() {
        let eq = curve(&[10_000.0; 50]);
        let s = sharpe_ratio(&eq, 252);
        assert_eq!(s, 0.0);
        assert!(s.is_finite());
    }

    #[test]
    fn sharpe_single_point_is_zero() {
        assert_eq!(sharpe_ratio(&curve(&[10_000.0]), 252), 0.0);
    }

    #[test]
    fn sharpe_positive_for_uptrend_with_noise() {
        let mut values = vec![10_000.0];
        for i in 1..200 {
            let step = if i % 3 == 0 { 0.998 } else { 1.004 };
            values.push(values[i - 1] * step);
        }
        let s = sharpe_ratio(&curve(&values), 252);
        assert!(s > 0.0, "expected positive Sharpe, got {s}");
    }

    #[test]
    fn sharpe_constant_growth_is_zero() {
        // Identical per-bar returns: zero variance.
        let mut values = vec![10_000.0];
        for i in 1..100 {
            values.push(values[i - 1] * 1.001);
        }
        assert_eq!(sharpe_ratio(&curve(&values), 252), 0.0);
    }

    // ── Win rate ──

    #[test]
    fn win_rate_mixed() {
        let trades = vec![
            make_trade(100.0),
            make_trade(-50.0),
            make_trade(75.0),
            make_trade(-25.0),
        ];
        assert!((win_rate(&trades) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn win_rate_no_trades_is_zero() {
        assert_eq!(win_rate(&[]), 0.0);
    }

    // ── Profit factor ──

    #[test]
    fn profit_factor_mixed() {
        let trades = vec![make_trade(500.0), make_trade(-200.0), make_trade(300.0)];
        assert!((profit_factor(&trades) - 4.0).abs() < 1e-10);
    }

    #[test]
    fn profit_factor_no_losers_is_infinite() {
        let trades = vec![make_trade(500.0), make_trade(300.0)];
        assert_eq!(profit_factor(&trades), f64::INFINITY);
    }

    #[test]
    fn profit_factor_all_losers_is_zero() {
        let trades = vec![make_trade(-500.0), make_trade(-300.0)];
        assert_eq!(profit_factor(&trades), 0.0);
    }

    #[test]
    fn profit_factor_no_trades_is_zero() {
        assert_eq!(profit_factor(&[]), 0.0);
    }

    // ── Aggregate ──

    #[test]
    fn compute_with_no_trades_is_finite() {
        let eq = curve(&[10_000.0; 20]);
        let m = PerformanceMetrics::compute(&eq, &[], 10_000.0, 252);
        assert_eq!(m.total_return_pct, 0.0);
        assert_eq!(m.win_rate, 0.0);
        assert_eq!(m.trade_count, 0);
        assert_eq!(m.sharpe_ratio, 0.0);
        assert_eq!(m.profit_factor, 0.0);
        assert_eq!(m.avg_holding_bars, 0.0);
        assert!(m.max_drawdown_pct.is_finite());
    }

    #[test]
    fn compute_with_trades() {
        let eq = curve(&[10_000.0, 10_200.0, 10_100.0, 10_600.0]);
        let trades = vec![make_trade(400.0), make_trade(200.0), make_trade(-100.0)];
        let m = PerformanceMetrics::compute(&eq, &trades, 10_000.0, 252);
        assert!((m.total_return_pct - 6.0).abs() < 1e-10);
        assert_eq!(m.trade_count, 3);
        assert!((m.win_rate - 2.0 / 3.0).abs() < 1e-10);
        assert!((m.profit_factor - 6.0).abs() < 1e-10);
        assert_eq!(m.avg_holding_bars, 5.0);
    }
}
