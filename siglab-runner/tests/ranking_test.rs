//! Ranking harness behavior: filtering, failure isolation, determinism.

use chrono::NaiveDate;
use siglab_core::domain::{Bar, BarView, Position, Series};
use siglab_core::engine::EngineConfig;
use siglab_core::indicators::attach_standard;
use siglab_core::strategy::{builtin, Signal, Strategy};
use siglab_runner::ranking::{rank_strategies, RankingConfig, RankingMetric};
use siglab_runner::synthetic_series;

fn rising_series(n: usize) -> Series {
    let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let bars = (0..n)
        .map(|i| {
            let close = 100.0 + i as f64;
            let open = if i == 0 { close } else { 100.0 + i as f64 - 1.0 };
            Bar {
                date: base + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect();
    Series::new("RISE", bars)
}

/// Emits Buy/Sell at fixed bar indices under a configurable name.
struct Scripted {
    name: String,
    buys: Vec<usize>,
    sells: Vec<usize>,
}

impl Scripted {
    fn boxed(name: &str, buys: &[usize], sells: &[usize]) -> Box<dyn Strategy> {
        Box::new(Self {
            name: name.to_string(),
            buys: buys.to_vec(),
            sells: sells.to_vec(),
        })
    }
}

impl Strategy for Scripted {
    fn name(&self) -> &str {
        &self.name
    }
    fn required_indicators(&self) -> Vec<String> {
        Vec::new()
    }
    fn evaluate(&self, view: &BarView<'_>, _position: Option<&Position>) -> Signal {
        let i = view.index();
        if self.buys.contains(&i) {
            Signal::Buy
        } else if self.sells.contains(&i) {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }
}

struct NeedsGhostColumn;

impl Strategy for NeedsGhostColumn {
    fn name(&self) -> &str {
        "ghost"
    }
    fn required_indicators(&self) -> Vec<String> {
        vec!["ghost_column".to_string()]
    }
    fn evaluate(&self, _: &BarView<'_>, _: Option<&Position>) -> Signal {
        Signal::Hold
    }
}

#[test]
fn min_trades_filter_separates_ranked_from_insufficient() {
    let series = rising_series(20);
    // A: 5 round trips riding the rise. B: 3 round trips, smaller gain.
    let strategies = vec![
        Scripted::boxed("strategy_a", &[0, 4, 8, 12, 16], &[2, 6, 10, 14, 18]),
        Scripted::boxed("strategy_b", &[1, 5, 9], &[3, 7, 11]),
    ];
    let report = rank_strategies(
        &series,
        &strategies,
        &EngineConfig::frictionless(10_000.0),
        &RankingConfig {
            min_trades: 4,
            metric: RankingMetric::TotalReturn,
        },
    );

    assert_eq!(report.ranked.len(), 1);
    assert_eq!(report.ranked[0].result.strategy, "strategy_a");
    assert_eq!(report.ranked[0].rank, 1);
    assert_eq!(report.ranked[0].result.metrics.trade_count, 5);

    assert_eq!(report.insufficient_sample.len(), 1);
    assert_eq!(report.insufficient_sample[0].strategy, "strategy_b");
    assert_eq!(report.insufficient_sample[0].metrics.trade_count, 3);
    assert!(report.failures.is_empty());
}

#[test]
fn one_failing_strategy_never_aborts_the_batch() {
    let series = rising_series(15);
    let strategies = vec![
        Scripted::boxed("works", &[1], &[5]),
        Box::new(NeedsGhostColumn) as Box<dyn Strategy>,
    ];
    let report = rank_strategies(
        &series,
        &strategies,
        &EngineConfig::frictionless(10_000.0),
        &RankingConfig {
            min_trades: 1,
            metric: RankingMetric::TotalReturn,
        },
    );

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].strategy, "ghost");
    assert!(report.failures[0].error.contains("ghost_column"));
    assert_eq!(report.ranked.len(), 1);
    assert_eq!(report.ranked[0].result.strategy, "works");
}

#[test]
fn zero_trades_is_flagged_not_a_panic() {
    let series = rising_series(15);
    let strategies = vec![Scripted::boxed("sleeper", &[], &[])];
    let report = rank_strategies(
        &series,
        &strategies,
        &EngineConfig::frictionless(10_000.0),
        &RankingConfig::default(),
    );

    assert!(report.ranked.is_empty());
    assert_eq!(report.insufficient_sample.len(), 1);
    let result = &report.insufficient_sample[0];
    assert_eq!(result.metrics.trade_count, 0);
    assert_eq!(result.metrics.win_rate, 0.0);
    assert_eq!(result.metrics.profit_factor, 0.0);
}

#[test]
fn ranking_is_deterministic_across_runs() {
    let mut series = synthetic_series("SYN", 200, 17);
    attach_standard(&mut series).unwrap();
    let config = EngineConfig::frictionless(10_000.0);
    let ranking = RankingConfig {
        min_trades: 0,
        metric: RankingMetric::Sharpe,
    };

    let first = rank_strategies(&series, &builtin(), &config, &ranking);
    let second = rank_strategies(&series, &builtin(), &config, &ranking);

    let order = |report: &siglab_runner::RankingReport| {
        report
            .ranked
            .iter()
            .map(|e| (e.rank, e.result.strategy.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(order(&first), order(&second));
    assert_eq!(
        first.insufficient_sample.len(),
        second.insufficient_sample.len()
    );
}

#[test]
fn equal_metrics_tie_break_on_name() {
    let series = rising_series(12);
    // Identical scripts under different names: identical metrics.
    let strategies = vec![
        Scripted::boxed("zeta", &[1], &[5]),
        Scripted::boxed("alpha", &[1], &[5]),
    ];
    let report = rank_strategies(
        &series,
        &strategies,
        &EngineConfig::frictionless(10_000.0),
        &RankingConfig {
            min_trades: 1,
            metric: RankingMetric::TotalReturn,
        },
    );

    assert_eq!(report.ranked.len(), 2);
    assert_eq!(report.ranked[0].result.strategy, "alpha");
    assert_eq!(report.ranked[1].result.strategy, "zeta");
}

#[test]
fn builtin_battery_end_to_end() {
    let mut series = synthetic_series("SYN", 300, 23);
    attach_standard(&mut series).unwrap();
    let strategies = builtin();
    let report = rank_strategies(
        &series,
        &strategies,
        &EngineConfig::frictionless(10_000.0),
        &RankingConfig {
            min_trades: 1,
            metric: RankingMetric::TotalReturn,
        },
    );

    // Every strategy lands in exactly one bucket.
    let total =
        report.ranked.len() + report.insufficient_sample.len() + report.failures.len();
    assert_eq!(total, strategies.len());
    assert!(report.failures.is_empty(), "standard columns cover the battery");

    // Ranks are 1..=n in order.
    for (i, entry) in report.ranked.iter().enumerate() {
        assert_eq!(entry.rank, i + 1);
    }

    // Capital conservation holds for every completed backtest.
    for result in report
        .ranked
        .iter()
        .map(|e| &e.result)
        .chain(report.insufficient_sample.iter())
    {
        let pnl_sum: f64 = result.trades.iter().map(|t| t.net_pnl).sum();
        assert!(
            (result.final_capital - (result.initial_capital + pnl_sum)).abs() < 1e-6,
            "{}: capital leak",
            result.strategy
        );
    }
}
