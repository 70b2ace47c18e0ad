//! Siglab Runner — orchestration on top of `siglab-core`.
//!
//! This crate turns raw replays into comparable, exportable results:
//! - Performance analyzer (pure metric functions)
//! - Single-backtest runner producing `BacktestResult`
//! - Strategy ranking harness (rayon-parallel, failure-tolerant)
//! - CSV loading, seeded synthetic data, dataset fingerprinting
//! - Latest-bar signal scan (BUY/SELL/WATCH alerts)
//! - CSV/JSON report export
//! - TOML run configuration

pub mod config;
pub mod data;
pub mod export;
pub mod metrics;
pub mod ranking;
pub mod runner;
pub mod scan;

pub use config::{ConfigError, RunConfig};
pub use data::{dataset_hash, load_csv, synthetic_series, LoadError};
pub use export::{write_report_csv, write_report_json, write_trades_csv, ExportError};
pub use metrics::PerformanceMetrics;
pub use ranking::{
    rank_strategies, RankedResult, RankingConfig, RankingMetric, RankingReport, StrategyFailure,
};
pub use runner::{run_strategy, BacktestResult};
pub use scan::{scan, Alert, AlertKind};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn performance_metrics_is_send_sync() {
        assert_send::<PerformanceMetrics>();
        assert_sync::<PerformanceMetrics>();
    }

    #[test]
    fn backtest_result_is_send_sync() {
        assert_send::<BacktestResult>();
        assert_sync::<BacktestResult>();
    }

    #[test]
    fn ranking_types_are_send_sync() {
        assert_send::<RankingConfig>();
        assert_sync::<RankingConfig>();
        assert_send::<RankingReport>();
        assert_sync::<RankingReport>();
        assert_send::<RankingMetric>();
        assert_sync::<RankingMetric>();
    }

    #[test]
    fn alert_is_send_sync() {
        assert_send::<Alert>();
        assert_sync::<Alert>();
    }

    #[test]
    fn run_config_is_send_sync() {
        assert_send::<RunConfig>();
        assert_sync::<RunConfig>();
    }
}
