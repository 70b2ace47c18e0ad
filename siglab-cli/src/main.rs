//! Siglab CLI — backtest, rank, and scan commands.
//!
//! Commands:
//! - `run` — backtest one strategy over a CSV (or synthetic) series
//! - `rank` — run the builtin battery and print a ranking table
//! - `scan` — report BUY/SELL/WATCH alerts for the latest bar
//! - `synth` — write a seeded synthetic OHLCV CSV for experiments

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use siglab_core::domain::Series;
use siglab_core::indicators::attach_standard;
use siglab_core::strategy::{builtin, Strategy};
use siglab_runner::{
    load_csv, rank_strategies, run_strategy, scan, synthetic_series, write_report_csv,
    write_report_json, write_trades_csv, AlertKind, RunConfig,
};

#[derive(Parser)]
#[command(name = "siglab", about = "Siglab — rule-based signal backtesting lab")]
struct Cli {
    /// Path to a TOML run config. Flags override config values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Backtest one strategy and print its performance summary.
    Run {
        /// Strategy name (see `rank` output for the builtin battery).
        #[arg(long)]
        strategy: String,

        /// CSV file with date,open,high,low,close,volume.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Symbol label for the series.
        #[arg(long)]
        symbol: Option<String>,

        /// Write the trade tape to this CSV file.
        #[arg(long)]
        trades_csv: Option<PathBuf>,
    },
    /// Run the builtin battery and print the ranking table.
    Rank {
        /// CSV file with date,open,high,low,close,volume.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Symbol label for the series.
        #[arg(long)]
        symbol: Option<String>,

        /// Export the full report as CSV.
        #[arg(long)]
        export_csv: Option<PathBuf>,

        /// Export the full report as JSON.
        #[arg(long)]
        export_json: Option<PathBuf>,
    },
    /// Evaluate the battery at the latest bar and print alerts.
    Scan {
        /// CSV file with date,open,high,low,close,volume.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Symbol label for the series.
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Generate a seeded synthetic OHLCV CSV.
    Synth {
        /// Output path.
        #[arg(long, default_value = "synthetic.csv")]
        out: PathBuf,

        /// Number of bars.
        #[arg(long, default_value_t = 500)]
        bars: usize,

        /// RNG seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => RunConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RunConfig::default(),
    };

    match cli.command {
        Commands::Run {
            strategy,
            csv,
            symbol,
            trades_csv,
        } => cmd_run(&config, &strategy, csv, symbol, trades_csv),
        Commands::Rank {
            csv,
            symbol,
            export_csv,
            export_json,
        } => cmd_rank(&config, csv, symbol, export_csv, export_json),
        Commands::Scan { csv, symbol } => cmd_scan(&config, csv, symbol),
        Commands::Synth { out, bars, seed } => cmd_synth(&out, bars, seed),
    }
}

/// Load the series named by flags/config (CSV if given, synthetic
/// otherwise) and attach the standard indicator columns.
fn load_series(
    config: &RunConfig,
    csv: Option<PathBuf>,
    symbol: Option<String>,
) -> Result<Series> {
    let symbol = symbol.unwrap_or_else(|| config.symbol.clone());
    let csv_path = csv.or_else(|| config.csv.clone());

    let mut series = match csv_path {
        Some(path) => load_csv(&path, &symbol)
            .with_context(|| format!("loading bars from {}", path.display()))?,
        None => {
            tracing::info!(%symbol, "no CSV given, using a seeded synthetic series");
            synthetic_series(&symbol, 500, 42)
        }
    };
    attach_standard(&mut series).context("attaching standard indicator columns")?;
    Ok(series)
}

fn find_strategy(name: &str) -> Result<Box<dyn Strategy>> {
    let mut battery = builtin();
    match battery.iter().position(|s| s.name() == name) {
        Some(index) => Ok(battery.swap_remove(index)),
        None => {
            let available: Vec<&str> = battery.iter().map(|s| s.name()).collect();
            bail!(
                "unknown strategy '{name}'; available: {}",
                available.join(", ")
            )
        }
    }
}

fn cmd_run(
    config: &RunConfig,
    strategy_name: &str,
    csv: Option<PathBuf>,
    symbol: Option<String>,
    trades_csv: Option<PathBuf>,
) -> Result<()> {
    let series = load_series(config, csv, symbol)?;
    let strategy = find_strategy(strategy_name)?;
    let engine_config = config.engine_config()?;

    let result = run_strategy(&series, strategy.as_ref(), &engine_config)?;

    println!("symbol:           {}", result.symbol);
    println!("strategy:         {}", result.strategy);
    println!("bars:             {} ({} warm-up)", result.bar_count, result.warmup_bars);
    println!("initial capital:  {:.2}", result.initial_capital);
    println!("final capital:    {:.2}", result.final_capital);
    println!("total return:     {:.2}%", result.metrics.total_return_pct);
    println!("sharpe ratio:     {:.3}", result.metrics.sharpe_ratio);
    println!("max drawdown:     {:.2}%", result.metrics.max_drawdown_pct);
    println!("win rate:         {:.1}%", result.metrics.win_rate * 100.0);
    println!("profit factor:    {}", result.metrics.profit_factor);
    println!("trades:           {}", result.metrics.trade_count);
    if result.forced_exit {
        println!("note: final position was force-closed at the last bar");
    }
    if result.insufficient_capital_holds > 0 {
        println!(
            "note: {} buy signal(s) dropped for insufficient capital",
            result.insufficient_capital_holds
        );
    }

    if let Some(path) = trades_csv {
        write_trades_csv(&path, &result.trades)
            .with_context(|| format!("writing trades to {}", path.display()))?;
        println!("trades written to {}", path.display());
    }
    Ok(())
}

fn cmd_rank(
    config: &RunConfig,
    csv: Option<PathBuf>,
    symbol: Option<String>,
    export_csv: Option<PathBuf>,
    export_json: Option<PathBuf>,
) -> Result<()> {
    let series = load_series(config, csv, symbol)?;
    let engine_config = config.engine_config()?;
    let ranking_config = config.ranking_config()?;
    let strategies = builtin();

    let report = rank_strategies(&series, &strategies, &engine_config, &ranking_config);

    println!(
        "{:<5} {:<22} {:>12} {:>8} {:>10} {:>8} {:>7}",
        "rank", "strategy", "return%", "sharpe", "max_dd%", "win%", "trades"
    );
    for entry in &report.ranked {
        let m = &entry.result.metrics;
        println!(
            "{:<5} {:<22} {:>12.2} {:>8.3} {:>10.2} {:>8.1} {:>7}",
            entry.rank,
            entry.result.strategy,
            m.total_return_pct,
            m.sharpe_ratio,
            m.max_drawdown_pct,
            m.win_rate * 100.0,
            m.trade_count
        );
    }
    for result in &report.insufficient_sample {
        println!(
            "-     {:<22} insufficient sample ({} trades < {})",
            result.strategy, result.metrics.trade_count, report.min_trades
        );
    }
    for failure in &report.failures {
        println!("-     {:<22} failed: {}", failure.strategy, failure.error);
    }

    if let Some(path) = export_csv {
        write_report_csv(&path, &report)
            .with_context(|| format!("writing report to {}", path.display()))?;
        println!("report written to {}", path.display());
    }
    if let Some(path) = export_json {
        write_report_json(&path, &report)
            .with_context(|| format!("writing report to {}", path.display()))?;
        println!("report written to {}", path.display());
    }
    Ok(())
}

fn cmd_scan(config: &RunConfig, csv: Option<PathBuf>, symbol: Option<String>) -> Result<()> {
    let series = load_series(config, csv, symbol)?;
    let engine_config = config.engine_config()?;
    let strategies = builtin();

    let alerts = scan(&series, &strategies, &engine_config);
    if alerts.is_empty() {
        println!("no alerts at the latest bar");
        return Ok(());
    }
    for alert in &alerts {
        let kind = match alert.kind {
            AlertKind::Buy => "BUY",
            AlertKind::Sell => "SELL",
            AlertKind::Watch => "WATCH",
        };
        println!(
            "{:<6} {} {} @ {:.2} ({})",
            kind, alert.symbol, alert.strategy, alert.close, alert.date
        );
    }
    Ok(())
}

fn cmd_synth(out: &PathBuf, bars: usize, seed: u64) -> Result<()> {
    let series = synthetic_series("SYNTH", bars, seed);
    let mut writer = String::from("date,open,high,low,close,volume\n");
    for bar in &series.bars {
        writer.push_str(&format!(
            "{},{:.4},{:.4},{:.4},{:.4},{}\n",
            bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
        ));
    }
    std::fs::write(out, writer).with_context(|| format!("writing {}", out.display()))?;
    println!("wrote {} bars to {}", bars, out.display());
    Ok(())
}
