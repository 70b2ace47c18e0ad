//! Replay engine — deterministic single-pass backtest of one strategy
//! over one series.
//!
//! The loop per bar:
//! 1. Skip signal evaluation while any required indicator is NaN (warm-up)
//! 2. Evaluate the strategy on a prefix-slice view (no lookahead)
//! 3. Apply the position transition (tracker arithmetic)
//! 4. Append one mark-to-market equity point
//!
//! At end of data an open position is force-closed at the final close and
//! flagged — open risk is never silently dropped.

pub mod config;
pub mod replay;
pub mod tracker;

pub use config::{ConfigError, EngineConfig};
pub use replay::{run_replay, EngineError, ReplayResult};
pub use tracker::{close_position, open_position, InsufficientCapital};
