//! Strategy layer — pure decision rules over a bar view and position state.
//!
//! A strategy is a pure function: given the current bar's view (prefix
//! history + indicator values) and the open position, it returns Buy, Sell,
//! or Hold. Strategies never see future bars (the view is a prefix slice)
//! and never mutate anything.
//!
//! Dispatch is an explicit registry — [`builtin()`] — not string lookup:
//! each variant is constructed with its documented default parameters.

pub mod abc_wave;
pub mod bollinger_reversion;
pub mod breakout_confirm;
pub mod momentum_breakout;
pub mod rsi_macd;
pub mod trend_follow;

pub use abc_wave::AbcWave;
pub use bollinger_reversion::BollingerReversion;
pub use breakout_confirm::BreakoutConfirm;
pub use momentum_breakout::MomentumBreakout;
pub use rsi_macd::RsiMacd;
pub use trend_follow::TrendFollow;

use crate::domain::{BarView, Position};
use serde::{Deserialize, Serialize};

/// Decision emitted by a strategy at one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

/// Trait for trading strategies.
///
/// # Architecture invariant
/// `evaluate` receives a [`BarView`] built from a prefix slice and the
/// current position. It must be a pure function of those two arguments —
/// no interior mutability, no global state. The engine relies on this for
/// deterministic, reproducible replays.
pub trait Strategy: Send + Sync {
    /// Stable name used in results, rankings, and exports.
    fn name(&self) -> &str;

    /// Indicator columns this strategy reads. Bars where any of these are
    /// NaN are warm-up: the engine skips evaluation there.
    fn required_indicators(&self) -> Vec<String>;

    /// Decide at the view's current bar.
    fn evaluate(&self, view: &BarView<'_>, position: Option<&Position>) -> Signal;
}

/// The builtin strategy battery with default parameters.
///
/// Every entry's `required_indicators()` must resolve against
/// [`crate::indicators::standard_columns()`].
pub fn builtin() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(RsiMacd::default()),
        Box::new(TrendFollow::default()),
        Box::new(BollingerReversion::default()),
        Box::new(MomentumBreakout::default()),
        Box::new(BreakoutConfirm::default()),
        Box::new(AbcWave::default()),
    ]
}
