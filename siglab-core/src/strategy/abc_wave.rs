//! ABC wave pattern — impulse, retracement, breakout continuation.
//!
//! The pattern is three swing points on closes: a swing low A, a swing
//! high B above it, and a retracement swing low C that holds above A while
//! giving back 30-70% of the A-to-B move. Entry is the close breaking
//! above B; the pattern is invalidated (exit) when the close falls back
//! below C.
//!
//! Swing detection uses a symmetric window: a bar is a swing high/low only
//! if it is the strict extreme of its k neighbors on both sides, so a
//! swing is confirmed k bars after it prints. All scanning happens inside
//! the view's history prefix — no future data is reachable.

use super::{Signal, Strategy};
use crate::domain::{BarView, Position};

#[derive(Debug, Clone)]
pub struct AbcWave {
    /// Only patterns whose A lies within this many bars of the current bar
    /// are considered.
    lookback: usize,
    /// Swing window half-width.
    swing: usize,
    /// Fallback stop as a fraction below entry, used if the entry-time
    /// pattern cannot be recovered.
    stop_fraction: f64,
}

impl AbcWave {
    pub fn new(lookback: usize, swing: usize) -> Self {
        assert!(swing >= 1, "swing window must be >= 1");
        assert!(lookback > 4 * swing, "lookback too small for three swings");
        Self {
            lookback,
            swing,
            stop_fraction: 0.05,
        }
    }
}

impl Default for AbcWave {
    /// 40-bar lookback, 2-bar swing window.
    fn default() -> Self {
        Self::new(40, 2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SwingKind {
    High,
    Low,
}

#[derive(Debug, Clone, Copy)]
struct AbcPattern {
    /// Swing high the entry must clear.
    b: f64,
    /// Retracement low; a close below it invalidates the pattern.
    c: f64,
}

/// Swing points of a close series: (index, close, kind).
fn swing_points(closes: &[f64], k: usize) -> Vec<(usize, f64, SwingKind)> {
    let mut swings = Vec::new();
    if closes.len() < 2 * k + 1 {
        return swings;
    }
    for j in k..closes.len() - k {
        let window = &closes[j - k..=j + k];
        let center = closes[j];
        let is_high = window
            .iter()
            .enumerate()
            .all(|(off, &v)| off == k || v < center);
        let is_low = window
            .iter()
            .enumerate()
            .all(|(off, &v)| off == k || v > center);
        if is_high {
            swings.push((j, center, SwingKind::High));
        } else if is_low {
            swings.push((j, center, SwingKind::Low));
        }
    }
    swings
}

/// Most recent completed A-low, B-high, C-low triple satisfying the wave
/// constraints, or None.
fn find_pattern(closes: &[f64], k: usize, lookback: usize) -> Option<AbcPattern> {
    let swings = swing_points(closes, k);

    // Walk backwards: last low is C, the high before it is B, the low
    // before that is A.
    let c_pos = swings.iter().rposition(|s| s.2 == SwingKind::Low)?;
    let c = swings[c_pos].1;
    let b_pos = swings[..c_pos].iter().rposition(|s| s.2 == SwingKind::High)?;
    let b = swings[b_pos].1;
    let a_pos = swings[..b_pos].iter().rposition(|s| s.2 == SwingKind::Low)?;
    let (a_index, a, _) = swings[a_pos];

    if a_index + lookback < closes.len() {
        return None; // pattern too old
    }
    if c <= a || b <= c {
        return None; // C must be a higher low below B
    }
    let retracement = (b - c) / (b - a);
    if !(0.3..=0.7).contains(&retracement) {
        return None;
    }
    Some(AbcPattern { b, c })
}

impl Strategy for AbcWave {
    fn name(&self) -> &str {
        "abc_wave"
    }

    fn required_indicators(&self) -> Vec<String> {
        Vec::new() // pure price action
    }

    fn evaluate(&self, view: &BarView<'_>, position: Option<&Position>) -> Signal {
        let closes: Vec<f64> = view.history().iter().map(|b| b.close).collect();
        if closes.len() < 4 * self.swing + 3 {
            return Signal::Hold;
        }
        let close = view.close();

        match position {
            None => match find_pattern(&closes, self.swing, self.lookback) {
                Some(pattern) if close > pattern.b => Signal::Buy,
                _ => Signal::Hold,
            },
            Some(pos) => {
                // Recover the pattern as it stood at entry; the history
                // prefix up to the entry bar is identical on every replay.
                let entry_end = (pos.entry_bar + 1).min(closes.len());
                let stop = match find_pattern(&closes[..entry_end], self.swing, self.lookback) {
                    Some(pattern) => pattern.c,
                    None => pos.entry_price * (1.0 - self.stop_fraction),
                };
                if close < stop {
                    Signal::Sell
                } else {
                    Signal::Hold
                }
            }
        }
    }
}
