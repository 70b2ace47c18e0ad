//! Siglab Core — domain types, indicator layer, strategy registry, bar replay.
//!
//! This crate contains the deterministic heart of the signal toolkit:
//! - Domain types (bars, series, positions, trades, equity points)
//! - Indicator trait and the standard column set
//! - Strategy trait with an explicit builtin registry
//! - Position/trade tracker (pure open/close arithmetic)
//! - Single-pass bar replay engine with no-lookahead views
//!
//! No I/O, no randomness, no shared mutable state: identical inputs always
//! produce identical `ReplayResult` values.

pub mod domain;
pub mod engine;
pub mod indicators;
pub mod strategy;
