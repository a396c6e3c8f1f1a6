//! QuantGate Core — deterministic research engine for single-instrument strategies.
//!
//! This crate contains the offline half of the system:
//! - Domain types (bars, trades, equity curve, labels)
//! - Triple-barrier labeler for supervised-learning targets
//! - Risk-fraction position sizer
//! - Event-driven position simulator with stop/target/time exits
//! - Performance metrics (return, Sharpe-like ratio, drawdown)
//! - Indicator math consumed by the live gate (EMA, RSI, ATR, ADX)
//! - Parallel parameter sweeps and CSV artifact export
//!
//! Everything here is pure and single-threaded per call; independent runs
//! are safe to parallelize because no shared mutable state exists.

pub mod config;
pub mod domain;
pub mod export;
pub mod indicators;
pub mod labeling;
pub mod sim;
pub mod sizing;
pub mod sweep;
