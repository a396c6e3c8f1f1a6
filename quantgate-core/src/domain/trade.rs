//! Trade — a closed round-trip position produced by the simulator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Long,
    Short,
}

/// Why a position was closed. Exactly one reason per trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    /// Stop price touched (checked before target within a bar).
    Stop,
    /// Target price touched.
    Target,
    /// Maximum holding horizon reached; closed at that bar's close.
    Time,
}

/// A closed simulated position: entry → exit. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub side: Side,

    // ── Entry ──
    pub entry_time: DateTime<Utc>,
    /// Fill price after slippage and commission.
    pub entry_price: f64,

    // ── Exit ──
    pub exit_time: DateTime<Utc>,
    /// Fill price after any exit-side adjustment (stop exits pay slippage).
    pub exit_price: f64,
    pub exit_reason: ExitReason,

    // ── PnL ──
    /// Cost-adjusted fractional return, sign-adjusted for side.
    pub pnl_pct: f64,
    /// Dollar P&L: pnl_pct × notional at entry.
    pub pnl: f64,
    /// Risk-sized notional committed at entry.
    pub notional: f64,

    pub bars_held: usize,
}

impl Trade {
    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }
}
