//! Transaction cost model: slippage and commission as price fractions.

use serde::{Deserialize, Serialize};

use crate::domain::Side;

/// One-way slippage and commission applied to fills.
///
/// Entries pay both costs (long pays up, short receives less). Stop exits
/// pay slippage only — a stop is a market order racing a moving price.
/// Target and time exits fill at the barrier/close price unadjusted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CostModel {
    pub slippage_pct: f64,
    pub commission_pct: f64,
}

impl CostModel {
    pub fn new(slippage_pct: f64, commission_pct: f64) -> Self {
        Self {
            slippage_pct,
            commission_pct,
        }
    }

    /// Frictionless fills, for tests and idealized runs.
    pub fn free() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Cost-adjusted entry fill from a raw price.
    pub fn entry_price(&self, raw: f64, side: Side) -> f64 {
        let drag = self.slippage_pct + self.commission_pct;
        match side {
            Side::Long => raw * (1.0 + drag),
            Side::Short => raw * (1.0 - drag),
        }
    }

    /// Slippage-adjusted stop exit fill: longs sell below the stop, shorts
    /// buy back above it.
    pub fn stop_exit_price(&self, stop: f64, side: Side) -> f64 {
        match side {
            Side::Long => stop * (1.0 - self.slippage_pct),
            Side::Short => stop * (1.0 + self.slippage_pct),
        }
    }
}
