//! Risk-fraction position sizer.
//!
//! `size = equity · risk_fraction / stop_distance`. The sizer is
//! unit-agnostic: a fractional stop distance yields a dollar notional, an
//! absolute price distance yields units of the asset.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on the per-trade risk fraction. Anything above this is a
/// misconfiguration, rejected at construction rather than clamped.
pub const MAX_RISK_FRACTION: f64 = 0.1;

#[derive(Debug, Error, PartialEq)]
pub enum SizingError {
    #[error("risk fraction {0} outside (0, {MAX_RISK_FRACTION}]")]
    InvalidRiskFraction(f64),
}

/// Converts equity, risk fraction, and stop distance into a position size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskSizer {
    risk_fraction: f64,
}

impl RiskSizer {
    /// Validates the risk fraction at configuration time: must lie in
    /// `(0, 0.1]`.
    pub fn new(risk_fraction: f64) -> Result<Self, SizingError> {
        if !(risk_fraction > 0.0 && risk_fraction <= MAX_RISK_FRACTION) {
            return Err(SizingError::InvalidRiskFraction(risk_fraction));
        }
        Ok(Self { risk_fraction })
    }

    pub fn risk_fraction(&self) -> f64 {
        self.risk_fraction
    }

    /// Position size for the given equity and stop distance.
    ///
    /// Returns `None` when the stop distance or equity is non-positive (or
    /// NaN) — the caller must skip the trade, not force one through.
    pub fn position_size(&self, equity: f64, stop_distance: f64) -> Option<f64> {
        if !(stop_distance > 0.0) || !(equity > 0.0) {
            return None;
        }
        Some(equity * self.risk_fraction / stop_distance)
    }
}
