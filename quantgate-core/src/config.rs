//! Serializable simulation configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sizing::MAX_RISK_FRACTION;

/// Unique identifier for a simulation run (content-addressable hash).
pub type RunId = String;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("initial_capital must be > 0, got {0}")]
    InvalidCapital(f64),
    #[error("risk_per_trade_fraction {0} outside (0, {MAX_RISK_FRACTION}]")]
    InvalidRiskFraction(f64),
    #[error("stop_loss_pct must be > 0, got {0}")]
    InvalidStop(f64),
    #[error("take_profit_pct must be > 0, got {0}")]
    InvalidTarget(f64),
    #[error("max_holding_bars must be >= 1")]
    InvalidHorizon,
    #[error("{0} must be >= 0, got {1}")]
    NegativeCost(&'static str, f64),
}

/// All parameters needed to reproduce a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Starting capital in account currency.
    pub initial_capital: f64,
    /// Fraction of equity risked per trade, validated into (0, 0.1].
    pub risk_per_trade_fraction: f64,
    /// Stop distance as a fraction of entry price.
    pub stop_loss_pct: f64,
    /// Target distance as a fraction of entry price.
    pub take_profit_pct: f64,
    /// One-way slippage as a fraction of price.
    pub slippage_pct: f64,
    /// One-way commission as a fraction of price.
    pub commission_pct: f64,
    /// Time exit: maximum bars a position may be held.
    pub max_holding_bars: usize,
    /// Sharpe scaling for the bar frequency (e.g. sqrt(252·24) for H1).
    pub annualization_factor: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            initial_capital: 10_000.0,
            risk_per_trade_fraction: 0.01,
            stop_loss_pct: 0.02,
            take_profit_pct: 0.04,
            slippage_pct: 0.0002,
            commission_pct: 0.0001,
            max_holding_bars: 24,
            annualization_factor: (252.0_f64 * 24.0).sqrt(),
        }
    }
}

impl SimConfig {
    /// Validate all fields. Oversized risk is rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.initial_capital > 0.0) {
            return Err(ConfigError::InvalidCapital(self.initial_capital));
        }
        if !(self.risk_per_trade_fraction > 0.0
            && self.risk_per_trade_fraction <= MAX_RISK_FRACTION)
        {
            return Err(ConfigError::InvalidRiskFraction(
                self.risk_per_trade_fraction,
            ));
        }
        if !(self.stop_loss_pct > 0.0) {
            return Err(ConfigError::InvalidStop(self.stop_loss_pct));
        }
        if !(self.take_profit_pct > 0.0) {
            return Err(ConfigError::InvalidTarget(self.take_profit_pct));
        }
        if self.max_holding_bars == 0 {
            return Err(ConfigError::InvalidHorizon);
        }
        if self.slippage_pct < 0.0 {
            return Err(ConfigError::NegativeCost("slippage_pct", self.slippage_pct));
        }
        if self.commission_pct < 0.0 {
            return Err(ConfigError::NegativeCost(
                "commission_pct",
                self.commission_pct,
            ));
        }
        Ok(())
    }

    /// Deterministic hash ID for this configuration.
    ///
    /// Two runs with identical configs share a RunId, which makes sweep
    /// results content-addressable.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
