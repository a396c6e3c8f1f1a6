//! Live trading configuration, TOML-loadable.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use quantgate_core::sizing::MAX_RISK_FRACTION;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("account_balance must be > 0, got {0}")]
    InvalidBalance(f64),
    #[error("risk_per_trade_fraction {0} outside (0, {MAX_RISK_FRACTION}]")]
    InvalidRiskFraction(f64),
    #[error("ml_probability_threshold {0} outside [0, 1]")]
    InvalidThreshold(f64),
    #[error("max_drawdown_fraction {0} outside (0, 1)")]
    InvalidDrawdownLimit(f64),
    #[error("{0} must be > 0")]
    NonPositive(&'static str),
    #[error("toml parse failed: {0}")]
    Parse(String),
}

/// How orders leave the building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Simulated fills, no broker traffic.
    Demo,
    /// Real placement through the injected sink.
    Live,
}

/// Entry-rule thresholds on the execution timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRuleConfig {
    /// Long-window trend indicator period (price must close above its EMA).
    pub trend_window: usize,
    /// RSI period for the momentum-pullback filter.
    pub rsi_period: usize,
    /// Pullback ceiling: RSI must be below this.
    pub rsi_pullback_max: f64,
    /// ADX period for the trend-strength filter.
    pub adx_period: usize,
    /// Strength floor: ADX must be above this.
    pub adx_min: f64,
}

impl Default for EntryRuleConfig {
    fn default() -> Self {
        Self {
            trend_window: 200,
            rsi_period: 14,
            rsi_pullback_max: 45.0,
            adx_period: 14,
            adx_min: 20.0,
        }
    }
}

/// Macro regime gate on the slower timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeConfig {
    pub atr_period: usize,
    /// Minimum absolute volatility (ATR in price units).
    pub min_volatility: f64,
    pub adx_period: usize,
    /// Minimum trend strength.
    pub min_adx: f64,
}

impl Default for RegimeConfig {
    fn default() -> Self {
        Self {
            atr_period: 14,
            min_volatility: 15.0,
            adx_period: 14,
            min_adx: 20.0,
        }
    }
}

/// Full live-pipeline configuration surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingConfig {
    pub account_balance: f64,
    pub risk_per_trade_fraction: f64,
    /// Gate strictness: classifier scores below this abort the cycle.
    pub ml_probability_threshold: f64,
    /// Stop distance = max(stop_floor, price · vol · stop_multiplier).
    pub stop_multiplier: f64,
    pub stop_floor: f64,
    /// Target distance = max(target_floor, price · vol · target_multiplier).
    pub target_multiplier: f64,
    pub target_floor: f64,
    pub max_consecutive_losses: u32,
    pub max_drawdown_fraction: f64,
    pub max_holding_bars: usize,
    pub execution_mode: ExecutionMode,
    #[serde(default)]
    pub entry: EntryRuleConfig,
    #[serde(default)]
    pub regime: RegimeConfig,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            account_balance: 10_000.0,
            risk_per_trade_fraction: 0.0025,
            ml_probability_threshold: 0.60,
            stop_multiplier: 1.5,
            stop_floor: 2.5,
            target_multiplier: 2.0,
            target_floor: 4.0,
            max_consecutive_losses: 5,
            max_drawdown_fraction: 0.03,
            max_holding_bars: 24,
            execution_mode: ExecutionMode::Demo,
            entry: EntryRuleConfig::default(),
            regime: RegimeConfig::default(),
        }
    }
}

impl TradingConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(doc: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(doc).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration. Oversized risk is rejected outright.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.account_balance > 0.0) {
            return Err(ConfigError::InvalidBalance(self.account_balance));
        }
        if !(self.risk_per_trade_fraction > 0.0
            && self.risk_per_trade_fraction <= MAX_RISK_FRACTION)
        {
            return Err(ConfigError::InvalidRiskFraction(
                self.risk_per_trade_fraction,
            ));
        }
        if !(0.0..=1.0).contains(&self.ml_probability_threshold) {
            return Err(ConfigError::InvalidThreshold(self.ml_probability_threshold));
        }
        if !(self.max_drawdown_fraction > 0.0 && self.max_drawdown_fraction < 1.0) {
            return Err(ConfigError::InvalidDrawdownLimit(self.max_drawdown_fraction));
        }
        if !(self.stop_multiplier > 0.0) {
            return Err(ConfigError::NonPositive("stop_multiplier"));
        }
        if !(self.target_multiplier > 0.0) {
            return Err(ConfigError::NonPositive("target_multiplier"));
        }
        if self.max_holding_bars == 0 {
            return Err(ConfigError::NonPositive("max_holding_bars"));
        }
        Ok(())
    }
}
