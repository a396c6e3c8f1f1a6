//! Signal gate: macro regime filter, deterministic entry rule, and the ML
//! gatekeeper, in that order. Stateless per invocation; at most one signal
//! per (asset, timestamp) key comes out the other end.

use std::sync::Arc;

use log::{debug, info, warn};

use quantgate_core::domain::{Bar, Side};
use quantgate_core::indicators::{adx, atr, ema, last_valid, rsi};
use quantgate_core::sizing::RiskSizer;

use crate::collaborators::{Classifier, FeatureProvider, SignalStore};
use crate::config::{ConfigError, TradingConfig};
use crate::record::{Signal, SignalKey};

/// Every way a cycle can end. Only `Emitted` carries a signal; everything
/// else is a logged, non-fatal stop.
#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    /// Not enough history to warm up the indicators.
    InsufficientData,
    /// Macro regime gate failed; standing aside is the point, not an error.
    RegimeBlocked,
    /// Entry rule not satisfied on the latest bar.
    NoEntry,
    /// Classifier score below the configured threshold.
    Rejected { probability: f64 },
    /// A collaborator failed; the cycle is abandoned.
    Unavailable,
    /// Volatility or sizing degenerate; no position can be sized.
    Unsizable,
    /// Signal present in the store. `created` is false when an earlier
    /// invocation for the same key already made it.
    Emitted { signal: Signal, created: bool },
}

pub struct SignalGate {
    config: TradingConfig,
    sizer: RiskSizer,
    features: Arc<dyn FeatureProvider>,
    classifier: Arc<dyn Classifier>,
    store: Arc<dyn SignalStore>,
}

impl SignalGate {
    pub fn new(
        config: TradingConfig,
        features: Arc<dyn FeatureProvider>,
        classifier: Arc<dyn Classifier>,
        store: Arc<dyn SignalStore>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let sizer = RiskSizer::new(config.risk_per_trade_fraction)
            .map_err(|_| ConfigError::InvalidRiskFraction(config.risk_per_trade_fraction))?;
        Ok(Self {
            config,
            sizer,
            features,
            classifier,
            store,
        })
    }

    /// One decision cycle: regime gate, entry rule, classifier, sizing,
    /// idempotent signal creation.
    pub fn evaluate(&self, asset: &str, exec_bars: &[Bar], regime_bars: &[Bar]) -> GateOutcome {
        let entry = &self.config.entry;
        let regime = &self.config.regime;

        let min_exec = entry
            .trend_window
            .max(entry.rsi_period)
            .max(entry.adx_period * 2);
        let min_regime = regime.atr_period.max(regime.adx_period * 2);
        if exec_bars.len() < min_exec || regime_bars.len() < min_regime {
            debug!(
                "{asset}: insufficient history (exec {}, regime {})",
                exec_bars.len(),
                regime_bars.len()
            );
            return GateOutcome::InsufficientData;
        }

        if !self.regime_allows(regime_bars) {
            debug!("{asset}: regime gate blocked entry");
            return GateOutcome::RegimeBlocked;
        }

        let last = &exec_bars[exec_bars.len() - 1];
        if !self.entry_rule(exec_bars, last) {
            return GateOutcome::NoEntry;
        }

        let snapshot = match self.features.snapshot(exec_bars) {
            Ok(s) => s,
            Err(e) => {
                warn!("{asset}: feature provider failed: {e:#}");
                return GateOutcome::Unavailable;
            }
        };
        let probability = match self.classifier.probability(&snapshot.features) {
            Ok(p) => p,
            Err(e) => {
                warn!("{asset}: classifier failed: {e:#}");
                return GateOutcome::Unavailable;
            }
        };
        if probability < self.config.ml_probability_threshold {
            debug!(
                "{asset}: classifier {probability:.3} below threshold {:.3}",
                self.config.ml_probability_threshold
            );
            return GateOutcome::Rejected { probability };
        }

        if !(snapshot.volatility > 0.0) {
            return GateOutcome::Unsizable;
        }
        let price = last.close;
        let stop_distance = (price * snapshot.volatility * self.config.stop_multiplier)
            .max(self.config.stop_floor);
        let target_distance = (price * snapshot.volatility * self.config.target_multiplier)
            .max(self.config.target_floor);
        let position_size = match self
            .sizer
            .position_size(self.config.account_balance, stop_distance)
        {
            Some(size) => size,
            None => return GateOutcome::Unsizable,
        };

        let key = SignalKey::new(asset, last.timestamp);
        let candidate = Signal::pending(
            key,
            Side::Long,
            price,
            stop_distance,
            target_distance,
            position_size,
            probability,
        );
        let (signal, created) = self.store.get_or_create(candidate);
        if created {
            info!(
                "{asset}: signal emitted at {} (p={probability:.3}, stop={stop_distance:.2}, size={position_size:.2})",
                signal.key.timestamp
            );
        } else {
            debug!("{asset}: signal for {} already exists", signal.key);
        }
        GateOutcome::Emitted { signal, created }
    }

    /// Slow-timeframe gate: enough volatility to pay for the trade, enough
    /// trend strength to believe in the direction.
    fn regime_allows(&self, regime_bars: &[Bar]) -> bool {
        let regime = &self.config.regime;
        let atr_now = last_valid(&atr(regime_bars, regime.atr_period));
        let adx_now = last_valid(&adx(regime_bars, regime.adx_period));
        match (atr_now, adx_now) {
            (Some(a), Some(d)) => a >= regime.min_volatility && d >= regime.min_adx,
            _ => false,
        }
    }

    /// Trend-pullback entry: price above the long EMA, RSI pulled back,
    /// trend strength confirmed, and the latest bar closing in direction.
    fn entry_rule(&self, exec_bars: &[Bar], last: &Bar) -> bool {
        let entry = &self.config.entry;
        let closes: Vec<f64> = exec_bars.iter().map(|b| b.close).collect();

        let trend = last_valid(&ema(&closes, entry.trend_window));
        let rsi_now = last_valid(&rsi(&closes, entry.rsi_period));
        let adx_now = last_valid(&adx(exec_bars, entry.adx_period));

        let (trend, rsi_now, adx_now) = match (trend, rsi_now, adx_now) {
            (Some(t), Some(r), Some(d)) => (t, r, d),
            _ => return false,
        };

        last.close > trend
            && rsi_now < entry.rsi_pullback_max
            && adx_now > entry.adx_min
            && last.close > last.open
    }
}
