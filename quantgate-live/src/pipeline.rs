//! Cycle glue for the external scheduler: load history, run the gate, hand
//! any pending signal to the coordinator. A cycle degrades and logs; it
//! never panics and never returns an error to the scheduler.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::collaborators::{BarSource, Timeframe};
use crate::coordinator::{ExecutionCoordinator, ExecutionOutcome};
use crate::gate::{GateOutcome, SignalGate};
use crate::record::SignalKey;

/// Bars of history fetched per cycle. Sized for the longest warmup (the
/// 200-bar trend EMA) with slack.
const EXEC_LOOKBACK_BARS: i64 = 400;
const REGIME_LOOKBACK_BARS: i64 = 120;

#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Bar source failed or returned nothing usable.
    DataUnavailable,
    /// The gate stopped the cycle; the inner value says where.
    Blocked(GateOutcome),
    /// A signal reached the coordinator.
    Executed {
        key: SignalKey,
        outcome: ExecutionOutcome,
    },
}

pub struct DecisionPipeline {
    asset: String,
    exec_timeframe: Timeframe,
    regime_timeframe: Timeframe,
    bars: Arc<dyn BarSource>,
    gate: SignalGate,
    coordinator: ExecutionCoordinator,
}

impl DecisionPipeline {
    pub fn new(
        asset: impl Into<String>,
        exec_timeframe: Timeframe,
        regime_timeframe: Timeframe,
        bars: Arc<dyn BarSource>,
        gate: SignalGate,
        coordinator: ExecutionCoordinator,
    ) -> Self {
        Self {
            asset: asset.into(),
            exec_timeframe,
            regime_timeframe,
            bars,
            gate,
            coordinator,
        }
    }

    pub fn coordinator(&self) -> &ExecutionCoordinator {
        &self.coordinator
    }

    /// One scheduler tick for this asset.
    pub fn run_cycle(&self, now: DateTime<Utc>) -> CycleOutcome {
        let exec_bars = match self.bars.query(
            &self.asset,
            self.exec_timeframe,
            now - self.exec_timeframe.bar_duration() * (EXEC_LOOKBACK_BARS as i32),
            now,
        ) {
            Ok(bars) => bars,
            Err(e) => {
                warn!("{}: {} bar query failed: {e:#}", self.asset, self.exec_timeframe);
                return CycleOutcome::DataUnavailable;
            }
        };
        let regime_bars = match self.bars.query(
            &self.asset,
            self.regime_timeframe,
            now - self.regime_timeframe.bar_duration() * (REGIME_LOOKBACK_BARS as i32),
            now,
        ) {
            Ok(bars) => bars,
            Err(e) => {
                warn!(
                    "{}: {} bar query failed: {e:#}",
                    self.asset, self.regime_timeframe
                );
                return CycleOutcome::DataUnavailable;
            }
        };

        match self.gate.evaluate(&self.asset, &exec_bars, &regime_bars) {
            GateOutcome::Emitted { signal, created } => {
                if created {
                    info!("{}: executing new signal {}", self.asset, signal.key);
                }
                // Idempotent: re-running an existing pending signal is safe,
                // and a still-pending signal from a failed placement gets
                // its externally-scheduled retry here.
                let outcome = self.coordinator.execute(&signal.key);
                CycleOutcome::Executed {
                    key: signal.key,
                    outcome,
                }
            }
            blocked => CycleOutcome::Blocked(blocked),
        }
    }
}
