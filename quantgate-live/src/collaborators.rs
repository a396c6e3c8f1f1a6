//! Contracts for everything the pipeline does not own: market data,
//! features, the classifier, the broker, and signal persistence.
//!
//! Failure types at these seams are implementation-defined, so the traits
//! speak `anyhow::Result`; the pipeline converts failures into logged,
//! non-fatal cycle outcomes.

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quantgate_core::domain::Bar;

use crate::record::{Order, Signal, SignalKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    M15,
    H1,
    H4,
    D1,
}

impl Timeframe {
    pub fn bar_duration(&self) -> chrono::Duration {
        match self {
            Timeframe::M15 => chrono::Duration::minutes(15),
            Timeframe::H1 => chrono::Duration::hours(1),
            Timeframe::H4 => chrono::Duration::hours(4),
            Timeframe::D1 => chrono::Duration::days(1),
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Timeframe::M15 => "M15",
            Timeframe::H1 => "H1",
            Timeframe::H4 => "H4",
            Timeframe::D1 => "D1",
        };
        f.write_str(s)
    }
}

/// Time-ordered bar history. An empty range is an error by contract, not an
/// empty vec.
pub trait BarSource: Send + Sync {
    fn query(
        &self,
        asset: &str,
        timeframe: Timeframe,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Bar>>;
}

/// Latest feature row plus the volatility estimate the gate sizes barriers
/// with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSnapshot {
    pub timestamp: DateTime<Utc>,
    /// Fractional per-bar volatility estimate.
    pub volatility: f64,
    pub features: Vec<f64>,
}

pub trait FeatureProvider: Send + Sync {
    fn snapshot(&self, bars: &[Bar]) -> Result<FeatureSnapshot>;
}

/// Pure scoring contract: feature row in, probability in [0, 1] out.
pub trait Classifier: Send + Sync {
    fn probability(&self, features: &[f64]) -> Result<f64>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerAck {
    pub broker_ref: String,
}

pub trait OrderSink: Send + Sync {
    fn place(&self, signal: &Signal) -> Result<BrokerAck>;
}

/// Immediate synthetic fills for demo mode. No broker traffic.
#[derive(Debug, Default)]
pub struct SimulatedSink {
    next_ref: AtomicU64,
}

impl SimulatedSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderSink for SimulatedSink {
    fn place(&self, _signal: &Signal) -> Result<BrokerAck> {
        let n = self.next_ref.fetch_add(1, Ordering::Relaxed);
        Ok(BrokerAck {
            broker_ref: format!("sim-{n}"),
        })
    }
}

/// A signal together with its at-most-one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub signal: Signal,
    pub order: Option<Order>,
}

impl SignalRecord {
    pub fn new(signal: Signal) -> Self {
        Self {
            signal,
            order: None,
        }
    }
}

/// Persistence seam for signal records.
///
/// `with_record` grants exclusive access for the whole closure, which is the
/// coordinator's transactional boundary: status check, breaker check, and
/// order creation all happen inside one call.
pub trait SignalStore: Send + Sync {
    /// Idempotent creation: returns the stored signal for this key and
    /// whether this call created it.
    fn get_or_create(&self, signal: Signal) -> (Signal, bool);

    /// Run `f` with exclusive access to the record; `None` if the key is
    /// unknown.
    fn with_record(
        &self,
        key: &SignalKey,
        f: &mut dyn FnMut(&mut SignalRecord),
    ) -> Option<()>;

    fn get(&self, key: &SignalKey) -> Option<SignalRecord>;
}
