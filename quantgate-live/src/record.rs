//! Signal and Order records with forward-only status machines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quantgate_core::domain::Side;

/// Identity of a trading opportunity. One key, at most one `Signal`, ever.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignalKey {
    pub asset: String,
    pub timestamp: DateTime<Utc>,
}

impl SignalKey {
    pub fn new(asset: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            asset: asset.into(),
            timestamp,
        }
    }
}

impl std::fmt::Display for SignalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.asset, self.timestamp.to_rfc3339())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalStatus {
    Pending,
    Executed,
    Cancelled,
}

/// A candidate trade instruction produced by the gate.
///
/// Status moves forward only: `Pending → Executed` or `Pending → Cancelled`.
/// A signal is never reopened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub key: SignalKey,
    pub side: Side,
    pub entry_estimate: f64,
    pub stop_distance: f64,
    pub target_distance: f64,
    pub position_size: f64,
    pub ml_probability: f64,
    pub status: SignalStatus,
    pub cancel_reason: Option<String>,
}

impl Signal {
    pub fn pending(
        key: SignalKey,
        side: Side,
        entry_estimate: f64,
        stop_distance: f64,
        target_distance: f64,
        position_size: f64,
        ml_probability: f64,
    ) -> Self {
        Self {
            key,
            side,
            entry_estimate,
            stop_distance,
            target_distance,
            position_size,
            ml_probability,
            status: SignalStatus::Pending,
            cancel_reason: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == SignalStatus::Pending
    }

    /// Forward transition only; a non-pending signal is left untouched.
    pub(crate) fn mark_executed(&mut self) {
        if self.status == SignalStatus::Pending {
            self.status = SignalStatus::Executed;
        }
    }

    pub(crate) fn mark_cancelled(&mut self, reason: impl Into<String>) {
        if self.status == SignalStatus::Pending {
            self.status = SignalStatus::Cancelled;
            self.cancel_reason = Some(reason.into());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Sent,
    Filled,
    Rejected,
    Failed,
}

/// Record of one execution attempt, owned 1:1 by its signal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub signal_key: SignalKey,
    pub status: OrderStatus,
    pub broker_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn sent(signal_key: SignalKey) -> Self {
        Self {
            signal_key,
            status: OrderStatus::Sent,
            broker_ref: None,
            created_at: Utc::now(),
        }
    }

    pub(crate) fn fill(&mut self, broker_ref: impl Into<String>) {
        if self.status == OrderStatus::Sent {
            self.status = OrderStatus::Filled;
            self.broker_ref = Some(broker_ref.into());
        }
    }

    pub(crate) fn fail(&mut self) {
        if self.status == OrderStatus::Sent {
            self.status = OrderStatus::Failed;
        }
    }
}
