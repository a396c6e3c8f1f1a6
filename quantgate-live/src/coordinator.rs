//! Execution coordinator: turns a pending signal into exactly one order,
//! with the breaker consulted inside the same record lock that creates it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::{error, info, warn};

use crate::breaker::CircuitBreaker;
use crate::collaborators::{OrderSink, SignalStore};
use crate::record::{Order, SignalKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// No record for this key.
    NotFound,
    /// Signal already executed or cancelled; nothing to do.
    AlreadyHandled,
    /// Breaker tripped; signal cancelled with the trip reason.
    Cancelled { reason: String },
    /// Order placed and filled, signal executed.
    Filled,
    /// Sink placement failed; order marked failed, signal stays pending.
    Failed,
}

/// Monotonic observability counters, shared across threads.
#[derive(Debug, Default)]
pub struct ExecutionCounters {
    pub attempts: AtomicU64,
    pub fills: AtomicU64,
    pub cancellations: AtomicU64,
    pub failures: AtomicU64,
}

impl ExecutionCounters {
    pub fn summary(&self) -> (u64, u64, u64, u64) {
        (
            self.attempts.load(Ordering::Relaxed),
            self.fills.load(Ordering::Relaxed),
            self.cancellations.load(Ordering::Relaxed),
            self.failures.load(Ordering::Relaxed),
        )
    }
}

pub struct ExecutionCoordinator {
    store: Arc<dyn SignalStore>,
    breaker: Arc<CircuitBreaker>,
    sink: Arc<dyn OrderSink>,
    counters: ExecutionCounters,
}

impl ExecutionCoordinator {
    pub fn new(
        store: Arc<dyn SignalStore>,
        breaker: Arc<CircuitBreaker>,
        sink: Arc<dyn OrderSink>,
    ) -> Self {
        Self {
            store,
            breaker,
            sink,
            counters: ExecutionCounters::default(),
        }
    }

    pub fn counters(&self) -> &ExecutionCounters {
        &self.counters
    }

    /// Execute the signal for `key` at most once.
    ///
    /// The whole decision runs under the store's exclusive record access:
    /// status check, breaker check, order creation, and placement form one
    /// transaction. A second call for the same key is a no-op.
    pub fn execute(&self, key: &SignalKey) -> ExecutionOutcome {
        self.counters.attempts.fetch_add(1, Ordering::Relaxed);

        let mut outcome = ExecutionOutcome::NotFound;
        let found = self.store.with_record(key, &mut |record| {
            if !record.signal.is_pending() {
                outcome = ExecutionOutcome::AlreadyHandled;
                return;
            }

            // Last look at the breaker before any order exists.
            if let Err(trip) = self.breaker.check() {
                record.signal.mark_cancelled(trip.reason.clone());
                outcome = ExecutionOutcome::Cancelled {
                    reason: trip.reason,
                };
                return;
            }

            let mut order = Order::sent(record.signal.key.clone());
            match self.sink.place(&record.signal) {
                Ok(ack) => {
                    order.fill(ack.broker_ref);
                    record.signal.mark_executed();
                    record.order = Some(order);
                    outcome = ExecutionOutcome::Filled;
                }
                Err(e) => {
                    // Signal stays pending; retry policy lives outside.
                    error!("{key}: order placement failed: {e:#}");
                    order.fail();
                    record.order = Some(order);
                    outcome = ExecutionOutcome::Failed;
                }
            }
        });
        if found.is_none() {
            warn!("{key}: no signal record to execute");
            return ExecutionOutcome::NotFound;
        }

        match &outcome {
            ExecutionOutcome::Filled => {
                self.counters.fills.fetch_add(1, Ordering::Relaxed);
                info!("{key}: order filled");
            }
            ExecutionOutcome::Cancelled { reason } => {
                self.counters.cancellations.fetch_add(1, Ordering::Relaxed);
                warn!("{key}: cancelled ({reason})");
            }
            ExecutionOutcome::Failed => {
                self.counters.failures.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use chrono::{TimeZone, Utc};

    use quantgate_core::domain::Side;

    use crate::collaborators::{BrokerAck, SimulatedSink};
    use crate::record::{OrderStatus, Signal, SignalStatus};
    use crate::store::MemorySignalStore;

    struct FailingSink;

    impl OrderSink for FailingSink {
        fn place(&self, _signal: &Signal) -> anyhow::Result<BrokerAck> {
            Err(anyhow!("broker timeout"))
        }
    }

    fn key() -> SignalKey {
        SignalKey::new("XAUUSD", Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap())
    }

    fn seeded_store() -> Arc<MemorySignalStore> {
        let store = Arc::new(MemorySignalStore::new());
        store.get_or_create(Signal::pending(key(), Side::Long, 2_100.0, 3.0, 6.0, 500.0, 0.8));
        store
    }

    fn healthy_breaker() -> Arc<CircuitBreaker> {
        Arc::new(CircuitBreaker::new(10_000.0, 0.03, 5))
    }

    #[test]
    fn double_execute_creates_exactly_one_order() {
        let store = seeded_store();
        let coordinator = ExecutionCoordinator::new(
            store.clone(),
            healthy_breaker(),
            Arc::new(SimulatedSink::new()),
        );

        assert_eq!(coordinator.execute(&key()), ExecutionOutcome::Filled);
        assert_eq!(coordinator.execute(&key()), ExecutionOutcome::AlreadyHandled);

        let record = store.get(&key()).unwrap();
        assert_eq!(record.signal.status, SignalStatus::Executed);
        let order = record.order.unwrap();
        assert_eq!(order.status, OrderStatus::Filled);
        assert!(order.broker_ref.is_some());

        let (attempts, fills, cancels, failures) = coordinator.counters().summary();
        assert_eq!((attempts, fills, cancels, failures), (2, 1, 0, 0));
    }

    #[test]
    fn tripped_breaker_cancels_before_any_order() {
        let store = seeded_store();
        let breaker = healthy_breaker();
        breaker.update_balance(9_000.0); // trips on drawdown
        let coordinator =
            ExecutionCoordinator::new(store.clone(), breaker, Arc::new(SimulatedSink::new()));

        let outcome = coordinator.execute(&key());
        assert!(matches!(outcome, ExecutionOutcome::Cancelled { .. }));

        let record = store.get(&key()).unwrap();
        assert_eq!(record.signal.status, SignalStatus::Cancelled);
        assert!(record.signal.cancel_reason.is_some());
        assert!(record.order.is_none()); // no order was ever created
    }

    #[test]
    fn sink_failure_leaves_signal_pending_for_external_retry() {
        let store = seeded_store();
        let coordinator =
            ExecutionCoordinator::new(store.clone(), healthy_breaker(), Arc::new(FailingSink));

        assert_eq!(coordinator.execute(&key()), ExecutionOutcome::Failed);

        let record = store.get(&key()).unwrap();
        assert_eq!(record.signal.status, SignalStatus::Pending);
        assert_eq!(record.order.unwrap().status, OrderStatus::Failed);

        // A later retry with a working sink succeeds.
        let retry = ExecutionCoordinator::new(
            store.clone(),
            healthy_breaker(),
            Arc::new(SimulatedSink::new()),
        );
        assert_eq!(retry.execute(&key()), ExecutionOutcome::Filled);
        assert_eq!(
            store.get(&key()).unwrap().signal.status,
            SignalStatus::Executed
        );
    }

    #[test]
    fn unknown_key_is_not_found() {
        let coordinator = ExecutionCoordinator::new(
            Arc::new(MemorySignalStore::new()),
            healthy_breaker(),
            Arc::new(SimulatedSink::new()),
        );
        let k = SignalKey::new("EURUSD", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(coordinator.execute(&k), ExecutionOutcome::NotFound);
    }
}
