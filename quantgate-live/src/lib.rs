//! QuantGate Live — the decision/execution half of the system.
//!
//! A periodic scheduler (external) drives one cycle per asset/timeframe:
//! - `SignalGate` evaluates the strategy rule, the macro regime gate, and an
//!   external classifier score, emitting at most one `Signal` per
//!   (asset, timestamp) key
//! - `ExecutionCoordinator` turns a pending `Signal` into exactly one
//!   `Order`, consulting the shared `CircuitBreaker` immediately before
//!   order creation
//! - Collaborators (bar source, feature provider, classifier, order sink,
//!   signal store) are injected trait objects; nothing here talks to a
//!   broker or database directly
//!
//! Failure philosophy: a live cycle logs and degrades, it never panics or
//! propagates a fatal error back to the scheduler.

pub mod breaker;
pub mod collaborators;
pub mod config;
pub mod coordinator;
pub mod gate;
pub mod pipeline;
pub mod record;
pub mod store;

pub use breaker::{BreakerSnapshot, BreakerTripped, CircuitBreaker};
pub use collaborators::{
    BarSource, BrokerAck, Classifier, FeatureProvider, FeatureSnapshot, OrderSink, SignalStore,
    SimulatedSink, Timeframe,
};
pub use config::{ConfigError, TradingConfig};
pub use coordinator::{ExecutionCoordinator, ExecutionCounters, ExecutionOutcome};
pub use gate::{GateOutcome, SignalGate};
pub use pipeline::{CycleOutcome, DecisionPipeline};
pub use record::{Order, OrderStatus, Signal, SignalKey, SignalStatus};
pub use store::MemorySignalStore;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// Compile-time check: the shared live-pipeline types cross thread
    /// boundaries. The scheduler runs cycles for different assets on
    /// different threads against one breaker and one store.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<record::Signal>();
        require_sync::<record::Signal>();
        require_send::<record::Order>();
        require_sync::<record::Order>();
        require_send::<Arc<breaker::CircuitBreaker>>();
        require_sync::<Arc<breaker::CircuitBreaker>>();
        require_send::<Arc<store::MemorySignalStore>>();
        require_sync::<Arc<store::MemorySignalStore>>();
        require_send::<coordinator::ExecutionCounters>();
        require_sync::<coordinator::ExecutionCounters>();
        require_send::<config::TradingConfig>();
        require_sync::<config::TradingConfig>();
    }
}
