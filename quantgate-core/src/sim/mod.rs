//! Position simulator — event-driven replay of entry signals into trades.

pub mod costs;
pub mod engine;
pub mod metrics;

pub use costs::CostModel;
pub use engine::{EntryMark, PositionSimulator, SimResult};
pub use metrics::PerformanceMetrics;
