//! Domain types for QuantGate.

pub mod bar;
pub mod equity;
pub mod label;
pub mod trade;

pub use bar::Bar;
pub use equity::{EquityCurve, EquityPoint};
pub use label::Label;
pub use trade::{ExitReason, Side, Trade};

/// Symbol type alias
pub type Symbol = String;
