//! Equity curve — append-only capital snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single capital snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: DateTime<Utc>,
    pub capital: f64,
}

/// Append-only equity series, monotonically ordered by time.
///
/// Points are never revised retroactively; a push with a timestamp earlier
/// than the last recorded point is rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquityCurve {
    points: Vec<EquityPoint>,
}

impl EquityCurve {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Seed the curve with the starting capital at the given instant.
    pub fn with_initial(timestamp: DateTime<Utc>, capital: f64) -> Self {
        Self {
            points: vec![EquityPoint { timestamp, capital }],
        }
    }

    /// Append a snapshot. Returns false (and records nothing) if the
    /// timestamp would break monotonic ordering.
    pub fn push(&mut self, timestamp: DateTime<Utc>, capital: f64) -> bool {
        if let Some(last) = self.points.last() {
            if timestamp < last.timestamp {
                return false;
            }
        }
        self.points.push(EquityPoint { timestamp, capital });
        true
    }

    pub fn points(&self) -> &[EquityPoint] {
        &self.points
    }

    pub fn capitals(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.capital).collect()
    }

    pub fn last_capital(&self) -> Option<f64> {
        self.points.last().map(|p| p.capital)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
