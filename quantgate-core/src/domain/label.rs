//! Label — barrier-outcome ground truth for supervised training.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Binary outcome label for one bar: 1 if the profit barrier was touched
/// strictly before the loss barrier within the horizon AND the potential
/// edge cleared the minimum-return threshold; 0 otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub timestamp: DateTime<Utc>,
    pub value: u8,
}

impl Label {
    pub fn positive(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            value: 1,
        }
    }

    pub fn negative(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            value: 0,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.value == 1
    }
}
