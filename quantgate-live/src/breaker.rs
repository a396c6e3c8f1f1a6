//! Shared circuit breaker. Injected and mutex-guarded; there is no global
//! instance anywhere in the crate.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("circuit breaker tripped: {reason}")]
pub struct BreakerTripped {
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakerSnapshot {
    pub is_tripped: bool,
    pub reason: Option<String>,
    pub consecutive_losses: u32,
    pub tripped_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct BreakerState {
    is_tripped: bool,
    reason: Option<String>,
    consecutive_losses: u32,
    tripped_at: Option<DateTime<Utc>>,
}

/// Two independent trip conditions: account drawdown and a consecutive-loss
/// streak. Once tripped, only an explicit operator `reset()` recovers.
///
/// The loss streak depends on `record_realized_pnl` being fed from a
/// realized-P&L stream; without that feed the condition never trips.
#[derive(Debug)]
pub struct CircuitBreaker {
    initial_balance: f64,
    max_drawdown_fraction: f64,
    max_consecutive_losses: u32,
    state: Mutex<BreakerState>,
}

impl CircuitBreaker {
    pub fn new(
        initial_balance: f64,
        max_drawdown_fraction: f64,
        max_consecutive_losses: u32,
    ) -> Self {
        Self {
            initial_balance,
            max_drawdown_fraction,
            max_consecutive_losses,
            state: Mutex::new(BreakerState::default()),
        }
    }

    /// Fails iff the breaker is tripped, and only then.
    pub fn check(&self) -> Result<(), BreakerTripped> {
        let state = self.lock();
        if state.is_tripped {
            Err(BreakerTripped {
                reason: state
                    .reason
                    .clone()
                    .unwrap_or_else(|| "unspecified".to_string()),
            })
        } else {
            Ok(())
        }
    }

    /// Re-evaluate the drawdown condition against the current balance.
    pub fn update_balance(&self, current_balance: f64) {
        if self.initial_balance <= 0.0 {
            return;
        }
        let drawdown = (self.initial_balance - current_balance) / self.initial_balance;
        if drawdown >= self.max_drawdown_fraction {
            self.trip(format!(
                "drawdown {:.2}% >= limit {:.2}%",
                drawdown * 100.0,
                self.max_drawdown_fraction * 100.0
            ));
        }
    }

    /// Realized-P&L feedback hook for the consecutive-loss condition.
    pub fn record_realized_pnl(&self, pnl: f64) {
        let mut state = self.lock();
        if pnl < 0.0 {
            state.consecutive_losses += 1;
            if state.consecutive_losses >= self.max_consecutive_losses && !state.is_tripped {
                let losses = state.consecutive_losses;
                Self::trip_locked(&mut state, format!("{losses} consecutive losses"));
            }
        } else {
            state.consecutive_losses = 0;
        }
    }

    /// Operator action. Nothing in the pipeline calls this.
    pub fn reset(&self) {
        let mut state = self.lock();
        *state = BreakerState::default();
    }

    pub fn snapshot(&self) -> BreakerSnapshot {
        let state = self.lock();
        BreakerSnapshot {
            is_tripped: state.is_tripped,
            reason: state.reason.clone(),
            consecutive_losses: state.consecutive_losses,
            tripped_at: state.tripped_at,
        }
    }

    fn trip(&self, reason: String) {
        let mut state = self.lock();
        if !state.is_tripped {
            Self::trip_locked(&mut state, reason);
        }
    }

    fn trip_locked(state: &mut BreakerState, reason: String) {
        warn!("circuit breaker tripped: {reason}");
        state.is_tripped = true;
        state.reason = Some(reason);
        state.tripped_at = Some(Utc::now());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BreakerState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaker() -> CircuitBreaker {
        CircuitBreaker::new(10_000.0, 0.03, 3)
    }

    #[test]
    fn check_passes_until_tripped() {
        let b = breaker();
        assert!(b.check().is_ok());
        b.update_balance(9_800.0); // 2% down, under the 3% limit
        assert!(b.check().is_ok());
    }

    #[test]
    fn drawdown_trips_at_the_limit() {
        let b = breaker();
        b.update_balance(9_700.0); // exactly 3%
        let err = b.check().unwrap_err();
        assert!(err.reason.contains("drawdown"));
        assert!(b.snapshot().tripped_at.is_some());
    }

    #[test]
    fn consecutive_losses_trip_and_a_win_resets_the_streak() {
        let b = breaker();
        b.record_realized_pnl(-50.0);
        b.record_realized_pnl(-20.0);
        b.record_realized_pnl(120.0); // streak back to zero
        b.record_realized_pnl(-10.0);
        b.record_realized_pnl(-10.0);
        assert!(b.check().is_ok());

        b.record_realized_pnl(-10.0); // third in a row
        let err = b.check().unwrap_err();
        assert!(err.reason.contains("consecutive"));
    }

    #[test]
    fn reset_is_the_only_recovery() {
        let b = breaker();
        b.update_balance(9_000.0);
        assert!(b.check().is_err());

        // Balance recovery alone does not clear the trip.
        b.update_balance(10_500.0);
        assert!(b.check().is_err());

        b.reset();
        assert!(b.check().is_ok());
        assert_eq!(b.snapshot().consecutive_losses, 0);
    }
}
