//! Parallel parameter sweeps.
//!
//! Independent runs share no mutable state, so a sweep is a plain rayon
//! fan-out over the config grid. Output order matches input order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, RunId, SimConfig};
use crate::domain::Bar;
use crate::sim::{EntryMark, PerformanceMetrics, PositionSimulator};

/// One row of sweep output: the config identity plus its summary metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepRow {
    pub run_id: RunId,
    pub config: SimConfig,
    pub metrics: PerformanceMetrics,
}

/// Run every config against the same bar/signal series in parallel.
///
/// Fails fast on the first invalid config — a sweep over a broken grid is
/// not worth half-running.
pub fn run_sweep(
    bars: &[Bar],
    signals: &[EntryMark],
    configs: &[SimConfig],
) -> Result<Vec<SweepRow>, ConfigError> {
    for config in configs {
        config.validate()?;
    }

    let rows = configs
        .par_iter()
        .map(|config| {
            // Validated above; construction cannot fail here.
            let sim = PositionSimulator::new(config.clone())
                .unwrap_or_else(|_| unreachable!("config pre-validated"));
            let result = sim.run(bars, signals);
            SweepRow {
                run_id: result.run_id,
                config: config.clone(),
                metrics: result.metrics,
            }
        })
        .collect();

    Ok(rows)
}
