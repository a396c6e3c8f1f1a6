//! Triple-barrier labeler.
//!
//! For each bar, an upper (profit) and lower (loss) barrier are placed at a
//! volatility-scaled distance from the current price, then raced over a
//! bounded forward horizon. The first barrier touched decides the label.
//!
//! The sweep runs step-outer / index-inner so each pass over the series is a
//! flat array scan: O(T·H) total, batchable for large T.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Label;

/// Barrier geometry and horizon for label generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarrierConfig {
    /// Forward horizon in bars (the "vertical" barrier).
    pub horizon: usize,
    /// Profit barrier distance in units of per-bar volatility.
    pub pt_multiplier: f64,
    /// Loss barrier distance in units of per-bar volatility.
    pub sl_multiplier: f64,
    /// Minimum fractional edge: bars whose scaled profit distance does not
    /// exceed this are labeled 0 regardless of the realized path.
    pub min_ret: f64,
}

impl Default for BarrierConfig {
    fn default() -> Self {
        Self {
            horizon: 24,
            pt_multiplier: 2.0,
            sl_multiplier: 1.5,
            min_ret: 0.0005,
        }
    }
}

/// First-touch step indices for both barriers, one entry per input bar.
///
/// `f64::INFINITY` means the barrier was never touched within the horizon.
#[derive(Debug, Clone)]
pub struct FirstTouch {
    pub up: Vec<f64>,
    pub down: Vec<f64>,
}

/// Compute the first-touch race without collapsing it to labels.
///
/// Exposed separately because barrier-touch diagnostics (touch-rate tuning,
/// horizon sensitivity) want the raw race, not the binary outcome.
pub fn first_touch(prices: &[f64], volatility: &[f64], config: &BarrierConfig) -> FirstTouch {
    let t = prices.len();
    let mut up = vec![f64::INFINITY; t];
    let mut down = vec![f64::INFINITY; t];

    if t == 0 || volatility.len() != t {
        return FirstTouch { up, down };
    }

    let upper: Vec<f64> = prices
        .iter()
        .zip(volatility)
        .map(|(p, v)| p * (1.0 + v * config.pt_multiplier))
        .collect();
    let lower: Vec<f64> = prices
        .iter()
        .zip(volatility)
        .map(|(p, v)| p * (1.0 - v * config.sl_multiplier))
        .collect();

    for step in 1..=config.horizon {
        if step >= t {
            break;
        }
        for i in 0..t - step {
            let future = prices[i + step];
            if future.is_nan() {
                continue;
            }
            if up[i].is_infinite() && future >= upper[i] {
                up[i] = step as f64;
            }
            if down[i].is_infinite() && future <= lower[i] {
                down[i] = step as f64;
            }
        }
    }

    FirstTouch { up, down }
}

/// Generate one label per input index.
///
/// Label(t) = 1 iff the upper barrier is touched strictly before the lower
/// one AND `v[t]·pt_multiplier > min_ret`. A simultaneous first touch of
/// both barriers resolves to 0 — a policy choice, not a claim about which
/// barrier was actually crossed first inside the bar.
///
/// Mismatched input lengths or empty input yield an empty vector; a NaN
/// price or volatility at `t` yields label 0 for that index.
pub fn label_series(
    prices: &[f64],
    volatility: &[f64],
    timestamps: &[DateTime<Utc>],
    config: &BarrierConfig,
) -> Vec<Label> {
    let t = prices.len();
    if t == 0 || volatility.len() != t || timestamps.len() != t {
        return Vec::new();
    }

    let race = first_touch(prices, volatility, config);

    (0..t)
        .map(|i| {
            let v = volatility[i];
            if prices[i].is_nan() || v.is_nan() {
                return Label::negative(timestamps[i]);
            }
            let profit_first = race.up[i].is_finite() && race.up[i] < race.down[i];
            let worth_taking = v * config.pt_multiplier > config.min_ret;
            if profit_first && worth_taking {
                Label::positive(timestamps[i])
            } else {
                Label::negative(timestamps[i])
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn stamps(n: usize) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        (0..n).map(|i| base + Duration::hours(i as i64)).collect()
    }

    fn config(horizon: usize) -> BarrierConfig {
        BarrierConfig {
            horizon,
            pt_multiplier: 2.0,
            sl_multiplier: 1.5,
            min_ret: 0.0005,
        }
    }

    #[test]
    fn upward_path_labels_positive() {
        // vol 1% → upper = 102, lower = 98.5; price walks straight up.
        let prices = vec![100.0, 101.0, 102.5, 103.0, 104.0];
        let vol = vec![0.01; 5];
        let labels = label_series(&prices, &vol, &stamps(5), &config(4));
        assert_eq!(labels[0].value, 1);
    }

    #[test]
    fn downward_path_labels_negative() {
        let prices = vec![100.0, 99.0, 98.0, 97.0, 96.0];
        let vol = vec![0.01; 5];
        let labels = label_series(&prices, &vol, &stamps(5), &config(4));
        assert_eq!(labels[0].value, 0);
    }

    #[test]
    fn loss_before_profit_labels_negative() {
        // Touches lower (98.5) at step 1, upper (102) at step 2.
        let prices = vec![100.0, 98.0, 103.0, 103.0];
        let vol = vec![0.01; 4];
        let labels = label_series(&prices, &vol, &stamps(4), &config(3));
        assert_eq!(labels[0].value, 0);
    }

    #[test]
    fn simultaneous_touch_resolves_to_zero() {
        // Zero volatility collapses both barriers onto the price itself, so
        // an unchanged next bar touches both at step 1 — the degenerate form
        // of a simultaneous first touch. Strict `<` resolves it to 0.
        let prices = vec![100.0, 100.0, 100.0];
        let vol = vec![0.0; 3];
        let cfg = BarrierConfig {
            min_ret: -1.0, // disable the edge gate so only the race decides
            ..config(2)
        };
        let race = first_touch(&prices, &vol, &cfg);
        assert_eq!(race.up[0], 1.0);
        assert_eq!(race.down[0], 1.0);

        let labels = label_series(&prices, &vol, &stamps(3), &cfg);
        assert_eq!(labels[0].value, 0);
    }

    #[test]
    fn min_ret_gate_forces_zero() {
        // Strong up-move but vol*pt below min_ret → 0 regardless of path.
        let prices = vec![100.0, 110.0, 120.0];
        let vol = vec![0.0001; 3]; // 0.0001 * 2.0 = 0.0002 <= 0.0005
        let labels = label_series(&prices, &vol, &stamps(3), &config(2));
        assert_eq!(labels[0].value, 0);
    }

    #[test]
    fn unresolved_horizon_labels_zero() {
        // Price never leaves the barrier corridor within the horizon.
        let prices = vec![100.0, 100.1, 99.9, 100.05];
        let vol = vec![0.01; 4];
        let labels = label_series(&prices, &vol, &stamps(4), &config(3));
        assert_eq!(labels[0].value, 0);
    }

    #[test]
    fn empty_and_mismatched_inputs_yield_empty() {
        let cfg = config(5);
        assert!(label_series(&[], &[], &[], &cfg).is_empty());
        assert!(label_series(&[100.0], &[0.01, 0.01], &stamps(1), &cfg).is_empty());
    }

    #[test]
    fn nan_price_labels_zero() {
        let prices = vec![f64::NAN, 101.0, 102.0];
        let vol = vec![0.01; 3];
        let labels = label_series(&prices, &vol, &stamps(3), &config(2));
        assert_eq!(labels[0].value, 0);
        assert_eq!(labels.len(), 3);
    }

    #[test]
    fn output_length_matches_input() {
        let prices: Vec<f64> = (0..50).map(|i| 100.0 + i as f64 * 0.1).collect();
        let vol = vec![0.005; 50];
        let labels = label_series(&prices, &vol, &stamps(50), &config(10));
        assert_eq!(labels.len(), 50);
    }

    #[test]
    fn tail_bars_without_future_data_label_zero() {
        let prices = vec![100.0, 101.0];
        let vol = vec![0.01; 2];
        let labels = label_series(&prices, &vol, &stamps(2), &config(10));
        // Last bar has no future data at all.
        assert_eq!(labels[1].value, 0);
    }
}
