//! RSI — Relative Strength Index (Wilder).
//!
//! Gains/losses from consecutive closes, Wilder-smoothed over `period`,
//! RSI = 100 - 100 / (1 + RS). All-gain windows read 100, all-loss read 0.
//! Warmup: indices 0..period are NaN.

use crate::indicators::atr::wilder_smooth;

/// RSI over a close-price series.
pub fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < 2 {
        return result;
    }

    let mut gains = vec![f64::NAN; n];
    let mut losses = vec![f64::NAN; n];
    for i in 1..n {
        let delta = closes[i] - closes[i - 1];
        if delta.is_nan() {
            gains[i] = f64::NAN;
            losses[i] = f64::NAN;
        } else {
            gains[i] = delta.max(0.0);
            losses[i] = (-delta).max(0.0);
        }
    }

    let avg_gain = wilder_smooth(&gains, period);
    let avg_loss = wilder_smooth(&losses, period);

    for i in 0..n {
        let (g, l) = (avg_gain[i], avg_loss[i]);
        if g.is_nan() || l.is_nan() {
            continue;
        }
        result[i] = if l < 1e-15 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + g / l)
        };
    }
    result
}
