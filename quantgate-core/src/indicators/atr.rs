//! ATR — Average True Range (Wilder).
//!
//! TR[t] = max(high-low, |high-prev_close|, |low-prev_close|)
//! ATR = Wilder-smoothed TR, seeded with the SMA of the first `period` TRs.
//! Warmup: indices 0..period are NaN (TR needs one prior close).

use crate::domain::Bar;

/// True range of a bar given the previous close.
pub fn true_range(bar: &Bar, prev_close: Option<f64>) -> f64 {
    let high_low = bar.high - bar.low;
    match prev_close {
        Some(pc) => {
            let high_prev = (bar.high - pc).abs();
            let low_prev = (bar.low - pc).abs();
            high_low.max(high_prev).max(low_prev)
        }
        None => high_low,
    }
}

/// Wilder smoothing: seed with the SMA of the first `period` valid values,
/// then S[t] = (S[t-1] * (period-1) + x[t]) / period.
///
/// Input NaNs before the first valid index are skipped; the seed window
/// starts at the first valid value.
pub fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 {
        return result;
    }

    let first_valid = match values.iter().position(|v| !v.is_nan()) {
        Some(i) => i,
        None => return result,
    };
    if first_valid + period > n {
        return result;
    }

    let seed_end = first_valid + period;
    let seed: f64 = values[first_valid..seed_end].iter().sum::<f64>() / period as f64;
    if seed.is_nan() {
        return result;
    }
    result[seed_end - 1] = seed;

    let mut prev = seed;
    for i in seed_end..n {
        if values[i].is_nan() {
            return result;
        }
        prev = (prev * (period as f64 - 1.0) + values[i]) / period as f64;
        result[i] = prev;
    }
    result
}

/// ATR over a bar series.
pub fn atr(bars: &[Bar], period: usize) -> Vec<f64> {
    let n = bars.len();
    if n < 2 || period == 0 {
        return vec![f64::NAN; n];
    }

    let mut tr = vec![f64::NAN; n];
    for i in 1..n {
        tr[i] = true_range(&bars[i], Some(bars[i - 1].close));
    }
    wilder_smooth(&tr, period)
}
