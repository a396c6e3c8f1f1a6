//! ADX — Average Directional Index (Wilder).
//!
//! Steps:
//! 1. +DM and -DM from consecutive bars
//! 2. Wilder-smooth +DM, -DM, and TR
//! 3. +DI = 100 * smoothed(+DM) / smoothed(TR), -DI likewise
//! 4. DX = 100 * |+DI - -DI| / (+DI + -DI)
//! 5. ADX = Wilder-smoothed DX
//!
//! Warmup: roughly 2 * period bars before the first finite value.

use crate::domain::Bar;
use crate::indicators::atr::{true_range, wilder_smooth};

/// ADX over a bar series.
pub fn adx(bars: &[Bar], period: usize) -> Vec<f64> {
    let n = bars.len();
    if n < 2 || period == 0 {
        return vec![f64::NAN; n];
    }

    let mut plus_dm = vec![f64::NAN; n];
    let mut minus_dm = vec![f64::NAN; n];
    let mut tr = vec![f64::NAN; n];

    for i in 1..n {
        let high_diff = bars[i].high - bars[i - 1].high;
        let low_diff = bars[i - 1].low - bars[i].low;

        if high_diff.is_nan() || low_diff.is_nan() {
            continue;
        }

        plus_dm[i] = if high_diff > low_diff && high_diff > 0.0 {
            high_diff
        } else {
            0.0
        };
        minus_dm[i] = if low_diff > high_diff && low_diff > 0.0 {
            low_diff
        } else {
            0.0
        };
        tr[i] = true_range(&bars[i], Some(bars[i - 1].close));
    }

    let smoothed_plus = wilder_smooth(&plus_dm, period);
    let smoothed_minus = wilder_smooth(&minus_dm, period);
    let smoothed_tr = wilder_smooth(&tr, period);

    let mut dx = vec![f64::NAN; n];
    for i in 0..n {
        let (p, m, t) = (smoothed_plus[i], smoothed_minus[i], smoothed_tr[i]);
        if p.is_nan() || m.is_nan() || t.is_nan() || t < 1e-15 {
            continue;
        }
        let plus_di = 100.0 * p / t;
        let minus_di = 100.0 * m / t;
        let di_sum = plus_di + minus_di;
        dx[i] = if di_sum < 1e-15 {
            0.0
        } else {
            100.0 * (plus_di - minus_di).abs() / di_sum
        };
    }

    wilder_smooth(&dx, period)
}
