//! Indicator math consumed by the live gate.
//!
//! Pure batch functions over bar slices: output is aligned 1:1 with input,
//! with NaN during the warmup window. Short input never panics — it just
//! returns an all-NaN series.

pub mod adx;
pub mod atr;
pub mod ema;
pub mod rsi;

pub use adx::adx;
pub use atr::{atr, true_range, wilder_smooth};
pub use ema::ema;
pub use rsi::rsi;

/// Last non-NaN value of a series, if any.
pub fn last_valid(series: &[f64]) -> Option<f64> {
    series.iter().rev().copied().find(|v| !v.is_nan())
}

#[cfg(test)]
pub(crate) fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    use chrono::{Duration, TimeZone, Utc};

    let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            Bar::new(
                base + Duration::hours(i as i64),
                open,
                high,
                low,
                close,
                1_000.0,
            )
        })
        .collect()
}
