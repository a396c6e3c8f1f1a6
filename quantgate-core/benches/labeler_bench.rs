//! Criterion bench for the labeler hot loop.

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quantgate_core::labeling::{label_series, BarrierConfig};

fn bench_label_series(c: &mut Criterion) {
    let n = 50_000;
    let prices: Vec<f64> = (0..n)
        .map(|i| 100.0 + (i as f64 * 0.01).sin() * 5.0 + i as f64 * 0.0001)
        .collect();
    let volatility = vec![0.008; n];
    let base = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let timestamps: Vec<_> = (0..n).map(|i| base + Duration::hours(i as i64)).collect();
    let config = BarrierConfig::default();

    c.bench_function("label_series_50k_h24", |b| {
        b.iter(|| {
            label_series(
                black_box(&prices),
                black_box(&volatility),
                black_box(&timestamps),
                black_box(&config),
            )
        })
    });
}

criterion_group!(benches, bench_label_series);
criterion_main!(benches);
