//! Full live-cycle flow against mock collaborators: bars in, gate decision,
//! idempotent execution, breaker interplay.

use std::sync::Arc;

use anyhow::anyhow;
use chrono::{DateTime, Duration, TimeZone, Utc};

use quantgate_core::domain::Bar;
use quantgate_live::{
    BarSource, BrokerAck, CircuitBreaker, Classifier, CycleOutcome, DecisionPipeline,
    ExecutionCoordinator, ExecutionOutcome, FeatureProvider, FeatureSnapshot, GateOutcome,
    MemorySignalStore, OrderSink, Signal, SignalGate, SignalStatus, SignalStore, Timeframe,
    TradingConfig,
};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 6, 0, 0, 0).unwrap()
}

fn bar(i: usize, open: f64, close: f64) -> Bar {
    Bar::new(
        base_time() + Duration::hours(i as i64),
        open,
        open.max(close) + 2.0,
        open.min(close) - 2.0,
        close,
        1_000.0,
    )
}

/// Uptrend with periodic pullbacks; the final bar is green.
fn trending_bars(n: usize) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let open = 2_000.0 + i as f64 * 2.0;
            let close = if i % 7 == 3 { open - 1.0 } else { open + 2.5 };
            bar(i, open, close)
        })
        .collect()
}

struct CannedBars {
    exec: Vec<Bar>,
    regime: Vec<Bar>,
}

impl BarSource for CannedBars {
    fn query(
        &self,
        _asset: &str,
        timeframe: Timeframe,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> anyhow::Result<Vec<Bar>> {
        match timeframe {
            Timeframe::D1 => Ok(self.regime.clone()),
            _ => Ok(self.exec.clone()),
        }
    }
}

struct NoData;

impl BarSource for NoData {
    fn query(
        &self,
        _asset: &str,
        _timeframe: Timeframe,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> anyhow::Result<Vec<Bar>> {
        Err(anyhow!("no data for range"))
    }
}

struct FixedFeatures;

impl FeatureProvider for FixedFeatures {
    fn snapshot(&self, bars: &[Bar]) -> anyhow::Result<FeatureSnapshot> {
        let last = bars.last().ok_or_else(|| anyhow!("empty series"))?;
        Ok(FeatureSnapshot {
            timestamp: last.timestamp,
            volatility: 0.004,
            features: vec![last.close, 0.004],
        })
    }
}

struct FixedClassifier(f64);

impl Classifier for FixedClassifier {
    fn probability(&self, _features: &[f64]) -> anyhow::Result<f64> {
        Ok(self.0)
    }
}

struct FailingSink;

impl OrderSink for FailingSink {
    fn place(&self, _signal: &Signal) -> anyhow::Result<BrokerAck> {
        Err(anyhow!("broker unreachable"))
    }
}

fn permissive_config() -> TradingConfig {
    let mut config = TradingConfig::default();
    config.ml_probability_threshold = 0.5;
    config.entry.trend_window = 50;
    config.entry.rsi_pullback_max = 100.0;
    config.entry.adx_min = 5.0;
    config.regime.min_volatility = 0.5;
    config.regime.min_adx = 5.0;
    config
}

struct Harness {
    store: Arc<MemorySignalStore>,
    breaker: Arc<CircuitBreaker>,
    pipeline: DecisionPipeline,
}

fn harness(bars: Arc<dyn BarSource>, sink: Arc<dyn OrderSink>, probability: f64) -> Harness {
    let store = Arc::new(MemorySignalStore::new());
    let breaker = Arc::new(CircuitBreaker::new(10_000.0, 0.03, 5));
    let gate = SignalGate::new(
        permissive_config(),
        Arc::new(FixedFeatures),
        Arc::new(FixedClassifier(probability)),
        store.clone(),
    )
    .unwrap();
    let coordinator = ExecutionCoordinator::new(store.clone(), breaker.clone(), sink);
    let pipeline = DecisionPipeline::new("XAUUSD", Timeframe::H1, Timeframe::D1, bars, gate, coordinator);
    Harness {
        store,
        breaker,
        pipeline,
    }
}

fn canned() -> Arc<dyn BarSource> {
    Arc::new(CannedBars {
        exec: trending_bars(120),
        regime: trending_bars(120),
    })
}

#[test]
fn full_cycle_emits_and_fills_exactly_once() {
    let h = harness(
        canned(),
        Arc::new(quantgate_live::SimulatedSink::new()),
        0.9,
    );

    let first = h.pipeline.run_cycle(base_time() + Duration::hours(200));
    let CycleOutcome::Executed { key, outcome } = first else {
        panic!("expected execution, got {first:?}");
    };
    assert_eq!(outcome, ExecutionOutcome::Filled);

    let record = h.store.get(&key).unwrap();
    assert_eq!(record.signal.status, SignalStatus::Executed);
    assert!(record.order.is_some());

    // The scheduler fires again before new bars arrive: same key, no second
    // order, no status change.
    let second = h.pipeline.run_cycle(base_time() + Duration::hours(200));
    let CycleOutcome::Executed { key: key2, outcome } = second else {
        panic!("expected execution path");
    };
    assert_eq!(key2, key);
    assert_eq!(outcome, ExecutionOutcome::AlreadyHandled);
    assert_eq!(h.store.len(), 1);

    let (attempts, fills, _, _) = h.pipeline.coordinator().counters().summary();
    assert_eq!((attempts, fills), (2, 1));
}

#[test]
fn tripped_breaker_cancels_the_signal_without_an_order() {
    let h = harness(
        canned(),
        Arc::new(quantgate_live::SimulatedSink::new()),
        0.9,
    );
    h.breaker.update_balance(9_500.0); // 5% drawdown against a 3% limit

    let outcome = h.pipeline.run_cycle(base_time() + Duration::hours(200));
    let CycleOutcome::Executed { key, outcome } = outcome else {
        panic!("gate should still emit under a tripped breaker");
    };
    assert!(matches!(outcome, ExecutionOutcome::Cancelled { .. }));

    let record = h.store.get(&key).unwrap();
    assert_eq!(record.signal.status, SignalStatus::Cancelled);
    assert!(record.order.is_none());
}

#[test]
fn failed_placement_is_retried_on_the_next_cycle() {
    let store = Arc::new(MemorySignalStore::new());
    let breaker = Arc::new(CircuitBreaker::new(10_000.0, 0.03, 5));
    let gate = |s: Arc<MemorySignalStore>| {
        SignalGate::new(
            permissive_config(),
            Arc::new(FixedFeatures),
            Arc::new(FixedClassifier(0.9)),
            s,
        )
        .unwrap()
    };

    // First cycle against a broken broker.
    let broken = DecisionPipeline::new(
        "XAUUSD",
        Timeframe::H1,
        Timeframe::D1,
        canned(),
        gate(store.clone()),
        ExecutionCoordinator::new(store.clone(), breaker.clone(), Arc::new(FailingSink)),
    );
    let first = broken.run_cycle(base_time() + Duration::hours(200));
    let CycleOutcome::Executed { key, outcome } = first else {
        panic!("expected execution path");
    };
    assert_eq!(outcome, ExecutionOutcome::Failed);
    assert_eq!(store.get(&key).unwrap().signal.status, SignalStatus::Pending);

    // Next cycle, broker back: same signal, now filled.
    let healthy = DecisionPipeline::new(
        "XAUUSD",
        Timeframe::H1,
        Timeframe::D1,
        canned(),
        gate(store.clone()),
        ExecutionCoordinator::new(
            store.clone(),
            breaker,
            Arc::new(quantgate_live::SimulatedSink::new()),
        ),
    );
    let second = healthy.run_cycle(base_time() + Duration::hours(200));
    let CycleOutcome::Executed { key: key2, outcome } = second else {
        panic!("expected execution path");
    };
    assert_eq!(key2, key);
    assert_eq!(outcome, ExecutionOutcome::Filled);
    assert_eq!(store.len(), 1);
}

#[test]
fn low_probability_blocks_before_execution() {
    let h = harness(
        canned(),
        Arc::new(quantgate_live::SimulatedSink::new()),
        0.2,
    );
    let outcome = h.pipeline.run_cycle(base_time() + Duration::hours(200));
    assert_eq!(
        outcome,
        CycleOutcome::Blocked(GateOutcome::Rejected { probability: 0.2 })
    );
    assert!(h.store.is_empty());
}

#[test]
fn bar_source_failure_degrades_to_data_unavailable() {
    let h = harness(
        Arc::new(NoData),
        Arc::new(quantgate_live::SimulatedSink::new()),
        0.9,
    );
    let outcome = h.pipeline.run_cycle(base_time());
    assert_eq!(outcome, CycleOutcome::DataUnavailable);
}
