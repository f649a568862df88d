//! Integration tests for steadybench
//!
//! These tests verify the end-to-end behavior of the harness: execution
//! ordering, reporter notifications and failure isolation.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use steadybench::{
    AnalysisError, BenchConfig, BenchError, Bencher, BenchmarkId, Harness, IdError,
    MeasurementRecord, Reporter,
};

/// Small, fast configuration
fn quick() -> BenchConfig {
    BenchConfig::default()
        .with_sample_size(10)
        .with_nresamples(200)
        .with_warm_up_time(Duration::from_millis(5))
        .with_measurement_time(Duration::from_millis(20))
}

/// Reporter recording every notification as `"<phase> <title>"`
#[derive(Default)]
struct Journal {
    events: Mutex<Vec<String>>,
}

impl Journal {
    fn push(&self, phase: &str, id: &BenchmarkId) {
        self.events.lock().unwrap().push(format!("{phase} {id}"));
    }

    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn position(&self, event: &str) -> usize {
        self.events()
            .iter()
            .position(|e| e == event)
            .unwrap_or_else(|| panic!("missing event {event}"))
    }
}

impl Reporter for Journal {
    fn benchmark_start(&self, id: &BenchmarkId) {
        self.push("start", id);
    }

    fn warmup(&self, id: &BenchmarkId, _warmup_ns: u64) {
        self.push("warmup", id);
    }

    fn measurement_start(&self, id: &BenchmarkId, _: u64, _: u64, _: u64) {
        self.push("measure", id);
    }

    fn analysis_started(&self, id: &BenchmarkId) {
        self.push("analyze", id);
    }

    fn measurement_complete(&self, id: &BenchmarkId, _record: &MeasurementRecord) {
        self.push("complete", id);
    }

    fn benchmark_failed(&self, id: &BenchmarkId, _message: &str) {
        self.push("failed", id);
    }
}

fn harness(journal: &Arc<Journal>) -> Harness {
    Harness::new(quick())
        .unwrap()
        .with_seed(42)
        .with_reporter(journal.clone())
}

fn sum(b: &mut Bencher) {
    b.iter(|| (0..256u64).sum::<u64>());
}

/// Test the full lifecycle of one synchronous benchmark
#[tokio::test(flavor = "multi_thread")]
async fn test_end_to_end() {
    let journal = Arc::new(Journal::default());
    let record = harness(&journal).bench_function("math", "sum", sum).await.unwrap();

    assert_eq!(
        journal.events(),
        vec![
            "start math/sum",
            "warmup math/sum",
            "measure math/sum",
            "analyze math/sum",
            "complete math/sum",
        ]
    );

    assert_eq!(record.group_id, "math");
    assert_eq!(record.function_id, "sum");
    assert_eq!(record.measurements.iters.len(), 10);
    assert!(record.measurements.times.iter().all(|&t| t > 0.0));
    // Linear plan: every count is a multiple of the first
    let step = record.measurements.iters[0];
    for (i, &n) in record.measurements.iters.iter().enumerate() {
        assert_eq!(n, step * (i + 1) as f64);
    }

    let mean = &record.statistics.mean;
    assert!(mean.point_estimate > 0.0);
    assert!(mean.confidence_interval.lower <= mean.point_estimate);
    assert!(mean.point_estimate <= mean.confidence_interval.upper);
    assert!(record.statistics.slope.is_some());
    assert_eq!(record.distributions.median.len(), 200);
}

/// The second benchmark must not start before the first completes
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_submissions_are_serialized() {
    let journal = Arc::new(Journal::default());
    let harness = harness(&journal);

    let first = {
        let harness = harness.clone();
        tokio::spawn(async move { harness.bench_function("gate", "first", sum).await })
    };
    // Make sure the first benchmark holds the gate before submitting the second
    while harness.gate().is_idle() && !first.is_finished() {
        tokio::task::yield_now().await;
    }
    let second = {
        let harness = harness.clone();
        tokio::spawn(async move { harness.bench_function("gate", "second", sum).await })
    };

    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    assert!(journal.position("complete gate/first") < journal.position("start gate/second"));
    assert!(harness.gate().is_idle());
}

/// Benchmarks joined concurrently still run in submission order
#[tokio::test(flavor = "multi_thread")]
async fn test_joined_benchmarks_do_not_overlap() {
    let journal = Arc::new(Journal::default());
    let harness = harness(&journal);
    let group = harness.group("join");

    let (a, b) = tokio::join!(
        group.bench_function("a", sum),
        group.bench_function("b", sum),
    );
    a.unwrap();
    b.unwrap();

    let events = journal.events();
    let starts: Vec<_> = events.iter().filter(|e| e.starts_with("start")).collect();
    assert_eq!(starts.len(), 2);
    for title in ["join/a", "join/b"] {
        let start = journal.position(&format!("start {title}"));
        let complete = journal.position(&format!("complete {title}"));
        // Nothing from the other benchmark in between
        assert!(events[start..=complete].iter().all(|e| e.ends_with(title)));
    }
}

/// A candidate reporting zero elapsed time produces no record
#[tokio::test(flavor = "multi_thread")]
async fn test_degenerate_measurement_aborts() {
    let journal = Arc::new(Journal::default());
    let result = harness(&journal)
        .bench_function("broken", "zero", |b: &mut Bencher| {
            b.iter_custom(|_| Duration::ZERO)
        })
        .await;

    assert!(matches!(
        result,
        Err(AnalysisError::Bench(BenchError::DegenerateMeasurement { .. }))
    ));
    let events = journal.events();
    assert!(events.contains(&"failed broken/zero".to_string()));
    assert!(!events.iter().any(|e| e.starts_with("complete")));
    assert!(!events.iter().any(|e| e.starts_with("analyze")));
}

/// A routine that never iterates is a usage error; later benchmarks still run
#[tokio::test(flavor = "multi_thread")]
async fn test_missing_iteration_is_isolated() {
    let journal = Arc::new(Journal::default());
    let harness = harness(&journal);

    let result = harness
        .bench_function("usage", "forgot", |_: &mut Bencher| {})
        .await;
    assert!(matches!(
        result,
        Err(AnalysisError::Bench(BenchError::NoIteration { .. }))
    ));

    harness.bench_function("usage", "fine", sum).await.unwrap();
    assert!(journal.position("failed usage/forgot") < journal.position("complete usage/fine"));
}

/// A panicking routine fails only its own benchmark
#[tokio::test(flavor = "multi_thread")]
async fn test_panic_is_isolated() {
    let journal = Arc::new(Journal::default());
    let harness = harness(&journal);

    let result = harness
        .bench_function("crash", "panics", |b: &mut Bencher| {
            b.iter(|| -> u64 { panic!("candidate exploded") })
        })
        .await;
    match result {
        Err(AnalysisError::Bench(BenchError::Panicked(message))) => {
            assert!(message.contains("candidate exploded"));
        }
        other => panic!("expected a panic failure, got {other:?}"),
    }

    assert!(harness.gate().is_idle());
    harness.bench_function("crash", "after", sum).await.unwrap();
}

/// Empty identities are rejected before the gate is taken
#[tokio::test(flavor = "multi_thread")]
async fn test_empty_identity_is_rejected() {
    let journal = Arc::new(Journal::default());
    let harness = harness(&journal);

    let result = harness.bench_function("", "f", sum).await;
    assert!(matches!(result, Err(AnalysisError::Id(IdError::EmptyGroup))));

    let result = harness.group("g").bench_function(" ", sum).await;
    assert!(matches!(result, Err(AnalysisError::Id(IdError::EmptyFunction))));

    assert!(journal.events().is_empty());
}

/// Suspending candidates are awaited serially on the ambient runtime
#[tokio::test(flavor = "multi_thread")]
async fn test_async_candidate() {
    let journal = Arc::new(Journal::default());
    let config = quick()
        .with_sample_size(5)
        .with_warm_up_time(Duration::from_millis(2))
        .with_measurement_time(Duration::from_millis(10));
    let harness = Harness::new(config)
        .unwrap()
        .with_reporter(journal.clone());

    let record = harness
        .bench_function("async", "yield", |b: &mut Bencher| {
            b.iter_async(|| async {
                tokio::task::yield_now().await;
                1u8
            })
        })
        .await
        .unwrap();

    assert_eq!(record.measurements.iters.len(), 5);
    assert!(record.statistics.mean.point_estimate > 0.0);
}

/// Async candidates also work when the caller runs a current-thread runtime
#[tokio::test]
async fn test_async_candidate_on_current_thread_runtime() {
    let config = quick()
        .with_sample_size(3)
        .with_warm_up_time(Duration::from_millis(2))
        .with_measurement_time(Duration::from_millis(5));
    let harness = Harness::new(config).unwrap();

    let record = harness
        .bench_function("async", "sleep", |b: &mut Bencher| {
            b.iter_async(|| tokio::time::sleep(Duration::from_micros(10)))
        })
        .await
        .unwrap();

    assert!(record.statistics.mean.point_estimate >= 10_000.0);
}

/// The fixed input is built once, outside the timed region
#[tokio::test(flavor = "multi_thread")]
async fn test_bench_with_input() {
    let journal = Arc::new(Journal::default());
    let harness = harness(&journal);

    let input: Vec<u64> = (0..512).rev().collect();
    let record = harness
        .group("sort")
        .bench_with_input("unstable", input, |b: &mut Bencher, input: &Vec<u64>| {
            b.iter(|| {
                let mut v = input.clone();
                v.sort_unstable();
                v
            })
        })
        .await
        .unwrap();

    assert_eq!(record.group_id, "sort");
    assert_eq!(record.function_id, "unstable");
    assert_eq!(journal.position("complete sort/unstable"), 4);
}

/// A seeded harness reproduces its confidence intervals
#[tokio::test(flavor = "multi_thread")]
async fn test_seeded_bootstrap_is_reproducible() {
    let harness = Harness::new(quick()).unwrap().with_seed(7);
    let cost = |b: &mut Bencher| b.iter_custom(|iters| Duration::from_nanos(iters * (37 + iters % 11)));

    let first = harness.bench_function("seed", "a", cost).await.unwrap();
    let second = harness.bench_function("seed", "b", cost).await.unwrap();

    assert_eq!(first.measurements.times, second.measurements.times);
    assert_eq!(
        first.distributions.mean.as_slice(),
        second.distributions.mean.as_slice()
    );
    assert_eq!(
        first.statistics.slope.unwrap().confidence_interval,
        second.statistics.slope.unwrap().confidence_interval
    );
}

/// An unreachable budget is advisory; the benchmark still completes
#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_budget_still_completes() {
    let journal = Arc::new(Journal::default());
    let config = quick()
        .with_nresamples(20)
        .with_measurement_time(Duration::from_millis(1));
    let harness = Harness::new(config).unwrap().with_reporter(journal.clone());

    let record = harness
        .bench_function("slow", "millis", |b: &mut Bencher| {
            b.iter_custom(Duration::from_millis)
        })
        .await
        .unwrap();

    let expected: Vec<f64> = (1..=10).map(|n| n as f64).collect();
    assert_eq!(record.measurements.iters, expected);
    assert!(journal.events().contains(&"complete slow/millis".to_string()));
}

/// The record serializes to JSON for external reporters
#[tokio::test(flavor = "multi_thread")]
async fn test_record_serializes() {
    let harness = Harness::new(quick().with_nresamples(10)).unwrap();
    let record = harness.bench_function("json", "sum", sum).await.unwrap();

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["title"], "json/sum");
    assert_eq!(json["measurements"]["iters"].as_array().unwrap().len(), 10);
    assert!(json["statistics"]["mean"]["confidence_interval"]["lower"].is_number());
    assert_eq!(
        json["distributions"]["std_dev"].as_array().unwrap().len(),
        10
    );
}
