//! Reporter Capability
//!
//! Push-style observer notified once per lifecycle phase of a benchmark.
//! [`Reports`] fans every call out to all registered reporters.

use crate::id::BenchmarkId;
use crate::report::MeasurementRecord;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Observer of benchmark lifecycle phases
///
/// Every method defaults to a no-op so implementors only handle the phases
/// they care about. Calls for one benchmark arrive in this order:
/// `benchmark_start`, `warmup`, `measurement_start`, `analysis_started`, then
/// either `measurement_complete` or `benchmark_failed`. A failure may also
/// arrive after any earlier phase.
pub trait Reporter: Send + Sync {
    /// Benchmark admitted for execution
    fn benchmark_start(&self, _id: &BenchmarkId) {}

    /// Warm-up started, lasting about `warmup_ns` nanoseconds
    fn warmup(&self, _id: &BenchmarkId, _warmup_ns: u64) {}

    /// Sampling started
    fn measurement_start(
        &self,
        _id: &BenchmarkId,
        _sample_count: u64,
        _estimated_ns: u64,
        _total_iters: u64,
    ) {
    }

    /// Sampling finished, statistics are being computed
    fn analysis_started(&self, _id: &BenchmarkId) {}

    /// Analysis finished
    fn measurement_complete(&self, _id: &BenchmarkId, _record: &MeasurementRecord) {}

    /// Benchmark aborted without a record
    fn benchmark_failed(&self, _id: &BenchmarkId, _message: &str) {}
}

/// Composite reporter forwarding every call to each registered reporter
///
/// A reporter that panics is logged and skipped; the remaining reporters are
/// still notified.
#[derive(Clone, Default)]
pub struct Reports {
    reporters: Vec<Arc<dyn Reporter>>,
}

impl Reports {
    /// Empty fan-out
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reporter
    pub fn push(&mut self, reporter: Arc<dyn Reporter>) {
        self.reporters.push(reporter);
    }

    /// Builder form of [`Reports::push`]
    pub fn with(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.push(reporter);
        self
    }

    /// Number of registered reporters
    pub fn len(&self) -> usize {
        self.reporters.len()
    }

    /// Whether no reporter is registered
    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }

    fn each(&self, id: &BenchmarkId, phase: &str, call: impl Fn(&dyn Reporter)) {
        for reporter in &self.reporters {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| call(reporter.as_ref()))) {
                error!(
                    benchmark = %id,
                    phase,
                    panic = %panic_message(panic.as_ref()),
                    "reporter panicked"
                );
            }
        }
    }
}

impl std::fmt::Debug for Reports {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reports")
            .field("reporters", &self.reporters.len())
            .finish()
    }
}

impl Reporter for Reports {
    fn benchmark_start(&self, id: &BenchmarkId) {
        self.each(id, "benchmark_start", |r| r.benchmark_start(id));
    }

    fn warmup(&self, id: &BenchmarkId, warmup_ns: u64) {
        self.each(id, "warmup", |r| r.warmup(id, warmup_ns));
    }

    fn measurement_start(
        &self,
        id: &BenchmarkId,
        sample_count: u64,
        estimated_ns: u64,
        total_iters: u64,
    ) {
        self.each(id, "measurement_start", |r| {
            r.measurement_start(id, sample_count, estimated_ns, total_iters)
        });
    }

    fn analysis_started(&self, id: &BenchmarkId) {
        self.each(id, "analysis_started", |r| r.analysis_started(id));
    }

    fn measurement_complete(&self, id: &BenchmarkId, record: &MeasurementRecord) {
        self.each(id, "measurement_complete", |r| {
            r.measurement_complete(id, record)
        });
    }

    fn benchmark_failed(&self, id: &BenchmarkId, message: &str) {
        self.each(id, "benchmark_failed", |r| r.benchmark_failed(id, message));
    }
}

/// Extract the payload text of a caught panic
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Reporter emitting one `tracing` event per phase
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn benchmark_start(&self, id: &BenchmarkId) {
        debug!(benchmark = %id, "benchmarking");
    }

    fn warmup(&self, id: &BenchmarkId, warmup_ns: u64) {
        debug!(benchmark = %id, warmup_ns, "warming up");
    }

    fn measurement_start(
        &self,
        id: &BenchmarkId,
        sample_count: u64,
        estimated_ns: u64,
        total_iters: u64,
    ) {
        debug!(
            benchmark = %id,
            sample_count,
            estimated_ns,
            total_iters,
            "collecting samples"
        );
    }

    fn analysis_started(&self, id: &BenchmarkId) {
        debug!(benchmark = %id, "analyzing");
    }

    fn measurement_complete(&self, id: &BenchmarkId, record: &MeasurementRecord) {
        let stats = &record.statistics;
        let ci = &stats.mean.confidence_interval;
        info!(
            benchmark = %id,
            mean_ns = stats.mean.point_estimate,
            mean_lower_ns = ci.lower,
            mean_upper_ns = ci.upper,
            median_ns = stats.median.point_estimate,
            std_dev_ns = stats.std_dev.point_estimate,
            slope_ns = stats.slope.as_ref().map(|s| s.point_estimate),
            r_squared = stats.r_squared,
            outliers = record.measurements.outliers.total(),
            "benchmark complete"
        );
    }

    fn benchmark_failed(&self, id: &BenchmarkId, message: &str) {
        error!(benchmark = %id, reason = message, "benchmark failed");
    }
}
