#![warn(missing_docs)]
//! # steadybench
//!
//! Statistically rigorous micro-benchmarking.
//!
//! - **Linear sampling plan**: sample `i` runs `i·d` iterations, so elapsed
//!   time regresses cleanly on iteration count
//! - **Bootstrap statistics**: mean, median, MAD, standard deviation and slope,
//!   each with a percentile confidence interval
//! - **Tukey fences**: outliers are labelled, never dropped
//! - **Serialized execution**: benchmarks submitted concurrently are measured
//!   one at a time, in submission order
//! - **Async candidates**: `Bencher::iter_async` awaits each iteration serially
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use steadybench::{BenchConfig, Harness, LogReporter};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let harness = Harness::new(BenchConfig::default())?.with_reporter(Arc::new(LogReporter));
//!
//!     let record = harness
//!         .bench_function("sum", "iter", |b| b.iter(|| (0..1_000u64).sum::<u64>()))
//!         .await?;
//!     println!("{:.1} ns", record.statistics.mean.point_estimate);
//!     Ok(())
//! }
//! ```
//!
//! ## Fixed inputs
//!
//! ```ignore
//! let sort = harness.group("sort");
//! sort.bench_with_input("unstable", vec![3u32; 1_000], |b, input| {
//!     b.iter(|| {
//!         let mut v = input.clone();
//!         v.sort_unstable();
//!         v
//!     })
//! })
//! .await?;
//! ```

mod analysis;
mod config;
mod gate;

pub use analysis::analyze;
pub use config::{BenchConfig, ConfigError, format_duration, parse_duration};
pub use gate::{ExecutionGate, GatePermit};

pub use steadybench_core::{BenchError, Bencher, discard};
pub use steadybench_report::{
    BenchmarkId, Distributions, Estimates, IdError, LogReporter, MeasurementRecord, Measurements,
    OutlierCounts, Reporter, Reports,
};
pub use steadybench_stats::{ConfidenceInterval, Distribution, Estimate, Fences, StatsError};

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use steadybench_report::panic_message;
use thiserror::Error;
use tracing::error;

/// Why a benchmark produced no record
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Group or function id was rejected
    #[error(transparent)]
    Id(#[from] IdError),
    /// Measurement failed or was unusable
    #[error(transparent)]
    Bench(BenchError),
    /// Statistics could not be computed
    #[error(transparent)]
    Stats(StatsError),
}

impl From<BenchError> for AnalysisError {
    fn from(err: BenchError) -> Self {
        match err {
            BenchError::Stats(e) => AnalysisError::Stats(e),
            other => AnalysisError::Bench(other),
        }
    }
}

impl From<StatsError> for AnalysisError {
    fn from(err: StatsError) -> Self {
        AnalysisError::Stats(err)
    }
}

/// Entry point: configuration, reporters and the execution gate
///
/// Cloning is cheap and clones share the gate, so benchmarks submitted through
/// any clone are serialized against each other.
#[derive(Debug, Clone)]
pub struct Harness {
    config: Arc<BenchConfig>,
    reports: Reports,
    gate: ExecutionGate,
    seed: Option<u64>,
}

impl Harness {
    /// Validate `config` and build a harness with no reporters
    pub fn new(config: BenchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            reports: Reports::new(),
            gate: ExecutionGate::new(),
            seed: None,
        })
    }

    /// Register a reporter
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reports.push(reporter);
        self
    }

    /// Seed the bootstrap generator for reproducible intervals
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Active configuration
    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Gate serializing this harness's benchmarks
    pub fn gate(&self) -> &ExecutionGate {
        &self.gate
    }

    /// Benchmarks sharing `group_id`
    pub fn group(&self, group_id: impl Into<String>) -> BenchmarkGroup<'_> {
        BenchmarkGroup {
            harness: self,
            group_id: group_id.into(),
        }
    }

    /// Measure `f` once every earlier submission has finished
    ///
    /// The measurement runs on tokio's blocking pool; this must be awaited
    /// inside a tokio runtime. A panicking routine fails only its own
    /// benchmark.
    pub async fn bench_function<F>(
        &self,
        group_id: impl Into<String>,
        function_id: impl Into<String>,
        f: F,
    ) -> Result<MeasurementRecord, AnalysisError>
    where
        F: FnMut(&mut Bencher) + Send + 'static,
    {
        let group_id = group_id.into();
        let function_id = function_id.into();
        let id = BenchmarkId::new(group_id.as_str(), function_id.as_str()).map_err(|e| {
            error!(group_id = %group_id, function_id = %function_id, "rejected benchmark: {e}");
            e
        })?;

        let permit = self.gate.acquire().await;
        self.reports.benchmark_start(&id);

        let config = Arc::clone(&self.config);
        let reports = self.reports.clone();
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let joined = tokio::task::spawn_blocking(move || {
            // Held until the record has been reported
            let _permit = permit;

            let result = catch_unwind(AssertUnwindSafe(|| {
                analyze(&id, &config, &reports, &mut rng, f)
            }))
            .unwrap_or_else(|panic| Err(BenchError::Panicked(panic_message(panic.as_ref()))));

            match &result {
                Ok(record) => reports.measurement_complete(&id, record),
                Err(e) => reports.benchmark_failed(&id, &e.to_string()),
            }
            result
        })
        .await;

        match joined {
            Ok(result) => result.map_err(AnalysisError::from),
            Err(e) => Err(BenchError::Runtime(e.to_string()).into()),
        }
    }

    /// Measure `f` against a fixed `input` built outside the timed region
    pub async fn bench_with_input<I, F>(
        &self,
        group_id: impl Into<String>,
        function_id: impl Into<String>,
        input: I,
        mut f: F,
    ) -> Result<MeasurementRecord, AnalysisError>
    where
        I: Send + 'static,
        F: FnMut(&mut Bencher, &I) + Send + 'static,
    {
        self.bench_function(group_id, function_id, move |b: &mut Bencher| f(b, &input))
            .await
    }
}

/// Benchmarks registered under one group id
#[derive(Debug, Clone)]
pub struct BenchmarkGroup<'a> {
    harness: &'a Harness,
    group_id: String,
}

impl BenchmarkGroup<'_> {
    /// Group id shared by every benchmark of this group
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// See [`Harness::bench_function`]
    pub async fn bench_function<F>(
        &self,
        function_id: impl Into<String>,
        f: F,
    ) -> Result<MeasurementRecord, AnalysisError>
    where
        F: FnMut(&mut Bencher) + Send + 'static,
    {
        self.harness
            .bench_function(self.group_id.as_str(), function_id, f)
            .await
    }

    /// See [`Harness::bench_with_input`]
    pub async fn bench_with_input<I, F>(
        &self,
        function_id: impl Into<String>,
        input: I,
        f: F,
    ) -> Result<MeasurementRecord, AnalysisError>
    where
        I: Send + 'static,
        F: FnMut(&mut Bencher, &I) + Send + 'static,
    {
        self.harness
            .bench_with_input(self.group_id.as_str(), function_id, input, f)
            .await
    }
}
