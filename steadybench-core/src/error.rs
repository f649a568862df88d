use steadybench_stats::StatsError;
use thiserror::Error;

/// Reasons a single benchmark fails to produce an analysis
///
/// Every variant is fatal to the affected benchmark only.
#[derive(Debug, Error)]
pub enum BenchError {
    /// The candidate returned without calling an iteration primitive
    #[error(
        "benchmark routine returned without iterating (asked for {iters} iterations); \
         call `Bencher::iter`, `iter_async` or `iter_custom` exactly once"
    )]
    NoIteration {
        /// Iterations the invocation was asked for
        iters: u64,
    },

    /// The candidate called an iteration primitive more than once
    #[error(
        "benchmark routine iterated more than once (asked for {iters} iterations); \
         call `Bencher::iter`, `iter_async` or `iter_custom` exactly once"
    )]
    RepeatedIteration {
        /// Iterations the invocation was asked for
        iters: u64,
    },

    /// A sample measured exactly zero elapsed time
    #[error(
        "sample {sample} ({iters} iterations) measured zero elapsed time; \
         is the routine missing an await or an iteration?"
    )]
    DegenerateMeasurement {
        /// Zero-based index of the sample
        sample: usize,
        /// Iterations that sample ran
        iters: u64,
    },

    /// No async runtime could drive a suspending candidate
    #[error("failed to start async runtime: {0}")]
    Runtime(String),

    /// The candidate panicked
    #[error("benchmark panicked: {0}")]
    Panicked(String),

    /// Statistical precondition violated during analysis
    #[error(transparent)]
    Stats(#[from] StatsError),
}
