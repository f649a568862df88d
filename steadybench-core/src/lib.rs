#![warn(missing_docs)]
//! steadybench Core - Measurement Runtime
//!
//! This crate provides the execution side of a benchmark:
//! - `Bencher`, the iteration handle routines must call exactly once
//! - `Routine`, which drives warm-up and planned sampling
//! - The linear iteration planner
//! - Wall-clock timing and the dead-code sink

mod bencher;
mod error;
mod measure;
mod planner;
mod routine;

pub use bencher::Bencher;
pub use error::BenchError;
pub use measure::{Timer, as_nanos, discard};
pub use planner::{BudgetAdvisory, IterationPlan, plan_iterations};
pub use routine::{Routine, WarmUp};

/// Default number of samples to collect
pub const DEFAULT_SAMPLE_SIZE: u64 = 100;

/// Minimum samples needed for a regression over the samples
pub const MIN_SAMPLE_SIZE: u64 = 2;

/// Largest accepted sample count
pub const MAX_SAMPLE_SIZE: u64 = 1_000_000;
