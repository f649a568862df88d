#![warn(missing_docs)]
//! steadybench Report - Records and Reporters
//!
//! Everything a finished benchmark hands to the outside world:
//! - `BenchmarkId`, the `group/function` identity
//! - `MeasurementRecord`, raw samples plus estimates and distributions
//! - The `Reporter` observer, its `Reports` fan-out and a tracing-backed `LogReporter`

mod id;
mod report;
mod reporter;

pub use id::{BenchmarkId, IdError};
pub use report::{Distributions, Estimates, MeasurementRecord, Measurements, OutlierCounts};
pub use reporter::{LogReporter, Reporter, Reports, panic_message};
