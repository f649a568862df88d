#![warn(missing_docs)]
//! steadybench Statistical Engine
//!
//! Turns raw `(iterations, elapsed)` measurements into confidence-bounded estimates:
//! - Percentile index with linear interpolation
//! - Sample statistics (mean, variance, median, MAD)
//! - Nonparametric bootstrap over single and paired series
//! - Tukey fences for outlier labelling
//! - Through-the-origin slope regression

mod bootstrap;
mod data;
mod error;
mod outliers;
mod percentiles;
mod regression;
mod sample;

pub use bootstrap::{ConfidenceInterval, Distribution, Estimate};
pub use data::Data;
pub use error::StatsError;
pub use outliers::{Fences, Label, LabeledSample, tukey};
pub use percentiles::Percentiles;
pub use regression::{Slope, dot};
pub use sample::Sample;

/// Default number of bootstrap resamples
pub const DEFAULT_NRESAMPLES: usize = 100_000;

/// Default confidence level (95%)
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Scale factor making MAD a consistent estimator of the standard deviation
/// for normally distributed data
pub const MAD_SCALE: f64 = 1.4826;
