//! Report Data Structures
//!
//! The structured record a finished analysis hands to reporters.

use crate::id::BenchmarkId;
use serde::Serialize;
use steadybench_stats::{Distribution, Estimate, Fences, LabeledSample};

/// Complete result of one benchmark
#[derive(Debug, Clone, Serialize)]
pub struct MeasurementRecord {
    /// Group the benchmark belongs to
    pub group_id: String,
    /// Function within the group
    pub function_id: String,
    /// `group_id/function_id`
    pub title: String,
    /// Raw samples
    pub measurements: Measurements,
    /// Point estimates with confidence intervals
    pub statistics: Estimates,
    /// Bootstrap distributions behind `statistics`
    pub distributions: Distributions,
}

impl MeasurementRecord {
    /// Assemble a record for `id`
    pub fn new(
        id: &BenchmarkId,
        measurements: Measurements,
        statistics: Estimates,
        distributions: Distributions,
    ) -> Self {
        Self {
            group_id: id.group_id().to_string(),
            function_id: id.function_id().to_string(),
            title: id.title(),
            measurements,
            statistics,
            distributions,
        }
    }
}

/// Raw samples plus their outlier fencing
#[derive(Debug, Clone, Serialize)]
pub struct Measurements {
    /// Iterations run by each sample
    pub iters: Vec<f64>,
    /// Elapsed nanoseconds of each sample
    pub times: Vec<f64>,
    /// `times[i] / iters[i]`
    pub averages: Vec<f64>,
    /// Tukey fences over `averages`
    pub tukey_fences: Fences,
    /// Outliers among `averages`
    pub outliers: OutlierCounts,
}

/// Outliers per severity class, each counted on its own
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutlierCounts {
    /// Below the severe low fence
    pub low_severe: usize,
    /// Between the severe and mild low fences
    pub low_mild: usize,
    /// Between the mild and severe high fences
    pub high_mild: usize,
    /// Above the severe high fence
    pub high_severe: usize,
}

impl OutlierCounts {
    /// Total outliers of any class
    pub fn total(&self) -> usize {
        self.low_severe + self.low_mild + self.high_mild + self.high_severe
    }
}

impl From<&LabeledSample<'_>> for OutlierCounts {
    fn from(labeled: &LabeledSample<'_>) -> Self {
        let (low_severe, low_mild, high_mild, high_severe) = labeled.counts();
        Self {
            low_severe,
            low_mild,
            high_mild,
            high_severe,
        }
    }
}

/// Point estimates with confidence intervals
#[derive(Debug, Clone, Serialize)]
pub struct Estimates {
    /// Mean time per iteration
    pub mean: Estimate,
    /// Median time per iteration
    pub median: Estimate,
    /// Scaled median absolute deviation
    pub median_abs_dev: Estimate,
    /// Sample standard deviation
    pub std_dev: Estimate,
    /// Per-iteration cost from the linear model; absent when regression is disabled
    pub slope: Option<Estimate>,
    /// Goodness of fit of the point slope
    pub r_squared: Option<f64>,
}

/// Bootstrap distributions behind [`Estimates`]
#[derive(Debug, Clone, Serialize)]
pub struct Distributions {
    /// Resampled means
    pub mean: Distribution,
    /// Resampled medians
    pub median: Distribution,
    /// Resampled MADs
    pub median_abs_dev: Distribution,
    /// Resampled standard deviations
    pub std_dev: Distribution,
    /// Absent when regression is disabled
    pub slope: Option<Distribution>,
}
