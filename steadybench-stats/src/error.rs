use thiserror::Error;

/// Precondition violations of the statistics library
///
/// These indicate misuse by the caller and are returned at the point of
/// detection instead of being folded into NaN results.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// A statistic was asked of an empty sample
    #[error("Percentiles are undefined for an empty sample")]
    EmptySample,

    /// An observation was NaN
    #[error("Sample contains NaN")]
    NotANumber,

    /// The statistic needs more observations
    #[error("Not enough observations: got {got}, need at least {min}")]
    TooFewObservations {
        /// Observations supplied
        got: usize,
        /// Observations required
        min: usize,
    },

    /// Paired series of unequal length
    #[error("Paired series differ in length: {xs} xs vs {ys} ys")]
    LengthMismatch {
        /// Length of the first series
        xs: usize,
        /// Length of the second series
        ys: usize,
    },

    /// Percentile outside `[0, 100]`
    #[error("Invalid percentile: {0} (must be between 0 and 100)")]
    PercentileOutOfRange(f64),

    /// Confidence level outside `(0, 1)`
    #[error("Invalid confidence level: {0} (must be between 0 and 1)")]
    InvalidConfidenceLevel(f64),

    /// A bootstrap was asked for zero resamples
    #[error("Bootstrap needs at least one resample")]
    ZeroResamples,
}
