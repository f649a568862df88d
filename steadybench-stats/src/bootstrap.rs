//! Bootstrap Resampling
//!
//! Shared resampling driver plus the types a bootstrap pass produces:
//! the per-statistic [`Distribution`], its [`ConfidenceInterval`] and the
//! reportable [`Estimate`].
//!
//! Resamples are split into fixed-size chunks. Each chunk gets its own `StdRng`
//! seeded from the caller's generator and runs on the rayon pool; chunk results
//! are concatenated in order, so a seeded caller gets reproducible output.

use crate::percentiles::Percentiles;
use crate::sample::Sample;
use crate::StatsError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

/// Resamples evaluated per rayon task
const RESAMPLES_PER_CHUNK: usize = 2_048;

/// Evaluate `draw` `nresamples` times, in parallel, with independent generators
pub(crate) fn resample_with<R, T, F>(
    nresamples: usize,
    rng: &mut R,
    draw: F,
) -> Result<Vec<T>, StatsError>
where
    R: Rng + ?Sized,
    T: Send,
    F: Fn(&mut StdRng) -> Result<T, StatsError> + Sync,
{
    if nresamples == 0 {
        return Err(StatsError::ZeroResamples);
    }

    let chunks: Vec<(u64, usize)> = (0..nresamples)
        .step_by(RESAMPLES_PER_CHUNK)
        .map(|start| {
            let len = RESAMPLES_PER_CHUNK.min(nresamples - start);
            (rng.gen::<u64>(), len)
        })
        .collect();

    let per_chunk: Vec<Vec<T>> = chunks
        .into_par_iter()
        .map(|(seed, len)| {
            let mut chunk_rng = StdRng::seed_from_u64(seed);
            (0..len)
                .map(|_| draw(&mut chunk_rng))
                .collect::<Result<Vec<T>, StatsError>>()
        })
        .collect::<Result<_, _>>()?;

    Ok(per_chunk.into_iter().flatten().collect())
}

/// Values of one statistic, one per bootstrap resample
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Distribution(Box<[f64]>);

impl Distribution {
    pub(crate) fn from_vec(values: Vec<f64>) -> Self {
        Self(values.into_boxed_slice())
    }

    /// Number of resamples accumulated
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the distribution holds no values
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw bootstrap values, in resample order
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Empirical percentile interval at `confidence_level`
    ///
    /// The bounds are the `50(1 - cl)` and `50(1 + cl)` percentiles of the
    /// distribution itself.
    pub fn confidence_interval(
        &self,
        confidence_level: f64,
    ) -> Result<ConfidenceInterval, StatsError> {
        if !(confidence_level > 0.0 && confidence_level < 1.0) {
            return Err(StatsError::InvalidConfidenceLevel(confidence_level));
        }

        let percentiles = Percentiles::new(&self.0)?;
        Ok(ConfidenceInterval {
            level: confidence_level,
            lower: percentiles.at(50.0 * (1.0 - confidence_level))?,
            upper: percentiles.at(50.0 * (1.0 + confidence_level))?,
        })
    }

    /// Standard deviation of the bootstrap values
    ///
    /// A single-resample distribution has no spread and reports zero.
    pub fn standard_error(&self) -> Result<f64, StatsError> {
        match self.0.len() {
            0 => Err(StatsError::EmptySample),
            1 => Ok(0.0),
            _ => Sample::new(&self.0)?.std_dev(None),
        }
    }
}

/// Confidence interval bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    /// Confidence level, in `(0, 1)`
    pub level: f64,
    /// Lower bound
    pub lower: f64,
    /// Upper bound
    pub upper: f64,
}

impl ConfidenceInterval {
    /// Whether `value` lies within the bounds, inclusive
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// Distance between the bounds
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Final reportable quantity for one statistic
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Estimate {
    /// Statistic evaluated on the original (unresampled) data
    pub point_estimate: f64,
    /// Standard deviation of the bootstrap distribution
    pub standard_error: f64,
    /// Percentile interval of the bootstrap distribution
    pub confidence_interval: ConfidenceInterval,
}

impl Estimate {
    /// Combine a point estimate with its bootstrap distribution
    pub fn new(
        point_estimate: f64,
        distribution: &Distribution,
        confidence_level: f64,
    ) -> Result<Self, StatsError> {
        Ok(Self {
            point_estimate,
            standard_error: distribution.standard_error()?,
            confidence_interval: distribution.confidence_interval(confidence_level)?,
        })
    }
}
