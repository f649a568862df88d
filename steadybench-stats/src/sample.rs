//! Univariate Sample
//!
//! One series of observations. Every statistic is a pure function of the
//! numbers it was built from.

use crate::bootstrap::{Distribution, resample_with};
use crate::percentiles::Percentiles;
use crate::{MAD_SCALE, StatsError};
use rand::Rng;

/// Immutable, non-empty series of finite observations
#[derive(Debug, Clone)]
pub struct Sample(Box<[f64]>);

impl Sample {
    /// Build a sample from `numbers`
    ///
    /// Fails for an empty slice or any NaN.
    pub fn new(numbers: &[f64]) -> Result<Self, StatsError> {
        if numbers.is_empty() {
            return Err(StatsError::EmptySample);
        }
        if numbers.iter().any(|x| x.is_nan()) {
            return Err(StatsError::NotANumber);
        }
        Ok(Self(numbers.into()))
    }

    /// Observations in their original order
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; kept for API symmetry with slices
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Arithmetic mean
    pub fn mean(&self) -> f64 {
        self.0.iter().sum::<f64>() / self.0.len() as f64
    }

    /// Sample variance (`n - 1` denominator)
    ///
    /// `mean` may be passed in when the caller already computed it.
    pub fn variance(&self, mean: Option<f64>) -> Result<f64, StatsError> {
        let n = self.0.len();
        if n < 2 {
            return Err(StatsError::TooFewObservations { got: n, min: 2 });
        }

        let mean = mean.unwrap_or_else(|| self.mean());
        let sum_sq: f64 = self.0.iter().map(|x| (x - mean).powi(2)).sum();

        Ok(sum_sq / (n - 1) as f64)
    }

    /// Square root of [`Sample::variance`]
    pub fn std_dev(&self, mean: Option<f64>) -> Result<f64, StatsError> {
        self.variance(mean).map(f64::sqrt)
    }

    /// Percentile index over this sample
    pub fn percentiles(&self) -> Percentiles {
        Percentiles::from_checked(&self.0)
    }

    /// Median (50th percentile)
    pub fn median(&self) -> f64 {
        self.percentiles().median()
    }

    /// Median absolute deviation around `median`, scaled by [`MAD_SCALE`]
    ///
    /// Computes the median of the sample when `median` is `None`.
    pub fn median_abs_dev(&self, median: Option<f64>) -> f64 {
        let median = median.unwrap_or_else(|| self.median());
        let deviations: Vec<f64> = self.0.iter().map(|x| (x - median).abs()).collect();

        MAD_SCALE * Percentiles::from_checked(&deviations).median()
    }

    /// Nonparametric bootstrap of a four-valued statistic
    ///
    /// Each of `nresamples` resamples draws `n` observations uniformly with
    /// replacement, evaluates `statistic`, and appends each tuple component to
    /// its own [`Distribution`].
    pub fn bootstrap<R, F>(
        &self,
        nresamples: usize,
        rng: &mut R,
        statistic: F,
    ) -> Result<(Distribution, Distribution, Distribution, Distribution), StatsError>
    where
        R: Rng + ?Sized,
        F: Fn(&Sample) -> Result<(f64, f64, f64, f64), StatsError> + Sync,
    {
        let n = self.0.len();
        let tuples = resample_with(nresamples, rng, |draw_rng| {
            let resample: Box<[f64]> = (0..n).map(|_| self.0[draw_rng.gen_range(0..n)]).collect();
            statistic(&Sample(resample))
        })?;

        let mut a = Vec::with_capacity(tuples.len());
        let mut b = Vec::with_capacity(tuples.len());
        let mut c = Vec::with_capacity(tuples.len());
        let mut d = Vec::with_capacity(tuples.len());
        for (w, x, y, z) in tuples {
            a.push(w);
            b.push(x);
            c.push(y);
            d.push(z);
        }

        Ok((
            Distribution::from_vec(a),
            Distribution::from_vec(b),
            Distribution::from_vec(c),
            Distribution::from_vec(d),
        ))
    }
}
