//! Paired Data
//!
//! Two equal-length series, `(iterations, elapsed)` pairs in practice, used for
//! regression. Resampling draws pair indices so each `x` stays with its `y`.

use crate::bootstrap::{Distribution, resample_with};
use crate::StatsError;
use rand::Rng;

/// Equal-length `xs`/`ys` series with more than one pair and no NaN
#[derive(Debug, Clone)]
pub struct Data {
    xs: Box<[f64]>,
    ys: Box<[f64]>,
}

impl Data {
    /// Pair up `xs` and `ys`
    pub fn new(xs: &[f64], ys: &[f64]) -> Result<Self, StatsError> {
        if xs.len() != ys.len() {
            return Err(StatsError::LengthMismatch {
                xs: xs.len(),
                ys: ys.len(),
            });
        }
        if xs.len() < 2 {
            return Err(StatsError::TooFewObservations {
                got: xs.len(),
                min: 2,
            });
        }
        if xs.iter().chain(ys).any(|v| v.is_nan()) {
            return Err(StatsError::NotANumber);
        }

        Ok(Self {
            xs: xs.into(),
            ys: ys.into(),
        })
    }

    /// Independent variable
    pub fn x(&self) -> &[f64] {
        &self.xs
    }

    /// Dependent variable
    pub fn y(&self) -> &[f64] {
        &self.ys
    }

    /// Number of pairs
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Always `false`; a `Data` holds at least two pairs
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Bootstrap `statistic` over resampled pairs
    ///
    /// Every draw picks one index and takes both `xs[i]` and `ys[i]`.
    pub fn bootstrap<R, F>(
        &self,
        nresamples: usize,
        rng: &mut R,
        statistic: F,
    ) -> Result<Distribution, StatsError>
    where
        R: Rng + ?Sized,
        F: Fn(&Data) -> Result<f64, StatsError> + Sync,
    {
        let n = self.xs.len();
        let values = resample_with(nresamples, rng, |draw_rng| {
            let mut xs = Vec::with_capacity(n);
            let mut ys = Vec::with_capacity(n);
            for _ in 0..n {
                let i = draw_rng.gen_range(0..n);
                xs.push(self.xs[i]);
                ys.push(self.ys[i]);
            }
            statistic(&Data {
                xs: xs.into_boxed_slice(),
                ys: ys.into_boxed_slice(),
            })
        })?;

        Ok(Distribution::from_vec(values))
    }
}
