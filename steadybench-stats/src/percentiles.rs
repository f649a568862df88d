//! Percentile Computation
//!
//! Sorted copy of a sample answering arbitrary percentile queries by linear
//! interpolation between the two nearest ranks.

use crate::StatsError;

/// Sorted view of a sample
#[derive(Debug, Clone)]
pub struct Percentiles(Box<[f64]>);

impl Percentiles {
    /// Sort `numbers` into a percentile index
    ///
    /// Fails for an empty input or one containing NaN.
    pub fn new(numbers: &[f64]) -> Result<Self, StatsError> {
        if numbers.is_empty() {
            return Err(StatsError::EmptySample);
        }
        if numbers.iter().any(|x| x.is_nan()) {
            return Err(StatsError::NotANumber);
        }
        Ok(Self::from_checked(numbers))
    }

    /// Sort numbers already known to be non-empty and NaN-free
    pub(crate) fn from_checked(numbers: &[f64]) -> Self {
        debug_assert!(!numbers.is_empty());
        let mut sorted = numbers.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self(sorted.into_boxed_slice())
    }

    /// Value at percentile `p`, with `0 <= p <= 100`
    ///
    /// Uses linear interpolation between nearest ranks, `rank = p/100 * (n - 1)`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use steadybench_stats::Percentiles;
    /// let pct = Percentiles::new(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
    /// assert_eq!(pct.at(50.0).unwrap(), 3.0);
    /// assert_eq!(pct.at(100.0).unwrap(), 5.0);
    /// ```
    pub fn at(&self, p: f64) -> Result<f64, StatsError> {
        if !(0.0..=100.0).contains(&p) {
            return Err(StatsError::PercentileOutOfRange(p));
        }
        Ok(self.interpolate(p))
    }

    fn interpolate(&self, p: f64) -> f64 {
        let sorted = &self.0;
        let n = sorted.len();

        // p = 100 lands exactly on the last rank
        let rank = (p / 100.0) * (n - 1) as f64;
        let lower_idx = rank.floor() as usize;
        if lower_idx >= n - 1 {
            return sorted[n - 1];
        }
        let fraction = rank - lower_idx as f64;

        sorted[lower_idx] + fraction * (sorted[lower_idx + 1] - sorted[lower_idx])
    }

    /// 50th percentile
    pub fn median(&self) -> f64 {
        self.interpolate(50.0)
    }

    /// 25th, 50th and 75th percentiles
    pub fn quartiles(&self) -> (f64, f64, f64) {
        (
            self.interpolate(25.0),
            self.interpolate(50.0),
            self.interpolate(75.0),
        )
    }

    /// Interquartile range
    pub fn iqr(&self) -> f64 {
        let (q1, _, q3) = self.quartiles();
        q3 - q1
    }

    /// Sorted observations
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}
