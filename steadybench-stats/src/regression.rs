//! Slope Regression
//!
//! One-parameter model `y = slope * x` fit through the origin by least squares.

use crate::data::Data;
use serde::Serialize;

/// Dot product of two equal-length slices
pub fn dot(xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    xs.iter().zip(ys).map(|(x, y)| x * y).sum()
}

/// Cost per unit of `x` in a through-the-origin linear model
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Slope(pub f64);

impl Slope {
    /// Least-squares fit: the projection of `y` onto `x`, `Σxy / Σx²`
    pub fn fit(data: &Data) -> Slope {
        let xs = data.x();
        let ys = data.y();

        Slope(dot(xs, ys) / dot(xs, xs))
    }

    /// Goodness of fit, `1 - SS_res / SS_tot`
    ///
    /// `SS_tot` is taken around the mean of `y`, so a slope worse than the flat
    /// mean line scores below zero.
    pub fn r_squared(&self, data: &Data) -> f64 {
        let xs = data.x();
        let ys = data.y();
        let y_bar = ys.iter().sum::<f64>() / ys.len() as f64;

        let mut ss_res = 0.0;
        let mut ss_tot = 0.0;
        for (&x, &y) in xs.iter().zip(ys) {
            ss_res += (y - self.0 * x).powi(2);
            ss_tot += (y - y_bar).powi(2);
        }

        1.0 - ss_res / ss_tot
    }
}
