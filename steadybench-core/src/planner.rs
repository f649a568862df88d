//! Iteration Planner
//!
//! Chooses the iteration count of every sample. Sample `i` (1-based) runs
//! `i * d` iterations, so the `(iterations, elapsed)` pairs lie on one line and
//! feed a well-conditioned slope regression. The step `d` is solved from
//!
//! ```text
//! Σ_{i=1..n} i·d·met = target   =>   d = ceil(target / (met · n(n+1)/2))
//! ```
//!
//! and floored at 1.

use std::time::Duration;

/// Raised when even `d = 1` overshoots the measurement budget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetAdvisory {
    /// Budget that was asked for, in nanoseconds
    pub requested_ns: u64,
    /// Expected sampling time at `d = 1`, in nanoseconds
    pub expected_ns: u64,
}

impl BudgetAdvisory {
    /// Budget long enough to fit the requested sample count
    pub fn suggested(&self) -> Duration {
        Duration::from_nanos(self.expected_ns)
    }
}

/// Planned iteration counts for one benchmark
#[derive(Debug, Clone, PartialEq)]
pub struct IterationPlan {
    /// Iterations per sample: `[d, 2d, ..., n·d]`
    pub iters: Vec<u64>,
    /// Common step `d`
    pub step: u64,
    /// Expected total sampling time, in nanoseconds
    pub expected_ns: f64,
    /// Set when the budget cannot be met even at `d = 1`
    pub advisory: Option<BudgetAdvisory>,
}

impl IterationPlan {
    /// Sum of all planned iterations
    pub fn total_iters(&self) -> u64 {
        self.iters.iter().fold(0u64, |acc, &n| acc.saturating_add(n))
    }
}

/// Plan `sample_size` linearly growing iteration counts whose expected total
/// time approximates `target`
///
/// `met_ns` is the warm-up estimate of nanoseconds per iteration.
pub fn plan_iterations(met_ns: f64, sample_size: u64, target: Duration) -> IterationPlan {
    debug_assert!(met_ns > 0.0, "mean execution time must be positive");

    let target_ns = target.as_nanos() as f64;
    // n(n+1)/2 in floating point; the integer form overflows for huge n
    let n = sample_size as f64;
    let total_runs = n * (n + 1.0) / 2.0;
    let exact_step = target_ns / (met_ns * total_runs);

    let step = if exact_step < 1.0 {
        1
    } else {
        // `as` saturates for out-of-range floats
        exact_step.ceil() as u64
    };

    let iters: Vec<u64> = (1..=sample_size).map(|i| i.saturating_mul(step)).collect();
    let expected_ns = step as f64 * total_runs * met_ns;

    let advisory = (exact_step < 1.0).then(|| BudgetAdvisory {
        requested_ns: target_ns as u64,
        expected_ns: expected_ns.ceil() as u64,
    });

    IterationPlan {
        iters,
        step,
        expected_ns,
        advisory,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_plan() {
        // 10 samples -> 55 runs; 55 * 100ns * 2 = 11_000ns
        let plan = plan_iterations(100.0, 10, Duration::from_nanos(11_000));

        assert_eq!(plan.step, 2);
        assert_eq!(plan.iters, vec![2, 4, 6, 8, 10, 12, 14, 16, 18, 20]);
        assert_eq!(plan.total_iters(), 110);
        assert!((plan.expected_ns - 11_000.0).abs() < 1e-6);
        assert!(plan.advisory.is_none());
    }

    #[test]
    fn test_step_rounds_up() {
        let plan = plan_iterations(100.0, 10, Duration::from_nanos(11_001));
        assert_eq!(plan.step, 3);
        assert!(plan.advisory.is_none());
    }

    #[test]
    fn test_exact_single_step_is_not_advised() {
        let plan = plan_iterations(10.0, 4, Duration::from_nanos(100));
        assert_eq!(plan.step, 1);
        assert!(plan.advisory.is_none());
    }

    #[test]
    fn test_unreachable_budget() {
        // 100 samples need 5050 iterations; at 1ms each that is ~5s, not 1s
        let plan = plan_iterations(1_000_000.0, 100, Duration::from_secs(1));

        assert_eq!(plan.step, 1);
        assert_eq!(plan.iters.len(), 100);
        assert_eq!(plan.iters[99], 100);

        let advisory = plan.advisory.unwrap();
        assert_eq!(advisory.requested_ns, 1_000_000_000);
        assert_eq!(advisory.expected_ns, 5_050_000_000);
        assert_eq!(advisory.suggested(), Duration::from_millis(5_050));
    }

    #[test]
    fn test_large_sample_size() {
        // 100_000 samples -> 5_000_050_000 runs at d = 1
        let plan = plan_iterations(1.0, 100_000, Duration::from_nanos(1));

        assert_eq!(plan.step, 1);
        assert_eq!(plan.iters[99_999], 100_000);
        assert_eq!(plan.advisory.unwrap().expected_ns, 5_000_050_000);
    }

    #[test]
    fn test_counts_strictly_increase() {
        let plan = plan_iterations(3.7, 100, Duration::from_secs(5));
        assert!(plan.iters[0] > 0);
        assert!(plan.iters.windows(2).all(|w| w[0] < w[1]));
    }
}
