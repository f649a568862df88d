//! Routine Driver
//!
//! Wraps a benchmark routine and drives it through the two measurement phases:
//! a doubling warm-up that estimates the per-iteration cost, and the planned
//! sampling pass that records one elapsed time per iteration count.

use crate::bencher::Bencher;
use crate::measure::{Timer, as_nanos};
use crate::BenchError;
use std::time::Duration;

/// Outcome of the warm-up phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarmUp {
    /// Time measured inside the timed regions of all warm-up rounds
    pub elapsed: Duration,
    /// Iterations executed across all warm-up rounds
    pub iters: u64,
}

impl WarmUp {
    /// Mean execution time per iteration, in nanoseconds
    pub fn mean_ns(&self) -> f64 {
        self.elapsed.as_nanos() as f64 / self.iters as f64
    }
}

/// A benchmark routine bound to its bencher
pub struct Routine<F> {
    f: F,
    bencher: Bencher,
}

impl<F> Routine<F>
where
    F: FnMut(&mut Bencher),
{
    /// Wrap a routine; it is not invoked until a phase is run
    pub fn new(f: F) -> Self {
        Self {
            f,
            bencher: Bencher::new(),
        }
    }

    /// Invoke the routine once for `iters` iterations
    ///
    /// Fails with [`BenchError::NoIteration`] when the routine returns without
    /// calling an iteration primitive.
    pub fn run(&mut self, iters: u64) -> Result<Duration, BenchError> {
        self.bencher.reset(iters);
        (self.f)(&mut self.bencher);
        self.bencher.outcome()
    }

    /// Run rounds of 1, 2, 4, ... iterations until `how_long` has been measured
    ///
    /// Wall-clock time also ends the warm-up, so a routine whose timed region
    /// reads zero still terminates.
    pub fn warm_up(&mut self, how_long: Duration) -> Result<WarmUp, BenchError> {
        let wall = Timer::start();
        let mut iters = 1u64;
        let mut total_iters = 0u64;
        let mut elapsed = Duration::ZERO;

        loop {
            elapsed = elapsed.saturating_add(self.run(iters)?);
            total_iters = total_iters.saturating_add(iters);

            if elapsed >= how_long || wall.stop() >= how_long {
                return Ok(WarmUp {
                    elapsed,
                    iters: total_iters,
                });
            }
            iters = iters.saturating_mul(2);
        }
    }

    /// Invoke the routine once per entry of `iters`
    ///
    /// Returns elapsed nanoseconds, one per entry, in plan order.
    pub fn sample(&mut self, iters: &[u64]) -> Result<Vec<f64>, BenchError> {
        iters
            .iter()
            .map(|&n| self.run(n).map(|elapsed| as_nanos(elapsed) as f64))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spin(b: &mut Bencher) {
        b.iter(|| (0..64u64).sum::<u64>());
    }

    #[test]
    fn test_run_reports_elapsed() {
        let mut routine = Routine::new(|b: &mut Bencher| {
            b.iter_custom(|iters| Duration::from_nanos(iters * 10))
        });
        assert_eq!(routine.run(7).unwrap(), Duration::from_nanos(70));
    }

    #[test]
    fn test_run_without_iteration_fails() {
        let mut routine = Routine::new(|_: &mut Bencher| {});
        assert!(matches!(
            routine.run(3),
            Err(BenchError::NoIteration { iters: 3 })
        ));
    }

    #[test]
    fn test_warm_up_doubles() {
        let mut seen = Vec::new();
        let mut routine = Routine::new(|b: &mut Bencher| {
            seen.push(b.iters());
            b.iter_custom(|_| {
                std::thread::sleep(Duration::from_millis(1));
                Duration::from_millis(1)
            });
        });

        let warm_up = routine.warm_up(Duration::from_millis(5)).unwrap();
        drop(routine);

        // Oversleeping may end the warm-up on wall-clock time first
        assert!(seen.len() <= 5);
        assert_eq!(warm_up.elapsed, Duration::from_millis(seen.len() as u64));
        assert_eq!(warm_up.iters, seen.iter().sum::<u64>());
        for (i, &n) in seen.iter().enumerate() {
            assert_eq!(n, 1 << i);
        }
    }

    #[test]
    fn test_warm_up_mean() {
        let mut routine = Routine::new(spin);
        let warm_up = routine.warm_up(Duration::from_millis(2)).unwrap();

        assert!(warm_up.iters > 0);
        assert!(warm_up.mean_ns() > 0.0);
    }

    #[test]
    fn test_warm_up_stops_on_measured_time() {
        // Reports 1us per iteration without spending it
        let mut routine = Routine::new(|b: &mut Bencher| {
            b.iter_custom(|iters| Duration::from_micros(iters))
        });
        let warm_up = routine.warm_up(Duration::from_millis(1)).unwrap();

        // 1 + 2 + ... + 512 = 1023 iterations is the first total past 1ms
        assert_eq!(warm_up.iters, 1023);
        assert_eq!(warm_up.elapsed, Duration::from_micros(1023));
        assert!((warm_up.mean_ns() - 1_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_warm_up_ends_on_wall_clock_for_zero_readings() {
        let mut routine = Routine::new(|b: &mut Bencher| b.iter_custom(|_| Duration::ZERO));
        let warm_up = routine.warm_up(Duration::from_millis(2)).unwrap();

        assert_eq!(warm_up.elapsed, Duration::ZERO);
        assert!(warm_up.iters > 0);
    }

    #[test]
    fn test_warm_up_propagates_usage_error() {
        let mut routine = Routine::new(|_: &mut Bencher| {});
        assert!(routine.warm_up(Duration::from_millis(1)).is_err());
    }

    #[test]
    fn test_sample_follows_plan() {
        let mut routine = Routine::new(|b: &mut Bencher| {
            b.iter_custom(|iters| Duration::from_nanos(iters * 3))
        });
        let times = routine.sample(&[1, 2, 3]).unwrap();
        assert_eq!(times, vec![3.0, 6.0, 9.0]);
    }

    #[test]
    fn test_mean_ns() {
        let warm_up = WarmUp {
            elapsed: Duration::from_nanos(1_000),
            iters: 8,
        };
        assert!((warm_up.mean_ns() - 125.0).abs() < f64::EPSILON);
    }
}
