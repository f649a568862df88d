//! Timing and Result Sinking
//!
//! Wall-clock timer for the iteration loop and the opaque sink that keeps
//! benchmarked values alive past the optimizer.

use std::time::{Duration, Instant};

/// Timer for measuring benchmark iterations
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed time since [`Timer::start`]
    #[inline(always)]
    pub fn stop(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Hand `value` to an opaque sink so the computation producing it cannot be
/// eliminated as dead code
#[inline(always)]
pub fn discard<T>(value: T) {
    drop(std::hint::black_box(value));
}

/// Whole nanoseconds in `d`, saturating at `u64::MAX`
pub fn as_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}
