//! Bencher - The Benchmark Iteration API
//!
//! A benchmark routine receives a `&mut Bencher` and must call exactly one
//! iteration primitive. The primitive runs the candidate `iters()` times
//! back-to-back and records the elapsed time of that loop only; anything the
//! routine does before the call (building inputs, allocating buffers) is not
//! measured.

use crate::BenchError;
use crate::measure::{Timer, discard};
use std::future::Future;
use std::time::Duration;

/// Iteration handle passed to benchmark routines
pub struct Bencher {
    iters: u64,
    elapsed: Duration,
    iterated: bool,
    failure: Option<BenchError>,

    // Cached runtime for iter_async outside a tokio context
    cached_runtime: Option<tokio::runtime::Runtime>,
}

impl Bencher {
    pub(crate) fn new() -> Self {
        Self {
            iters: 1,
            elapsed: Duration::ZERO,
            iterated: false,
            failure: None,
            cached_runtime: None,
        }
    }

    /// Arm the bencher for one routine invocation
    pub(crate) fn reset(&mut self, iters: u64) {
        self.iters = iters;
        self.elapsed = Duration::ZERO;
        self.iterated = false;
        self.failure = None;
    }

    /// Outcome of the last routine invocation
    pub(crate) fn outcome(&mut self) -> Result<Duration, BenchError> {
        if let Some(failure) = self.failure.take() {
            return Err(failure);
        }
        if !self.iterated {
            return Err(BenchError::NoIteration { iters: self.iters });
        }
        Ok(self.elapsed)
    }

    // Marks the invocation as iterated; false if it already was
    fn begin(&mut self) -> bool {
        if self.iterated {
            if self.failure.is_none() {
                self.failure = Some(BenchError::RepeatedIteration { iters: self.iters });
            }
            return false;
        }
        self.iterated = true;
        true
    }

    /// Number of iterations the current invocation must run
    pub fn iters(&self) -> u64 {
        self.iters
    }

    /// Time `iters()` back-to-back calls of a synchronous routine
    ///
    /// Every output is passed through [`discard`].
    #[inline]
    pub fn iter<O, R>(&mut self, mut routine: R)
    where
        R: FnMut() -> O,
    {
        if !self.begin() {
            return;
        }

        let timer = Timer::start();
        for _ in 0..self.iters {
            discard(routine());
        }
        self.elapsed = timer.stop();
    }

    /// Time `iters()` calls of a routine that measures itself
    ///
    /// `routine` receives the iteration count and returns the elapsed time it
    /// observed for that many iterations.
    #[inline]
    pub fn iter_custom<R>(&mut self, mut routine: R)
    where
        R: FnMut(u64) -> Duration,
    {
        if !self.begin() {
            return;
        }
        self.elapsed = routine(self.iters);
    }

    /// Time `iters()` serial awaits of a suspending routine
    ///
    /// Each future is awaited to completion before the next is created. The
    /// loop is driven by the ambient tokio runtime when called from a blocking
    /// thread of one (as the harness does), otherwise by a current-thread
    /// runtime cached in this bencher. Must not be called from inside an async
    /// task.
    pub fn iter_async<O, R, Fut>(&mut self, mut routine: R)
    where
        R: FnMut() -> Fut,
        Fut: Future<Output = O>,
    {
        if !self.begin() {
            return;
        }
        let iters = self.iters;

        let timed_loop = async move {
            let timer = Timer::start();
            for _ in 0..iters {
                discard(routine().await);
            }
            timer.stop()
        };

        // A current-thread runtime only drives its timers and IO from its own
        // block_on, so only a multi-thread handle can be borrowed here
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            if handle.runtime_flavor() == tokio::runtime::RuntimeFlavor::MultiThread {
                self.elapsed = handle.block_on(timed_loop);
                return;
            }
        }

        let rt = match self.cached_runtime.take() {
            Some(rt) => rt,
            None => match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    self.failure = Some(BenchError::Runtime(e.to_string()));
                    return;
                }
            },
        };
        self.elapsed = rt.block_on(timed_loop);
        self.cached_runtime = Some(rt);
    }
}
