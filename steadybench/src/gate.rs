//! Execution Gate
//!
//! Serializes benchmark execution: at most one permit exists at a time and
//! waiters are admitted in the order they arrived. Releasing a permit hands
//! it straight to the oldest live waiter, so the gate never passes through
//! idle while work is queued.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;

#[derive(Debug, Default)]
struct GateState {
    running: bool,
    waiters: VecDeque<oneshot::Sender<()>>,
}

/// FIFO mutual exclusion for benchmark tasks
///
/// Clones share the same gate.
#[derive(Debug, Clone, Default)]
pub struct ExecutionGate {
    state: Arc<Mutex<GateState>>,
}

/// Exclusive right to run; released on drop
///
/// Owned, so it can move into the thread that performs the measurement.
#[derive(Debug)]
#[must_use = "the gate is released as soon as the permit is dropped"]
pub struct GatePermit {
    gate: ExecutionGate,
}

impl Drop for GatePermit {
    fn drop(&mut self) {
        self.gate.release();
    }
}

// Cancelled while queued: forward a handoff that may already have arrived
struct Waiting {
    gate: ExecutionGate,
    rx: Option<oneshot::Receiver<()>>,
}

impl Drop for Waiting {
    fn drop(&mut self) {
        if let Some(mut rx) = self.rx.take() {
            rx.close();
            if rx.try_recv().is_ok() {
                self.gate.release();
            }
        }
    }
}

impl ExecutionGate {
    /// New idle gate
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        // The state is consistent between statements, so a poisoned lock is usable
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait for exclusive access
    pub async fn acquire(&self) -> GatePermit {
        let rx = {
            let mut state = self.lock();
            if !state.running {
                state.running = true;
                return GatePermit { gate: self.clone() };
            }
            let (tx, rx) = oneshot::channel();
            state.waiters.push_back(tx);
            rx
        };

        let mut waiting = Waiting {
            gate: self.clone(),
            rx: Some(rx),
        };
        if let Some(rx) = waiting.rx.as_mut() {
            // Senders live in the gate state, which outlives this borrow
            let _ = rx.await;
        }
        waiting.rx = None;

        GatePermit { gate: self.clone() }
    }

    /// Run `task` once every earlier submission has finished
    ///
    /// The gate is released when the task completes, fails or panics.
    pub async fn submit<F, Fut, T>(&self, task: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let _permit = self.acquire().await;
        task().await
    }

    /// Whether no task holds the gate
    pub fn is_idle(&self) -> bool {
        !self.lock().running
    }

    /// Number of callers waiting for the gate
    pub fn queued(&self) -> usize {
        self.lock().waiters.len()
    }

    fn release(&self) {
        let mut state = self.lock();
        while let Some(next) = state.waiters.pop_front() {
            // A dropped receiver belongs to a cancelled waiter
            if next.send(()).is_ok() {
                return;
            }
        }
        state.running = false;
    }
}
