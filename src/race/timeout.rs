//! Race deadline enforcement.
//!
//! The deadline bounds the wait for a winner, not the probes themselves;
//! stopping the probes is the caller's job once the guard returns.

use std::future::Future;
use std::time::Duration;

/// Bounds a future by a single wall-clock deadline.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutGuard {
    deadline: Duration,
}

impl TimeoutGuard {
    pub fn new(deadline: Duration) -> Self {
        Self { deadline }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Run `fut` until it completes or the deadline elapses.
    /// Returns `None` on timeout.
    pub async fn bound<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::time::timeout(self.deadline, fut).await.ok()
    }
}
