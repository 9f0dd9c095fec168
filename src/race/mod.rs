//! Mirror race subsystem.
//!
//! # Data Flow
//! ```text
//! request path + candidate mirrors
//!     → path.rs (target URL per candidate)
//!     → probe.rs (one HEAD probe task per candidate)
//!     → collector.rs (first success off the conduit)
//!     → timeout.rs (deadline over the whole race)
//!     → RaceResult: Selected(url) | TimedOut(cause)
//! ```
//!
//! # Design Decisions
//! - No ordering among probes: the fastest responding mirror wins
//! - The conduit holds one slot per candidate; late winners never block
//! - Losing probes are cancelled and drained in the background
//! - Probe failures are only visible as a diagnostic count

pub mod collector;
pub mod path;
pub mod probe;
pub mod timeout;

use std::fmt;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::RaceConfig;
use crate::race::collector::RaceCollector;
use crate::race::probe::{Dispatch, ProbeDispatcher};
use crate::race::timeout::TimeoutGuard;

pub use path::join_target;

/// A mirror base URL believed to host the canonical content tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate(Url);

impl Candidate {
    pub fn new(base: Url) -> Self {
        Self(base)
    }

    pub fn base(&self) -> &Url {
        &self.0
    }
}

impl From<Url> for Candidate {
    fn from(base: Url) -> Self {
        Self(base)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Why a race ended without a winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutCause {
    /// Every probe finished and none succeeded.
    AllFailed { candidates: usize },
    /// Some probes had not answered when the deadline fired.
    Pending { failed: usize, pending: usize },
}

impl fmt::Display for TimeoutCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeoutCause::AllFailed { candidates } => {
                write!(f, "all {} mirrors failed", candidates)
            }
            TimeoutCause::Pending { failed, pending } => {
                write!(f, "{} mirrors failed, {} still pending", failed, pending)
            }
        }
    }
}

/// Terminal outcome of one race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaceResult {
    Selected(Url),
    TimedOut(TimeoutCause),
}

/// Errors raised before any probe is launched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RaceError {
    #[error("no candidate mirrors to race")]
    EmptyCandidateSet,
}

/// Races existence probes across mirrors under a deadline.
#[derive(Debug, Clone)]
pub struct MirrorRace {
    dispatcher: ProbeDispatcher,
    guard: TimeoutGuard,
}

impl MirrorRace {
    /// Build a race from configuration.
    pub fn from_config(config: &RaceConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(
            ProbeDispatcher::new(config)?,
            Duration::from_secs(config.timeout_secs),
        ))
    }

    pub fn new(dispatcher: ProbeDispatcher, deadline: Duration) -> Self {
        Self {
            dispatcher,
            guard: TimeoutGuard::new(deadline),
        }
    }

    pub fn deadline(&self) -> Duration {
        self.guard.deadline()
    }

    /// Find a mirror that serves `request_path`.
    ///
    /// Resolves with the target URL of the first mirror to answer `200 OK`,
    /// or with a timeout once the deadline elapses.
    pub async fn run(
        &self,
        request_path: &str,
        candidates: &[Candidate],
    ) -> Result<RaceResult, RaceError> {
        if candidates.is_empty() {
            return Err(RaceError::EmptyCandidateSet);
        }

        let started = Instant::now();
        let cancel = CancellationToken::new();
        let Dispatch {
            successes,
            failures,
            tasks,
        } = self.dispatcher.dispatch(request_path, candidates, &cancel);

        let winner = self
            .guard
            .bound(RaceCollector::new(successes).first_success())
            .await;

        cancel.cancel();
        tokio::spawn(drain(tasks));

        let result = match winner {
            Some(target) => RaceResult::Selected(target),
            None => {
                let failed = failures.load(Ordering::Relaxed);
                let cause = if failed >= candidates.len() {
                    TimeoutCause::AllFailed {
                        candidates: candidates.len(),
                    }
                } else {
                    TimeoutCause::Pending {
                        failed,
                        pending: candidates.len() - failed,
                    }
                };
                RaceResult::TimedOut(cause)
            }
        };

        tracing::debug!(
            path = %request_path,
            candidates = candidates.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            result = ?result,
            "Race resolved"
        );

        Ok(result)
    }
}

/// Join every probe of a finished race so none outlives it unobserved.
async fn drain(mut tasks: JoinSet<()>) {
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            if e.is_panic() {
                tracing::error!(error = %e, "Probe task panicked");
            }
        }
    }
}
