//! Per-mirror existence checks.
//!
//! # Responsibilities
//! - Build the target URL for every candidate
//! - Launch one `HEAD` probe per candidate, each in its own task
//! - Report successes into the shared conduit, absorb failures
//!
//! # Design Decisions
//! - Only `200 OK` counts as success; redirects are followed by the client
//! - Failures never leave this module except as a counter
//! - Every probe observes a cancellation token and a global permit pool

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::RaceConfig;
use crate::observability::metrics;
use crate::race::path::join_target;
use crate::race::Candidate;

/// Launches existence checks against candidate mirrors.
#[derive(Debug, Clone)]
pub struct ProbeDispatcher {
    client: reqwest::Client,
    permits: Arc<Semaphore>,
}

/// Handles to one dispatched set of probes.
pub struct Dispatch {
    /// Receives the target URL of every successful probe.
    pub successes: mpsc::Receiver<Url>,
    /// Number of probes that finished without success.
    pub failures: Arc<AtomicUsize>,
    /// The launched probe tasks.
    pub tasks: JoinSet<()>,
}

impl ProbeDispatcher {
    /// Create a dispatcher with its own HTTP client.
    pub fn new(config: &RaceConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config.max_in_flight_probes))
    }

    /// Create a dispatcher around an existing client.
    pub fn with_client(client: reqwest::Client, max_in_flight: usize) -> Self {
        Self {
            client,
            permits: Arc::new(Semaphore::new(max_in_flight)),
        }
    }

    /// Probes that may still start before the permit pool is exhausted.
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Probe `request_path` on every candidate concurrently.
    ///
    /// The success channel holds one slot per candidate so no probe ever
    /// blocks on it. Probes stop as soon as `cancel` fires.
    pub fn dispatch(
        &self,
        request_path: &str,
        candidates: &[Candidate],
        cancel: &CancellationToken,
    ) -> Dispatch {
        let (tx, successes) = mpsc::channel(candidates.len().max(1));
        let failures = Arc::new(AtomicUsize::new(0));
        let mut tasks = JoinSet::new();

        for candidate in candidates {
            let target = join_target(candidate.base(), request_path);
            let client = self.client.clone();
            let permits = self.permits.clone();
            let tx = tx.clone();
            let failures = failures.clone();
            let cancel = cancel.clone();

            tasks.spawn(async move {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::trace!(target = %target, "Probe cancelled");
                    }
                    found = exists(&client, &permits, target.clone()) => {
                        if found {
                            metrics::record_probe(true);
                            let _ = tx.try_send(target);
                        } else {
                            metrics::record_probe(false);
                            failures.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
            });
        }

        Dispatch {
            successes,
            failures,
            tasks,
        }
    }
}

/// Issue a `HEAD` request and report whether the resource exists.
async fn exists(client: &reqwest::Client, permits: &Semaphore, target: Url) -> bool {
    let Ok(_permit) = permits.acquire().await else {
        return false;
    };

    match client.head(target.clone()).send().await {
        Ok(response) if response.status() == StatusCode::OK => true,
        Ok(response) => {
            tracing::trace!(target = %target, status = %response.status(), "Probe rejected");
            false
        }
        Err(e) => {
            tracing::trace!(target = %target, error = %e, "Probe failed");
            false
        }
    }
}
