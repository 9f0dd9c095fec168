//! First-success collection.

use tokio::sync::mpsc;
use url::Url;

/// Reads the success conduit of one race.
pub struct RaceCollector {
    successes: mpsc::Receiver<Url>,
}

impl RaceCollector {
    pub fn new(successes: mpsc::Receiver<Url>) -> Self {
        Self { successes }
    }

    /// Wait for the first successful probe.
    ///
    /// When every probe has finished without success the conduit closes; the
    /// future then stays pending so only the deadline can end the race.
    pub async fn first_success(mut self) -> Url {
        match self.successes.recv().await {
            Some(target) => target,
            None => std::future::pending().await,
        }
    }
}
