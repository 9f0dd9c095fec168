//! Response emission.
//!
//! # Responsibilities
//! - Turn a selected mirror into a `302 Found` redirect
//! - Map every failure to one generic client-facing error
//!
//! # Design Decisions
//! - Clients see `404 Not Found` whatever went wrong; logs and metrics keep the cause
//! - Favicon requests are answered without touching the mirror list

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use url::Url;

use crate::mirrors::MirrorListError;
use crate::race::{RaceError, TimeoutCause};

/// Body sent with every failed resolution.
pub const NO_MIRROR_MESSAGE: &str = "No mirror could serve this path.";

/// Why a request could not be resolved to a mirror.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    MirrorList(#[from] MirrorListError),
    #[error("no mirrors found to handle request")]
    NoCandidates,
    #[error("timed out waiting for a mirror which can serve this path: {0}")]
    TimedOut(TimeoutCause),
}

impl ResolveError {
    /// Metric label for this failure.
    pub fn outcome(&self) -> &'static str {
        match self {
            ResolveError::MirrorList(_) => "list_error",
            ResolveError::NoCandidates => "no_candidates",
            ResolveError::TimedOut(TimeoutCause::AllFailed { .. }) => "timeout_all_failed",
            ResolveError::TimedOut(TimeoutCause::Pending { .. }) => "timeout_pending",
        }
    }
}

impl From<RaceError> for ResolveError {
    fn from(err: RaceError) -> Self {
        match err {
            RaceError::EmptyCandidateSet => ResolveError::NoCandidates,
        }
    }
}

impl IntoResponse for ResolveError {
    fn into_response(self) -> Response {
        (StatusCode::NOT_FOUND, NO_MIRROR_MESSAGE).into_response()
    }
}

/// Redirect the client to the winning mirror.
pub fn redirect_to(target: &Url) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, target.to_string())]).into_response()
}
