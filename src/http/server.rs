//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the redirect handler
//! - Wire up middleware (tracing, request ID, timeout)
//! - Fetch the mirror list and race the mirrors for every request
//! - Serve until the shutdown signal fires

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use url::Url;

use crate::config::ServiceConfig;
use crate::http::response::{redirect_to, ResolveError};
use crate::lifecycle::ShutdownSignal;
use crate::mirrors::{MirrorList, MirrorListError};
use crate::observability::metrics;
use crate::race::{MirrorRace, RaceResult};

/// Path answered without resolving a mirror.
const FAVICON_PATH: &str = "/favicon.ico";

/// Error type for server construction.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("mirror list: {0}")]
    MirrorList(#[from] MirrorListError),
    #[error("probe client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub mirrors: Arc<MirrorList>,
    pub race: Arc<MirrorRace>,
}

impl AppState {
    pub fn new(mirrors: MirrorList, race: MirrorRace) -> Self {
        Self {
            mirrors: Arc::new(mirrors),
            race: Arc::new(race),
        }
    }

    /// Find a mirror serving `path`.
    pub async fn resolve(&self, path: &str) -> Result<Url, ResolveError> {
        let candidates = self.mirrors.candidates().await?;
        match self.race.run(path, &candidates).await? {
            RaceResult::Selected(target) => Ok(target),
            RaceResult::TimedOut(cause) => Err(ResolveError::TimedOut(cause)),
        }
    }
}

/// HTTP server for the mirror redirector.
pub struct HttpServer {
    router: Router,
    race_timeout_secs: u64,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServiceConfig) -> Result<Self, ServerError> {
        let mirrors = MirrorList::from_config(&config.mirrors)?;
        let race = MirrorRace::from_config(&config.race)?;
        Ok(Self::with_state(config, AppState::new(mirrors, race)))
    }

    /// Create a server around prepared state.
    pub fn with_state(config: ServiceConfig, state: AppState) -> Self {
        let router = Self::build_router(&config, state);
        Self {
            router,
            race_timeout_secs: config.race.timeout_secs,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(redirect_handler))
            .route("/", any(redirect_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// The router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            race_timeout_secs = self.race_timeout_secs,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown.recv())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolve the request path to a mirror and redirect there.
async fn redirect_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let path = uri.path();
    if path == FAVICON_PATH {
        return StatusCode::NO_CONTENT.into_response();
    }

    let start_time = Instant::now();
    let request_id = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    match state.resolve(path).await {
        Ok(target) => {
            tracing::info!(request_id = %request_id, path = %path, target = %target, "Redirecting");
            metrics::record_resolution("selected", start_time);
            redirect_to(&target)
        }
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                path = %path,
                outcome = e.outcome(),
                error = %e,
                "No mirror could serve request"
            );
            metrics::record_resolution(e.outcome(), start_time);
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::race::probe::ProbeDispatcher;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn server() -> HttpServer {
        let mut config = ServiceConfig::default();
        config.mirrors.list_url = "file:///nonexistent/mirror-redirect/mirrors.txt".into();
        let mirrors = MirrorList::new(
            Url::parse(&config.mirrors.list_url).unwrap(),
            reqwest::Client::new(),
        )
        .unwrap();
        let race = MirrorRace::new(
            ProbeDispatcher::with_client(reqwest::Client::new(), 8),
            Duration::from_secs(1),
        );
        HttpServer::with_state(config, AppState::new(mirrors, race))
    }

    #[tokio::test]
    async fn test_favicon_ignored() {
        let response = server()
            .router()
            .oneshot(Request::get("/favicon.ico").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_unreadable_list_is_not_found_with_request_id() {
        let response = server()
            .router()
            .oneshot(Request::get("/pool/main/a.deb").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key("x-request-id"));
    }
}
