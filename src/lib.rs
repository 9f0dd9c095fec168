//! Mirror redirector library.
//!
//! Resolves request paths to a live mirror by racing `HEAD` probes against
//! every mirror in a list and redirecting to the first one that answers.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod mirrors;
pub mod observability;
pub mod race;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use race::{Candidate, MirrorRace, RaceResult};
