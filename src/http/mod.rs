//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Client request (any method, any path)
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → mirror list fetch + mirror race
//!     → response.rs (302 to the winner, or one generic 404)
//!     → Send to client
//! ```

pub mod response;
pub mod server;

pub use response::{ResolveError, NO_MIRROR_MESSAGE};
pub use server::{AppState, HttpServer, ServerError};
