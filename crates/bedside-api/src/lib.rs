//! Bedside API crate - axum HTTP server and route handlers.
//!
//! Provides the REST surface for the chat service: the chat and reset
//! operations, directory search, session inspection, and health checks.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
