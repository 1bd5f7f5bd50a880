//! Application state shared across all route handlers.
//!
//! AppState holds references to the orchestrator and the record directory.
//! It is passed to handlers via axum's State extractor.

use std::sync::Arc;
use std::time::Instant;

use bedside_chat::ChatOrchestrator;
use bedside_directory::Directory;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks.
#[derive(Clone)]
pub struct AppState {
    /// Per-session chat coordinator.
    pub orchestrator: Arc<ChatOrchestrator>,
    /// Read-only record dataset.
    pub directory: Arc<Directory>,
    /// Origins allowed by CORS.
    pub allowed_origins: Vec<String>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState with the given components.
    pub fn new(
        orchestrator: Arc<ChatOrchestrator>,
        directory: Arc<Directory>,
        allowed_origins: Vec<String>,
    ) -> Self {
        Self {
            orchestrator,
            directory,
            allowed_origins,
            start_time: Instant::now(),
        }
    }
}
