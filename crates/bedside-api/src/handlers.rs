//! Route handler functions for all API endpoints.
//!
//! Each handler extracts its input via axum extractors, drives the
//! orchestrator or the directory, and returns JSON responses.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bedside_chat::{SessionSummary, SourceRef};
use bedside_core::Message;
use bedside_directory::Record;

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub message: Option<String>,
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResetBody {
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponseBody {
    pub response: String,
    pub session_id: Uuid,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceRef>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResetResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<Record>,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionsResponse {
    pub sessions: Vec<SessionSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub records_loaded: u64,
    pub active_sessions: u64,
}

// =============================================================================
// Handler functions
// =============================================================================

/// POST /chat - run one conversation turn.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatBody>,
) -> Result<Json<ChatResponseBody>, ApiError> {
    let message = body.message.unwrap_or_default();
    let reply = state.orchestrator.send(&message, body.session_id).await?;
    Ok(Json(ChatResponseBody {
        response: reply.answer,
        session_id: reply.session_id,
        sources: reply.sources,
    }))
}

/// POST /reset - clear a session's conversation history.
///
/// Accepts an empty body (no session to clear is still ok) or a JSON body
/// naming the session.
pub async fn reset(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ResetResponse>, ApiError> {
    let session_id = if body.is_empty() {
        None
    } else {
        serde_json::from_slice::<ResetBody>(&body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))?
            .session_id
    };

    let existed = state.orchestrator.reset(session_id)?;
    let message = if existed {
        "Conversation history reset."
    } else {
        "No active conversation to reset."
    };
    Ok(Json(ResetResponse {
        status: "ok".to_string(),
        message: message.to_string(),
    }))
}

/// GET /directory/search - free-text search over the record dataset.
///
/// A missing or empty keyword returns an empty result set with a prompt
/// message, not an error.
pub async fn directory_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let keyword = params.q.unwrap_or_default();
    let keyword = keyword.trim();

    if keyword.is_empty() {
        return Json(SearchResponse {
            results: Vec::new(),
            message: "Please provide a keyword to search.".to_string(),
        });
    }

    let results: Vec<Record> = state
        .directory
        .search(keyword)
        .into_iter()
        .cloned()
        .collect();
    let message = if results.is_empty() {
        format!("No results found for '{}'.", keyword)
    } else {
        format!("Found {} result(s) for '{}'.", results.len(), keyword)
    };
    Json(SearchResponse { results, message })
}

/// GET /sessions - summaries of all active sessions.
pub async fn list_sessions(State(state): State<AppState>) -> Json<SessionsResponse> {
    Json(SessionsResponse {
        sessions: state.orchestrator.list_sessions(),
    })
}

/// GET /sessions/{id}/history - committed messages for a session.
pub async fn session_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let messages = state.orchestrator.history(id)?;
    Ok(Json(HistoryResponse { messages }))
}

/// GET /health - liveness and basic stats.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        records_loaded: state.directory.len() as u64,
        active_sessions: state.orchestrator.session_count() as u64,
    })
}
