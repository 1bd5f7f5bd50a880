//! Chat orchestrator: sessions, retrieval, and the provider round trip.
//!
//! Coordinates one chat turn end to end: validate the message, resolve the
//! session, retrieve directory context, stage the user turn, call the
//! completion provider, and commit or roll back.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bedside_core::config::ChatConfig;
use bedside_core::Message;
use bedside_directory::Directory;
use bedside_provider::{CompletionProvider, CompletionRequest};

use crate::conversation::Conversation;
use crate::error::ChatError;
use crate::prompt;

/// Bare greetings answered without a provider round trip.
const GREETINGS: [&str; 4] = ["hi", "hello", "hey", "yo"];

/// Reference to a retrieved record cited by a reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Reply to one chat turn.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub answer: String,
    pub sources: Vec<SourceRef>,
    pub session_id: Uuid,
}

/// Summary of an active session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub started_at: String,
    pub last_message_at: String,
    pub message_count: u32,
}

/// One chat session and its conversation state.
#[derive(Debug)]
struct Session {
    id: Uuid,
    started_at: i64,
    last_message_at: i64,
    message_count: u32,
    conversation: Conversation,
}

impl Session {
    fn new() -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: Uuid::new_v4(),
            started_at: now,
            last_message_at: now,
            message_count: 0,
            conversation: Conversation::new(),
        }
    }
}

/// Central chat coordinator. Sessions are scoped per caller-supplied ID and
/// serialized behind a single mutex; the mutex is never held across the
/// provider await.
pub struct ChatOrchestrator {
    directory: Arc<Directory>,
    provider: Arc<dyn CompletionProvider>,
    sessions: Mutex<HashMap<Uuid, Session>>,
    config: ChatConfig,
}

impl ChatOrchestrator {
    /// Create a new orchestrator with the given configuration.
    pub fn new(
        directory: Arc<Directory>,
        provider: Arc<dyn CompletionProvider>,
        config: ChatConfig,
    ) -> Self {
        Self {
            directory,
            provider,
            sessions: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Handle one chat turn.
    ///
    /// On success the session's history has grown by exactly two messages
    /// (user + assistant); on any provider failure the staged user turn is
    /// discarded and the history is unchanged.
    pub async fn send(
        &self,
        message: &str,
        session_id: Option<Uuid>,
    ) -> Result<ChatReply, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if message.len() > self.config.max_message_length {
            return Err(ChatError::MessageTooLong(self.config.max_message_length));
        }

        let sid = self.resolve_session(session_id)?;

        // Bare greetings get the canned reply: no provider call, history
        // untouched.
        if GREETINGS.contains(&message.trim().to_lowercase().as_str()) {
            return Ok(ChatReply {
                answer: self.config.greeting_reply.clone(),
                sources: Vec::new(),
                session_id: sid,
            });
        }

        let (augmented, sources) = if self.config.retrieval {
            let records = self.directory.retrieve(message);
            let sources = records
                .iter()
                .map(|r| SourceRef {
                    name: r.name.clone(),
                    link: r.details_link.clone(),
                })
                .collect();
            (Some(prompt::augment(message, &records)), sources)
        } else {
            (None, Vec::new())
        };

        // Stage the user turn and snapshot the outbound history. The lock
        // is released before the round trip.
        let outbound = {
            let mut sessions = self.lock_sessions()?;
            let session = sessions
                .get_mut(&sid)
                .ok_or(ChatError::SessionNotFound(sid))?;
            if !session.conversation.stage_user(message) {
                return Err(ChatError::State(
                    "a turn is already in flight for this session".to_string(),
                ));
            }
            session.conversation.outbound(augmented.as_deref())
        };

        let request = CompletionRequest {
            persona: self.config.persona.clone(),
            messages: outbound,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let result = self.provider.complete(&request).await;

        let mut sessions = self.lock_sessions()?;
        let session = sessions
            .get_mut(&sid)
            .ok_or(ChatError::SessionNotFound(sid))?;
        match result {
            Ok(answer) => {
                session.conversation.commit_assistant(answer.as_str());
                session.last_message_at = Utc::now().timestamp();
                session.message_count += 1;
                tracing::debug!(session = %sid, answer_len = answer.len(), "turn committed");
                Ok(ChatReply {
                    answer,
                    sources,
                    session_id: sid,
                })
            }
            Err(err) => {
                session.conversation.discard_staged();
                tracing::warn!(session = %sid, error = %err, "provider call failed; user turn rolled back");
                Err(ChatError::Provider(err))
            }
        }
    }

    /// Clear a session's conversation back to its initial state.
    ///
    /// Idempotent; returns whether a session existed to clear.
    pub fn reset(&self, session_id: Option<Uuid>) -> Result<bool, ChatError> {
        let mut sessions = self.lock_sessions()?;
        match session_id.and_then(|sid| sessions.get_mut(&sid)) {
            Some(session) => {
                session.conversation.reset();
                session.message_count = 0;
                tracing::debug!(session = %session.id, "conversation reset");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Committed message history for a session.
    pub fn history(&self, session_id: Uuid) -> Result<Vec<Message>, ChatError> {
        let sessions = self.lock_sessions()?;
        sessions
            .get(&session_id)
            .map(|s| s.conversation.messages().to_vec())
            .ok_or(ChatError::SessionNotFound(session_id))
    }

    /// List all active sessions as summaries.
    pub fn list_sessions(&self) -> Vec<SessionSummary> {
        let sessions = match self.sessions.lock() {
            Ok(s) => s,
            Err(_) => return Vec::new(),
        };
        sessions
            .values()
            .map(|s| SessionSummary {
                id: s.id,
                started_at: format_epoch(s.started_at),
                last_message_at: format_epoch(s.last_message_at),
                message_count: s.message_count,
            })
            .collect()
    }

    /// Number of active sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    // -- Private helpers --

    /// Resolve or create a session ID. Expired and unknown IDs get a fresh
    /// session.
    fn resolve_session(&self, requested: Option<Uuid>) -> Result<Uuid, ChatError> {
        let mut sessions = self.lock_sessions()?;

        if let Some(sid) = requested {
            if let Some(session) = sessions.get(&sid) {
                if !self.is_expired(session) {
                    return Ok(sid);
                }
                // Session expired; remove and create new.
                sessions.remove(&sid);
            }
        }

        let session = Session::new();
        let sid = session.id;
        sessions.insert(sid, session);
        Ok(sid)
    }

    fn is_expired(&self, session: &Session) -> bool {
        let timeout_secs = i64::from(self.config.session_timeout_minutes) * 60;
        Utc::now().timestamp() - session.last_message_at > timeout_secs
    }

    fn lock_sessions(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Session>>, ChatError> {
        self.sessions
            .lock()
            .map_err(|e| ChatError::State(format!("session lock poisoned: {}", e)))
    }
}

/// Format epoch seconds as ISO 8601 string.
fn format_epoch(epoch: i64) -> String {
    Utc.timestamp_opt(epoch, 0)
        .single()
        .map(|dt: DateTime<Utc>| dt.to_rfc3339())
        .unwrap_or_else(|| epoch.to_string())
}

// =============================================================================
// Tests
// =============================================================================
