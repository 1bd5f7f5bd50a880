//! Completion-provider abstraction and vendor adapters.
//!
//! The chat orchestrator is written against [`CompletionProvider`]; the
//! adapters in this crate translate a conversation into the two observed
//! vendor wire formats (flat chat-completions messages and Gemini
//! contents/parts) and normalize their failures into [`ProviderError`].

pub mod error;
pub mod gemini;
pub mod openai;
pub mod scripted;

use async_trait::async_trait;

use bedside_core::Message;

pub use error::ProviderError;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use scripted::ScriptedProvider;

/// Parameters for one completion round trip.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System-level instruction fixing the assistant's tone and role.
    /// Carried out-of-band by both vendor formats, never in the history.
    pub persona: String,
    /// Ordered conversation turns, oldest first.
    pub messages: Vec<Message>,
    /// Maximum tokens the model may generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

/// External capability that turns a message history into generated text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run one completion round trip and return the reply text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;
}

/// Pull the human-readable detail out of a vendor failure body.
///
/// Both observed vendors wrap failures as `{"error": {"message": ...}}`;
/// anything else falls back to the trimmed raw body.
pub(crate) fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
