//! Adapter for the Gemini generateContent wire format.
//!
//! Conversation turns travel as `contents` of `{role, parts:[{text}]}` with
//! roles `user`/`model`, the persona as `systemInstruction`, generation
//! parameters under `generationConfig`, and the API key in the
//! `x-goog-api-key` header. The reply sits at
//! `candidates[0].content.parts[0].text`; a safety block surfaces as an
//! empty candidate list with `promptFeedback.blockReason` set.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use bedside_core::Role;

use crate::error::ProviderError;
use crate::{error_detail, CompletionProvider, CompletionRequest};

pub struct GeminiProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "systemInstruction")]
    system_instruction: Instruction<'a>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Instruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default, rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(default, rename = "blockReason")]
    block_reason: Option<String>,
}

/// Gemini wire name for a history role. Assistant turns are "model";
/// system turns never appear in the history (the persona travels as
/// `systemInstruction`).
fn wire_role(role: Role) -> &'static str {
    match role {
        Role::Assistant => "model",
        Role::User | Role::System => "user",
    }
}

impl GeminiProvider {
    /// Create an adapter for a Generative Language API endpoint.
    ///
    /// `endpoint` is the API base (e.g.
    /// `https://generativelanguage.googleapis.com/v1beta`); the
    /// `models/{model}:generateContent` path is appended per request.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Unreachable(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }
}

/// Extract the reply text from a decoded response envelope, distinguishing
/// a safety block from a plain empty response.
fn extract_text(response: GenerateContentResponse) -> Result<String, ProviderError> {
    if response.candidates.is_empty() {
        if let Some(reason) = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
        {
            return Err(ProviderError::ContentBlocked { reason });
        }
        return Err(ProviderError::EmptyResponse);
    }

    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or(ProviderError::EmptyResponse)
}

#[async_trait::async_trait]
impl CompletionProvider for GeminiProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let contents: Vec<Content<'_>> = request
            .messages
            .iter()
            .map(|m| Content {
                role: wire_role(m.role),
                parts: vec![Part { text: &m.content }],
            })
            .collect();

        let body = GenerateContentRequest {
            contents,
            system_instruction: Instruction {
                parts: vec![Part {
                    text: &request.persona,
                }],
            },
            generation_config: GenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
            },
        };
        let url = format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        );

        tracing::debug!(url = %url, turns = request.messages.len(), "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ProviderError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = error_detail(&body);
            tracing::warn!(status = status.as_u16(), detail = %detail, "generateContent request failed");
            return Err(ProviderError::from_status(status.as_u16(), detail));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;
        extract_text(parsed)
    }
}
