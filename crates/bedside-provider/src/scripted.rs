//! Scripted provider for tests and offline runs.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::ProviderError;
use crate::{CompletionProvider, CompletionRequest};

/// Provider that replays queued results and records every request it sees.
///
/// With an empty queue it returns [`ProviderError::EmptyResponse`].
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, ProviderError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    pub fn push_reply(&self, text: &str) {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Ok(text.to_string()));
    }

    /// Queue a failure.
    pub fn push_error(&self, err: ProviderError) {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Err(err));
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

#[async_trait::async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or(Err(ProviderError::EmptyResponse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bedside_core::Message;

    fn request(text: &str) -> CompletionRequest {
        CompletionRequest {
            persona: "You are Baymax.".to_string(),
            messages: vec![Message::user(text)],
            max_tokens: 128,
            temperature: 0.5,
        }
    }

    #[tokio::test]
    async fn test_replays_queued_replies_in_order() {
        let provider = ScriptedProvider::new();
        provider.push_reply("first");
        provider.push_reply("second");

        assert_eq!(provider.complete(&request("a")).await.unwrap(), "first");
        assert_eq!(provider.complete(&request("b")).await.unwrap(), "second");
    }

    #[tokio::test]
    async fn test_replays_queued_errors() {
        let provider = ScriptedProvider::new();
        provider.push_error(ProviderError::Timeout);

        let result = provider.complete(&request("a")).await;
        assert!(matches!(result, Err(ProviderError::Timeout)));
    }

    #[tokio::test]
    async fn test_empty_queue_is_empty_response() {
        let provider = ScriptedProvider::new();
        let result = provider.complete(&request("a")).await;
        assert!(matches!(result, Err(ProviderError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_records_requests() {
        let provider = ScriptedProvider::new();
        provider.push_reply("ok");
        provider.complete(&request("hello there")).await.unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(provider.request_count(), 1);
        assert_eq!(requests[0].messages[0].content, "hello there");
        assert_eq!(requests[0].persona, "You are Baymax.");
    }
}
