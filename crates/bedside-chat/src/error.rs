//! Error types for the conversational core.

use uuid::Uuid;

use bedside_provider::ProviderError;

/// Errors from the chat engine.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("session state error: {0}")]
    State(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        let err = ChatError::EmptyMessage;
        assert_eq!(err.to_string(), "message cannot be empty");

        let err = ChatError::MessageTooLong(2000);
        assert_eq!(
            err.to_string(),
            "message exceeds maximum length of 2000 characters"
        );

        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let err = ChatError::SessionNotFound(id);
        assert_eq!(
            err.to_string(),
            "session not found: 550e8400-e29b-41d4-a716-446655440000"
        );

        let err = ChatError::State("lock poisoned".to_string());
        assert_eq!(err.to_string(), "session state error: lock poisoned");
    }

    #[test]
    fn test_provider_error_is_transparent() {
        let err: ChatError = ProviderError::Timeout.into();
        assert!(matches!(err, ChatError::Provider(ProviderError::Timeout)));
        assert_eq!(err.to_string(), "completion request timed out");
    }

    #[test]
    fn test_provider_rate_limited_round_trips() {
        let err: ChatError = ProviderError::RateLimited {
            detail: "quota".to_string(),
        }
        .into();
        match err {
            ChatError::Provider(ProviderError::RateLimited { detail }) => {
                assert_eq!(detail, "quota");
            }
            other => panic!("expected RateLimited, got {:?}", other),
        }
    }
}
