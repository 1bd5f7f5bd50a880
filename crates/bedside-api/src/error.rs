//! API error types and JSON error response formatting.
//!
//! ApiError maps internal errors onto HTTP status codes and the chat wire
//! body `{"response": ...}` so clients read one shape for replies and
//! failures alike.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use bedside_chat::ChatError;
use bedside_provider::ProviderError;

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable failure message, in the same field the chat endpoint
    /// uses for replies.
    pub response: String,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - missing or invalid input.
    BadRequest(String),
    /// 404 Not Found - resource does not exist.
    NotFound(String),
    /// 429 Too Many Requests - the completion provider is rate limiting us.
    RateLimited(String),
    /// 500 Internal Server Error - provider-side or unexpected failure.
    Internal(String),
    /// 503 Service Unavailable - completion provider unreachable.
    ServiceUnavailable(String),
    /// 504 Gateway Timeout - completion provider timed out.
    GatewayTimeout(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::RateLimited(msg) => (StatusCode::TOO_MANY_REQUESTS, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::GatewayTimeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
        };

        (status, Json(ErrorBody { response: message })).into_response()
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyMessage => {
                ApiError::BadRequest("Please enter a message.".to_string())
            }
            ChatError::MessageTooLong(max) => ApiError::BadRequest(format!(
                "Message is too long (maximum {} characters).",
                max
            )),
            ChatError::SessionNotFound(id) => {
                ApiError::NotFound(format!("Session not found: {}", id))
            }
            ChatError::State(msg) => ApiError::Internal(format!(
                "An unexpected internal error occurred: {}",
                msg
            )),
            ChatError::Provider(err) => ApiError::from(err),
        }
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::RateLimited { detail } => ApiError::RateLimited(format!(
                "The assistant is receiving too many requests right now. \
                 Please wait a moment and try again. (rate limited: {})",
                detail
            )),
            ProviderError::Http { status, detail } => {
                ApiError::Internal(format!("API Error ({}): {}", status, detail))
            }
            ProviderError::Timeout => ApiError::GatewayTimeout(
                "The completion service took too long to respond. Please try again.".to_string(),
            ),
            ProviderError::Unreachable(detail) => ApiError::ServiceUnavailable(format!(
                "Connection Error: could not reach the completion service. Details: {}",
                detail
            )),
            ProviderError::MalformedResponse(detail) => ApiError::Internal(format!(
                "The completion service returned an unexpected response: {}",
                detail
            )),
            ProviderError::EmptyResponse => ApiError::Internal(
                "The completion service returned no response candidates.".to_string(),
            ),
            ProviderError::ContentBlocked { reason } => ApiError::Internal(format!(
                "Your request was blocked by the provider safety filter. Reason: {}",
                reason
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_of(err: ApiError) -> String {
        match err {
            ApiError::BadRequest(m)
            | ApiError::NotFound(m)
            | ApiError::RateLimited(m)
            | ApiError::Internal(m)
            | ApiError::ServiceUnavailable(m)
            | ApiError::GatewayTimeout(m) => m,
        }
    }

    #[test]
    fn test_empty_message_maps_to_canonical_body() {
        let err: ApiError = ChatError::EmptyMessage.into();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert_eq!(message_of(err), "Please enter a message.");
    }

    #[test]
    fn test_rate_limited_mentions_rate_limiting() {
        let err: ApiError = ProviderError::RateLimited {
            detail: "quota exceeded".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::RateLimited(_)));
        let msg = message_of(err);
        assert!(msg.contains("rate limited"));
        assert!(msg.contains("quota exceeded"));
    }

    #[test]
    fn test_http_error_embeds_status_and_detail() {
        let err: ApiError = ProviderError::Http {
            status: 500,
            detail: "model overloaded".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::Internal(_)));
        let msg = message_of(err);
        assert!(msg.contains("API Error (500)"));
        assert!(msg.contains("model overloaded"));
    }

    #[test]
    fn test_timeout_maps_to_gateway_timeout() {
        let err: ApiError = ProviderError::Timeout.into();
        assert!(matches!(err, ApiError::GatewayTimeout(_)));
    }

    #[test]
    fn test_unreachable_maps_to_service_unavailable() {
        let err: ApiError = ProviderError::Unreachable("dns failure".to_string()).into();
        assert!(matches!(err, ApiError::ServiceUnavailable(_)));
        assert!(message_of(err).contains("dns failure"));
    }

    #[test]
    fn test_content_blocked_has_distinct_message() {
        let err: ApiError = ProviderError::ContentBlocked {
            reason: "SAFETY".to_string(),
        }
        .into();
        let msg = message_of(err);
        assert!(msg.contains("safety filter"));
        assert!(msg.contains("SAFETY"));
    }

    #[test]
    fn test_session_not_found_maps_to_404() {
        let id = uuid::Uuid::new_v4();
        let err: ApiError = ChatError::SessionNotFound(id).into();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert!(message_of(err).contains(&id.to_string()));
    }
}
