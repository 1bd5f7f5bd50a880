//! Normalized completion-provider failures.

use bedside_core::error::BedsideError;

/// Errors from a completion round trip.
///
/// Every failure the transport or the vendor can produce maps onto exactly
/// one variant so callers can roll back conversation state and choose a
/// response status without inspecting vendor payloads.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("rate limited by the completion provider: {detail}")]
    RateLimited { detail: String },
    #[error("completion provider returned HTTP {status}: {detail}")]
    Http { status: u16, detail: String },
    #[error("completion request timed out")]
    Timeout,
    #[error("completion provider unreachable: {0}")]
    Unreachable(String),
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
    #[error("provider returned no response candidates")]
    EmptyResponse,
    #[error("request blocked by the provider safety filter: {reason}")]
    ContentBlocked { reason: String },
}

impl ProviderError {
    /// Classify a non-success HTTP status from the vendor.
    pub fn from_status(status: u16, detail: String) -> Self {
        if status == 429 {
            ProviderError::RateLimited { detail }
        } else {
            ProviderError::Http { status, detail }
        }
    }

    /// Classify a transport-level failure from the HTTP client.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Unreachable(err.to_string())
        }
    }
}

impl From<ProviderError> for BedsideError {
    fn from(err: ProviderError) -> Self {
        BedsideError::Provider(err.to_string())
    }
}
