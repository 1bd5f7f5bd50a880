use thiserror::Error;

/// Top-level error type for the Bedside system.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for BedsideError`
/// so that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BedsideError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Directory error: {0}")]
    Directory(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for BedsideError {
    fn from(err: toml::de::Error) -> Self {
        BedsideError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for BedsideError {
    fn from(err: toml::ser::Error) -> Self {
        BedsideError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for BedsideError {
    fn from(err: serde_json::Error) -> Self {
        BedsideError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Bedside operations.
pub type Result<T> = std::result::Result<T, BedsideError>;
