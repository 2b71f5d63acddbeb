use thiserror::Error;

pub type Result<T> = std::result::Result<T, LlmError>;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limited by provider: {0}")]
    RateLimited(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Provider returned no completion text")]
    EmptyCompletion,

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::Parse(err.to_string())
    }
}

/// Map a non-success HTTP status to the right error variant. 429 gets its
/// own variant so callers can tell quota exhaustion apart from hard failures.
pub(crate) fn status_error(status: u16, message: String) -> LlmError {
    if status == 429 {
        LlmError::RateLimited(message)
    } else {
        LlmError::Api { status, message }
    }
}
