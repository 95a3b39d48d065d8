//! Error types for LLM operations

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LLMError>;

/// Failures of a completion call, split into transient and permanent kinds
#[derive(Error, Debug)]
pub enum LLMError {
    /// API request failed (5xx, timeouts reported by the server)
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid API key or authentication failed")]
    AuthenticationFailed,

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// HTTP transport error (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Missing choices, unparsable JSON or an empty completion
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl LLMError {
    /// Whether a retry has a chance of succeeding
    ///
    /// Network failures, rate limits, server errors and garbled responses are
    /// transient. Credential, configuration and request-shape errors are not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RequestFailed(_)
                | Self::RateLimitExceeded(_)
                | Self::HttpError(_)
                | Self::UnexpectedResponse(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(LLMError::RequestFailed("502".to_string()).is_transient());
        assert!(LLMError::RateLimitExceeded("slow down".to_string()).is_transient());
        assert!(LLMError::UnexpectedResponse("no choices".to_string()).is_transient());

        assert!(!LLMError::AuthenticationFailed.is_transient());
        assert!(!LLMError::InvalidRequest("bad".to_string()).is_transient());
        assert!(!LLMError::ModelNotFound("grok-0".to_string()).is_transient());
        assert!(!LLMError::ConfigurationError("missing key".to_string()).is_transient());
    }

    #[test]
    fn test_error_display() {
        let err = LLMError::ModelNotFound("grok-x".to_string());
        assert_eq!(err.to_string(), "Model not found: grok-x");
    }
}
