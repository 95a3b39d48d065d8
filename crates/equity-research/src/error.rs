//! Error types for the research pipeline

use thiserror::Error;

/// Research pipeline errors
#[derive(Debug, Error)]
pub enum ResearchError {
    /// Missing or invalid configuration (fatal, never retried)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Market data provider failure for a ticker
    #[error("Market data error for {symbol}: {reason}")]
    MarketData { symbol: String, reason: String },

    /// Yahoo Finance session or payload error
    #[error("Yahoo Finance error: {0}")]
    Yahoo(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Completion failed after retries
    #[error("Completion error: {0}")]
    Completion(#[from] equity_llm::LLMError),

    /// Prompt rendering failed
    #[error("Prompt error: {0}")]
    Prompt(#[from] equity_prompt::PromptError),

    /// Writing report artifacts failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResearchError {
    /// True for the configuration category, reported apart from runtime failures
    pub fn is_config(&self) -> bool {
        match self {
            Self::Config(_) => true,
            Self::Completion(err) => matches!(
                err,
                equity_llm::LLMError::ConfigurationError(_)
                    | equity_llm::LLMError::AuthenticationFailed
            ),
            _ => false,
        }
    }
}

/// Result type alias for research operations
pub type Result<T> = std::result::Result<T, ResearchError>;
