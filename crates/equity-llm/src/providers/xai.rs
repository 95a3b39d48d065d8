//! xAI provider implementation
//!
//! xAI exposes an OpenAI-compatible chat completions endpoint. Live web search
//! is requested through `search_parameters` on the same call.
//! See: https://docs.x.ai/docs/api-reference
//!
//! # Example
//!
//! ```no_run
//! use equity_llm::{CompletionRequest, LLMProvider};
//! use equity_llm::providers::{XaiConfig, XaiProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = XaiProvider::with_config(XaiConfig::new("xai-...").with_timeout(600))?;
//!
//!     let request = CompletionRequest::prompt_pair(
//!         "grok-4-1-fast-non-reasoning",
//!         "You are a financial data assistant.",
//!         "List three semiconductor tickers.",
//!     )
//!     .with_max_tokens(200);
//!
//!     let response = provider.complete(request).await?;
//!     println!("{}", response.text());
//!     Ok(())
//! }
//! ```

use crate::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, Result, StopReason,
    TokenUsage, Tool,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_XAI_API_BASE: &str = "https://api.x.ai/v1";
/// Reasoning models can think for a long time before answering
const DEFAULT_TIMEOUT_SECS: u64 = 3600;

/// Configuration for the xAI provider
#[derive(Clone)]
pub struct XaiConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base URL for the API (default: "https://api.x.ai/v1")
    pub api_base: String,

    /// Request timeout in seconds (default: 3600)
    pub timeout_secs: u64,
}

impl XaiConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_XAI_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

impl std::fmt::Debug for XaiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XaiConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// xAI Grok provider
pub struct XaiProvider {
    client: Client,
    config: XaiConfig,
}

impl XaiProvider {
    /// Create a provider with custom configuration
    pub fn with_config(config: XaiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LLMError::ConfigurationError(
                "xAI API key must not be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a provider with API key and default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(XaiConfig::new(api_key))
    }

    /// Get the current configuration
    pub fn config(&self) -> &XaiConfig {
        &self.config
    }
}

#[async_trait]
impl LLMProvider for XaiProvider {
    #[instrument(skip(self, request), fields(model = %request.model, api_base = %self.config.api_base))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        debug!("Sending request to xAI API at {}", self.config.api_base);

        let model = request.model.clone();
        let xai_request = build_request(request);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_base))
            .bearer_auth(&self.config.api_key)
            .json(&xai_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                401 | 403 => LLMError::AuthenticationFailed,
                429 => LLMError::RateLimitExceeded(error_text),
                404 => LLMError::ModelNotFound(model),
                408 => LLMError::RequestFailed(format!("HTTP {status}: {error_text}")),
                400..=499 => LLMError::InvalidRequest(format!("HTTP {status}: {error_text}")),
                _ => LLMError::RequestFailed(format!("HTTP {status}: {error_text}")),
            });
        }

        let xai_response: XaiResponse = response
            .json()
            .await
            .map_err(|e| LLMError::UnexpectedResponse(format!("Failed to parse response: {e}")))?;

        parse_response(xai_response)
    }

    fn name(&self) -> &'static str {
        "xai"
    }
}

// ============================================================================
// xAI-specific request types
// ============================================================================

#[derive(Debug, Serialize)]
struct XaiRequest {
    model: String,
    messages: Vec<XaiMessage>,
    max_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    search_parameters: Option<SearchParameters>,
}

#[derive(Debug, Serialize)]
struct XaiMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct SearchParameters {
    mode: &'static str,
    max_search_results: u32,
    return_citations: bool,
}

// ============================================================================
// xAI-specific response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct XaiResponse {
    choices: Vec<XaiChoice>,
    #[serde(default)]
    usage: Option<XaiUsage>,
    #[serde(default)]
    citations: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct XaiChoice {
    message: XaiResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct XaiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct XaiUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
}

// ============================================================================
// Conversion functions
// ============================================================================

/// Build the wire request; the system prompt leads the messages array
fn build_request(request: CompletionRequest) -> XaiRequest {
    let mut messages = Vec::with_capacity(request.messages.len() + 1);

    if let Some(system) = request.system {
        messages.push(XaiMessage {
            role: "system",
            content: system,
        });
    }

    messages.extend(request.messages.into_iter().map(|msg| XaiMessage {
        role: msg.role.as_str(),
        content: msg.content,
    }));

    let search_parameters = request.tools.as_deref().and_then(search_parameters);

    XaiRequest {
        model: request.model,
        messages,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
        search_parameters,
    }
}

fn search_parameters(tools: &[Tool]) -> Option<SearchParameters> {
    tools.iter().find_map(|tool| match tool {
        Tool::WebSearch(options) => Some(SearchParameters {
            mode: "on",
            max_search_results: options.max_search_results,
            return_citations: options.return_citations,
        }),
    })
}

fn parse_response(response: XaiResponse) -> Result<CompletionResponse> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LLMError::UnexpectedResponse("No choices in response".to_string()))?;

    let usage = response
        .usage
        .map(|u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        })
        .unwrap_or_default();

    debug!(
        "Received response - stop_reason: {:?}, tokens: {}/{}",
        choice.finish_reason, usage.input_tokens, usage.output_tokens
    );

    Ok(CompletionResponse {
        message: Message::assistant(choice.message.content.unwrap_or_default()),
        stop_reason: StopReason::from_finish_reason(choice.finish_reason.as_deref().unwrap_or("stop")),
        usage,
        citations: response.citations,
    })
}

// ============================================================================
// Tests
// ============================================================================
