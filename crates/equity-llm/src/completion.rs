//! Completion request and response types
//!
//! Every call in the pipeline is single-turn: one system prompt, one user
//! prompt, a model and an optional tool set.

use crate::{Message, Role, Tool};
use serde::{Deserialize, Serialize};

/// Generation budget used when the caller does not set one
pub const DEFAULT_MAX_TOKENS: usize = 8192;

/// A single-turn completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier (provider-specific)
    pub model: String,

    /// User messages; the pipeline sends exactly one
    pub messages: Vec<Message>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    pub max_tokens: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Tools enabled for this call only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
}

impl CompletionRequest {
    /// System prompt plus one user message
    pub fn prompt_pair(
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![Message::user(user_prompt)],
            system: Some(system_prompt.into()),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
            tools: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Attach tools; `None` or an empty slice leaves the call tool-free
    pub fn with_tools(mut self, tools: Option<&[Tool]>) -> Self {
        self.tools = tools.filter(|t| !t.is_empty()).map(<[Tool]>::to_vec);
        self
    }

    /// Text of the last user message
    pub fn user_prompt(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map_or("", Message::text)
    }
}

/// Response from LLM completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub message: Message,

    pub stop_reason: StopReason,

    pub usage: TokenUsage,

    /// Source URLs returned by search-enabled calls
    #[serde(default)]
    pub citations: Vec<String>,
}

impl CompletionResponse {
    pub fn text(&self) -> &str {
        self.message.text()
    }
}

/// Reason the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    /// Output was cut off by the token budget
    MaxTokens,
    ToolUse,
}

impl StopReason {
    /// Map an OpenAI-style `finish_reason`; unknown values count as a normal end
    pub fn from_finish_reason(reason: &str) -> Self {
        match reason {
            "length" => Self::MaxTokens,
            "tool_calls" => Self::ToolUse,
            _ => Self::EndTurn,
        }
    }

    pub fn is_truncated(self) -> bool {
        self == Self::MaxTokens
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: usize,
    pub output_tokens: usize,
}

impl TokenUsage {
    pub fn total(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}
