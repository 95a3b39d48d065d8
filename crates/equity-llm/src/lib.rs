//! LLM gateway for the equity research pipeline
//!
//! This crate wraps a remote chat-completion service behind a small,
//! provider-agnostic surface:
//!
//! - Message and completion request/response types
//! - Tool options (live web search) attached per call
//! - The [`LLMProvider`] trait and the xAI implementation
//! - [`RetryPolicy`] with bounded attempts and exponential backoff
//! - [`LlmGateway`], the `complete(system, user, model, tools)` entry point

pub mod completion;
pub mod error;
pub mod gateway;
pub mod messages;
pub mod provider;
pub mod providers;
pub mod retry;
pub mod tools;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use gateway::LlmGateway;
pub use messages::{Message, Role};
pub use provider::LLMProvider;
pub use retry::RetryPolicy;
pub use tools::{Tool, WebSearchOptions, web_search};
