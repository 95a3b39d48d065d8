//! The completion entry point used by every pipeline stage

use crate::completion::DEFAULT_MAX_TOKENS;
use crate::{CompletionRequest, LLMError, LLMProvider, Result, RetryPolicy, Tool};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Stateless wrapper around a provider that adds bounded retries
///
/// Model and tools are chosen per call by the caller; the gateway only holds
/// the transport (provider) and the retry policy.
#[derive(Clone)]
pub struct LlmGateway {
    provider: Arc<dyn LLMProvider>,
    retry: RetryPolicy,
    max_tokens: usize,
}

impl LlmGateway {
    /// Create a gateway over a provider
    pub fn new(provider: Arc<dyn LLMProvider>, retry: RetryPolicy) -> Self {
        Self {
            provider,
            retry,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Set the generation budget per call
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// The retry policy in force
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Send a system/user prompt pair and return the generated text
    ///
    /// Transient failures are retried per the policy; the final error is
    /// returned unchanged once attempts are exhausted. An empty completion
    /// counts as a transient failure.
    #[instrument(skip_all, fields(model = %model, provider = %self.provider.name()))]
    pub async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        model: &str,
        tools: Option<&[Tool]>,
    ) -> Result<String> {
        info!("Querying LLM ({})...", model);

        let request = self.build_request(system_prompt, user_prompt, model, tools);
        let operation = format!("completion:{model}");

        self.retry
            .execute(&operation, || {
                let request = request.clone();
                async move {
                    let response = self.provider.complete(request).await?;
                    if response.stop_reason.is_truncated() {
                        warn!("Completion from {} hit the token limit", model);
                    }
                    let text = response.text().trim().to_string();
                    if text.is_empty() {
                        return Err(LLMError::UnexpectedResponse(
                            "Model returned an empty completion".to_string(),
                        ));
                    }
                    Ok(text)
                }
            })
            .await
    }

    fn build_request(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        model: &str,
        tools: Option<&[Tool]>,
    ) -> CompletionRequest {
        CompletionRequest::prompt_pair(model, system_prompt, user_prompt)
            .with_max_tokens(self.max_tokens)
            .with_tools(tools)
    }
}

impl std::fmt::Debug for LlmGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmGateway")
            .field("provider", &self.provider.name())
            .field("retry", &self.retry)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}
