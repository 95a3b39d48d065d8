//! Shared handles every stage works with

use crate::config::DeskConfig;
use crate::error::Result;
use crate::prompts;
use equity_llm::providers::{XaiConfig, XaiProvider};
use equity_llm::{LlmGateway, Tool};
use equity_prompt::PromptRegistry;
use serde_json::json;
use std::sync::Arc;

/// Configuration, LLM gateway and prompt registry for one research run
///
/// Built once at process start; clones share the same handles.
#[derive(Clone, Debug)]
pub struct ResearchContext {
    pub config: Arc<DeskConfig>,
    pub llm: Arc<LlmGateway>,
    pub prompts: Arc<PromptRegistry>,
}

impl ResearchContext {
    pub fn new(config: DeskConfig, llm: LlmGateway, prompts: PromptRegistry) -> Self {
        Self {
            config: Arc::new(config),
            llm: Arc::new(llm),
            prompts: Arc::new(prompts),
        }
    }

    /// Wire the xAI provider and the research prompts from configuration
    pub fn from_config(config: DeskConfig) -> Result<Self> {
        let provider = XaiProvider::with_config(
            XaiConfig::new(config.api_key.clone())
                .with_api_base(config.api_base.clone())
                .with_timeout(config.llm_timeout.as_secs()),
        )?;

        let llm = LlmGateway::new(Arc::new(provider), config.retry.clone())
            .with_max_tokens(config.max_tokens);

        Ok(Self::new(config, llm, prompts::research_registry()?))
    }

    /// Render a registered template
    pub fn render(&self, template: &str, vars: &serde_json::Value) -> Result<String> {
        Ok(self.prompts.render(template, vars)?)
    }

    /// One completion: system template by name, rendered user prompt
    pub async fn ask(
        &self,
        system_template: &str,
        user_prompt: &str,
        model: &str,
        tools: Option<&[Tool]>,
    ) -> Result<String> {
        let system_prompt = self.render(system_template, &json!({}))?;
        Ok(self
            .llm
            .complete(&system_prompt, user_prompt, model, tools)
            .await?)
    }
}
