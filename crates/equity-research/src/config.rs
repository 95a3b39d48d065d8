//! Configuration for the research desk
//!
//! [`DeskConfig`] is built once at process start and handed to the gateways.

use crate::error::{ResearchError, Result};
use equity_llm::{RetryPolicy, Tool, WebSearchOptions};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_API_KEY: &str = "XAI_API_KEY";
pub const ENV_API_BASE: &str = "XAI_API_BASE";
pub const ENV_REASONING_MODEL: &str = "EQUITY_REASONING_MODEL";
pub const ENV_FAST_MODEL: &str = "EQUITY_FAST_MODEL";
pub const ENV_RESULTS_DIR: &str = "EQUITY_RESULTS_DIR";

pub const DEFAULT_API_BASE: &str = "https://api.x.ai/v1";
pub const DEFAULT_REASONING_MODEL: &str = "grok-4-1-fast-reasoning";
pub const DEFAULT_FAST_MODEL: &str = "grok-4-1-fast-non-reasoning";
pub const DEFAULT_RESULTS_DIR: &str = "results";

/// Configuration for a research run
#[derive(Clone)]
pub struct DeskConfig {
    /// xAI API key
    pub api_key: String,

    /// Base URL of the completion service
    pub api_base: String,

    /// Model used for synthesis and search-backed calls
    pub reasoning_model: String,

    /// Model used for mechanical formatting
    pub fast_model: String,

    /// Directory that receives report and metadata files
    pub results_dir: PathBuf,

    /// Ceiling for a single completion call
    pub llm_timeout: Duration,

    /// Max tokens requested per completion
    pub max_tokens: usize,

    /// Retry policy wrapped around every completion
    pub retry: RetryPolicy,

    /// Number of validated peers to collect
    pub peer_target: usize,

    /// Candidate tickers considered from the discovery response
    pub peer_candidate_cap: usize,

    /// News items kept per ticker
    pub news_cap: usize,

    /// Reporting periods kept per financial statement
    pub statement_periods: usize,

    /// Sources consulted by the web-search tool
    pub web_search_max_results: u32,

    /// Lifetime of cached provider responses
    pub cache_ttl: Duration,

    /// Market data requests allowed per minute
    pub market_requests_per_minute: u32,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            reasoning_model: DEFAULT_REASONING_MODEL.to_string(),
            fast_model: DEFAULT_FAST_MODEL.to_string(),
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            llm_timeout: Duration::from_secs(3600),
            max_tokens: 8192,
            retry: RetryPolicy::default(),
            peer_target: 3,
            peer_candidate_cap: 6,
            news_cap: 5,
            statement_periods: 3,
            web_search_max_results: 10,
            cache_ttl: Duration::from_secs(3600),
            market_requests_per_minute: 60,
        }
    }
}

impl DeskConfig {
    /// Create a new configuration builder
    pub fn builder() -> DeskConfigBuilder {
        DeskConfigBuilder::default()
    }

    /// Build from process environment
    ///
    /// A missing `XAI_API_KEY` is a configuration error.
    pub fn from_env() -> Result<Self> {
        Self::builder()
            .with_env_lookup(|key| std::env::var(key).ok())
            .build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(ResearchError::Config(format!(
                "{ENV_API_KEY} not found in environment variables"
            )));
        }

        if self.retry.max_attempts == 0 {
            return Err(ResearchError::Config(
                "retry attempts must be greater than 0".to_string(),
            ));
        }

        if self.peer_target == 0 {
            return Err(ResearchError::Config(
                "peer target must be greater than 0".to_string(),
            ));
        }

        if self.peer_candidate_cap < self.peer_target {
            return Err(ResearchError::Config(format!(
                "peer candidate cap ({}) must be at least the peer target ({})",
                self.peer_candidate_cap, self.peer_target
            )));
        }

        if self.reasoning_model.trim().is_empty() || self.fast_model.trim().is_empty() {
            return Err(ResearchError::Config(
                "model names must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// The live web-search tool with the configured result budget
    pub fn web_search_tool(&self) -> Tool {
        Tool::WebSearch(WebSearchOptions {
            max_search_results: self.web_search_max_results,
            return_citations: true,
        })
    }
}

impl std::fmt::Debug for DeskConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeskConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("reasoning_model", &self.reasoning_model)
            .field("fast_model", &self.fast_model)
            .field("results_dir", &self.results_dir)
            .field("llm_timeout", &self.llm_timeout)
            .field("max_tokens", &self.max_tokens)
            .field("retry", &self.retry)
            .field("peer_target", &self.peer_target)
            .field("peer_candidate_cap", &self.peer_candidate_cap)
            .field("news_cap", &self.news_cap)
            .field("statement_periods", &self.statement_periods)
            .field("cache_ttl", &self.cache_ttl)
            .finish_non_exhaustive()
    }
}

/// Builder for DeskConfig
#[derive(Debug, Default)]
pub struct DeskConfigBuilder {
    api_key: Option<String>,
    api_base: Option<String>,
    reasoning_model: Option<String>,
    fast_model: Option<String>,
    results_dir: Option<PathBuf>,
    llm_timeout: Option<Duration>,
    max_tokens: Option<usize>,
    retry: Option<RetryPolicy>,
    peer_target: Option<usize>,
    peer_candidate_cap: Option<usize>,
    news_cap: Option<usize>,
    cache_ttl: Option<Duration>,
}

impl DeskConfigBuilder {
    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the completion service base URL
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }

    /// Set the reasoning-tier model
    pub fn reasoning_model(mut self, model: impl Into<String>) -> Self {
        self.reasoning_model = Some(model.into());
        self
    }

    /// Set the fast non-reasoning model
    pub fn fast_model(mut self, model: impl Into<String>) -> Self {
        self.fast_model = Some(model.into());
        self
    }

    /// Set the results directory
    pub fn results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = Some(dir.into());
        self
    }

    /// Set the per-call completion timeout
    pub fn llm_timeout(mut self, timeout: Duration) -> Self {
        self.llm_timeout = Some(timeout);
        self
    }

    /// Set max tokens per completion
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the retry policy
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Set the number of peers to validate
    pub fn peer_target(mut self, target: usize) -> Self {
        self.peer_target = Some(target);
        self
    }

    /// Set the candidate cap for peer discovery
    pub fn peer_candidate_cap(mut self, cap: usize) -> Self {
        self.peer_candidate_cap = Some(cap);
        self
    }

    /// Set the news cap
    pub fn news_cap(mut self, cap: usize) -> Self {
        self.news_cap = Some(cap);
        self
    }

    /// Set the provider response cache TTL
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Fill unset values from a key lookup (the process environment in production)
    ///
    /// Values already set on the builder take precedence.
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if self.api_key.is_none() {
            self.api_key = non_empty(ENV_API_KEY);
        }
        if self.api_base.is_none() {
            self.api_base = non_empty(ENV_API_BASE);
        }
        if self.reasoning_model.is_none() {
            self.reasoning_model = non_empty(ENV_REASONING_MODEL);
        }
        if self.fast_model.is_none() {
            self.fast_model = non_empty(ENV_FAST_MODEL);
        }
        if self.results_dir.is_none() {
            self.results_dir = non_empty(ENV_RESULTS_DIR).map(PathBuf::from);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<DeskConfig> {
        let defaults = DeskConfig::default();

        let config = DeskConfig {
            api_key: self.api_key.unwrap_or(defaults.api_key),
            api_base: self.api_base.unwrap_or(defaults.api_base),
            reasoning_model: self.reasoning_model.unwrap_or(defaults.reasoning_model),
            fast_model: self.fast_model.unwrap_or(defaults.fast_model),
            results_dir: self.results_dir.unwrap_or(defaults.results_dir),
            llm_timeout: self.llm_timeout.unwrap_or(defaults.llm_timeout),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            retry: self.retry.unwrap_or(defaults.retry),
            peer_target: self.peer_target.unwrap_or(defaults.peer_target),
            peer_candidate_cap: self.peer_candidate_cap.unwrap_or(defaults.peer_candidate_cap),
            news_cap: self.news_cap.unwrap_or(defaults.news_cap),
            cache_ttl: self.cache_ttl.unwrap_or(defaults.cache_ttl),
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DeskConfig::builder().api_key("test-key").build().unwrap();

        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.reasoning_model, "grok-4-1-fast-reasoning");
        assert_eq!(config.fast_model, "grok-4-1-fast-non-reasoning");
        assert_eq!(config.results_dir, PathBuf::from("results"));
        assert_eq!(config.llm_timeout, Duration::from_secs(3600));
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.peer_target, 3);
        assert_eq!(config.peer_candidate_cap, 6);
        assert_eq!(config.news_cap, 5);
        assert_eq!(config.statement_periods, 3);
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let err = DeskConfig::builder()
            .with_env_lookup(lookup(&[]))
            .build()
            .unwrap_err();

        assert!(err.is_config());
        assert!(err.to_string().contains("XAI_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_treated_as_missing() {
        let result = DeskConfig::builder()
            .with_env_lookup(lookup(&[(ENV_API_KEY, "   ")]))
            .build();
        assert!(matches!(result, Err(ResearchError::Config(_))));
    }

    #[test]
    fn test_env_lookup() {
        let config = DeskConfig::builder()
            .with_env_lookup(lookup(&[
                (ENV_API_KEY, "xai-123"),
                (ENV_FAST_MODEL, "grok-mini"),
                (ENV_RESULTS_DIR, "/tmp/reports"),
            ]))
            .build()
            .unwrap();

        assert_eq!(config.api_key, "xai-123");
        assert_eq!(config.fast_model, "grok-mini");
        assert_eq!(config.reasoning_model, DEFAULT_REASONING_MODEL);
        assert_eq!(config.results_dir, PathBuf::from("/tmp/reports"));
    }

    #[test]
    fn test_explicit_values_win_over_env() {
        let config = DeskConfig::builder()
            .reasoning_model("grok-override")
            .with_env_lookup(lookup(&[
                (ENV_API_KEY, "xai-123"),
                (ENV_REASONING_MODEL, "grok-from-env"),
            ]))
            .build()
            .unwrap();

        assert_eq!(config.reasoning_model, "grok-override");
    }

    #[test]
    fn test_validation() {
        let result = DeskConfig::builder().api_key("k").peer_target(0).build();
        assert!(result.is_err());

        let result = DeskConfig::builder()
            .api_key("k")
            .retry(RetryPolicy::no_retry())
            .build();
        assert!(result.is_ok());

        let mut zero_attempts = RetryPolicy::default();
        zero_attempts.max_attempts = 0;
        let result = DeskConfig::builder().api_key("k").retry(zero_attempts).build();
        assert!(result.is_err());

        let result = DeskConfig::builder().api_key("k").fast_model("").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_candidate_cap_must_cover_peer_target() {
        let result = DeskConfig::builder().api_key("k").peer_candidate_cap(0).build();
        assert!(matches!(result, Err(ResearchError::Config(_))));

        let result = DeskConfig::builder()
            .api_key("k")
            .peer_target(4)
            .peer_candidate_cap(3)
            .build();
        assert!(result.is_err());

        let config = DeskConfig::builder()
            .api_key("k")
            .peer_target(2)
            .peer_candidate_cap(2)
            .build()
            .unwrap();
        assert_eq!(config.peer_candidate_cap, 2);
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = DeskConfig::builder().api_key("secret-key").build().unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_web_search_tool() {
        let config = DeskConfig::builder().api_key("k").build().unwrap();
        let Tool::WebSearch(options) = config.web_search_tool() else {
            panic!("expected web search tool");
        };
        assert_eq!(options.max_search_results, 10);
    }
}
