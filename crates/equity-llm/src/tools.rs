//! Tool options attached to a completion call

use serde::{Deserialize, Serialize};

const DEFAULT_MAX_SEARCH_RESULTS: u32 = 10;

/// Server-side tools the model may use while generating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Tool {
    /// Live web search performed by the provider
    WebSearch(WebSearchOptions),
}

/// Options for the live web-search tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSearchOptions {
    /// Upper bound on sources consulted
    pub max_search_results: u32,

    /// Ask the provider to return source URLs
    pub return_citations: bool,
}

impl Default for WebSearchOptions {
    fn default() -> Self {
        Self {
            max_search_results: DEFAULT_MAX_SEARCH_RESULTS,
            return_citations: true,
        }
    }
}

/// Web search with default options
pub fn web_search() -> Tool {
    Tool::WebSearch(WebSearchOptions::default())
}
