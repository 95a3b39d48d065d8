//! System prompts for the analyst stages

use equity_prompt::{JinjaTemplate, Result};

pub const FUNDAMENTAL_ANALYST_SYSTEM: &str = "research.system.fundamental_analyst";
pub const SENTIMENT_ANALYST_SYSTEM: &str = "research.system.sentiment_analyst";
pub const PORTFOLIO_MANAGER_SYSTEM: &str = "research.system.portfolio_manager";
pub const EDITOR_SYSTEM: &str = "research.system.editor";
pub const RESEARCHER_SYSTEM: &str = "research.system.researcher";
pub const PEER_SCOUT_SYSTEM: &str = "research.system.peer_scout";

pub fn fundamental_analyst() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        FUNDAMENTAL_ANALYST_SYSTEM,
        "You are an expert Fundamental Equity Analyst.",
    )
}

pub fn sentiment_analyst() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        SENTIMENT_ANALYST_SYSTEM,
        "You are a Senior Market Sentiment Analyst.",
    )
}

pub fn portfolio_manager() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        PORTFOLIO_MANAGER_SYSTEM,
        "You are a Hedge Fund Portfolio Manager.",
    )
}

pub fn editor() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        EDITOR_SYSTEM,
        "You are the Chief Editor of an Equity Research Firm.",
    )
}

/// Used for the management-tone search call
pub fn researcher() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        RESEARCHER_SYSTEM,
        "You are a researcher. Use the web search tool to find information.",
    )
}

pub fn peer_scout() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        PEER_SCOUT_SYSTEM,
        "You are a financial data assistant. Use the web search tool to verify \
         exchange listings before answering.",
    )
}
