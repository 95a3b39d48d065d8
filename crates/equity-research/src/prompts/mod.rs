//! Prompt templates for the research pipeline
//!
//! - `system`: system prompts for each analyst role
//! - `user`: user message templates rendered with stage data

mod system;
mod user;

pub use system::*;
pub use user::*;

use equity_prompt::{PromptRegistry, Result};

/// Register every research prompt with the given registry
pub fn register_prompts(registry: &mut PromptRegistry) -> Result<()> {
    // System prompts
    registry.register(fundamental_analyst()?)?;
    registry.register(sentiment_analyst()?)?;
    registry.register(portfolio_manager()?)?;
    registry.register(editor()?)?;
    registry.register(researcher()?)?;
    registry.register(peer_scout()?)?;

    // User message templates
    registry.register(fundamental_analysis()?)?;
    registry.register(management_tone_search()?)?;
    registry.register(sentiment_analysis()?)?;
    registry.register(portfolio_synthesis()?)?;
    registry.register(editorial_compilation()?)?;
    registry.register(peer_discovery()?)?;

    Ok(())
}

/// A registry holding every research prompt
pub fn research_registry() -> Result<PromptRegistry> {
    let mut registry = PromptRegistry::new();
    register_prompts(&mut registry)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_prompts() {
        let registry = research_registry().unwrap();

        assert_eq!(registry.len(), 12);
        assert!(registry.contains(FUNDAMENTAL_ANALYSIS));
        assert!(registry.contains(EDITOR_SYSTEM));
        assert!(registry.contains(PEER_DISCOVERY));
    }

    #[test]
    fn test_fundamental_prompt_renders_sections() {
        let registry = research_registry().unwrap();
        let prompt = registry
            .render(
                FUNDAMENTAL_ANALYSIS,
                &json!({
                    "ticker": "AAPL",
                    "market_data": "Current Price: 150 USD",
                    "financial_data": "N/A",
                    "peer_data": "- MSFT: P/E=35",
                    "degraded": false,
                }),
            )
            .unwrap();

        assert!(prompt.contains("## Financial Deep Dive"));
        assert!(prompt.contains("comparing AAPL to its peers"));
        assert!(prompt.contains("- MSFT: P/E=35"));
        assert!(!prompt.contains("insufficient"));
    }

    #[test]
    fn test_degraded_note() {
        let registry = research_registry().unwrap();
        let prompt = registry
            .render(
                FUNDAMENTAL_ANALYSIS,
                &json!({
                    "ticker": "ZZZZ",
                    "market_data": "Price not found",
                    "financial_data": "",
                    "peer_data": "",
                    "degraded": true,
                }),
            )
            .unwrap();

        assert!(prompt.contains("insufficient for a full analysis"));
    }

    #[test]
    fn test_peer_discovery_optional_context() {
        let registry = research_registry().unwrap();
        let prompt = registry
            .render(
                PEER_DISCOVERY,
                &json!({
                    "ticker": "BN.PA",
                    "company_name": "Danone S.A.",
                    "sector": "Consumer Defensive",
                    "industry": null,
                    "min_peers": 5,
                    "max_peers": 6,
                }),
            )
            .unwrap();

        assert!(prompt.contains("5-6 direct public competitors of Danone S.A. (BN.PA)"));
        assert!(prompt.contains("Sector: Consumer Defensive"));
        assert!(!prompt.contains("Industry:"));
        assert!(prompt.contains("ADR"));
    }

    #[test]
    fn test_section_headings_survive_rendering() {
        let registry = research_registry().unwrap();

        let sentiment = registry
            .render(
                SENTIMENT_ANALYSIS,
                &json!({
                    "ticker": "AAPL",
                    "news_data": "- iPhone sales beat",
                    "management_context": "Guidance raised.",
                    "market_context": "Sector: Technology",
                }),
            )
            .unwrap();
        assert!(sentiment.contains(r###"titled "## Qualitative & Catalyst Analysis"."###));
        assert!(sentiment.ends_with(r#"A "Sentiment Score" (1-10) with a brief explanation."#));

        let verdict = registry
            .render(
                PORTFOLIO_SYNTHESIS,
                &json!({
                    "ticker": "AAPL",
                    "market_data": "Current Price: 150 USD",
                    "fundamental_analysis": "## Financial Deep Dive",
                    "sentiment_analysis": "## Qualitative & Catalyst Analysis",
                    "ratings": "Strong Buy, Buy, Hold, Sell, or Strong Sell",
                }),
            )
            .unwrap();
        assert!(verdict.contains(r###"titled "## Executive Summary & Investment Verdict"."###));
        assert!(verdict.ends_with("Clearly stated Thesis and Risks."));
    }

    #[test]
    fn test_missing_variable_fails() {
        let registry = research_registry().unwrap();
        let result = registry.render(PORTFOLIO_SYNTHESIS, &json!({ "ticker": "AAPL" }));
        assert!(result.is_err());
    }
}
