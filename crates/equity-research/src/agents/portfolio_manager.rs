//! Portfolio manager: the investment verdict
//!
//! Ratings use the five-point scale. The rating is read back out of the
//! generated text so it can be recorded in run metadata.

use super::{AnalystOutput, AnalystRole};
use crate::context::ResearchContext;
use crate::error::Result;
use crate::market::MarketData;
use crate::market::model::text_or_na;
use crate::prompts::{PORTFOLIO_MANAGER_SYSTEM, PORTFOLIO_SYNTHESIS};
use equity_prompt::PromptBuilder;
use regex::Regex;
use serde::Serialize;
use serde_json::json;
use std::fmt;
use std::sync::LazyLock;
use tracing::{info, instrument, warn};

// Hyphens count as word characters so "buy-side" or "hold-up" never match.
static LABELLED_RATING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\brating\b[^A-Za-z]*(strong\s+buy|strong\s+sell|buy|hold|sell)(?:$|[^A-Za-z0-9-])",
    )
    .expect("valid rating regex")
});

static ANY_RATING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:^|[^A-Za-z0-9-])(strong\s+buy|strong\s+sell|buy|hold|sell)(?:$|[^A-Za-z0-9-])",
    )
    .expect("valid rating regex")
});

/// Five-point investment rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rating {
    #[serde(rename = "Strong Buy")]
    StrongBuy,
    Buy,
    Hold,
    Sell,
    #[serde(rename = "Strong Sell")]
    StrongSell,
}

impl Rating {
    pub const ALL: [Rating; 5] = [
        Rating::StrongBuy,
        Rating::Buy,
        Rating::Hold,
        Rating::Sell,
        Rating::StrongSell,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::StrongBuy => "Strong Buy",
            Self::Buy => "Buy",
            Self::Hold => "Hold",
            Self::Sell => "Sell",
            Self::StrongSell => "Strong Sell",
        }
    }

    /// Parse a label, case and inner whitespace insensitive
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.split_whitespace().collect::<Vec<_>>().join(" ");
        Self::ALL
            .into_iter()
            .find(|r| r.label().eq_ignore_ascii_case(&normalized))
    }

    /// Find the rating in generated text
    ///
    /// A labelled `Rating: ...` wins; otherwise the first rating word in the
    /// text is taken.
    pub fn extract(text: &str) -> Option<Self> {
        LABELLED_RATING_RE
            .captures(text)
            .or_else(|| ANY_RATING_RE.captures(text))
            .and_then(|caps| caps.get(1))
            .and_then(|m| Self::from_label(m.as_str()))
    }

    /// The scale as quoted in the synthesis prompt
    fn scale() -> String {
        let labels: Vec<&str> = Self::ALL.iter().map(|r| r.label()).collect();
        format!(
            "{}, or {}",
            labels[..labels.len() - 1].join(", "),
            labels[labels.len() - 1]
        )
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Verdict section plus the rating found in it
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioVerdict {
    pub output: AnalystOutput,
    pub rating: Option<Rating>,
}

/// Writes the "Executive Summary & Investment Verdict" section
pub struct PortfolioManager {
    ctx: ResearchContext,
}

impl PortfolioManager {
    pub fn new(ctx: ResearchContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip_all, fields(ticker = %ticker))]
    pub async fn run(
        &self,
        ticker: &str,
        market_data: &MarketData,
        fundamental: &AnalystOutput,
        sentiment: &AnalystOutput,
    ) -> Result<PortfolioVerdict> {
        info!("Synthesizing investment verdict for {}...", ticker);

        let prompt = self.ctx.render(
            PORTFOLIO_SYNTHESIS,
            &json!({
                "ticker": ticker,
                "market_data": format_market(market_data),
                "fundamental_analysis": fundamental.text(),
                "sentiment_analysis": sentiment.text(),
                "ratings": Rating::scale(),
            }),
        )?;

        let text = self
            .ctx
            .ask(
                PORTFOLIO_MANAGER_SYSTEM,
                &prompt,
                &self.ctx.config.reasoning_model,
                None,
            )
            .await?;

        let rating = Rating::extract(&text);
        match rating {
            Some(rating) => info!("Rating for {}: {}", ticker, rating),
            None => warn!("No rating found in verdict for {}", ticker),
        }

        Ok(PortfolioVerdict {
            output: AnalystOutput::new(AnalystRole::PortfolioManager, text),
            rating,
        })
    }
}

fn format_market(data: &MarketData) -> String {
    match data {
        MarketData::Available(s) => PromptBuilder::new()
            .field("Current Price", format!("{} {}", s.current_price, s.currency))
            .field("Market Cap", s.market_cap)
            .field("Sector", text_or_na(s.sector.as_deref()))
            .build(),
        MarketData::Unavailable { error } => format!("Market data unavailable: {error}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubLlm, snapshot, test_context, user_prompt};
    use std::sync::Arc;

    #[test]
    fn test_extract_labelled_rating() {
        assert_eq!(
            Rating::extract("**Rating: BUY** | **Target Price: $175**"),
            Some(Rating::Buy)
        );
        assert_eq!(
            Rating::extract("We would not sell here.\n**Rating: Strong  Buy**"),
            Some(Rating::StrongBuy)
        );
        assert_eq!(Rating::extract("Rating - hold"), Some(Rating::Hold));
    }

    #[test]
    fn test_extract_unlabelled_rating() {
        assert_eq!(
            Rating::extract("Our call is STRONG SELL given the leverage."),
            Some(Rating::StrongSell)
        );
        assert_eq!(Rating::extract("No view. Wholesale channel."), None);
    }

    #[test]
    fn test_hyphenated_words_are_not_ratings() {
        assert_eq!(
            Rating::extract("Buy-side demand is strong; we rate it hold."),
            Some(Rating::Hold)
        );
        assert_eq!(
            Rating::extract("Flows are buy-side only, with a sell-off risk."),
            None
        );
        assert_eq!(Rating::extract("**Rating: Hold-up** pending; Sell"), Some(Rating::Sell));
        assert_eq!(Rating::extract("Buy"), Some(Rating::Buy));
    }

    #[test]
    fn test_rating_serializes_as_label() {
        assert_eq!(
            serde_json::to_value(Rating::StrongBuy).unwrap(),
            "Strong Buy"
        );
        assert_eq!(serde_json::to_value(Rating::Hold).unwrap(), "Hold");
    }

    #[test]
    fn test_scale_lists_all_ratings() {
        assert_eq!(
            Rating::scale(),
            "Strong Buy, Buy, Hold, Sell, or Strong Sell"
        );
    }

    #[tokio::test]
    async fn test_run_extracts_rating() {
        let llm = Arc::new(StubLlm::analyst_desk(""));
        let manager = PortfolioManager::new(test_context(llm.clone()));
        let market =
            MarketData::Available(snapshot("AAPL", "Apple Inc.", 150.0, Some("Technology")));
        let fundamental = AnalystOutput::new(AnalystRole::Fundamental, "## Financial Deep Dive");
        let sentiment =
            AnalystOutput::new(AnalystRole::Sentiment, "## Qualitative & Catalyst Analysis");

        let verdict = manager
            .run("AAPL", &market, &fundamental, &sentiment)
            .await
            .unwrap();

        assert_eq!(verdict.rating, Some(Rating::Buy));
        assert_eq!(verdict.output.role, AnalystRole::PortfolioManager);

        let calls = llm.calls();
        assert_eq!(calls[0].model, "grok-4-1-fast-reasoning");
        let prompt = user_prompt(&calls[0]);
        assert!(prompt.contains("## Financial Deep Dive"));
        assert!(prompt.contains("## Qualitative & Catalyst Analysis"));
        assert!(prompt.contains("Sector: Technology"));
        assert!(prompt.contains("Strong Buy, Buy, Hold, Sell, or Strong Sell"));
    }

    #[tokio::test]
    async fn test_missing_rating_is_not_fatal() {
        let llm = Arc::new(StubLlm::fixed("Thesis without a verdict."));
        let manager = PortfolioManager::new(test_context(llm));
        let fundamental = AnalystOutput::new(AnalystRole::Fundamental, "f");
        let sentiment = AnalystOutput::new(AnalystRole::Sentiment, "s");

        let verdict = manager
            .run(
                "AAPL",
                &MarketData::unavailable("Price not found"),
                &fundamental,
                &sentiment,
            )
            .await
            .unwrap();

        assert_eq!(verdict.rating, None);
    }
}
