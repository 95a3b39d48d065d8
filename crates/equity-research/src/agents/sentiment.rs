//! Sentiment analyst
//!
//! Two calls: a web-search pass for management tone and guidance on the
//! reasoning model, then the section itself on the fast model.

use super::{AnalystOutput, AnalystRole};
use crate::context::ResearchContext;
use crate::error::Result;
use crate::market::model::text_or_na;
use crate::market::{MarketData, NewsItem};
use crate::prompts::{
    MANAGEMENT_TONE_SEARCH, RESEARCHER_SYSTEM, SENTIMENT_ANALYSIS, SENTIMENT_ANALYST_SYSTEM,
};
use crate::scout::DataBundle;
use equity_prompt::PromptBuilder;
use serde_json::json;
use tracing::{debug, info, instrument};

/// Writes the "Qualitative & Catalyst Analysis" section
pub struct SentimentAnalyst {
    ctx: ResearchContext,
}

impl SentimentAnalyst {
    pub fn new(ctx: ResearchContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip_all, fields(ticker = %bundle.ticker))]
    pub async fn run(&self, bundle: &DataBundle) -> Result<AnalystOutput> {
        let management_context = self.management_tone(&bundle.ticker).await?;

        info!("Running sentiment analysis for {}...", bundle.ticker);
        let prompt = self.ctx.render(
            SENTIMENT_ANALYSIS,
            &json!({
                "ticker": bundle.ticker,
                "news_data": format_news(&bundle.news),
                "management_context": management_context,
                "market_context": format_context(&bundle.market_data),
            }),
        )?;

        let text = self
            .ctx
            .ask(
                SENTIMENT_ANALYST_SYSTEM,
                &prompt,
                &self.ctx.config.fast_model,
                None,
            )
            .await?;

        Ok(AnalystOutput::new(AnalystRole::Sentiment, text))
    }

    /// Earnings-call commentary and guidance via live search
    async fn management_tone(&self, ticker: &str) -> Result<String> {
        info!("Searching management tone for {}...", ticker);

        let prompt = self
            .ctx
            .render(MANAGEMENT_TONE_SEARCH, &json!({ "ticker": ticker }))?;
        let search = [self.ctx.config.web_search_tool()];

        let context = self
            .ctx
            .ask(
                RESEARCHER_SYSTEM,
                &prompt,
                &self.ctx.config.reasoning_model,
                Some(search.as_slice()),
            )
            .await?;

        debug!("Management context: {} chars", context.len());
        Ok(context)
    }
}

fn format_news(news: &[NewsItem]) -> String {
    PromptBuilder::new()
        .list(
            news.iter().map(|item| {
                format!(
                    "{} (Source: {}, Date: {})",
                    item.title, item.publisher, item.publish_time
                )
            }),
            "No recent news available.",
        )
        .build()
}

fn format_context(data: &MarketData) -> String {
    match data.snapshot() {
        Some(s) => PromptBuilder::new()
            .field("Sector", text_or_na(s.sector.as_deref()))
            .field("Industry", text_or_na(s.industry.as_deref()))
            .field("Beta", s.beta)
            .build(),
        None => "Market context unavailable.".to_string(),
    }
}
