//! Market/reference data gateway
//!
//! [`MarketDataProvider`] is the boundary the pipeline talks to. Provider
//! failures never escape it: a failed quote becomes [`MarketData::Unavailable`],
//! failed statements become the `N/A` placeholder and failed news an empty list.

use super::model::{FinancialStatements, MarketData, MarketSnapshot, NewsItem};
use super::news::extract_news;
use super::quote::parse_quote_summary;
use super::statements::extract_statements;
use crate::api::YahooFinanceClient;
use crate::config::DeskConfig;
use crate::error::Result;
use async_trait::async_trait;
use tracing::{debug, error, info, instrument, warn};

/// Source of quotes, statements and news for a ticker
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Tag recorded in report metadata
    fn source(&self) -> &'static str;

    /// Snapshot for a ticker, or the error record when no price resolves
    async fn market_data(&self, ticker: &str) -> MarketData;

    /// Recent financial statements as display tables
    async fn financials(&self, ticker: &str) -> FinancialStatements;

    /// Capped news list in provider order
    async fn news(&self, ticker: &str) -> Vec<NewsItem>;
}

/// Yahoo Finance backed gateway
#[derive(Debug)]
pub struct YahooMarketData {
    client: YahooFinanceClient,
    news_cap: usize,
    statement_periods: usize,
}

impl YahooMarketData {
    pub fn new(client: YahooFinanceClient, news_cap: usize, statement_periods: usize) -> Self {
        Self {
            client,
            news_cap,
            statement_periods,
        }
    }

    /// Build the client and gateway from desk configuration
    pub fn from_config(config: &DeskConfig) -> Result<Self> {
        let client =
            YahooFinanceClient::new(config.cache_ttl, config.market_requests_per_minute)?;
        Ok(Self::new(client, config.news_cap, config.statement_periods))
    }
}

#[async_trait]
impl MarketDataProvider for YahooMarketData {
    fn source(&self) -> &'static str {
        "yahoo_finance"
    }

    #[instrument(skip(self))]
    async fn market_data(&self, ticker: &str) -> MarketData {
        info!("Scouting market data for {}...", ticker);

        let summary = match self.client.quote_summary(ticker).await {
            Ok(summary) => summary,
            Err(e) => {
                error!("Error fetching market data for {}: {}", ticker, e);
                return MarketData::unavailable(e.to_string());
            }
        };

        let mut quote = parse_quote_summary(&summary);
        if MarketSnapshot::resolve_price(&quote).is_none() {
            match self.client.latest_close(ticker).await {
                Ok(close) => quote.regular_market_price = Some(close),
                Err(e) => debug!("No chart fallback for {}: {}", ticker, e),
            }
        }

        let data = MarketData::from_info(ticker, &quote);
        if !data.is_available() {
            warn!("Could not find price for {}", ticker);
        }
        data
    }

    #[instrument(skip(self))]
    async fn financials(&self, ticker: &str) -> FinancialStatements {
        info!("Scouting financials for {}...", ticker);

        match self.client.quote_summary(ticker).await {
            Ok(summary) => extract_statements(&summary, self.statement_periods),
            Err(e) => {
                warn!("Error fetching financials for {}: {}", ticker, e);
                FinancialStatements::not_available()
            }
        }
    }

    #[instrument(skip(self))]
    async fn news(&self, ticker: &str) -> Vec<NewsItem> {
        info!("Scouting news for {}...", ticker);

        match self.client.news(ticker).await {
            Ok(entries) => extract_news(&entries, self.news_cap),
            Err(e) => {
                warn!("Error fetching news for {}: {}", ticker, e);
                Vec::new()
            }
        }
    }
}
