//! Yahoo Finance API client
//!
//! Quote summaries and news come from the JSON endpoints behind Yahoo's web
//! pages, which need a session cookie plus a crumb token. The crumb is fetched
//! lazily on first use and reused for the life of the client. The latest chart
//! quote comes through `yahoo_finance_api`.

use crate::cache::{CacheKey, Endpoint, ResponseCache};
use crate::error::{ResearchError, Result};
use crate::market::quote::QUOTE_SUMMARY_MODULES;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, instrument};
use yahoo_finance_api as yahoo;

const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const SEARCH_URL: &str = "https://query1.finance.yahoo.com/v1/finance/search";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
const NEWS_FETCH_COUNT: usize = 10;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Yahoo Finance API client
pub struct YahooFinanceClient {
    client: Client,
    connector: yahoo::YahooConnector,
    crumb: OnceCell<String>,
    cache: ResponseCache,
    rate_limiter: SharedRateLimiter,
}

impl YahooFinanceClient {
    /// Create a client with its own response cache and request quota
    pub fn new(cache_ttl: Duration, requests_per_minute: u32) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        let connector =
            yahoo::YahooConnector::new().map_err(|e| ResearchError::Yahoo(e.to_string()))?;

        let quota = Quota::per_minute(NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN));

        Ok(Self {
            client,
            connector,
            crumb: OnceCell::new(),
            cache: ResponseCache::new(cache_ttl),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    /// Fetch the quote-summary result object for a symbol
    #[instrument(skip(self))]
    pub async fn quote_summary(&self, symbol: &str) -> Result<Value> {
        self.cache
            .get_or_fetch(CacheKey::new(symbol, Endpoint::QuoteSummary), || {
                self.fetch_quote_summary(symbol)
            })
            .await
    }

    /// Fetch raw news entries for a symbol, provider order
    #[instrument(skip(self))]
    pub async fn news(&self, symbol: &str) -> Result<Vec<Value>> {
        let payload = self
            .cache
            .get_or_fetch(CacheKey::new(symbol, Endpoint::News), || self.fetch_news(symbol))
            .await?;

        Ok(payload.as_array().cloned().unwrap_or_default())
    }

    /// Close of the most recent chart bar, used as the regular market price
    #[instrument(skip(self))]
    pub async fn latest_close(&self, symbol: &str) -> Result<f64> {
        let value = self
            .cache
            .get_or_fetch(CacheKey::new(symbol, Endpoint::Chart), || async {
                self.rate_limiter.until_ready().await;
                let response = self
                    .connector
                    .get_latest_quotes(symbol, "1d")
                    .await
                    .map_err(|e| ResearchError::Yahoo(e.to_string()))?;
                let quote = response
                    .last_quote()
                    .map_err(|e| ResearchError::Yahoo(e.to_string()))?;
                Ok::<_, ResearchError>(Value::from(quote.close))
            })
            .await?;

        value
            .as_f64()
            .ok_or_else(|| ResearchError::Yahoo(format!("No chart close for {symbol}")))
    }

    async fn crumb(&self) -> Result<&str> {
        let crumb = self
            .crumb
            .get_or_try_init(|| async {
                // Only the session cookie matters; the page itself is usually a 404
                let _ = self.client.get(COOKIE_URL).send().await?;

                let crumb = self
                    .client
                    .get(CRUMB_URL)
                    .send()
                    .await?
                    .error_for_status()?
                    .text()
                    .await?;
                let crumb = crumb.trim().to_string();

                if crumb.is_empty() || crumb.contains('<') {
                    return Err(ResearchError::Yahoo(
                        "Failed to obtain session crumb".to_string(),
                    ));
                }

                debug!("Obtained Yahoo session crumb");
                Ok(crumb)
            })
            .await?;

        Ok(crumb.as_str())
    }

    async fn fetch_quote_summary(&self, symbol: &str) -> Result<Value> {
        let crumb = self.crumb().await?;
        self.rate_limiter.until_ready().await;

        let url = format!("{QUOTE_SUMMARY_URL}/{symbol}");
        let response = self
            .client
            .get(&url)
            .query(&[
                ("modules", QUOTE_SUMMARY_MODULES.join(",").as_str()),
                ("crumb", crumb),
            ])
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await?;

        extract_summary_result(symbol, status.as_u16(), body)
    }

    async fn fetch_news(&self, symbol: &str) -> Result<Value> {
        self.rate_limiter.until_ready().await;

        let count = NEWS_FETCH_COUNT.to_string();
        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[
                ("q", symbol),
                ("newsCount", count.as_str()),
                ("quotesCount", "0"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let mut body: Value = response.json().await?;
        Ok(body
            .get_mut("news")
            .map(Value::take)
            .filter(Value::is_array)
            .unwrap_or_else(|| Value::Array(Vec::new())))
    }
}

/// Unwrap `quoteSummary.result[0]`, turning the provider's error record into
/// a [`ResearchError::MarketData`]
fn extract_summary_result(symbol: &str, status: u16, mut body: Value) -> Result<Value> {
    if let Some(description) = body
        .pointer("/quoteSummary/error/description")
        .and_then(Value::as_str)
    {
        return Err(ResearchError::MarketData {
            symbol: symbol.to_string(),
            reason: description.to_string(),
        });
    }

    match body.pointer_mut("/quoteSummary/result/0") {
        Some(result) if result.is_object() => Ok(result.take()),
        _ => Err(ResearchError::MarketData {
            symbol: symbol.to_string(),
            reason: format!("Empty quote summary (HTTP {status})"),
        }),
    }
}

impl std::fmt::Debug for YahooFinanceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooFinanceClient")
            .field("has_crumb", &self.crumb.initialized())
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_summary_result() {
        let body = json!({
            "quoteSummary": {
                "result": [{ "price": { "longName": "Apple Inc." } }],
                "error": null
            }
        });

        let result = extract_summary_result("AAPL", 200, body).unwrap();
        assert_eq!(result["price"]["longName"], "Apple Inc.");
    }

    #[test]
    fn test_extract_summary_error_record() {
        let body = json!({
            "quoteSummary": {
                "result": null,
                "error": { "code": "Not Found", "description": "Quote not found for symbol: ZZZZ" }
            }
        });

        let err = extract_summary_result("ZZZZ", 404, body).unwrap_err();
        assert!(matches!(
            err,
            ResearchError::MarketData { ref symbol, ref reason }
                if symbol == "ZZZZ" && reason.contains("Quote not found")
        ));
    }

    #[test]
    fn test_extract_summary_empty_result() {
        let body = json!({ "quoteSummary": { "result": [], "error": null } });
        assert!(extract_summary_result("AAPL", 200, body).is_err());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_quote_summary_live() {
        let client = YahooFinanceClient::new(Duration::from_secs(60), 60).unwrap();
        let summary = client.quote_summary("AAPL").await.unwrap();
        assert!(summary.get("price").is_some());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_latest_close_live() {
        let client = YahooFinanceClient::new(Duration::from_secs(60), 60).unwrap();
        let close = client.latest_close("MSFT").await.unwrap();
        assert!(close > 0.0);
    }
}
