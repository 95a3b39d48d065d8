//! Data aggregation: one [`DataBundle`] per ticker

use crate::context::ResearchContext;
use crate::market::{FinancialStatements, MarketData, MarketDataProvider, NewsItem, PeerRecord};
use crate::peers::PeerScout;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Everything the analyst stages get to see about a ticker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataBundle {
    pub ticker: String,
    pub market_data: MarketData,
    pub financials: FinancialStatements,
    pub news: Vec<NewsItem>,
    /// Serialized as a ticker-keyed map in acceptance order
    #[serde(serialize_with = "serialize_peers")]
    pub peer_data: Vec<PeerRecord>,
}

impl DataBundle {
    /// Bundle carrying only the error-tagged snapshot
    pub fn degraded(ticker: &str, market_data: MarketData) -> Self {
        Self {
            ticker: ticker.to_string(),
            market_data,
            financials: FinancialStatements::default(),
            news: Vec::new(),
            peer_data: Vec::new(),
        }
    }

    /// True when no price resolved and downstream stages work from nothing
    pub fn is_degraded(&self) -> bool {
        !self.market_data.is_available()
    }
}

fn serialize_peers<S: Serializer>(peers: &[PeerRecord], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(peers.len()))?;
    for peer in peers {
        map.serialize_entry(&peer.ticker, peer)?;
    }
    map.end()
}

/// Gathers quote, statements, news and peers for a ticker
pub struct DataScout {
    market: Arc<dyn MarketDataProvider>,
    peers: PeerScout,
}

impl DataScout {
    pub fn new(ctx: ResearchContext, market: Arc<dyn MarketDataProvider>) -> Self {
        let peers = PeerScout::new(ctx, Arc::clone(&market));
        Self { market, peers }
    }

    /// Tag of the underlying data source
    pub fn source(&self) -> &'static str {
        self.market.source()
    }

    /// Fetch the snapshot first; without a price nothing else is fetched
    #[instrument(skip(self))]
    pub async fn gather_all(&self, ticker: &str) -> DataBundle {
        let market_data = self.market.market_data(ticker).await;

        let Some(snapshot) = market_data.snapshot() else {
            warn!(
                "No usable price for {} ({}); continuing with insufficient data",
                ticker,
                market_data.error().unwrap_or("unknown error")
            );
            return DataBundle::degraded(ticker, market_data);
        };

        info!("Fetching financial statements for {}...", ticker);
        let financials = self.market.financials(ticker).await;

        info!("Fetching news for {}...", ticker);
        let news = self.market.news(ticker).await;

        let peer_data = self.peers.find_peers(snapshot).await;
        info!("Accepted {} peers for {}", peer_data.len(), ticker);

        DataBundle {
            ticker: ticker.to_string(),
            market_data,
            financials,
            news,
            peer_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubLlm, StubMarket, snapshot, test_context};

    fn news(title: &str) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            publisher: "Reuters".to_string(),
            link: "https://example.com".to_string(),
            publish_time: "2024-11-01".to_string(),
        }
    }

    #[tokio::test]
    async fn test_gather_all_short_circuits_without_price() {
        let market = Arc::new(StubMarket::default());
        let llm = Arc::new(StubLlm::analyst_desk("MSFT"));
        let scout = DataScout::new(test_context(llm.clone()), market.clone());

        let first = scout.gather_all("ZZZZ").await;
        let second = scout.gather_all("ZZZZ").await;

        assert!(first.is_degraded());
        assert!(first.financials.is_empty());
        assert!(first.news.is_empty());
        assert!(first.peer_data.is_empty());
        assert_eq!(first.market_data.error(), Some("Price not found"));
        assert_eq!(first, second);

        // Only the two snapshot lookups; no peer discovery call
        assert_eq!(market.lookups(), ["ZZZZ", "ZZZZ"]);
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_gather_all_full_bundle() {
        let market = Arc::new(
            StubMarket::default()
                .with_quote(snapshot("AAPL", "Apple Inc.", 150.0, Some("Technology")))
                .with_quote(snapshot("MSFT", "Microsoft", 410.0, Some("Technology")))
                .with_news(vec![news("Apple unveils new iPhone")]),
        );
        let llm = Arc::new(StubLlm::analyst_desk("MSFT"));
        let scout = DataScout::new(test_context(llm), market);

        let bundle = scout.gather_all("AAPL").await;

        assert!(!bundle.is_degraded());
        assert!(bundle.financials.income_statement.contains("totalRevenue"));
        assert_eq!(bundle.news.len(), 1);
        assert_eq!(bundle.peer_data.len(), 1);
        assert_eq!(bundle.peer_data[0].ticker, "MSFT");
    }

    #[test]
    fn test_peer_data_serializes_as_ordered_map() {
        let mut bundle = DataBundle::degraded("AAPL", MarketData::unavailable("Price not found"));
        bundle.peer_data = vec![
            PeerRecord::from(&snapshot("MSFT", "Microsoft", 410.0, None)),
            PeerRecord::from(&snapshot("GOOGL", "Alphabet", 170.0, None)),
        ];

        let json = serde_json::to_string(&bundle).unwrap();
        let msft = json.find("\"MSFT\"").unwrap();
        let googl = json.find("\"GOOGL\"").unwrap();
        assert!(msft < googl);

        let value = serde_json::to_value(&bundle).unwrap();
        assert_eq!(value["peer_data"]["MSFT"]["company_name"], "Microsoft");
        assert_eq!(value["market_data"]["error"], "Price not found");
    }
}
