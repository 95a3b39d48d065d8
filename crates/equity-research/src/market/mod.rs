//! Market/reference data: types, payload normalisation and the gateway

pub mod gateway;
pub mod model;
pub mod news;
pub mod quote;
pub mod statements;

pub use gateway::{MarketDataProvider, YahooMarketData};
pub use model::{
    FinancialStatements, MarketData, MarketSnapshot, Metric, NOT_AVAILABLE, NewsItem, PeerRecord,
    RawQuoteInfo,
};
