//! Multi-stage LLM equity research
//!
//! Turns a ticker symbol into a sectioned research report:
//!
//! - Market data (quote, statements, news) from Yahoo Finance, normalised
//!   behind [`MarketDataProvider`]
//! - Peer discovery by a web-search LLM call, validated against market data
//! - Analyst stages: fundamental, sentiment, portfolio manager, editor
//! - [`ResearchPipeline`] sequencing the stages and persisting the report
//!   with its metadata
//!
//! # Example
//!
//! ```rust,ignore
//! use equity_research::{DeskConfig, ResearchPipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = DeskConfig::from_env()?;
//!     let pipeline = ResearchPipeline::from_config(config)?;
//!
//!     let saved = pipeline.run("AAPL").await?;
//!     println!("{}", saved.report_path.display());
//!
//!     Ok(())
//! }
//! ```

pub mod agents;
pub mod api;
pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod market;
pub mod peers;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod scout;

#[cfg(test)]
pub(crate) mod test_support;

pub use agents::{AnalystOutput, AnalystRole, Rating};
pub use config::DeskConfig;
pub use context::ResearchContext;
pub use error::{ResearchError, Result};
pub use market::{MarketData, MarketDataProvider, MarketSnapshot, YahooMarketData};
pub use pipeline::{PipelineFailure, PipelineState, ResearchPipeline};
pub use report::{ReportWriter, SavedReport};
pub use scout::{DataBundle, DataScout};
