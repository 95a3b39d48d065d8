//! Runs one ticker through every stage and persists the result

use super::state::{PipelineState, StateTracker};
use crate::agents::{Editor, FundamentalAnalyst, PortfolioManager, SentimentAnalyst};
use crate::config::DeskConfig;
use crate::context::ResearchContext;
use crate::error::{ResearchError, Result};
use crate::market::{MarketDataProvider, YahooMarketData};
use crate::report::{ReportWriter, RunMetadata, SavedReport};
use crate::scout::DataScout;
use chrono::Local;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument};
use uuid::Uuid;

/// A run that ended in [`PipelineState::Failed`]
#[derive(Debug, thiserror::Error)]
#[error("research pipeline for {ticker} failed during {stage}: {source}")]
pub struct PipelineFailure {
    pub ticker: String,
    pub run_id: Uuid,
    /// State the pipeline was in when the error surfaced
    pub stage: PipelineState,
    pub source: ResearchError,
}

impl PipelineFailure {
    pub fn is_config(&self) -> bool {
        self.source.is_config()
    }
}

/// Sequences data gathering, the analyst stages and persistence
pub struct ResearchPipeline {
    scout: DataScout,
    fundamental: FundamentalAnalyst,
    sentiment: SentimentAnalyst,
    manager: PortfolioManager,
    editor: Editor,
    writer: ReportWriter,
}

impl ResearchPipeline {
    pub fn new(ctx: ResearchContext, market: Arc<dyn MarketDataProvider>) -> Self {
        let writer = ReportWriter::new(ctx.config.results_dir.clone());
        Self {
            scout: DataScout::new(ctx.clone(), market),
            fundamental: FundamentalAnalyst::new(ctx.clone()),
            sentiment: SentimentAnalyst::new(ctx.clone()),
            manager: PortfolioManager::new(ctx.clone()),
            editor: Editor::new(ctx),
            writer,
        }
    }

    /// Wire the xAI gateway and the Yahoo market data gateway
    pub fn from_config(config: DeskConfig) -> Result<Self> {
        let ctx = ResearchContext::from_config(config)?;
        let market = YahooMarketData::from_config(&ctx.config)?;
        Ok(Self::new(ctx, Arc::new(market)))
    }

    pub fn with_writer(mut self, writer: ReportWriter) -> Self {
        self.writer = writer;
        self
    }

    /// Research one ticker end to end
    ///
    /// Nothing is written unless every stage succeeds.
    pub async fn run(&self, ticker: &str) -> std::result::Result<SavedReport, PipelineFailure> {
        let ticker = ticker.trim().to_uppercase();
        let run_id = Uuid::new_v4();
        self.run_with_id(&ticker, run_id).await
    }

    #[instrument(skip(self), fields(ticker = %ticker, run_id = %run_id))]
    async fn run_with_id(
        &self,
        ticker: &str,
        run_id: Uuid,
    ) -> std::result::Result<SavedReport, PipelineFailure> {
        info!("Starting equity research for {}", ticker);

        let mut tracker = StateTracker::new();
        match self.execute(ticker, run_id, &mut tracker).await {
            Ok(saved) => {
                tracker.advance();
                info!("Research for {} completed", ticker);
                Ok(saved)
            }
            Err(source) => {
                let stage = tracker.fail();
                error!(stage = %stage, "Critical error in pipeline for {}: {}", ticker, source);
                Err(PipelineFailure {
                    ticker: ticker.to_string(),
                    run_id,
                    stage,
                    source,
                })
            }
        }
    }

    async fn execute(
        &self,
        ticker: &str,
        run_id: Uuid,
        tracker: &mut StateTracker,
    ) -> Result<SavedReport> {
        let started = Instant::now();
        let started_at = Local::now();

        tracker.advance();
        let bundle = self.scout.gather_all(ticker).await;

        tracker.advance();
        let fundamental = self.fundamental.run(&bundle).await?;

        tracker.advance();
        let sentiment = self.sentiment.run(&bundle).await?;

        tracker.advance();
        let verdict = self
            .manager
            .run(ticker, &bundle.market_data, &fundamental, &sentiment)
            .await?;

        tracker.advance();
        let report_date = started_at.format("%Y-%m-%d").to_string();
        let report = self
            .editor
            .run(
                ticker,
                &report_date,
                &[&verdict.output, &fundamental, &sentiment],
            )
            .await?;

        let metadata = RunMetadata {
            ticker: ticker.to_string(),
            run_id,
            timestamp: started_at,
            duration_seconds: started.elapsed().as_secs_f64(),
            data_source: self.scout.source().to_string(),
            fundamental_analysis: fundamental.text,
            sentiment_analysis: sentiment.text,
            portfolio_manager_verdict: verdict.output.text,
            rating: verdict.rating,
            raw_data: bundle,
        };

        self.writer.save(&report.text, &metadata).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::Rating;
    use crate::test_support::{StubLlm, StubMarket, snapshot, test_context};
    use equity_llm::LLMError;
    use tempfile::TempDir;

    fn market() -> Arc<StubMarket> {
        Arc::new(
            StubMarket::default()
                .with_quote(snapshot("AAPL", "Apple Inc.", 150.0, Some("Technology")))
                .with_quote(snapshot("MSFT", "Microsoft", 410.0, Some("Technology")))
                .with_quote(snapshot("GOOGL", "Alphabet", 170.0, Some("Technology"))),
        )
    }

    fn pipeline(llm: Arc<StubLlm>, market: Arc<StubMarket>, dir: &TempDir) -> ResearchPipeline {
        ResearchPipeline::new(test_context(llm), market).with_writer(ReportWriter::new(dir.path()))
    }

    #[tokio::test]
    async fn test_end_to_end_report() {
        let dir = TempDir::new().unwrap();
        let llm = Arc::new(StubLlm::analyst_desk("MSFT, GOOGL"));
        let pipeline = pipeline(llm.clone(), market(), &dir);

        let saved = pipeline.run("aapl").await.unwrap();

        let report = std::fs::read_to_string(&saved.report_path).unwrap();
        assert!(report.starts_with("# Equity Research Report: AAPL"));
        assert!(report.contains("Financial Deep Dive"));
        assert!(report.contains("Qualitative & Catalyst Analysis"));
        assert!(report.contains("Executive Summary & Investment Verdict"));

        let metadata: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&saved.metadata_path).unwrap())
                .unwrap();
        assert_eq!(metadata["ticker"], "AAPL");
        assert_eq!(metadata["data_source"], "stub");
        assert_eq!(metadata["rating"], "Buy");
        assert_eq!(metadata["run_id"], saved.run_id.to_string());
        assert!(
            metadata["fundamental_analysis"]
                .as_str()
                .unwrap()
                .contains("Financial Deep Dive")
        );
        assert_eq!(metadata["raw_data"]["market_data"]["current_price"], 150.0);
        assert_eq!(
            metadata["raw_data"]["peer_data"]["GOOGL"]["company_name"],
            "Alphabet"
        );
        assert_eq!(saved.rating, Some(Rating::Buy));

        // peers, fundamental, tone search, sentiment, verdict, editor
        assert_eq!(llm.call_count(), 6);
    }

    #[tokio::test]
    async fn test_missing_price_still_produces_report() {
        let dir = TempDir::new().unwrap();
        let llm = Arc::new(StubLlm::analyst_desk("MSFT"));
        let pipeline = pipeline(llm.clone(), market(), &dir);

        let saved = pipeline.run("ZZZZ").await.unwrap();

        let metadata: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&saved.metadata_path).unwrap())
                .unwrap();
        assert_eq!(metadata["raw_data"]["market_data"]["error"], "Price not found");
        assert_eq!(metadata["raw_data"]["news"].as_array().unwrap().len(), 0);
        // No peer discovery call in degraded mode
        assert_eq!(llm.call_count(), 5);
    }

    #[tokio::test]
    async fn test_stage_failure_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let llm = Arc::new(StubLlm::new(|_| {
            Err(LLMError::InvalidRequest("bad request".to_string()))
        }));
        let pipeline = pipeline(llm, market(), &dir);

        let failure = pipeline.run("AAPL").await.unwrap_err();

        // Peer discovery swallows its error; the fundamental stage does not
        assert_eq!(failure.stage, PipelineState::FundamentalAnalysis);
        assert_eq!(failure.ticker, "AAPL");
        assert!(!failure.is_config());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_authentication_failure_is_config_error() {
        let dir = TempDir::new().unwrap();
        let llm = Arc::new(StubLlm::new(|_| Err(LLMError::AuthenticationFailed)));
        let pipeline = pipeline(llm, market(), &dir);

        let failure = pipeline.run("AAPL").await.unwrap_err();
        assert!(failure.is_config());
    }
}
