//! Fundamental analyst: statements, multiples and peer-relative valuation

use super::{AnalystOutput, AnalystRole};
use crate::context::ResearchContext;
use crate::error::Result;
use crate::market::{FinancialStatements, MarketData, NOT_AVAILABLE, PeerRecord};
use crate::prompts::{FUNDAMENTAL_ANALYSIS, FUNDAMENTAL_ANALYST_SYSTEM};
use crate::scout::DataBundle;
use equity_prompt::PromptBuilder;
use serde_json::json;
use tracing::{info, instrument};

/// Writes the "Financial Deep Dive" section
pub struct FundamentalAnalyst {
    ctx: ResearchContext,
}

impl FundamentalAnalyst {
    pub fn new(ctx: ResearchContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip_all, fields(ticker = %bundle.ticker))]
    pub async fn run(&self, bundle: &DataBundle) -> Result<AnalystOutput> {
        info!("Running fundamental analysis for {}...", bundle.ticker);

        let prompt = self.ctx.render(
            FUNDAMENTAL_ANALYSIS,
            &json!({
                "ticker": bundle.ticker,
                "market_data": format_market(&bundle.market_data),
                "financial_data": format_financials(&bundle.financials),
                "peer_data": format_peers(&bundle.peer_data),
                "degraded": bundle.is_degraded(),
            }),
        )?;

        let text = self
            .ctx
            .ask(
                FUNDAMENTAL_ANALYST_SYSTEM,
                &prompt,
                &self.ctx.config.reasoning_model,
                None,
            )
            .await?;

        Ok(AnalystOutput::new(AnalystRole::Fundamental, text))
    }
}

fn format_market(data: &MarketData) -> String {
    match data {
        MarketData::Available(s) => PromptBuilder::new()
            .field("Current Price", format!("{} {}", s.current_price, s.currency))
            .field("Market Cap", s.market_cap)
            .field("Trailing P/E", s.pe_ratio)
            .field("Forward P/E", s.forward_pe)
            .field("PEG Ratio", s.peg_ratio)
            .field("52W High", s.fifty_two_week_high)
            .field("52W Low", s.fifty_two_week_low)
            .build(),
        MarketData::Unavailable { error } => format!("Market data unavailable: {error}"),
    }
}

fn format_financials(financials: &FinancialStatements) -> String {
    PromptBuilder::new()
        .section("Income Statement (Recent)", &financials.income_statement, NOT_AVAILABLE)
        .section("Balance Sheet (Recent)", &financials.balance_sheet, NOT_AVAILABLE)
        .section("Cash Flow (Recent)", &financials.cash_flow, NOT_AVAILABLE)
        .build()
}

/// One comparison line per peer, in acceptance order
pub fn format_peers(peers: &[PeerRecord]) -> String {
    PromptBuilder::new()
        .list(
            peers.iter().map(|p| {
                format!(
                    "{} ({}): Price={}, Market Cap={}, P/E={}, Fwd P/E={}, Margins={}, Rev Growth={}",
                    p.ticker,
                    p.company_name,
                    p.price,
                    p.market_cap,
                    p.pe_ratio,
                    p.fwd_pe,
                    p.profit_margins,
                    p.revenue_growth
                )
            }),
            "No validated peers available.",
        )
        .build()
}
