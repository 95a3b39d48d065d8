//! Stub collaborators shared by unit tests

use crate::config::DeskConfig;
use crate::context::ResearchContext;
use crate::market::{
    FinancialStatements, MarketData, MarketDataProvider, MarketSnapshot, NewsItem, RawQuoteInfo,
};
use crate::prompts;
use async_trait::async_trait;
use equity_llm::{
    CompletionRequest, CompletionResponse, LLMProvider, LlmGateway, Message, RetryPolicy,
    StopReason, TokenUsage,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type Responder = dyn Fn(&CompletionRequest) -> equity_llm::Result<String> + Send + Sync;

/// LLM provider answering through a closure and recording every request
pub struct StubLlm {
    respond: Box<Responder>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl StubLlm {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&CompletionRequest) -> equity_llm::Result<String> + Send + Sync + 'static,
    {
        Self {
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answers every call with the same text
    pub fn fixed(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Ok(text.clone()))
    }

    /// Routes on the system prompt to canned analyst sections; the editor
    /// echoes its compilation prompt back
    pub fn analyst_desk(peer_answer: &str) -> Self {
        let peer_answer = peer_answer.to_string();
        Self::new(move |request| {
            let system = request.system.clone().unwrap_or_default();
            let text = if system.contains("Fundamental") {
                "## Financial Deep Dive\nRevenue grew 8% with expanding margins.".to_string()
            } else if system.contains("Sentiment") {
                "## Qualitative & Catalyst Analysis\n- New product cycle\nSentiment Score: 7/10"
                    .to_string()
            } else if system.contains("Portfolio") {
                "## Executive Summary & Investment Verdict\n**Rating: BUY** | **Target Price: $175**\nThesis: durable moat."
                    .to_string()
            } else if system.contains("Chief Editor") {
                user_prompt(request).to_string()
            } else if system.contains("researcher") {
                "Management tone: Confident. Guidance raised.".to_string()
            } else if system.contains("financial data assistant") {
                peer_answer.clone()
            } else {
                "unexpected".to_string()
            };
            Ok(text)
        })
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl LLMProvider for StubLlm {
    async fn complete(&self, request: CompletionRequest) -> equity_llm::Result<CompletionResponse> {
        self.calls.lock().unwrap().push(request.clone());
        let text = (self.respond)(&request)?;
        Ok(CompletionResponse {
            message: Message::assistant(text),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
            citations: Vec::new(),
        })
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// The user message of a recorded request
pub fn user_prompt(request: &CompletionRequest) -> &str {
    request.user_prompt()
}

/// Context wired to a stub provider with millisecond backoff
pub fn test_context(llm: Arc<StubLlm>) -> ResearchContext {
    let config = DeskConfig::builder()
        .api_key("test-key")
        .retry(RetryPolicy::fast())
        .build()
        .unwrap();
    let gateway = LlmGateway::new(llm, config.retry.clone());
    ResearchContext::new(config, gateway, prompts::research_registry().unwrap())
}

pub fn snapshot(ticker: &str, name: &str, price: f64, sector: Option<&str>) -> MarketSnapshot {
    let info = RawQuoteInfo {
        current_price: Some(price),
        long_name: Some(name.to_string()),
        sector: sector.map(str::to_string),
        industry: Some("Consumer Electronics".to_string()),
        beta: Some(1.2),
        trailing_pe: Some(30.0),
        ..RawQuoteInfo::default()
    };
    MarketSnapshot::from_info(ticker, &info).unwrap()
}

/// In-memory market data keyed by ticker; unknown tickers have no price
#[derive(Default)]
pub struct StubMarket {
    quotes: HashMap<String, MarketSnapshot>,
    news: Vec<NewsItem>,
    lookups: Mutex<Vec<String>>,
}

impl StubMarket {
    pub fn with_quote(mut self, snapshot: MarketSnapshot) -> Self {
        self.quotes.insert(snapshot.ticker.clone(), snapshot);
        self
    }

    pub fn with_news(mut self, news: Vec<NewsItem>) -> Self {
        self.news = news;
        self
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarketDataProvider for StubMarket {
    fn source(&self) -> &'static str {
        "stub"
    }

    async fn market_data(&self, ticker: &str) -> MarketData {
        self.lookups.lock().unwrap().push(ticker.to_string());
        match self.quotes.get(ticker) {
            Some(snapshot) => MarketData::Available(snapshot.clone()),
            None => MarketData::unavailable("Price not found"),
        }
    }

    async fn financials(&self, _ticker: &str) -> FinancialStatements {
        FinancialStatements {
            income_statement: "| | 2024-09-28 |\n| totalRevenue | 391035000000 |".to_string(),
            balance_sheet: "N/A".to_string(),
            cash_flow: "N/A".to_string(),
        }
    }

    async fn news(&self, _ticker: &str) -> Vec<NewsItem> {
        self.news.clone()
    }
}
