//! Peer discovery and validation
//!
//! A reasoning-tier call with web search proposes competitor tickers; each
//! candidate is then looked up through the market data gateway and checked
//! against the target until enough peers are accepted.

use super::parser::parse_ticker_candidates;
use crate::context::ResearchContext;
use crate::market::{MarketData, MarketDataProvider, MarketSnapshot, PeerRecord};
use crate::prompts::{PEER_DISCOVERY, PEER_SCOUT_SYSTEM};
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Lower bound quoted in the discovery prompt
const MIN_SUGGESTED_PEERS: usize = 5;

/// Why a candidate was turned away
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// No resolvable price
    NoPrice(String),
    /// Same company as the target under another ticker
    SameCompany(String),
    /// Both sectors known and different
    SectorMismatch { target: String, candidate: String },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPrice(reason) => write!(f, "no resolvable price ({reason})"),
            Self::SameCompany(name) => write!(f, "same company as target ({name})"),
            Self::SectorMismatch { target, candidate } => {
                write!(f, "sector mismatch ({candidate} vs {target})")
            }
        }
    }
}

/// Check one looked-up candidate against the target
///
/// Sector matching is strict: conglomerates listed under a different sector
/// are filtered out.
pub fn check_candidate(
    target: &MarketSnapshot,
    candidate: &MarketData,
) -> Result<PeerRecord, Rejection> {
    let snapshot = match candidate {
        MarketData::Available(snapshot) => snapshot,
        MarketData::Unavailable { error } => return Err(Rejection::NoPrice(error.clone())),
    };

    if snapshot.company_name == target.company_name {
        return Err(Rejection::SameCompany(snapshot.company_name.clone()));
    }

    if let (Some(target_sector), Some(candidate_sector)) =
        (target.known_sector(), snapshot.known_sector())
    {
        if target_sector != candidate_sector {
            return Err(Rejection::SectorMismatch {
                target: target_sector.to_string(),
                candidate: candidate_sector.to_string(),
            });
        }
    }

    Ok(PeerRecord::from(snapshot))
}

/// Finds and validates comparable companies for a target
pub struct PeerScout {
    ctx: ResearchContext,
    market: Arc<dyn MarketDataProvider>,
}

impl PeerScout {
    pub fn new(ctx: ResearchContext, market: Arc<dyn MarketDataProvider>) -> Self {
        Self { ctx, market }
    }

    /// Discover, then validate; at most `peer_target` records in acceptance order
    #[instrument(skip_all, fields(ticker = %target.ticker))]
    pub async fn find_peers(&self, target: &MarketSnapshot) -> Vec<PeerRecord> {
        let candidates = self.discover_candidates(target).await;
        self.validate_candidates(target, &candidates).await
    }

    /// Ask the model for competitor tickers
    ///
    /// A failed call is logged and yields no candidates.
    pub async fn discover_candidates(&self, target: &MarketSnapshot) -> Vec<String> {
        info!("Identifying peers for {}...", target.ticker);

        let config = &self.ctx.config;
        let prompt = match self.ctx.render(
            PEER_DISCOVERY,
            &json!({
                "ticker": target.ticker,
                "company_name": target.company_name,
                "sector": target.known_sector(),
                "industry": target.industry,
                "min_peers": MIN_SUGGESTED_PEERS.min(config.peer_candidate_cap),
                "max_peers": config.peer_candidate_cap,
            }),
        ) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!("Could not build peer discovery prompt: {}", e);
                return Vec::new();
            }
        };

        let search = [config.web_search_tool()];
        match self
            .ctx
            .ask(PEER_SCOUT_SYSTEM, &prompt, &config.reasoning_model, Some(search.as_slice()))
            .await
        {
            Ok(response) => {
                let candidates =
                    parse_ticker_candidates(&response, &target.ticker, config.peer_candidate_cap);
                info!("Peer candidates for {}: {:?}", target.ticker, candidates);
                candidates
            }
            Err(e) => {
                warn!("Error identifying peers for {}: {}", target.ticker, e);
                Vec::new()
            }
        }
    }

    /// Look up candidates in order until `peer_target` are accepted
    pub async fn validate_candidates(
        &self,
        target: &MarketSnapshot,
        candidates: &[String],
    ) -> Vec<PeerRecord> {
        let wanted = self.ctx.config.peer_target;
        let mut peers: Vec<PeerRecord> = Vec::with_capacity(wanted);

        for candidate in candidates {
            if peers.len() >= wanted {
                break;
            }
            if candidate.eq_ignore_ascii_case(&target.ticker)
                || peers.iter().any(|p| &p.ticker == candidate)
            {
                continue;
            }

            info!("Scouting peer data for {}...", candidate);
            let data = self.market.market_data(candidate).await;

            match check_candidate(target, &data) {
                Ok(peer) => peers.push(peer),
                Err(rejection) => warn!("Rejected peer {}: {}", candidate, rejection),
            }
        }

        peers
    }
}
