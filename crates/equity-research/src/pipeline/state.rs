//! Pipeline states and the tracker that walks them

use std::fmt;
use tracing::info;

/// Where a run is in the research pipeline
///
/// Transitions are strictly sequential; any stage may drop into `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Start,
    DataGathering,
    FundamentalAnalysis,
    SentimentAnalysis,
    PortfolioSynthesis,
    Editing,
    Persisted,
    Failed,
}

impl PipelineState {
    /// Successor on the happy path
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Start => Some(Self::DataGathering),
            Self::DataGathering => Some(Self::FundamentalAnalysis),
            Self::FundamentalAnalysis => Some(Self::SentimentAnalysis),
            Self::SentimentAnalysis => Some(Self::PortfolioSynthesis),
            Self::PortfolioSynthesis => Some(Self::Editing),
            Self::Editing => Some(Self::Persisted),
            Self::Persisted | Self::Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Persisted | Self::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::DataGathering => "data_gathering",
            Self::FundamentalAnalysis => "fundamental_analysis",
            Self::SentimentAnalysis => "sentiment_analysis",
            Self::PortfolioSynthesis => "portfolio_synthesis",
            Self::Editing => "editing",
            Self::Persisted => "persisted",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current state of one run plus the states it passed through
#[derive(Debug, Clone)]
pub struct StateTracker {
    current: PipelineState,
    history: Vec<PipelineState>,
}

impl StateTracker {
    pub fn new() -> Self {
        Self {
            current: PipelineState::Start,
            history: vec![PipelineState::Start],
        }
    }

    pub fn current(&self) -> PipelineState {
        self.current
    }

    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    /// Move to the next state; terminal states stay put
    pub fn advance(&mut self) -> PipelineState {
        if let Some(next) = self.current.next() {
            info!("Stage: {} -> {}", self.current, next);
            self.enter(next);
        }
        self.current
    }

    /// Drop into `Failed`, returning the state the failure happened in
    pub fn fail(&mut self) -> PipelineState {
        let failed_in = self.current;
        if !failed_in.is_terminal() {
            self.enter(PipelineState::Failed);
        }
        failed_in
    }

    fn enter(&mut self, state: PipelineState) {
        self.current = state;
        self.history.push(state);
    }
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PipelineState::*;

    #[test]
    fn test_happy_path_is_sequential() {
        let mut tracker = StateTracker::new();
        while !tracker.current().is_terminal() {
            tracker.advance();
        }

        assert_eq!(
            tracker.history(),
            [
                Start,
                DataGathering,
                FundamentalAnalysis,
                SentimentAnalysis,
                PortfolioSynthesis,
                Editing,
                Persisted
            ]
        );
        assert_eq!(tracker.advance(), Persisted);
    }

    #[test]
    fn test_fail_records_stage() {
        let mut tracker = StateTracker::new();
        tracker.advance();
        tracker.advance();

        assert_eq!(tracker.fail(), FundamentalAnalysis);
        assert_eq!(tracker.current(), Failed);
        assert_eq!(tracker.advance(), Failed);
        assert_eq!(tracker.fail(), Failed);
        assert_eq!(tracker.history().last(), Some(&Failed));
    }
}
