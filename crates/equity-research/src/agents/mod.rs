//! Analyst stages
//!
//! Each stage formats its inputs into a templated prompt and makes its LLM
//! calls through the shared [`ResearchContext`](crate::context::ResearchContext).
//! Stages hold no state between runs.

pub mod editor;
pub mod fundamental;
pub mod portfolio_manager;
pub mod sentiment;

pub use editor::Editor;
pub use fundamental::FundamentalAnalyst;
pub use portfolio_manager::{PortfolioManager, PortfolioVerdict, Rating};
pub use sentiment::SentimentAnalyst;

use serde::Serialize;
use std::fmt;

/// The section a stage is responsible for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalystRole {
    Fundamental,
    Sentiment,
    PortfolioManager,
    Editor,
}

impl AnalystRole {
    /// Markdown heading the stage is asked to produce
    pub fn section_title(self) -> &'static str {
        match self {
            Self::Fundamental => "Financial Deep Dive",
            Self::Sentiment => "Qualitative & Catalyst Analysis",
            Self::PortfolioManager => "Executive Summary & Investment Verdict",
            Self::Editor => "Equity Research Report",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fundamental => "fundamental",
            Self::Sentiment => "sentiment",
            Self::PortfolioManager => "portfolio_manager",
            Self::Editor => "editor",
        }
    }
}

impl fmt::Display for AnalystRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generated text tagged with the stage that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalystOutput {
    pub role: AnalystRole,
    pub text: String,
}

impl AnalystOutput {
    pub fn new(role: AnalystRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
