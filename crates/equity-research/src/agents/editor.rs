//! Editor: compiles the sections into the final report

use super::{AnalystOutput, AnalystRole};
use crate::context::ResearchContext;
use crate::error::Result;
use crate::prompts::{EDITOR_SYSTEM, EDITORIAL_COMPILATION};
use serde_json::json;
use tracing::{debug, info, instrument};

pub const DISCLAIMER: &str = "This report is generated automatically from public market data \
and language-model analysis for informational purposes only. It does not constitute investment \
advice, an offer, or a solicitation to buy or sell any security. Figures may be incomplete or \
out of date. Consult a licensed financial advisor before making investment decisions.";

/// Polishes and assembles the section outputs on the fast model
pub struct Editor {
    ctx: ResearchContext,
}

impl Editor {
    pub fn new(ctx: ResearchContext) -> Self {
        Self { ctx }
    }

    /// Compile `sections` in the given order into one Markdown document
    #[instrument(skip_all, fields(ticker = %ticker))]
    pub async fn run(
        &self,
        ticker: &str,
        report_date: &str,
        sections: &[&AnalystOutput],
    ) -> Result<AnalystOutput> {
        info!("Compiling final report for {}...", ticker);

        let texts: Vec<&str> = sections.iter().map(|s| s.text()).collect();
        let prompt = self.ctx.render(
            EDITORIAL_COMPILATION,
            &json!({
                "ticker": ticker,
                "date": report_date,
                "sections": texts,
            }),
        )?;

        let text = self
            .ctx
            .ask(EDITOR_SYSTEM, &prompt, &self.ctx.config.fast_model, None)
            .await?;

        Ok(AnalystOutput::new(
            AnalystRole::Editor,
            finalize_report(&text, ticker, report_date),
        ))
    }
}

/// Add the title block and the disclaimer when the model left them out
pub fn finalize_report(text: &str, ticker: &str, report_date: &str) -> String {
    let mut report = String::with_capacity(text.len() + DISCLAIMER.len() + 128);

    let has_title = text.lines().any(|line| line.trim_start().starts_with("# "));
    if !has_title {
        debug!("Adding report title");
        report.push_str(&format!(
            "# {}: {}\n\n*Report Date: {}*\n\n",
            AnalystRole::Editor.section_title(),
            ticker,
            report_date
        ));
    }

    report.push_str(text.trim_end());

    if !text.to_lowercase().contains("disclaimer") {
        debug!("Appending disclaimer");
        report.push_str("\n\n---\n\n**Disclaimer:** ");
        report.push_str(DISCLAIMER);
    }

    report.push('\n');
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubLlm, test_context, user_prompt};
    use std::sync::Arc;

    #[test]
    fn test_finalize_adds_title_and_disclaimer() {
        let report = finalize_report("## Financial Deep Dive\nBody", "AAPL", "2024-11-01");

        assert!(report.starts_with("# Equity Research Report: AAPL\n\n*Report Date: 2024-11-01*"));
        assert!(report.contains("## Financial Deep Dive\nBody"));
        assert!(report.trim_end().ends_with(DISCLAIMER));
    }

    #[test]
    fn test_finalize_keeps_existing_framing() {
        let text = "# Apple Inc. (AAPL)\n\nBody\n\n**Disclaimer:** Not advice.";
        let report = finalize_report(text, "AAPL", "2024-11-01");

        assert_eq!(report, format!("{text}\n"));
    }

    #[tokio::test]
    async fn test_run_compiles_sections_in_order() {
        let llm = Arc::new(StubLlm::analyst_desk(""));
        let editor = Editor::new(test_context(llm.clone()));

        let verdict = AnalystOutput::new(AnalystRole::PortfolioManager, "VERDICT-TEXT");
        let fundamental = AnalystOutput::new(AnalystRole::Fundamental, "FUNDAMENTAL-TEXT");
        let sentiment = AnalystOutput::new(AnalystRole::Sentiment, "SENTIMENT-TEXT");

        let report = editor
            .run("AAPL", "2024-11-01", &[&verdict, &fundamental, &sentiment])
            .await
            .unwrap();

        assert_eq!(report.role, AnalystRole::Editor);

        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, "grok-4-1-fast-non-reasoning");

        let prompt = user_prompt(&calls[0]);
        assert!(prompt.contains("Report Date: 2024-11-01"));
        let v = prompt.find("VERDICT-TEXT").unwrap();
        let f = prompt.find("FUNDAMENTAL-TEXT").unwrap();
        let s = prompt.find("SENTIMENT-TEXT").unwrap();
        assert!(v < f && f < s);
    }
}
