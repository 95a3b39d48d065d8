//! Equity research report CLI
//!
//! Researches one ticker end to end and writes the Markdown report plus its
//! JSON metadata into the results directory.
//!
//! # Usage
//!
//! ```bash
//! export XAI_API_KEY="xai-..."
//! cargo run --bin equity-report -- AAPL
//! cargo run --bin equity-report -- --results-dir out --json-logs BRK.B
//! cargo run --bin equity-report -- --peer-cap 5 BN.PA
//! ```
//!
//! Exit codes: 0 report saved, 1 pipeline failed, 2 configuration or usage error.

use anyhow::{Context, bail};
use clap::Parser;
use equity_research::{DeskConfig, ResearchPipeline};
use equity_utils::{LogFormat, init_tracing, load_dotenv};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_FAILED: u8 = 1;
const EXIT_USAGE: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "equity-report", version, about = "Generate an LLM equity research report")]
struct Cli {
    /// Ticker symbol, e.g. AAPL or BN.PA; prompted for when omitted
    ticker: Option<String>,

    /// Directory for the report and metadata files
    #[arg(long)]
    results_dir: Option<PathBuf>,

    /// Model for synthesis and search calls
    #[arg(long)]
    reasoning_model: Option<String>,

    /// Model for formatting calls
    #[arg(long)]
    fast_model: Option<String>,

    /// Number of validated peers to collect
    #[arg(long)]
    peer_cap: Option<usize>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    /// Build the desk configuration; flags win over values from `lookup`
    fn config<F>(&self, lookup: F) -> equity_research::Result<DeskConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = DeskConfig::builder();
        if let Some(dir) = &self.results_dir {
            builder = builder.results_dir(dir.clone());
        }
        if let Some(model) = &self.reasoning_model {
            builder = builder.reasoning_model(model.clone());
        }
        if let Some(model) = &self.fast_model {
            builder = builder.fast_model(model.clone());
        }
        if let Some(cap) = self.peer_cap {
            let candidates = cap.max(DeskConfig::default().peer_candidate_cap);
            builder = builder.peer_target(cap).peer_candidate_cap(candidates);
        }
        builder.with_env_lookup(lookup).build()
    }
}

fn read_ticker() -> anyhow::Result<String> {
    print!("Enter a stock ticker symbol (e.g., AAPL): ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin()
        .lock()
        .read_line(&mut input)
        .context("failed to read ticker from stdin")?;

    normalize_ticker(&input)
}

fn normalize_ticker(raw: &str) -> anyhow::Result<String> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() {
        bail!("no ticker symbol given");
    }
    Ok(ticker)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_tracing(format, "info");
    load_dotenv();

    let config = match cli.config(|key| std::env::var(key).ok()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            eprintln!("Configuration error: {e}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let ticker = match cli.ticker.as_deref().map_or_else(read_ticker, normalize_ticker) {
        Ok(ticker) => ticker,
        Err(e) => {
            eprintln!("Usage error: {e:#}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let pipeline = match ResearchPipeline::from_config(config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            tracing::error!("Failed to initialise pipeline: {}", e);
            eprintln!("Configuration error: {e}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    match pipeline.run(&ticker).await {
        Ok(saved) => {
            println!("Report saved to {}", saved.report_path.display());
            println!("Metadata saved to {}", saved.metadata_path.display());
            ExitCode::SUCCESS
        }
        Err(failure) if failure.is_config() => {
            eprintln!("Configuration error: {failure}");
            ExitCode::from(EXIT_USAGE)
        }
        Err(failure) => {
            eprintln!("Error: {failure}");
            ExitCode::from(EXIT_FAILED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ticker() {
        assert_eq!(normalize_ticker("  brk.b \n").unwrap(), "BRK.B");
        assert!(normalize_ticker(" \n").is_err());
    }

    #[test]
    fn test_cli_overrides_reach_config() {
        let cli = Cli::parse_from([
            "equity-report",
            "--results-dir",
            "out",
            "--fast-model",
            "grok-mini",
            "--peer-cap",
            "2",
            "aapl",
        ]);
        assert_eq!(cli.ticker.as_deref(), Some("aapl"));
        assert!(!cli.json_logs);

        let config = cli
            .config(|key| match key {
                "XAI_API_KEY" => Some("k".to_string()),
                "EQUITY_FAST_MODEL" => Some("from-env".to_string()),
                "EQUITY_REASONING_MODEL" => Some("grok-think".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.api_key, "k");
        assert_eq!(config.results_dir, PathBuf::from("out"));
        assert_eq!(config.fast_model, "grok-mini");
        assert_eq!(config.reasoning_model, "grok-think");
        assert_eq!(config.peer_target, 2);
        assert_eq!(config.peer_candidate_cap, 6);
    }

    #[test]
    fn test_large_peer_cap_widens_candidates() {
        let cli = Cli::parse_from(["equity-report", "--peer-cap", "8", "MSFT"]);
        let config = cli
            .config(|key| (key == "XAI_API_KEY").then(|| "k".to_string()))
            .unwrap();

        assert_eq!(config.peer_target, 8);
        assert_eq!(config.peer_candidate_cap, 8);
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let cli = Cli::parse_from(["equity-report", "AAPL"]);
        let err = cli.config(|_| None).unwrap_err();
        assert!(err.is_config());
    }
}
