//! Report persistence
//!
//! Each run writes `<ticker>-<YYYY-MM-DD_HH-MM-SS>.md` with the final report
//! and a `.json` sibling with the run metadata. Both are written once and
//! never touched again.

use crate::agents::Rating;
use crate::error::Result;
use crate::scout::DataBundle;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Audit record saved next to each report
#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    pub ticker: String,
    pub run_id: Uuid,
    pub timestamp: DateTime<Local>,
    pub duration_seconds: f64,
    pub data_source: String,
    pub fundamental_analysis: String,
    pub sentiment_analysis: String,
    pub portfolio_manager_verdict: String,
    pub rating: Option<Rating>,
    pub raw_data: DataBundle,
}

/// Paths of a persisted run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedReport {
    pub run_id: Uuid,
    pub report_path: PathBuf,
    pub metadata_path: PathBuf,
    pub rating: Option<Rating>,
}

/// Replace every character outside `[A-Za-z0-9_.-]` with `_`
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Shared file stem for a run's artifacts
pub fn artifact_stem(ticker: &str, at: &DateTime<Local>) -> String {
    format!(
        "{}-{}",
        sanitize_filename(ticker),
        at.format(FILE_TIMESTAMP_FORMAT)
    )
}

/// Writes report and metadata files into the results directory
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist both artifacts; on a metadata failure the report file is removed
    pub async fn save(&self, report: &str, metadata: &RunMetadata) -> Result<SavedReport> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let stem = artifact_stem(&metadata.ticker, &metadata.timestamp);
        let report_path = self.dir.join(format!("{stem}.md"));
        let metadata_path = self.dir.join(format!("{stem}.json"));

        let json = serde_json::to_string_pretty(metadata)?;

        tokio::fs::write(&report_path, report).await?;
        if let Err(e) = tokio::fs::write(&metadata_path, json).await {
            if let Err(cleanup) = tokio::fs::remove_file(&report_path).await {
                warn!(
                    "Could not remove {} after failed metadata write: {}",
                    report_path.display(),
                    cleanup
                );
            }
            return Err(e.into());
        }

        info!("Report saved to {}", report_path.display());
        info!("Metadata saved to {}", metadata_path.display());

        Ok(SavedReport {
            run_id: metadata.run_id,
            report_path,
            metadata_path,
            rating: metadata.rating,
        })
    }
}
