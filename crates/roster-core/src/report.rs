//! Summary of a completed merge run

use crate::error::Result;
use crate::merger::{MergeOutcome, MergeStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// What a merge run read, wrote, and could not parse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeReport {
    /// When the output was written
    pub timestamp: DateTime<Utc>,
    pub depth_chart_path: PathBuf,
    pub analysis_path: PathBuf,
    pub output_path: PathBuf,
    #[serde(flatten)]
    pub stats: MergeStats,
    /// Output header, in order
    pub columns: Vec<String>,
}

impl MergeReport {
    pub fn new(
        depth_chart_path: &Path,
        analysis_path: &Path,
        output_path: &Path,
        outcome: &MergeOutcome,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            depth_chart_path: depth_chart_path.to_path_buf(),
            analysis_path: analysis_path.to_path_buf(),
            output_path: output_path.to_path_buf(),
            stats: outcome.stats.clone(),
            columns: outcome
                .table
                .columns
                .iter()
                .map(|c| c.name.clone())
                .collect(),
        }
    }

    /// Save the report as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
