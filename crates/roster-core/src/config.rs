//! File locations for a merge run

use crate::dedupe::DuplicatePolicy;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT_DIR: &str = "combined_depth_charts";
pub const DEFAULT_DEPTH_CHART_FILE: &str = "master_nfl_depth_chart.csv";
pub const DEFAULT_ANALYSIS_FILE: &str = "player_race_analysis_results.csv";
pub const DEFAULT_OUTPUT_FILE: &str = "master_nfl_depth_chart_with_race.csv";

/// Where to read the two datasets and where to write the merged file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Directory holding the inputs and the output
    pub input_dir: PathBuf,
    /// Depth chart file name (left side of the join)
    pub depth_chart_file: String,
    /// Analysis results file name (right side of the join)
    pub analysis_file: String,
    /// Merged output file name
    pub output_file: String,
    /// Handling of repeated ids in the analysis data
    pub duplicates: DuplicatePolicy,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            depth_chart_file: DEFAULT_DEPTH_CHART_FILE.to_string(),
            analysis_file: DEFAULT_ANALYSIS_FILE.to_string(),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            duplicates: DuplicatePolicy::default(),
        }
    }
}

impl MergeConfig {
    /// Defaults rooted at another directory
    pub fn in_dir<P: Into<PathBuf>>(input_dir: P) -> Self {
        Self {
            input_dir: input_dir.into(),
            ..Self::default()
        }
    }

    pub fn depth_chart_path(&self) -> PathBuf {
        self.input_dir.join(&self.depth_chart_file)
    }

    pub fn analysis_path(&self) -> PathBuf {
        self.input_dir.join(&self.analysis_file)
    }

    pub fn output_path(&self) -> PathBuf {
        self.input_dir.join(&self.output_file)
    }

    /// Load a config from JSON; omitted fields take their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the config as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
