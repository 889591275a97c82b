//! Error types for roster-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in roster-core
///
/// Row-level parse failures (an unreadable height or draft string) are not
/// represented here; they degrade to empty fields for that row.
#[derive(Debug, Error)]
pub enum Error {
    /// A source dataset is not present at its configured location
    #[error("{role} file '{path}' not found")]
    MissingInput { role: &'static str, path: PathBuf },

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse CSV
    #[error("failed to parse CSV '{path}': {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV parsing error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A column the operation depends on is absent
    #[error("required column '{column}' missing from '{path}'")]
    MissingColumn { column: String, path: PathBuf },

    /// Output path points at one of the source files
    #[error("refusing to overwrite source file '{path}'")]
    OutputIsInput { path: PathBuf },

    /// Moving the finished temp file into place failed
    #[error("failed to persist output '{path}': {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
