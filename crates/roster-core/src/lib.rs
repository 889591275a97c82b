//! roster-core: Core library for merging NFL depth charts with player analysis results
//!
//! This library provides functionality to:
//! - Load depth chart and analysis CSV files with identifiers kept as raw text
//! - Collapse repeated analysis rows for the same player
//! - Left-join the two datasets on `PlayerUID`
//! - Decompose combined height/weight and draft info fields
//! - Write the merged table without ever leaving a partial file

pub mod bio;
pub mod config;
pub mod dedupe;
pub mod draft;
pub mod error;
pub mod merger;
pub mod parser;
pub mod report;
pub mod table;
pub mod writer;

pub use bio::{parse_height_inches, parse_weight_lbs, split_height_weight, HeightWeight};
pub use config::MergeConfig;
pub use dedupe::{dedupe_table, DedupeResult, DuplicatePolicy};
pub use draft::DraftInfo;
pub use error::{Error, Result};
pub use merger::{
    merge_tables, reorder_columns, run_merge, split_bio_fields, MergeOutcome, MergeStats,
};
pub use parser::{parse_csv, parse_csv_str};
pub use report::MergeReport;
pub use table::{CellValue, Column, Row, Table};
pub use writer::{ensure_distinct, write_csv};
