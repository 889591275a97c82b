//! Collapse analysis rows that share a player id
//!
//! The image analysis step can emit several rows for one player when a
//! scrape is retried. A row whose `InferredRace` records a failure
//! (`N/A (...)` or `Error: ...`) loses to any row that has a real result;
//! otherwise the first row seen wins.

use crate::error::{Error, Result};
use crate::table::{Row, Table};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Column holding the player identifier in both datasets
pub const KEY_COLUMN: &str = "PlayerUID";
/// Column used to judge whether an analysis row holds a usable result
pub const RESULT_COLUMN: &str = "InferredRace";

/// What to do when the analysis data repeats a player id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep one row per id, preferring rows with a usable result
    #[default]
    PreferValid,
    /// Keep every row; a repeated id fans out into several merged rows
    KeepAll,
}

/// Outcome of a de-duplication pass
#[derive(Debug, Clone)]
pub struct DedupeResult {
    /// Table with at most one row per id
    pub table: Table,
    /// Rows folded into an earlier row with the same id
    pub collapsed: usize,
    /// Rows dropped because their id was empty
    pub dropped_without_id: usize,
}

/// Whether an `InferredRace` value holds a real result
pub fn is_valid_result(value: &str) -> bool {
    !(value.starts_with("N/A (") || value.starts_with("Error:"))
}

/// Reduce `table` to one row per `PlayerUID`, keeping first-seen order
pub fn dedupe_table(table: &Table) -> Result<DedupeResult> {
    let key_idx = table
        .column_index(KEY_COLUMN)
        .ok_or_else(|| Error::MissingColumn {
            column: KEY_COLUMN.to_string(),
            path: table.source_path.clone(),
        })?;
    let result_idx = table.column_index(RESULT_COLUMN);

    let row_is_valid = |row: &Row| {
        result_idx
            .and_then(|i| row.get(i))
            .map(|c| is_valid_result(&c.to_string_value()))
            .unwrap_or(true)
    };

    let mut kept: Vec<Row> = Vec::new();
    let mut slot_by_id: HashMap<String, usize> = HashMap::new();
    let mut collapsed = 0;
    let mut dropped_without_id = 0;

    for (row_idx, row) in table.rows.iter().enumerate() {
        let id = row
            .get(key_idx)
            .map(|c| c.to_string_value())
            .unwrap_or_default();

        if id.is_empty() {
            warn!(row = row_idx + 1, "analysis row has no PlayerUID, skipping");
            dropped_without_id += 1;
            continue;
        }

        match slot_by_id.get(&id) {
            None => {
                slot_by_id.insert(id, kept.len());
                kept.push(row.clone());
            }
            Some(&slot) => {
                collapsed += 1;
                if row_is_valid(row) && !row_is_valid(&kept[slot]) {
                    debug!(player = %id, "replacing failed analysis row with valid one");
                    kept[slot] = row.clone();
                } else {
                    debug!(player = %id, "keeping first analysis row");
                }
            }
        }
    }

    Ok(DedupeResult {
        table: Table {
            columns: table.columns.clone(),
            rows: kept,
            source_path: table.source_path.clone(),
        },
        collapsed,
        dropped_without_id,
    })
}
