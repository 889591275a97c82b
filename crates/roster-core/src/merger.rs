//! Merge engine joining the depth chart with player analysis results
//!
//! The depth chart is the left side of the join: every depth chart row
//! appears in the output. Analysis columns are attached where `PlayerUID`
//! matches (compared as raw text), the combined bio fields are decomposed,
//! and columns are put into a stable reading order.

use crate::bio::{height_weight_fragments, HeightWeight};
use crate::config::MergeConfig;
use crate::dedupe::{dedupe_table, DuplicatePolicy, KEY_COLUMN};
use crate::draft::DraftInfo;
use crate::error::{Error, Result};
use crate::parser::parse_csv;
use crate::report::MergeReport;
use crate::table::{CellValue, Row, Table};
use crate::writer::{ensure_distinct, write_csv};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

/// Combined `height, weight` column from the bio scrape
pub const HEIGHT_WEIGHT_COLUMN: &str = "PlayerHeightWeight";
/// Combined draft description column from the bio scrape
pub const DRAFT_INFO_COLUMN: &str = "PlayerDraftInfo";

pub const HEIGHT_COLUMN: &str = "PlayerHeightInches";
pub const WEIGHT_COLUMN: &str = "PlayerWeightLBS";
pub const DRAFT_YEAR_COLUMN: &str = "DraftYear";
pub const DRAFT_POSITION_COLUMN: &str = "DraftPosition";
pub const DRAFT_ORGANIZATION_COLUMN: &str = "DraftOrganization";

static EMPTY_CELL: CellValue = CellValue::Empty;

/// Analysis fields that may replace a same-named depth chart column
///
/// Any other shared name (e.g. `PlayerName`) keeps the depth chart value.
pub const ANALYSIS_FIELDS: &[&str] = &[
    "InferredRace",
    "RaceConfidence",
    "InferredAge",
    "InferredEmotion",
    "EmotionConfidence",
    HEIGHT_WEIGHT_COLUMN,
    "PlayerBirthdate",
    "PlayerCollege",
    DRAFT_INFO_COLUMN,
    "PlayerOverallStatus",
    "PlayerURL",
];

/// Reading order for known columns; anything else follows in original order
pub const PREFERRED_ORDER: &[&str] = &[
    "TeamName",
    "PrimaryPosition",
    "PrimaryDepth",
    "Position2",
    "Position2Depth",
    "Position3",
    "Position3Depth",
    "PlayerName",
    KEY_COLUMN,
    "InjuryStatus",
    "InferredRace",
    "RaceConfidence",
    "InferredAge",
    "InferredEmotion",
    "EmotionConfidence",
    HEIGHT_COLUMN,
    WEIGHT_COLUMN,
    "PlayerBirthdate",
    "PlayerCollege",
    DRAFT_YEAR_COLUMN,
    DRAFT_POSITION_COLUMN,
    DRAFT_ORGANIZATION_COLUMN,
    "PlayerOverallStatus",
    "PlayerURL",
];

/// Counters describing a merge or bio split
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    /// Rows in the depth chart input
    pub depth_chart_rows: usize,
    /// Rows in the analysis input, before de-duplication
    pub analysis_rows: usize,
    /// Analysis rows folded away by de-duplication
    pub duplicates_collapsed: usize,
    /// Depth chart rows that found an analysis match
    pub matched_rows: usize,
    /// Depth chart rows with no analysis match
    pub unmatched_rows: usize,
    /// Rows written
    pub output_rows: usize,
    /// Height/weight strings with a height part that could not be read
    /// (`N/A` markers are not counted)
    pub unparsed_heights: usize,
    /// Height/weight strings with a weight part that could not be read
    pub unparsed_weights: usize,
    /// Non-empty draft strings that matched no known form
    pub unparsed_draft_info: usize,
}

/// A merged table together with its counters
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub table: Table,
    pub stats: MergeStats,
}

/// Left-join `depth_chart` with `analysis` on `PlayerUID`
///
/// Where both sides share a column listed in `ANALYSIS_FIELDS`, the analysis
/// value wins unless it is empty, in which case the depth chart value is
/// kept. Other shared columns always keep the depth chart value.
pub fn merge_tables(
    depth_chart: &Table,
    analysis: &Table,
    policy: DuplicatePolicy,
) -> Result<MergeOutcome> {
    let left_key = require_column(depth_chart, KEY_COLUMN)?;
    require_column(analysis, KEY_COLUMN)?;

    let mut stats = MergeStats {
        depth_chart_rows: depth_chart.row_count(),
        analysis_rows: analysis.row_count(),
        ..MergeStats::default()
    };

    let deduped;
    let right: &Table = match policy {
        DuplicatePolicy::PreferValid => {
            let result = dedupe_table(analysis)?;
            stats.duplicates_collapsed = result.collapsed;
            deduped = result.table;
            &deduped
        }
        DuplicatePolicy::KeepAll => analysis,
    };
    let right_key = require_column(right, KEY_COLUMN)?;

    // id -> analysis rows, in file order
    let mut rows_by_id: HashMap<String, Vec<&Row>> = HashMap::new();
    for row in &right.rows {
        let id = row.get(right_key).map(|c| c.to_string_value()).unwrap_or_default();
        if !id.is_empty() {
            rows_by_id.entry(id).or_default().push(row);
        }
    }

    // Unified columns: every depth chart column, then analysis-only columns.
    // A shared name keeps the depth chart position and resolves per row.
    let mut column_names: Vec<String> = depth_chart.columns.iter().map(|c| c.name.clone()).collect();

    // (unified index, analysis index) for each analysis column carried over
    let mut right_map: Vec<(usize, usize)> = Vec::new();
    for col in &right.columns {
        if col.index == right_key {
            continue;
        }
        if let Some(idx) = depth_chart.column_index(&col.name) {
            if ANALYSIS_FIELDS.contains(&col.name.as_str()) {
                debug!(column = %col.name, "column present on both sides, preferring analysis value");
                right_map.push((idx, col.index));
            } else {
                debug!(column = %col.name, "column present on both sides, keeping depth chart value");
            }
        } else {
            right_map.push((column_names.len(), col.index));
            column_names.push(col.name.clone());
        }
    }

    let mut merged = Table::with_columns(depth_chart.source_path.clone(), column_names);
    let width = merged.column_count();

    for left_row in &depth_chart.rows {
        let mut base = left_row.cells.clone();
        base.resize(width, CellValue::Empty);

        let id = left_row.get(left_key).map(|c| c.to_string_value()).unwrap_or_default();
        match rows_by_id.get(&id) {
            Some(matches) => {
                stats.matched_rows += 1;
                for right_row in matches {
                    let mut cells = base.clone();
                    for &(unified_idx, right_idx) in &right_map {
                        if let Some(value) = right_row.get(right_idx) {
                            if !value.is_empty() {
                                cells[unified_idx] = value.clone();
                            }
                        }
                    }
                    merged.rows.push(Row::new(cells));
                }
            }
            None => {
                stats.unmatched_rows += 1;
                merged.rows.push(Row::new(base));
            }
        }
    }

    let (split, bio_stats) = split_bio_fields(&merged);
    stats.unparsed_heights = bio_stats.unparsed_heights;
    stats.unparsed_weights = bio_stats.unparsed_weights;
    stats.unparsed_draft_info = bio_stats.unparsed_draft_info;

    let table = reorder_columns(&split);
    stats.output_rows = table.row_count();

    Ok(MergeOutcome { table, stats })
}

/// Replace the combined height/weight and draft columns with their parts
///
/// When a combined column is absent its derived columns are still added,
/// empty, unless the table already carries them.
pub fn split_bio_fields(table: &Table) -> (Table, MergeStats) {
    let mut stats = MergeStats {
        output_rows: table.row_count(),
        ..MergeStats::default()
    };

    let hw_idx = table.column_index(HEIGHT_WEIGHT_COLUMN);
    let draft_idx = table.column_index(DRAFT_INFO_COLUMN);

    let hw_derived = [HEIGHT_COLUMN, WEIGHT_COLUMN];
    let draft_derived = [DRAFT_YEAR_COLUMN, DRAFT_POSITION_COLUMN, DRAFT_ORGANIZATION_COLUMN];

    // Source columns to drop: the combined fields, plus stale derived
    // columns that are about to be recomputed.
    let mut dropped: HashSet<&str> = HashSet::new();
    if hw_idx.is_some() {
        dropped.insert(HEIGHT_WEIGHT_COLUMN);
        dropped.extend(hw_derived);
    }
    if draft_idx.is_some() {
        dropped.insert(DRAFT_INFO_COLUMN);
        dropped.extend(draft_derived);
    }

    let kept: Vec<usize> = table
        .columns
        .iter()
        .filter(|c| !dropped.contains(c.name.as_str()))
        .map(|c| c.index)
        .collect();

    // Derived columns to append, as indices into the derived name arrays
    let add_hw: Vec<usize> = (0..hw_derived.len())
        .filter(|&i| hw_idx.is_some() || table.find_column(hw_derived[i]).is_none())
        .collect();
    let add_draft: Vec<usize> = (0..draft_derived.len())
        .filter(|&i| draft_idx.is_some() || table.find_column(draft_derived[i]).is_none())
        .collect();

    let mut names: Vec<String> = kept.iter().map(|&i| table.columns[i].name.clone()).collect();
    names.extend(add_hw.iter().map(|&i| hw_derived[i].to_string()));
    names.extend(add_draft.iter().map(|&i| draft_derived[i].to_string()));

    let mut out = Table::with_columns(table.source_path.clone(), names);

    for row in &table.rows {
        let mut cells: Vec<CellValue> = kept
            .iter()
            .map(|&i| row.get(i).cloned().unwrap_or(CellValue::Empty))
            .collect();

        let hw_cell = hw_idx.and_then(|i| row.get(i)).unwrap_or(&EMPTY_CELL);
        let hw = HeightWeight::from_cell(hw_cell);
        if let Some((height_raw, weight_raw)) = hw_cell.as_text().and_then(height_weight_fragments) {
            // A value of unrecognised shape yields no fragments at all
            let unreadable = height_raw.is_empty() && weight_raw.is_empty();
            if hw.height_inches.is_none() && (unreadable || !height_raw.is_empty()) {
                stats.unparsed_heights += 1;
            }
            if hw.weight_lbs.is_none() && !weight_raw.is_empty() {
                stats.unparsed_weights += 1;
            }
        }

        let draft_cell = draft_idx.and_then(|i| row.get(i)).unwrap_or(&EMPTY_CELL);
        let draft = DraftInfo::from_cell(draft_cell);
        if !draft_cell.is_empty() && draft.is_unknown() {
            stats.unparsed_draft_info += 1;
        }

        let hw_values = [CellValue::from(hw.height_inches), CellValue::from(hw.weight_lbs)];
        let draft_values = draft.to_cells();
        cells.extend(add_hw.iter().map(|&i| hw_values[i].clone()));
        cells.extend(add_draft.iter().map(|&i| draft_values[i].clone()));

        out.rows.push(Row::new(cells));
    }

    (out, stats)
}

/// Put known columns first in `PREFERRED_ORDER`, then the rest as they were
pub fn reorder_columns(table: &Table) -> Table {
    let mut order: Vec<usize> = PREFERRED_ORDER
        .iter()
        .filter_map(|name| table.column_index(name))
        .collect();
    let placed: HashSet<usize> = order.iter().copied().collect();
    order.extend(
        table
            .columns
            .iter()
            .map(|c| c.index)
            .filter(|i| !placed.contains(i)),
    );

    let names = order.iter().map(|&i| table.columns[i].name.clone());
    let mut out = Table::with_columns(table.source_path.clone(), names);
    out.rows = table
        .rows
        .iter()
        .map(|row| {
            Row::new(
                order
                    .iter()
                    .map(|&i| row.get(i).cloned().unwrap_or(CellValue::Empty))
                    .collect(),
            )
        })
        .collect();
    out
}

/// Load both inputs named by `config`, merge them, and write the result
///
/// Nothing is written unless every step succeeds.
pub fn run_merge(config: &MergeConfig) -> Result<MergeReport> {
    let depth_chart_path = config.depth_chart_path();
    let analysis_path = config.analysis_path();
    let output_path = config.output_path();

    require_file(&depth_chart_path, "depth chart")?;
    require_file(&analysis_path, "analysis results")?;
    ensure_distinct(&output_path, &[depth_chart_path.as_path(), analysis_path.as_path()])?;

    info!(path = %depth_chart_path.display(), "loading depth chart");
    let depth_chart = parse_csv(&depth_chart_path)?;
    info!(path = %analysis_path.display(), "loading analysis results");
    let analysis = parse_csv(&analysis_path)?;

    let outcome = merge_tables(&depth_chart, &analysis, config.duplicates)?;
    write_csv(&outcome.table, &output_path)?;
    info!(
        path = %output_path.display(),
        rows = outcome.stats.output_rows,
        "merged output written"
    );

    Ok(MergeReport::new(
        &depth_chart_path,
        &analysis_path,
        &output_path,
        &outcome,
    ))
}

fn require_file(path: &Path, role: &'static str) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::MissingInput {
            role,
            path: path.to_path_buf(),
        })
    }
}

fn require_column(table: &Table, name: &str) -> Result<usize> {
    table.column_index(name).ok_or_else(|| Error::MissingColumn {
        column: name.to_string(),
        path: table.source_path.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_csv_str;

    const DEPTH: &str = "TeamName,PrimaryPosition,PlayerName,PlayerUID,InjuryStatus,PlayerURL\n\
        Bills,QB,Josh Allen,001,,http://depth/001\n\
        Bills,WR,Stefon Diggs,002,Q,http://depth/002\n\
        Bills,K,Tyler Bass,003,,http://depth/003\n";

    const ANALYSIS: &str = "PlayerUID,InferredRace,RaceConfidence,PlayerHeightWeight,PlayerBirthdate,PlayerCollege,PlayerDraftInfo,PlayerURL\n\
        001,white,91.2,\"6' 5\"\", 237 lbs\",1996-05-21,Wyoming,2018: Rd 1 Pk 7 (BUF),http://bio/001\n\
        002,black,88.0,\"6' 0\"\", 191 lbs\",1993-11-29,Texas,\"2015: Rd 5, Pk 146 (MIN)\",\n";

    fn merged() -> MergeOutcome {
        let depth = parse_csv_str(DEPTH, "depth.csv").unwrap();
        let analysis = parse_csv_str(ANALYSIS, "analysis.csv").unwrap();
        merge_tables(&depth, &analysis, DuplicatePolicy::PreferValid).unwrap()
    }

    fn cell<'a>(table: &'a Table, row: usize, name: &str) -> &'a CellValue {
        table.value(&table.rows[row], name)
    }

    #[test]
    fn test_row_count_matches_depth_chart() {
        let outcome = merged();
        assert_eq!(outcome.table.row_count(), 3);
        assert_eq!(outcome.stats.matched_rows, 2);
        assert_eq!(outcome.stats.unmatched_rows, 1);
        assert_eq!(outcome.stats.output_rows, 3);
    }

    #[test]
    fn test_ids_keep_leading_zeros() {
        let outcome = merged();
        assert_eq!(cell(&outcome.table, 0, "PlayerUID"), &CellValue::text("001"));
        assert_eq!(cell(&outcome.table, 0, "InferredRace"), &CellValue::text("white"));
    }

    #[test]
    fn test_padded_id_does_not_match() {
        let depth = parse_csv_str(
            "TeamName,PlayerName,PlayerUID\nBills,Josh Allen,\" 001 \"\n",
            "depth.csv",
        )
        .unwrap();
        let analysis = parse_csv_str("PlayerUID,InferredRace\n001,white\n", "analysis.csv").unwrap();

        let outcome = merge_tables(&depth, &analysis, DuplicatePolicy::PreferValid).unwrap();
        let t = &outcome.table;
        assert_eq!(cell(t, 0, "PlayerUID"), &CellValue::text(" 001 "));
        assert_eq!(cell(t, 0, "InferredRace"), &CellValue::Empty);
        assert_eq!(outcome.stats.matched_rows, 0);
        assert_eq!(outcome.stats.unmatched_rows, 1);
    }

    #[test]
    fn test_unmatched_row_has_empty_analysis_fields() {
        let outcome = merged();
        let t = &outcome.table;
        assert_eq!(cell(t, 2, "PlayerName"), &CellValue::text("Tyler Bass"));
        assert_eq!(cell(t, 2, "InferredRace"), &CellValue::Empty);
        assert_eq!(cell(t, 2, HEIGHT_COLUMN), &CellValue::Empty);
        assert_eq!(cell(t, 2, DRAFT_YEAR_COLUMN), &CellValue::Empty);
    }

    #[test]
    fn test_url_collision_prefers_analysis_then_falls_back() {
        let outcome = merged();
        let t = &outcome.table;
        assert_eq!(cell(t, 0, "PlayerURL"), &CellValue::text("http://bio/001"));
        // Analysis URL empty for 002, unmatched for 003
        assert_eq!(cell(t, 1, "PlayerURL"), &CellValue::text("http://depth/002"));
        assert_eq!(cell(t, 2, "PlayerURL"), &CellValue::text("http://depth/003"));
        assert_eq!(
            t.columns.iter().filter(|c| c.name == "PlayerURL").count(),
            1
        );
    }

    #[test]
    fn test_bio_fields_are_decomposed() {
        let outcome = merged();
        let t = &outcome.table;
        assert!(t.find_column(HEIGHT_WEIGHT_COLUMN).is_none());
        assert!(t.find_column(DRAFT_INFO_COLUMN).is_none());

        assert_eq!(cell(t, 0, HEIGHT_COLUMN), &CellValue::Integer(77));
        assert_eq!(cell(t, 0, WEIGHT_COLUMN), &CellValue::Integer(237));
        assert_eq!(cell(t, 1, HEIGHT_COLUMN), &CellValue::Integer(72));
        assert_eq!(cell(t, 1, DRAFT_YEAR_COLUMN), &CellValue::Integer(2015));
        assert_eq!(cell(t, 1, DRAFT_POSITION_COLUMN), &CellValue::text("Rd 5, Pk 146"));
        assert_eq!(cell(t, 1, DRAFT_ORGANIZATION_COLUMN), &CellValue::text("MIN"));
    }

    #[test]
    fn test_malformed_draft_degrades_for_that_row_only() {
        let outcome = merged();
        let t = &outcome.table;
        // Row 001 is missing the comma between round and pick
        assert_eq!(cell(t, 0, DRAFT_YEAR_COLUMN), &CellValue::Empty);
        assert_eq!(cell(t, 0, DRAFT_ORGANIZATION_COLUMN), &CellValue::Empty);
        assert_eq!(outcome.stats.unparsed_draft_info, 1);
        assert_eq!(cell(t, 1, DRAFT_YEAR_COLUMN), &CellValue::Integer(2015));
    }

    #[test]
    fn test_column_order() {
        let outcome = merged();
        assert_eq!(
            outcome.table.column_names(),
            vec![
                "TeamName",
                "PrimaryPosition",
                "PlayerName",
                "PlayerUID",
                "InjuryStatus",
                "InferredRace",
                "RaceConfidence",
                "PlayerHeightInches",
                "PlayerWeightLBS",
                "PlayerBirthdate",
                "PlayerCollege",
                "DraftYear",
                "DraftPosition",
                "DraftOrganization",
                "PlayerURL",
            ]
        );
    }

    #[test]
    fn test_unknown_columns_are_appended_in_order() {
        let depth = parse_csv_str("Zeta,PlayerUID,Alpha\nz,1,a\n", "depth.csv").unwrap();
        let analysis = parse_csv_str("PlayerUID,Extra,InferredRace\n1,e,white\n", "analysis.csv").unwrap();

        let outcome = merge_tables(&depth, &analysis, DuplicatePolicy::PreferValid).unwrap();
        assert_eq!(
            outcome.table.column_names(),
            vec![
                "PlayerUID",
                "InferredRace",
                "PlayerHeightInches",
                "PlayerWeightLBS",
                "DraftYear",
                "DraftPosition",
                "DraftOrganization",
                "Zeta",
                "Alpha",
                "Extra",
            ]
        );
        assert_eq!(cell(&outcome.table, 0, "Extra"), &CellValue::text("e"));
    }

    #[test]
    fn test_duplicate_ids_collapse_by_default() {
        let depth = parse_csv_str("PlayerUID,PlayerName\n1,A\n2,B\n", "depth.csv").unwrap();
        let analysis = parse_csv_str(
            "PlayerUID,InferredRace\n1,N/A (No Face Detected)\n1,white\n",
            "analysis.csv",
        )
        .unwrap();

        let outcome = merge_tables(&depth, &analysis, DuplicatePolicy::PreferValid).unwrap();
        assert_eq!(outcome.table.row_count(), 2);
        assert_eq!(outcome.stats.duplicates_collapsed, 1);
        assert_eq!(cell(&outcome.table, 0, "InferredRace"), &CellValue::text("white"));
    }

    #[test]
    fn test_duplicate_ids_fan_out_when_kept() {
        let depth = parse_csv_str("PlayerUID,PlayerName\n1,A\n2,B\n", "depth.csv").unwrap();
        let analysis =
            parse_csv_str("PlayerUID,InferredRace\n1,white\n1,black\n", "analysis.csv").unwrap();

        let outcome = merge_tables(&depth, &analysis, DuplicatePolicy::KeepAll).unwrap();
        assert_eq!(outcome.table.row_count(), 3);
        assert_eq!(outcome.stats.matched_rows, 1);
        assert_eq!(cell(&outcome.table, 1, "InferredRace"), &CellValue::text("black"));
    }

    #[test]
    fn test_missing_key_column_is_an_error() {
        let depth = parse_csv_str("PlayerName\nA\n", "depth.csv").unwrap();
        let analysis = parse_csv_str("PlayerUID\n1\n", "analysis.csv").unwrap();

        let err = merge_tables(&depth, &analysis, DuplicatePolicy::PreferValid).unwrap_err();
        assert!(matches!(err, Error::MissingColumn { .. }));
    }

    #[test]
    fn test_split_bio_fields_standalone() {
        let table = parse_csv_str(
            "PlayerName,PlayerUID,PlayerHeightWeight,PlayerDraftInfo\n\
             A,1,\"6' 2\"\", 250 lbs\",Undrafted\n\
             B,2,N/A,Signed (KC)\n",
            "bio.csv",
        )
        .unwrap();

        let (out, stats) = split_bio_fields(&table);
        assert_eq!(
            out.column_names(),
            vec![
                "PlayerName",
                "PlayerUID",
                "PlayerHeightInches",
                "PlayerWeightLBS",
                "DraftYear",
                "DraftPosition",
                "DraftOrganization",
            ]
        );
        assert_eq!(out.rows[0].cells[2], CellValue::Integer(74));
        assert_eq!(out.rows[0].cells[6], CellValue::text("Undrafted"));
        assert_eq!(out.rows[1].cells[2], CellValue::Empty);
        assert_eq!(out.rows[1].cells[4], CellValue::text("Signed"));
        assert_eq!(out.rows[1].cells[6], CellValue::text("KC"));
        // N/A marks a missing value, not a malformed one
        assert_eq!(stats.unparsed_heights, 0);
        assert_eq!(stats.unparsed_draft_info, 0);
    }

    #[test]
    fn test_split_bio_fields_counts_only_malformed_parts() {
        let table = parse_csv_str(
            r#"PlayerUID,PlayerHeightWeight
             1,6'
             2,"6' 1"", heavy"
             3,tall
             4,"abc, 220 lbs"
"#,
            "bio.csv",
        )
        .unwrap();

        let (out, stats) = split_bio_fields(&table);
        assert_eq!(out.rows[0].cells[1], CellValue::Integer(72));
        assert_eq!(out.rows[0].cells[2], CellValue::Empty);
        assert_eq!(out.rows[3].cells[2], CellValue::Integer(220));
        // Rows 3 and 4 have unreadable heights; row 2 has an unreadable weight
        assert_eq!(stats.unparsed_heights, 2);
        assert_eq!(stats.unparsed_weights, 1);
    }

    #[test]
    fn test_shared_identity_columns_keep_depth_chart_value() {
        let depth = parse_csv_str(
            "PlayerUID,PlayerName,TeamName,PlayerURL
001,Josh Allen,Bills,http://depth/001
",
            "depth.csv",
        )
        .unwrap();
        let analysis = parse_csv_str(
            "PlayerUID,PlayerName,TeamName,InferredRace,PlayerURL
001,J. Allen,BUF,white,http://bio/001
",
            "analysis.csv",
        )
        .unwrap();

        let outcome = merge_tables(&depth, &analysis, DuplicatePolicy::PreferValid).unwrap();
        let t = &outcome.table;
        assert_eq!(cell(t, 0, "PlayerName"), &CellValue::text("Josh Allen"));
        assert_eq!(cell(t, 0, "TeamName"), &CellValue::text("Bills"));
        assert_eq!(cell(t, 0, "InferredRace"), &CellValue::text("white"));
        assert_eq!(cell(t, 0, "PlayerURL"), &CellValue::text("http://bio/001"));
        assert_eq!(
            t.columns.iter().filter(|c| c.name == "PlayerName").count(),
            1
        );
    }

    #[test]
    fn test_split_bio_fields_keeps_existing_derived_columns() {
        let table = parse_csv_str("PlayerUID,PlayerHeightInches\n1,74\n", "done.csv").unwrap();

        let (out, _) = split_bio_fields(&table);
        assert_eq!(out.rows[0].cells[1], CellValue::text("74"));
        assert_eq!(out.column_count(), 6);
    }

    #[test]
    fn test_run_merge_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = MergeConfig::in_dir(dir.path());
        std::fs::write(config.depth_chart_path(), DEPTH).unwrap();
        std::fs::write(config.analysis_path(), ANALYSIS).unwrap();

        let report = run_merge(&config).unwrap();
        assert_eq!(report.stats.output_rows, 3);

        let written = parse_csv(config.output_path()).unwrap();
        assert_eq!(written.row_count(), 3);
        assert_eq!(written.rows[0].cells[3], CellValue::text("001"));
    }

    #[test]
    fn test_run_merge_missing_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = MergeConfig::in_dir(dir.path());
        std::fs::write(config.depth_chart_path(), DEPTH).unwrap();

        let err = run_merge(&config).unwrap_err();
        assert!(matches!(err, Error::MissingInput { role: "analysis results", .. }));
        assert!(!config.output_path().exists());

        // Supplying the file lets the same run succeed
        std::fs::write(config.analysis_path(), ANALYSIS).unwrap();
        run_merge(&config).unwrap();
        assert!(config.output_path().exists());
    }

    #[test]
    fn test_run_merge_missing_depth_chart_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = MergeConfig::in_dir(dir.path());
        std::fs::write(config.analysis_path(), ANALYSIS).unwrap();

        let err = run_merge(&config).unwrap_err();
        assert!(matches!(err, Error::MissingInput { role: "depth chart", .. }));
        assert!(err.to_string().starts_with("depth chart file"));
        assert!(!config.output_path().exists());
    }

    #[test]
    fn test_run_merge_structural_failure_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = MergeConfig::in_dir(dir.path());
        std::fs::write(config.depth_chart_path(), "PlayerName\nA\n").unwrap();
        std::fs::write(config.analysis_path(), ANALYSIS).unwrap();

        assert!(run_merge(&config).is_err());
        assert!(!config.output_path().exists());
    }

    #[test]
    fn test_run_merge_refuses_to_overwrite_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = MergeConfig::in_dir(dir.path());
        config.output_file = config.depth_chart_file.clone();
        std::fs::write(config.depth_chart_path(), DEPTH).unwrap();
        std::fs::write(config.analysis_path(), ANALYSIS).unwrap();

        let err = run_merge(&config).unwrap_err();
        assert!(matches!(err, Error::OutputIsInput { .. }));
        assert_eq!(std::fs::read_to_string(config.depth_chart_path()).unwrap(), DEPTH);
    }
}
