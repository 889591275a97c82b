//! Height and weight extraction from scraped bio strings
//!
//! Bio pages report size as one combined field, e.g. `6' 5", 237 lbs`.
//! Every helper here returns `None` rather than failing: one bad row must not
//! abort a run.

use crate::table::CellValue;
use once_cell::sync::Lazy;
use regex::Regex;

static HEIGHT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)'\s*(\d+)?").unwrap());
static WEIGHT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*lbs").unwrap());

/// Marker the scraper writes when a value was unavailable
pub const NOT_AVAILABLE: &str = "N/A";

/// Convert a height such as `6' 8"`, `6'8` or `6'` to total inches
pub fn parse_height_inches(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.contains(NOT_AVAILABLE) {
        return None;
    }

    let cleaned = trimmed.replace('"', "");
    let caps = HEIGHT_PATTERN.captures(&cleaned)?;

    let feet: i64 = caps[1].parse().ok()?;
    let inches: i64 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };

    feet.checked_mul(12)?.checked_add(inches)
}

/// Extract a weight in pounds from `237 lbs`, `237lbs` or a bare `237`
pub fn parse_weight_lbs(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Some(caps) = WEIGHT_PATTERN.captures(trimmed) {
        return caps[1].parse().ok();
    }
    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return trimmed.parse().ok();
    }
    None
}

/// Height and weight decoded from one combined field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeightWeight {
    pub height_inches: Option<i64>,
    pub weight_lbs: Option<i64>,
}

impl HeightWeight {
    /// Decode a cell; anything other than text yields no values
    pub fn from_cell(cell: &CellValue) -> Self {
        cell.as_text().map_or_else(Self::default, split_height_weight)
    }
}

/// Locate the height and weight fragments of a combined field
///
/// Returns `None` for an empty value or an `N/A` marker. A lone fragment
/// counts as a height when it carries a foot or inch mark and as a weight
/// when it mentions `lbs`; any other shape yields two empty fragments.
pub fn height_weight_fragments(raw: &str) -> Option<(&str, &str)> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.contains(NOT_AVAILABLE) {
        return None;
    }

    let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
    let fragments = match parts.as_slice() {
        [height, weight] => (*height, *weight),
        [single] if single.contains('\'') || single.contains('"') => (*single, ""),
        [single] if single.contains("lbs") => ("", *single),
        _ => ("", ""),
    };
    Some(fragments)
}

/// Split a combined `height, weight` field into its parts
pub fn split_height_weight(raw: &str) -> HeightWeight {
    match height_weight_fragments(raw) {
        Some((height_raw, weight_raw)) => HeightWeight {
            height_inches: parse_height_inches(height_raw),
            weight_lbs: parse_weight_lbs(weight_raw),
        },
        None => HeightWeight::default(),
    }
}
