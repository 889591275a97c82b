//! Draft info decomposition
//!
//! Turns strings like `2018: Rd 1, Pk 7 (BUF)` into year, slot and team.

use crate::bio::NOT_AVAILABLE;
use crate::table::CellValue;
use once_cell::sync::Lazy;
use regex::Regex;

static DRAFTED_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4}): Rd (\d+), Pk (\d+) \((.+)\)").unwrap());
static PAREN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^)]+)\)").unwrap());

/// Sentinel written to all three draft fields for undrafted players
pub const UNDRAFTED: &str = "Undrafted";
/// Sentinel written to year and position for signed free agents
pub const SIGNED: &str = "Signed";

/// Outcome of parsing a draft info string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftInfo {
    /// Canonical `YYYY: Rd R, Pk P (ORG)` form
    Drafted {
        year: i64,
        round: String,
        pick: String,
        organization: String,
    },
    /// Mentions `Undrafted`
    Undrafted,
    /// Mentions `Signed`, optionally with a team in parentheses
    Signed { organization: Option<String> },
    /// Missing, `N/A`, or not recognised
    Unknown,
}

impl DraftInfo {
    /// Parse a free-text draft description; never fails
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.contains(NOT_AVAILABLE) {
            return DraftInfo::Unknown;
        }

        if let Some(caps) = DRAFTED_PATTERN.captures(trimmed) {
            if let Ok(year) = caps[1].parse() {
                return DraftInfo::Drafted {
                    year,
                    round: caps[2].to_string(),
                    pick: caps[3].to_string(),
                    organization: caps[4].to_string(),
                };
            }
            return DraftInfo::Unknown;
        }

        if trimmed.contains(UNDRAFTED) {
            return DraftInfo::Undrafted;
        }

        if trimmed.contains(SIGNED) {
            let organization = PAREN_PATTERN
                .captures(trimmed)
                .map(|caps| caps[1].to_string());
            return DraftInfo::Signed { organization };
        }

        DraftInfo::Unknown
    }

    /// Parse a cell; anything other than text is `Unknown`
    pub fn from_cell(cell: &CellValue) -> Self {
        cell.as_text().map_or(DraftInfo::Unknown, DraftInfo::parse)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, DraftInfo::Unknown)
    }

    /// Draft year, or the sentinel tag for undrafted/signed players
    pub fn year(&self) -> CellValue {
        match self {
            DraftInfo::Drafted { year, .. } => CellValue::Integer(*year),
            DraftInfo::Undrafted => CellValue::text(UNDRAFTED),
            DraftInfo::Signed { .. } => CellValue::text(SIGNED),
            DraftInfo::Unknown => CellValue::Empty,
        }
    }

    /// Draft slot formatted as `Rd R, Pk P`
    pub fn position(&self) -> CellValue {
        match self {
            DraftInfo::Drafted { round, pick, .. } => {
                CellValue::Text(format!("Rd {}, Pk {}", round, pick))
            }
            DraftInfo::Undrafted => CellValue::text(UNDRAFTED),
            DraftInfo::Signed { .. } => CellValue::text(SIGNED),
            DraftInfo::Unknown => CellValue::Empty,
        }
    }

    /// Drafting or signing organization
    pub fn organization(&self) -> CellValue {
        match self {
            DraftInfo::Drafted { organization, .. } => CellValue::text(organization.as_str()),
            DraftInfo::Undrafted => CellValue::text(UNDRAFTED),
            DraftInfo::Signed { organization } => CellValue::from(organization.clone()),
            DraftInfo::Unknown => CellValue::Empty,
        }
    }

    /// `(year, position, organization)` as output cells
    pub fn to_cells(&self) -> [CellValue; 3] {
        [self.year(), self.position(), self.organization()]
    }
}
