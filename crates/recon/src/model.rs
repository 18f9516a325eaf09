use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use titlemap_core::{Cell, Table};

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// The three datasets a run consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetRole {
    Channel,
    Statement,
    Master,
}

impl fmt::Display for DatasetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Channel => write!(f, "channel catalog"),
            Self::Statement => write!(f, "statement"),
            Self::Master => write!(f, "master catalog"),
        }
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A title cell, tagged at ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleValue {
    Text(String),
    Date(NaiveDate),
}

impl TitleValue {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn date(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self::Date)
    }
}

impl From<&Cell> for TitleValue {
    /// Date cells keep their tag; every other cell coerces to its text form.
    fn from(cell: &Cell) -> Self {
        match cell {
            Cell::Date(d) => TitleValue::Date(*d),
            other => TitleValue::Text(other.to_string()),
        }
    }
}

impl fmt::Display for TitleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Date(d) => write!(f, "{}월{}일", d.month(), d.day()),
        }
    }
}

/// Pre-loaded datasets. The statement may arrive as several sub-tables
/// (sheets or files); they are concatenated before matching.
#[derive(Debug, Default)]
pub struct ReconInput {
    pub channel: Option<Table>,
    pub statement: Vec<Table>,
    pub master: Option<Table>,
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogRecord {
    pub raw_title: Cell,
    pub normalized_title: String,
    pub identifier: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Resolved by the channel catalog.
    MappedViaPrimary,
    /// Title normalized to nothing and no catalog has an empty key. Never reported.
    UnmatchedByPrimary,
    /// Primary miss, master hit with a distinct identifier.
    MappedViaMaster,
    /// Primary miss, master hit whose identifier normalizes to the title itself.
    MappedSameAsTitle,
    /// Missing from both catalogs.
    UnmatchedOverall,
}

impl Classification {
    pub const ALL: [Classification; 5] = [
        Self::MappedViaPrimary,
        Self::UnmatchedByPrimary,
        Self::MappedViaMaster,
        Self::MappedSameAsTitle,
        Self::UnmatchedOverall,
    ];

    /// Label written into the output table.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MappedViaPrimary => "채널매핑",
            Self::UnmatchedByPrimary => "빈상품명미매핑",
            Self::MappedViaMaster => "마스터매핑",
            Self::MappedSameAsTitle => "마스터동일명",
            Self::UnmatchedOverall => "최종미매핑",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MappedViaPrimary => write!(f, "mapped_via_primary"),
            Self::UnmatchedByPrimary => write!(f, "unmatched_by_primary"),
            Self::MappedViaMaster => write!(f, "mapped_via_master"),
            Self::MappedSameAsTitle => write!(f, "mapped_same_as_title"),
            Self::UnmatchedOverall => write!(f, "unmatched_overall"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementRecord {
    pub raw_title: Cell,
    pub normalized_title: String,
    pub tier1_result: String,
    pub tier2_result: String,
    pub classification: Classification,
}

impl StatementRecord {
    /// The resolved identifier (the tier-2 result).
    pub fn final_identifier(&self) -> &str {
        &self.tier2_result
    }
}

// ---------------------------------------------------------------------------
// Report lists
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TitlePair {
    pub title: String,
    pub identifier: String,
}

/// Distinct, sorted report lists derived from the classified records.
/// Not yet padded; see [`MatchReport::padded`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchReport {
    pub distinct_pairs: Vec<TitlePair>,
    pub same_as_title_pairs: Vec<TitlePair>,
    pub unmatched_titles: Vec<String>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ReconSummary {
    pub statement_rows: usize,
    pub channel_keys: usize,
    pub master_keys: usize,
    pub channel_conflicts: usize,
    pub master_conflicts: usize,
    pub distinct_pairs: usize,
    pub same_as_title_pairs: usize,
    pub unmatched_titles: usize,
    pub classification_counts: BTreeMap<Classification, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconColumns {
    pub channel_title: String,
    pub channel_identifier: String,
    pub statement_title: String,
    pub master_title: String,
    pub master_identifier: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
    pub columns: ReconColumns,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub report: MatchReport,
    #[serde(skip)]
    pub records: Vec<StatementRecord>,
    #[serde(skip)]
    pub table: Table,
}
