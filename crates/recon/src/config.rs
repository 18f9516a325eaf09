use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Built-in candidate lists
// ---------------------------------------------------------------------------

pub const CHANNEL_TITLE_CANDIDATES: &[&str] = &["콘텐츠명", "콘텐츠 제목", "Title", "ContentName", "제목"];

pub const CHANNEL_ID_CANDIDATES: &[&str] = &["판매채널콘텐츠ID", "콘텐츠ID", "ID", "ContentID"];

pub const STATEMENT_TITLE_CANDIDATES: &[&str] = &[
    "컨텐츠",
    "타이틀",
    "작품명",
    "도서명",
    "작품 제목",
    "상품명",
    "이용상품명",
    "상품 제목",
    "ProductName",
    "Title",
    "제목",
];

pub const MASTER_TITLE_CANDIDATES: &[&str] = &["콘텐츠명", "콘텐츠 제목", "Title", "ContentName", "제목"];

pub const MASTER_ID_CANDIDATES: &[&str] = &["판매채널콘텐츠ID", "콘텐츠ID", "ID", "ContentID"];

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub columns: ColumnConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
}

fn default_name() -> String {
    "title-mapping".into()
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            columns: ColumnConfig::default(),
            matching: MatchingConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Column candidates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogColumns {
    pub title: Vec<String>,
    pub identifier: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatementColumns {
    pub title: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnConfig {
    pub channel: CatalogColumns,
    pub statement: StatementColumns,
    pub master: CatalogColumns,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            channel: CatalogColumns {
                title: owned(CHANNEL_TITLE_CANDIDATES),
                identifier: owned(CHANNEL_ID_CANDIDATES),
            },
            statement: StatementColumns {
                title: owned(STATEMENT_TITLE_CANDIDATES),
            },
            master: CatalogColumns {
                title: owned(MASTER_TITLE_CANDIDATES),
                identifier: owned(MASTER_ID_CANDIDATES),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Which identifier a lookup map keeps when several catalog rows normalize
/// to the same title.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    #[default]
    FirstSeen,
    LastSeen,
    /// Fail the run when the same key carries two different identifiers.
    Reject,
}

/// Order in which edition keywords are stripped from titles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordOrder {
    /// Longer keywords first, so a keyword never leaves fragments of a
    /// longer one containing it.
    #[default]
    LongestFirst,
    /// The historical list order.
    Listed,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchingConfig {
    pub duplicates: DuplicatePolicy,
    pub keyword_order: KeywordOrder,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let lists = [
            ("columns.channel.title", &self.columns.channel.title),
            ("columns.channel.identifier", &self.columns.channel.identifier),
            ("columns.statement.title", &self.columns.statement.title),
            ("columns.master.title", &self.columns.master.title),
            ("columns.master.identifier", &self.columns.master.identifier),
        ];

        for (field, list) in lists {
            if list.is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "{field} must list at least one column name"
                )));
            }
            if let Some(blank) = list.iter().position(|c| c.trim().is_empty()) {
                return Err(ReconError::ConfigValidation(format!(
                    "{field}[{blank}] is blank"
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
