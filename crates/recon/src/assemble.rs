//! Output table layout.
//!
//! ```text
//! | channel audit (3) | statement columns ... | normalized | class | tier1 | final |
//! | pair title | pair id | same title | same id | unmatched |
//! ```

use titlemap_core::{Cell, Table};

use crate::model::{CatalogRecord, MatchReport, StatementRecord};

pub const CHANNEL_RAW_TITLE: &str = "file1_콘텐츠명";
pub const CHANNEL_NORMALIZED_TITLE: &str = "file1_정제_콘텐츠명";
pub const CHANNEL_IDENTIFIER: &str = "file1_판매채널콘텐츠ID";
pub const NORMALIZED_TITLE: &str = "정제_상품명";
pub const CLASSIFICATION: &str = "분류";
pub const TIER1_RESULT: &str = "매핑결과";
pub const FINAL_RESULT: &str = "최종_매핑결과";
pub const PAIR_TITLE: &str = "매핑쌍_상품명";
pub const PAIR_IDENTIFIER: &str = "매핑쌍_ID";
pub const SAME_TITLE: &str = "동일명_상품명";
pub const SAME_IDENTIFIER: &str = "동일명_ID";
pub const UNMATCHED_TITLE: &str = "최종_정렬된_매핑되지않은_상품명";

const AUDIT_COLUMNS: [&str; 3] = [CHANNEL_RAW_TITLE, CHANNEL_NORMALIZED_TITLE, CHANNEL_IDENTIFIER];

const RESULT_COLUMNS: [&str; 9] = [
    NORMALIZED_TITLE,
    CLASSIFICATION,
    TIER1_RESULT,
    FINAL_RESULT,
    PAIR_TITLE,
    PAIR_IDENTIFIER,
    SAME_TITLE,
    SAME_IDENTIFIER,
    UNMATCHED_TITLE,
];

fn is_generated(name: &str) -> bool {
    AUDIT_COLUMNS.contains(&name) || RESULT_COLUMNS.contains(&name)
}

/// Merge statement rows, their resolutions, the channel audit columns and
/// the padded report lists into one table with one row per statement row.
///
/// `statement` and `records` must be in the same row order.
pub fn assemble(
    statement: &Table,
    records: &[StatementRecord],
    channel: &[CatalogRecord],
    report: &MatchReport,
) -> Table {
    let rows = statement.len();
    debug_assert_eq!(rows, records.len());

    let kept: Vec<usize> = statement
        .headers()
        .iter()
        .enumerate()
        .filter(|(_, h)| !is_generated(h))
        .map(|(i, _)| i)
        .collect();

    let mut headers: Vec<String> = AUDIT_COLUMNS.iter().map(|s| s.to_string()).collect();
    headers.extend(kept.iter().map(|&i| statement.headers()[i].clone()));
    headers.extend(RESULT_COLUMNS.iter().map(|s| s.to_string()));

    if channel.len() > rows {
        log::warn!(
            "channel catalog has {} rows but the statement only {}; audit columns keep the first {}",
            channel.len(),
            rows,
            rows
        );
    }

    let padded = report.padded(rows);
    let mut out = Table::new(headers);

    for (i, (source, record)) in statement.rows().iter().zip(records).enumerate() {
        let mut row: Vec<Cell> = Vec::with_capacity(out.width());

        match channel.get(i) {
            Some(c) => {
                row.push(c.raw_title.clone());
                row.push(Cell::text(c.normalized_title.as_str()));
                row.push(Cell::text(c.identifier.as_str()));
            }
            None => row.extend([Cell::Empty, Cell::Empty, Cell::Empty]),
        }

        row.extend(kept.iter().map(|&col| source[col].clone()));

        let pair = &padded.distinct_pairs[i];
        let same = &padded.same_as_title_pairs[i];
        row.extend([
            Cell::text(record.normalized_title.as_str()),
            Cell::text(record.classification.label()),
            Cell::text(record.tier1_result.as_str()),
            Cell::text(record.tier2_result.as_str()),
            Cell::text(pair.title.as_str()),
            Cell::text(pair.identifier.as_str()),
            Cell::text(same.title.as_str()),
            Cell::text(same.identifier.as_str()),
            Cell::text(padded.unmatched_titles[i].as_str()),
        ]);

        out.push_row(row);
    }

    out
}
