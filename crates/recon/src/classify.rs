use std::collections::BTreeSet;

use titlemap_core::Cell;

use crate::matcher::Resolution;
use crate::model::{Classification, MatchReport, StatementRecord, TitlePair};
use crate::normalize::TitleNormalizer;

/// Classify resolved statement rows.
///
/// - primary hit → `MappedViaPrimary`
/// - primary miss, master hit → `MappedSameAsTitle` when the identifier
///   normalizes back to the title, `MappedViaMaster` otherwise
/// - miss in both, non-empty title → `UnmatchedOverall`
/// - miss in both, empty title → `UnmatchedByPrimary`
///
/// Tier results depend only on the normalized title, so a title that misses
/// both catalogs on one row misses them on every row and is never also part
/// of a pair.
pub fn classify_records(
    rows: Vec<(Cell, Resolution)>,
    normalizer: &TitleNormalizer,
) -> Vec<StatementRecord> {
    rows.into_iter()
        .map(|(raw_title, res)| {
            let classification = if res.primary_hit() {
                Classification::MappedViaPrimary
            } else if res.master_hit_only() {
                if normalizer.normalize_str(&res.tier2) == res.normalized_title {
                    Classification::MappedSameAsTitle
                } else {
                    Classification::MappedViaMaster
                }
            } else if res.normalized_title.is_empty() {
                Classification::UnmatchedByPrimary
            } else {
                Classification::UnmatchedOverall
            };
            StatementRecord {
                raw_title,
                normalized_title: res.normalized_title,
                tier1_result: res.tier1,
                tier2_result: res.tier2,
                classification,
            }
        })
        .collect()
}

/// Distinct pairs per class and the unmatched title list, each sorted by
/// title.
pub fn build_report(records: &[StatementRecord]) -> MatchReport {
    let mut distinct: BTreeSet<TitlePair> = BTreeSet::new();
    let mut same: BTreeSet<TitlePair> = BTreeSet::new();
    let mut unmatched: BTreeSet<String> = BTreeSet::new();

    for r in records {
        match r.classification {
            Classification::MappedViaMaster => {
                distinct.insert(TitlePair {
                    title: r.normalized_title.clone(),
                    identifier: r.tier2_result.clone(),
                });
            }
            Classification::MappedSameAsTitle => {
                same.insert(TitlePair {
                    title: r.normalized_title.clone(),
                    identifier: r.tier2_result.clone(),
                });
            }
            Classification::UnmatchedOverall => {
                unmatched.insert(r.normalized_title.clone());
            }
            Classification::MappedViaPrimary | Classification::UnmatchedByPrimary => {}
        }
    }

    MatchReport {
        distinct_pairs: distinct.into_iter().collect(),
        same_as_title_pairs: same.into_iter().collect(),
        unmatched_titles: unmatched.into_iter().collect(),
    }
}

/// Report lists stretched to exactly one entry per statement row.
#[derive(Debug, Clone, PartialEq)]
pub struct PaddedReport {
    pub distinct_pairs: Vec<TitlePair>,
    pub same_as_title_pairs: Vec<TitlePair>,
    pub unmatched_titles: Vec<String>,
}

impl MatchReport {
    pub fn padded(&self, rows: usize) -> PaddedReport {
        PaddedReport {
            distinct_pairs: pad(&self.distinct_pairs, rows),
            same_as_title_pairs: pad(&self.same_as_title_pairs, rows),
            unmatched_titles: pad(&self.unmatched_titles, rows),
        }
    }
}

/// Pad with defaults (or truncate) to `len` entries.
pub fn pad<T: Clone + Default>(items: &[T], len: usize) -> Vec<T> {
    let mut out: Vec<T> = items.iter().take(len).cloned().collect();
    out.resize(len, T::default());
    out
}
