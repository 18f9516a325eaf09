use std::collections::BTreeMap;

use titlemap_core::{Cell, Table};

use crate::assemble::assemble;
use crate::classify::{build_report, classify_records};
use crate::columns::resolve_in;
use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::matcher::{LookupMap, MultiStageMatcher};
use crate::model::{
    CatalogRecord, Classification, DatasetRole, ReconColumns, ReconInput, ReconMeta, ReconResult,
    ReconSummary, TitleValue,
};
use crate::normalize::TitleNormalizer;

/// Run the full pipeline. Either returns a complete result or the first
/// error; there is no partial output.
pub fn run(config: &ReconConfig, input: &ReconInput) -> Result<ReconResult, ReconError> {
    let channel = input
        .channel
        .as_ref()
        .ok_or(ReconError::InputMissing { role: DatasetRole::Channel })?;
    if input.statement.is_empty() {
        return Err(ReconError::InputMissing { role: DatasetRole::Statement });
    }
    let master = input
        .master
        .as_ref()
        .ok_or(ReconError::InputMissing { role: DatasetRole::Master })?;

    let statement = Table::concat(&input.statement);
    log::info!(
        "statement: {} row(s) from {} sub-table(s)",
        statement.len(),
        input.statement.len()
    );

    // Resolve every column before doing any work.
    let cols = &config.columns;
    let (channel_title, channel_title_idx) = resolve_in(DatasetRole::Channel, &cols.channel.title, channel)?;
    let (channel_id, channel_id_idx) = resolve_in(DatasetRole::Channel, &cols.channel.identifier, channel)?;
    let (statement_title, statement_title_idx) =
        resolve_in(DatasetRole::Statement, &cols.statement.title, &statement)?;
    let (master_title, master_title_idx) = resolve_in(DatasetRole::Master, &cols.master.title, master)?;
    let (master_id, master_id_idx) = resolve_in(DatasetRole::Master, &cols.master.identifier, master)?;
    log::debug!(
        "columns: channel=({channel_title}, {channel_id}) statement={statement_title} master=({master_title}, {master_id})"
    );

    let normalizer = TitleNormalizer::new(config.matching.keyword_order);

    let channel_records = catalog_records(channel, channel_title_idx, channel_id_idx, &normalizer);
    let master_records = catalog_records(master, master_title_idx, master_id_idx, &normalizer);

    let policy = config.matching.duplicates;
    let primary = LookupMap::build(DatasetRole::Channel, &channel_records, policy)?;
    let fallback = LookupMap::build(DatasetRole::Master, &master_records, policy)?;
    log::info!("lookup keys: channel={} master={}", primary.len(), fallback.len());

    let matcher = MultiStageMatcher::new(&normalizer, primary, fallback);

    let resolutions: Vec<(Cell, _)> = statement
        .rows()
        .iter()
        .map(|row| {
            let raw = row[statement_title_idx].clone();
            let res = matcher.resolve(&raw);
            (raw, res)
        })
        .collect();

    let records = classify_records(resolutions, &normalizer);
    let report = build_report(&records);
    let table = assemble(&statement, &records, &channel_records, &report);

    let mut classification_counts: BTreeMap<Classification, usize> =
        Classification::ALL.iter().map(|c| (*c, 0)).collect();
    for r in &records {
        *classification_counts.entry(r.classification).or_insert(0) += 1;
    }

    let summary = ReconSummary {
        statement_rows: records.len(),
        channel_keys: matcher.primary().len(),
        master_keys: matcher.master().len(),
        channel_conflicts: matcher.primary().conflicts(),
        master_conflicts: matcher.master().conflicts(),
        distinct_pairs: report.distinct_pairs.len(),
        same_as_title_pairs: report.same_as_title_pairs.len(),
        unmatched_titles: report.unmatched_titles.len(),
        classification_counts,
    };
    log::info!(
        "resolved {} row(s): {} distinct pair(s), {} same-as-title pair(s), {} unmatched title(s)",
        summary.statement_rows,
        summary.distinct_pairs,
        summary.same_as_title_pairs,
        summary.unmatched_titles
    );

    Ok(ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            columns: ReconColumns {
                channel_title,
                channel_identifier: channel_id,
                statement_title,
                master_title,
                master_identifier: master_id,
            },
        },
        summary,
        report,
        records,
        table,
    })
}

/// Extract `(raw title, normalized title, identifier)` per catalog row.
pub fn catalog_records(
    table: &Table,
    title_idx: usize,
    id_idx: usize,
    normalizer: &TitleNormalizer,
) -> Vec<CatalogRecord> {
    table
        .rows()
        .iter()
        .map(|row| {
            let raw_title = row[title_idx].clone();
            let id_cell = &row[id_idx];
            CatalogRecord {
                normalized_title: normalizer.normalize(&TitleValue::from(&raw_title)),
                identifier: if id_cell.is_empty() { String::new() } else { id_cell.to_string() },
                raw_title,
            }
        })
        .collect()
}
