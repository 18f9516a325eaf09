use titlemap_core::{Cell, Table};
use titlemap_recon::assemble::{FINAL_RESULT, PAIR_IDENTIFIER, PAIR_TITLE, TIER1_RESULT, UNMATCHED_TITLE};
use titlemap_recon::config::{DuplicatePolicy, ReconConfig};
use titlemap_recon::model::{Classification, DatasetRole, ReconInput, TitlePair};
use titlemap_recon::{run, ReconError};

fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
    let mut t = Table::new(headers.iter().map(|h| h.to_string()).collect());
    for r in rows {
        t.push_row(r.iter().map(|c| Cell::from(*c)).collect());
    }
    t
}

fn scenario_input() -> ReconInput {
    ReconInput {
        channel: Some(table(&["콘텐츠명", "판매채널콘텐츠ID"], &[&["Alpha 제1권", "CH-001"]])),
        statement: vec![table(&["상품명", "금액"], &[&["Alpha(완결)", "1200"], &["Unknown Title", "800"]])],
        master: Some(table(&["콘텐츠명", "콘텐츠ID"], &[&["UnknownTitle", "MC-999"]])),
    }
}

// -------------------------------------------------------------------------
// End-to-end
// -------------------------------------------------------------------------

#[test]
fn primary_hit_and_master_fallback() {
    let result = run(&ReconConfig::default(), &scenario_input()).unwrap();

    let alpha = &result.records[0];
    assert_eq!(alpha.normalized_title, "Alpha");
    assert_eq!(alpha.tier1_result, "CH-001");
    assert_eq!(alpha.tier2_result, "CH-001");
    assert_eq!(alpha.classification, Classification::MappedViaPrimary);

    let unknown = &result.records[1];
    assert_eq!(unknown.normalized_title, "UnknownTitle");
    assert_eq!(unknown.tier1_result, "UnknownTitle");
    assert_eq!(unknown.final_identifier(), "MC-999");
    assert_eq!(unknown.classification, Classification::MappedViaMaster);

    assert_eq!(
        result.report.distinct_pairs,
        vec![TitlePair { title: "UnknownTitle".into(), identifier: "MC-999".into() }]
    );
    assert!(result.report.same_as_title_pairs.is_empty());
    assert!(result.report.unmatched_titles.is_empty());

    assert_eq!(result.meta.columns.statement_title, "상품명");
    assert_eq!(result.meta.columns.master_identifier, "콘텐츠ID");
    assert_eq!(result.summary.statement_rows, 2);
    assert_eq!(result.summary.classification_counts[&Classification::MappedViaMaster], 1);
    assert_eq!(result.summary.classification_counts[&Classification::UnmatchedOverall], 0);
}

#[test]
fn output_table_has_one_row_per_statement_row() {
    let result = run(&ReconConfig::default(), &scenario_input()).unwrap();
    let t = &result.table;

    assert_eq!(t.len(), 2);
    assert_eq!(&t.headers()[..3], &["file1_콘텐츠명", "file1_정제_콘텐츠명", "file1_판매채널콘텐츠ID"]);

    let final_idx = t.column_index(FINAL_RESULT).unwrap();
    assert_eq!(t.column_index(PAIR_TITLE), Some(final_idx + 1));
    assert_eq!(t.column_index(PAIR_IDENTIFIER), Some(final_idx + 2));

    assert_eq!(t.cell(0, final_idx), Some(&Cell::from("CH-001")));
    assert_eq!(t.cell(1, final_idx), Some(&Cell::from("MC-999")));
    assert_eq!(t.cell(0, final_idx + 1), Some(&Cell::from("UnknownTitle")));
    assert_eq!(t.cell(1, final_idx + 1), Some(&Cell::Empty));

    let tier1 = t.column_index(TIER1_RESULT).unwrap();
    assert_eq!(t.cell(1, tier1), Some(&Cell::from("UnknownTitle")));

    // Original statement columns survive between audit and result columns.
    assert!(t.column_index("금액").unwrap() < t.column_index(TIER1_RESULT).unwrap());
}

#[test]
fn statement_sheets_are_concatenated() {
    let mut input = scenario_input();
    input.statement.push(table(
        &["이용상품명", "상품명"],
        &[&["ignored", "Lost Book 3권"], &["ignored", "Alpha 제9화"]],
    ));

    let result = run(&ReconConfig::default(), &input).unwrap();
    assert_eq!(result.records.len(), 4);
    assert_eq!(result.table.len(), 4);
    assert_eq!(result.records[2].classification, Classification::UnmatchedOverall);
    assert_eq!(result.records[3].tier1_result, "CH-001");
    assert_eq!(result.report.unmatched_titles, vec!["LostBook"]);

    let unmatched = result.table.column_index(UNMATCHED_TITLE).unwrap();
    assert_eq!(result.table.cell(0, unmatched), Some(&Cell::from("LostBook")));
    assert_eq!(result.table.cell(3, unmatched), Some(&Cell::Empty));
}

#[test]
fn date_titles_match_month_day_form() {
    let mut input = scenario_input();
    let mut stmt = Table::new(vec!["상품명".into()]);
    stmt.push_row(vec![Cell::Date(chrono::NaiveDate::from_ymd_opt(2023, 5, 1).unwrap())]);
    input.statement = vec![stmt];
    input.master = Some(table(&["콘텐츠명", "ID"], &[&["5월1일", "MC-501"]]));

    let result = run(&ReconConfig::default(), &input).unwrap();
    assert_eq!(result.records[0].normalized_title, "5월1일");
    assert_eq!(result.records[0].final_identifier(), "MC-501");
}

#[test]
fn both_misses_keep_normalized_title() {
    let mut input = scenario_input();
    input.statement = vec![table(&["Title"], &[&["Nowhere 2권"], &["(세트)"]])];

    let result = run(&ReconConfig::default(), &input).unwrap();
    assert_eq!(result.records[0].final_identifier(), "Nowhere");
    assert_eq!(result.records[0].classification, Classification::UnmatchedOverall);
    // Titles that normalize to nothing are never reported as unmatched.
    assert_eq!(result.records[1].normalized_title, "");
    assert_eq!(result.records[1].classification, Classification::UnmatchedByPrimary);
    assert_eq!(result.report.unmatched_titles, vec!["Nowhere"]);
}

#[test]
fn empty_keys_and_blank_identifiers_take_part_in_lookup() {
    let mut input = scenario_input();
    input.channel = Some(table(
        &["콘텐츠명", "판매채널콘텐츠ID"],
        &[&["(완결)", "CH-EMPTY"], &["Alpha 1권", ""], &["Alpha 2권", "CH-002"]],
    ));
    input.statement = vec![table(&["상품명"], &[&["12345"], &["Alpha(완결)"]])];

    let result = run(&ReconConfig::default(), &input).unwrap();

    let empty = &result.records[0];
    assert_eq!(empty.normalized_title, "");
    assert_eq!(empty.tier1_result, "CH-EMPTY");
    assert_eq!(empty.classification, Classification::MappedViaPrimary);

    // The first row for "Alpha" wins even though its identifier is blank.
    let alpha = &result.records[1];
    assert_eq!(alpha.tier1_result, "");
    assert_eq!(alpha.final_identifier(), "");
    assert_eq!(alpha.classification, Classification::MappedViaPrimary);

    assert!(result.report.unmatched_titles.is_empty());
    assert_eq!(result.summary.channel_conflicts, 1);
}

// -------------------------------------------------------------------------
// Errors
// -------------------------------------------------------------------------

#[test]
fn missing_dataset_aborts() {
    let mut input = scenario_input();
    input.master = None;
    let err = run(&ReconConfig::default(), &input).unwrap_err();
    assert!(matches!(err, ReconError::InputMissing { role: DatasetRole::Master }));

    let mut input = scenario_input();
    input.statement.clear();
    let err = run(&ReconConfig::default(), &input).unwrap_err();
    assert!(matches!(err, ReconError::InputMissing { role: DatasetRole::Statement }));
}

#[test]
fn missing_title_column_aborts() {
    let mut input = scenario_input();
    input.statement = vec![table(&["품목", "금액"], &[&["Alpha", "1"]])];
    let err = run(&ReconConfig::default(), &input).unwrap_err();
    match err {
        ReconError::ColumnNotFound { role, candidates } => {
            assert_eq!(role, DatasetRole::Statement);
            assert_eq!(candidates.first().map(String::as_str), Some("컨텐츠"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_master_identifier_aborts() {
    let mut input = scenario_input();
    input.master = Some(table(&["콘텐츠명", "코드"], &[&["UnknownTitle", "MC-999"]]));
    let err = run(&ReconConfig::default(), &input).unwrap_err();
    assert!(matches!(err, ReconError::ColumnNotFound { role: DatasetRole::Master, .. }));
}

// -------------------------------------------------------------------------
// Duplicate policy
// -------------------------------------------------------------------------

fn duplicate_input() -> ReconInput {
    let mut input = scenario_input();
    input.channel = Some(table(
        &["콘텐츠명", "판매채널콘텐츠ID"],
        &[&["Alpha 제1권", "CH-001"], &["Alpha 제2권", "CH-002"]],
    ));
    input
}

#[test]
fn duplicate_keys_first_seen_by_default() {
    let result = run(&ReconConfig::default(), &duplicate_input()).unwrap();
    assert_eq!(result.records[0].tier1_result, "CH-001");
    assert_eq!(result.summary.channel_conflicts, 1);
}

#[test]
fn duplicate_keys_last_seen() {
    let mut config = ReconConfig::default();
    config.matching.duplicates = DuplicatePolicy::LastSeen;
    let result = run(&config, &duplicate_input()).unwrap();
    assert_eq!(result.records[0].tier1_result, "CH-002");
}

#[test]
fn duplicate_keys_rejected() {
    let config = ReconConfig::from_toml("[matching]\nduplicates = \"reject\"\n").unwrap();
    let err = run(&config, &duplicate_input()).unwrap_err();
    assert!(matches!(err, ReconError::DuplicateKey { role: DatasetRole::Channel, .. }));
}

// -------------------------------------------------------------------------
// Result JSON
// -------------------------------------------------------------------------

#[test]
fn result_serializes_meta_summary_and_report() {
    let result = run(&ReconConfig::default(), &scenario_input()).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["meta"]["config_name"], "title-mapping");
    assert_eq!(json["summary"]["statement_rows"], 2);
    assert_eq!(json["summary"]["classification_counts"]["mapped_via_master"], 1);
    assert_eq!(json["report"]["distinct_pairs"][0]["identifier"], "MC-999");
    assert!(json.get("table").is_none());
}
