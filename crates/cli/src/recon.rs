//! `tmap run` / `tmap validate` — title mapping runs and config checks.

use std::path::{Path, PathBuf};

use titlemap_core::Table;
use titlemap_io::{FileFormat, SheetSelection};
use titlemap_recon::model::{Classification, DatasetRole};
use titlemap_recon::{ReconConfig, ReconError, ReconInput, ReconResult};

use crate::CliError;

const CONFIG_DIR: &str = "titlemap";
const CONFIG_FILE: &str = "recon.toml";

pub struct RunArgs {
    pub channel: PathBuf,
    pub statement: Vec<PathBuf>,
    pub master: PathBuf,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub json: bool,
    pub summary: Option<PathBuf>,
}

/// `<config dir>/titlemap/recon.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Explicit path, else the default path when it exists, else built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<ReconConfig, CliError> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match default_config_path().filter(|p| p.is_file()) {
            Some(p) => {
                log::info!("using config {}", p.display());
                p
            }
            None => {
                log::debug!("no config file, using built-in column candidates");
                return Ok(ReconConfig::default());
            }
        },
    };

    let text = std::fs::read_to_string(&path)
        .map_err(|e| CliError::read(format!("cannot read config {}: {e}", path.display())))?;
    ReconConfig::from_toml(&text)
        .map_err(|e| CliError::recon(e).with_hint(format!("in {}", path.display())))
}

fn load_tables(path: &Path, selection: SheetSelection) -> Result<Vec<Table>, CliError> {
    titlemap_io::load(path, selection).map_err(CliError::read)
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    // Reject an unwritable output before doing any work.
    if let Some(ref out) = args.output {
        let format = FileFormat::from_path(out).map_err(CliError::args)?;
        if !format.is_writable() {
            return Err(CliError::args(format!("cannot write .{format} output"))
                .with_hint("use an .xlsx, .csv or .tsv output path"));
        }
    }

    let config = load_config(args.config.as_deref())?;

    let channel = load_tables(&args.channel, SheetSelection::First)?.into_iter().next();
    let mut statement = Vec::new();
    for path in &args.statement {
        statement.extend(load_tables(path, SheetSelection::All)?);
    }
    let master = load_tables(&args.master, SheetSelection::First)?.into_iter().next();

    let input = ReconInput { channel, statement, master };

    let result = titlemap_recon::run(&config, &input).map_err(|e| match e {
        ReconError::ColumnNotFound { role, .. } => {
            let available = available_columns(&input, role);
            CliError::recon(e).with_hint(format!("available columns: {}", available.join(", ")))
        }
        other => CliError::recon(other),
    })?;

    // Table first: nothing else is written when it fails.
    if let Some(ref out) = args.output {
        titlemap_io::save(&result.table, out).map_err(CliError::write)?;
        eprintln!("wrote {}", out.display());
    }

    if args.json || args.summary.is_some() {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::write(format!("JSON serialization error: {e}")))?;

        if let Some(ref path) = args.summary {
            std::fs::write(path, &json_str)
                .map_err(|e| CliError::write(format!("cannot write summary {}: {e}", path.display())))?;
            eprintln!("wrote {}", path.display());
        }

        if args.json {
            println!("{json_str}");
        }
    }

    print_summary(&result);
    Ok(())
}

fn available_columns(input: &ReconInput, role: DatasetRole) -> Vec<String> {
    let table = match role {
        DatasetRole::Channel => input.channel.clone(),
        DatasetRole::Statement => Some(Table::concat(&input.statement)),
        DatasetRole::Master => input.master.clone(),
    };
    table.map(|t| t.headers().to_vec()).unwrap_or_default()
}

fn print_summary(result: &ReconResult) {
    let s = &result.summary;
    let count = |c: Classification| s.classification_counts.get(&c).copied().unwrap_or(0);

    eprintln!(
        "{} statement row(s): {} via channel, {} via master, {} same-as-title, {} unmatched, {} empty",
        s.statement_rows,
        count(Classification::MappedViaPrimary),
        count(Classification::MappedViaMaster),
        count(Classification::MappedSameAsTitle),
        count(Classification::UnmatchedOverall),
        count(Classification::UnmatchedByPrimary),
    );
    eprintln!(
        "report: {} distinct pair(s), {} same-as-title pair(s), {} unmatched title(s)",
        s.distinct_pairs, s.same_as_title_pairs, s.unmatched_titles,
    );
    if s.channel_conflicts + s.master_conflicts > 0 {
        eprintln!(
            "duplicates: {} channel, {} master title key(s) with conflicting identifiers",
            s.channel_conflicts, s.master_conflicts,
        );
    }
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(Some(&config_path))?;
    eprintln!(
        "valid: config '{}' with {}/{}/{} title candidate(s), duplicates={:?}, keyword_order={:?}",
        config.name,
        config.columns.channel.title.len(),
        config.columns.statement.title.len(),
        config.columns.master.title.len(),
        config.matching.duplicates,
        config.matching.keyword_order,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use titlemap_core::Cell;

    #[test]
    fn available_columns_for_statement_are_unioned() {
        let mut a = Table::new(vec!["상품명".into()]);
        a.push_row(vec![Cell::from("x")]);
        let b = Table::new(vec!["상품명".into(), "금액".into()]);
        let input = ReconInput { channel: None, statement: vec![a, b], master: None };

        assert_eq!(available_columns(&input, DatasetRole::Statement), vec!["상품명", "금액"]);
        assert!(available_columns(&input, DatasetRole::Master).is_empty());
    }

    #[test]
    fn explicit_config_errors_carry_path_hint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[matching]\nduplicates = \"sometimes\"\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert_eq!(err.code, crate::exit_codes::EXIT_INVALID_CONFIG);
        assert!(err.hint.unwrap().contains("bad.toml"));
    }

    #[test]
    fn missing_config_file_is_a_read_error() {
        let err = load_config(Some(Path::new("/no/such/recon.toml"))).unwrap_err();
        assert_eq!(err.code, crate::exit_codes::EXIT_READ);
    }
}
