//! `tmap normalize` / `tmap columns` — look at titles and headers without a run.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use titlemap_core::Table;
use titlemap_io::SheetSelection;
use titlemap_recon::columns::resolve;
use titlemap_recon::config::{KeywordOrder, ReconConfig};
use titlemap_recon::model::DatasetRole;
use titlemap_recon::TitleNormalizer;

use crate::recon::load_config;
use crate::CliError;

pub fn cmd_normalize(titles: Vec<String>, order: KeywordOrder) -> Result<(), CliError> {
    let normalizer = TitleNormalizer::new(order);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut emit = |title: &str| -> Result<(), CliError> {
        writeln!(out, "{}", normalizer.normalize_str(title)).map_err(|e| CliError::write(e.to_string()))
    };

    if titles.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line.map_err(|e| CliError::read(format!("stdin: {e}")))?;
            emit(&line)?;
        }
    } else {
        for title in &titles {
            emit(title)?;
        }
    }

    Ok(())
}

/// One resolved (or missing) column for a role.
struct RoleColumn {
    label: &'static str,
    resolved: Result<String, titlemap_recon::ReconError>,
}

fn role_columns(config: &ReconConfig, role: DatasetRole, headers: &[String]) -> Vec<RoleColumn> {
    let cols = &config.columns;
    let lists: Vec<(&'static str, &[String])> = match role {
        DatasetRole::Channel => vec![
            ("title", cols.channel.title.as_slice()),
            ("identifier", cols.channel.identifier.as_slice()),
        ],
        DatasetRole::Statement => vec![("title", cols.statement.title.as_slice())],
        DatasetRole::Master => vec![
            ("title", cols.master.title.as_slice()),
            ("identifier", cols.master.identifier.as_slice()),
        ],
    };

    lists
        .into_iter()
        .map(|(label, candidates)| RoleColumn {
            label,
            resolved: resolve(role, candidates, headers).map(str::to_string),
        })
        .collect()
}

pub fn cmd_columns(file: PathBuf, role: Option<DatasetRole>, config: Option<PathBuf>) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;

    // Statements use every sheet; catalogs only the first.
    let selection = match role {
        Some(DatasetRole::Channel) | Some(DatasetRole::Master) => SheetSelection::First,
        _ => SheetSelection::All,
    };
    let tables = titlemap_io::load(&file, selection).map_err(CliError::read)?;
    let table = Table::concat(&tables);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let w = |e: io::Error| CliError::write(e.to_string());

    writeln!(
        out,
        "{}: {} sheet(s), {} row(s), {} column(s)",
        file.display(),
        tables.len(),
        table.len(),
        table.width()
    )
    .map_err(w)?;
    for (i, header) in table.headers().iter().enumerate() {
        writeln!(out, "  {:>3}  {}", i + 1, header).map_err(w)?;
    }

    let roles = match role {
        Some(r) => vec![r],
        None => vec![DatasetRole::Channel, DatasetRole::Statement, DatasetRole::Master],
    };

    let mut first_missing = None;
    for r in roles {
        for col in role_columns(&config, r, table.headers()) {
            match col.resolved {
                Ok(name) => writeln!(out, "{r} {}: {}", col.label, name).map_err(w)?,
                Err(e) => {
                    writeln!(out, "{r} {}: (not found)", col.label).map_err(w)?;
                    first_missing.get_or_insert(e);
                }
            }
        }
    }

    // Only a role check fails the command.
    match (role, first_missing) {
        (Some(_), Some(err)) => Err(CliError::recon(err)),
        _ => Ok(()),
    }
}
