use titlemap_core::Table;

use crate::error::ReconError;
use crate::model::DatasetRole;

/// Return the first candidate present in `available`, in candidate order.
pub fn resolve<'a, S: AsRef<str>>(
    role: DatasetRole,
    candidates: &'a [S],
    available: &[String],
) -> Result<&'a str, ReconError> {
    candidates
        .iter()
        .map(|c| c.as_ref())
        .find(|c| available.iter().any(|a| a.as_str() == *c))
        .ok_or_else(|| ReconError::ColumnNotFound {
            role,
            candidates: candidates.iter().map(|c| c.as_ref().to_string()).collect(),
        })
}

/// [`resolve`] against a table's header row, returning the column index too.
pub fn resolve_in<S: AsRef<str>>(
    role: DatasetRole,
    candidates: &[S],
    table: &Table,
) -> Result<(String, usize), ReconError> {
    let name = resolve(role, candidates, table.headers())?;
    let idx = table
        .column_index(name)
        .ok_or_else(|| ReconError::ColumnNotFound {
            role,
            candidates: vec![name.to_string()],
        })?;
    Ok((name.to_string(), idx))
}
