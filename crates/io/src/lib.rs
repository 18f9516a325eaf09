// File I/O operations

pub mod csv;
pub mod xlsx;

use std::fmt;
use std::path::Path;

use titlemap_core::Table;

/// File formats recognized by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// xlsx / xlsm
    Xlsx,
    Xls,
    Xlsb,
    Ods,
    Csv,
    Tsv,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self, String> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .ok_or_else(|| format!("{}: file has no extension", path.display()))?;

        match ext.as_str() {
            "xlsx" | "xlsm" => Ok(Self::Xlsx),
            "xls" => Ok(Self::Xls),
            "xlsb" => Ok(Self::Xlsb),
            "ods" => Ok(Self::Ods),
            "csv" => Ok(Self::Csv),
            "tsv" | "tab" => Ok(Self::Tsv),
            other => Err(format!("{}: unsupported file type '.{}'", path.display(), other)),
        }
    }

    pub fn is_spreadsheet(&self) -> bool {
        matches!(self, Self::Xlsx | Self::Xls | Self::Xlsb | Self::Ods)
    }

    pub fn is_writable(&self) -> bool {
        matches!(self, Self::Xlsx | Self::Csv | Self::Tsv)
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Xlsx => "xlsx",
            Self::Xls => "xls",
            Self::Xlsb => "xlsb",
            Self::Ods => "ods",
            Self::Csv => "csv",
            Self::Tsv => "tsv",
        };
        f.write_str(s)
    }
}

/// Which worksheets of a spreadsheet to read. Delimited files always yield
/// exactly one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SheetSelection {
    #[default]
    First,
    All,
}

/// Load a file into one table per selected sheet.
pub fn load(path: &Path, selection: SheetSelection) -> Result<Vec<Table>, String> {
    if !path.exists() {
        return Err(format!("{}: no such file", path.display()));
    }

    let tables = match FileFormat::from_path(path)? {
        f if f.is_spreadsheet() => xlsx::import(path, selection)?,
        FileFormat::Tsv => vec![csv::import_tsv(path)?],
        _ => vec![csv::import(path)?],
    };

    log::debug!(
        "{}: {} table(s), {} row(s)",
        path.display(),
        tables.len(),
        tables.iter().map(Table::len).sum::<usize>()
    );
    Ok(tables)
}

/// Write a table, choosing the format from the extension.
pub fn save(table: &Table, path: &Path) -> Result<(), String> {
    match FileFormat::from_path(path)? {
        FileFormat::Xlsx => xlsx::export(table, path),
        FileFormat::Csv => csv::export(table, path),
        FileFormat::Tsv => csv::export_tsv(table, path),
        other => Err(format!("{}: cannot write .{} files", path.display(), other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn format_from_extension() {
        assert_eq!(FileFormat::from_path(Path::new("a.XLSX")).unwrap(), FileFormat::Xlsx);
        assert_eq!(FileFormat::from_path(Path::new("a.xlsm")).unwrap(), FileFormat::Xlsx);
        assert_eq!(FileFormat::from_path(Path::new("dir/b.ods")).unwrap(), FileFormat::Ods);
        assert_eq!(FileFormat::from_path(Path::new("c.tsv")).unwrap(), FileFormat::Tsv);
        assert!(FileFormat::from_path(Path::new("d.pdf")).is_err());
        assert!(FileFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn writable_formats() {
        assert!(FileFormat::Xlsx.is_writable());
        assert!(FileFormat::Csv.is_writable());
        assert!(!FileFormat::Ods.is_writable());
        let err = save(&Table::default(), &PathBuf::from("out.xls")).unwrap_err();
        assert!(err.contains("cannot write .xls"), "{err}");
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load(Path::new("/definitely/not/here.csv"), SheetSelection::All).unwrap_err();
        assert!(err.contains("no such file"), "{err}");
    }
}
