// CSV/TSV import/export

use std::io::Read;
use std::path::Path;

use titlemap_core::{Cell, Table};

pub fn import(path: &Path) -> Result<Table, String> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    Ok(import_from_string(&content, delimiter)?.with_name(file_stem(path)))
}

pub fn import_tsv(path: &Path) -> Result<Table, String> {
    let content = read_file_as_utf8(path)?;
    Ok(import_from_string(&content, b'\t')?.with_name(file_stem(path)))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
pub fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Consistent lines times field count; wider wins ties
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed.
///
/// Korean exports from older Excel builds are CP949; `encoding_rs::EUC_KR`
/// decodes the full CP949 range.
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| format!("{}: {}", path.display(), e))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, had_errors) = encoding_rs::EUC_KR.decode(&bytes);
            if had_errors {
                log::warn!("{}: not valid UTF-8 or CP949, some characters were replaced", path.display());
            } else {
                log::debug!("{}: decoded as CP949", path.display());
            }
            Ok(decoded.into_owned())
        }
    }
}

/// First record is the header row. Fields stay text; blank fields are
/// empty cells. Rows with no content at all are dropped.
pub fn import_from_string(content: &str, delimiter: u8) -> Result<Table, String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();

    let header = match records.next() {
        Some(record) => record.map_err(|e| e.to_string())?,
        None => return Ok(Table::default()),
    };
    let raw: Vec<Cell> = header.iter().map(Cell::from).collect();
    let mut table = Table::from_raw_headers(&raw);

    for result in records {
        let record = result.map_err(|e| e.to_string())?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        if record.len() > table.width() {
            log::warn!(
                "line {}: {} fields but {} columns; extra fields dropped",
                record.position().map(|p| p.line()).unwrap_or(0),
                record.len(),
                table.width()
            );
        }
        table.push_row(record.iter().map(Cell::from).collect());
    }

    Ok(table)
}

pub fn export(table: &Table, path: &Path) -> Result<(), String> {
    export_with_delimiter(table, path, b',')
}

pub fn export_tsv(table: &Table, path: &Path) -> Result<(), String> {
    export_with_delimiter(table, path, b'\t')
}

fn export_with_delimiter(table: &Table, path: &Path, delimiter: u8) -> Result<(), String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|e| format!("{}: {}", path.display(), e))?;

    writer
        .write_record(table.headers())
        .map_err(|e| e.to_string())?;

    for row in table.rows() {
        writer
            .write_record(row.iter().map(|c| c.to_string()))
            .map_err(|e| e.to_string())?;
    }

    writer.flush().map_err(|e| e.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_sniff_semicolon_delimiter() {
        let content = "Name;Age;City\nAlice;30;Paris\nBob;25;London\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_sniff_comma_delimiter() {
        let content = "콘텐츠명,판매채널콘텐츠ID\nAlpha,CH-001\nBeta,CH-002\n";
        assert_eq!(sniff_delimiter(content), b',');
    }

    #[test]
    fn test_sniff_tab_delimiter() {
        let content = "Name\tAge\tCity\nAlice\t30\tParis\nBob\t25\tLondon\n";
        assert_eq!(sniff_delimiter(content), b'\t');
    }

    #[test]
    fn test_sniff_semicolon_with_commas_in_values() {
        let content = "Name;Address;City\n\"Doe, Jane\";\"123 Main St, Apt 4\";Paris\nBob;\"456 Elm\";London\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_header_row_and_text_cells() {
        let table = import_from_string("\u{feff}상품명,금액,\nAlpha,0012,x\n,,\nBeta,,\n", b',').unwrap();
        assert_eq!(table.headers(), &["상품명", "금액", "Unnamed: 2"]);
        assert_eq!(table.len(), 2);
        // Leading zeros survive: CSV fields are never parsed as numbers.
        assert_eq!(table.cell(0, 1), Some(&Cell::from("0012")));
        assert_eq!(table.cell(1, 1), Some(&Cell::Empty));
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let table = import_from_string("a,b,c\n1\n1,2,3,4\n", b',').unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0], vec![Cell::from("1"), Cell::Empty, Cell::Empty]);
        assert_eq!(table.rows()[1].len(), 3);
    }

    #[test]
    fn test_empty_content() {
        let table = import_from_string("", b',').unwrap();
        assert!(table.is_empty());
        assert_eq!(table.width(), 0);
    }

    #[test]
    fn test_cp949_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("legacy.csv");
        let (bytes, _, _) = encoding_rs::EUC_KR.encode("상품명,금액\n알파,100\n");
        fs::write(&path, &bytes).unwrap();

        let table = import(&path).unwrap();
        assert_eq!(table.headers(), &["상품명", "금액"]);
        assert_eq!(table.cell(0, 0), Some(&Cell::from("알파")));
        assert_eq!(table.name.as_deref(), Some("legacy"));
    }

    #[test]
    fn test_tsv_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.tsv");

        let mut table = Table::new(vec!["Name".into(), "Value".into()]);
        table.push_row(vec![Cell::from("Alice"), Cell::Number(42.0)]);
        table.push_row(vec![Cell::from("Bob, Jr."), Cell::Empty]);

        export_tsv(&table, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains('\t'), "TSV should contain tab characters");
        assert!(content.starts_with("Name\tValue\n"));

        let imported = import_tsv(&path).unwrap();
        assert_eq!(imported.headers(), table.headers());
        assert_eq!(imported.cell(0, 1), Some(&Cell::from("42")));
        assert_eq!(imported.cell(1, 0), Some(&Cell::from("Bob, Jr.")));
        assert_eq!(imported.cell(1, 1), Some(&Cell::Empty));
    }
}
