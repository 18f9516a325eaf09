use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::cell::Cell;

/// A header row plus data rows. Every row is kept exactly as wide as the
/// header row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    /// Sheet or file name the table was read from, if any.
    pub name: Option<String>,
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self { name: None, headers, rows: Vec::new() }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Build a table from a raw header row as found in a file.
    ///
    /// Blank headers become `Unnamed: {index}`; repeated headers get a
    /// `.1`, `.2`, ... suffix so every column name stays addressable.
    pub fn from_raw_headers(raw: &[Cell]) -> Self {
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut taken: HashSet<String> = HashSet::new();
        let mut headers = Vec::with_capacity(raw.len());

        for (idx, cell) in raw.iter().enumerate() {
            let base = if cell.is_empty() {
                format!("Unnamed: {idx}")
            } else {
                cell.to_string()
            };

            let mut name = base.clone();
            while taken.contains(&name) {
                let n = seen.entry(base.clone()).or_insert(0);
                *n += 1;
                name = format!("{base}.{n}");
            }
            taken.insert(name.clone());
            headers.push(name);
        }

        Self::new(headers)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Append a row, padding with `Empty` or truncating to the header width.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.headers.len(), Cell::Empty);
        self.rows.push(row);
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// All cells of a named column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// Row-wise concatenation. Headers are the union of all input headers in
    /// first-seen order; cells missing from a sub-table are `Empty`.
    pub fn concat(tables: &[Table]) -> Table {
        let mut headers: Vec<String> = Vec::new();
        for table in tables {
            for h in &table.headers {
                if !headers.contains(h) {
                    headers.push(h.clone());
                }
            }
        }

        let mut out = Table::new(headers);
        for table in tables {
            let mapping: Vec<usize> = table
                .headers
                .iter()
                .map(|h| out.headers.iter().position(|o| o == h).unwrap_or(0))
                .collect();
            for row in &table.rows {
                let mut merged = vec![Cell::Empty; out.headers.len()];
                for (src, cell) in row.iter().enumerate() {
                    merged[mapping[src]] = cell.clone();
                }
                out.rows.push(merged);
            }
        }
        out
    }
}
