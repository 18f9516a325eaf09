// Excel import (xlsx, xlsm, xls, xlsb, ods) and xlsx export

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use chrono::{Duration, NaiveDate};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook as XlsxWorkbook, Worksheet};

use titlemap_core::{Cell, Table};

use crate::SheetSelection;

/// Excel limits a worksheet name to 31 characters.
const MAX_SHEET_NAME: usize = 31;

const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Serial of 9999-12-31 plus one.
const MAX_SERIAL: f64 = 2_958_466.0;

/// Import selected sheets. The first row of every sheet's used range is its
/// header row.
pub fn import(path: &Path, selection: SheetSelection) -> Result<Vec<Table>, String> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open Excel file: {}", e))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err("Excel file contains no sheets".to_string());
    }

    let selected: &[String] = match selection {
        SheetSelection::First => &sheet_names[..1],
        SheetSelection::All => &sheet_names,
    };

    let mut tables = Vec::with_capacity(selected.len());
    for sheet_name in selected {
        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|e| format!("Failed to read sheet '{}': {}", sheet_name, e))?;

        let (height, width) = range.get_size();
        if height == 0 || width == 0 {
            log::debug!("sheet '{}' is empty", sheet_name);
            if selection == SheetSelection::First {
                tables.push(Table::default().with_name(sheet_name.as_str()));
            }
            continue;
        }

        let table = range_to_table(&range).with_name(sheet_name.as_str());
        log::debug!("sheet '{}': {} row(s) x {} column(s)", sheet_name, table.len(), table.width());
        tables.push(table);
    }

    Ok(tables)
}

fn range_to_table(range: &Range<Data>) -> Table {
    let mut rows = range.rows();

    let header: Vec<Cell> = match rows.next() {
        Some(row) => row.iter().map(convert).collect(),
        None => return Table::default(),
    };
    let mut table = Table::from_raw_headers(&header);

    for row in rows {
        let cells: Vec<Cell> = row.iter().map(convert).collect();
        if cells.iter().all(Cell::is_empty) {
            continue;
        }
        table.push_row(cells);
    }

    table
}

/// Map a calamine value to a typed cell. Date-time serials keep only the
/// calendar date; time-only values stay numbers.
pub fn convert(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s.as_str()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::Error(e) => Cell::Text(format!("#{:?}", e)),
        Data::DateTime(dt) => {
            // 1900 date system assumed; calamine does not expose the 1904 flag.
            let serial = dt.as_f64();
            match serial_to_date(serial) {
                Some(date) => Cell::Date(date),
                None => Cell::Number(serial),
            }
        }
        Data::DateTimeIso(s) => match parse_iso_date(s) {
            Some(date) => Cell::Date(date),
            None => Cell::text(s.as_str()),
        },
        Data::DurationIso(s) => Cell::text(s.as_str()),
    }
}

/// Excel serial day number to calendar date. Day 0 is 1899-12-30, which
/// absorbs the 1900 leap-year bug for every date after February 1900.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..MAX_SERIAL).contains(&serial) {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(Duration::days(serial.floor() as i64))
}

/// `YYYY-MM-DD` with an optional `THH:MM:SS...` tail (ods date cells).
fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let date_part = s.split('T').next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Write a table to a single-sheet workbook. Values only, no styling beyond
/// a date number format.
pub fn export(table: &Table, path: &Path) -> Result<(), String> {
    let mut workbook = XlsxWorkbook::new();
    let worksheet = workbook.add_worksheet();

    let name = sheet_name(table.name.as_deref());
    worksheet
        .set_name(&name)
        .map_err(|e| format!("Failed to create sheet '{}': {}", name, e))?;

    write_table(table, worksheet)?;

    workbook
        .save(path)
        .map_err(|e| format!("Failed to save XLSX file: {}", e))?;
    Ok(())
}

fn sheet_name(name: Option<&str>) -> String {
    let cleaned: String = name
        .unwrap_or_default()
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(MAX_SHEET_NAME)
        .collect();
    let cleaned = cleaned.trim_matches('\'').trim().to_string();
    if cleaned.is_empty() {
        DEFAULT_SHEET_NAME.to_string()
    } else {
        cleaned
    }
}

fn write_table(table: &Table, worksheet: &mut Worksheet) -> Result<(), String> {
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    for (col, header) in table.headers().iter().enumerate() {
        worksheet
            .write_string(0, col as u16, header)
            .map_err(|e| format!("Failed to write header ({}): {}", col, e))?;
    }

    for (row_idx, row) in table.rows().iter().enumerate() {
        let row32 = (row_idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let col16 = col as u16;
            let written = match cell {
                Cell::Empty => continue,
                Cell::Text(s) => worksheet.write_string(row32, col16, s),
                Cell::Number(n) => worksheet.write_number(row32, col16, *n),
                Cell::Bool(b) => worksheet.write_boolean(row32, col16, *b),
                Cell::Date(d) => {
                    let dt = excel_date(*d)?;
                    worksheet.write_datetime_with_format(row32, col16, &dt, &date_format)
                }
            };
            written.map_err(|e| format!("Failed to write cell ({}, {}): {}", row32, col, e))?;
        }
    }

    Ok(())
}

fn excel_date(date: NaiveDate) -> Result<ExcelDateTime, String> {
    use chrono::Datelike;
    ExcelDateTime::from_ymd(date.year() as u16, date.month() as u8, date.day() as u8)
        .map_err(|e| format!("Date {} out of Excel range: {}", date, e))
}
