use crate::error::ReportError;
use crate::types::{RawTable, RawValue};
use calamine::{open_workbook_auto, Data, Range, Reader};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

pub const DEFAULT_SHEET: &str = "Export";

/// Load the uploaded export into a raw table, choosing the reader by
/// file extension.
pub fn load_table(path: &Path, sheet: &str) -> Result<RawTable, ReportError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let table = match ext.as_deref() {
        Some("csv") => {
            let file = std::fs::File::open(path)?;
            read_csv(file)?
        }
        Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => read_workbook(path, sheet)?,
        _ => return Err(ReportError::UnsupportedInput(path.to_path_buf())),
    };
    info!(
        path = %path.display(),
        rows = table.rows.len(),
        columns = table.columns.len(),
        "loaded input table"
    );
    Ok(table)
}

pub fn read_csv<R: Read>(reader: R) -> Result<RawTable, ReportError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(RawValue::from_text).collect());
    }
    debug!(rows = rows.len(), "read csv records");
    Ok(RawTable { columns, rows })
}

fn read_workbook(path: &Path, sheet: &str) -> Result<RawTable, ReportError> {
    let mut workbook = open_workbook_auto(path)?;
    ensure_sheet(&workbook.sheet_names(), sheet)?;
    let range = workbook.worksheet_range(sheet)?;
    let table = table_from_range(&range);
    debug!(sheet, rows = table.rows.len(), "read workbook sheet");
    Ok(table)
}

fn ensure_sheet(names: &[String], sheet: &str) -> Result<(), ReportError> {
    if names.iter().any(|name| name == sheet) {
        Ok(())
    } else {
        Err(ReportError::SheetNotFound(sheet.to_string()))
    }
}

/// First row is the header; every later row becomes a data row.
fn table_from_range(range: &Range<Data>) -> RawTable {
    let mut iter = range.rows();
    let columns: Vec<String> = match iter.next() {
        Some(header) => header.iter().map(|c| c.to_string().trim().to_string()).collect(),
        None => Vec::new(),
    };
    let rows = iter.map(|row| row.iter().map(cell_value).collect()).collect();
    RawTable { columns, rows }
}

fn cell_value(cell: &Data) -> RawValue {
    match cell {
        Data::Empty => RawValue::Empty,
        Data::Float(v) => RawValue::Number(*v),
        Data::Int(v) => RawValue::Number(*v as f64),
        Data::String(v) => RawValue::from_text(v),
        Data::Error(_) => RawValue::Empty,
        other => RawValue::from_text(&other.to_string()),
    }
}
