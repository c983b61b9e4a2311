//! Turns an uploaded byte buffer into a `RawTable`. The filename only picks
//! the parser: `.csv` is delimited text, anything else is a workbook.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, DataType, Reader};
use tracing::debug;

use crate::error::{Error, Result};
use crate::table::{Cell, RawTable};

pub const ALLOWED_EXTENSIONS: &[&str] = &["xlsx", "xls", "csv"];

fn extension(filename: &str) -> String {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Rejects uploads whose extension is not one of `ALLOWED_EXTENSIONS`.
pub fn ensure_supported(filename: &str) -> Result<()> {
    let ext = extension(filename);
    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(Error::Format(format!(
            "unsupported file type '{filename}', expected one of: .{}",
            ALLOWED_EXTENSIONS.join(", .")
        )))
    }
}

pub fn read_table(bytes: &[u8], filename: &str) -> Result<RawTable> {
    let table = if extension(filename) == "csv" {
        read_delimited(bytes)?
    } else {
        read_workbook(bytes)?
    };
    debug!(
        filename,
        columns = table.column_count(),
        rows = table.rows.len(),
        "read raw table"
    );
    Ok(table)
}

fn read_delimited(bytes: &[u8]) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|value| value.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::from_text).collect());
    }

    Ok(RawTable::new(headers, rows))
}

fn read_workbook(bytes: &[u8]) -> Result<RawTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| Error::Format("the workbook does not contain any worksheets".into()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .ok_or_else(|| Error::Format(format!("unable to read the worksheet '{sheet_name}'")))??;

    let mut rows_iter = range.rows();
    let headers = match rows_iter.next() {
        Some(header_row) => header_row.iter().map(header_text).collect(),
        None => return Ok(RawTable::default()),
    };
    let rows = rows_iter
        .map(|row| row.iter().map(workbook_cell).collect())
        .collect();

    Ok(RawTable::new(headers, rows))
}

fn header_text(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        other => workbook_cell(other).to_string(),
    }
}

fn workbook_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::Empty => Cell::Empty,
        DataType::Int(value) => Cell::Number(*value as f64),
        DataType::Float(value) => Cell::Number(*value),
        DataType::String(text) => Cell::from_text(text),
        other => Cell::from_text(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_gate() {
        assert!(ensure_supported("grades.xlsx").is_ok());
        assert!(ensure_supported("GRADES.CSV").is_ok());
        assert!(matches!(
            ensure_supported("grades.pdf"),
            Err(Error::Format(_))
        ));
        assert!(ensure_supported("noextension").is_err());
    }

    #[test]
    fn reads_csv_with_blank_cells() {
        let data = "Tên học sinh,Lớp,Môn học,Điểm\nAn,7a,Toán,9\nBình,7a,,6.5\n";
        let table = read_table(data.as_bytes(), "upload.csv").unwrap();
        assert_eq!(table.headers, vec!["Tên học sinh", "Lớp", "Môn học", "Điểm"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1][2], Cell::Empty);
        assert_eq!(table.rows[0][3].as_number(), Some(9.0));
    }

    #[test]
    fn corrupt_workbook_is_a_format_error() {
        let err = read_table(b"definitely not a workbook", "upload.xlsx").unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }
}
