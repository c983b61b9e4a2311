//! In-memory tabular model shared by every ingestion stage.

use std::fmt;

use crate::models::GradeRecord;

/// Canonical header names of a long-form table, in column order.
pub const LONG_FORM_HEADERS: [&str; 4] = ["student_name", "class_name", "subject", "score"];

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Builds a cell from raw text; blank text becomes `Empty`.
    pub fn from_text(value: &str) -> Self {
        if value.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Number(value) => value.is_nan(),
            Cell::Text(text) => text.trim().is_empty(),
        }
    }

    /// Numeric view of the cell. Text is trimmed and may use a decimal comma.
    /// Non-finite values are rejected.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Cell::Empty => return None,
            Cell::Number(value) => *value,
            Cell::Text(text) => text.trim().replace(',', ".").parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    /// Trimmed text view of the cell, `None` when empty.
    pub fn as_text(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.to_string().trim().to_string())
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{}", *value as i64)
            }
            Cell::Number(value) => write!(f, "{value}"),
            Cell::Text(text) => f.write_str(text),
        }
    }
}

/// A header row plus data rows. Rows may be ragged; missing trailing cells
/// read as `Cell::Empty`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { headers, rows }
    }

    /// Long-form table with the canonical headers.
    pub fn long_form(records: &[GradeRecord]) -> Self {
        let rows = records
            .iter()
            .map(|record| {
                vec![
                    Cell::Text(record.student_name.clone()),
                    Cell::Text(record.class_name.clone()),
                    Cell::Text(record.subject.clone()),
                    Cell::Number(record.score),
                ]
            })
            .collect();
        Self {
            headers: LONG_FORM_HEADERS.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .unwrap_or(&Cell::Empty)
    }

    /// Removes rows whose cells are all empty, then columns whose cells are
    /// all empty. Headers do not count as content.
    pub fn drop_empty(&self) -> RawTable {
        let rows: Vec<&Vec<Cell>> = self
            .rows
            .iter()
            .filter(|row| row.iter().any(|cell| !cell.is_empty()))
            .collect();

        let kept: Vec<usize> = (0..self.headers.len())
            .filter(|&col| {
                rows.iter()
                    .any(|row| row.get(col).is_some_and(|cell| !cell.is_empty()))
            })
            .collect();

        RawTable {
            headers: kept.iter().map(|&col| self.headers[col].clone()).collect(),
            rows: rows
                .iter()
                .map(|row| {
                    kept.iter()
                        .map(|&col| row.get(col).cloned().unwrap_or(Cell::Empty))
                        .collect()
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_view_accepts_text_and_decimal_comma() {
        assert_eq!(Cell::Text(" 7,5 ".into()).as_number(), Some(7.5));
        assert_eq!(Cell::Number(9.0).as_number(), Some(9.0));
        assert_eq!(Cell::Text("abc".into()).as_number(), None);
        assert_eq!(Cell::Text("NaN".into()).as_number(), None);
        assert_eq!(Cell::Text("inf".into()).as_number(), None);
        assert_eq!(Cell::Empty.as_number(), None);
    }

    #[test]
    fn integral_numbers_display_without_fraction() {
        assert_eq!(Cell::Number(12.0).to_string(), "12");
        assert_eq!(Cell::Number(7.25).to_string(), "7.25");
    }

    #[test]
    fn drop_empty_removes_blank_rows_and_columns() {
        let table = RawTable::new(
            vec!["Name".into(), "Blank".into(), "Math".into()],
            vec![
                vec![Cell::Text("An".into()), Cell::Empty, Cell::Number(7.0)],
                vec![Cell::Empty, Cell::Text("  ".into()), Cell::Empty],
                vec![Cell::Text("Binh".into())],
            ],
        );

        let cleaned = table.drop_empty();
        assert_eq!(cleaned.headers, vec!["Name", "Math"]);
        assert_eq!(cleaned.rows.len(), 2);
        assert_eq!(cleaned.rows[1], vec![Cell::Text("Binh".into()), Cell::Empty]);
    }
}
