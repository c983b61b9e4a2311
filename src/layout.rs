//! Layout detection: a table is either already long-form (one row per
//! student/subject/score) or wide-form (one row per student, one column per
//! subject). Wide tables are reshaped to long-form here.

use tracing::{debug, info};

use crate::models::GradeRecord;
use crate::table::{Cell, RawTable};
use crate::text::{fold_key, is_all_digits};

/// Header fragments (already folded) that mark the subject column of a
/// long-form table.
const SUBJECT_MARKERS: &[&str] = &["mon hoc", "subject"];
const NAME_MARKERS: &[&str] = &["ten", "name"];
const AVERAGE_MARKERS: &[&str] = &["tb", "trung binh", "average", "avg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Long,
    Wide,
    Unknown,
}

pub fn detect_layout(table: &RawTable) -> Layout {
    let columns = table.column_count();
    if columns == 4 && table.headers.iter().any(|h| has_marker(h, SUBJECT_MARKERS)) {
        Layout::Long
    } else if columns > 5 {
        Layout::Wide
    } else {
        Layout::Unknown
    }
}

/// Returns the table in long form. Tables that are long-form or ambiguous
/// pass through untouched; header validation happens later.
pub fn normalize_layout(table: RawTable, wide_class_label: &str) -> RawTable {
    let layout = detect_layout(&table);
    info!(?layout, columns = table.column_count(), "detected table layout");
    match layout {
        Layout::Wide => RawTable::long_form(&reshape_wide(&table, wide_class_label)),
        Layout::Long | Layout::Unknown => table,
    }
}

/// Reshapes a wide table into long-form records. Every record gets
/// `class_label` because wide sheets carry no class column.
pub fn reshape_wide(table: &RawTable, class_label: &str) -> Vec<GradeRecord> {
    let table = table.drop_empty();
    if table.headers.is_empty() {
        return Vec::new();
    }

    let name_col = table
        .headers
        .iter()
        .position(|h| has_marker(h, NAME_MARKERS))
        .unwrap_or(0);

    let subject_cols: Vec<(usize, String)> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != name_col)
        .map(|(idx, header)| (idx, header.trim().to_string()))
        .filter(|(_, header)| !header.is_empty() && !is_average_header(header))
        .collect();

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for row in 0..table.rows.len() {
        let name = match table.cell(row, name_col).as_text() {
            Some(name) if !is_all_digits(&name) => name,
            _ => continue,
        };

        for (col, subject) in &subject_cols {
            let cell = table.cell(row, *col);
            if matches!(cell, Cell::Empty) {
                continue;
            }
            match cell.as_number().filter(|score| (0.0..=10.0).contains(score)) {
                Some(score) => records.push(GradeRecord {
                    student_name: name.clone(),
                    class_name: class_label.to_string(),
                    subject: subject.clone(),
                    score,
                }),
                None => dropped += 1,
            }
        }
    }

    debug!(
        subjects = subject_cols.len(),
        records = records.len(),
        dropped,
        "reshaped wide table"
    );
    records
}

fn has_marker(header: &str, markers: &[&str]) -> bool {
    let folded = fold_key(header);
    markers.iter().any(|marker| folded.contains(marker))
}

/// Any folded header containing "tb" (trung bình) is an average column:
/// "Điểm TB", "ĐTB", "TBM", "TBCN".
fn is_average_header(header: &str) -> bool {
    has_marker(header, AVERAGE_MARKERS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Cell {
        Cell::Text(value.to_string())
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn wide_table() -> RawTable {
        RawTable::new(
            headers(&["Tên học sinh", "Toán", "Văn", "Anh", "Lý", "Điểm TB"]),
            vec![
                vec![
                    text("An"),
                    Cell::Number(7.0),
                    Cell::Number(8.0),
                    Cell::Number(6.0),
                    Cell::Number(9.0),
                    Cell::Number(7.5),
                ],
                vec![
                    text(" Bình "),
                    Cell::Number(5.0),
                    text("abc"),
                    Cell::Number(11.0),
                    Cell::Empty,
                    Cell::Number(5.0),
                ],
            ],
        )
    }

    #[test]
    fn detects_long_form_by_subject_header() {
        let table = RawTable::new(headers(&["Tên học sinh", "Lớp", "Môn học", "Điểm"]), vec![]);
        assert_eq!(detect_layout(&table), Layout::Long);
    }

    #[test]
    fn four_columns_without_subject_header_are_ambiguous() {
        let table = RawTable::new(headers(&["Tên học sinh", "Toán", "Văn", "Điểm TB"]), vec![]);
        assert_eq!(detect_layout(&table), Layout::Unknown);
        assert_eq!(normalize_layout(table.clone(), "7A"), table);
    }

    #[test]
    fn wide_tables_are_reshaped() {
        let table = wide_table();
        assert_eq!(detect_layout(&table), Layout::Wide);

        let long = normalize_layout(table, "7A");
        assert_eq!(long.headers, vec!["student_name", "class_name", "subject", "score"]);
        // An: 4 subjects; Bình: only Toán survives
        assert_eq!(long.rows.len(), 5);
    }

    #[test]
    fn reshape_skips_bad_cells_and_average_column() {
        let records = reshape_wide(&wide_table(), "8B");
        let subjects: Vec<&str> = records.iter().map(|r| r.subject.as_str()).collect();
        assert_eq!(subjects, vec!["Toán", "Văn", "Anh", "Lý", "Toán"]);
        assert!(records.iter().all(|r| r.class_name == "8B"));
        assert_eq!(records[4].student_name, "Bình");
        assert_eq!(records[4].score, 5.0);
    }

    #[test]
    fn reshape_skips_numeric_and_missing_names() {
        let table = RawTable::new(
            headers(&["Họ tên", "Toán", "Văn"]),
            vec![
                vec![text("123"), Cell::Number(5.0), Cell::Number(5.0)],
                vec![Cell::Empty, Cell::Number(5.0), Cell::Number(5.0)],
                vec![text("Chi"), Cell::Number(10.0), Cell::Number(0.0)],
            ],
        );
        let records = reshape_wide(&table, "7A");
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.student_name == "Chi"));
    }

    #[test]
    fn name_column_falls_back_to_first_column() {
        let table = RawTable::new(
            headers(&["Student", "Math", "Physics"]),
            vec![vec![text("Dung"), Cell::Number(8.0), Cell::Number(9.0)]],
        );
        let records = reshape_wide(&table, "7A");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].student_name, "Dung");
        assert_eq!(records[1].subject, "Physics");
    }

    #[test]
    fn tb_marker_matches_anywhere_in_header() {
        assert!(is_average_header("Điểm TB"));
        assert!(is_average_header("TB môn"));
        assert!(is_average_header("ĐTB"));
        assert!(is_average_header("TBM"));
        assert!(is_average_header("TBCN"));
        assert!(!is_average_header("Thể dục"));
        assert!(!is_average_header("Toán"));
    }

    #[test]
    fn reshape_drops_abbreviated_average_column() {
        let table = RawTable::new(
            headers(&["Họ và tên", "Toán", "Văn", "Anh", "Sử", "ĐTB"]),
            vec![vec![
                text("An"),
                Cell::Number(8.0),
                Cell::Number(7.0),
                Cell::Number(9.0),
                Cell::Number(6.0),
                Cell::Number(7.5),
            ]],
        );
        let records = reshape_wide(&table, "7A");
        let subjects: Vec<&str> = records.iter().map(|r| r.subject.as_str()).collect();
        assert_eq!(subjects, vec!["Toán", "Văn", "Anh", "Sử"]);
    }
}
