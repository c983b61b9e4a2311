//! Header mapping and row validation for long-form tables.

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::GradeRecord;
use crate::table::RawTable;
use crate::text::{fold_key, normalize_class, normalize_name, normalize_subject};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    StudentName,
    ClassName,
    Subject,
    Score,
}

impl Field {
    pub const REQUIRED: [Field; 4] = [Field::StudentName, Field::ClassName, Field::Subject, Field::Score];

    pub fn canonical(&self) -> &'static str {
        match self {
            Field::StudentName => "student_name",
            Field::ClassName => "class_name",
            Field::Subject => "subject",
            Field::Score => "score",
        }
    }
}

/// Folded header spellings accepted for each canonical field.
const HEADER_ALIASES: &[(&str, Field)] = &[
    ("student_name", Field::StudentName),
    ("ten hoc sinh", Field::StudentName),
    ("ho ten", Field::StudentName),
    ("ho va ten", Field::StudentName),
    ("student name", Field::StudentName),
    ("class_name", Field::ClassName),
    ("lop", Field::ClassName),
    ("class", Field::ClassName),
    ("subject", Field::Subject),
    ("mon hoc", Field::Subject),
    ("mon", Field::Subject),
    ("score", Field::Score),
    ("diem", Field::Score),
    ("diem so", Field::Score),
];

pub fn map_header(header: &str) -> Option<Field> {
    let key = fold_key(header);
    HEADER_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, field)| *field)
}

/// Column index of each required field, first matching column wins.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    student_name: usize,
    class_name: usize,
    subject: usize,
    score: usize,
}

fn resolve_columns(headers: &[String]) -> Result<ColumnMap> {
    let find = |field: Field| headers.iter().position(|h| map_header(h) == Some(field));

    let missing: Vec<&'static str> = Field::REQUIRED
        .iter()
        .filter(|field| find(**field).is_none())
        .map(Field::canonical)
        .collect();

    match (
        find(Field::StudentName),
        find(Field::ClassName),
        find(Field::Subject),
        find(Field::Score),
    ) {
        (Some(student_name), Some(class_name), Some(subject), Some(score)) => Ok(ColumnMap {
            student_name,
            class_name,
            subject,
            score,
        }),
        _ => Err(Error::MissingFields(missing)),
    }
}

/// Maps headers to canonical fields and returns the rows that survive
/// cleaning. Missing required columns fail the whole table; bad rows are
/// dropped.
pub fn clean_long_form(table: &RawTable) -> Result<Vec<GradeRecord>> {
    let columns = resolve_columns(&table.headers)?;

    let mut records = Vec::with_capacity(table.rows.len());
    let mut dropped = 0usize;
    for row in 0..table.rows.len() {
        let name = table.cell(row, columns.student_name).as_text();
        let class = table.cell(row, columns.class_name).as_text();
        let subject = table.cell(row, columns.subject).as_text();
        let score = table
            .cell(row, columns.score)
            .as_number()
            .filter(|score| (0.0..=10.0).contains(score));

        match (name, class, subject, score) {
            (Some(name), Some(class), Some(subject), Some(score)) => records.push(GradeRecord {
                student_name: normalize_name(&name),
                class_name: normalize_class(&class),
                subject: normalize_subject(&subject),
                score,
            }),
            _ => dropped += 1,
        }
    }

    debug!(kept = records.len(), dropped, "cleaned long-form rows");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn text(value: &str) -> Cell {
        Cell::Text(value.to_string())
    }

    #[test]
    fn maps_localised_headers() {
        assert_eq!(map_header(" Tên Học Sinh "), Some(Field::StudentName));
        assert_eq!(map_header("ten hoc sinh"), Some(Field::StudentName));
        assert_eq!(map_header("Họ tên"), Some(Field::StudentName));
        assert_eq!(map_header("LỚP"), Some(Field::ClassName));
        assert_eq!(map_header("Môn học"), Some(Field::Subject));
        assert_eq!(map_header("Điểm"), Some(Field::Score));
        assert_eq!(map_header("Ghi chú"), None);
    }

    #[test]
    fn missing_fields_are_all_named() {
        let table = RawTable::new(vec!["Họ tên".into(), "Điểm".into()], vec![]);
        match clean_long_form(&table) {
            Err(Error::MissingFields(missing)) => {
                assert_eq!(missing, vec!["class_name", "subject"]);
            }
            other => panic!("expected missing fields, got {other:?}"),
        }
    }

    #[test]
    fn cleans_and_normalises_rows() {
        let table = RawTable::new(
            vec!["Tên học sinh".into(), "Lớp".into(), "Môn học".into(), "Điểm".into()],
            vec![
                vec![text(" nguyễn an "), text("7a"), text("toán"), text("8.5")],
                vec![text("Bình"), text("7a"), text("Văn"), text("abc")],
                vec![text("Bình"), text("7a"), text("Văn"), Cell::Number(10.5)],
                vec![text("Bình"), Cell::Empty, text("Văn"), Cell::Number(6.0)],
                vec![text("Chi"), text("7A"), text("ngữ văn"), Cell::Number(0.0)],
            ],
        );

        let records = clean_long_form(&table).unwrap();
        assert_eq!(
            records,
            vec![
                GradeRecord {
                    student_name: "Nguyễn An".into(),
                    class_name: "7A".into(),
                    subject: "Toán".into(),
                    score: 8.5,
                },
                GradeRecord {
                    student_name: "Chi".into(),
                    class_name: "7A".into(),
                    subject: "Ngữ Văn".into(),
                    score: 0.0,
                },
            ]
        );
    }

    #[test]
    fn cleaning_is_idempotent() {
        let table = RawTable::new(
            vec!["ho ten".into(), "lop".into(), "mon hoc".into(), "diem".into()],
            vec![vec![text("lê văn c"), text("7b "), text("tiếng anh"), text("7")]],
        );
        let first = clean_long_form(&table).unwrap();
        let second = clean_long_form(&RawTable::long_form(&first)).unwrap();
        assert_eq!(first, second);
    }
}
