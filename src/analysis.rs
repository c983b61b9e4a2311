//! Entry points used by callers: table → students, students → result.

use tracing::{info, warn};

use crate::columns::clean_long_form;
use crate::config::IngestOptions;
use crate::error::Result;
use crate::ingest::{ensure_supported, read_table};
use crate::layout::normalize_layout;
use crate::models::{AnalysisResult, Student};
use crate::recommend::generate_recommendations;
use crate::roster::build_students;
use crate::stats::{class_statistics, rank_students};
use crate::table::RawTable;

/// Normalises a raw table and folds it into students. A table with no columns
/// at all is empty input and yields no students.
pub fn normalize_and_build_students(table: RawTable, options: &IngestOptions) -> Result<Vec<Student>> {
    if table.headers.is_empty() && table.is_empty() {
        warn!("empty table, no students built");
        return Ok(Vec::new());
    }

    let long_form = normalize_layout(table, &options.wide_class_label);
    let records = clean_long_form(&long_form)?;
    let students = build_students(&records);
    info!(
        rows = records.len(),
        students = students.len(),
        "built students"
    );
    Ok(students)
}

/// Reads an uploaded buffer and builds its students. The filename selects
/// the parser and must carry a supported extension.
pub fn students_from_upload(bytes: &[u8], filename: &str, options: &IngestOptions) -> Result<Vec<Student>> {
    ensure_supported(filename)?;
    let table = read_table(bytes, filename)?;
    normalize_and_build_students(table, options)
}

pub fn analyze_complete(run_id: &str, students: &[Student]) -> AnalysisResult {
    let student_summaries = rank_students(students);
    let class_statistics = class_statistics(students);
    let recommendations = generate_recommendations(&class_statistics, &student_summaries);

    if students.is_empty() {
        warn!(run_id, "analysed a run without students");
    }
    info!(
        run_id,
        students = class_statistics.total_students,
        subjects = class_statistics.subject_statistics.len(),
        recommendations = recommendations.len(),
        "analysis complete"
    );

    AnalysisResult {
        run_id: run_id.to_string(),
        class_statistics,
        student_summaries,
        recommendations,
    }
}

/// Distinct subjects seen across the students, for upload summaries.
pub fn subject_count(students: &[Student]) -> usize {
    crate::stats::subjects(students).len()
}
