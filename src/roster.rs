use std::collections::HashMap;

use crate::models::{Grade, GradeRecord, Student};

pub fn student_id(sequence: usize) -> String {
    format!("HS{sequence:03}")
}

/// Folds cleaned rows into students keyed by (name, class), in first-seen
/// order. Repeated subjects are kept as separate grades.
pub fn build_students(records: &[GradeRecord]) -> Vec<Student> {
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut students: Vec<Student> = Vec::new();

    for record in records {
        let key = (record.student_name.as_str(), record.class_name.as_str());
        let slot = *index.entry(key).or_insert_with(|| {
            students.push(Student {
                id: student_id(students.len() + 1),
                name: record.student_name.clone(),
                class_name: record.class_name.clone(),
                grades: Vec::new(),
            });
            students.len() - 1
        });

        students[slot].grades.push(Grade {
            subject: record.subject.clone(),
            score: record.score,
        });
    }

    students
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, class: &str, subject: &str, score: f64) -> GradeRecord {
        GradeRecord {
            student_name: name.to_string(),
            class_name: class.to_string(),
            subject: subject.to_string(),
            score,
        }
    }

    #[test]
    fn ids_follow_first_seen_order() {
        let students = build_students(&[
            record("Bình", "7A", "Toán", 6.0),
            record("An", "7A", "Toán", 9.0),
            record("Bình", "7A", "Văn", 7.0),
            record("An", "7B", "Toán", 4.0),
        ]);

        let ids: Vec<(&str, &str, &str)> = students
            .iter()
            .map(|s| (s.id.as_str(), s.name.as_str(), s.class_name.as_str()))
            .collect();
        assert_eq!(
            ids,
            vec![("HS001", "Bình", "7A"), ("HS002", "An", "7A"), ("HS003", "An", "7B")]
        );
        assert_eq!(students[0].grades.len(), 2);
    }

    #[test]
    fn duplicate_subjects_are_preserved() {
        let students = build_students(&[
            record("An", "7A", "Toán", 6.0),
            record("An", "7A", "Toán", 8.0),
        ]);
        assert_eq!(students.len(), 1);
        let scores: Vec<f64> = students[0].grades.iter().map(|g| g.score).collect();
        assert_eq!(scores, vec![6.0, 8.0]);
    }

    #[test]
    fn empty_input_builds_nothing() {
        assert!(build_students(&[]).is_empty());
    }

    #[test]
    fn id_padding() {
        assert_eq!(student_id(7), "HS007");
        assert_eq!(student_id(1234), "HS1234");
    }
}
