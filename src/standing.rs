//! Academic standing rules.
//!
//! A student's standing combines the rounded average, the lowest individual
//! score and the best of mathematics/literature. A single score is bucketed by
//! a plain threshold ladder. The two rules are deliberately separate: a subject
//! score of 8.5 is `Excellent` on the ladder even for a `Weak` student.

use serde::{Deserialize, Serialize};

use crate::models::{Standing, Student};
use crate::stats::{format_score, student_average};
use crate::text::fold_key;

pub const EXCELLENT_AVERAGE: f64 = 8.0;
pub const EXCELLENT_FLOOR: f64 = 6.5;
pub const EXCELLENT_CORE: f64 = 8.0;
pub const GOOD_AVERAGE: f64 = 6.5;
pub const GOOD_FLOOR: f64 = 5.0;
pub const AVERAGE_AVERAGE: f64 = 5.0;
pub const AVERAGE_FLOOR: f64 = 3.5;

pub const PASS_SCORE: f64 = 5.0;
pub const STRONG_SCORE: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreSubject {
    Mathematics,
    Literature,
}

/// Known spellings, folded and with spaces removed. Order is lookup priority
/// when a student has grades under several spellings of one subject.
const CORE_SUBJECT_ALIASES: &[(&str, CoreSubject)] = &[
    ("toan", CoreSubject::Mathematics),
    ("math", CoreSubject::Mathematics),
    ("mathematics", CoreSubject::Mathematics),
    ("toanhoc", CoreSubject::Mathematics),
    ("maths", CoreSubject::Mathematics),
    ("nguvan", CoreSubject::Literature),
    ("van", CoreSubject::Literature),
    ("literature", CoreSubject::Literature),
    ("vietnamese", CoreSubject::Literature),
    ("tiengviet", CoreSubject::Literature),
];

impl CoreSubject {
    /// Resolves a subject name, or `None` when it is neither core subject.
    pub fn from_subject(subject: &str) -> Option<CoreSubject> {
        let key = alias_key(subject);
        CORE_SUBJECT_ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, core)| *core)
    }
}

fn alias_key(subject: &str) -> String {
    fold_key(subject).chars().filter(|c| !c.is_whitespace()).collect()
}

/// Score the student holds in `core`. Spellings are tried in alias order
/// ("Ngữ Văn" before "Văn"); a repeated spelling uses its last grade.
pub fn core_score(student: &Student, core: CoreSubject) -> Option<f64> {
    CORE_SUBJECT_ALIASES
        .iter()
        .filter(|(_, alias_core)| *alias_core == core)
        .find_map(|(alias, _)| {
            student
                .grades
                .iter()
                .rev()
                .find(|grade| alias_key(&grade.subject) == *alias)
                .map(|grade| grade.score)
        })
}

pub fn student_standing(student: &Student) -> Standing {
    if student.grades.is_empty() {
        return Standing::Weak;
    }

    let average = student_average(student);
    let all_at_least = |floor: f64| student.grades.iter().all(|grade| grade.score >= floor);

    if explain_standing_gap(student).is_excellent {
        Standing::Excellent
    } else if average >= GOOD_AVERAGE && all_at_least(GOOD_FLOOR) {
        Standing::Good
    } else if average >= AVERAGE_AVERAGE && all_at_least(AVERAGE_FLOOR) {
        Standing::Average
    } else {
        Standing::Weak
    }
}

pub fn score_standing(score: f64) -> Standing {
    if score >= EXCELLENT_CORE {
        Standing::Excellent
    } else if score >= GOOD_AVERAGE {
        Standing::Good
    } else if score >= AVERAGE_AVERAGE {
        Standing::Average
    } else {
        Standing::Weak
    }
}

/// Outcome of each excellence sub-condition for one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcellenceCheck {
    pub is_excellent: bool,
    pub average_score: f64,
    pub average_condition: bool,
    pub min_score_condition: bool,
    pub math_literature_condition: bool,
    pub math_score: f64,
    pub literature_score: f64,
    pub details: String,
}

/// Reports which excellence conditions the student misses and by how much.
/// An absent mathematics or literature grade counts as 0.0.
pub fn explain_standing_gap(student: &Student) -> ExcellenceCheck {
    if student.grades.is_empty() {
        return ExcellenceCheck {
            is_excellent: false,
            average_score: 0.0,
            average_condition: false,
            min_score_condition: false,
            math_literature_condition: false,
            math_score: 0.0,
            literature_score: 0.0,
            details: "no grades recorded".to_string(),
        };
    }

    let average_score = student_average(student);
    let math_score = core_score(student, CoreSubject::Mathematics).unwrap_or(0.0);
    let literature_score = core_score(student, CoreSubject::Literature).unwrap_or(0.0);

    let average_condition = average_score >= EXCELLENT_AVERAGE;
    let min_score_condition = student.grades.iter().all(|g| g.score >= EXCELLENT_FLOOR);
    let math_literature_condition = math_score >= EXCELLENT_CORE || literature_score >= EXCELLENT_CORE;
    let is_excellent = average_condition && min_score_condition && math_literature_condition;

    let mut details = Vec::new();
    if !average_condition {
        details.push(format!(
            "average {average_score:.2} < {EXCELLENT_AVERAGE:.1} (short by {:.2})",
            EXCELLENT_AVERAGE - average_score
        ));
    }
    if !min_score_condition {
        let low: Vec<String> = student
            .grades
            .iter()
            .filter(|g| g.score < EXCELLENT_FLOOR)
            .map(|g| format!("{}: {}", g.subject, format_score(g.score)))
            .collect();
        details.push(format!("scores below {EXCELLENT_FLOOR}: {}", low.join(", ")));
    }
    if !math_literature_condition {
        details.push(format!(
            "math {math_score:.1}, literature {literature_score:.1} (needs at least one >= {EXCELLENT_CORE:.1})"
        ));
    }

    ExcellenceCheck {
        is_excellent,
        average_score,
        average_condition,
        min_score_condition,
        math_literature_condition,
        math_score,
        literature_score,
        details: if details.is_empty() {
            "meets every excellence condition".to_string()
        } else {
            details.join("; ")
        },
    }
}

/// How many students satisfy each excellence sub-condition on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExcellenceBreakdown {
    pub total_students: usize,
    pub average_met: usize,
    pub min_score_met: usize,
    pub math_literature_met: usize,
}

pub fn excellence_breakdown<'a, I>(students: I) -> ExcellenceBreakdown
where
    I: IntoIterator<Item = &'a Student>,
{
    students.into_iter().map(explain_standing_gap).fold(
        ExcellenceBreakdown::default(),
        |mut acc, check| {
            acc.total_students += 1;
            acc.average_met += usize::from(check.average_condition);
            acc.min_score_met += usize::from(check.min_score_condition);
            acc.math_literature_met += usize::from(check.math_literature_condition);
            acc
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Grade;

    fn student(grades: &[(&str, f64)]) -> Student {
        Student {
            id: "HS001".into(),
            name: "An".into(),
            class_name: "7A".into(),
            grades: grades
                .iter()
                .map(|(subject, score)| Grade {
                    subject: subject.to_string(),
                    score: *score,
                })
                .collect(),
        }
    }

    #[test]
    fn core_subject_aliases() {
        assert_eq!(CoreSubject::from_subject("Toán"), Some(CoreSubject::Mathematics));
        assert_eq!(CoreSubject::from_subject("TOAN HOC"), Some(CoreSubject::Mathematics));
        assert_eq!(CoreSubject::from_subject("Ngữ Văn"), Some(CoreSubject::Literature));
        assert_eq!(CoreSubject::from_subject("Ngữvăn"), Some(CoreSubject::Literature));
        assert_eq!(CoreSubject::from_subject("Tiếng Việt"), Some(CoreSubject::Literature));
        assert_eq!(CoreSubject::from_subject("Tiếng Anh"), None);
    }

    #[test]
    fn single_math_grade_is_excellent() {
        assert_eq!(student_standing(&student(&[("Toán", 9.0)])), Standing::Excellent);
    }

    #[test]
    fn excellence_needs_math_or_literature() {
        let s = student(&[("Toán", 7.5), ("Văn", 7.5), ("Anh", 10.0), ("Lý", 9.0)]);
        // average 8.5, floor ok, but neither core subject reaches 8.0
        assert_eq!(student_standing(&s), Standing::Good);
        let check = explain_standing_gap(&s);
        assert!(check.average_condition);
        assert!(check.min_score_condition);
        assert!(!check.math_literature_condition);
        assert_eq!(
            check.details,
            "math 7.5, literature 7.5 (needs at least one >= 8.0)"
        );
    }

    #[test]
    fn low_single_score_blocks_higher_levels() {
        let s = student(&[("Toán", 9.0), ("Văn", 9.0), ("Anh", 4.0)]);
        // average 7.33 but one score below 5.0
        assert_eq!(student_standing(&s), Standing::Average);
        let s = student(&[("Toán", 9.0), ("Văn", 9.0), ("Anh", 3.0)]);
        assert_eq!(student_standing(&s), Standing::Weak);
        let s = student(&[("Toán", 5.0), ("Văn", 5.0), ("Anh", 3.0)]);
        assert_eq!(student_standing(&s), Standing::Weak);
    }

    #[test]
    fn no_grades_is_weak() {
        assert_eq!(student_standing(&student(&[])), Standing::Weak);
        assert_eq!(explain_standing_gap(&student(&[])).details, "no grades recorded");
    }

    #[test]
    fn score_ladder() {
        assert_eq!(score_standing(8.5), Standing::Excellent);
        assert_eq!(score_standing(8.0), Standing::Excellent);
        assert_eq!(score_standing(6.5), Standing::Good);
        assert_eq!(score_standing(5.0), Standing::Average);
        assert_eq!(score_standing(4.99), Standing::Weak);
    }

    #[test]
    fn gap_lists_every_failed_condition() {
        let s = student(&[("Toán", 7.0), ("Văn", 6.0), ("Anh", 9.0)]);
        let check = explain_standing_gap(&s);
        assert!(!check.is_excellent);
        assert_eq!(check.average_score, 7.33);
        assert_eq!(
            check.details,
            "average 7.33 < 8.0 (short by 0.67); scores below 6.5: Văn: 6.0; \
             math 7.0, literature 6.0 (needs at least one >= 8.0)"
        );
    }

    #[test]
    fn last_repeated_core_grade_wins() {
        let s = student(&[("Toán", 9.0), ("Toán", 6.0)]);
        assert_eq!(core_score(&s, CoreSubject::Mathematics), Some(6.0));
        assert_eq!(core_score(&s, CoreSubject::Literature), None);
    }

    #[test]
    fn earlier_alias_wins_across_spellings() {
        let s = student(&[("Ngữ Văn", 8.5), ("Văn", 6.0)]);
        assert_eq!(core_score(&s, CoreSubject::Literature), Some(8.5));
        let s = student(&[("Văn", 6.0), ("Ngữ Văn", 8.5)]);
        assert_eq!(core_score(&s, CoreSubject::Literature), Some(8.5));
        let s = student(&[("Toán Học", 9.0), ("Toán", 7.0)]);
        assert_eq!(core_score(&s, CoreSubject::Mathematics), Some(7.0));
    }

    #[test]
    fn breakdown_counts_conditions_independently() {
        let students = vec![
            student(&[("Toán", 9.0), ("Văn", 8.0)]),
            student(&[("Toán", 6.5), ("Văn", 7.0)]),
            student(&[("Anh", 9.0)]),
        ];
        let breakdown = excellence_breakdown(&students);
        assert_eq!(breakdown.total_students, 3);
        assert_eq!(breakdown.average_met, 2);
        assert_eq!(breakdown.min_score_met, 3);
        assert_eq!(breakdown.math_literature_met, 1);
    }
}
