use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{ClassStatistics, Standing, Student, StudentSummary, SubjectStatistics, TopStudent};
use crate::standing::{score_standing, student_standing, PASS_SCORE, STRONG_SCORE};

pub const TOP_STUDENT_COUNT: usize = 5;

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Whole scores keep one decimal ("6.0"), others print as stored.
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.1}")
    } else {
        format!("{score}")
    }
}

/// Share of passing scores in percent, one decimal. Only a full pass reads
/// 100.0; a near-full pass is capped at 99.9 instead of rounding up.
pub fn pass_rate(passed: usize, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let rate = round_to(passed as f64 * 100.0 / count as f64, 1);
    if passed < count {
        rate.min(99.9)
    } else {
        rate
    }
}

/// Mean of all grades rounded to two decimals; 0.0 without grades.
pub fn student_average(student: &Student) -> f64 {
    if student.grades.is_empty() {
        return 0.0;
    }
    let total: f64 = student.grades.iter().map(|g| g.score).sum();
    round_to(total / student.grades.len() as f64, 2)
}

pub fn weak_subjects(student: &Student) -> Vec<String> {
    student
        .grades
        .iter()
        .filter(|g| g.score < PASS_SCORE)
        .map(|g| g.subject.clone())
        .collect()
}

pub fn strong_subjects(student: &Student) -> Vec<String> {
    student
        .grades
        .iter()
        .filter(|g| g.score >= STRONG_SCORE)
        .map(|g| g.subject.clone())
        .collect()
}

pub fn summarize_student(student: &Student, rank: usize) -> StudentSummary {
    StudentSummary {
        student: student.clone(),
        average_score: student_average(student),
        rank,
        grade_level: student_standing(student),
        weak_subjects: weak_subjects(student),
        strong_subjects: strong_subjects(student),
    }
}

fn by_average_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Summaries sorted by average, highest first. Ranks are 1..=N in that order;
/// equal averages keep input order and still get distinct ranks.
pub fn rank_students(students: &[Student]) -> Vec<StudentSummary> {
    let mut scored: Vec<(&Student, f64)> = students
        .iter()
        .map(|student| (student, student_average(student)))
        .collect();
    scored.sort_by(|a, b| by_average_desc(a.1, b.1));

    scored
        .into_iter()
        .enumerate()
        .map(|(idx, (student, _))| summarize_student(student, idx + 1))
        .collect()
}

pub fn subject_statistics(students: &[Student], subject: &str) -> SubjectStatistics {
    let entries: Vec<(&str, f64)> = students
        .iter()
        .flat_map(|student| {
            student
                .grades
                .iter()
                .filter(|grade| grade.subject == subject)
                .map(move |grade| (student.name.as_str(), grade.score))
        })
        .collect();

    if entries.is_empty() {
        return SubjectStatistics::empty(subject);
    }

    let count = entries.len();
    let total: f64 = entries.iter().map(|(_, score)| score).sum();
    let highest = entries.iter().map(|(_, s)| *s).fold(f64::MIN, f64::max);
    let lowest = entries.iter().map(|(_, s)| *s).fold(f64::MAX, f64::min);
    let first_with = |target: f64| {
        entries
            .iter()
            .find(|(_, score)| *score == target)
            .map(|(name, _)| name.to_string())
            .unwrap_or_default()
    };
    let passed = entries.iter().filter(|(_, score)| *score >= PASS_SCORE).count();

    let mut buckets: BTreeMap<Standing, usize> = BTreeMap::new();
    for (_, score) in &entries {
        *buckets.entry(score_standing(*score)).or_insert(0) += 1;
    }
    let bucket = |standing| buckets.get(&standing).copied().unwrap_or(0);

    SubjectStatistics {
        subject: subject.to_string(),
        average_score: round_to(total / count as f64, 2),
        highest_score: highest,
        lowest_score: lowest,
        highest_score_student: first_with(highest),
        lowest_score_student: first_with(lowest),
        total_students: count,
        pass_rate: pass_rate(passed, count),
        excellent_count: bucket(Standing::Excellent),
        good_count: bucket(Standing::Good),
        average_count: bucket(Standing::Average),
        weak_count: bucket(Standing::Weak),
    }
}

/// Distinct subjects across all students, sorted by name.
pub fn subjects(students: &[Student]) -> Vec<String> {
    students
        .iter()
        .flat_map(|student| student.grades.iter().map(|g| g.subject.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Class-wide figures. Mean and extrema are taken over per-student averages,
/// not raw scores. The class name comes from the first student.
pub fn class_statistics(students: &[Student]) -> ClassStatistics {
    let Some(first) = students.first() else {
        return ClassStatistics::empty();
    };

    let mut averages: Vec<(&str, f64)> = students
        .iter()
        .map(|student| (student.name.as_str(), student_average(student)))
        .collect();

    let total: f64 = averages.iter().map(|(_, avg)| avg).sum();
    let highest = averages.iter().map(|(_, a)| *a).fold(f64::MIN, f64::max);
    let lowest = averages.iter().map(|(_, a)| *a).fold(f64::MAX, f64::min);

    let mut distribution: BTreeMap<Standing, usize> =
        Standing::ALL.iter().map(|standing| (*standing, 0)).collect();
    for student in students {
        *distribution.entry(student_standing(student)).or_insert(0) += 1;
    }

    averages.sort_by(|a, b| by_average_desc(a.1, b.1));
    let to_entry = |(name, score): &(&str, f64)| TopStudent {
        name: name.to_string(),
        score: *score,
    };

    ClassStatistics {
        class_name: first.class_name.clone(),
        total_students: students.len(),
        overall_average: round_to(total / students.len() as f64, 2),
        highest_score: highest,
        lowest_score: lowest,
        grade_distribution: distribution,
        top_students: averages.iter().take(TOP_STUDENT_COUNT).map(to_entry).collect(),
        weak_students: averages
            .iter()
            .filter(|(_, avg)| *avg < PASS_SCORE)
            .map(to_entry)
            .collect(),
        subject_statistics: subjects(students)
            .iter()
            .map(|subject| subject_statistics(students, subject))
            .collect(),
    }
}
