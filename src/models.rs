use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One cleaned long-form row: a single score for one student in one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeRecord {
    pub student_name: String,
    pub class_name: String,
    pub subject: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub subject: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub class_name: String,
    pub grades: Vec<Grade>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Standing {
    Excellent,
    Good,
    Average,
    Weak,
}

impl Standing {
    pub const ALL: [Standing; 4] = [
        Standing::Excellent,
        Standing::Good,
        Standing::Average,
        Standing::Weak,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Standing::Excellent => "Excellent",
            Standing::Good => "Good",
            Standing::Average => "Average",
            Standing::Weak => "Weak",
        }
    }
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub student: Student,
    pub average_score: f64,
    pub rank: usize,
    pub grade_level: Standing,
    pub weak_subjects: Vec<String>,
    pub strong_subjects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopStudent {
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectStatistics {
    pub subject: String,
    pub average_score: f64,
    pub highest_score: f64,
    pub lowest_score: f64,
    pub highest_score_student: String,
    pub lowest_score_student: String,
    pub total_students: usize,
    pub pass_rate: f64,
    pub excellent_count: usize,
    pub good_count: usize,
    pub average_count: usize,
    pub weak_count: usize,
}

impl SubjectStatistics {
    pub fn empty(subject: &str) -> Self {
        Self {
            subject: subject.to_string(),
            average_score: 0.0,
            highest_score: 0.0,
            lowest_score: 0.0,
            highest_score_student: String::new(),
            lowest_score_student: String::new(),
            total_students: 0,
            pass_rate: 0.0,
            excellent_count: 0,
            good_count: 0,
            average_count: 0,
            weak_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassStatistics {
    pub class_name: String,
    pub total_students: usize,
    pub overall_average: f64,
    pub highest_score: f64,
    pub lowest_score: f64,
    pub grade_distribution: BTreeMap<Standing, usize>,
    pub top_students: Vec<TopStudent>,
    pub weak_students: Vec<TopStudent>,
    pub subject_statistics: Vec<SubjectStatistics>,
}

impl ClassStatistics {
    pub fn empty() -> Self {
        Self {
            class_name: String::new(),
            total_students: 0,
            overall_average: 0.0,
            highest_score: 0.0,
            lowest_score: 0.0,
            grade_distribution: BTreeMap::new(),
            top_students: Vec::new(),
            weak_students: Vec::new(),
            subject_statistics: Vec::new(),
        }
    }

    pub fn count(&self, standing: Standing) -> usize {
        self.grade_distribution.get(&standing).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub run_id: String,
    pub class_statistics: ClassStatistics,
    pub student_summaries: Vec<StudentSummary>,
    pub recommendations: Vec<String>,
}
