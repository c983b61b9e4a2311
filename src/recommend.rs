//! Recommendation rules. Each rule reads the finished statistics and emits
//! zero or more lines; the default registry runs them in a fixed order and
//! concatenates the output without deduplication.

use crate::models::{ClassStatistics, Standing, StudentSummary};
use crate::standing::{excellence_breakdown, explain_standing_gap};
use crate::stats::format_score;

const WEAK_SUBJECT_SHARE: f64 = 0.25;
const LISTED_WEAK_STUDENTS: usize = 3;
const LISTED_WEAK_SUBJECTS: usize = 3;
const MENTOR_PAIRS: usize = 2;
const STRONG_SUBJECT_AVERAGE: f64 = 7.5;
const CRITICAL_AVERAGE: f64 = 4.0;
const QUALITY_SHARE: f64 = 0.6;
const NEAR_EXCELLENT_AVERAGE: f64 = 7.5;
const LISTED_NEAR_EXCELLENT: usize = 3;

pub struct RuleContext<'a> {
    pub class_stats: &'a ClassStatistics,
    /// Ranked summaries, best average first.
    pub summaries: &'a [StudentSummary],
}

impl RuleContext<'_> {
    fn with_standing(&self, standing: Standing) -> Vec<&StudentSummary> {
        self.summaries
            .iter()
            .filter(|s| s.grade_level == standing)
            .collect()
    }
}

pub trait RecommendationRule {
    fn name(&self) -> &'static str;
    fn apply(&self, ctx: &RuleContext<'_>) -> Vec<String>;
}

/// Subjects where more than a quarter of scores fall in the weak bucket.
pub struct SubjectRemediation;

impl RecommendationRule for SubjectRemediation {
    fn name(&self) -> &'static str {
        "subject_remediation"
    }

    fn apply(&self, ctx: &RuleContext<'_>) -> Vec<String> {
        ctx.class_stats
            .subject_statistics
            .iter()
            .filter(|s| s.total_students > 0)
            .filter_map(|s| {
                let share = s.weak_count as f64 / s.total_students as f64;
                (share > WEAK_SUBJECT_SHARE).then(|| {
                    format!(
                        "{}: {:.1}% of students are weak ({}/{}). Organise remedial sessions.",
                        s.subject,
                        share * 100.0,
                        s.weak_count,
                        s.total_students
                    )
                })
            })
            .collect()
    }
}

pub struct IndividualSupport;

impl RecommendationRule for IndividualSupport {
    fn name(&self) -> &'static str {
        "individual_support"
    }

    fn apply(&self, ctx: &RuleContext<'_>) -> Vec<String> {
        let weak = ctx.with_standing(Standing::Weak);
        if weak.is_empty() {
            return Vec::new();
        }

        let mut lines = vec![format!("Students needing individual support ({}):", weak.len())];
        for summary in weak.iter().take(LISTED_WEAK_STUDENTS) {
            let subjects: Vec<&str> = summary
                .weak_subjects
                .iter()
                .take(LISTED_WEAK_SUBJECTS)
                .map(String::as_str)
                .collect();
            let subjects = if subjects.is_empty() {
                "no single subject below 5.0".to_string()
            } else {
                subjects.join(", ")
            };
            lines.push(format!(
                "  - {} (avg {}) - weak in: {}",
                summary.student.name,
                format_score(summary.average_score),
                subjects
            ));
        }
        if weak.len() > LISTED_WEAK_STUDENTS {
            lines.push(format!(
                "  - ... and {} more",
                weak.len() - LISTED_WEAK_STUDENTS
            ));
        }
        lines
    }
}

/// Pairs excellent and weak students by list position.
pub struct PeerMentoring;

impl RecommendationRule for PeerMentoring {
    fn name(&self) -> &'static str {
        "peer_mentoring"
    }

    fn apply(&self, ctx: &RuleContext<'_>) -> Vec<String> {
        let excellent = ctx.with_standing(Standing::Excellent);
        let weak = ctx.with_standing(Standing::Weak);
        if excellent.is_empty() || weak.is_empty() {
            return Vec::new();
        }

        let mut lines = vec![format!(
            "Study groups: pair {} excellent students with {} weak students for peer support.",
            excellent.len(),
            weak.len()
        )];
        lines.extend(
            excellent
                .iter()
                .zip(weak.iter())
                .take(MENTOR_PAIRS)
                .map(|(mentor, mentee)| {
                    format!(
                        "  - {} (avg {}) supports {} (avg {})",
                        mentor.student.name,
                        format_score(mentor.average_score),
                        mentee.student.name,
                        format_score(mentee.average_score)
                    )
                }),
        );
        lines
    }
}

pub struct SubjectStrengths;

impl RecommendationRule for SubjectStrengths {
    fn name(&self) -> &'static str {
        "subject_strengths"
    }

    fn apply(&self, ctx: &RuleContext<'_>) -> Vec<String> {
        let strong: Vec<&str> = ctx
            .class_stats
            .subject_statistics
            .iter()
            .filter(|s| s.average_score >= STRONG_SUBJECT_AVERAGE)
            .map(|s| s.subject.as_str())
            .collect();
        if strong.is_empty() {
            return Vec::new();
        }
        vec![format!(
            "Class strengths: {}. Consider applying the same teaching approach to other subjects.",
            strong.join(", ")
        )]
    }
}

pub struct CriticalRisk;

impl RecommendationRule for CriticalRisk {
    fn name(&self) -> &'static str {
        "critical_risk"
    }

    fn apply(&self, ctx: &RuleContext<'_>) -> Vec<String> {
        let critical = ctx
            .summaries
            .iter()
            .filter(|s| s.average_score < CRITICAL_AVERAGE)
            .count();
        if critical == 0 {
            return Vec::new();
        }
        vec![format!(
            "WARNING: {critical} student(s) average below {CRITICAL_AVERAGE:.1}; urgent intervention is needed to prevent dropout."
        )]
    }
}

pub struct ClassQuality;

impl RecommendationRule for ClassQuality {
    fn name(&self) -> &'static str {
        "class_quality"
    }

    fn apply(&self, ctx: &RuleContext<'_>) -> Vec<String> {
        let total = ctx.class_stats.total_students;
        if total == 0 {
            return Vec::new();
        }
        let good = ctx.class_stats.count(Standing::Excellent) + ctx.class_stats.count(Standing::Good);
        let share = good as f64 / total as f64;
        if share < QUALITY_SHARE {
            return Vec::new();
        }
        vec![format!(
            "Strong class overall: {good}/{total} students rated good or better ({:.1}%).",
            share * 100.0
        )]
    }
}

pub struct NearExcellent;

impl RecommendationRule for NearExcellent {
    fn name(&self) -> &'static str {
        "near_excellent"
    }

    fn apply(&self, ctx: &RuleContext<'_>) -> Vec<String> {
        let near: Vec<(String, String)> = ctx
            .summaries
            .iter()
            .map(|s| (s.student.name.clone(), explain_standing_gap(&s.student)))
            .filter(|(_, check)| !check.is_excellent && check.average_score >= NEAR_EXCELLENT_AVERAGE)
            .map(|(name, check)| (name, check.details))
            .collect();
        if near.is_empty() {
            return Vec::new();
        }

        let mut lines = vec!["Students close to an excellent rating:".to_string()];
        lines.extend(
            near.iter()
                .take(LISTED_NEAR_EXCELLENT)
                .map(|(name, details)| format!("  - {name}: {details}")),
        );
        lines
    }
}

pub struct ExcellenceConditions;

impl RecommendationRule for ExcellenceConditions {
    fn name(&self) -> &'static str {
        "excellence_conditions"
    }

    fn apply(&self, ctx: &RuleContext<'_>) -> Vec<String> {
        let breakdown = excellence_breakdown(ctx.summaries.iter().map(|s| &s.student));
        let total = breakdown.total_students;
        if total == 0 {
            return Vec::new();
        }
        vec![format!(
            "Excellence conditions: {}/{total} average >= 8.0, {}/{total} have no score below 6.5, \
             {}/{total} reach 8.0 in math or literature.",
            breakdown.average_met, breakdown.min_score_met, breakdown.math_literature_met
        )]
    }
}

pub fn default_rules() -> Vec<Box<dyn RecommendationRule>> {
    vec![
        Box::new(SubjectRemediation),
        Box::new(IndividualSupport),
        Box::new(PeerMentoring),
        Box::new(SubjectStrengths),
        Box::new(CriticalRisk),
        Box::new(ClassQuality),
        Box::new(NearExcellent),
        Box::new(ExcellenceConditions),
    ]
}

pub fn generate_recommendations(
    class_stats: &ClassStatistics,
    summaries: &[StudentSummary],
) -> Vec<String> {
    let ctx = RuleContext {
        class_stats,
        summaries,
    };
    default_rules()
        .iter()
        .flat_map(|rule| {
            let lines = rule.apply(&ctx);
            tracing::trace!(rule = rule.name(), lines = lines.len(), "applied rule");
            lines
        })
        .collect()
}
