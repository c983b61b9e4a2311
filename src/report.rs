use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::models::{AnalysisResult, Standing};
use crate::stats::format_score;

pub fn build_report(result: &AnalysisResult, generated_at: DateTime<Utc>) -> String {
    let stats = &result.class_statistics;
    let mut output = String::new();
    let class_label = if stats.class_name.is_empty() {
        "unknown class"
    } else {
        stats.class_name.as_str()
    };

    let _ = writeln!(output, "# Grade Analysis Report");
    let _ = writeln!(
        output,
        "Class {} (run {}, generated {})",
        class_label,
        result.run_id,
        generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Class Overview");

    if stats.total_students == 0 {
        let _ = writeln!(output, "No valid grade rows were found in this upload.");
        return output;
    }

    let _ = writeln!(output, "- Students: {}", stats.total_students);
    let _ = writeln!(output, "- Subjects: {}", stats.subject_statistics.len());
    let _ = writeln!(output, "- Class average: {:.2}", stats.overall_average);
    let _ = writeln!(
        output,
        "- Highest / lowest student average: {:.2} / {:.2}",
        stats.highest_score, stats.lowest_score
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Standing Distribution");
    for standing in Standing::ALL {
        let _ = writeln!(output, "- {}: {}", standing, stats.count(standing));
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Students");
    for (idx, top) in stats.top_students.iter().enumerate() {
        let _ = writeln!(output, "{}. {} ({:.2})", idx + 1, top.name, top.score);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Students Needing Support");
    if stats.weak_students.is_empty() {
        let _ = writeln!(output, "No student averages below 5.0.");
    } else {
        for weak in &stats.weak_students {
            let _ = writeln!(output, "- {} ({:.2})", weak.name, weak.score);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Subject Statistics");
    let _ = writeln!(
        output,
        "| Subject | Avg | High | Low | Pass % | Excellent | Good | Average | Weak |"
    );
    let _ = writeln!(output, "|---|---|---|---|---|---|---|---|---|");
    for subject in &stats.subject_statistics {
        let _ = writeln!(
            output,
            "| {} | {:.2} | {} ({}) | {} ({}) | {:.1} | {} | {} | {} | {} |",
            subject.subject,
            subject.average_score,
            format_score(subject.highest_score),
            subject.highest_score_student,
            format_score(subject.lowest_score),
            subject.lowest_score_student,
            subject.pass_rate,
            subject.excellent_count,
            subject.good_count,
            subject.average_count,
            subject.weak_count
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Student Rankings");
    for summary in &result.student_summaries {
        let _ = writeln!(
            output,
            "{}. {} [{}] avg {:.2} - {}",
            summary.rank,
            summary.student.name,
            summary.student.id,
            summary.average_score,
            summary.grade_level
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recommendations");
    if result.recommendations.is_empty() {
        let _ = writeln!(output, "No recommendations for this class.");
    } else {
        for line in &result.recommendations {
            if line.starts_with(' ') {
                let _ = writeln!(output, "  {}", line.trim_start());
            } else {
                let _ = writeln!(output, "- {line}");
            }
        }
    }

    output
}
