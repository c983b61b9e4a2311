//! Keyed store for finished runs: run id → serialized `AnalysisResult`.
//! Only the CLI talks to it; the analysis core stays stateless.

use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use grade_insight::AnalysisResult;

#[derive(Debug, Clone)]
pub struct RunRecord {
    pub run_id: String,
    pub class_name: String,
    pub total_students: i32,
    pub created_at: DateTime<Utc>,
}

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn save_result(pool: &PgPool, result: &AnalysisResult) -> anyhow::Result<()> {
    let payload = serde_json::to_string(result).context("failed to serialize analysis result")?;
    let total_students = i32::try_from(result.class_statistics.total_students)
        .context("student count does not fit the store")?;

    sqlx::query(
        r#"
        INSERT INTO grade_insight.analysis_runs
        (run_id, class_name, total_students, payload)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (run_id) DO UPDATE
        SET class_name = EXCLUDED.class_name,
            total_students = EXCLUDED.total_students,
            payload = EXCLUDED.payload,
            created_at = now()
        "#,
    )
    .bind(&result.run_id)
    .bind(&result.class_statistics.class_name)
    .bind(total_students)
    .bind(payload)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn fetch_result(pool: &PgPool, run_id: &str) -> anyhow::Result<Option<AnalysisResult>> {
    let row = sqlx::query("SELECT payload FROM grade_insight.analysis_runs WHERE run_id = $1")
        .bind(run_id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let payload: String = row.get("payload");
            let result = serde_json::from_str(&payload)
                .with_context(|| format!("stored payload for run {run_id} is not valid"))?;
            Ok(Some(result))
        }
        None => Ok(None),
    }
}

pub async fn list_runs(pool: &PgPool, limit: i64) -> anyhow::Result<Vec<RunRecord>> {
    let records = sqlx::query(
        "SELECT run_id, class_name, total_students, created_at \
         FROM grade_insight.analysis_runs \
         ORDER BY created_at DESC \
         LIMIT $1",
    )
    .bind(limit.max(1))
    .fetch_all(pool)
    .await?;

    let mut runs = Vec::new();
    for row in records {
        runs.push(RunRecord {
            run_id: row.get("run_id"),
            class_name: row.get("class_name"),
            total_students: row.get("total_students"),
            created_at: row.get("created_at"),
        });
    }

    Ok(runs)
}
