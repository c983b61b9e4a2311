use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use grade_insight::analysis::{analyze_complete, students_from_upload, subject_count};
use grade_insight::config::{IngestOptions, DEFAULT_WIDE_CLASS};
use grade_insight::report;

mod db;

#[derive(Parser)]
#[command(name = "grade-insight")]
#[command(about = "Student grade spreadsheet analyzer", long_about = None)]
struct Cli {
    /// Postgres connection string for the result store
    #[arg(long, env = "DATABASE_URL", global = true, hide_env_values = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the result store schema
    InitDb,
    /// Analyze a grade spreadsheet (.xlsx, .xls or .csv)
    Analyze {
        #[arg(long)]
        file: PathBuf,
        /// Class assigned to students read from a wide (one column per subject) sheet
        #[arg(long = "class", env = "GRADE_WIDE_CLASS", default_value = DEFAULT_WIDE_CLASS)]
        class_label: String,
        #[arg(long)]
        run_id: Option<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
        /// Also write the full result as JSON
        #[arg(long)]
        json: Option<PathBuf>,
        /// Store the result under its run id
        #[arg(long)]
        save: bool,
    },
    /// Render a stored run as a markdown report
    Show {
        #[arg(long)]
        run_id: String,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// List recently stored runs
    Runs {
        #[arg(long, default_value_t = 10)]
        limit: i64,
    },
}

async fn connect(database_url: Option<&str>) -> anyhow::Result<PgPool> {
    let database_url =
        database_url.context("DATABASE_URL must be set to use the result store")?;
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .context("failed to connect to Postgres")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grade_insight=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::InitDb => {
            let pool = connect(cli.database_url.as_deref()).await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Analyze {
            file,
            class_label,
            run_id,
            out,
            json,
            save,
        } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let filename = file
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or_default();
            let options = IngestOptions::with_class(class_label);

            let students = students_from_upload(&bytes, filename, &options)
                .with_context(|| format!("could not process {}", file.display()))?;
            println!(
                "Loaded {} students across {} subjects from {}.",
                students.len(),
                subject_count(&students),
                file.display()
            );

            let run_id = run_id.unwrap_or_else(|| Uuid::new_v4().to_string());
            let result = analyze_complete(&run_id, &students);

            std::fs::write(&out, report::build_report(&result, Utc::now()))?;
            println!("Report written to {}.", out.display());

            if let Some(path) = json {
                let payload = serde_json::to_string_pretty(&result)?;
                std::fs::write(&path, payload)?;
                println!("JSON result written to {}.", path.display());
            }

            if save {
                let pool = connect(cli.database_url.as_deref()).await?;
                db::save_result(&pool, &result).await?;
                info!(run_id = %result.run_id, "stored analysis result");
                println!("Stored run {}.", result.run_id);
            }
        }
        Commands::Show { run_id, out } => {
            let pool = connect(cli.database_url.as_deref()).await?;
            let Some(result) = db::fetch_result(&pool, &run_id).await? else {
                println!("No stored run with id {run_id}.");
                return Ok(());
            };
            std::fs::write(&out, report::build_report(&result, Utc::now()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Runs { limit } => {
            let pool = connect(cli.database_url.as_deref()).await?;
            let runs = db::list_runs(&pool, limit).await?;

            if runs.is_empty() {
                println!("No stored runs.");
                return Ok(());
            }

            println!("Recent analysis runs:");
            for run in runs {
                println!(
                    "- {} (class {}, {} students) at {}",
                    run.run_id,
                    run.class_name,
                    run.total_students,
                    run.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
    }

    Ok(())
}
