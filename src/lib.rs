//! Student grade ingestion and analysis.
//!
//! Spreadsheet data in long or wide layout is normalised into students, each
//! student is classified, and class and subject statistics plus improvement
//! recommendations are produced for one run.

pub mod analysis;
pub mod columns;
pub mod config;
pub mod error;
pub mod ingest;
pub mod layout;
pub mod models;
pub mod recommend;
pub mod report;
pub mod roster;
pub mod standing;
pub mod stats;
pub mod table;
pub mod text;

pub use analysis::{analyze_complete, normalize_and_build_students, students_from_upload};
pub use config::IngestOptions;
pub use error::{Error, Result};
pub use models::{AnalysisResult, Standing, Student};
pub use table::{Cell, RawTable};
