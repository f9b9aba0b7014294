//! Crosscult: merge and report on cross-cultural AI evaluation records.
//!
//! Crosscult reads a directory of JSON evaluation files, normalizes every
//! file into rows regardless of its layout, merges them into one table and
//! writes a CSV, summary tables, static figures, an optional interactive
//! dashboard and a markdown report.
//!
//! # Core Principles
//!
//! - **Layout-agnostic**: task-result documents, arrays, containers, single
//!   objects and JSON Lines are all accepted
//! - **Forgiving**: an unreadable file is skipped, never fatal
//! - **Traceable**: every row records the file it came from
//!
//! # Example
//!
//! ```no_run
//! use crosscult::{Pipeline, PipelineConfig, RunOutcome};
//!
//! let config = PipelineConfig::default().with_raw_dir("data/raw");
//! match Pipeline::with_config(config).run().unwrap() {
//!     RunOutcome::Completed(result) => println!("Samples: {}", result.summary.samples),
//!     RunOutcome::NoUsableData(report) => println!("Skipped: {}", report.skipped.len()),
//! }
//! ```

pub mod analysis;
pub mod corpus;
pub mod error;
pub mod inference;
pub mod input;
pub mod output;
pub mod schema;
pub mod transform;

mod pipeline;

pub use crate::pipeline::{
    DashboardStatus, Pipeline, PipelineConfig, RunOutcome, RunResult, RunSummary,
};
pub use corpus::{CorpusMerger, MergeReport, SkippedFile};
pub use error::{CrosscultError, Result};
pub use inference::{guess_labels, standardize_model, Culture, ModelFamily};
pub use input::{CsvReader, Layout, Normalizer, NormalizerConfig, SourceMetadata};
pub use output::RenderConfig;
pub use schema::{Record, Table, Value};
pub use transform::{PreprocessSummary, Preprocessor};
