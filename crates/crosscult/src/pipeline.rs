//! End-to-end pipeline: merge, preprocess, write artifacts.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::{group_moments, unique_values, GroupMoments};
use crate::corpus::{CorpusMerger, MergeReport};
use crate::error::{CrosscultError, Result};
use crate::input::{Normalizer, NormalizerConfig};
use crate::output::{
    write_dashboard, write_figures, write_report, write_table_csv, write_tables, RenderConfig,
};
use crate::schema::Table;
use crate::transform::{PreprocessSummary, Preprocessor, MODEL_STANDARDIZED_COLUMN};

/// Configuration for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding the raw `*.json` files.
    pub raw_dir: PathBuf,
    /// Directory receiving figures, tables, dashboard and report.
    pub out_dir: PathBuf,
    /// Path of the merged CSV.
    pub csv_path: PathBuf,
    /// Write the interactive dashboard.
    pub with_dashboard: bool,
    /// Normalize input files in parallel.
    pub parallel: bool,
    /// Normalizer configuration.
    pub normalizer: NormalizerConfig,
    /// Figure and dashboard styling.
    pub render: RenderConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from("data/raw"),
            out_dir: PathBuf::from("reports"),
            csv_path: PathBuf::from("data/processed/merged_cross_cultural_data.csv"),
            with_dashboard: false,
            parallel: false,
            normalizer: NormalizerConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn with_raw_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.raw_dir = dir.into();
        self
    }

    pub fn with_out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = dir.into();
        self
    }

    pub fn with_csv_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.csv_path = path.into();
        self
    }

    pub fn with_dashboard(mut self, enabled: bool) -> Self {
        self.with_dashboard = enabled;
        self
    }

    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn with_render(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }
}

/// Headline numbers printed at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub samples: usize,
    /// Distinct cultures; `None` without a culture column.
    pub cultures: Option<usize>,
    /// Distinct standardized models; `None` without that column.
    pub models: Option<usize>,
    /// Culture with the lowest mean response time.
    pub fastest_culture: Option<String>,
    /// Standardized model with the lowest mean response time.
    pub fastest_model: Option<String>,
}

impl RunSummary {
    pub fn from_table(table: &Table) -> Self {
        let fastest = |key: &str| group_moments(table, key, "response_time").and_then(|g| fastest_group(&g));
        Self {
            samples: table.row_count(),
            cultures: unique_values(table, "culture").map(|v| v.len()),
            models: unique_values(table, MODEL_STANDARDIZED_COLUMN).map(|v| v.len()),
            fastest_culture: fastest("culture"),
            fastest_model: fastest(MODEL_STANDARDIZED_COLUMN),
        }
    }
}

fn fastest_group(groups: &[GroupMoments]) -> Option<String> {
    groups
        .iter()
        .filter_map(|g| g.mean().map(|m| (m, &g.key)))
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(_, key)| key.clone())
}

/// What happened to the optional dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardStatus {
    /// Not requested.
    Disabled,
    Written(PathBuf),
    /// Requested but not available in this build.
    Unavailable(String),
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// The final preprocessed table.
    pub table: Table,
    pub merge: MergeReport,
    pub preprocess: PreprocessSummary,
    /// Every file written, in order.
    pub artifacts: Vec<PathBuf>,
    pub dashboard: DashboardStatus,
    pub summary: RunSummary,
}

/// Outcome of [`Pipeline::run`].
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Every input file was skipped; nothing was written.
    NoUsableData(MergeReport),
    Completed(Box<RunResult>),
}

/// The merge-and-report pipeline.
pub struct Pipeline {
    config: PipelineConfig,
    merger: CorpusMerger,
    preprocessor: Preprocessor,
}

impl Pipeline {
    /// Create a pipeline with default configuration.
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: PipelineConfig) -> Self {
        let merger = CorpusMerger::new()
            .with_normalizer(Normalizer::with_config(config.normalizer.clone()))
            .with_parallel(config.parallel);
        Self {
            config,
            merger,
            preprocessor: Preprocessor::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Merge and preprocess the raw directory without writing anything.
    pub fn load(&self) -> Result<(Table, MergeReport, PreprocessSummary)> {
        let (mut table, report) = self.merger.merge(&self.config.raw_dir)?;
        if table.is_empty() {
            return Err(CrosscultError::NoUsableData);
        }
        let preprocess = self.preprocessor.apply(&mut table)?;
        Ok((table, report, preprocess))
    }

    /// Run the whole pipeline.
    ///
    /// Fails with [`CrosscultError::NoInput`] when the raw directory holds no
    /// JSON files. When files exist but none yields rows, returns
    /// [`RunOutcome::NoUsableData`] without writing anything.
    pub fn run(&self) -> Result<RunOutcome> {
        let (mut table, merge) = self.merger.merge(&self.config.raw_dir)?;
        if table.is_empty() {
            warn!(skipped = merge.skipped.len(), "no usable data");
            return Ok(RunOutcome::NoUsableData(merge));
        }
        let preprocess = self.preprocessor.apply(&mut table)?;

        let mut artifacts = Vec::new();

        write_table_csv(&table, &self.config.csv_path)?;
        info!(
            path = %self.config.csv_path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            "saved merged data"
        );
        artifacts.push(self.config.csv_path.clone());

        let out = self.config.out_dir.as_path();
        artifacts.extend(write_tables(&table, &merge, out.join("tables"))?);
        artifacts.extend(
            write_figures(&table, out.join("figures"), &self.config.render)?
                .into_iter()
                .map(|f| f.path),
        );

        let dashboard = self.dashboard(&table, out)?;
        if let DashboardStatus::Written(ref path) = dashboard {
            artifacts.push(path.clone());
        }

        artifacts.push(write_report(&table, out)?);

        let summary = RunSummary::from_table(&table);
        Ok(RunOutcome::Completed(Box::new(RunResult {
            table,
            merge,
            preprocess,
            artifacts,
            dashboard,
            summary,
        })))
    }

    fn dashboard(&self, table: &Table, out: &Path) -> Result<DashboardStatus> {
        if !self.config.with_dashboard {
            return Ok(DashboardStatus::Disabled);
        }
        match write_dashboard(table, out, &self.config.render) {
            Ok(path) => Ok(DashboardStatus::Written(path)),
            Err(CrosscultError::Unavailable(reason)) => {
                warn!(%reason, "skipping interactive dashboard");
                Ok(DashboardStatus::Unavailable(reason))
            }
            Err(e) => Err(e),
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Record, Value};

    #[test]
    fn test_default_config_matches_cli_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.raw_dir, PathBuf::from("data/raw"));
        assert_eq!(config.out_dir, PathBuf::from("reports"));
        assert!(!config.with_dashboard);
    }

    #[test]
    fn test_summary_fastest() {
        let rows = [("Chinese", "GPT-4", 20.0), ("German", "Claude-4", 8.0), ("Chinese", "Claude-4", 10.0)];
        let table = Table::from_records(
            rows.into_iter()
                .map(|(c, m, rt)| {
                    let mut r = Record::new();
                    r.insert("culture".into(), c.into());
                    r.insert(MODEL_STANDARDIZED_COLUMN.into(), m.into());
                    r.insert("response_time".into(), Value::Float(rt));
                    r
                })
                .collect(),
        );
        let summary = RunSummary::from_table(&table);

        assert_eq!(summary.samples, 3);
        assert_eq!(summary.cultures, Some(2));
        assert_eq!(summary.models, Some(2));
        assert_eq!(summary.fastest_culture.as_deref(), Some("German"));
        assert_eq!(summary.fastest_model.as_deref(), Some("Claude-4"));
    }

    #[test]
    fn test_summary_without_response_time() {
        let table = Table::from_records(vec![Record::from([("culture".to_string(), Value::from("Swedish"))])]);
        let summary = RunSummary::from_table(&table);
        assert_eq!(summary.fastest_culture, None);
        assert_eq!(summary.models, None);
    }
}
