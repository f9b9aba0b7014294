//! Merge every JSON file in a directory into one table.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{CrosscultError, Result};
use crate::inference::{guess_labels, FilenameGuess};
use crate::input::{Normalizer, SourceMetadata};
use crate::schema::{Table, Value};

/// Provenance column added to every merged row.
pub const SOURCE_FILE_COLUMN: &str = "source_file";

/// A file that contributed no rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub file: String,
    pub reason: String,
}

/// What happened to each input file during a merge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeReport {
    /// Number of `*.json` files discovered.
    pub files_found: usize,
    /// Files that produced rows, in merge order.
    pub sources: Vec<SourceMetadata>,
    /// Files that were skipped.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedFile>,
    /// Rows in the merged table.
    pub total_rows: usize,
}

/// List `*.json` files directly inside `dir`, sorted by name.
///
/// Hidden files are ignored and the search is not recursive. A missing or
/// empty directory is reported as [`CrosscultError::NoInput`].
pub fn discover_json_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let no_input = || CrosscultError::NoInput {
        dir: dir.to_path_buf(),
    };

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(no_input()),
        Err(e) => return Err(CrosscultError::io(dir, e)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CrosscultError::io(dir, e))?;
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') || !name.ends_with(".json") || !path.is_file() {
            continue;
        }
        files.push(path);
    }

    if files.is_empty() {
        return Err(no_input());
    }
    files.sort();
    Ok(files)
}

/// Merges a directory of evaluation files.
#[derive(Debug, Clone, Default)]
pub struct CorpusMerger {
    normalizer: Normalizer,
    parallel: bool,
}

impl CorpusMerger {
    /// Create a sequential merger with the default normalizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom normalizer.
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Normalize files in parallel. Merge order is unchanged.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Merge every `*.json` file in `dir`.
    ///
    /// Files that cannot be read or parsed are skipped. The merged table may
    /// be empty when every file was skipped; only a directory with no JSON
    /// files at all is an error.
    pub fn merge(&self, dir: impl AsRef<Path>) -> Result<(Table, MergeReport)> {
        let files = discover_json_files(dir)?;

        let parsed: Vec<Result<(Table, SourceMetadata)>> = if self.parallel {
            files
                .par_iter()
                .map(|path| self.normalizer.parse_file(path))
                .collect()
        } else {
            files
                .iter()
                .map(|path| self.normalizer.parse_file(path))
                .collect()
        };

        let mut report = MergeReport {
            files_found: files.len(),
            ..MergeReport::default()
        };
        let mut merged = Table::new();

        for (path, result) in files.iter().zip(parsed) {
            let name = base_name(path);
            let (mut table, source) = match result {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!(file = %name, error = %e, "skipping unreadable file");
                    report.skipped.push(SkippedFile {
                        file: name,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            if table.is_empty() {
                warn!(file = %name, "skipping: could not parse");
                report.skipped.push(SkippedFile {
                    file: name,
                    reason: format!("no records ({})", source.layout),
                });
                continue;
            }

            backfill_labels(&mut table, guess_labels(path));
            table.fill_column(SOURCE_FILE_COLUMN, Value::from(name.as_str()));

            info!(file = %name, rows = table.row_count(), layout = %source.layout, "read file");
            merged.append(table);
            report.sources.push(source);
        }

        report.total_rows = merged.row_count();
        info!(
            files = report.files_found,
            skipped = report.skipped.len(),
            rows = report.total_rows,
            "merge complete"
        );
        Ok((merged, report))
    }
}

/// Fill `culture`/`model` from the file name guess when the column is
/// absent or entirely null. Partially null columns are left alone.
fn backfill_labels(table: &mut Table, guess: FilenameGuess) {
    if table.is_all_null("culture") {
        table.fill_column("culture", Value::from(guess.culture.as_str()));
    }
    if table.is_all_null("model") {
        table.fill_column("model", Value::from(guess.model.as_str()));
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
