//! Per-file provenance.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shape a JSON file was recognized as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// `{"task_results": [{basic_info, interaction_data}, ...]}`.
    TaskResults,
    /// A top-level array of records.
    Array,
    /// An object holding its records under a conventional key.
    Container(String),
    /// A single object flattened into one row.
    Object,
    /// Newline-delimited JSON records.
    JsonLines,
    /// Nothing usable was found.
    Unrecognized,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::TaskResults => write!(f, "task_results"),
            Layout::Array => write!(f, "array"),
            Layout::Container(key) => write!(f, "container:{}", key),
            Layout::Object => write!(f, "object"),
            Layout::JsonLines => write!(f, "json_lines"),
            Layout::Unrecognized => write!(f, "unrecognized"),
        }
    }
}

/// Metadata about one source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Recognized layout.
    pub layout: Layout,
    /// Number of rows produced.
    pub row_count: usize,
    /// Number of columns produced.
    pub column_count: usize,
    /// When the file was read.
    pub analyzed_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been normalized.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        layout: Layout,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            layout,
            row_count,
            column_count,
            analyzed_at: Utc::now(),
        }
    }
}
