//! JSON record normalizer.
//!
//! Turns one JSON file into a flat table. Three input shapes are handled, in
//! priority order:
//!
//! 1. An object with a `task_results` list of `{basic_info, interaction_data}`
//!    entries, extracted into fixed named columns.
//! 2. Any other whole JSON document: an array of records, an object holding a
//!    list under `results`/`data`/`items`/`records`, or a single object.
//! 3. Newline-delimited JSON when the whole document does not parse.
//!
//! Bare `NaN`, `Infinity` and `-Infinity` tokens are read as `null`.
//!
//! Unusable content yields an empty table rather than an error.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde_json::{Map, Value as Json};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::{CrosscultError, Result};
use crate::schema::{Record, Table, Value};

use super::flatten::{flatten_object, flatten_records, DEFAULT_MAX_LEVEL};
use super::source::{Layout, SourceMetadata};

/// Key of the structured evaluation schema.
pub const TASK_RESULTS_KEY: &str = "task_results";

/// Conventional keys holding a list of records, tried in order.
pub const CONTAINER_KEYS: &[&str] = &["results", "data", "items", "records"];

/// `basic_info` fields and their column names.
const BASIC_FIELDS: &[(&str, &str)] = &[
    ("TaskID", "task_id"),
    ("Timestamp", "timestamp"),
    ("Model", "model"),
    ("Temperature", "temperature"),
    ("Culture", "culture"),
    ("Function", "function"),
    ("Complexity", "complexity"),
    ("Language", "language"),
    ("Scenario", "scenario"),
];

/// `interaction_data` fields and their column names.
const INTERACTION_FIELDS: &[(&str, &str)] = &[
    ("Prompt_Text", "prompt_text"),
    ("Response_Text", "response_text"),
    ("Response_Time", "response_time"),
    ("Word_Count", "word_count"),
    ("Cultural_Keywords", "cultural_keywords"),
    ("Model_Version", "model_version"),
];

const KEYWORDS_FIELD: &str = "Cultural_Keywords";

/// Normalizer configuration.
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    /// Nesting levels collapsed into dotted names by generic flattening.
    pub max_level: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
        }
    }
}

/// Normalizes JSON evaluation files into tables.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    /// Create a new normalizer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a normalizer with custom configuration.
    pub fn with_config(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Read and normalize a file.
    ///
    /// Only I/O failures are errors; content that cannot be parsed produces
    /// an empty table with [`Layout::Unrecognized`].
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Table, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| CrosscultError::io(path, e))?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| CrosscultError::io(path, e))?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let (table, layout) = match std::str::from_utf8(&contents) {
            Ok(text) => self.parse_str(text),
            Err(e) => {
                warn!(file = %path.display(), error = %e, "file is not valid UTF-8");
                (Table::new(), Layout::Unrecognized)
            }
        };

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            contents.len() as u64,
            layout.clone(),
            table.row_count(),
            table.column_count(),
        );
        Ok((table, metadata))
    }

    /// Normalize JSON text.
    pub fn parse_str(&self, text: &str) -> (Table, Layout) {
        let text = text.trim_start_matches('\u{feff}').trim();

        match parse_json(text) {
            Ok(document) => self.parse_document(&document),
            Err(_) => self.parse_lines(text),
        }
    }

    fn parse_document(&self, document: &Json) -> (Table, Layout) {
        match document {
            Json::Object(object) => {
                if let Some(Json::Array(tasks)) = object.get(TASK_RESULTS_KEY) {
                    return (extract_task_results(tasks), Layout::TaskResults);
                }
                for key in CONTAINER_KEYS {
                    if let Some(Json::Array(records)) = object.get(*key) {
                        return (
                            flatten_records(records, self.config.max_level),
                            Layout::Container(key.to_string()),
                        );
                    }
                }
                let mut table = Table::new();
                table.push_record(flatten_object(object, self.config.max_level));
                (table, Layout::Object)
            }
            Json::Array(records) => (flatten_records(records, self.config.max_level), Layout::Array),
            _ => (Table::new(), Layout::Unrecognized),
        }
    }

    fn parse_lines(&self, text: &str) -> (Table, Layout) {
        let mut records = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_json(line) {
                Ok(record) => records.push(record),
                Err(e) => debug!(line = line_no + 1, error = %e, "dropping malformed line"),
            }
        }

        if records.is_empty() {
            return (Table::new(), Layout::Unrecognized);
        }
        (flatten_records(&records, self.config.max_level), Layout::JsonLines)
    }
}

/// Extract one row per `task_results` entry.
/// Strict JSON, retried with non-finite number tokens read as `null`.
fn parse_json(text: &str) -> serde_json::Result<Json> {
    serde_json::from_str(text).or_else(|err| match null_non_finite(text) {
        Some(rewritten) => serde_json::from_str(&rewritten),
        None => Err(err),
    })
}

const NON_FINITE_TOKENS: [&str; 3] = ["-Infinity", "Infinity", "NaN"];

/// Replace `NaN`, `Infinity` and `-Infinity` outside string literals with
/// `null`. `None` when there is nothing to replace.
fn null_non_finite(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let is_word = |b: u8| b.is_ascii_alphanumeric() || b == b'_' || b == b'.';

    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut in_string = false;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            match b {
                b'\\' => i += 1,
                b'"' => in_string = false,
                _ => {}
            }
            i += 1;
            continue;
        }
        if b == b'"' {
            in_string = true;
            i += 1;
            continue;
        }

        let at_boundary = i == 0 || !is_word(bytes[i - 1]);
        let token = NON_FINITE_TOKENS.iter().find(|token| {
            bytes[i..].starts_with(token.as_bytes()) && !bytes.get(i + token.len()).copied().is_some_and(is_word)
        });
        match token {
            Some(token) if at_boundary => {
                out.push_str(&text[copied..i]);
                out.push_str("null");
                i += token.len();
                copied = i;
            }
            _ => i += 1,
        }
    }

    if copied == 0 {
        return None;
    }
    out.push_str(&text[copied..]);
    Some(out)
}

fn extract_task_results(tasks: &[Json]) -> Table {
    let empty = Map::new();
    let mut table = Table::new();

    for (index, task) in tasks.iter().enumerate() {
        let (basic, interaction) = match task {
            Json::Object(task) => (
                sub_object(task, "basic_info", index).unwrap_or(&empty),
                sub_object(task, "interaction_data", index).unwrap_or(&empty),
            ),
            other => {
                warn!(index, kind = json_kind(other), "task entry is not an object");
                (&empty, &empty)
            }
        };

        let mut record = Record::new();
        for (field, column) in BASIC_FIELDS {
            record.insert(column.to_string(), field_value(basic, field));
        }
        for (field, column) in INTERACTION_FIELDS {
            let value = if *field == KEYWORDS_FIELD {
                keywords_value(interaction.get(*field))
            } else {
                field_value(interaction, field)
            };
            record.insert(column.to_string(), value);
        }
        table.push_record(record);
    }
    table
}

/// A nested object of a task entry. Missing or null reads as absent; any
/// other non-object value is reported and treated as absent.
fn sub_object<'a>(task: &'a Map<String, Json>, key: &str, index: usize) -> Option<&'a Map<String, Json>> {
    match task.get(key) {
        Some(Json::Object(object)) => Some(object),
        None | Some(Json::Null) => None,
        Some(other) => {
            warn!(index, key, kind = json_kind(other), "expected an object, ignoring");
            None
        }
    }
}

fn field_value(object: &Map<String, Json>, field: &str) -> Value {
    object.get(field).map(Value::from_json).unwrap_or_default()
}

/// Keyword lists are joined with ", "; scalars pass through unchanged.
fn keywords_value(value: Option<&Json>) -> Value {
    match value {
        Some(Json::Array(items)) => {
            let joined: Vec<String> = items
                .iter()
                .map(|item| match item {
                    Json::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect();
            Value::Str(joined.join(", "))
        }
        Some(other) => Value::from_json(other),
        None => Value::Null,
    }
}

fn json_kind(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
