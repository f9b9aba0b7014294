//! Summary tables: missing rates, group counts and merge provenance.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::analysis::{group_counts, missing_rates};
use crate::corpus::MergeReport;
use crate::error::{CrosscultError, Result};
use crate::schema::Table;
use crate::transform::MODEL_STANDARDIZED_COLUMN;

use super::ensure_dir;

pub const MISSING_RATE_FILE: &str = "missing_rate.csv";
pub const COUNTS_FILE: &str = "counts_by_culture_model.csv";
pub const SOURCES_FILE: &str = "source_files.json";

/// Write every summary table into `dir`, returning the paths written.
pub fn write_tables(table: &Table, report: &MergeReport, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    ensure_dir(dir)?;

    let mut written = Vec::new();

    let path = dir.join(MISSING_RATE_FILE);
    write_missing_rate(table, &path)?;
    written.push(path);

    let path = dir.join(COUNTS_FILE);
    if write_counts(table, &path)? {
        written.push(path);
    }

    let path = dir.join(SOURCES_FILE);
    write_sources(report, &path)?;
    written.push(path);

    for path in &written {
        info!(path = %path.display(), "saved table");
    }
    Ok(written)
}

/// Per-column null fraction, highest first.
pub fn write_missing_rate(table: &Table, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["column", "missing_rate"])?;
    for rate in missing_rates(table) {
        writer.write_record([rate.column, rate.missing_rate.to_string()])?;
    }
    writer.flush().map_err(|e| CrosscultError::io(path, e))?;
    Ok(())
}

/// Row counts by culture and standardized model. Returns `false` without
/// writing when either column is missing.
pub fn write_counts(table: &Table, path: &Path) -> Result<bool> {
    let Some(counts) = group_counts(table, &["culture", MODEL_STANDARDIZED_COLUMN]) else {
        return Ok(false);
    };
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["culture", MODEL_STANDARDIZED_COLUMN, "n"])?;
    for count in counts {
        let mut record = count.keys;
        record.push(count.n.to_string());
        writer.write_record(&record)?;
    }
    writer.flush().map_err(|e| CrosscultError::io(path, e))?;
    Ok(true)
}

/// Merge provenance as pretty-printed JSON.
pub fn write_sources(report: &MergeReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).map_err(|e| CrosscultError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Record, Value};

    fn table() -> Table {
        let rows = [
            ("Chinese", Value::from("Claude-4"), Value::Float(1.0)),
            ("German", Value::from("GPT-4"), Value::Null),
            ("Chinese", Value::from("Claude-4"), Value::Null),
        ];
        Table::from_records(
            rows.into_iter()
                .map(|(c, m, rt)| {
                    let mut r = Record::new();
                    r.insert("culture".into(), c.into());
                    r.insert(MODEL_STANDARDIZED_COLUMN.into(), m);
                    r.insert("response_time".into(), rt);
                    r
                })
                .collect(),
        )
    }

    #[test]
    fn test_write_tables() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_tables(&table(), &MergeReport::default(), dir.path()).unwrap();
        assert_eq!(written.len(), 3);

        let rates = std::fs::read_to_string(dir.path().join(MISSING_RATE_FILE)).unwrap();
        let lines: Vec<&str> = rates.lines().collect();
        assert_eq!(lines[0], "column,missing_rate");
        assert!(lines[1].starts_with("response_time,0.66"));

        let counts = std::fs::read_to_string(dir.path().join(COUNTS_FILE)).unwrap();
        assert_eq!(counts, "culture,model_standardized,n\nChinese,Claude-4,2\nGerman,GPT-4,1\n");
    }

    #[test]
    fn test_counts_skipped_without_culture() {
        let dir = tempfile::tempdir().unwrap();
        let table = Table::from_records(vec![Record::from([("x".to_string(), Value::Int(1))])]);
        let written = write_tables(&table, &MergeReport::default(), dir.path()).unwrap();

        assert_eq!(written.len(), 2);
        assert!(!dir.path().join(COUNTS_FILE).exists());
        assert!(dir.path().join(SOURCES_FILE).exists());
    }
}
