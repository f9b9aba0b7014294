//! Markdown summary report.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::info;

use crate::analysis::{group_moments, unique_values, GroupMoments, Moments};
use crate::error::{CrosscultError, Result};
use crate::schema::Table;
use crate::transform::MODEL_STANDARDIZED_COLUMN;

use super::ensure_dir;

pub const REPORT_FILE: &str = "analysis_report.md";

/// Write `analysis_report.md` into `dir`, stamped with the local time.
pub fn write_report(table: &Table, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = dir.as_ref();
    ensure_dir(dir)?;
    let path = dir.join(REPORT_FILE);

    let report = build_report(table, chrono::Local::now().naive_local());
    std::fs::write(&path, report).map_err(|e| CrosscultError::io(&path, e))?;
    info!(path = %path.display(), "saved report");
    Ok(path)
}

/// Render the report text.
///
/// Numeric sections appear only when their column has data.
pub fn build_report(table: &Table, generated_at: NaiveDateTime) -> String {
    let uniq = |column: &str| {
        unique_values(table, column)
            .map(|v| v.join(", "))
            .unwrap_or_else(|| "NA".to_string())
    };
    let model_column = if table.has_column(MODEL_STANDARDIZED_COLUMN) {
        MODEL_STANDARDIZED_COLUMN
    } else {
        "model"
    };

    let mut lines = vec![
        "# Cross-Cultural AI Evaluation Report\n".to_string(),
        "## Data Overview".to_string(),
        format!("- Total samples: {}", thousands(table.row_count())),
        format!("- Cultures: {}", uniq("culture")),
        format!("- AI models: {}", uniq(model_column)),
    ];
    for (column, label) in [("complexity", "Complexity"), ("language", "Language"), ("scenario", "Scenario")] {
        if table.has_column(column) {
            lines.push(format!("- {}: {}", label, uniq(column)));
        }
    }

    if let Some(m) = column_moments(table, "response_time") {
        lines.push("\n## Response Time".to_string());
        lines.push(format!("- Mean: {:.2} s", m.mean));
        lines.push(format!("- SD: {:.2} s", m.std));
        lines.push(format!("- Range: {:.2} ~ {:.2} s", m.min, m.max));
    }

    if let Some(m) = column_moments(table, "word_count") {
        lines.push("\n## Word Count".to_string());
        lines.push(format!("- Mean: {:.1} words", m.mean));
        lines.push(format!("- SD: {:.1} words", m.std));
        lines.push(format!("- Range: {:.0} ~ {:.0} words", m.min, m.max));
    }

    if table.has_values("response_time") {
        let sections = [
            ("culture", "Cultural Differences"),
            (MODEL_STANDARDIZED_COLUMN, "Model Differences"),
        ];
        for (key, heading) in sections {
            if let Some(groups) = group_moments(table, key, "response_time") {
                lines.push(format!("\n## {} (response time, mean±SD, n)", heading));
                lines.extend(groups.iter().map(group_line));
            }
        }
    }

    lines.push("\n---".to_string());
    lines.push(format!(
        "Report generated: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));

    lines.join("\n")
}

fn column_moments(table: &Table, column: &str) -> Option<Moments> {
    table.column(column).and_then(Moments::of)
}

fn group_line(group: &GroupMoments) -> String {
    match group.moments {
        Some(m) => format!("- {}: {:.2}±{:.2} s (n={})", group.key, m.mean, m.std, m.count),
        None => format!("- {}: NA (n=0)", group.key),
    }
}

/// Format a count with comma thousands separators.
fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Record, Value};
    use chrono::NaiveDate;

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn table(with_rt: bool) -> Table {
        let rows = [("Chinese", "Claude-4", 10.0, 300.0), ("German", "GPT-4", 14.0, 280.0), ("Chinese", "GPT-4", 12.0, 320.0)];
        Table::from_records(
            rows.into_iter()
                .map(|(c, m, rt, wc)| {
                    let mut r = Record::new();
                    r.insert("culture".into(), c.into());
                    r.insert(MODEL_STANDARDIZED_COLUMN.into(), m.into());
                    if with_rt {
                        r.insert("response_time".into(), Value::Float(rt));
                    }
                    r.insert("word_count".into(), Value::Float(wc));
                    r
                })
                .collect(),
        )
    }

    #[test]
    fn test_report_sections() {
        let report = build_report(&table(true), stamp());

        assert!(report.starts_with("# Cross-Cultural AI Evaluation Report\n"));
        assert!(report.contains("- Total samples: 3"));
        assert!(report.contains("- Cultures: Chinese, German"));
        assert!(report.contains("- AI models: Claude-4, GPT-4"));
        assert!(report.contains("- Mean: 12.00 s"));
        assert!(report.contains("- Range: 10.00 ~ 14.00 s"));
        assert!(report.contains("- Mean: 300.0 words"));
        assert!(report.contains("- Chinese: 11.00±1.41 s (n=2)"));
        assert!(report.contains("## Model Differences"));
        assert!(report.ends_with("Report generated: 2025-03-01 09:30:00"));
    }

    #[test]
    fn test_report_without_response_time() {
        let report = build_report(&table(false), stamp());
        assert!(!report.contains("## Response Time"));
        assert!(!report.contains("Cultural Differences"));
        assert!(report.contains("## Word Count"));
    }

    #[test]
    fn test_missing_label_column_is_na() {
        let table = Table::from_records(vec![Record::from([("x".to_string(), Value::Int(1))])]);
        let report = build_report(&table, stamp());
        assert!(report.contains("- Cultures: NA"));
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(7), "7");
        assert_eq!(thousands(1234), "1,234");
        assert_eq!(thousands(1234567), "1,234,567");
    }
}
