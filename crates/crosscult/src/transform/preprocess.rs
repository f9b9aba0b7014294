//! Column coercion and label standardization applied to the merged table.

use tracing::debug;

use crate::error::Result;
use crate::inference::{standardize_model, Culture, ModelFamily};
use crate::schema::{Table, Value};

/// Columns coerced to numbers.
pub const NUMERIC_COLUMNS: &[&str] = &["response_time", "word_count", "temperature"];

/// Added column holding canonical model names.
pub const MODEL_STANDARDIZED_COLUMN: &str = "model_standardized";

/// Added column holding two-letter culture codes.
pub const CULTURE_CODE_COLUMN: &str = "culture_code";

/// Counts of what preprocessing changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreprocessSummary {
    /// Cells that were present but could not be read as numbers.
    pub coercion_failures: usize,
    /// Rows whose model name collapsed to a known family.
    pub standardized_models: usize,
    /// Rows with a known culture code.
    pub coded_cultures: usize,
}

/// Prepares the merged table for reporting.
pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Coerce numeric columns, then add `model_standardized` and
    /// `culture_code`. Rows are never dropped.
    pub fn apply(&self, table: &mut Table) -> Result<PreprocessSummary> {
        let mut summary = PreprocessSummary::default();

        for name in NUMERIC_COLUMNS {
            if let Some(column) = table.column_mut(name) {
                for cell in column.iter_mut() {
                    let coerced = cell.to_numeric();
                    if coerced.is_null() && !cell.is_null() {
                        summary.coercion_failures += 1;
                    }
                    *cell = coerced;
                }
            }
        }

        let standardized: Vec<Value> = match table.column("model") {
            Some(models) => models.iter().map(standardize_model).collect(),
            None => vec![Value::from(ModelFamily::Unknown.as_str()); table.row_count()],
        };
        summary.standardized_models = standardized
            .iter()
            .filter(|v| v.as_str().is_some_and(is_canonical_model))
            .count();
        table.set_column(MODEL_STANDARDIZED_COLUMN, standardized)?;

        if let Some(cultures) = table.column("culture") {
            let codes: Vec<Value> = cultures
                .iter()
                .map(|c| {
                    c.as_str()
                        .and_then(Culture::code_for)
                        .map(Value::from)
                        .unwrap_or(Value::Null)
                })
                .collect();
            summary.coded_cultures = codes.iter().filter(|v| !v.is_null()).count();
            table.set_column(CULTURE_CODE_COLUMN, codes)?;
        }

        debug!(?summary, "preprocessed merged table");
        Ok(summary)
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

fn is_canonical_model(name: &str) -> bool {
    [
        ModelFamily::Claude4,
        ModelFamily::Gpt4,
        ModelFamily::DeepSeekV3,
        ModelFamily::Gemini25,
    ]
    .iter()
    .any(|m| m.as_str() == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Record;

    fn row(pairs: &[(&str, Value)]) -> Record {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_numeric_coercion_keeps_rows() {
        let mut table = Table::from_records(vec![
            row(&[
                ("response_time", "12.5".into()),
                ("word_count", Value::Int(340)),
                ("temperature", "0.7".into()),
            ]),
            row(&[("response_time", "slow".into()), ("word_count", Value::Null)]),
        ]);
        let summary = Preprocessor::new().apply(&mut table).unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, "response_time"), Some(&Value::Float(12.5)));
        assert_eq!(table.get(0, "word_count"), Some(&Value::Float(340.0)));
        assert_eq!(table.get(0, "temperature"), Some(&Value::Float(0.7)));
        assert_eq!(table.get(1, "response_time"), Some(&Value::Null));
        assert_eq!(table.get(1, "temperature"), Some(&Value::Null));
        assert_eq!(summary.coercion_failures, 1);
    }

    #[test]
    fn test_absent_numeric_column_is_not_added() {
        let mut table = Table::from_records(vec![row(&[("response_time", "3".into())])]);
        Preprocessor::new().apply(&mut table).unwrap();

        assert_eq!(table.get(0, "response_time"), Some(&Value::Float(3.0)));
        assert!(!table.has_column("temperature"));
    }

    #[test]
    fn test_model_standardized() {
        let mut table = Table::from_records(vec![
            row(&[("model", "claude-4-sonnet".into())]),
            row(&[("model", "mistral".into())]),
            row(&[("model", Value::Null)]),
        ]);
        let summary = Preprocessor::new().apply(&mut table).unwrap();

        let column = table.column(MODEL_STANDARDIZED_COLUMN).unwrap();
        assert_eq!(column, &[Value::from("Claude-4"), Value::from("mistral"), Value::Null]);
        assert_eq!(summary.standardized_models, 1);
    }

    #[test]
    fn test_missing_model_column_defaults_unknown() {
        let mut table = Table::from_records(vec![row(&[("a", Value::Int(1))])]);
        Preprocessor::new().apply(&mut table).unwrap();
        assert_eq!(table.get(0, MODEL_STANDARDIZED_COLUMN), Some(&Value::from("Unknown")));
        assert!(!table.has_column(CULTURE_CODE_COLUMN));
    }

    #[test]
    fn test_culture_codes() {
        let mut table = Table::from_records(vec![
            row(&[("culture", "German".into())]),
            row(&[("culture", "Unknown".into())]),
        ]);
        Preprocessor::new().apply(&mut table).unwrap();
        assert_eq!(table.get(0, CULTURE_CODE_COLUMN), Some(&Value::from("DE")));
        assert_eq!(table.get(1, CULTURE_CODE_COLUMN), Some(&Value::Null));
    }
}
