//! Reader for delimited tables written by the pipeline.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{CrosscultError, Result};
use crate::schema::{Record, Table, Value};

/// CSV reader configuration.
#[derive(Debug, Clone)]
pub struct CsvReaderConfig {
    /// Field delimiter.
    pub delimiter: u8,
    /// Quote character.
    pub quote: u8,
}

impl Default for CsvReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
        }
    }
}

/// Loads a delimited file with a header row back into a [`Table`].
///
/// Empty fields become null, numeric text becomes a float, anything else
/// stays a string.
pub struct CsvReader {
    config: CsvReaderConfig,
}

impl CsvReader {
    pub fn new() -> Self {
        Self {
            config: CsvReaderConfig::default(),
        }
    }

    pub fn with_config(config: CsvReaderConfig) -> Self {
        Self { config }
    }

    /// Read a file into a table.
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<Table> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| CrosscultError::io(path, e))?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| CrosscultError::io(path, e))?;
        self.read_bytes(&contents)
    }

    /// Parse bytes directly.
    pub fn read_bytes(&self, bytes: &[u8]) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .quote(self.config.quote)
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();

        let mut table = Table::new();
        for result in reader.records() {
            let record = result?;
            let row: Record = headers
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), parse_cell(record.get(i).unwrap_or(""))))
                .collect();
            table.push_record(row);
        }
        Ok(table)
    }
}

impl Default for CsvReader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_cell(text: &str) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    match text.parse::<f64>() {
        Ok(x) if x.is_finite() => Value::Float(x),
        _ => Value::Str(text.to_string()),
    }
}
