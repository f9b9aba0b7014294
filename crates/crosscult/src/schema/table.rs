//! In-memory column-oriented table.

use indexmap::IndexMap;

use crate::error::{CrosscultError, Result};

use super::value::Value;

/// One flattened record: column name to cell, in insertion order.
pub type Record = IndexMap<String, Value>;

/// An ordered table whose columns are the union of every record added.
///
/// Columns keep first-appearance order. Cells absent from a record are
/// stored as [`Value::Null`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: IndexMap<String, Vec<Value>>,
    rows: usize,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from flattened records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut table = Table::new();
        for record in records {
            table.push_record(record);
        }
        table
    }

    /// Append one record, widening the column set as needed.
    pub fn push_record(&mut self, record: Record) {
        let rows = self.rows;
        for name in record.keys() {
            if !self.columns.contains_key(name) {
                self.columns.insert(name.clone(), vec![Value::Null; rows]);
            }
        }
        let mut record = record;
        for (name, values) in self.columns.iter_mut() {
            values.push(record.swap_remove(name).unwrap_or_default());
        }
        self.rows += 1;
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// A table with no rows or no columns carries no data.
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns.is_empty()
    }

    /// Column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Whether all of the given columns are present.
    pub fn has_columns(&self, names: &[&str]) -> bool {
        names.iter().all(|n| self.has_column(n))
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns.get(name).map(|v| v.as_slice())
    }

    /// Get a mutable column by name.
    pub fn column_mut(&mut self, name: &str) -> Option<&mut Vec<Value>> {
        self.columns.get_mut(name)
    }

    /// Iterate over `(name, values)` pairs.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        self.columns.get(column).and_then(|v| v.get(row))
    }

    /// Cells of one row, in column order.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .filter_map(move |(k, v)| v.get(row).map(|cell| (k.as_str(), cell)))
    }

    /// True when the column is absent or holds only nulls.
    pub fn is_all_null(&self, name: &str) -> bool {
        self.column(name)
            .is_none_or(|values| values.iter().all(Value::is_null))
    }

    /// True when the column exists and has at least one non-null cell.
    pub fn has_values(&self, name: &str) -> bool {
        !self.is_all_null(name)
    }

    /// Insert or replace a column. The length must match the row count.
    pub fn set_column(&mut self, name: impl Into<String>, values: Vec<Value>) -> Result<()> {
        let name = name.into();
        if values.len() != self.rows {
            return Err(CrosscultError::Config(format!(
                "column '{}' has {} values, table has {} rows",
                name,
                values.len(),
                self.rows
            )));
        }
        self.columns.insert(name, values);
        Ok(())
    }

    /// Insert or replace a column with the same value on every row.
    pub fn fill_column(&mut self, name: impl Into<String>, value: Value) {
        self.columns.insert(name.into(), vec![value; self.rows]);
    }

    /// Append another table below this one, taking the union of columns.
    pub fn append(&mut self, other: Table) {
        let existing = self.rows;
        let incoming = other.rows;

        for (name, values) in other.columns {
            match self.columns.get_mut(&name) {
                Some(column) => column.extend(values),
                None => {
                    let mut column = vec![Value::Null; existing];
                    column.extend(values);
                    self.columns.insert(name, column);
                }
            }
        }
        let total = existing + incoming;
        for column in self.columns.values_mut() {
            column.resize(total, Value::Null);
        }
        self.rows = total;
    }

    /// Concatenate tables in order.
    pub fn concat(tables: impl IntoIterator<Item = Table>) -> Table {
        let mut merged = Table::new();
        for table in tables {
            merged.append(table);
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, Value)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_from_records_unions_columns() {
        let table = Table::from_records(vec![
            record(&[("a", Value::Int(1))]),
            record(&[("b", "x".into()), ("a", Value::Int(2))]),
        ]);

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(table.get(0, "b"), Some(&Value::Null));
        assert_eq!(table.get(1, "a"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_append_pads_missing_columns() {
        let mut left = Table::from_records(vec![record(&[("a", Value::Int(1))])]);
        let right = Table::from_records(vec![
            record(&[("b", "y".into())]),
            record(&[("b", "z".into())]),
        ]);
        left.append(right);

        assert_eq!(left.row_count(), 3);
        assert_eq!(left.column("a").unwrap(), &[Value::Int(1), Value::Null, Value::Null]);
        assert_eq!(left.column("b").unwrap()[0], Value::Null);
        assert_eq!(left.column("b").unwrap()[2], Value::from("z"));
    }

    #[test]
    fn test_empty_semantics() {
        assert!(Table::new().is_empty());
        let no_columns = Table::from_records(vec![Record::new()]);
        assert_eq!(no_columns.row_count(), 1);
        assert!(no_columns.is_empty());
    }

    #[test]
    fn test_all_null() {
        let table = Table::from_records(vec![
            record(&[("a", Value::Null), ("b", Value::Int(1))]),
            record(&[("a", Value::Null), ("b", Value::Null)]),
        ]);
        assert!(table.is_all_null("a"));
        assert!(table.is_all_null("missing"));
        assert!(!table.is_all_null("b"));
    }

    #[test]
    fn test_set_column_length_mismatch() {
        let mut table = Table::from_records(vec![record(&[("a", Value::Int(1))])]);
        assert!(table.set_column("b", vec![]).is_err());
        assert!(table.set_column("b", vec![Value::Int(2)]).is_ok());
    }
}
