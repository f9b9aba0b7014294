//! Column profiles and group-by aggregation.

use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexSet;
use serde::Serialize;

use crate::schema::{Table, Value};

use super::statistics::{Moments, StreamingStats};

/// Null fraction of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingRate {
    pub column: String,
    pub missing_rate: f64,
}

/// Per-column null fraction, highest first. Ties keep column order.
pub fn missing_rates(table: &Table) -> Vec<MissingRate> {
    let rows = table.row_count();
    let mut rates: Vec<MissingRate> = table
        .columns()
        .map(|(name, values)| {
            let nulls = values.iter().filter(|v| v.is_null()).count();
            let missing_rate = if rows == 0 {
                0.0
            } else {
                nulls as f64 / rows as f64
            };
            MissingRate {
                column: name.to_string(),
                missing_rate,
            }
        })
        .collect();
    rates.sort_by(|a, b| {
        b.missing_rate
            .partial_cmp(&a.missing_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rates
}

/// Distinct non-null values of a column in order of first appearance.
///
/// `None` when the column does not exist.
pub fn unique_values(table: &Table, column: &str) -> Option<Vec<String>> {
    let values = table.column(column)?;
    let seen: IndexSet<String> = values.iter().filter_map(Value::as_key).collect();
    Some(seen.into_iter().collect())
}

/// Row counts per combination of key columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCount {
    pub keys: Vec<String>,
    pub n: usize,
}

/// Count rows per distinct key tuple, sorted by key. Rows with a null key
/// are dropped. `None` when a key column is missing.
pub fn group_counts(table: &Table, keys: &[&str]) -> Option<Vec<GroupCount>> {
    let columns: Vec<&[Value]> = keys
        .iter()
        .map(|k| table.column(k))
        .collect::<Option<_>>()?;

    let mut counts: BTreeMap<Vec<String>, usize> = BTreeMap::new();
    for row in 0..table.row_count() {
        let key: Option<Vec<String>> = columns.iter().map(|c| c[row].as_key()).collect();
        if let Some(key) = key {
            *counts.entry(key).or_insert(0) += 1;
        }
    }
    Some(
        counts
            .into_iter()
            .map(|(keys, n)| GroupCount { keys, n })
            .collect(),
    )
}

/// Moments of a value column within one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMoments {
    pub key: String,
    /// `None` when the group has no numeric values.
    pub moments: Option<Moments>,
}

impl GroupMoments {
    pub fn mean(&self) -> Option<f64> {
        self.moments.map(|m| m.mean)
    }

    pub fn count(&self) -> usize {
        self.moments.map_or(0, |m| m.count)
    }
}

/// Group `value` by `key`, sorted by key. `None` when either column is
/// missing.
pub fn group_moments(table: &Table, key: &str, value: &str) -> Option<Vec<GroupMoments>> {
    let keys = table.column(key)?;
    let values = table.column(value)?;

    let mut groups: BTreeMap<String, StreamingStats> = BTreeMap::new();
    for (k, v) in keys.iter().zip(values) {
        let Some(k) = k.as_key() else { continue };
        let stats = groups.entry(k).or_default();
        if let Some(x) = v.as_f64() {
            stats.add(x);
        }
    }
    Some(
        groups
            .into_iter()
            .map(|(key, stats)| GroupMoments {
                key,
                moments: stats.finish(),
            })
            .collect(),
    )
}

/// Numeric values of `value` collected per `key` group, sorted by key.
pub fn group_samples(table: &Table, key: &str, value: &str) -> Option<Vec<(String, Vec<f64>)>> {
    let keys = table.column(key)?;
    let values = table.column(value)?;

    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (k, v) in keys.iter().zip(values) {
        let Some(k) = k.as_key() else { continue };
        let samples = groups.entry(k).or_default();
        if let Some(x) = v.as_f64() {
            samples.push(x);
        }
    }
    Some(groups.into_iter().collect())
}

/// Mean of a value column over two grouping keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Pivot {
    pub row_keys: Vec<String>,
    pub column_keys: Vec<String>,
    /// `cells[row][column]`; `None` where the group has no numeric values.
    pub cells: Vec<Vec<Option<f64>>>,
}

impl Pivot {
    /// Whether any cell holds a value.
    pub fn has_values(&self) -> bool {
        self.cells.iter().flatten().any(Option::is_some)
    }

    /// Largest and smallest cell values.
    pub fn range(&self) -> Option<(f64, f64)> {
        let mut values = self.cells.iter().flatten().flatten().copied();
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// Build a mean pivot of `value` with `row` keys down and `column` keys
/// across. `None` when any column is missing.
pub fn pivot_mean(table: &Table, row: &str, column: &str, value: &str) -> Option<Pivot> {
    let row_values = table.column(row)?;
    let column_values = table.column(column)?;
    let values = table.column(value)?;

    let mut row_keys = BTreeSet::new();
    let mut column_keys = BTreeSet::new();
    let mut groups: BTreeMap<(String, String), StreamingStats> = BTreeMap::new();

    for i in 0..table.row_count() {
        let (Some(r), Some(c)) = (row_values[i].as_key(), column_values[i].as_key()) else {
            continue;
        };
        row_keys.insert(r.clone());
        column_keys.insert(c.clone());
        let stats = groups.entry((r, c)).or_default();
        if let Some(x) = values[i].as_f64() {
            stats.add(x);
        }
    }

    let row_keys: Vec<String> = row_keys.into_iter().collect();
    let column_keys: Vec<String> = column_keys.into_iter().collect();
    let cells = row_keys
        .iter()
        .map(|r| {
            column_keys
                .iter()
                .map(|c| {
                    groups
                        .get(&(r.clone(), c.clone()))
                        .and_then(|s| s.finish())
                        .map(|m| m.mean)
                })
                .collect()
        })
        .collect();

    Some(Pivot {
        row_keys,
        column_keys,
        cells,
    })
}
