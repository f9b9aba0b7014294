//! Delimited table writer.

use std::path::Path;

use crate::error::{CrosscultError, Result};
use crate::schema::Table;

use super::ensure_parent;

/// Write `table` as UTF-8 CSV with a header row. Nulls are empty fields.
pub fn write_table_csv(table: &Table, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(table.column_names())?;
    for row in 0..table.row_count() {
        writer.write_record(table.row(row).map(|(_, cell)| cell.to_string()))?;
    }
    writer.flush().map_err(|e| CrosscultError::io(path, e))?;
    Ok(())
}
