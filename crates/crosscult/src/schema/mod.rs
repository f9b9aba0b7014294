//! Tabular data model: cells and the column-oriented table.

mod table;
mod value;

pub use table::{Record, Table};
pub use value::Value;
