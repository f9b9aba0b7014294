//! Generic flattening of nested JSON objects into dotted columns.

use serde_json::{Map, Value as Json};
use tracing::warn;

use crate::schema::{Record, Table, Value};

/// Default number of nesting levels collapsed into dotted column names.
pub const DEFAULT_MAX_LEVEL: usize = 2;

/// Flatten one JSON object into a record.
///
/// Nested objects are collapsed into `parent.child` keys for up to
/// `max_level` levels; deeper objects and all arrays are kept whole as
/// [`Value::Json`] cells.
pub fn flatten_object(object: &Map<String, Json>, max_level: usize) -> Record {
    let mut record = Record::new();
    flatten_into(&mut record, object, None, 0, max_level);
    record
}

fn flatten_into(
    record: &mut Record,
    object: &Map<String, Json>,
    prefix: Option<&str>,
    level: usize,
    max_level: usize,
) {
    for (key, value) in object {
        let name = match prefix {
            Some(p) => format!("{}.{}", p, key),
            None => key.clone(),
        };
        match value {
            Json::Object(inner) if level < max_level => {
                flatten_into(record, inner, Some(&name), level + 1, max_level);
            }
            other => {
                record.insert(name, Value::from_json(other));
            }
        }
    }
}

/// Flatten a sequence of JSON records into a table.
///
/// Elements that are not objects carry no named fields; they are dropped
/// with a warning.
pub fn flatten_records<'a>(records: impl IntoIterator<Item = &'a Json>, max_level: usize) -> Table {
    let mut table = Table::new();
    let mut dropped = 0usize;
    for record in records {
        match record {
            Json::Object(object) => table.push_record(flatten_object(object, max_level)),
            _ => dropped += 1,
        }
    }
    if dropped > 0 {
        warn!(dropped, "dropped non-object records while flattening");
    }
    table
}
