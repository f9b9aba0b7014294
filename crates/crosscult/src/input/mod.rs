//! Input handling: JSON normalization and delimited table reading.

mod flatten;
mod normalizer;
mod parser;
mod source;

pub use flatten::{flatten_object, flatten_records, DEFAULT_MAX_LEVEL};
pub use normalizer::{Normalizer, NormalizerConfig, CONTAINER_KEYS, TASK_RESULTS_KEY};
pub use parser::{CsvReader, CsvReaderConfig};
pub use source::{Layout, SourceMetadata};
