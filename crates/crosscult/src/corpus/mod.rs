//! Corpus discovery and merging across input files.

mod merger;

pub use merger::{discover_json_files, CorpusMerger, MergeReport, SkippedFile, SOURCE_FILE_COLUMN};
