//! Fuzz target for the JSON normalizer.
//!
//! This fuzzer tests that normalization:
//! 1. Never panics on malformed or non-UTF-8 input
//! 2. Always yields rectangular tables

#![no_main]

use libfuzzer_sys::fuzz_target;
use crosscult::Normalizer;
use std::io::Write;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let normalizer = Normalizer::new();

    if let Ok(text) = std::str::from_utf8(data) {
        let (table, _) = normalizer.parse_str(text);
        for (_, values) in table.columns() {
            assert_eq!(values.len(), table.row_count());
        }
    }

    // The file path also covers hashing and UTF-8 rejection
    if let Ok(mut temp_file) = tempfile::NamedTempFile::new() {
        if temp_file.write_all(data).is_ok() {
            let _ = normalizer.parse_file(temp_file.path());
        }
    }
});
