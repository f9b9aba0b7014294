//! Fuzz target for reading merged CSV files back.

#![no_main]

use libfuzzer_sys::fuzz_target;
use crosscult::CsvReader;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }
    let _ = CsvReader::new().read_bytes(data);
});
