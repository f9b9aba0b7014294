//! Fuzz target for filename label inference.

#![no_main]

use libfuzzer_sys::fuzz_target;
use crosscult::guess_labels;

fuzz_target!(|data: &[u8]| {
    if let Ok(name) = std::str::from_utf8(data) {
        let first = guess_labels(name);
        assert_eq!(first, guess_labels(name));
    }
});
