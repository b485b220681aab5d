//! Fuzz target for the full compile pipeline.
//!
//! Run with: cargo +nightly fuzz run compile_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use optgen_lang::{compile, format, FormatOptions};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        match compile("fuzz.opt", input) {
            Ok(root) => {
                let _ = format(&root, &FormatOptions::with_positions());
            }
            Err(diagnostics) => {
                assert!(!diagnostics.is_empty());
                for diagnostic in &diagnostics {
                    assert!(diagnostic.pos.line >= 1);
                    assert!(diagnostic.pos.col >= 1);
                }
            }
        }
    }
});
