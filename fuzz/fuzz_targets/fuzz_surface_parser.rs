//! Fuzz target for registry descriptor parsing (surfaces and version indexes).
//!
//! Goal: The parsers should **never panic** on any input.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_surface_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Descriptors are JSON, so only UTF-8 is interesting.
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = muzzle_registry::fuzz::parse_surface(text);
        let _ = muzzle_registry::fuzz::parse_index(text);
    }
});
