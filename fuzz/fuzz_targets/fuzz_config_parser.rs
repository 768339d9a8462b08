//! Fuzz target for `muzzle.toml` and advice file parsing.
//!
//! Goal: parsing and resolution should **never panic** on any input.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(cfg) = muzzle_settings::parse_config_toml(text) {
            let _ = muzzle_settings::resolve_config(cfg, muzzle_settings::Overrides::default());
        }
        let _ = muzzle_settings::parse_advice_toml(text);
    }
});
