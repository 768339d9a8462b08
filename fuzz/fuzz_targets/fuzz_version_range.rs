//! Fuzz target for version and version-range parsing.
//!
//! Goal: parsing and membership tests should **never panic**.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_version_range
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use muzzle_domain::version::{ArtifactVersion, VersionRange};

#[derive(Arbitrary, Debug)]
struct RangeInput {
    /// Range notation, e.g. "[3.7.0,3.8.0)"
    range: String,
    /// Candidate versions checked against the range
    versions: Vec<String>,
}

fuzz_target!(|input: RangeInput| {
    if input.range.len() > 256 || input.versions.len() > 64 {
        return;
    }

    let versions: Vec<ArtifactVersion> = input
        .versions
        .iter()
        .filter(|v| v.len() <= 128)
        .filter_map(|v| ArtifactVersion::parse(v).ok())
        .collect();

    if let Ok(range) = VersionRange::parse(&input.range) {
        for version in &versions {
            let _ = range.contains(version);
        }
        // The canonical form must parse back.
        let _ = VersionRange::parse(&range.to_string());
    }

    let mut sorted = versions;
    sorted.sort();
});
