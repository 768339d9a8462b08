//! Pure compatibility verification (no IO beyond the injected resolver).
//!
//! Input: directives, advice references and an `ArtifactResolver`.
//! Output: per-coordinate reports, then findings + verdict + summary data.

#![forbid(unsafe_code)]

pub mod directive;
pub mod fingerprint;
pub mod matcher;
pub mod model;
pub mod policy;
pub mod report;
pub mod resolver;
pub mod surface;
pub mod verifier;
pub mod version;

mod checks;
mod engine;

pub use engine::evaluate;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;
