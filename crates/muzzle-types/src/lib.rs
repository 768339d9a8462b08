//! Stable DTOs and IDs used across the muzzle workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted report
//! - stable string IDs and codes
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod receipt;

pub use explain::{ExamplePair, Explanation, lookup_explanation};
pub use receipt::{
    CoordinateOutcome, CoordinateResult, CoordinateRole, DirectiveKind, DirectiveSummary,
    Finding, Location, MuzzleData, MuzzleReportV1, ReferenceResult, ReferenceStatus,
    ReportEnvelope, SCHEMA_REPORT_V1, Severity, ToolMeta, Verdict,
};
