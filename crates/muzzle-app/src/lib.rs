//! Use case orchestration for muzzle.
//!
//! This crate provides the application layer: use cases that coordinate the settings, registry,
//! domain, and render layers. It is intentionally thin and delegates heavy lifting to them.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod explain;
mod listing;
mod render;
mod report;
mod verify;

pub use explain::{ExplainOutput, Related, format_explanation, format_not_found, run_explain};
pub use listing::{format_references, run_versions};
pub use render::{render_annotations, render_markdown};
pub use report::{parse_report_json, runtime_error_report, serialize_report, to_renderable};
pub use verify::{
    VerifyInput, VerifyOutput, load_config, retry_policy, run_verify, verdict_exit_code,
    verify_with,
};
