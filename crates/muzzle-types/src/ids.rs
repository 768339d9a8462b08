//! Stable identifiers for checks and finding codes.
//!
//! `check_id` is a dotted namespace. `code` is a short snake_case discriminator.

// Checks
pub const CHECK_MUZZLE_REFERENCES: &str = "muzzle.references";
pub const CHECK_MUZZLE_RANGE: &str = "muzzle.range";
pub const CHECK_MUZZLE_RESOLUTION: &str = "muzzle.resolution";
pub const CHECK_MUZZLE_INVERSE: &str = "muzzle.inverse";
pub const CHECK_MUZZLE_FAIL_DIRECTIVE: &str = "muzzle.fail_directive";

// Codes: muzzle.references
pub const CODE_MISSING_SYMBOL: &str = "missing_symbol";
pub const CODE_SHAPE_MISMATCH: &str = "shape_mismatch";

// Codes: muzzle.range
pub const CODE_EMPTY_RANGE: &str = "empty_range";

// Codes: muzzle.resolution
pub const CODE_ARTIFACT_RESOLUTION_FAILURE: &str = "artifact_resolution_failure";

// Codes: muzzle.inverse
pub const CODE_OVER_BROAD_MATCH: &str = "over_broad_match";
pub const CODE_NO_INVERSE_CANDIDATES: &str = "no_inverse_candidates";

// Codes: muzzle.fail_directive
pub const CODE_UNEXPECTED_MATCH: &str = "unexpected_match";

// Tool-level
pub const CHECK_TOOL_RUNTIME: &str = "tool.runtime";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";
