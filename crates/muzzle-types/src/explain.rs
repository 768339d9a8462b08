//! Explain registry for checks and codes.
//!
//! Maps check IDs and codes to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a check or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the check/code.
    pub title: &'static str,
    /// What the check does and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after configuration examples.
    pub examples: ExamplePair,
}

/// Before and after configuration examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Configuration that would trigger a finding.
    pub before: &'static str,
    /// Configuration that passes the check.
    pub after: &'static str,
}

/// Look up an explanation by check_id or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        // Check IDs
        ids::CHECK_MUZZLE_REFERENCES => Some(explain_references()),
        ids::CHECK_MUZZLE_RANGE => Some(explain_range()),
        ids::CHECK_MUZZLE_RESOLUTION => Some(explain_resolution()),
        ids::CHECK_MUZZLE_INVERSE => Some(explain_inverse()),
        ids::CHECK_MUZZLE_FAIL_DIRECTIVE => Some(explain_fail_directive()),

        // Codes
        ids::CODE_MISSING_SYMBOL => Some(explain_missing_symbol()),
        ids::CODE_SHAPE_MISMATCH => Some(explain_shape_mismatch()),
        ids::CODE_EMPTY_RANGE => Some(explain_empty_range()),
        ids::CODE_ARTIFACT_RESOLUTION_FAILURE => Some(explain_artifact_resolution_failure()),
        ids::CODE_OVER_BROAD_MATCH => Some(explain_over_broad_match()),
        ids::CODE_NO_INVERSE_CANDIDATES => Some(explain_no_inverse_candidates()),
        ids::CODE_UNEXPECTED_MATCH => Some(explain_unexpected_match()),

        _ => None,
    }
}

/// List all known check IDs.
pub fn all_check_ids() -> &'static [&'static str] {
    &[
        ids::CHECK_MUZZLE_REFERENCES,
        ids::CHECK_MUZZLE_RANGE,
        ids::CHECK_MUZZLE_RESOLUTION,
        ids::CHECK_MUZZLE_INVERSE,
        ids::CHECK_MUZZLE_FAIL_DIRECTIVE,
    ]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_MISSING_SYMBOL,
        ids::CODE_SHAPE_MISMATCH,
        ids::CODE_EMPTY_RANGE,
        ids::CODE_ARTIFACT_RESOLUTION_FAILURE,
        ids::CODE_OVER_BROAD_MATCH,
        ids::CODE_NO_INVERSE_CANDIDATES,
        ids::CODE_UNEXPECTED_MATCH,
    ]
}

// --- Check-level explanations ---

fn explain_references() -> Explanation {
    Explanation {
        title: "Advice References Resolve",
        description: "\
Checks every symbolic reference used by the instrumentation advice against the
published API surface of every version inside a `pass` directive's range.

A reference names a class, a method (owner, name, parameter types, return type)
or a field (owner, name, type), together with the modifiers the advice relies
on. If any reference is absent or has a different shape in one version, the
advice would fail to link (or silently misbehave) when attached to that version
at runtime.",
        remediation: "\
Either narrow the `versions` range so it excludes the incompatible releases, or
split the advice into a second instrumentation module targeting the newer API.

Run `muzzle verify` after each change; the report lists every
coordinate/reference pair that does not resolve.",
        examples: ExamplePair {
            before: r#"[[pass]]
group = "org.apache.camel"
module = "camel-core"
versions = "[3.7.0,3.9.0)"   # 3.8.x changed CamelContext#addService"#,
            after: r#"[[pass]]
group = "org.apache.camel"
module = "camel-core"
versions = "[3.7.0,3.8.0)""#,
        },
    }
}

fn explain_range() -> Explanation {
    Explanation {
        title: "Version Range Is Populated",
        description: "\
Every directive's range must match at least one published version.

An empty match set is never treated as \"all pass\": a typo in the range, a
wrong group/module, or an over-aggressive `skip_versions` list would otherwise
make the check vacuously green.",
        remediation: "\
Confirm the group and module coordinates, then widen or correct the range.
`muzzle versions --group G --module M` lists what the registry publishes.",
        examples: ExamplePair {
            before: r#"[[pass]]
group = "org.apache.camel"
module = "camel-core"
versions = "[3.70.0,3.80.0)""#,
            after: r#"[[pass]]
group = "org.apache.camel"
module = "camel-core"
versions = "[3.7.0,3.8.0)""#,
        },
    }
}

fn explain_resolution() -> Explanation {
    Explanation {
        title: "Artifact Resolution",
        description: "\
Reports artifacts whose version list or API surface could not be fetched from
the registry after bounded retries.

A failed fetch is fatal for that coordinate only; every other coordinate is
still checked and reported, so one flaky download does not hide other
incompatibilities.",
        remediation: "\
Check registry connectivity and that the API surface descriptor exists for the
reported coordinate. Transient failures can be absorbed by raising
`retry.max_attempts` or `retry.max_backoff_ms`.",
        examples: ExamplePair {
            before: r#"[retry]
max_attempts = 1"#,
            after: r#"[retry]
max_attempts = 4
initial_backoff_ms = 250
max_backoff_ms = 4000"#,
        },
    }
}

fn explain_inverse() -> Explanation {
    Explanation {
        title: "Inverse Range Assertion",
        description: "\
With `assert_inverse = true`, versions just outside the declared range (the
nearest `inverse_neighbors` on each side) must NOT satisfy every reference.

If they do, the advice is broader than its declared range: at runtime it would
attach to those versions too, where other behavioural assumptions of the
instrumentation may not hold.",
        remediation: "\
Widen the declared range to include the matching versions if the
instrumentation really supports them, or add a reference that pins the advice
to the API that only exists inside the range.",
        examples: ExamplePair {
            before: r#"[[pass]]
group = "org.apache.camel"
module = "camel-core"
versions = "[3.7.0,3.8.0)"
assert_inverse = true        # 3.8.0 still matches every reference"#,
            after: r#"[[pass]]
group = "org.apache.camel"
module = "camel-core"
versions = "[3.7.0,3.9.0)"
assert_inverse = true"#,
        },
    }
}

fn explain_fail_directive() -> Explanation {
    Explanation {
        title: "Fail Directive",
        description: "\
A `fail` directive asserts that the advice does NOT match any version inside
its range. It documents ranges that a sibling instrumentation module covers and
guards against accidental double instrumentation.",
        remediation: "\
If a version inside a `fail` range now matches, either the ranges of the
sibling modules overlap or the advice lost the reference that distinguished
it. Restore the distinguishing reference or adjust the ranges.",
        examples: ExamplePair {
            before: r#"[[fail]]
group = "org.apache.camel"
module = "camel-core"
versions = "[2.0.0,3.8.0)""#,
            after: r#"[[fail]]
group = "org.apache.camel"
module = "camel-core"
versions = "[2.0.0,3.7.0)""#,
        },
    }
}

// --- Code-level explanations ---

fn explain_missing_symbol() -> Explanation {
    Explanation {
        title: "Missing Symbol",
        description: "\
A class, method or field referenced by the advice does not exist in the
resolved version. Methods and fields are looked up through the superclass and
interface chain described by the API surface.",
        remediation: "\
Exclude the version from the range, or move the advice that needs the symbol
into a module whose range only covers versions that provide it.",
        examples: ExamplePair {
            before: r#"[[advice.references]]
kind = "method"
owner = "com.example.Foo"
name = "bar"
params = ["java.lang.String"]
returns = "void"     # removed in 3.7.5"#,
            after: r#"[[pass]]
group = "com.example"
module = "foo"
versions = "[3.7.0,3.7.5)""#,
        },
    }
}

fn explain_shape_mismatch() -> Explanation {
    Explanation {
        title: "Shape Mismatch",
        description: "\
The referenced symbol exists, but its signature or modifiers are incompatible
with what the advice expects: different parameter or return types, a field of
another type, reduced visibility, static vs instance, or interface vs class.",
        remediation: "\
Align the reference with the published signature if the advice can cope with
it, or exclude the versions that changed shape from the range.",
        examples: ExamplePair {
            before: r#"[[advice.references]]
kind = "field"
owner = "com.example.Foo"
name = "count"
type = "int"          # became long in 3.7.4"#,
            after: r#"[[advice.references]]
kind = "field"
owner = "com.example.Foo"
name = "count"
type = "long""#,
        },
    }
}

fn explain_empty_range() -> Explanation {
    let mut exp = explain_range();
    exp.title = "Empty Range";
    exp
}

fn explain_artifact_resolution_failure() -> Explanation {
    let mut exp = explain_resolution();
    exp.title = "Artifact Resolution Failure";
    exp
}

fn explain_over_broad_match() -> Explanation {
    let mut exp = explain_inverse();
    exp.title = "Over-Broad Match";
    exp
}

fn explain_no_inverse_candidates() -> Explanation {
    Explanation {
        title: "No Inverse Candidates",
        description: "\
`assert_inverse` is enabled, but the registry publishes no version outside the
declared range, so the inverse assertion holds vacuously. This is reported as
information so that it is never mistaken for a real inverse check.",
        remediation: "\
Nothing to fix. The finding disappears once a version outside the range is
published; disable `assert_inverse` if the range intentionally covers all
releases.",
        examples: ExamplePair {
            before: r#"[[pass]]
versions = "[0.0.1,99.0.0)"
assert_inverse = true"#,
            after: r#"[[pass]]
versions = "[0.0.1,99.0.0)"
assert_inverse = false"#,
        },
    }
}

fn explain_unexpected_match() -> Explanation {
    let mut exp = explain_fail_directive();
    exp.title = "Unexpected Match";
    exp
}
