//! The `explain` use case: look up check/code documentation.

use muzzle_types::explain::{self, Explanation};
use muzzle_types::ids;
use std::fmt::Write;

/// Which codes belong to which check.
const CHECK_CODES: &[(&str, &[&str])] = &[
    (
        ids::CHECK_MUZZLE_REFERENCES,
        &[ids::CODE_MISSING_SYMBOL, ids::CODE_SHAPE_MISMATCH],
    ),
    (ids::CHECK_MUZZLE_RANGE, &[ids::CODE_EMPTY_RANGE]),
    (
        ids::CHECK_MUZZLE_RESOLUTION,
        &[ids::CODE_ARTIFACT_RESOLUTION_FAILURE],
    ),
    (
        ids::CHECK_MUZZLE_INVERSE,
        &[ids::CODE_OVER_BROAD_MATCH, ids::CODE_NO_INVERSE_CANDIDATES],
    ),
    (
        ids::CHECK_MUZZLE_FAIL_DIRECTIVE,
        &[ids::CODE_UNEXPECTED_MATCH],
    ),
];

/// How an explained identifier relates to the rest of the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Related {
    /// A check id and the codes it can emit.
    Codes(&'static [&'static str]),
    /// A code and the check that emits it.
    Check(&'static str),
}

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    Found {
        explanation: Explanation,
        related: Option<Related>,
    },
    /// Unknown identifier; `suggestions` holds near matches from the catalog.
    NotFound {
        identifier: String,
        suggestions: Vec<&'static str>,
    },
}

/// Look up an explanation for a check_id or code.
pub fn run_explain(identifier: &str) -> ExplainOutput {
    let identifier = identifier.trim();
    match explain::lookup_explanation(identifier) {
        Some(explanation) => ExplainOutput::Found {
            explanation,
            related: related(identifier),
        },
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            suggestions: suggestions(identifier),
        },
    }
}

fn related(identifier: &str) -> Option<Related> {
    CHECK_CODES.iter().find_map(|(check, codes)| {
        if *check == identifier {
            Some(Related::Codes(*codes))
        } else if codes.iter().any(|code| *code == identifier) {
            Some(Related::Check(*check))
        } else {
            None
        }
    })
}

/// Catalog entries sharing a word with `identifier` (`over_broad` finds `over_broad_match`).
fn suggestions(identifier: &str) -> Vec<&'static str> {
    let needle = identifier.to_ascii_lowercase();
    let words: Vec<&str> = needle
        .split(['.', '_', '-', ' '])
        .filter(|w| w.len() >= 3 && *w != "muzzle")
        .collect();
    if words.is_empty() {
        return Vec::new();
    }

    explain::all_check_ids()
        .iter()
        .chain(explain::all_codes())
        .copied()
        .filter(|candidate| words.iter().any(|w| candidate.contains(w)))
        .collect()
}

/// Format an explanation for terminal display.
pub fn format_explanation(explanation: &Explanation, related: Option<&Related>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", explanation.title);
    let _ = writeln!(out, "{}\n", "=".repeat(explanation.title.len()));
    let _ = writeln!(out, "{}\n", explanation.description);

    match related {
        Some(Related::Codes(codes)) => {
            let _ = writeln!(out, "Codes: {}\n", codes.join(", "));
        }
        Some(Related::Check(check)) => {
            let _ = writeln!(out, "Reported by: {check}\n");
        }
        None => {}
    }

    let _ = writeln!(out, "Remediation\n-----------");
    let _ = writeln!(out, "{}\n", explanation.remediation);

    let _ = writeln!(out, "Examples\n--------\n");
    let _ = writeln!(
        out,
        "Before (finding):\n```toml\n{}\n```\n",
        explanation.examples.before
    );
    let _ = writeln!(
        out,
        "After (passing):\n```toml\n{}\n```",
        explanation.examples.after
    );

    out
}

/// Format the "not found" error message for terminal display.
pub fn format_not_found(identifier: &str, suggestions: &[&str]) -> String {
    let mut out = format!("Unknown check_id or code: {identifier}\n\n");

    if !suggestions.is_empty() {
        let _ = writeln!(out, "Did you mean:");
        for s in suggestions {
            let _ = writeln!(out, "  - {s}");
        }
        out.push('\n');
    }

    let _ = writeln!(out, "Known checks:");
    for (check, codes) in CHECK_CODES {
        let _ = writeln!(out, "  - {check} ({})", codes.join(", "));
    }
    let _ = writeln!(
        out,
        "  - {} ({})",
        ids::CHECK_TOOL_RUNTIME,
        ids::CODE_RUNTIME_ERROR
    );

    out
}
