//! Shared test utilities for the muzzle workspace.
//!
//! This crate exists because `xtask` needs these helpers at runtime (not behind
//! `#[cfg(test)]`), so a `#[cfg(test)]` module inside `muzzle-types` would not suffice.

use serde_json::{Map, Value};

/// Normalize non-deterministic JSON fields for golden-file comparison.
///
/// 1. **Root-only**: `tool.version` is replaced with `"__VERSION__"` only when the *root*
///    object looks like a report envelope (`schema`, `tool`, `verdict`, `findings`, `data`).
///    Finding `data` payloads carry artifact versions that must stay untouched.
///
/// 2. **Recursive**: `started_at` and `finished_at` are normalized at any depth.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_envelope = ["schema", "tool", "verdict", "findings", "data"]
            .iter()
            .all(|key| obj.contains_key(*key));
        if is_envelope
            && let Some(tool) = obj.get_mut("tool")
            && let Some(tool_obj) = tool.as_object_mut()
            && tool_obj.contains_key("name")
            && tool_obj.contains_key("version")
        {
            tool_obj.insert(
                "version".to_string(),
                Value::String("__VERSION__".to_string()),
            );
        }
    }
    normalize_timestamps_recursive(&mut value);
    value
}

fn normalize_timestamps_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in ["started_at", "finished_at"] {
                if map.contains_key(key) {
                    map.insert(key.to_string(), Value::String("__TIMESTAMP__".to_string()));
                }
            }
            for val in map.values_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        _ => {}
    }
}

/// Project a report onto the shape of a fixture's `expected.json`.
///
/// Keeps the exit code, the verdict and, per finding, `severity`, `check_id`, `code`,
/// `coordinate`, `reference` and the directive line. Messages, fingerprints and data
/// payloads are left to unit tests.
pub fn summarize_report(report: &Value, exit_code: i32) -> Value {
    let findings: Vec<Value> = report
        .get("findings")
        .and_then(Value::as_array)
        .map(|findings| findings.iter().map(summarize_finding).collect())
        .unwrap_or_default();

    let mut out = Map::new();
    out.insert("exit_code".to_string(), Value::from(exit_code));
    out.insert(
        "verdict".to_string(),
        report.get("verdict").cloned().unwrap_or(Value::Null),
    );
    out.insert("findings".to_string(), Value::Array(findings));
    Value::Object(out)
}

fn summarize_finding(finding: &Value) -> Value {
    let mut out = Map::new();
    for key in ["severity", "check_id", "code", "coordinate", "reference"] {
        if let Some(v) = finding.get(key) {
            out.insert(key.to_string(), v.clone());
        }
    }
    if let Some(line) = finding.get("location").and_then(|l| l.get("line")) {
        out.insert("line".to_string(), line.clone());
    }
    Value::Object(out)
}
