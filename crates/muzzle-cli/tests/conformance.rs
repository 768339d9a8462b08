//! Conformance tests for muzzle.
//!
//! These tests validate:
//! 1. All check IDs and codes have explanations
//! 2. The ID inventory matches the explain registry
//! 3. Every fixture's `expected.json` is well-formed
//! 4. Reports produced by the binary validate against the generated report schema

use assert_cmd::Command;
use muzzle_types::{MuzzleReportV1, explain, ids};
use serde_json::Value;
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("muzzle-cli should have parent")
        .parent()
        .expect("crates should have parent")
        .join("tests")
        .join("fixtures")
}

/// Fixture case directories: every directory with a `muzzle.toml`.
fn fixture_cases() -> Vec<PathBuf> {
    let mut cases: Vec<PathBuf> = std::fs::read_dir(fixtures_dir())
        .expect("Failed to read fixtures dir")
        .map(|entry| entry.expect("Failed to read entry").path())
        .filter(|path| path.join("muzzle.toml").is_file())
        .collect();
    cases.sort();
    cases
}

#[allow(deprecated)]
fn muzzle_cmd() -> Command {
    Command::cargo_bin("muzzle").expect("muzzle binary not found - run `cargo build` first")
}

// =============================================================================
// Explanation Coverage Tests
// =============================================================================

#[test]
fn all_check_ids_and_codes_have_explanations() {
    for id in explain::all_check_ids().iter().chain(explain::all_codes()) {
        let exp = explain::lookup_explanation(id)
            .unwrap_or_else(|| panic!("'{id}' has no explanation in registry"));
        assert!(!exp.title.is_empty(), "'{}' has empty title", id);
        assert!(!exp.description.is_empty(), "'{}' has empty description", id);
        assert!(!exp.remediation.is_empty(), "'{}' has empty remediation", id);
        assert!(!exp.examples.before.is_empty(), "'{}' has no example", id);
    }
}

#[test]
fn check_ids_and_codes_are_consistent() {
    for check_id in explain::all_check_ids() {
        assert!(
            check_id.starts_with("muzzle."),
            "Check ID '{}' should be namespaced (e.g., 'muzzle.references')",
            check_id
        );
    }

    for code in explain::all_codes() {
        let valid_chars = code.chars().all(|c| c.is_ascii_lowercase() || c == '_');
        assert!(
            valid_chars,
            "Code '{}' should be snake_case (lowercase with underscores)",
            code
        );
    }
}

// =============================================================================
// Known Check IDs and Codes Inventory
// =============================================================================

#[test]
fn known_check_ids_are_documented() {
    let known_check_ids = [
        ids::CHECK_MUZZLE_REFERENCES,
        ids::CHECK_MUZZLE_RANGE,
        ids::CHECK_MUZZLE_RESOLUTION,
        ids::CHECK_MUZZLE_INVERSE,
        ids::CHECK_MUZZLE_FAIL_DIRECTIVE,
    ];
    let registered = explain::all_check_ids();

    for id in &known_check_ids {
        assert!(registered.contains(id), "Known check ID '{}' is not registered", id);
    }
    for id in registered {
        assert!(
            known_check_ids.contains(id),
            "Check ID '{}' in registry but not in known_check_ids test - update the test",
            id
        );
    }
}

#[test]
fn known_codes_are_documented() {
    let known_codes = [
        ids::CODE_MISSING_SYMBOL,
        ids::CODE_SHAPE_MISMATCH,
        ids::CODE_EMPTY_RANGE,
        ids::CODE_ARTIFACT_RESOLUTION_FAILURE,
        ids::CODE_OVER_BROAD_MATCH,
        ids::CODE_NO_INVERSE_CANDIDATES,
        ids::CODE_UNEXPECTED_MATCH,
    ];
    let registered = explain::all_codes();

    for code in &known_codes {
        assert!(registered.contains(code), "Known code '{}' is not registered", code);
    }
    for code in registered {
        assert!(
            known_codes.contains(code),
            "Code '{}' in registry but not in known_codes test - update the test",
            code
        );
    }
}

// =============================================================================
// Fixture Validation
// =============================================================================

#[test]
fn all_fixture_expectations_are_well_formed() {
    let cases = fixture_cases();
    assert!(!cases.is_empty(), "no fixture cases found");

    for case in cases {
        let path = case.join("expected.json");
        let content = std::fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("{} is missing", path.display()));
        let expected: Value = serde_json::from_str(&content)
            .unwrap_or_else(|e| panic!("{} is not JSON: {e}", path.display()));

        let exit_code = expected["exit_code"].as_i64().expect("exit_code");
        assert!(matches!(exit_code, 0 | 2), "{}: bad exit_code", path.display());
        assert!(
            matches!(expected["verdict"].as_str(), Some("pass" | "warn" | "fail")),
            "{}: bad verdict",
            path.display()
        );

        for finding in expected["findings"].as_array().expect("findings array") {
            let code = finding["code"].as_str().expect("code");
            assert!(
                explain::all_codes().contains(&code),
                "{}: unknown code {code}",
                path.display()
            );
        }
    }
}

#[test]
fn produced_reports_validate_against_schema() {
    let schema = serde_json::to_value(schemars::schema_for!(MuzzleReportV1)).expect("schema json");
    let validator = jsonschema::validator_for(&schema).expect("schema compiles");

    let registry = fixtures_dir().join("registry");
    for case in fixture_cases() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let report_path = temp_dir.path().join("report.json");

        muzzle_cmd()
            .current_dir(&case)
            .arg("--registry")
            .arg(&registry)
            .arg("verify")
            .arg("--report-out")
            .arg(&report_path)
            .output()
            .expect("run muzzle");

        let report: Value = serde_json::from_str(
            &std::fs::read_to_string(&report_path).expect("report written"),
        )
        .expect("report json");

        let errors: Vec<String> = validator.iter_errors(&report).map(|e| e.to_string()).collect();
        assert!(
            errors.is_empty(),
            "{}: schema validation failed: {errors:?}",
            case.display()
        );
        assert_eq!(report["schema"], "muzzle.report.v1");
    }
}
