//! Developer tasks (schema generation, fixture conformance, explain coverage).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use muzzle_test_util::summarize_report;
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or(manifest_dir)
}

/// Get the schemas directory path.
fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

fn fixtures_dir() -> PathBuf {
    project_root().join("tests").join("fixtures")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_report_schema() -> schemars::Schema {
    schema_for!(muzzle_types::MuzzleReportV1)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(muzzle_settings::MuzzleConfigV1)
}

fn generate_advice_schema() -> schemars::Schema {
    schema_for!(muzzle_settings::AdviceFileV1)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "muzzle.report.v1.json",
            generate: generate_report_schema,
        },
        SchemaSpec {
            filename: "muzzle.config.v1.json",
            generate: generate_config_schema,
        },
        SchemaSpec {
            filename: "muzzle.advice.v1.json",
            generate: generate_advice_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn compile(schema: &schemars::Schema) -> anyhow::Result<jsonschema::Validator> {
    let value = serde_json::to_value(schema).context("Failed to serialize schema")?;
    jsonschema::validator_for(&value).map_err(|e| anyhow::anyhow!("Failed to compile schema: {}", e))
}

/// Emit schemas to the schemas/ directory.
fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Validate that schemas in the repo match what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }

    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {}", name);
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {}", name);
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Validate fixture configs, then run muzzle on every fixture");
    eprintln!("  explain-coverage  Validate all check IDs and codes have explanations");
}

/// Fixture case directories: every directory with a `muzzle.toml`.
fn fixture_cases() -> anyhow::Result<Vec<PathBuf>> {
    let mut cases = Vec::new();
    for entry in fs::read_dir(fixtures_dir()).context("Failed to read tests/fixtures/")? {
        let path = entry?.path();
        if path.join("muzzle.toml").is_file() {
            cases.push(path);
        }
    }
    cases.sort();
    Ok(cases)
}

fn case_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// Fixture conformance.
///
/// 1. Every fixture `muzzle.toml` parses and validates against the config schema.
/// 2. The built binary's report for every fixture validates against the report schema.
/// 3. The report's summary matches the fixture's `expected.json`.
fn conform() -> anyhow::Result<()> {
    let config_schema = compile(&generate_config_schema())?;
    let report_schema = compile(&generate_report_schema())?;

    let muzzle_bin = project_root().join("target").join("debug").join("muzzle");
    #[cfg(target_os = "windows")]
    let muzzle_bin = muzzle_bin.with_extension("exe");
    if !muzzle_bin.exists() {
        bail!(
            "muzzle binary not found at {}.\nRun `cargo build -p muzzle-cli` first.",
            muzzle_bin.display()
        );
    }

    let registry = fixtures_dir().join("registry");
    let mut errors = Vec::new();
    let cases = fixture_cases()?;

    for case in &cases {
        let name = case_name(case);

        let text = fs::read_to_string(case.join("muzzle.toml"))?;
        let config = match muzzle_settings::parse_config_toml(&text) {
            Ok(config) => serde_json::to_value(config)?,
            Err(err) => {
                errors.push(format!("fixture '{}': config does not parse: {err:#}", name));
                continue;
            }
        };
        for err in config_schema.iter_errors(&config) {
            errors.push(format!("fixture '{}': config schema: {}", name, err));
        }

        let temp_dir = tempfile::tempdir().context("Failed to create temp dir")?;
        let report_out = temp_dir.path().join("report.json");
        let output = std::process::Command::new(&muzzle_bin)
            .current_dir(case)
            .arg("--registry")
            .arg(&registry)
            .arg("verify")
            .arg("--report-out")
            .arg(&report_out)
            .output()
            .with_context(|| format!("Failed to run muzzle on fixture '{}'", name))?;

        if !report_out.exists() {
            errors.push(format!(
                "fixture '{}': no report output generated: {}",
                name,
                String::from_utf8_lossy(&output.stderr)
            ));
            continue;
        }

        let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report_out)?)
            .with_context(|| format!("Failed to parse report for fixture '{}'", name))?;
        for err in report_schema.iter_errors(&report) {
            errors.push(format!("fixture '{}': report schema: {}", name, err));
        }

        let expected_path = case.join("expected.json");
        if expected_path.exists() {
            let expected: serde_json::Value =
                serde_json::from_str(&fs::read_to_string(&expected_path)?)?;
            let actual = summarize_report(&report, output.status.code().unwrap_or(-1));
            if actual != expected {
                errors.push(format!(
                    "fixture '{}': output differs from expected.json:\n{}",
                    name,
                    serde_json::to_string_pretty(&actual)?
                ));
                continue;
            }
        }
        println!("  ✓ fixture '{}' conforms", name);
    }

    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {}", err);
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ All {} fixtures pass conformance checks!", cases.len());
    Ok(())
}

/// Validate that all check IDs and codes have explanations.
fn explain_coverage() -> anyhow::Result<()> {
    let check_ids = muzzle_types::explain::all_check_ids();
    let codes = muzzle_types::explain::all_codes();

    let mut errors = Vec::new();
    for (kind, id) in check_ids
        .iter()
        .map(|id| ("Check ID", id))
        .chain(codes.iter().map(|code| ("Code", code)))
    {
        match muzzle_types::explain::lookup_explanation(id) {
            Some(exp) => {
                if exp.title.is_empty() {
                    errors.push(format!("{} '{}' has empty title", kind, id));
                }
                if exp.description.is_empty() {
                    errors.push(format!("{} '{}' has empty description", kind, id));
                }
                if exp.remediation.is_empty() {
                    errors.push(format!("{} '{}' has empty remediation", kind, id));
                }
            }
            None => errors.push(format!("{} '{}' has no explanation", kind, id)),
        }
    }

    if errors.is_empty() {
        println!("✓ {} check IDs have explanations", check_ids.len());
        println!("✓ {} codes have explanations", codes.len());
        println!("\n✓ All explain coverage checks passed!");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {}", error);
        }
        bail!(
            "Explain coverage validation failed with {} errors",
            errors.len()
        )
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
