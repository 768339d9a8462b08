//! Config parsing and profile/preset resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.
//! Reading `muzzle.toml` and advice files is the caller's job.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{
    AdviceConfig, AdviceFileV1, CheckConfig, DirectiveConfig, MuzzleConfigV1, ReferenceConfig,
    RetryConfig, TestEnvConfig,
};
pub use resolve::{Overrides, ResolvedConfig, RetrySettings, resolve_reference, resolve_references};

use muzzle_domain::directive::Directive;
use muzzle_domain::model::Advice;
use muzzle_types::{DirectiveKind, Location};

/// Parse `muzzle.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<MuzzleConfigV1> {
    let cfg: MuzzleConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config used by the engine (profiles + overrides + per-check config).
pub fn resolve_config(
    cfg: MuzzleConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}

/// Parse an advice file (`[[references]]` tables) into domain references.
pub fn parse_advice_toml(input: &str) -> anyhow::Result<Advice> {
    let file: AdviceFileV1 = toml::from_str(input)?;
    resolve_references(&file.references)
}

/// Point each directive at its `[[pass]]`/`[[fail]]` header in `input`.
///
/// `directives` must be in `ResolvedConfig` order. Headers that cannot be found leave the
/// line unset. Lines inside multi-line strings are skipped.
pub fn locate_directives(input: &str, path: &str, directives: &mut [Directive]) {
    let mut pass_lines = Vec::new();
    let mut fail_lines = Vec::new();
    // Open multi-line string delimiter; headers inside one are string content.
    let mut open_string: Option<&str> = None;
    for (i, line) in input.lines().enumerate() {
        if let Some(delim) = open_string {
            if line.matches(delim).count() % 2 == 1 {
                open_string = None;
            }
            continue;
        }

        let compact: String = line.split('#').next().unwrap_or("").split_whitespace().collect();
        match compact.as_str() {
            "[[pass]]" => pass_lines.push(i as u32 + 1),
            "[[fail]]" => fail_lines.push(i as u32 + 1),
            _ => {}
        }

        open_string = ["\"\"\"", "'''"]
            .into_iter()
            .find(|delim| line.matches(delim).count() % 2 == 1);
    }

    let mut pass_lines = pass_lines.into_iter();
    let mut fail_lines = fail_lines.into_iter();
    for directive in directives {
        let line = match directive.kind {
            DirectiveKind::Pass => pass_lines.next(),
            DirectiveKind::Fail => fail_lines.next(),
        };
        directive.location = Some(Location {
            path: path.to_string(),
            line,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muzzle_domain::model::{Manifestation, Member, Ownership, Visibility};
    use muzzle_types::{Severity, ids};
    use std::time::Duration;

    const FULL: &str = r#"
profile = "strict"
fail_on = "warning"
max_findings = 50
threads = 4

[retry]
max_attempts = 5
initial_backoff_ms = 10
max_backoff_ms = 40

[[pass]]
group = "org.apache.camel"
module = "camel-core"
versions = "[3.7.0,3.8.0)"
assertInverse = true
skip_versions = ["3.7.3"]

[[fail]]
group = "org.apache.camel"
module = "camel-core"
versions = "[2.0.0,3.0.0)"

[checks."muzzle.inverse"]
severity = "warning"
allow = ["org.apache.camel:camel-core:3.8.*"]

[advice]
files = ["advice/camel.toml"]

[[advice.references]]
kind = "method"
owner = "org.apache.camel.CamelContext"
name = "start"

[test]
jvm_args = ["-XX:+IgnoreUnrecognizedVMOptions"]
force = ["ch.qos.logback:logback-classic:1.2.11"]
"#;

    #[test]
    fn full_config_resolves() {
        let cfg = parse_config_toml(FULL).expect("parse");
        let resolved = resolve_config(cfg, Overrides::default()).expect("resolve");

        assert_eq!(resolved.effective.profile, "strict");
        assert_eq!(resolved.effective.max_findings, 50);
        assert_eq!(resolved.threads, 4);
        assert_eq!(
            resolved.retry,
            RetrySettings {
                max_attempts: 5,
                initial_backoff: Duration::from_millis(10),
                max_backoff: Duration::from_millis(40),
            }
        );

        let inverse = resolved
            .effective
            .check_policy(ids::CHECK_MUZZLE_INVERSE)
            .expect("inverse enabled");
        assert_eq!(inverse.severity, Severity::Warning);
        assert_eq!(inverse.allow, vec!["org.apache.camel:camel-core:3.8.*"]);

        assert_eq!(resolved.directives.len(), 2);
        let pass = &resolved.directives[0];
        assert_eq!(pass.kind, DirectiveKind::Pass);
        assert!(pass.assert_inverse);
        assert_eq!(pass.inverse_neighbors, 3);
        assert_eq!(pass.range.to_string(), "[3.7.0,3.8.0)");
        assert_eq!(pass.skip_versions.len(), 1);
        assert_eq!(resolved.directives[1].kind, DirectiveKind::Fail);

        assert_eq!(resolved.advice.len(), 1);
        assert_eq!(resolved.advice_files, vec!["advice/camel.toml"]);
        assert_eq!(resolved.test.force.len(), 1);
    }

    #[test]
    fn overrides_win_over_file() {
        let cfg = parse_config_toml(FULL).expect("parse");
        let resolved = resolve_config(
            cfg,
            Overrides {
                profile: Some("warn".to_string()),
                max_findings: Some(7),
                threads: Some(1),
            },
        )
        .expect("resolve");
        assert_eq!(resolved.effective.profile, "warn");
        assert_eq!(resolved.effective.max_findings, 7);
        assert_eq!(resolved.threads, 1);
        let references = resolved
            .effective
            .check_policy(ids::CHECK_MUZZLE_REFERENCES)
            .expect("enabled");
        assert_eq!(references.severity, Severity::Warning);
    }

    #[test]
    fn empty_config_uses_strict_defaults() {
        let resolved =
            resolve_config(MuzzleConfigV1::default(), Overrides::default()).expect("resolve");
        assert_eq!(resolved.effective.profile, "strict");
        assert_eq!(resolved.effective.checks.len(), 5);
        assert!(resolved.directives.is_empty());
        assert_eq!(resolved.retry, RetrySettings::default());
        assert_eq!(resolved.threads, 0);
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let bad_range = "[[pass]]\ngroup = \"g\"\nmodule = \"m\"\nversions = \"[2.0,1.0)\"\n";
        let err = resolve_config(parse_config_toml(bad_range).expect("parse"), Overrides::default())
            .expect_err("inverted range");
        assert!(format!("{err:#}").contains("invalid [[pass]] directive #1"));

        let inverse_on_fail =
            "[[fail]]\ngroup = \"g\"\nmodule = \"m\"\nversions = \"[1.0,2.0)\"\nassert_inverse = true\n";
        assert!(
            resolve_config(parse_config_toml(inverse_on_fail).expect("parse"), Overrides::default())
                .is_err()
        );

        let bad_glob = "[checks.\"muzzle.references\"]\nallow = [\"[\"]\n";
        assert!(
            resolve_config(parse_config_toml(bad_glob).expect("parse"), Overrides::default())
                .is_err()
        );

        let bad_severity = "[checks.\"muzzle.range\"]\nseverity = \"fatal\"\n";
        assert!(
            resolve_config(parse_config_toml(bad_severity).expect("parse"), Overrides::default())
                .is_err()
        );

        let no_retries = "[retry]\nmax_attempts = 0\n";
        assert!(
            resolve_config(parse_config_toml(no_retries).expect("parse"), Overrides::default())
                .is_err()
        );
    }

    #[test]
    fn zero_max_findings_is_rejected() {
        let cfg = parse_config_toml("max_findings = 0\n").expect("parse");
        let err = resolve_config(cfg, Overrides::default()).expect_err("zero cap");
        assert!(format!("{err:#}").contains("max_findings must be at least 1"));

        let err = resolve_config(
            MuzzleConfigV1::default(),
            Overrides {
                max_findings: Some(0),
                ..Overrides::default()
            },
        )
        .expect_err("zero cap override");
        assert!(format!("{err:#}").contains("max_findings"));
    }

    #[test]
    fn range_and_resolution_checks_cannot_be_silenced() {
        for (check_id, table) in [
            (ids::CHECK_MUZZLE_RANGE, "enabled = false"),
            (ids::CHECK_MUZZLE_RANGE, "allow = [\"org.apache.camel:*\"]"),
            (ids::CHECK_MUZZLE_RANGE, "severity = \"info\""),
            (ids::CHECK_MUZZLE_RESOLUTION, "enabled = false"),
            (ids::CHECK_MUZZLE_RESOLUTION, "allow = [\"*\"]"),
        ] {
            let input = format!("[checks.\"{check_id}\"]\n{table}\n");
            let cfg = parse_config_toml(&input).expect("parse");
            let err = resolve_config(cfg, Overrides::default()).expect_err(&input);
            assert!(format!("{err:#}").contains(check_id), "{err:#}");
        }

        let downgraded = "[checks.\"muzzle.range\"]\nseverity = \"warning\"\n";
        let resolved =
            resolve_config(parse_config_toml(downgraded).expect("parse"), Overrides::default())
                .expect("warning is allowed");
        let range = resolved
            .effective
            .check_policy(ids::CHECK_MUZZLE_RANGE)
            .expect("enabled");
        assert_eq!(range.severity, Severity::Warning);

        let inverse_off = "[checks.\"muzzle.inverse\"]\nenabled = false\n";
        let resolved =
            resolve_config(parse_config_toml(inverse_off).expect("parse"), Overrides::default())
                .expect("other checks can be disabled");
        assert!(resolved.effective.check_policy(ids::CHECK_MUZZLE_INVERSE).is_none());
    }

    #[test]
    fn advice_file_references_resolve_with_modifiers() {
        let advice = parse_advice_toml(
            r#"
[[references]]
kind = "class"
owner = "org.apache.camel.CamelContext"
flags = ["interface"]

[[references]]
kind = "method"
owner = "org.apache.camel.support.ObjectHelper"
name = "cast"
params = ["java.lang.Class", "java.lang.Object"]
returns = "java.lang.Object"
static = true

[[references]]
kind = "field"
owner = "org.apache.camel.impl.AbstractCamelContext"
name = "name"
type = "java.lang.String"
visibility = "protected"
flags = ["final"]
"#,
        )
        .expect("advice");

        let refs = advice.references();
        assert_eq!(refs.len(), 3);
        assert_eq!(
            refs[0].modifiers.manifestation,
            Some(Manifestation::Interface)
        );
        assert_eq!(refs[1].modifiers.ownership, Some(Ownership::Static));
        assert!(matches!(&refs[1].member, Member::Method { returns, .. } if returns == "java.lang.Object"));
        assert_eq!(refs[2].modifiers.visibility, Visibility::Protected);
        assert_eq!(refs[2].modifiers.manifestation, Some(Manifestation::Final));
    }

    #[test]
    fn malformed_references_are_rejected() {
        for input in [
            "[[references]]\nkind = \"method\"\nowner = \"A\"\n",
            "[[references]]\nkind = \"field\"\nowner = \"A\"\nname = \"f\"\n",
            "[[references]]\nkind = \"ctor\"\nowner = \"A\"\n",
            "[[references]]\nkind = \"class\"\nowner = \"A\"\nflags = [\"final\", \"interface\"]\n",
            "[[references]]\nkind = \"method\"\nowner = \"A\"\nname = \"m\"\nstatic = true\nflags = [\"instance\"]\n",
            "[[references]]\nkind = \"class\"\nowner = \"A\"\nvisibility = \"friend\"\n",
        ] {
            assert!(parse_advice_toml(input).is_err(), "accepted: {input}");
        }
    }

    #[test]
    fn directives_are_located_by_header() {
        let cfg = parse_config_toml(FULL).expect("parse");
        let mut resolved = resolve_config(cfg, Overrides::default()).expect("resolve");
        locate_directives(FULL, "muzzle.toml", &mut resolved.directives);

        let pass = resolved.directives[0].location.as_ref().expect("located");
        assert_eq!(pass.path, "muzzle.toml");
        assert_eq!(pass.line, Some(12));
        let fail = resolved.directives[1].location.as_ref().expect("located");
        assert_eq!(fail.line, Some(19));
    }

    #[test]
    fn headers_inside_multiline_strings_are_not_directives() {
        let input = r#"[test]
notes = """
copied from another project:
[[pass]]
"""

[[pass]]
group = "g"
module = "m"
versions = "[1.0,2.0)"

[[fail]]
group = "g"
module = "m"
versions = "[0.1,1.0)"
"#;
        let cfg = parse_config_toml(input).expect("parse");
        let mut resolved = resolve_config(cfg, Overrides::default()).expect("resolve");
        locate_directives(input, "muzzle.toml", &mut resolved.directives);

        let lines: Vec<Option<u32>> = resolved
            .directives
            .iter()
            .map(|d| d.location.as_ref().and_then(|l| l.line))
            .collect();
        assert_eq!(lines, vec![Some(7), Some(12)]);
    }
}
