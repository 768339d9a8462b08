use muzzle_domain::policy::{CheckPolicy, EffectiveConfig, FailOn};
use muzzle_types::Severity;
use std::collections::BTreeMap;

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything complex should go into repo config.
pub fn preset(profile: &str) -> EffectiveConfig {
    match profile {
        "warn" => warn_profile(),
        // default
        _ => strict_profile(),
    }
}

fn strict_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: "strict".to_string(),
        fail_on: FailOn::Error,
        max_findings: 200,
        checks: default_checks(Severity::Error),
    }
}

fn warn_profile() -> EffectiveConfig {
    // Everything is reported, nothing fails the build.
    EffectiveConfig {
        profile: "warn".to_string(),
        fail_on: FailOn::Error,
        max_findings: 200,
        checks: default_checks(Severity::Warning),
    }
}

fn default_checks(default_severity: Severity) -> BTreeMap<String, CheckPolicy> {
    use muzzle_types::ids::*;
    let mut m = BTreeMap::new();

    for id in [
        CHECK_MUZZLE_REFERENCES,
        CHECK_MUZZLE_RANGE,
        CHECK_MUZZLE_RESOLUTION,
        CHECK_MUZZLE_INVERSE,
        CHECK_MUZZLE_FAIL_DIRECTIVE,
    ] {
        m.insert(id.to_string(), CheckPolicy::enabled(default_severity));
    }

    m
}
