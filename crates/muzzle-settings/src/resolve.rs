use crate::model::{DirectiveConfig, MuzzleConfigV1, ReferenceConfig, TestEnvConfig};
use crate::presets;
use anyhow::Context;
use globset::Glob;
use muzzle_domain::directive::{DEFAULT_INVERSE_NEIGHBORS, Directive};
use muzzle_domain::model::{
    Advice, Manifestation, Modifiers, Ownership, SymbolicReference, Visibility,
};
use muzzle_domain::policy::{CheckPolicy, EffectiveConfig, FailOn};
use muzzle_domain::version::{ArtifactVersion, VersionRange};
use muzzle_types::{DirectiveKind, Severity, ids};
use std::time::Duration;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub max_findings: Option<u32>,
    pub threads: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_millis(2000),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
    /// Pass directives first, then fail directives, each in declaration order.
    pub directives: Vec<Directive>,
    /// Inline `[[advice.references]]` only; `advice_files` are loaded by the caller.
    pub advice: Advice,
    pub advice_files: Vec<String>,
    pub retry: RetrySettings,
    pub threads: usize,
    pub test: TestEnvConfig,
}

pub fn resolve_config(cfg: MuzzleConfigV1, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "strict".to_string());

    let mut effective = presets::preset(&profile);

    // max findings
    if let Some(mf) = overrides.max_findings.or(cfg.max_findings) {
        if mf == 0 {
            anyhow::bail!("max_findings must be at least 1");
        }
        effective.max_findings = mf as usize;
    }

    // per-check overrides
    for (check_id, cc) in cfg.checks.iter() {
        let entry = effective
            .checks
            .entry(check_id.clone())
            .or_insert_with(CheckPolicy::disabled);

        if let Some(enabled) = cc.enabled {
            entry.enabled = enabled;
        }
        if let Some(sev) = cc.severity.as_deref() {
            entry.severity =
                parse_severity(sev).with_context(|| format!("invalid severity for {check_id}"))?;
        }
        if !cc.allow.is_empty() {
            validate_allowlist(check_id, &cc.allow)?;
            entry.allow = cc.allow.clone();
        }
        if MANDATORY_CHECKS.contains(&check_id.as_str()) {
            ensure_reported(check_id, entry)?;
        }
    }

    // fail_on override from config
    if let Some(fail_on_s) = cfg.fail_on.as_deref() {
        effective.fail_on = parse_fail_on(fail_on_s)?;
    }

    let mut directives = Vec::with_capacity(cfg.pass.len() + cfg.fail.len());
    for (i, dc) in cfg.pass.iter().enumerate() {
        directives.push(
            resolve_directive(DirectiveKind::Pass, dc)
                .with_context(|| format!("invalid [[pass]] directive #{}", i + 1))?,
        );
    }
    for (i, dc) in cfg.fail.iter().enumerate() {
        directives.push(
            resolve_directive(DirectiveKind::Fail, dc)
                .with_context(|| format!("invalid [[fail]] directive #{}", i + 1))?,
        );
    }

    let advice = resolve_references(&cfg.advice.references)?;

    let mut retry = RetrySettings::default();
    if let Some(rc) = &cfg.retry {
        if let Some(n) = rc.max_attempts {
            if n == 0 {
                anyhow::bail!("retry.max_attempts must be at least 1");
            }
            retry.max_attempts = n;
        }
        if let Some(ms) = rc.initial_backoff_ms {
            retry.initial_backoff = Duration::from_millis(ms);
        }
        if let Some(ms) = rc.max_backoff_ms {
            retry.max_backoff = Duration::from_millis(ms);
        }
        if retry.max_backoff < retry.initial_backoff {
            anyhow::bail!("retry.max_backoff_ms must not be below retry.initial_backoff_ms");
        }
    }

    Ok(ResolvedConfig {
        effective,
        directives,
        advice,
        advice_files: cfg.advice.files.clone(),
        retry,
        threads: overrides.threads.or(cfg.threads).unwrap_or(0),
        test: cfg.test.clone().unwrap_or_default(),
    })
}

fn resolve_directive(kind: DirectiveKind, dc: &DirectiveConfig) -> anyhow::Result<Directive> {
    if dc.group.trim().is_empty() || dc.module.trim().is_empty() {
        anyhow::bail!("group and module must not be empty");
    }
    let range = VersionRange::parse(&dc.versions)
        .with_context(|| format!("invalid versions for {}:{}: {}", dc.group, dc.module, dc.versions))?;

    let assert_inverse = dc.assert_inverse.unwrap_or(false);
    if assert_inverse && kind == DirectiveKind::Fail {
        anyhow::bail!("assert_inverse is only valid on [[pass]] directives");
    }

    let mut skip_versions = Vec::with_capacity(dc.skip_versions.len());
    for s in &dc.skip_versions {
        skip_versions.push(
            ArtifactVersion::parse(s).with_context(|| format!("invalid skip_versions entry: {s}"))?,
        );
    }

    Ok(Directive {
        kind,
        group: dc.group.trim().to_string(),
        module: dc.module.trim().to_string(),
        range,
        assert_inverse,
        inverse_neighbors: dc.inverse_neighbors.unwrap_or(DEFAULT_INVERSE_NEIGHBORS),
        skip_versions,
        include_prereleases: dc.include_prereleases.unwrap_or(false),
        location: None,
    })
}

/// Resolve user-facing reference entries into domain references, in order.
pub fn resolve_references(entries: &[ReferenceConfig]) -> anyhow::Result<Advice> {
    let mut references = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        references.push(
            resolve_reference(entry)
                .with_context(|| format!("invalid reference #{} ({})", i + 1, entry.owner))?,
        );
    }
    Ok(Advice::new(references))
}

pub fn resolve_reference(entry: &ReferenceConfig) -> anyhow::Result<SymbolicReference> {
    let owner = entry.owner.trim();
    if owner.is_empty() {
        anyhow::bail!("owner must not be empty");
    }
    let reference = match entry.kind.as_str() {
        "class" => SymbolicReference::class(owner),
        "method" => SymbolicReference::method(
            owner,
            member_name(entry)?,
            entry.params.iter().map(|p| p.trim().to_string()),
            entry.returns.as_deref().unwrap_or("void").trim(),
        ),
        "field" => {
            let Some(field_type) = entry.field_type.as_deref() else {
                anyhow::bail!("field references need a type");
            };
            SymbolicReference::field(owner, member_name(entry)?, field_type.trim())
        }
        other => anyhow::bail!("unknown reference kind: {other} (expected class|method|field)"),
    };

    Ok(reference.with_modifiers(resolve_modifiers(entry)?))
}

fn member_name(entry: &ReferenceConfig) -> anyhow::Result<&str> {
    match entry.name.as_deref().map(str::trim) {
        Some(n) if !n.is_empty() => Ok(n),
        _ => anyhow::bail!("{} references need a name", entry.kind),
    }
}

fn resolve_modifiers(entry: &ReferenceConfig) -> anyhow::Result<Modifiers> {
    let mut modifiers = Modifiers::default();
    if let Some(v) = entry.visibility.as_deref() {
        modifiers.visibility = parse_visibility(v)?;
    }

    let mut set_ownership = |o: Ownership| -> anyhow::Result<()> {
        match modifiers.ownership {
            Some(existing) if existing != o => {
                anyhow::bail!("conflicting static/instance requirements")
            }
            _ => {
                modifiers.ownership = Some(o);
                Ok(())
            }
        }
    };
    if let Some(is_static) = entry.is_static {
        set_ownership(if is_static {
            Ownership::Static
        } else {
            Ownership::Instance
        })?;
    }

    let mut manifestation: Option<Manifestation> = None;
    for flag in &entry.flags {
        let parsed = match flag.as_str() {
            "static" => {
                set_ownership(Ownership::Static)?;
                continue;
            }
            "instance" => {
                set_ownership(Ownership::Instance)?;
                continue;
            }
            "final" => Manifestation::Final,
            "non_final" => Manifestation::NonFinal,
            "interface" => Manifestation::Interface,
            "non_interface" => Manifestation::NonInterface,
            other => anyhow::bail!(
                "unknown flag: {other} (expected static|instance|final|non_final|interface|non_interface)"
            ),
        };
        if manifestation.is_some_and(|m| m != parsed) {
            anyhow::bail!("at most one of final|non_final|interface|non_interface may be set");
        }
        manifestation = Some(parsed);
    }
    if entry.kind != "class"
        && matches!(
            manifestation,
            Some(Manifestation::Interface | Manifestation::NonInterface)
        )
    {
        anyhow::bail!("interface/non_interface flags only apply to class references");
    }
    modifiers.manifestation = manifestation;

    Ok(modifiers)
}

/// Checks whose findings mean nothing was verified. They may be downgraded to a warning but
/// never disabled, allowlisted or reduced to info.
const MANDATORY_CHECKS: &[&str] = &[ids::CHECK_MUZZLE_RANGE, ids::CHECK_MUZZLE_RESOLUTION];

fn ensure_reported(check_id: &str, policy: &CheckPolicy) -> anyhow::Result<()> {
    if !policy.enabled {
        anyhow::bail!("{check_id} cannot be disabled");
    }
    if !policy.allow.is_empty() {
        anyhow::bail!("{check_id} does not accept an allow list");
    }
    if policy.severity == Severity::Info {
        anyhow::bail!("{check_id} severity must be warning or error");
    }
    Ok(())
}

fn validate_allowlist(check_id: &str, patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        Glob::new(pattern)
            .with_context(|| format!("invalid allow glob for {check_id}: {pattern}"))?;
    }
    Ok(())
}

fn parse_visibility(v: &str) -> anyhow::Result<Visibility> {
    match v {
        "public" => Ok(Visibility::Public),
        "protected" => Ok(Visibility::Protected),
        "package" => Ok(Visibility::Package),
        "private" => Ok(Visibility::Private),
        other => anyhow::bail!("unknown visibility: {other} (expected public|protected|package|private)"),
    }
}

fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    match v {
        "info" => Ok(Severity::Info),
        "warning" | "warn" => Ok(Severity::Warning),
        "error" => Ok(Severity::Error),
        other => anyhow::bail!("unknown severity: {other} (expected info|warning|error)"),
    }
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "error" => Ok(FailOn::Error),
        "warning" | "warn" => Ok(FailOn::Warning),
        other => anyhow::bail!("unknown fail_on: {other} (expected error|warning)"),
    }
}
