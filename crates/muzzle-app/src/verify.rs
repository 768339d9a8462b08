//! The `verify` use case: resolve config and advice, run every directive, produce a report.

use anyhow::Context;
use camino::Utf8Path;
use muzzle_domain::model::Advice;
use muzzle_domain::resolver::ArtifactResolver;
use muzzle_domain::verifier::Verifier;
use muzzle_registry::RetryPolicy;
use muzzle_settings::{Overrides, ResolvedConfig, RetrySettings};
use muzzle_types::{MuzzleReportV1, ReportEnvelope, SCHEMA_REPORT_V1, ToolMeta, Verdict};
use time::OffsetDateTime;
use tracing::{debug, info};

/// Input for the verify use case.
#[derive(Clone, Debug)]
pub struct VerifyInput<'a> {
    /// Path of the config file; advice files are resolved relative to its directory.
    pub config_path: &'a Utf8Path,
    /// Config file contents.
    pub config_text: &'a str,
    /// Registry directory or `http(s)://` base URL.
    pub registry: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the verify use case.
#[derive(Clone, Debug)]
pub struct VerifyOutput {
    /// The generated report.
    pub report: MuzzleReportV1,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the verify use case: load config and advice, open the registry, verify, produce report.
pub fn run_verify(input: VerifyInput<'_>) -> anyhow::Result<VerifyOutput> {
    let resolved = load_config(input.config_path, input.config_text, input.overrides.clone())?;

    if resolved.directives.is_empty() {
        anyhow::bail!("no [[pass]] or [[fail]] directives configured");
    }
    if resolved.advice.is_empty() {
        anyhow::bail!("no advice references configured");
    }

    let resolver = muzzle_registry::open_registry(input.registry, retry_policy(&resolved.retry))
        .context("open registry")?;

    let report = verify_with(&resolved, resolver);
    Ok(VerifyOutput {
        report,
        resolved_config: resolved,
    })
}

/// Parse and resolve the config, locate its directives and merge in the advice files.
pub fn load_config(
    config_path: &Utf8Path,
    config_text: &str,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let cfg = muzzle_settings::parse_config_toml(config_text).context("parse config")?;
    let mut resolved =
        muzzle_settings::resolve_config(cfg, overrides).context("resolve config")?;

    muzzle_settings::locate_directives(
        config_text,
        config_path.as_str(),
        &mut resolved.directives,
    );

    let base = config_path.parent().unwrap_or(Utf8Path::new(""));
    let mut references = resolved.advice.references().to_vec();
    for file in &resolved.advice_files {
        let path = base.join(file);
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("read advice file {path}"))?;
        let advice = muzzle_settings::parse_advice_toml(&text)
            .with_context(|| format!("parse advice file {path}"))?;
        debug!(path = %path, references = advice.len(), "loaded advice file");
        references.extend(advice.references().iter().cloned());
    }
    resolved.advice = Advice::new(references);

    Ok(resolved)
}

/// Verify every resolved directive against `resolver` and wrap the result in a report envelope.
pub fn verify_with<R: ArtifactResolver>(resolved: &ResolvedConfig, resolver: R) -> MuzzleReportV1 {
    let started_at = OffsetDateTime::now_utc();

    info!(
        directives = resolved.directives.len(),
        references = resolved.advice.len(),
        threads = resolved.threads,
        "starting muzzle verification"
    );

    let verifier = Verifier::new(resolver).with_threads(resolved.threads);
    let reports = verifier.run_all(&resolved.directives, &resolved.advice);
    let domain = muzzle_domain::evaluate(&reports, &resolved.effective);

    info!(
        verdict = ?domain.verdict,
        errors = domain.counts.error,
        warnings = domain.counts.warning,
        "muzzle verification finished"
    );

    ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "muzzle".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict: domain.verdict,
        findings: domain.findings,
        data: domain.data,
    }
}

pub fn retry_policy(settings: &RetrySettings) -> RetryPolicy {
    RetryPolicy {
        max_attempts: settings.max_attempts,
        initial_backoff: settings.initial_backoff,
        max_backoff: settings.max_backoff,
    }
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}
