use crate::checks;
use crate::policy::{EffectiveConfig, FailOn};
use crate::report::{CoordinateReport, DomainReport, MuzzleReport, Resolution, SeverityCounts};
use crate::version::ArtifactVersion;
use muzzle_types::{
    CoordinateResult, DirectiveSummary, Finding, MuzzleData, ReferenceResult, Severity, Verdict,
};
use std::cmp::Ordering;

pub fn evaluate(reports: &[MuzzleReport], cfg: &EffectiveConfig) -> DomainReport {
    let mut findings: Vec<Finding> = Vec::new();

    checks::run_all(reports, cfg, &mut findings);

    // Deterministic ordering before truncation.
    findings.sort_by(compare_findings);

    let total = findings.len() as u32;
    // Verdict and counts cover every finding; truncation only caps what is emitted.
    let verdict = compute_verdict(&findings, cfg.fail_on);
    let counts = SeverityCounts::from_findings(&findings);

    let mut emitted = findings;
    let mut truncated_reason: Option<String> = None;
    if emitted.len() > cfg.max_findings {
        emitted.truncate(cfg.max_findings);
        truncated_reason = Some(format!(
            "findings truncated to max_findings={}",
            cfg.max_findings
        ));
    }

    let data = MuzzleData {
        profile: cfg.profile.clone(),
        directives: reports.iter().map(summarize).collect(),
        versions_checked: reports.iter().map(|r| r.coordinates.len() as u32).sum(),
        references_checked: reports
            .iter()
            .flat_map(|r| r.coordinates.iter())
            .map(|c| c.outcomes().len() as u32)
            .sum(),
        findings_total: total,
        findings_emitted: emitted.len() as u32,
        truncated_reason,
    };

    DomainReport {
        verdict,
        findings: emitted,
        data,
        counts,
    }
}

fn summarize(report: &MuzzleReport) -> DirectiveSummary {
    let d = &report.directive;
    DirectiveSummary {
        kind: d.kind,
        group: d.group.clone(),
        module: d.module.clone(),
        versions: d.range.to_string(),
        assert_inverse: d.assert_inverse,
        coordinates: report.coordinates.iter().map(coordinate_result).collect(),
    }
}

fn coordinate_result(c: &CoordinateReport) -> CoordinateResult {
    CoordinateResult {
        coordinate: c.coordinate.to_string(),
        role: c.role,
        outcome: c.outcome(),
        references: c
            .outcomes()
            .iter()
            .map(|o| ReferenceResult {
                reference: o.reference.to_string(),
                status: o.check.status,
                detail: o.check.detail.clone(),
            })
            .collect(),
        error: match &c.resolution {
            Resolution::Failed(err) => Some(err.to_string()),
            Resolution::Resolved(_) => None,
        },
    }
}

fn compute_verdict(findings: &[Finding], fail_on: FailOn) -> Verdict {
    let has_error = findings.iter().any(|f| f.severity == Severity::Error);
    if has_error {
        return Verdict::Fail;
    }

    let has_warn = findings.iter().any(|f| f.severity == Severity::Warning);
    if has_warn {
        return match fail_on {
            FailOn::Warning => Verdict::Fail,
            FailOn::Error => Verdict::Warn,
        };
    }

    Verdict::Pass
}

fn compare_findings(a: &Finding, b: &Finding) -> Ordering {
    // Ordering priority:
    // 1) severity (error -> warning -> info)
    // 2) location.path, location.line (missing last)
    // 3) coordinate, by artifact then version order (missing last)
    // 4) check_id
    // 5) code
    // 6) reference
    // 7) message
    let severity_rank = |sev: Severity| match sev {
        Severity::Error => 0,
        Severity::Warning => 1,
        Severity::Info => 2,
    };
    let location_key = |f: &Finding| match &f.location {
        Some(l) => (l.path.clone(), l.line.unwrap_or(u32::MAX)),
        None => ("~".to_string(), u32::MAX),
    };

    severity_rank(a.severity)
        .cmp(&severity_rank(b.severity))
        .then_with(|| location_key(a).cmp(&location_key(b)))
        .then_with(|| compare_coordinates(a.coordinate.as_deref(), b.coordinate.as_deref()))
        .then_with(|| a.check_id.cmp(&b.check_id))
        .then_with(|| a.code.cmp(&b.code))
        .then_with(|| a.reference.cmp(&b.reference))
        .then_with(|| a.message.cmp(&b.message))
}

fn compare_coordinates(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let (a_artifact, a_version) = a.rsplit_once(':').unwrap_or((a, ""));
            let (b_artifact, b_version) = b.rsplit_once(':').unwrap_or((b, ""));
            a_artifact.cmp(b_artifact).then_with(|| {
                match (
                    ArtifactVersion::parse(a_version),
                    ArtifactVersion::parse(b_version),
                ) {
                    (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a_version.cmp(b_version)),
                    _ => a_version.cmp(b_version),
                }
            })
        }
    }
}
