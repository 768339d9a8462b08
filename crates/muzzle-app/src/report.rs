use anyhow::Context;
use muzzle_render::{
    RenderableData, RenderableDirective, RenderableFinding, RenderableLocation, RenderableReport,
    RenderableSeverity, RenderableVerdictStatus,
};
use muzzle_types::{
    CoordinateOutcome, CoordinateResult, CoordinateRole, DirectiveKind, DirectiveSummary,
    Finding, MuzzleData, MuzzleReportV1, ReportEnvelope, SCHEMA_REPORT_V1, Severity, ToolMeta,
    Verdict, ids,
};
use time::OffsetDateTime;

pub fn parse_report_json(text: &str) -> anyhow::Result<MuzzleReportV1> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema}");
    }

    serde_json::from_value(value).context("parse muzzle v1 report")
}

pub fn serialize_report(report: &MuzzleReportV1) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn to_renderable(report: &MuzzleReportV1) -> RenderableReport {
    RenderableReport {
        verdict: match report.verdict {
            Verdict::Pass => RenderableVerdictStatus::Pass,
            Verdict::Warn => RenderableVerdictStatus::Warn,
            Verdict::Fail => RenderableVerdictStatus::Fail,
        },
        findings: report.findings.iter().map(renderable_finding).collect(),
        data: RenderableData {
            directives: report.data.directives.iter().map(renderable_directive).collect(),
            versions_checked: report.data.versions_checked,
            references_checked: report.data.references_checked,
            findings_emitted: report.data.findings_emitted,
            findings_total: report.data.findings_total,
            truncated_reason: report.data.truncated_reason.clone(),
        },
    }
}

fn renderable_finding(f: &Finding) -> RenderableFinding {
    RenderableFinding {
        severity: match f.severity {
            Severity::Info => RenderableSeverity::Info,
            Severity::Warning => RenderableSeverity::Warning,
            Severity::Error => RenderableSeverity::Error,
        },
        check_id: Some(f.check_id.clone()),
        code: f.code.clone(),
        message: f.message.clone(),
        coordinate: f.coordinate.clone(),
        reference: f.reference.clone(),
        location: f.location.as_ref().map(|loc| RenderableLocation {
            path: loc.path.clone(),
            line: loc.line,
        }),
        help: f.help.clone(),
        url: f.url.clone(),
    }
}

fn renderable_directive(d: &DirectiveSummary) -> RenderableDirective {
    RenderableDirective {
        kind: match d.kind {
            DirectiveKind::Pass => "pass".to_string(),
            DirectiveKind::Fail => "fail".to_string(),
        },
        artifact: format!("{}:{}", d.group, d.module),
        versions: d.versions.clone(),
        assert_inverse: d.assert_inverse,
        checked: d.coordinates.len() as u32,
        failing: d
            .coordinates
            .iter()
            .filter(|c| contradicts(d.kind, c))
            .count() as u32,
    }
}

/// Whether a coordinate's outcome goes against what its directive asserts.
fn contradicts(kind: DirectiveKind, c: &CoordinateResult) -> bool {
    match (c.outcome, c.role, kind) {
        (CoordinateOutcome::Unresolved, _, _) => true,
        (CoordinateOutcome::Incompatible, CoordinateRole::InRange, DirectiveKind::Pass) => true,
        (CoordinateOutcome::Compatible, CoordinateRole::InRange, DirectiveKind::Fail) => true,
        (CoordinateOutcome::Compatible, CoordinateRole::Inverse, _) => true,
        _ => false,
    }
}

pub fn runtime_error_report(message: &str) -> MuzzleReportV1 {
    let now = OffsetDateTime::now_utc();
    ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "muzzle".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at: now,
        finished_at: now,
        verdict: Verdict::Fail,
        findings: vec![Finding {
            severity: Severity::Error,
            check_id: ids::CHECK_TOOL_RUNTIME.to_string(),
            code: ids::CODE_RUNTIME_ERROR.to_string(),
            message: message.to_string(),
            coordinate: None,
            reference: None,
            location: None,
            help: Some("Fix the tool error and re-run muzzle.".to_string()),
            url: None,
            fingerprint: None,
            data: serde_json::Value::Null,
        }],
        data: MuzzleData {
            profile: "unknown".to_string(),
            findings_total: 1,
            findings_emitted: 1,
            ..MuzzleData::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinate(version: &str, role: CoordinateRole, outcome: CoordinateOutcome) -> CoordinateResult {
        CoordinateResult {
            coordinate: format!("org.example:foo:{version}"),
            role,
            outcome,
            references: Vec::new(),
            error: None,
        }
    }

    #[test]
    fn runtime_error_report_round_trips_through_json() {
        let report = runtime_error_report("boom");
        let bytes = serialize_report(&report).expect("serialize");
        let text = String::from_utf8(bytes).expect("utf8");
        let parsed = parse_report_json(&text).expect("parse");

        assert_eq!(parsed.verdict, Verdict::Fail);
        assert_eq!(parsed.findings.len(), 1);
        assert_eq!(parsed.findings[0].check_id, ids::CHECK_TOOL_RUNTIME);
        assert_eq!(parsed.findings[0].message, "boom");
    }

    #[test]
    fn unknown_schema_is_rejected() {
        let err = parse_report_json(r#"{"schema":"other.report.v1"}"#).expect_err("reject");
        assert!(err.to_string().contains("unknown report schema"));
    }

    #[test]
    fn renderable_directive_counts_contradictions() {
        let pass = DirectiveSummary {
            kind: DirectiveKind::Pass,
            group: "org.example".to_string(),
            module: "foo".to_string(),
            versions: "[1.0,2.0)".to_string(),
            assert_inverse: true,
            coordinates: vec![
                coordinate("1.0", CoordinateRole::InRange, CoordinateOutcome::Compatible),
                coordinate("1.5", CoordinateRole::InRange, CoordinateOutcome::Incompatible),
                coordinate("1.6", CoordinateRole::InRange, CoordinateOutcome::Unresolved),
                coordinate("0.9", CoordinateRole::Inverse, CoordinateOutcome::Incompatible),
                coordinate("2.0", CoordinateRole::Inverse, CoordinateOutcome::Compatible),
            ],
        };
        let row = renderable_directive(&pass);
        assert_eq!(row.kind, "pass");
        assert_eq!(row.artifact, "org.example:foo");
        assert_eq!(row.checked, 5);
        assert_eq!(row.failing, 3);

        let fail = DirectiveSummary {
            kind: DirectiveKind::Fail,
            assert_inverse: false,
            coordinates: vec![
                coordinate("0.5", CoordinateRole::InRange, CoordinateOutcome::Compatible),
                coordinate("0.6", CoordinateRole::InRange, CoordinateOutcome::Incompatible),
            ],
            ..pass
        };
        assert_eq!(renderable_directive(&fail).failing, 1);
    }

    #[test]
    fn to_renderable_copies_finding_fields() {
        let report = runtime_error_report("boom");
        let renderable = to_renderable(&report);
        assert_eq!(renderable.verdict, RenderableVerdictStatus::Fail);
        assert_eq!(renderable.findings[0].code, ids::CODE_RUNTIME_ERROR);
        assert_eq!(renderable.data.findings_emitted, 1);
        assert!(renderable.data.directives.is_empty());
    }
}
