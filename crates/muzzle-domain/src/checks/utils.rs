use crate::fingerprint::fingerprint_for_finding;
use crate::report::MuzzleReport;
use globset::{Glob, GlobSet, GlobSetBuilder};
use muzzle_types::{Finding, Severity};
use serde_json::{Value, json};

/// Patterns are validated in `muzzle-settings`; anything that still fails to compile is ignored.
pub fn build_allowlist(allow: &[String]) -> Option<GlobSet> {
    if allow.is_empty() {
        return None;
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in allow {
        if let Ok(glob) = Glob::new(pattern) {
            builder.add(glob);
        }
    }
    builder.build().ok()
}

pub fn is_allowed(allow: Option<&GlobSet>, value: &str) -> bool {
    allow.map(|set| set.is_match(value)).unwrap_or(false)
}

/// Directive context attached to every finding's `data`.
pub fn directive_data(report: &MuzzleReport) -> Value {
    let d = &report.directive;
    json!({
        "directive": d.kind,
        "group": d.group,
        "module": d.module,
        "versions": d.range.to_string(),
    })
}

/// `group:module@range`, the subject of directive-level findings.
pub fn directive_subject(report: &MuzzleReport) -> String {
    format!("{}@{}", report.directive.artifact(), report.directive.range)
}

pub struct FindingParts<'a> {
    pub check_id: &'a str,
    pub code: &'a str,
    pub severity: Severity,
    pub message: String,
    pub subject: String,
    pub coordinate: Option<String>,
    pub reference: Option<String>,
    pub help: &'a str,
    pub data: Value,
}

pub fn finding(report: &MuzzleReport, parts: FindingParts<'_>) -> Finding {
    let fingerprint = fingerprint_for_finding(
        parts.check_id,
        parts.code,
        &parts.subject,
        parts.reference.as_deref(),
    );
    let mut data = directive_data(report);
    if let (Value::Object(base), Value::Object(extra)) = (&mut data, parts.data) {
        base.extend(extra);
    }
    Finding {
        severity: parts.severity,
        check_id: parts.check_id.to_string(),
        code: parts.code.to_string(),
        message: parts.message,
        coordinate: parts.coordinate,
        reference: parts.reference,
        location: report.directive.location.clone(),
        help: Some(parts.help.to_string()),
        url: None,
        fingerprint: Some(fingerprint),
        data,
    }
}
