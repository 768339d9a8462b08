use super::utils::{FindingParts, build_allowlist, directive_subject, finding, is_allowed};
use crate::policy::EffectiveConfig;
use crate::report::{Incompatibility, MuzzleReport};
use muzzle_types::{Finding, Severity, ids};
use serde_json::json;

pub fn run(reports: &[MuzzleReport], cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    let Some(policy) = cfg.check_policy(ids::CHECK_MUZZLE_INVERSE) else {
        return;
    };
    let allow = build_allowlist(&policy.allow);

    for report in reports {
        // A vacuous inverse assertion is reported, never silently skipped.
        if let Some(sample) = report.inverse
            && sample.total() == 0
            && !is_allowed(allow.as_ref(), &report.directive.artifact())
        {
            out.push(finding(
                report,
                FindingParts {
                    check_id: ids::CHECK_MUZZLE_INVERSE,
                    code: ids::CODE_NO_INVERSE_CANDIDATES,
                    severity: Severity::Info,
                    message: format!(
                        "no published version of {} lies outside {}; the inverse assertion was not exercised",
                        report.directive.artifact(),
                        report.directive.range
                    ),
                    subject: directive_subject(report),
                    coordinate: None,
                    reference: None,
                    help: "Nothing to do unless versions outside the range are expected to exist.",
                    data: json!({ "inverse_neighbors": report.directive.inverse_neighbors }),
                },
            ));
        }

        for incompatibility in report.incompatibilities() {
            let Incompatibility::OverBroadMatch { coordinate } = incompatibility else {
                continue;
            };
            let rendered = coordinate.to_string();
            if is_allowed(allow.as_ref(), &rendered) {
                continue;
            }

            out.push(finding(
                report,
                FindingParts {
                    check_id: ids::CHECK_MUZZLE_INVERSE,
                    code: ids::CODE_OVER_BROAD_MATCH,
                    severity: policy.severity,
                    message: format!(
                        "{rendered} is outside {} but satisfies every reference",
                        report.directive.range
                    ),
                    subject: rendered.clone(),
                    coordinate: Some(rendered),
                    reference: None,
                    help: "Widen the declared range to include this version, or add a reference that distinguishes the supported versions.",
                    data: json!({ "version": coordinate.version().as_str() }),
                },
            ));
        }
    }
}
