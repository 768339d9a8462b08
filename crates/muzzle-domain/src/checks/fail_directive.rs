use super::utils::{FindingParts, build_allowlist, finding, is_allowed};
use crate::policy::EffectiveConfig;
use crate::report::{Incompatibility, MuzzleReport};
use muzzle_types::{Finding, ids};
use serde_json::json;

pub fn run(reports: &[MuzzleReport], cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    let Some(policy) = cfg.check_policy(ids::CHECK_MUZZLE_FAIL_DIRECTIVE) else {
        return;
    };
    let allow = build_allowlist(&policy.allow);

    for report in reports {
        for incompatibility in report.incompatibilities() {
            let Incompatibility::UnexpectedMatch { coordinate } = incompatibility else {
                continue;
            };
            let rendered = coordinate.to_string();
            if is_allowed(allow.as_ref(), &rendered) {
                continue;
            }

            out.push(finding(
                report,
                FindingParts {
                    check_id: ids::CHECK_MUZZLE_FAIL_DIRECTIVE,
                    code: ids::CODE_UNEXPECTED_MATCH,
                    severity: policy.severity,
                    message: format!(
                        "{rendered} is declared incompatible but satisfies every reference"
                    ),
                    subject: rendered.clone(),
                    coordinate: Some(rendered),
                    reference: None,
                    help: "Move this version into a pass directive, or add a reference that fails against it.",
                    data: json!({ "version": coordinate.version().as_str() }),
                },
            ));
        }
    }
}
