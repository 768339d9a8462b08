use super::utils::{FindingParts, build_allowlist, directive_subject, finding, is_allowed};
use crate::policy::EffectiveConfig;
use crate::report::{Incompatibility, MuzzleReport};
use muzzle_types::{Finding, ids};
use serde_json::json;

pub fn run(reports: &[MuzzleReport], cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    let Some(policy) = cfg.check_policy(ids::CHECK_MUZZLE_RANGE) else {
        return;
    };
    let allow = build_allowlist(&policy.allow);

    for report in reports {
        for incompatibility in report.incompatibilities() {
            let Incompatibility::EmptyRange { artifact, range } = incompatibility else {
                continue;
            };
            if is_allowed(allow.as_ref(), &artifact) {
                continue;
            }

            out.push(finding(
                report,
                FindingParts {
                    check_id: ids::CHECK_MUZZLE_RANGE,
                    code: ids::CODE_EMPTY_RANGE,
                    severity: policy.severity,
                    message: format!("no published version of {artifact} falls in {range}"),
                    subject: directive_subject(report),
                    coordinate: None,
                    reference: None,
                    help: "Check the range bounds against the published versions (`muzzle versions`), and that skip_versions or prerelease filtering did not remove every candidate.",
                    data: json!({
                        "skip_versions": report
                            .directive
                            .skip_versions
                            .iter()
                            .map(|v| v.as_str())
                            .collect::<Vec<_>>(),
                        "include_prereleases": report.directive.include_prereleases,
                    }),
                },
            ));
        }
    }
}
