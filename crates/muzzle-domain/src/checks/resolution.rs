use super::utils::{FindingParts, build_allowlist, directive_subject, finding, is_allowed};
use crate::policy::EffectiveConfig;
use crate::report::{Incompatibility, MuzzleReport};
use crate::resolver::ResolveError;
use muzzle_types::{Finding, ids};
use serde_json::json;

pub fn run(reports: &[MuzzleReport], cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    let Some(policy) = cfg.check_policy(ids::CHECK_MUZZLE_RESOLUTION) else {
        return;
    };
    let allow = build_allowlist(&policy.allow);

    for report in reports {
        let listing_target = report.listing_error.as_ref().map(ResolveError::target);
        for incompatibility in report.incompatibilities() {
            let Incompatibility::ArtifactResolutionFailure { error } = incompatibility else {
                continue;
            };
            let target = error.target().to_string();
            if is_allowed(allow.as_ref(), &target) {
                continue;
            }

            let listing = listing_target == Some(target.as_str());
            let (subject, coordinate) = if listing {
                (directive_subject(report), None)
            } else {
                (target.clone(), Some(target.clone()))
            };

            out.push(finding(
                report,
                FindingParts {
                    check_id: ids::CHECK_MUZZLE_RESOLUTION,
                    code: ids::CODE_ARTIFACT_RESOLUTION_FAILURE,
                    severity: policy.severity,
                    message: if listing {
                        format!("could not list published versions: {error}")
                    } else {
                        format!("could not resolve artifact: {error}")
                    },
                    subject,
                    coordinate,
                    reference: None,
                    help: "Check that the registry is reachable and publishes this artifact; transient failures are retried before being reported.",
                    data: json!({
                        "target": target,
                        "retryable": error.is_retryable(),
                        "listing": listing,
                    }),
                },
            ));
        }
    }
}
