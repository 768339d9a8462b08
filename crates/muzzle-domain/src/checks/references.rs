use super::utils::{FindingParts, build_allowlist, finding, is_allowed};
use crate::policy::EffectiveConfig;
use crate::report::{Incompatibility, MuzzleReport};
use muzzle_types::{Finding, ids};
use serde_json::json;

pub fn run(reports: &[MuzzleReport], cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    let Some(policy) = cfg.check_policy(ids::CHECK_MUZZLE_REFERENCES) else {
        return;
    };
    let allow = build_allowlist(&policy.allow);

    for report in reports {
        for incompatibility in report.incompatibilities() {
            let (code, coordinate, reference, detail) = match incompatibility {
                Incompatibility::MissingSymbol {
                    coordinate,
                    reference,
                    detail,
                } => (ids::CODE_MISSING_SYMBOL, coordinate, reference, detail),
                Incompatibility::ShapeMismatch {
                    coordinate,
                    reference,
                    detail,
                } => (ids::CODE_SHAPE_MISMATCH, coordinate, reference, detail),
                _ => continue,
            };

            let rendered = reference.to_string();
            if is_allowed(allow.as_ref(), &reference.owner) || is_allowed(allow.as_ref(), &rendered)
            {
                continue;
            }

            let (message, help) = if code == ids::CODE_MISSING_SYMBOL {
                (
                    format!("{coordinate}: {rendered} is missing ({detail})"),
                    "Narrow the directive's version range, or guard the advice so it does not reference the symbol in these versions.",
                )
            } else {
                (
                    format!("{coordinate}: {rendered} has an incompatible shape ({detail})"),
                    "Update the reference's signature or modifiers to match this version, or split the directive by version.",
                )
            };

            out.push(finding(
                report,
                FindingParts {
                    check_id: ids::CHECK_MUZZLE_REFERENCES,
                    code,
                    severity: policy.severity,
                    message,
                    subject: coordinate.to_string(),
                    coordinate: Some(coordinate.to_string()),
                    reference: Some(rendered),
                    help,
                    data: json!({
                        "version": coordinate.version().as_str(),
                        "kind": reference.kind().as_str(),
                        "detail": detail,
                    }),
                },
            ));
        }
    }
}
