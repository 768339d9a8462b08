//! The `versions` and `references` use cases.

use anyhow::Context;
use muzzle_domain::model::{Advice, Manifestation, Member, Ownership, Visibility};
use muzzle_domain::resolver::ArtifactResolver;
use muzzle_domain::version::{ArtifactVersion, VersionRange};

/// Published versions of `group:module`, ascending, optionally limited to `range`.
pub fn run_versions<R: ArtifactResolver>(
    resolver: &R,
    group: &str,
    module: &str,
    range: Option<&str>,
) -> anyhow::Result<Vec<ArtifactVersion>> {
    let range = range
        .map(VersionRange::parse)
        .transpose()
        .context("parse version range")?;

    let mut versions = resolver
        .list_versions(group, module)
        .with_context(|| format!("list versions of {group}:{module}"))?;
    if let Some(range) = &range {
        versions.retain(|v| range.contains(v));
    }
    versions.sort();
    versions.dedup();
    Ok(versions)
}

/// One line per reference: `<kind> <reference>`, constrained modifiers appended in brackets.
pub fn format_references(advice: &Advice) -> String {
    let mut out = String::new();
    for reference in advice.references() {
        let kind = match reference.member {
            Member::Class => "class ",
            Member::Method { .. } => "method",
            Member::Field { .. } => "field ",
        };
        out.push_str(&format!("{kind} {reference}"));

        let modifiers = reference.modifiers;
        let mut tags: Vec<String> = Vec::new();
        if modifiers.visibility != Visibility::Public {
            tags.push(modifiers.visibility.to_string());
        }
        match modifiers.ownership {
            Some(Ownership::Static) => tags.push("static".to_string()),
            Some(Ownership::Instance) => tags.push("instance".to_string()),
            None => {}
        }
        match modifiers.manifestation {
            Some(Manifestation::Final) => tags.push("final".to_string()),
            Some(Manifestation::NonFinal) => tags.push("non_final".to_string()),
            Some(Manifestation::Interface) => tags.push("interface".to_string()),
            Some(Manifestation::NonInterface) => tags.push("non_interface".to_string()),
            None => {}
        }
        if !tags.is_empty() {
            out.push_str(&format!(" [{}]", tags.join(", ")));
        }
        out.push('\n');
    }
    out
}
