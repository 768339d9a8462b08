use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a finding.
///
/// Identity fields:
/// - check_id
/// - code
/// - subject (the coordinate, or `group:module@range` for directive-level findings)
/// - rendered reference (if present)
pub fn fingerprint_for_finding(
    check_id: &str,
    code: &str,
    subject: &str,
    reference: Option<&str>,
) -> String {
    let mut parts = vec![check_id, code, subject];
    if let Some(r) = reference {
        parts.push(r);
    }
    let canonical = parts.join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
