use crate::{RenderableReport, RenderableSeverity, RenderableVerdictStatus};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Muzzle report\n\n");
    let verdict = match report.verdict {
        RenderableVerdictStatus::Pass => "PASS",
        RenderableVerdictStatus::Warn => "WARN",
        RenderableVerdictStatus::Fail => "FAIL",
    };
    out.push_str(&format!(
        "- Verdict: **{}**\n- Findings: {} (emitted) / {} (total)\n- Checked: {} versions, {} references\n\n",
        verdict,
        report.data.findings_emitted,
        report.data.findings_total,
        report.data.versions_checked,
        report.data.references_checked
    ));

    if let Some(r) = &report.data.truncated_reason {
        out.push_str(&format!("> Note: {}\n\n", r));
    }

    if !report.data.directives.is_empty() {
        out.push_str("## Directives\n\n");
        out.push_str("| Directive | Artifact | Versions | Checked | Failing |\n");
        out.push_str("|-----------|----------|----------|---------|---------|\n");
        for d in &report.data.directives {
            let kind = if d.assert_inverse {
                format!("{} (+inverse)", d.kind)
            } else {
                d.kind.clone()
            };
            out.push_str(&format!(
                "| {} | `{}` | `{}` | {} | {} |\n",
                kind, d.artifact, d.versions, d.checked, d.failing
            ));
        }
        out.push('\n');
    }

    if report.findings.is_empty() {
        out.push_str("No findings.\n");
        return out;
    }

    out.push_str("## Findings\n\n");

    for f in &report.findings {
        let sev = match f.severity {
            RenderableSeverity::Info => "INFO",
            RenderableSeverity::Warning => "WARN",
            RenderableSeverity::Error => "ERROR",
        };

        out.push_str(&format!(
            "- [{}] `{}` / `{}`: {}",
            sev,
            f.check_id.as_deref().unwrap_or(""),
            f.code,
            f.message
        ));
        if let Some(loc) = &f.location {
            match loc.line {
                Some(line) => out.push_str(&format!(" (`{}`:{})", loc.path, line)),
                None => out.push_str(&format!(" (`{}`)", loc.path)),
            }
        }
        out.push('\n');

        if let Some(reference) = &f.reference {
            out.push_str(&format!("  - reference: `{}`\n", reference));
        }
        if let Some(help) = &f.help {
            out.push_str(&format!("  - help: {}\n", help));
        }
        if let Some(url) = &f.url {
            out.push_str(&format!("  - url: {}\n", url));
        }
    }

    out
}
