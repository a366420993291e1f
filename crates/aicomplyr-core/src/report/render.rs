use crate::TOOL_NAME;
use crate::report::model::ComplianceReport;

pub fn render_text(report: &ComplianceReport) -> String {
    let s = &report.tools_summary;
    let mut out = String::new();
    out.push_str(&format!("{} report {}\n", TOOL_NAME, report.schema_version));
    out.push_str(&format!(
        "Project: {} ({})\n",
        report.project_name, report.project_id
    ));
    out.push_str(&format!("Generated: {}\n", report.generated_at.to_rfc3339()));
    out.push_str(&format!(
        "Status: {} (score {})\n",
        report.overall_status, report.compliance_score
    ));
    out.push_str(&format!(
        "Tools: {} total, {} approved, {} needs review, {} rejected, {} unknown\n",
        s.total_tools, s.approved_tools, s.needs_review_tools, s.rejected_tools, s.unknown_tools
    ));
    out.push_str(&format!(
        "Risk: {:?}\n",
        report.risk_assessment.overall_risk
    ));

    if let Some(tools) = &report.tools {
        out.push_str("Tools detail:\n");
        for t in tools {
            out.push_str(&format!(
                "  - {} [{}] {} ({} uses)\n",
                t.tool_name, t.compliance_status, t.vendor_name, t.usage_count
            ));
        }
    }

    out.push_str("Violations:\n");
    for v in &report.policy_violations {
        out.push_str(&format!(
            "  - {} ({})\n",
            v.description,
            v.affected_tools.join(", ")
        ));
    }

    out.push_str("Recommendations:\n");
    for r in &report.recommendations {
        out.push_str(&format!(
            "  - [{:?}] {}: {}\n",
            r.priority, r.description, r.action_required
        ));
    }

    for w in &report.analysis.warnings {
        out.push_str(&format!("warning: {w}\n"));
    }
    out
}
