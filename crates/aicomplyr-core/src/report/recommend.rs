use crate::report::model::{PolicyViolation, Priority, Recommendation, ToolsSummary};

/// Project-level action items derived from the summary and violations.
pub fn generate_recommendations(
    summary: &ToolsSummary,
    violations: &[PolicyViolation],
) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if summary.unknown_tools > 0 {
        out.push(Recommendation {
            priority: Priority::High,
            category: "compliance".into(),
            description: format!(
                "{} tools have unknown compliance status",
                summary.unknown_tools
            ),
            action_required: "Review and approve unknown tools".into(),
        });
    }

    if summary.needs_review_tools > 0 {
        out.push(Recommendation {
            priority: Priority::Medium,
            category: "review".into(),
            description: format!(
                "{} tools need compliance review",
                summary.needs_review_tools
            ),
            action_required: "Complete compliance review process".into(),
        });
    }

    if !violations.is_empty() {
        out.push(Recommendation {
            priority: Priority::High,
            category: "violations".into(),
            description: format!("{} policy violations detected", violations.len()),
            action_required: "Address policy violations immediately".into(),
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::model::ViolationType;
    use crate::rules::catalog::Severity;

    fn violation(name: &str) -> PolicyViolation {
        PolicyViolation {
            rule_name: name.into(),
            violation_type: ViolationType::PolicyBreach,
            severity: Severity::Medium,
            affected_tools: vec!["Widget".into()],
            description: name.into(),
            remediation: String::new(),
        }
    }

    #[test]
    fn clean_summary_has_no_recommendations() {
        let summary = ToolsSummary {
            total_tools: 2,
            approved_tools: 2,
            ..Default::default()
        };
        assert!(generate_recommendations(&summary, &[]).is_empty());
    }

    #[test]
    fn all_three_categories_in_fixed_order() {
        let summary = ToolsSummary {
            total_tools: 6,
            approved_tools: 1,
            needs_review_tools: 2,
            rejected_tools: 0,
            unknown_tools: 3,
        };
        let recs = generate_recommendations(&summary, &[violation("a"), violation("b")]);

        let shape: Vec<_> = recs
            .iter()
            .map(|r| (r.priority, r.category.as_str(), r.description.as_str()))
            .collect();
        assert_eq!(
            shape,
            vec![
                (Priority::High, "compliance", "3 tools have unknown compliance status"),
                (Priority::Medium, "review", "2 tools need compliance review"),
                (Priority::High, "violations", "2 policy violations detected"),
            ]
        );
        assert_eq!(recs[2].action_required, "Address policy violations immediately");
    }
}
