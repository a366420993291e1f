//! Per-tool compliance classification.
//!
//! Runs every rule of every active policy against one tool and derives the
//! tool's status from the collected outcomes:
//!
//!   - Any mandatory rule violated → `rejected`
//!   - Else any rule violated       → `needs_review`
//!   - Else at least one policy     → `approved`
//!   - Else                         → `unknown`
//!
//! The status is computed once, after all rules ran, so the result does not
//! depend on policy or rule iteration order.

use serde::{Deserialize, Serialize};

use crate::config::VendorAllowList;
use crate::inputs::model::ToolUsageRecord;
use crate::inputs::policy::Policy;
use crate::rules::eval::{RuleOutcome, evaluate_rule};

/// Compliance status derived for a tool during report generation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    Approved,
    NeedsReview,
    Rejected,
    Unknown,
}

impl std::fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Approved => "approved",
            Self::NeedsReview => "needs_review",
            Self::Rejected => "rejected",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// A rule that could not be evaluated because its type is unknown.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SkippedRule {
    pub policy_name: String,
    pub rule_name: String,
    pub rule_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolAssessment {
    pub status: ToolStatus,
    /// Violation messages in evaluation order.
    pub violations: Vec<String>,
    pub recommendations: Vec<String>,
    pub skipped: Vec<SkippedRule>,
}

pub fn assess_tool(
    tool: &ToolUsageRecord,
    policies: &[Policy],
    vendors: &VendorAllowList,
) -> ToolAssessment {
    let mut violations = Vec::new();
    let mut recommendations = Vec::new();
    let mut skipped = Vec::new();
    let mut mandatory_violated = false;

    for policy in policies {
        for rule in &policy.rules {
            match evaluate_rule(tool, rule, vendors) {
                RuleOutcome::Satisfied => {}
                RuleOutcome::Violated(v) => {
                    mandatory_violated |= rule.is_mandatory;
                    violations.push(v.message);
                    recommendations.extend(v.recommendation);
                }
                RuleOutcome::Skipped { rule_type } => skipped.push(SkippedRule {
                    policy_name: policy.name.clone(),
                    rule_name: rule.rule_name.clone(),
                    rule_type,
                }),
            }
        }
    }

    let status = derive_status(policies.len(), !violations.is_empty(), mandatory_violated);

    ToolAssessment {
        status,
        violations,
        recommendations,
        skipped,
    }
}

fn derive_status(policy_count: usize, any_violation: bool, mandatory_violated: bool) -> ToolStatus {
    if mandatory_violated {
        ToolStatus::Rejected
    } else if any_violation {
        ToolStatus::NeedsReview
    } else if policy_count > 0 {
        ToolStatus::Approved
    } else {
        ToolStatus::Unknown
    }
}
