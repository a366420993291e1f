//! Evaluation of a single policy rule against a single tool.

use crate::config::VendorAllowList;
use crate::inputs::model::{RiskLevel, ToolUsageRecord};
use crate::inputs::policy::PolicyRule;
use crate::rules::catalog::RuleSpec;

/// Outcome of one (tool, rule) evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    Satisfied,
    Violated(RuleViolation),
    /// The rule type is not understood; treated as satisfied.
    Skipped { rule_type: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    pub message: String,
    pub recommendation: Option<String>,
}

impl RuleOutcome {
    pub fn is_violated(&self) -> bool {
        matches!(self, Self::Violated(_))
    }
}

/// Decides whether `tool` breaks `rule`. Pure; no I/O and no logging.
pub fn evaluate_rule(
    tool: &ToolUsageRecord,
    rule: &PolicyRule,
    vendors: &VendorAllowList,
) -> RuleOutcome {
    match &rule.spec {
        RuleSpec::DataHandling(req) => {
            if req.requires_approval && tool.has_unknown_recorded_status() {
                return violated(
                    format!("Tool {} requires approval for data handling", tool.tool_name),
                    format!("Submit {} for compliance review", tool.tool_name),
                );
            }
        }
        RuleSpec::VendorVerification(req) => {
            let vendor = tool.vendor();
            if req.verified_vendors_only && !vendors.is_verified(vendor) {
                return violated(
                    format!("Vendor {vendor} is not verified"),
                    format!("Verify vendor {vendor} before use"),
                );
            }
        }
        RuleSpec::RiskAssessment(req) => {
            if req.low_risk_only && tool.risk_level == RiskLevel::High {
                return violated(
                    format!("Tool {} has high risk level", tool.tool_name),
                    format!("Conduct additional risk assessment for {}", tool.tool_name),
                );
            }
        }
        RuleSpec::Unrecognized { name } => {
            return RuleOutcome::Skipped {
                rule_type: name.clone(),
            };
        }
    }
    RuleOutcome::Satisfied
}

fn violated(message: String, recommendation: String) -> RuleOutcome {
    RuleOutcome::Violated(RuleViolation {
        message,
        recommendation: Some(recommendation),
    })
}
