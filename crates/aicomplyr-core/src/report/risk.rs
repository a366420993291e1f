//! Qualitative project risk rating.
//!
//!   - Any critical violation            → critical
//!   - Else any high-risk tool or any
//!     violation at all                  → high
//!   - Else any medium-risk tool         → medium
//!   - Else                              → low
//!
//! The violation collector only emits `medium` severity today, so the
//! critical branch is dormant until a producer assigns `critical`.

use crate::inputs::model::RiskLevel;
use crate::report::model::{PolicyViolation, RiskAssessment, RiskRating};
use crate::rules::catalog::Severity;

pub fn assess_risk(tool_risks: &[RiskLevel], violations: &[PolicyViolation]) -> RiskAssessment {
    let critical = violations.iter().any(|v| v.severity == Severity::Critical);
    let high_risk_tools = tool_risks.iter().any(|r| *r == RiskLevel::High);

    if critical {
        RiskAssessment {
            overall_risk: RiskRating::Critical,
            risk_factors: strings(&["Critical policy violations detected"]),
            mitigation_strategies: strings(&["Immediate remediation required"]),
        }
    } else if high_risk_tools || !violations.is_empty() {
        RiskAssessment {
            overall_risk: RiskRating::High,
            risk_factors: strings(&["High-risk tools in use", "Policy violations present"]),
            mitigation_strategies: strings(&[
                "Implement additional controls",
                "Regular compliance monitoring",
            ]),
        }
    } else if tool_risks.iter().any(|r| *r == RiskLevel::Medium) {
        RiskAssessment {
            overall_risk: RiskRating::Medium,
            risk_factors: strings(&["Medium-risk tools in use"]),
            mitigation_strategies: strings(&["Enhanced monitoring recommended"]),
        }
    } else {
        RiskAssessment {
            overall_risk: RiskRating::Low,
            risk_factors: vec![],
            mitigation_strategies: vec![],
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
