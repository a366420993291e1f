//! Catalog of policy rule types understood by the evaluator.
//!
//! Policy rules arrive with a free-form `rule_type` string and an open
//! `requirements` object. They are lifted into a typed [`RuleSpec`] once,
//! at load time, so evaluation never inspects untyped maps.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DATA_HANDLING: &str = "data_handling";
pub const VENDOR_VERIFICATION: &str = "vendor_verification";
pub const RISK_ASSESSMENT: &str = "risk_assessment";

/// Typed requirements of a single policy rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule_type", rename_all = "snake_case")]
pub enum RuleSpec {
    DataHandling(DataHandlingRequirements),
    VendorVerification(VendorRequirements),
    RiskAssessment(RiskRequirements),
    /// A rule type this build does not evaluate. Never violated.
    Unrecognized { name: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataHandlingRequirements {
    pub requires_approval: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorRequirements {
    pub verified_vendors_only: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskRequirements {
    pub low_risk_only: bool,
}

impl RuleSpec {
    /// Builds a spec from a stored rule type and its requirements object.
    ///
    /// Flags are read with JSON truthiness: `true`, non-zero numbers,
    /// non-empty strings and any array or object count as set.
    pub fn from_parts(rule_type: &str, requirements: &Value) -> Self {
        match rule_type {
            DATA_HANDLING => Self::DataHandling(DataHandlingRequirements {
                requires_approval: flag(requirements, "requires_approval"),
            }),
            VENDOR_VERIFICATION => Self::VendorVerification(VendorRequirements {
                verified_vendors_only: flag(requirements, "verified_vendors_only"),
            }),
            RISK_ASSESSMENT => Self::RiskAssessment(RiskRequirements {
                low_risk_only: flag(requirements, "low_risk_only"),
            }),
            other => Self::Unrecognized {
                name: other.to_string(),
            },
        }
    }

    pub fn rule_type(&self) -> &str {
        match self {
            Self::DataHandling(_) => DATA_HANDLING,
            Self::VendorVerification(_) => VENDOR_VERIFICATION,
            Self::RiskAssessment(_) => RISK_ASSESSMENT,
            Self::Unrecognized { name } => name,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized { .. })
    }
}

fn flag(requirements: &Value, key: &str) -> bool {
    requirements.get(key).is_some_and(truthy)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Severity attached to an aggregated policy violation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_rule_types_are_lifted() {
        assert_eq!(
            RuleSpec::from_parts("vendor_verification", &json!({"verified_vendors_only": true})),
            RuleSpec::VendorVerification(VendorRequirements {
                verified_vendors_only: true
            })
        );
        assert_eq!(
            RuleSpec::from_parts("risk_assessment", &json!({})),
            RuleSpec::RiskAssessment(RiskRequirements::default())
        );
        assert_eq!(
            RuleSpec::from_parts("data_handling", &Value::Null),
            RuleSpec::DataHandling(DataHandlingRequirements::default())
        );
    }

    #[test]
    fn unknown_rule_type_is_kept_by_name() {
        let spec = RuleSpec::from_parts("geo_fencing", &json!({"regions": ["eu"]}));
        assert!(!spec.is_recognized());
        assert_eq!(spec.rule_type(), "geo_fencing");
    }

    #[test]
    fn flags_follow_json_truthiness() {
        let on = |v: Value| flag(&json!({ "low_risk_only": v }), "low_risk_only");
        assert!(on(json!(true)));
        assert!(on(json!(1)));
        assert!(on(json!("yes")));
        assert!(on(json!({})));
        assert!(!on(json!(false)));
        assert!(!on(json!(0)));
        assert!(!on(json!("")));
        assert!(!on(Value::Null));
    }

    #[test]
    fn severity_orders_low_to_critical() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::High < Severity::Critical);
        assert_eq!(serde_json::to_string(&Severity::Medium).unwrap(), "\"medium\"");
    }
}
