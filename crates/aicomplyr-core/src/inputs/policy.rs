use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::rules::catalog::RuleSpec;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PolicyStatus {
    Active,
    Draft,
    Archived,
    #[serde(other)]
    Other,
}

/// Organization-scoped container of compliance rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Policy {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub compliance_framework: Option<String>,
    pub status: PolicyStatus,
    #[serde(default, alias = "policy_rules")]
    pub rules: Vec<PolicyRule>,
}

impl Policy {
    pub fn is_active(&self) -> bool {
        self.status == PolicyStatus::Active
    }

    pub fn framework_matches(&self, framework: &str) -> bool {
        self.compliance_framework
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case(framework))
    }
}

/// A single evaluable rule, with its requirements already typed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "PolicyRuleRow")]
pub struct PolicyRule {
    pub id: Uuid,
    pub rule_name: String,
    pub spec: RuleSpec,
    /// Carried through for operators; no rule type evaluates it yet.
    pub conditions: Value,
    pub risk_weight: f64,
    pub is_mandatory: bool,
    pub enforcement_level: Option<String>,
}

/// Stored shape of a policy rule.
#[derive(Debug, Clone, Deserialize)]
struct PolicyRuleRow {
    id: Uuid,
    rule_type: String,
    rule_name: String,
    #[serde(default)]
    conditions: Value,
    #[serde(default)]
    requirements: Value,
    #[serde(default)]
    risk_weight: f64,
    #[serde(default)]
    is_mandatory: bool,
    #[serde(default)]
    enforcement_level: Option<String>,
}

impl From<PolicyRuleRow> for PolicyRule {
    fn from(row: PolicyRuleRow) -> Self {
        Self {
            spec: RuleSpec::from_parts(&row.rule_type, &row.requirements),
            id: row.id,
            rule_name: row.rule_name,
            conditions: row.conditions,
            risk_weight: row.risk_weight,
            is_mandatory: row.is_mandatory,
            enforcement_level: row.enforcement_level,
        }
    }
}
