use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::inputs::model::RiskLevel;
use crate::rules::catalog::Severity;
use crate::rules::classify::ToolStatus;

/// Compliance snapshot for one project.
///
/// This struct is the JSON contract returned by the report endpoint and
/// written by `aicomplyr report`. For unchanged inputs everything except
/// `generated_at` and `expires_at` is identical between runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComplianceReport {
    pub schema_version: String,
    pub project_id: Uuid,
    pub project_name: String,
    /// Organization owning the project.
    pub enterprise_id: Uuid,
    pub workspace_id: Option<Uuid>,
    pub generated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub overall_status: OverallStatus,
    pub compliance_score: u8,
    pub tools_summary: ToolsSummary,
    /// Per-tool detail; omitted when the caller asked for no details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolReport>>,
    pub policy_violations: Vec<PolicyViolation>,
    pub recommendations: Vec<Recommendation>,
    pub compliance_frameworks: Vec<String>,
    pub risk_assessment: RiskAssessment,
    pub analysis: AnalysisInfo,
    pub input_digest: InputDigest,
}

/// Traffic-light status of the whole project.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Green,
    Yellow,
    Red,
}

impl OverallStatus {
    /// CI-compatible exit code: green 0, yellow 1, red 2.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Green => 0,
            Self::Yellow => 1,
            Self::Red => 2,
        }
    }
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolsSummary {
    pub total_tools: u32,
    pub approved_tools: u32,
    pub needs_review_tools: u32,
    pub rejected_tools: u32,
    pub unknown_tools: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolReport {
    pub tool_name: String,
    pub vendor_name: String,
    pub usage_count: u64,
    /// Status derived from rule evaluation.
    pub compliance_status: ToolStatus,
    /// Informational status stored with the usage row.
    pub recorded_status: String,
    pub risk_level: RiskLevel,
    pub policy_violations: Vec<String>,
    pub recommendations: Vec<String>,
    pub last_used: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    PolicyBreach,
}

/// Violation message shared by one or more tools.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PolicyViolation {
    pub rule_name: String,
    pub violation_type: ViolationType,
    pub severity: Severity,
    pub affected_tools: Vec<String>,
    pub description: String,
    pub remediation: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recommendation {
    pub priority: Priority,
    pub category: String,
    pub description: String,
    pub action_required: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RiskRating {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RiskAssessment {
    pub overall_risk: RiskRating,
    pub risk_factors: Vec<String>,
    pub mitigation_strategies: Vec<String>,
}

/// Evaluation status and non-fatal findings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AnalysisInfo {
    pub status: String,
    pub rule_catalog_version: String,
    pub warnings: Vec<String>,
}

impl AnalysisInfo {
    pub fn ok() -> Self {
        Self {
            status: "ok".into(),
            rule_catalog_version: crate::RULE_CATALOG_VERSION.into(),
            warnings: vec![],
        }
    }

    pub fn with_warnings(warnings: Vec<String>) -> Self {
        if warnings.is_empty() {
            return Self::ok();
        }
        Self {
            status: "partial".into(),
            warnings,
            ..Self::ok()
        }
    }
}

/// Fingerprint of the evaluated tools and policies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InputDigest {
    pub algorithm: String,
    pub value: String,
}
