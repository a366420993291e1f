use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::OverrideError;

pub const REVIEW_PERMISSION: &str = "review_overrides";

/// Catalog entry describing why an override may be requested.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OverrideReason {
    pub reason_code: String,
    pub reason_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    #[serde(default)]
    pub requires_justification: bool,
    #[serde(default)]
    pub requires_review: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OverrideStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl FromStr for OverrideStatus {
    type Err = OverrideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(OverrideError::Validation(format!(
                "unknown override status {other:?}"
            ))),
        }
    }
}

/// Outcome a reviewer may assign to a pending override.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Approved,
    Rejected,
    Cancelled,
}

impl ReviewAction {
    pub fn resulting_status(self) -> OverrideStatus {
        match self {
            Self::Approved => OverrideStatus::Approved,
            Self::Rejected => OverrideStatus::Rejected,
            Self::Cancelled => OverrideStatus::Cancelled,
        }
    }
}

impl FromStr for ReviewAction {
    type Err = OverrideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(OverrideError::Validation(
                "Invalid action. Must be approved, rejected, or cancelled".into(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OverridePriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

/// An automated governance decision and its override state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecisionEntry {
    pub entry_id: Uuid,
    pub agent: String,
    pub decision_type: String,
    pub status: String,
    #[serde(default)]
    pub decision: Value,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub override_requested: bool,
    #[serde(default)]
    pub override_reason: Option<String>,
    #[serde(default)]
    pub override_justification: Option<String>,
    #[serde(default)]
    pub override_status: Option<OverrideStatus>,
    #[serde(default)]
    pub override_requested_by: Option<String>,
    #[serde(default)]
    pub override_requested_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub override_reviewed_by: Option<String>,
    #[serde(default)]
    pub override_review_notes: Option<String>,
    #[serde(default)]
    pub override_resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Active,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverrideWorkflow {
    pub entry_id: Uuid,
    pub workflow_type: String,
    pub current_step: String,
    pub status: WorkflowStatus,
    pub assigned_reviewer: String,
    pub priority: OverridePriority,
    pub updated_at: DateTime<Utc>,
}

/// Activity-log row for one override transition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverrideActivity {
    pub entry_id: Uuid,
    pub action_type: String,
    pub action_by: String,
    pub action_details: Value,
    pub timestamp: DateTime<Utc>,
}

/// Authenticated caller and the permissions granted to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub permissions: Vec<String>,
}

impl Actor {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            permissions: Vec::new(),
        }
    }

    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideRequest {
    pub decision_id: Option<Uuid>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub justification: Option<String>,
    #[serde(default)]
    pub priority: OverridePriority,
    #[serde(default)]
    pub assigned_reviewer: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct NewDecision {
    pub status: String,
    #[serde(default)]
    pub decision: Value,
    #[serde(default)]
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub action: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub new_decision: Option<NewDecision>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OverrideSummary {
    pub entry_id: Uuid,
    pub agent: String,
    pub decision_type: String,
    pub original_status: String,
    pub override_reason: Option<String>,
    pub override_justification: Option<String>,
    pub override_status: Option<OverrideStatus>,
    pub override_requested_at: Option<DateTime<Utc>>,
    pub requested_by: Option<String>,
    pub reviewed_by: Option<String>,
    pub override_review_notes: Option<String>,
    pub hours_pending: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OverridePage {
    pub overrides: Vec<OverrideSummary>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OverrideStatistics {
    pub total_overrides: u64,
    pub pending_overrides: u64,
    pub approved_overrides: u64,
    pub rejected_overrides: u64,
    pub avg_resolution_hours: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReasonCount {
    pub override_reason: Option<String>,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OverrideDashboard {
    pub statistics: OverrideStatistics,
    pub recent_overrides: Vec<OverrideSummary>,
    pub reasons_breakdown: Vec<ReasonCount>,
}
