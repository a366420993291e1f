//! Data sources consumed by report generation and the report sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::inputs::model::{Project, ToolUsageRecord};
use crate::inputs::policy::Policy;
use crate::report::model::{
    ComplianceReport, OverallStatus, PolicyViolation, Recommendation, RiskAssessment,
    ToolsSummary,
};

pub mod dataset;
pub mod memory;

pub use dataset::Dataset;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("write rejected: {0}")]
    Rejected(String),
}

/// Read access to projects, tool usage and policies, plus report storage.
///
/// Implementations must return tool usage ordered by `last_used`
/// descending and policies with a stable order, see
/// `util::deterministic`.
pub trait ComplianceStore: Send + Sync {
    fn fetch_project(&self, project_id: Uuid) -> Result<Option<Project>, StoreError>;

    fn fetch_tool_usage(&self, project_id: Uuid) -> Result<Vec<ToolUsageRecord>, StoreError>;

    /// Active policies (with rules) of one organization.
    fn fetch_active_policies(&self, organization_id: Uuid) -> Result<Vec<Policy>, StoreError>;

    /// Inserts a new row and returns its id.
    fn persist_report(&self, row: StoredReport) -> Result<Uuid, StoreError>;

    /// Newest stored report for `project_id` that has not expired at `now`.
    fn latest_report(
        &self,
        project_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<StoredReport>, StoreError>;
}

/// Persisted form of a compliance report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredReport {
    pub id: Uuid,
    pub project_id: Uuid,
    pub enterprise_id: Uuid,
    pub workspace_id: Option<Uuid>,
    pub overall_status: OverallStatus,
    pub compliance_score: u8,
    pub tools_summary: ToolsSummary,
    pub policy_violations: Vec<PolicyViolation>,
    pub recommendations: Vec<Recommendation>,
    pub risk_assessment: RiskAssessment,
    pub compliance_frameworks: Vec<String>,
    pub generated_by: Option<Uuid>,
    pub generated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl StoredReport {
    pub fn from_report(report: &ComplianceReport) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id: report.project_id,
            enterprise_id: report.enterprise_id,
            workspace_id: report.workspace_id,
            overall_status: report.overall_status,
            compliance_score: report.compliance_score,
            tools_summary: report.tools_summary,
            policy_violations: report.policy_violations.clone(),
            recommendations: report.recommendations.clone(),
            risk_assessment: report.risk_assessment.clone(),
            compliance_frameworks: report.compliance_frameworks.clone(),
            generated_by: None,
            generated_at: report.generated_at,
            expires_at: report.expires_at,
        }
    }

    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}
