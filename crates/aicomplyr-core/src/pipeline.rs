//! Report generation: load → evaluate → aggregate → persist → return.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::SCHEMA_VERSION;
use crate::config::ComplianceConfig;
use crate::error::ComplianceError;
use crate::report::model::{AnalysisInfo, ComplianceReport, ToolReport};
use crate::report::recommend::generate_recommendations;
use crate::report::risk::assess_risk;
use crate::report::score::{compliance_score, overall_status, summarize};
use crate::report::violations::collect_violations;
use crate::request::ReportRequest;
use crate::rules::classify::{SkippedRule, assess_tool};
use crate::store::{ComplianceStore, StoredReport};
use crate::util::digest::input_digest;

/// Result of the best-effort write of a generated report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PersistenceOutcome {
    Stored { report_id: Uuid },
    Failed { reason: String },
}

impl PersistenceOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, Self::Stored { .. })
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub report: ComplianceReport,
    pub persistence: PersistenceOutcome,
}

pub struct ReportGenerator {
    store: Arc<dyn ComplianceStore>,
    config: ComplianceConfig,
}

impl ReportGenerator {
    pub fn new(store: Arc<dyn ComplianceStore>, config: ComplianceConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &Arc<dyn ComplianceStore> {
        &self.store
    }

    pub fn generate(&self, request: &ReportRequest) -> Result<GeneratedReport, ComplianceError> {
        self.generate_at(request, Utc::now())
    }

    /// Computes, persists and returns the report as of `now`.
    ///
    /// Only loading failures are errors. A failed write is logged and
    /// reported through [`GeneratedReport::persistence`].
    pub fn generate_at(
        &self,
        request: &ReportRequest,
        now: DateTime<Utc>,
    ) -> Result<GeneratedReport, ComplianceError> {
        let report = self.compute(request, now)?;

        let persistence = match self.store.persist_report(StoredReport::from_report(&report)) {
            Ok(report_id) => {
                debug!(%report_id, project_id = %report.project_id, "compliance report stored");
                PersistenceOutcome::Stored { report_id }
            }
            Err(e) => {
                error!(
                    project_id = %report.project_id,
                    error = %e,
                    "error saving compliance report"
                );
                PersistenceOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        Ok(GeneratedReport {
            report,
            persistence,
        })
    }

    /// Computes the report without persisting it.
    pub fn compute(
        &self,
        request: &ReportRequest,
        now: DateTime<Utc>,
    ) -> Result<ComplianceReport, ComplianceError> {
        let project_id = request.project_id;
        info!(%project_id, "generating compliance report");

        let ttl_days = self.config.report_ttl_days;
        let expires_at = Duration::try_days(ttl_days)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                ComplianceError::Config(format!("report_ttl_days {ttl_days} is out of range"))
            })?;

        let project = self
            .store
            .fetch_project(project_id)
            .map_err(|e| {
                error!(%project_id, error = %e, "error fetching project");
                ComplianceError::fetch("project", e.to_string())
            })?
            .ok_or(ComplianceError::ProjectNotFound(project_id))?;

        if let Some(enterprise_id) = request.enterprise_id {
            if enterprise_id != project.organization_id {
                return Err(ComplianceError::EnterpriseMismatch {
                    project_id,
                    enterprise_id,
                });
            }
        }

        let usage = self.store.fetch_tool_usage(project_id).map_err(|e| {
            error!(%project_id, error = %e, "error fetching tool usage");
            ComplianceError::fetch("tool usage", e.to_string())
        })?;

        let mut policies = self
            .store
            .fetch_active_policies(project.organization_id)
            .map_err(|e| {
                error!(%project_id, error = %e, "error fetching policies");
                ComplianceError::fetch("policy", e.to_string())
            })?;
        if let Some(framework) = &request.compliance_framework {
            policies.retain(|p| p.framework_matches(framework));
        }

        let vendors = &self.config.verified_vendors;
        let mut skipped: BTreeSet<SkippedRule> = BTreeSet::new();
        let mut tools = Vec::with_capacity(usage.len());

        for record in &usage {
            let assessment = assess_tool(record, &policies, vendors);
            skipped.extend(assessment.skipped);
            tools.push(ToolReport {
                tool_name: record.tool_name.clone(),
                vendor_name: record.vendor().to_string(),
                usage_count: record.usage_count,
                compliance_status: assessment.status,
                recorded_status: record.compliance_status.clone(),
                risk_level: record.risk_level.clone(),
                policy_violations: assessment.violations,
                recommendations: assessment.recommendations,
                last_used: record.last_used,
            });
        }

        let warnings: Vec<String> = skipped
            .iter()
            .map(|s| {
                warn!(
                    %project_id,
                    policy = %s.policy_name,
                    rule = %s.rule_name,
                    rule_type = %s.rule_type,
                    "unrecognized rule type was not evaluated"
                );
                format!(
                    "rule {:?} in policy {:?} has unrecognized type {:?} and was not evaluated",
                    s.rule_name, s.policy_name, s.rule_type
                )
            })
            .collect();

        let tools_summary = summarize(tools.iter().map(|t| t.compliance_status));
        let score = compliance_score(&tools_summary);
        let status = overall_status(score, &tools_summary);
        let policy_violations = collect_violations(&tools);
        let recommendations = generate_recommendations(&tools_summary, &policy_violations);
        let tool_risks: Vec<_> = tools.iter().map(|t| t.risk_level.clone()).collect();
        let risk_assessment = assess_risk(&tool_risks, &policy_violations);
        let compliance_frameworks = policies
            .iter()
            .filter_map(|p| p.compliance_framework.clone())
            .filter(|f| !f.is_empty())
            .collect();

        let digest = input_digest(&usage, &policies)
            .map_err(|e| ComplianceError::Validation(format!("unserializable input: {e}")))?;

        Ok(ComplianceReport {
            schema_version: SCHEMA_VERSION.to_string(),
            project_id,
            project_name: project.name,
            enterprise_id: project.organization_id,
            workspace_id: request.workspace_id,
            generated_at: now,
            expires_at,
            overall_status: status,
            compliance_score: score,
            tools_summary,
            tools: request.include_details.then_some(tools),
            policy_violations,
            recommendations,
            compliance_frameworks,
            risk_assessment,
            analysis: AnalysisInfo::with_warnings(warnings),
            input_digest: digest,
        })
    }
}
