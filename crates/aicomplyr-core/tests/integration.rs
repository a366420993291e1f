use std::sync::Arc;

use aicomplyr_core::config::ComplianceConfig;
use aicomplyr_core::error::ComplianceError;
use aicomplyr_core::inputs::model::{Project, ToolUsageRecord};
use aicomplyr_core::inputs::policy::Policy;
use aicomplyr_core::report::model::{OverallStatus, RiskRating};
use aicomplyr_core::rules::classify::ToolStatus;
use aicomplyr_core::store::{ComplianceStore, Dataset, MemoryStore, StoreError, StoredReport};
use aicomplyr_core::{PersistenceOutcome, ReportGenerator, ReportRequest};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use uuid::Uuid;

const ORG: &str = "7d0c4f3e-5a1b-4c2d-9e8f-0a1b2c3d4e5f";
const PROJECT: &str = "1f2e3d4c-5b6a-4978-8a9b-0c1d2e3f4a5b";
const EMPTY_PROJECT: &str = "2a3b4c5d-6e7f-4081-9a2b-3c4d5e6f7a8b";

fn org() -> Uuid {
    ORG.parse().unwrap()
}

fn project_id() -> Uuid {
    PROJECT.parse().unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
}

fn usage(name: &str, vendor: &str, risk: &str, day: u32) -> serde_json::Value {
    json!({
        "project_id": PROJECT,
        "tool_name": name,
        "vendor_name": vendor,
        "risk_level": risk,
        "usage_count": 3,
        "last_used": format!("2026-05-{day:02}T09:00:00Z"),
    })
}

/// Four tools, one active policy with a mandatory vendor rule and an
/// advisory risk rule.
fn scenario_dataset() -> Dataset {
    Dataset::from_json_str(
        &json!({
            "projects": [
                {"id": PROJECT, "name": "Claims triage", "organization_id": ORG},
                {"id": EMPTY_PROJECT, "name": "Sandbox", "organization_id": ORG}
            ],
            "tool_usage": [
                usage("Tool D", "Acme Corp", "high", 1),
                usage("Tool B", "Acme Corp", "low", 3),
                usage("Tool A", "OpenAI", "low", 4),
                usage("Tool C", "OpenAI", "high", 2)
            ],
            "policies": [{
                "id": "00000000-0000-4000-8000-000000000001",
                "organization_id": ORG,
                "name": "AI vendor policy",
                "compliance_framework": "HIPAA",
                "status": "active",
                "rules": [
                    {
                        "id": "00000000-0000-4000-8000-0000000000a1",
                        "rule_type": "vendor_verification",
                        "rule_name": "Verified vendors only",
                        "requirements": {"verified_vendors_only": true},
                        "is_mandatory": true
                    },
                    {
                        "id": "00000000-0000-4000-8000-0000000000a2",
                        "rule_type": "risk_assessment",
                        "rule_name": "Low risk only",
                        "requirements": {"low_risk_only": true},
                        "is_mandatory": false
                    }
                ]
            }]
        })
        .to_string(),
    )
    .unwrap()
}

fn generator(dataset: &Dataset) -> (ReportGenerator, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::from_dataset(dataset));
    let generator = ReportGenerator::new(store.clone(), ComplianceConfig::default());
    (generator, store)
}

fn status_of(report: &aicomplyr_core::report::model::ComplianceReport, tool: &str) -> ToolStatus {
    report
        .tools
        .as_ref()
        .unwrap()
        .iter()
        .find(|t| t.tool_name == tool)
        .unwrap()
        .compliance_status
}

#[test]
fn example_scenario_scores_38_red() {
    let (generator, store) = generator(&scenario_dataset());
    let out = generator
        .generate_at(&ReportRequest::for_project(project_id()), now())
        .unwrap();
    let report = out.report;

    assert_eq!(status_of(&report, "Tool A"), ToolStatus::Approved);
    assert_eq!(status_of(&report, "Tool B"), ToolStatus::Rejected);
    assert_eq!(status_of(&report, "Tool C"), ToolStatus::NeedsReview);
    assert_eq!(status_of(&report, "Tool D"), ToolStatus::Rejected);

    let s = report.tools_summary;
    assert_eq!(
        (s.total_tools, s.approved_tools, s.needs_review_tools, s.rejected_tools, s.unknown_tools),
        (4, 1, 1, 2, 0)
    );
    assert_eq!(report.compliance_score, 38);
    assert_eq!(report.overall_status, OverallStatus::Red);
    assert_eq!(report.risk_assessment.overall_risk, RiskRating::High);
    assert_eq!(report.compliance_frameworks, vec!["HIPAA"]);
    assert_eq!(report.project_name, "Claims triage");
    assert_eq!(report.enterprise_id, org());
    assert_eq!(report.expires_at, now() + chrono::Duration::days(30));

    let order: Vec<_> = report
        .tools
        .as_ref()
        .unwrap()
        .iter()
        .map(|t| t.tool_name.as_str())
        .collect();
    assert_eq!(order, vec!["Tool A", "Tool B", "Tool C", "Tool D"]);

    match out.persistence {
        PersistenceOutcome::Stored { report_id } => {
            let stored = store.latest_report(project_id(), now()).unwrap().unwrap();
            assert_eq!(stored.id, report_id);
            assert_eq!(stored.compliance_score, 38);
            assert_eq!(stored.generated_by, None);
        }
        other => panic!("expected stored report, got {other:?}"),
    }
}

#[test]
fn shared_violation_messages_are_merged() {
    let (generator, _) = generator(&scenario_dataset());
    let report = generator
        .compute(&ReportRequest::for_project(project_id()), now())
        .unwrap();

    let vendor = report
        .policy_violations
        .iter()
        .find(|v| v.description == "Vendor Acme Corp is not verified")
        .unwrap();
    assert_eq!(vendor.affected_tools, vec!["Tool B", "Tool D"]);
    assert_eq!(vendor.remediation, "Address Vendor Acme Corp is not verified for affected tools");
    assert_eq!(report.policy_violations.len(), 3);

    let categories: Vec<_> = report
        .recommendations
        .iter()
        .map(|r| r.category.as_str())
        .collect();
    assert_eq!(categories, vec!["review", "violations"]);
}

#[test]
fn project_without_policies_is_all_unknown_and_red() {
    let mut dataset = scenario_dataset();
    dataset.policies.clear();
    let (generator, _) = generator(&dataset);

    let report = generator
        .compute(&ReportRequest::for_project(project_id()), now())
        .unwrap();
    assert_eq!(report.tools_summary.unknown_tools, 4);
    assert_eq!(report.compliance_score, 0);
    assert_eq!(report.overall_status, OverallStatus::Red);
    assert!(report.policy_violations.is_empty());
    assert_eq!(
        report.recommendations[0].description,
        "4 tools have unknown compliance status"
    );
}

#[test]
fn project_without_tools_scores_100() {
    let (generator, _) = generator(&scenario_dataset());
    let id: Uuid = EMPTY_PROJECT.parse().unwrap();
    let report = generator.compute(&ReportRequest::for_project(id), now()).unwrap();

    assert_eq!(report.tools_summary.total_tools, 0);
    assert_eq!(report.compliance_score, 100);
    assert_eq!(report.overall_status, OverallStatus::Green);
    assert_eq!(report.risk_assessment.overall_risk, RiskRating::Low);
    assert!(report.recommendations.is_empty());
}

#[test]
fn repeated_runs_are_identical_apart_from_timestamps() {
    let (generator, _) = generator(&scenario_dataset());
    let req = ReportRequest::for_project(project_id());

    let first = generator.compute(&req, now()).unwrap();
    let mut second = generator
        .compute(&req, now() + chrono::Duration::hours(1))
        .unwrap();
    second.generated_at = first.generated_at;
    second.expires_at = first.expires_at;

    assert_eq!(first, second);
    assert_eq!(first.input_digest.algorithm, "sha256");
}

#[test]
fn unknown_project_is_reported() {
    let (generator, _) = generator(&scenario_dataset());
    let missing = Uuid::new_v4();
    let err = generator
        .generate_at(&ReportRequest::for_project(missing), now())
        .unwrap_err();
    assert!(matches!(err, ComplianceError::ProjectNotFound(id) if id == missing));
    assert_eq!(err.to_string(), format!("Project not found: {missing}"));
}

#[test]
fn enterprise_must_own_project() {
    let (generator, _) = generator(&scenario_dataset());
    let mut req = ReportRequest::for_project(project_id());
    req.enterprise_id = Some(Uuid::new_v4());
    assert!(matches!(
        generator.compute(&req, now()),
        Err(ComplianceError::EnterpriseMismatch { .. })
    ));

    req.enterprise_id = Some(org());
    assert!(generator.compute(&req, now()).is_ok());
}

#[test]
fn framework_filter_excludes_other_policies() {
    let (generator, _) = generator(&scenario_dataset());
    let mut req = ReportRequest::for_project(project_id());
    req.compliance_framework = Some("gdpr".into());

    let report = generator.compute(&req, now()).unwrap();
    assert_eq!(report.tools_summary.unknown_tools, 4);
    assert!(report.compliance_frameworks.is_empty());

    req.compliance_framework = Some("hipaa".into());
    let report = generator.compute(&req, now()).unwrap();
    assert_eq!(report.compliance_score, 38);
}

#[test]
fn details_can_be_omitted() {
    let (generator, _) = generator(&scenario_dataset());
    let mut req = ReportRequest::for_project(project_id());
    req.include_details = false;

    let report = generator.compute(&req, now()).unwrap();
    assert!(report.tools.is_none());
    assert_eq!(report.tools_summary.total_tools, 4);

    let json = serde_json::to_value(&report).unwrap();
    assert!(json.get("tools").is_none());
}

#[test]
fn unrecognized_rules_are_skipped_with_warning() {
    let mut dataset = scenario_dataset();
    let extra: Policy = serde_json::from_value(json!({
        "id": "00000000-0000-4000-8000-000000000002",
        "organization_id": ORG,
        "name": "Retention",
        "status": "active",
        "rules": [{
            "id": "00000000-0000-4000-8000-0000000000b1",
            "rule_type": "data_retention",
            "rule_name": "Thirty day retention",
            "requirements": {"max_days": 30},
            "is_mandatory": true
        }]
    }))
    .unwrap();
    dataset.policies.push(extra);
    let (generator, _) = generator(&dataset);

    let report = generator
        .compute(&ReportRequest::for_project(project_id()), now())
        .unwrap();
    assert_eq!(report.compliance_score, 38);
    assert_eq!(report.analysis.status, "partial");
    assert_eq!(report.analysis.warnings.len(), 1);
    assert!(report.analysis.warnings[0].contains("data_retention"));
}

/// Serves reads from a dataset and fails every other call.
struct FlakyStore {
    inner: MemoryStore,
    fail_reads: bool,
}

impl ComplianceStore for FlakyStore {
    fn fetch_project(&self, project_id: Uuid) -> Result<Option<Project>, StoreError> {
        self.inner.fetch_project(project_id)
    }

    fn fetch_tool_usage(&self, project_id: Uuid) -> Result<Vec<ToolUsageRecord>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Unavailable("connection reset".into()));
        }
        self.inner.fetch_tool_usage(project_id)
    }

    fn fetch_active_policies(&self, organization_id: Uuid) -> Result<Vec<Policy>, StoreError> {
        self.inner.fetch_active_policies(organization_id)
    }

    fn persist_report(&self, _row: StoredReport) -> Result<Uuid, StoreError> {
        Err(StoreError::Rejected("disk full".into()))
    }

    fn latest_report(
        &self,
        _project_id: Uuid,
        _now: DateTime<Utc>,
    ) -> Result<Option<StoredReport>, StoreError> {
        Ok(None)
    }
}

#[test]
fn persistence_failure_still_returns_report() {
    let store = FlakyStore {
        inner: MemoryStore::from_dataset(&scenario_dataset()),
        fail_reads: false,
    };
    let generator = ReportGenerator::new(Arc::new(store), ComplianceConfig::default());

    let out = generator
        .generate_at(&ReportRequest::for_project(project_id()), now())
        .unwrap();
    assert_eq!(out.report.compliance_score, 38);
    assert!(!out.persistence.is_stored());
    assert_eq!(
        out.persistence,
        PersistenceOutcome::Failed {
            reason: "write rejected: disk full".into()
        }
    );
}

#[test]
fn fetch_failure_is_a_data_error() {
    let store = FlakyStore {
        inner: MemoryStore::from_dataset(&scenario_dataset()),
        fail_reads: true,
    };
    let generator = ReportGenerator::new(Arc::new(store), ComplianceConfig::default());

    let err = generator
        .generate_at(&ReportRequest::for_project(project_id()), now())
        .unwrap_err();
    assert!(matches!(err, ComplianceError::DataFetch { resource: "tool usage", .. }));
    assert_eq!(err.to_string(), "Failed to fetch tool usage data");
}

#[test]
fn custom_vendor_list_changes_outcome() {
    let store = Arc::new(MemoryStore::from_dataset(&scenario_dataset()));
    let config = ComplianceConfig::from_toml_str(
        r#"verified_vendors = ["OpenAI", "Acme"]"#,
    )
    .unwrap();
    let generator = ReportGenerator::new(store, config);

    let report = generator
        .compute(&ReportRequest::for_project(project_id()), now())
        .unwrap();
    assert_eq!(status_of(&report, "Tool B"), ToolStatus::Approved);
    assert_eq!(status_of(&report, "Tool D"), ToolStatus::NeedsReview);
    assert_eq!(report.compliance_score, 75);
    assert_eq!(report.overall_status, OverallStatus::Yellow);
}

#[test]
fn out_of_range_ttl_is_a_config_error() {
    for ttl in [200_000_000, i64::MAX] {
        let store = Arc::new(MemoryStore::from_dataset(&scenario_dataset()));
        let config = ComplianceConfig {
            report_ttl_days: ttl,
            ..ComplianceConfig::default()
        };
        let generator = ReportGenerator::new(store.clone(), config);

        let err = generator
            .generate_at(&ReportRequest::for_project(project_id()), now())
            .unwrap_err();
        assert!(matches!(err, ComplianceError::Config(_)), "ttl {ttl}: {err:?}");
        assert!(err.to_string().contains("report_ttl_days"));
        assert!(store.latest_report(project_id(), now()).unwrap().is_none());
    }
}

#[test]
fn unlisted_risk_level_is_reported_verbatim() {
    let mut dataset = scenario_dataset();
    let record: ToolUsageRecord =
        serde_json::from_value(usage("Tool E", "OpenAI", "critical", 5)).unwrap();
    dataset.tool_usage.push(record);
    let (generator, _) = generator(&dataset);

    let report = generator
        .compute(&ReportRequest::for_project(project_id()), now())
        .unwrap();
    let json = serde_json::to_value(&report).unwrap();
    let tool_e = json["tools"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["tool_name"] == "Tool E")
        .unwrap();
    assert_eq!(tool_e["risk_level"], "critical");
    // Only an exact "high" fails a low_risk_only rule.
    assert_eq!(status_of(&report, "Tool E"), ToolStatus::Approved);
}
