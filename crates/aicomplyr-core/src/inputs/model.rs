use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Project row. Only the organization link matters for scoring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub organization_id: Uuid,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub metadata: Value,
}

/// Risk level recorded for a tool at ingestion time.
///
/// Values outside the known scale are kept verbatim in `Other` so reports
/// echo what ingestion wrote. Rules only act on an exact `high` or
/// `medium`. A missing or null level reads as `Unknown`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "Option<String>", into = "String")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    #[default]
    Unknown,
    Other(String),
}

impl RiskLevel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Unknown => "unknown",
            Self::Other(raw) => raw,
        }
    }
}

impl From<Option<String>> for RiskLevel {
    fn from(raw: Option<String>) -> Self {
        let Some(raw) = raw else {
            return Self::Unknown;
        };
        let known = match raw.as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "unknown" => Some(Self::Unknown),
            _ => None,
        };
        known.unwrap_or(Self::Other(raw))
    }
}

impl From<RiskLevel> for String {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// One AI tool observed within a project.
///
/// `compliance_status` is the informational value written by usage
/// ingestion. It is distinct from the status derived during report
/// generation and only consulted by `data_handling` rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolUsageRecord {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub project_id: Uuid,
    pub tool_name: String,
    #[serde(default)]
    pub vendor_name: Option<String>,
    #[serde(default)]
    pub usage_type: Option<String>,
    #[serde(default)]
    pub data_processed: Option<String>,
    #[serde(default = "unknown_status")]
    pub compliance_status: String,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub usage_count: u64,
    #[serde(default)]
    pub last_used: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: Value,
}

pub const UNKNOWN_VENDOR: &str = "Unknown";

fn unknown_status() -> String {
    "unknown".to_string()
}

impl ToolUsageRecord {
    /// Vendor name for display and vendor checks; `"Unknown"` when absent.
    pub fn vendor(&self) -> &str {
        self.vendor_name
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(UNKNOWN_VENDOR)
    }

    pub fn has_unknown_recorded_status(&self) -> bool {
        self.compliance_status == "unknown"
    }
}
