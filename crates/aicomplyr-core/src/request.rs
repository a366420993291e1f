//! Report request parsing and validation.
//!
//! Requests arrive either as a JSON body or as query parameters, where
//! every value is a string. Both shapes deserialize into
//! [`ReportRequestParams`] and are validated into a [`ReportRequest`]
//! before any data is touched.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ComplianceError;

/// Unvalidated request fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportRequestParams {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub enterprise_id: Option<String>,
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub include_details: Option<BoolParam>,
    #[serde(default)]
    pub compliance_framework: Option<String>,
}

/// A boolean given either natively or as a query-string literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoolParam {
    Bool(bool),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRequest {
    pub project_id: Uuid,
    pub enterprise_id: Option<Uuid>,
    pub workspace_id: Option<Uuid>,
    pub include_details: bool,
    pub compliance_framework: Option<String>,
}

impl ReportRequest {
    pub fn for_project(project_id: Uuid) -> Self {
        Self {
            project_id,
            enterprise_id: None,
            workspace_id: None,
            include_details: true,
            compliance_framework: None,
        }
    }
}

impl TryFrom<ReportRequestParams> for ReportRequest {
    type Error = ComplianceError;

    fn try_from(params: ReportRequestParams) -> Result<Self, Self::Error> {
        let project_id = match non_empty(params.project_id) {
            Some(raw) => parse_uuid("project_id", &raw)?,
            None => {
                return Err(ComplianceError::Validation(
                    "project_id is required".to_string(),
                ));
            }
        };

        let enterprise_id = non_empty(params.enterprise_id)
            .map(|raw| parse_uuid("enterprise_id", &raw))
            .transpose()?;
        let workspace_id = non_empty(params.workspace_id)
            .map(|raw| parse_uuid("workspace_id", &raw))
            .transpose()?;

        let include_details = match params.include_details {
            None => true,
            Some(BoolParam::Bool(b)) => b,
            Some(BoolParam::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                _ => {
                    return Err(ComplianceError::Validation(format!(
                        "include_details must be a boolean, got {s:?}"
                    )));
                }
            },
        };

        Ok(Self {
            project_id,
            enterprise_id,
            workspace_id,
            include_details,
            compliance_framework: non_empty(params.compliance_framework),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_uuid(field: &str, raw: &str) -> Result<Uuid, ComplianceError> {
    Uuid::parse_str(raw).map_err(|_| {
        ComplianceError::Validation(format!("{field} must be a valid UUID, got {raw:?}"))
    })
}
