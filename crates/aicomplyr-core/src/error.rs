//! Error types for report generation and the override workflow.

use thiserror::Error;
use uuid::Uuid;

/// Failures of the compliance report pipeline.
///
/// Request and data failures are surfaced to HTTP callers as a 400 with the
/// `Display` text as the message; `Config` is a server fault. Persistence
/// failures never reach callers through this type, they are reported on
/// `GeneratedReport::persistence`.
#[derive(Debug, Error)]
pub enum ComplianceError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(Uuid),

    #[error("project {project_id} does not belong to enterprise {enterprise_id}")]
    EnterpriseMismatch { project_id: Uuid, enterprise_id: Uuid },

    #[error("Failed to fetch {resource} data")]
    DataFetch {
        resource: &'static str,
        reason: String,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl ComplianceError {
    pub fn fetch(resource: &'static str, reason: impl Into<String>) -> Self {
        Self::DataFetch {
            resource,
            reason: reason.into(),
        }
    }
}

/// Failures of override state transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OverrideError {
    #[error("{0}")]
    Validation(String),

    #[error("Decision not found")]
    DecisionNotFound,

    #[error("Override already requested for this decision")]
    AlreadyRequested,

    #[error("No override requested for this decision")]
    NotRequested,

    #[error("Override is not in pending status")]
    NotPending,

    #[error("missing permission: {0}")]
    Forbidden(String),

    #[error("override storage error: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_hides_reason_from_message() {
        let err = ComplianceError::fetch("tool usage", "connection reset");
        assert_eq!(err.to_string(), "Failed to fetch tool usage data");
    }

    #[test]
    fn not_found_names_project() {
        let id = Uuid::nil();
        assert_eq!(
            ComplianceError::ProjectNotFound(id).to_string(),
            format!("Project not found: {id}")
        );
    }
}
