pub mod config;
pub mod error;
pub mod inputs;
pub mod overrides;
pub mod pipeline;
pub mod report;
pub mod request;
pub mod rules;
pub mod store;
pub mod util;

pub use config::ComplianceConfig;
pub use error::{ComplianceError, OverrideError};
pub use pipeline::{GeneratedReport, PersistenceOutcome, ReportGenerator};
pub use request::{ReportRequest, ReportRequestParams};

pub const TOOL_NAME: &str = "aicomplyr";

/// JSON schema version of compliance reports.
/// Bump only when the report shape changes semantically.
pub const SCHEMA_VERSION: &str = "1.0.0";

pub const RULE_CATALOG_VERSION: &str = "1.0.0";
