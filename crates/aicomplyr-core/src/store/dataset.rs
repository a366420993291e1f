use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::inputs::model::{Project, ToolUsageRecord};
use crate::inputs::policy::Policy;
use crate::overrides::model::{DecisionEntry, OverrideReason};
use crate::store::StoredReport;

/// JSON document holding every table the service reads.
///
/// Used to seed [`MemoryStore`](super::MemoryStore) and
/// [`OverrideLedger`](crate::overrides::OverrideLedger) for the CLI, the
/// server and tests.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub projects: Vec<Project>,
    pub tool_usage: Vec<ToolUsageRecord>,
    pub policies: Vec<Policy>,
    pub reports: Vec<StoredReport>,
    pub decisions: Vec<DecisionEntry>,
    pub override_reasons: Vec<OverrideReason>,
}

impl Dataset {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("invalid dataset JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset: {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("in {}", path.display()))
    }
}
