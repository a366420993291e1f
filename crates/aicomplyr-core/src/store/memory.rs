use std::sync::RwLock;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::inputs::model::{Project, ToolUsageRecord};
use crate::inputs::policy::Policy;
use crate::store::{ComplianceStore, Dataset, StoreError, StoredReport};
use crate::util::deterministic::{sort_policies, sort_tool_usage};

#[derive(Debug, Default)]
struct Tables {
    projects: Vec<Project>,
    tool_usage: Vec<ToolUsageRecord>,
    policies: Vec<Policy>,
    reports: Vec<StoredReport>,
}

/// Thread-safe in-memory store, typically seeded from a [`Dataset`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            tables: RwLock::new(Tables {
                projects: dataset.projects.clone(),
                tool_usage: dataset.tool_usage.clone(),
                policies: dataset.policies.clone(),
                reports: dataset.reports.clone(),
            }),
        }
    }

    pub fn insert_project(&self, project: Project) -> Result<(), StoreError> {
        self.write(|t| t.projects.push(project))
    }

    pub fn insert_tool_usage(&self, record: ToolUsageRecord) -> Result<(), StoreError> {
        self.write(|t| t.tool_usage.push(record))
    }

    pub fn insert_policy(&self, policy: Policy) -> Result<(), StoreError> {
        self.write(|t| t.policies.push(policy))
    }

    pub fn reports(&self) -> Result<Vec<StoredReport>, StoreError> {
        self.read(|t| t.reports.clone())
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T, StoreError> {
        let guard = self
            .tables
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))?;
        Ok(f(&guard))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> Result<T, StoreError> {
        let mut guard = self
            .tables
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))?;
        Ok(f(&mut guard))
    }
}

impl ComplianceStore for MemoryStore {
    fn fetch_project(&self, project_id: Uuid) -> Result<Option<Project>, StoreError> {
        self.read(|t| t.projects.iter().find(|p| p.id == project_id).cloned())
    }

    fn fetch_tool_usage(&self, project_id: Uuid) -> Result<Vec<ToolUsageRecord>, StoreError> {
        let mut rows = self.read(|t| {
            t.tool_usage
                .iter()
                .filter(|u| u.project_id == project_id)
                .cloned()
                .collect::<Vec<_>>()
        })?;
        sort_tool_usage(&mut rows);
        Ok(rows)
    }

    fn fetch_active_policies(&self, organization_id: Uuid) -> Result<Vec<Policy>, StoreError> {
        let mut rows = self.read(|t| {
            t.policies
                .iter()
                .filter(|p| p.organization_id == organization_id && p.is_active())
                .cloned()
                .collect::<Vec<_>>()
        })?;
        sort_policies(&mut rows);
        Ok(rows)
    }

    fn persist_report(&self, row: StoredReport) -> Result<Uuid, StoreError> {
        let id = row.id;
        self.write(|t| t.reports.push(row))?;
        Ok(id)
    }

    fn latest_report(
        &self,
        project_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<StoredReport>, StoreError> {
        self.read(|t| {
            t.reports
                .iter()
                .filter(|r| r.project_id == project_id && r.is_live_at(now))
                .max_by_key(|r| r.generated_at)
                .cloned()
        })
    }
}
