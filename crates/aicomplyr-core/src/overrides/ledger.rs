use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::OverrideError;
use crate::overrides::model::{
    Actor, DecisionEntry, OverrideActivity, OverrideDashboard, OverridePage, OverrideReason,
    OverrideRequest, OverrideStatistics, OverrideStatus, OverrideSummary, OverrideWorkflow,
    Pagination, REVIEW_PERMISSION, ReasonCount, ReviewAction, ReviewRequest, WorkflowStatus,
};
use crate::store::Dataset;

const MAX_PAGE_SIZE: u32 = 100;
const RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone, Default)]
struct LedgerState {
    reasons: Vec<OverrideReason>,
    decisions: Vec<DecisionEntry>,
    workflows: Vec<OverrideWorkflow>,
    activity: Vec<OverrideActivity>,
}

impl LedgerState {
    fn decision_mut(&mut self, entry_id: Uuid) -> Result<&mut DecisionEntry, OverrideError> {
        self.decisions
            .iter_mut()
            .find(|d| d.entry_id == entry_id)
            .ok_or(OverrideError::DecisionNotFound)
    }

    fn log(
        &mut self,
        entry_id: Uuid,
        action_type: &str,
        actor: &Actor,
        details: serde_json::Value,
        now: DateTime<Utc>,
    ) {
        self.activity.push(OverrideActivity {
            entry_id,
            action_type: action_type.to_string(),
            action_by: actor.user_id.clone(),
            action_details: details,
            timestamp: now,
        });
    }
}

/// Override state for all decision entries.
///
/// Mutations run against a staged copy of the state, which replaces the
/// live state only if every step succeeded.
#[derive(Debug, Default)]
pub struct OverrideLedger {
    state: Mutex<LedgerState>,
}

impl OverrideLedger {
    pub fn new(reasons: Vec<OverrideReason>, decisions: Vec<DecisionEntry>) -> Self {
        Self {
            state: Mutex::new(LedgerState {
                reasons,
                decisions,
                ..Default::default()
            }),
        }
    }

    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self::new(dataset.override_reasons.clone(), dataset.decisions.clone())
    }

    fn transaction<T>(
        &self,
        op: &str,
        f: impl FnOnce(&mut LedgerState) -> Result<T, OverrideError>,
    ) -> Result<T, OverrideError> {
        let mut live = self
            .state
            .lock()
            .map_err(|_| OverrideError::Storage("override ledger lock poisoned".into()))?;
        let mut staged = live.clone();
        match f(&mut staged) {
            Ok(value) => {
                *live = staged;
                Ok(value)
            }
            Err(e) => {
                warn!(op, error = %e, "override transaction rolled back");
                Err(e)
            }
        }
    }

    fn snapshot<T>(&self, f: impl FnOnce(&LedgerState) -> T) -> Result<T, OverrideError> {
        let guard = self
            .state
            .lock()
            .map_err(|_| OverrideError::Storage("override ledger lock poisoned".into()))?;
        Ok(f(&guard))
    }

    /// Override reasons grouped by category, each group sorted by name.
    pub fn reasons(&self) -> Result<BTreeMap<String, Vec<OverrideReason>>, OverrideError> {
        self.snapshot(|s| {
            let mut grouped: BTreeMap<String, Vec<OverrideReason>> = BTreeMap::new();
            for reason in &s.reasons {
                grouped
                    .entry(reason.category.clone())
                    .or_default()
                    .push(reason.clone());
            }
            for group in grouped.values_mut() {
                group.sort_by(|a, b| a.reason_name.cmp(&b.reason_name));
            }
            grouped
        })
    }

    pub fn request_override(
        &self,
        actor: &Actor,
        req: &OverrideRequest,
        now: DateTime<Utc>,
    ) -> Result<Uuid, OverrideError> {
        let (Some(decision_id), Some(reason), Some(justification)) = (
            req.decision_id,
            present(&req.reason),
            present(&req.justification),
        ) else {
            return Err(OverrideError::Validation(
                "Missing required fields: decisionId, reason, justification".into(),
            ));
        };

        self.transaction("request_override", |s| {
            let entry = s.decision_mut(decision_id)?;
            if entry.override_requested {
                return Err(OverrideError::AlreadyRequested);
            }

            entry.override_requested = true;
            entry.override_reason = Some(reason.to_string());
            entry.override_justification = Some(justification.to_string());
            entry.override_status = Some(OverrideStatus::Pending);
            entry.override_requested_by = Some(actor.user_id.clone());
            entry.override_requested_at = Some(now);

            if let Some(reviewer) = &req.assigned_reviewer {
                s.workflows.push(OverrideWorkflow {
                    entry_id: decision_id,
                    workflow_type: "standard".into(),
                    current_step: "review".into(),
                    status: WorkflowStatus::Active,
                    assigned_reviewer: reviewer.clone(),
                    priority: req.priority,
                    updated_at: now,
                });
            }

            s.log(
                decision_id,
                "request_override",
                actor,
                json!({
                    "reason": reason,
                    "justification": justification,
                    "priority": req.priority,
                    "assignedReviewer": req.assigned_reviewer,
                }),
                now,
            );
            Ok(())
        })?;

        info!(%decision_id, user = %actor.user_id, "override requested");
        Ok(decision_id)
    }

    pub fn review_override(
        &self,
        actor: &Actor,
        decision_id: Uuid,
        req: &ReviewRequest,
        now: DateTime<Utc>,
    ) -> Result<ReviewAction, OverrideError> {
        if !actor.has_permission(REVIEW_PERMISSION) {
            return Err(OverrideError::Forbidden(REVIEW_PERMISSION.into()));
        }
        let action: ReviewAction = req.action.parse()?;

        self.transaction("review_override", |s| {
            let entry = s.decision_mut(decision_id)?;
            ensure_pending(entry)?;

            entry.override_status = Some(action.resulting_status());
            entry.override_reviewed_by = Some(actor.user_id.clone());
            entry.override_review_notes = req.notes.clone();
            entry.override_resolved_at = Some(now);

            if let (ReviewAction::Approved, Some(new)) = (action, &req.new_decision) {
                entry.status = new.status.clone();
                entry.decision = new.decision.clone();
                entry.reasoning = new.reasoning.clone();
            }

            for wf in s.workflows.iter_mut().filter(|w| w.entry_id == decision_id) {
                wf.status = WorkflowStatus::Completed;
                wf.current_step = "resolved".into();
                wf.updated_at = now;
            }

            s.log(
                decision_id,
                "review_override",
                actor,
                json!({
                    "action": action,
                    "notes": req.notes,
                    "newDecision": req.new_decision,
                }),
                now,
            );
            Ok(())
        })?;

        info!(%decision_id, reviewer = %actor.user_id, ?action, "override reviewed");
        Ok(action)
    }

    pub fn cancel_override(
        &self,
        actor: &Actor,
        decision_id: Uuid,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(), OverrideError> {
        self.transaction("cancel_override", |s| {
            let entry = s.decision_mut(decision_id)?;
            ensure_pending(entry)?;

            entry.override_status = Some(OverrideStatus::Cancelled);
            entry.override_reviewed_by = Some(actor.user_id.clone());
            entry.override_review_notes = reason.clone();
            entry.override_resolved_at = Some(now);

            s.log(decision_id, "cancel_override", actor, json!({ "reason": reason }), now);
            Ok(())
        })?;

        info!(%decision_id, user = %actor.user_id, "override cancelled");
        Ok(())
    }

    /// Requested overrides in `status`, newest request first.
    pub fn list_overrides(
        &self,
        status: OverrideStatus,
        page: u32,
        limit: u32,
        now: DateTime<Utc>,
    ) -> Result<OverridePage, OverrideError> {
        let page = page.max(1);
        let limit = limit.clamp(1, MAX_PAGE_SIZE);

        self.snapshot(|s| {
            let mut matching: Vec<&DecisionEntry> = s
                .decisions
                .iter()
                .filter(|d| d.override_requested && d.override_status == Some(status))
                .collect();
            sort_newest_request_first(&mut matching);

            let total = matching.len() as u64;
            let offset = (page as usize - 1) * limit as usize;
            let overrides = matching
                .into_iter()
                .skip(offset)
                .take(limit as usize)
                .map(|d| summarize(d, now))
                .collect();

            OverridePage {
                overrides,
                pagination: Pagination {
                    page,
                    limit,
                    total,
                    pages: total.div_ceil(u64::from(limit)),
                },
            }
        })
    }

    /// Activity log of one decision, newest first.
    pub fn history(&self, decision_id: Uuid) -> Result<Vec<OverrideActivity>, OverrideError> {
        self.snapshot(|s| {
            let mut rows: Vec<OverrideActivity> = s
                .activity
                .iter()
                .filter(|a| a.entry_id == decision_id)
                .cloned()
                .collect();
            // Stable sort keeps later-appended rows after earlier ones on
            // equal timestamps; reverse puts them first.
            rows.sort_by_key(|a| a.timestamp);
            rows.reverse();
            rows
        })
    }

    pub fn dashboard(&self, now: DateTime<Utc>) -> Result<OverrideDashboard, OverrideError> {
        self.snapshot(|s| {
            let mut requested: Vec<&DecisionEntry> =
                s.decisions.iter().filter(|d| d.override_requested).collect();

            let count = |status: OverrideStatus| {
                requested
                    .iter()
                    .filter(|d| d.override_status == Some(status))
                    .count() as u64
            };

            let resolution_hours: Vec<f64> = requested
                .iter()
                .filter_map(|d| match (d.override_requested_at, d.override_resolved_at) {
                    (Some(start), Some(end)) => Some(hours_between(start, end)),
                    _ => None,
                })
                .collect();
            let avg_resolution_hours = (!resolution_hours.is_empty())
                .then(|| resolution_hours.iter().sum::<f64>() / resolution_hours.len() as f64);

            let statistics = OverrideStatistics {
                total_overrides: requested.len() as u64,
                pending_overrides: count(OverrideStatus::Pending),
                approved_overrides: count(OverrideStatus::Approved),
                rejected_overrides: count(OverrideStatus::Rejected),
                avg_resolution_hours,
            };

            let mut by_reason: HashMap<Option<String>, u64> = HashMap::new();
            for d in &requested {
                *by_reason.entry(d.override_reason.clone()).or_default() += 1;
            }
            let mut reasons_breakdown: Vec<ReasonCount> = by_reason
                .into_iter()
                .map(|(override_reason, count)| ReasonCount {
                    override_reason,
                    count,
                })
                .collect();
            reasons_breakdown.sort_by(|a, b| {
                b.count
                    .cmp(&a.count)
                    .then_with(|| a.override_reason.cmp(&b.override_reason))
            });

            sort_newest_request_first(&mut requested);
            let recent_overrides = requested
                .into_iter()
                .take(RECENT_LIMIT)
                .map(|d| summarize(d, now))
                .collect();

            OverrideDashboard {
                statistics,
                recent_overrides,
                reasons_breakdown,
            }
        })
    }

    pub fn decision(&self, decision_id: Uuid) -> Result<Option<DecisionEntry>, OverrideError> {
        self.snapshot(|s| s.decisions.iter().find(|d| d.entry_id == decision_id).cloned())
    }

    pub fn workflows(&self, decision_id: Uuid) -> Result<Vec<OverrideWorkflow>, OverrideError> {
        self.snapshot(|s| {
            s.workflows
                .iter()
                .filter(|w| w.entry_id == decision_id)
                .cloned()
                .collect()
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn ensure_pending(entry: &DecisionEntry) -> Result<(), OverrideError> {
    if !entry.override_requested {
        return Err(OverrideError::NotRequested);
    }
    if entry.override_status != Some(OverrideStatus::Pending) {
        return Err(OverrideError::NotPending);
    }
    Ok(())
}

fn sort_newest_request_first(entries: &mut [&DecisionEntry]) {
    entries.sort_by(|a, b| {
        b.override_requested_at
            .cmp(&a.override_requested_at)
            .then_with(|| a.entry_id.cmp(&b.entry_id))
    });
}

fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_seconds() as f64 / 3600.0
}

fn summarize(d: &DecisionEntry, now: DateTime<Utc>) -> OverrideSummary {
    OverrideSummary {
        entry_id: d.entry_id,
        agent: d.agent.clone(),
        decision_type: d.decision_type.clone(),
        original_status: d.status.clone(),
        override_reason: d.override_reason.clone(),
        override_justification: d.override_justification.clone(),
        override_status: d.override_status,
        override_requested_at: d.override_requested_at,
        requested_by: d.override_requested_by.clone(),
        reviewed_by: d.override_reviewed_by.clone(),
        override_review_notes: d.override_review_notes.clone(),
        hours_pending: d.override_requested_at.map(|at| hours_between(at, now)),
    }
}
