//! Deterministic ordering helpers.
//!
//! Report contents depend on the order in which tools, policies and rules
//! are visited. Stores apply these orderings before handing rows to the
//! pipeline so identical data always yields identical reports.

use std::cmp::Ordering;

use crate::inputs::model::ToolUsageRecord;
use crate::inputs::policy::Policy;

/// Most recently used first; never-used tools last; ties by tool name.
pub fn sort_tool_usage(tools: &mut [ToolUsageRecord]) {
    tools.sort_by(|a, b| {
        let by_recency = match (&a.last_used, &b.last_used) {
            (Some(x), Some(y)) => y.cmp(x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_recency.then_with(|| a.tool_name.cmp(&b.tool_name))
    });
}

/// Policies by `(name, id)`; rules inside each policy by `(rule_name, id)`.
pub fn sort_policies(policies: &mut [Policy]) {
    policies.sort_by(|a, b| (a.name.as_str(), a.id).cmp(&(b.name.as_str(), b.id)));
    for policy in policies.iter_mut() {
        policy
            .rules
            .sort_by(|a, b| (a.rule_name.as_str(), a.id).cmp(&(b.rule_name.as_str(), b.id)));
    }
}
