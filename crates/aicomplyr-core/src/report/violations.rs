//! Cross-tool deduplication of violation messages.

use std::collections::HashMap;

use crate::report::model::{PolicyViolation, ToolReport, ViolationType};
use crate::rules::catalog::Severity;

/// Merges identical violation messages across tools.
///
/// The message text is the key: entries keep first-seen order and list
/// every tool that produced the message, each tool once.
pub fn collect_violations(tools: &[ToolReport]) -> Vec<PolicyViolation> {
    let mut entries: Vec<PolicyViolation> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for tool in tools {
        for message in &tool.policy_violations {
            let slot = *index.entry(message.as_str()).or_insert_with(|| {
                entries.push(PolicyViolation {
                    rule_name: message.clone(),
                    violation_type: ViolationType::PolicyBreach,
                    severity: Severity::Medium,
                    affected_tools: Vec::new(),
                    description: message.clone(),
                    remediation: format!("Address {message} for affected tools"),
                });
                entries.len() - 1
            });
            let affected = &mut entries[slot].affected_tools;
            if !affected.contains(&tool.tool_name) {
                affected.push(tool.tool_name.clone());
            }
        }
    }

    entries
}
