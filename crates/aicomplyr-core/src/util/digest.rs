use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::inputs::model::ToolUsageRecord;
use crate::inputs::policy::Policy;
use crate::report::model::InputDigest;

#[derive(Serialize)]
struct Snapshot<'a> {
    tools: &'a [ToolUsageRecord],
    policies: &'a [Policy],
}

/// SHA-256 over the canonical JSON of the evaluated inputs.
///
/// Depends only on row contents and order, so callers must sort rows
/// (see `util::deterministic`) before fingerprinting.
pub fn input_digest(
    tools: &[ToolUsageRecord],
    policies: &[Policy],
) -> serde_json::Result<InputDigest> {
    let bytes = serde_json::to_vec(&Snapshot { tools, policies })?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);

    Ok(InputDigest {
        algorithm: "sha256".to_string(),
        value: hex::encode(hasher.finalize()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::model::RiskLevel;
    use serde_json::Value;
    use uuid::Uuid;

    fn usage(name: &str, risk: RiskLevel) -> ToolUsageRecord {
        ToolUsageRecord {
            id: None,
            project_id: Uuid::nil(),
            tool_name: name.into(),
            vendor_name: Some("OpenAI".into()),
            usage_type: None,
            data_processed: None,
            compliance_status: "approved".into(),
            risk_level: risk,
            usage_count: 4,
            last_used: None,
            metadata: Value::Null,
        }
    }

    #[test]
    fn digest_is_stable_for_same_input() {
        let tools = vec![usage("ChatGPT", RiskLevel::Low)];
        let a = input_digest(&tools, &[]).unwrap();
        let b = input_digest(&tools, &[]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.algorithm, "sha256");
        assert_eq!(a.value.len(), 64);
    }

    #[test]
    fn digest_changes_with_input() {
        let a = input_digest(&[usage("ChatGPT", RiskLevel::Low)], &[]).unwrap();
        let b = input_digest(&[usage("ChatGPT", RiskLevel::High)], &[]).unwrap();
        assert_ne!(a.value, b.value);
    }
}
