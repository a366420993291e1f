//! Runtime configuration for report generation.
//!
//! Loaded from an optional TOML file. Every field has a default, so an
//! empty file (or no file at all) yields the stock behavior.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Vendor names accepted by `vendor_verification` rules when no
/// configuration overrides them.
pub const DEFAULT_VERIFIED_VENDORS: [&str; 5] =
    ["OpenAI", "Anthropic", "Google", "Microsoft", "Amazon"];

pub const DEFAULT_REPORT_TTL_DAYS: i64 = 30;

/// Upper bound on `report_ttl_days` accepted from a config file.
pub const MAX_REPORT_TTL_DAYS: i64 = 36_500;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ComplianceConfig {
    pub verified_vendors: VendorAllowList,
    /// Lifetime of a persisted report, counted from its generation time.
    pub report_ttl_days: i64,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            verified_vendors: VendorAllowList::default(),
            report_ttl_days: DEFAULT_REPORT_TTL_DAYS,
        }
    }
}

impl ComplianceConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).context("invalid compliance config")?;
        if !(1..=MAX_REPORT_TTL_DAYS).contains(&config.report_ttl_days) {
            anyhow::bail!(
                "report_ttl_days must be between 1 and {MAX_REPORT_TTL_DAYS}, got {}",
                config.report_ttl_days
            );
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::from_toml_str(&raw)
    }
}

/// Case-insensitive substring allow-list of verified AI vendors.
///
/// A vendor is verified when its name contains any entry, so `"OpenAI"`
/// also admits `"OpenAI Inc."` and `"Azure OpenAI"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct VendorAllowList {
    entries: Vec<String>,
    lowered: Vec<String>,
}

impl VendorAllowList {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = entries
            .into_iter()
            .map(Into::into)
            .filter(|e| !e.trim().is_empty())
            .collect();
        let lowered = entries.iter().map(|e| e.to_lowercase()).collect();
        Self { entries, lowered }
    }

    pub fn is_verified(&self, vendor_name: &str) -> bool {
        let vendor = vendor_name.to_lowercase();
        self.lowered.iter().any(|entry| vendor.contains(entry.as_str()))
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

impl Default for VendorAllowList {
    fn default() -> Self {
        Self::new(DEFAULT_VERIFIED_VENDORS)
    }
}

impl From<Vec<String>> for VendorAllowList {
    fn from(entries: Vec<String>) -> Self {
        Self::new(entries)
    }
}

impl From<VendorAllowList> for Vec<String> {
    fn from(list: VendorAllowList) -> Self {
        list.entries
    }
}
