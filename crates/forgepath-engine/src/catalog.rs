//! Vulnerability supply - resolves the known weaknesses of an asset category
//!
//! The engine never fetches vulnerability data itself. Callers resolve records
//! up front through a [`VulnerabilitySource`]; [`StaticCatalog`] is the built-in
//! offline source used by the scenario presets.

use forgepath_core::{Asset, AssetCategory, VulnerabilityRecord};
use std::collections::HashMap;

/// Interface for anything that can supply vulnerability records
pub trait VulnerabilitySource {
    /// Records known for assets of the given category (possibly none)
    fn resolve(&self, category: AssetCategory) -> Vec<VulnerabilityRecord>;
}

impl<F> VulnerabilitySource for F
where
    F: Fn(AssetCategory) -> Vec<VulnerabilityRecord>,
{
    fn resolve(&self, category: AssetCategory) -> Vec<VulnerabilityRecord> {
        self(category)
    }
}

/// In-memory catalog keyed by asset category
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    records: HashMap<AssetCategory, Vec<VulnerabilityRecord>>,
}

impl StaticCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog preloaded with representative records for every category
    pub fn builtin() -> Self {
        fn v(id: &str, severity: f64, description: &str) -> VulnerabilityRecord {
            VulnerabilityRecord::new(id, severity, description)
        }

        Self::new()
            .with_records(
                AssetCategory::Server,
                vec![
                    v("CVE-2023-1234", 9.8, "Critical remote code execution"),
                    v("CVE-2023-5678", 7.5, "Privilege escalation"),
                    v("CVE-2023-9012", 6.2, "Information disclosure"),
                ],
            )
            .with_records(
                AssetCategory::Database,
                vec![
                    v("CVE-2023-2345", 8.9, "SQL injection"),
                    v("CVE-2023-3456", 7.1, "Authentication bypass"),
                ],
            )
            .with_records(
                AssetCategory::Router,
                vec![
                    v("CVE-2023-4567", 8.2, "Routing table manipulation"),
                    v("CVE-2023-5679", 5.4, "Denial of service"),
                ],
            )
            .with_records(
                AssetCategory::Firewall,
                vec![v("CVE-2023-6789", 6.8, "Rule bypass")],
            )
            .with_records(
                AssetCategory::Iot,
                vec![
                    v("CVE-2023-7890", 9.1, "Default credentials"),
                    v("CVE-2023-8901", 7.3, "Unsigned firmware update"),
                ],
            )
            .with_records(
                AssetCategory::Workstation,
                vec![v("CVE-2023-9013", 7.8, "Local privilege escalation")],
            )
            .with_records(
                AssetCategory::Unclassified,
                vec![v("CVE-2023-0001", 5.0, "Generic security weakness")],
            )
    }

    /// Replace the records for a category
    pub fn with_records(mut self, category: AssetCategory, records: Vec<VulnerabilityRecord>) -> Self {
        self.records.insert(category, records);
        self
    }

    pub fn len(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl VulnerabilitySource for StaticCatalog {
    fn resolve(&self, category: AssetCategory) -> Vec<VulnerabilityRecord> {
        if category.is_boundary() {
            return Vec::new();
        }
        self.records
            .get(&category)
            .or_else(|| self.records.get(&AssetCategory::Unclassified))
            .cloned()
            .unwrap_or_default()
    }
}

/// Build an asset whose vulnerabilities come from the given source
pub fn resolved_asset(
    source: &dyn VulnerabilitySource,
    key: &str,
    category: AssetCategory,
    label: &str,
) -> Asset {
    Asset::builder(key, category)
        .label(label)
        .vulnerabilities(source.resolve(category))
        .build()
}
