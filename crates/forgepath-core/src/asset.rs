//! Asset definitions - the nodes of an attack surface topology

use crate::error::Error;
use crate::risk::aggregate_severity;
use crate::severity::{Severity, StrideCategory};
use crate::vulnerability::VulnerabilityRecord;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Category of a network asset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    /// Perimeter / public network boundary (the attacker's entry point)
    Boundary,
    Server,
    Database,
    Router,
    Firewall,
    Iot,
    Workstation,
    #[default]
    Unclassified,
}

impl AssetCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetCategory::Boundary => "boundary",
            AssetCategory::Server => "server",
            AssetCategory::Database => "database",
            AssetCategory::Router => "router",
            AssetCategory::Firewall => "firewall",
            AssetCategory::Iot => "iot",
            AssetCategory::Workstation => "workstation",
            AssetCategory::Unclassified => "unclassified",
        }
    }

    pub fn is_boundary(&self) -> bool {
        matches!(self, AssetCategory::Boundary)
    }
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AssetCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "boundary" | "internet" | "perimeter" => Ok(AssetCategory::Boundary),
            "server" => Ok(AssetCategory::Server),
            "database" | "db" => Ok(AssetCategory::Database),
            "router" => Ok(AssetCategory::Router),
            "firewall" => Ok(AssetCategory::Firewall),
            "iot" => Ok(AssetCategory::Iot),
            "workstation" | "pc" => Ok(AssetCategory::Workstation),
            "unclassified" | "default" => Ok(AssetCategory::Unclassified),
            other => Err(Error::UnknownCategory(other.to_string())),
        }
    }
}

/// Display-only attributes of an asset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetAttributes {
    pub os: Option<String>,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub ports: Vec<u16>,
}

/// A network-reachable entity in the topology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Unique key within the topology
    pub key: String,
    /// Display label
    pub label: String,
    pub category: AssetCategory,
    /// Attached vulnerabilities (order is not significant)
    #[serde(default)]
    pub vulnerabilities: Vec<VulnerabilityRecord>,
    #[serde(default)]
    pub attributes: AssetAttributes,
}

impl Asset {
    /// Create a new asset builder
    pub fn builder(key: impl Into<String>, category: AssetCategory) -> AssetBuilder {
        AssetBuilder::new(key, category)
    }

    /// Mean severity of the attached vulnerabilities (0 when none)
    pub fn aggregate_severity(&self) -> f64 {
        aggregate_severity(&self.vulnerabilities)
    }

    pub fn severity_band(&self) -> Severity {
        Severity::from_score(self.aggregate_severity())
    }

    pub fn stride_category(&self) -> Option<StrideCategory> {
        StrideCategory::classify(self.aggregate_severity())
    }

    pub fn is_vulnerable(&self) -> bool {
        !self.vulnerabilities.is_empty()
    }
}

/// Builder for constructing assets
pub struct AssetBuilder {
    asset: Asset,
}

impl AssetBuilder {
    pub fn new(key: impl Into<String>, category: AssetCategory) -> Self {
        let key = key.into();
        Self {
            asset: Asset {
                label: key.clone(),
                key,
                category,
                vulnerabilities: Vec::new(),
                attributes: AssetAttributes::default(),
            },
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.asset.label = label.into();
        self
    }

    pub fn vulnerability(mut self, record: VulnerabilityRecord) -> Self {
        self.asset.vulnerabilities.push(record);
        self
    }

    pub fn vulnerabilities(mut self, records: Vec<VulnerabilityRecord>) -> Self {
        self.asset.vulnerabilities = records;
        self
    }

    pub fn os(mut self, os: impl Into<String>) -> Self {
        self.asset.attributes.os = Some(os.into());
        self
    }

    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.asset.attributes.services.push(service.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.asset.attributes.ports.push(port);
        self
    }

    pub fn build(self) -> Asset {
        self.asset
    }
}
