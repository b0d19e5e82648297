//! ForgePath Core - Attack surface data model, risk model and error handling
//!
//! This crate provides the core abstractions used throughout ForgePath:
//! - `Asset`, `VulnerabilityRecord`: nodes of the attack surface and their weaknesses
//! - `Topology`: the mutable graph of assets and directed connections
//! - `RiskModel`: severity aggregation and the severity-to-cost transform
//! - `Severity`, `StrideCategory`: the risk taxonomy

pub mod asset;
pub mod error;
pub mod risk;
pub mod severity;
pub mod topology;
pub mod vulnerability;

// Re-export commonly used types at crate root
pub use asset::{Asset, AssetAttributes, AssetBuilder, AssetCategory};
pub use error::{Error, Result};
pub use risk::{aggregate_severity, RiskModel, DEFAULT_COST_FLOOR, DEFAULT_MISSING_ENDPOINT_COST};
pub use severity::{Severity, StrideCategory};
pub use topology::{Connection, Topology};
pub use vulnerability::{VulnerabilityRecord, MAX_SEVERITY};
