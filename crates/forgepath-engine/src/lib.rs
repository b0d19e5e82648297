//! ForgePath Engine - Risk-weighted attack path analysis
//!
//! This crate provides the analysis engine that:
//! - Finds the riskiest route from the network boundary to the most vulnerable asset
//! - Enumerates and ranks every simple attack path on small topologies
//! - Simulates posture changes (control failure, remediation, new disclosures)

pub mod analysis;
pub mod catalog;
pub mod presets;
pub mod simulate;
pub mod summary;

pub use analysis::{
    enumerate_paths, least_cost, AnalysisOutcome, AnalysisResult, AnalysisStrategy,
    AttackPathAnalyzer, EnumerationLimits, PathEnumeration, RankedPath, ShortestPaths,
};
pub use catalog::{resolved_asset, StaticCatalog, VulnerabilitySource};
pub use presets::Preset;
pub use simulate::{PostureChange, PostureSimulator, Scenario, SimulationReport};
pub use summary::PostureSummary;
