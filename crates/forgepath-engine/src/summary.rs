//! Topology-wide posture summary

use forgepath_core::{Severity, StrideCategory, Topology, MAX_SEVERITY};
use serde::{Deserialize, Serialize};

/// Aggregate risk figures for every non-boundary asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostureSummary {
    /// Mean aggregate severity (0-10)
    pub system_score: f64,
    /// `system_score` as a percentage of the scale maximum
    pub score_percent: f64,
    pub band: Severity,
    pub total_vulnerabilities: usize,
    pub assessed_assets: usize,
    /// Assets with a STRIDE class, in topology order
    pub classified_assets: Vec<(String, StrideCategory)>,
}

impl PostureSummary {
    pub fn from_topology(topology: &Topology) -> Self {
        let assessed: Vec<_> = topology
            .assets()
            .iter()
            .filter(|a| !a.category.is_boundary())
            .collect();

        let system_score = if assessed.is_empty() {
            0.0
        } else {
            assessed.iter().map(|a| a.aggregate_severity()).sum::<f64>() / assessed.len() as f64
        };

        Self {
            system_score,
            score_percent: system_score / MAX_SEVERITY * 100.0,
            band: Severity::from_score(system_score),
            total_vulnerabilities: assessed.iter().map(|a| a.vulnerabilities.len()).sum(),
            assessed_assets: assessed.len(),
            classified_assets: assessed
                .iter()
                .filter_map(|a| a.stride_category().map(|c| (a.key.clone(), c)))
                .collect(),
        }
    }
}
