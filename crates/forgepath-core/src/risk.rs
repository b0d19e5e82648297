//! Risk model - turns vulnerability severity into traversal cost
//!
//! A least-cost search surfaces the cheapest route, so cost is the inverse of
//! risk: the more severe the endpoints of a connection, the cheaper it is to
//! traverse. Costs never drop below a small positive floor.

use crate::vulnerability::{VulnerabilityRecord, MAX_SEVERITY};
use serde::{Deserialize, Serialize};

/// Lowest cost any connection may carry
pub const DEFAULT_COST_FLOOR: f64 = 0.1;

/// Cost assigned to connections whose endpoints cannot be resolved
pub const DEFAULT_MISSING_ENDPOINT_COST: f64 = 10.0;

/// Arithmetic mean of the record severities, 0 for an empty set
pub fn aggregate_severity(vulnerabilities: &[VulnerabilityRecord]) -> f64 {
    if vulnerabilities.is_empty() {
        return 0.0;
    }
    let sum: f64 = vulnerabilities.iter().map(|v| v.severity).sum();
    sum / vulnerabilities.len() as f64
}

/// Severity-to-cost transformation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskModel {
    /// Minimum cost of any connection
    pub floor: f64,
    /// Cost used when an endpoint is missing from the topology
    pub missing_endpoint_cost: f64,
}

impl Default for RiskModel {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskModel {
    pub fn new() -> Self {
        Self {
            floor: DEFAULT_COST_FLOOR,
            missing_endpoint_cost: DEFAULT_MISSING_ENDPOINT_COST,
        }
    }

    /// Create a model with a custom floor
    pub fn with_floor(floor: f64) -> Self {
        Self {
            floor,
            ..Self::new()
        }
    }

    pub fn with_missing_endpoint_cost(mut self, cost: f64) -> Self {
        self.missing_endpoint_cost = cost;
        self
    }

    /// Cost of traversing between two assets with the given aggregate severities
    pub fn connection_cost(&self, from_severity: f64, to_severity: f64) -> f64 {
        let mean = ((from_severity + to_severity) / 2.0).clamp(0.0, MAX_SEVERITY);
        self.floor_clamp(MAX_SEVERITY - mean)
    }

    /// Apply the floor to an arbitrary cost
    pub fn floor_clamp(&self, cost: f64) -> f64 {
        cost.max(self.floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(scores: &[f64]) -> Vec<VulnerabilityRecord> {
        scores
            .iter()
            .enumerate()
            .map(|(i, s)| VulnerabilityRecord::new(format!("CVE-TEST-{}", i), *s, "test"))
            .collect()
    }

    #[test]
    fn test_aggregate_empty_is_zero() {
        assert_eq!(aggregate_severity(&[]), 0.0);
    }

    #[test]
    fn test_aggregate_mean() {
        let db = records(&[8.9, 7.1]);
        assert!((aggregate_severity(&db) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_internet_to_web_cost() {
        let model = RiskModel::new();
        let web = aggregate_severity(&records(&[9.8, 7.5, 6.2]));
        let cost = model.connection_cost(0.0, web);
        let expected = 10.0 - (0.0 + 23.5 / 3.0) / 2.0;
        assert!((cost - expected).abs() < 1e-9);
        assert!((cost - 6.0833).abs() < 1e-3);
    }

    #[test]
    fn test_cost_bounds_and_monotonicity() {
        let model = RiskModel::new();
        let mut previous = f64::INFINITY;
        for step in 0..=100 {
            let severity = step as f64 / 10.0;
            let cost = model.connection_cost(severity, severity);
            assert!(cost >= model.floor);
            assert!(cost <= MAX_SEVERITY);
            assert!(cost <= previous);
            previous = cost;
        }
        assert_eq!(model.connection_cost(0.0, 0.0), 10.0);
        assert_eq!(model.connection_cost(10.0, 10.0), DEFAULT_COST_FLOOR);
    }

    #[test]
    fn test_out_of_range_severity_is_clamped() {
        let model = RiskModel::new();
        assert_eq!(model.connection_cost(25.0, 25.0), model.floor);
        assert_eq!(model.connection_cost(-4.0, -4.0), 10.0);
    }
}
