//! Attack path analysis
//!
//! Two interchangeable strategies run over a cost-annotated [`Topology`]:
//! - least-cost traversal (label-setting shortest path from the boundary asset),
//!   targeting the reachable asset with the highest aggregate severity
//! - exhaustive enumeration of every simple path to every candidate target,
//!   ranked by ascending cost
//!
//! Because cost is the inverse of severity, the cheapest route is the riskiest
//! one. Analysis never mutates the topology; [`AttackPathAnalyzer::run`] is the
//! entry point that refreshes costs first and flags the critical path after.

use chrono::{DateTime, Utc};
use forgepath_common::AnalysisConfig;
use forgepath_core::{Error, Result, RiskModel, Topology};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Path-finding strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisStrategy {
    /// Least-cost traversal
    #[default]
    Dijkstra,
    /// Depth-first enumeration of all simple paths
    ExhaustiveDfs,
}

impl AnalysisStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStrategy::Dijkstra => "dijkstra",
            AnalysisStrategy::ExhaustiveDfs => "exhaustive-dfs",
        }
    }
}

impl std::fmt::Display for AnalysisStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnalysisStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dijkstra" | "least-cost" => Ok(AnalysisStrategy::Dijkstra),
            "exhaustive-dfs" | "dfs" => Ok(AnalysisStrategy::ExhaustiveDfs),
            other => Err(Error::UnknownStrategy(other.to_string())),
        }
    }
}

/// How an analysis run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisOutcome {
    /// A path to a target was selected
    Found,
    /// The topology has no boundary asset to start from
    NoSource,
    /// Nothing besides the source is reachable
    Unreachable,
}

/// One discovered path and its accumulated cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPath {
    pub target: String,
    pub path: Vec<String>,
    pub cost: f64,
}

/// Result of an analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: Uuid,
    pub strategy: AnalysisStrategy,
    pub outcome: AnalysisOutcome,
    /// Key of the boundary asset the search started from
    pub source: Option<String>,
    pub target: Option<String>,
    /// Aggregate severity of the selected target
    pub target_severity: f64,
    /// Selected path, source first (empty when none was found)
    pub path: Vec<String>,
    pub total_cost: f64,
    /// Every discovered path by ascending cost (exhaustive strategy only)
    #[serde(default)]
    pub ranked_paths: Vec<RankedPath>,
    /// Set when enumeration stopped at the path budget
    #[serde(default)]
    pub truncated: bool,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisResult {
    fn empty(strategy: AnalysisStrategy, outcome: AnalysisOutcome, source: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            strategy,
            outcome,
            source,
            target: None,
            target_severity: 0.0,
            path: Vec::new(),
            total_cost: 0.0,
            ranked_paths: Vec::new(),
            truncated: false,
            analyzed_at: Utc::now(),
        }
    }

    pub fn is_found(&self) -> bool {
        self.outcome == AnalysisOutcome::Found
    }

    /// Number of connections on the selected path
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

// ============================================================================
// Least-cost traversal
// ============================================================================

/// Single-source least-cost distances and predecessors
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    keys: Vec<String>,
    source: usize,
    distances: Vec<f64>,
    predecessors: Vec<Option<usize>>,
}

impl ShortestPaths {
    pub fn source(&self) -> &str {
        &self.keys[self.source]
    }

    /// Accumulated cost to an asset, `None` if unknown or unreachable
    pub fn cost_to(&self, key: &str) -> Option<f64> {
        let index = self.keys.iter().position(|k| k == key)?;
        let cost = self.distances[index];
        cost.is_finite().then_some(cost)
    }

    pub fn is_reachable(&self, key: &str) -> bool {
        self.cost_to(key).is_some()
    }

    /// Reconstruct the path to an asset by walking predecessors back to the source
    pub fn path_to(&self, key: &str) -> Option<Vec<String>> {
        let target = self.keys.iter().position(|k| k == key)?;
        if !self.distances[target].is_finite() {
            return None;
        }
        let mut path = vec![self.keys[target].clone()];
        let mut current = target;
        while let Some(previous) = self.predecessors[current] {
            path.push(self.keys[previous].clone());
            current = previous;
        }
        path.reverse();
        Some(path)
    }
}

/// Run the label-setting search from `source`; `None` if the source is absent.
///
/// The unsettled node with the minimum tentative cost is settled next; ties go
/// to the earliest-inserted asset, and relaxation only updates on strict
/// improvement so the first-discovered predecessor wins.
pub fn least_cost(topology: &Topology, source: &str) -> Option<ShortestPaths> {
    let source = topology.index_of(source)?;
    let keys: Vec<String> = topology.assets().iter().map(|a| a.key.clone()).collect();
    let index: HashMap<&str, usize> = keys
        .iter()
        .enumerate()
        .map(|(i, k)| (k.as_str(), i))
        .collect();

    let count = keys.len();
    let mut distances = vec![f64::INFINITY; count];
    let mut predecessors: Vec<Option<usize>> = vec![None; count];
    let mut settled = vec![false; count];
    distances[source] = 0.0;

    loop {
        let mut current = None;
        let mut min_distance = f64::INFINITY;
        for node in 0..count {
            if !settled[node] && distances[node] < min_distance {
                min_distance = distances[node];
                current = Some(node);
            }
        }
        let Some(current) = current else { break };

        settled[current] = true;
        debug!("Settling {} (cost {:.2})", keys[current], min_distance);

        for connection in topology.outgoing(&keys[current]) {
            let Some(&next) = index.get(connection.to.as_str()) else {
                continue;
            };
            if settled[next] {
                continue;
            }
            let candidate = distances[current] + connection.cost;
            if candidate < distances[next] {
                distances[next] = candidate;
                predecessors[next] = Some(current);
            }
        }
    }

    Some(ShortestPaths {
        keys,
        source,
        distances,
        predecessors,
    })
}

// ============================================================================
// Exhaustive enumeration
// ============================================================================

/// Bounds for the exponential path enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumerationLimits {
    /// Refuse topologies with more assets than this
    pub max_assets: usize,
    /// Stop after collecting this many paths
    pub max_paths: usize,
}

impl Default for EnumerationLimits {
    fn default() -> Self {
        Self {
            max_assets: 16,
            max_paths: 10_000,
        }
    }
}

/// All simple paths discovered from a source, cheapest first
#[derive(Debug, Clone, Default)]
pub struct PathEnumeration {
    pub paths: Vec<RankedPath>,
    /// At least one path was left out because the budget ran out
    pub truncated: bool,
}

impl PathEnumeration {
    /// The cheapest (riskiest) path overall
    pub fn best(&self) -> Option<&RankedPath> {
        self.paths.first()
    }

    /// The cheapest path ending at a specific asset
    pub fn best_to(&self, target: &str) -> Option<&RankedPath> {
        self.paths.iter().find(|p| p.target == target)
    }

    pub fn paths_to<'a>(&'a self, target: &'a str) -> impl Iterator<Item = &'a RankedPath> + 'a {
        self.paths.iter().filter(move |p| p.target == target)
    }
}

/// Single depth-first walk from the source. Every extension of the current
/// path that ends on a candidate target is recorded, so each expansion either
/// records a path or crosses a boundary asset, and the path budget bounds the
/// whole search.
struct Enumerator<'a> {
    keys: Vec<&'a str>,
    adjacency: Vec<Vec<(usize, f64)>>,
    candidate: Vec<bool>,
    visited: Vec<bool>,
    path: Vec<usize>,
    found: Vec<RankedPath>,
    max_paths: usize,
    truncated: bool,
}

impl<'a> Enumerator<'a> {
    fn new(topology: &'a Topology, source: usize, max_paths: usize) -> Self {
        let keys: Vec<&str> = topology.assets().iter().map(|a| a.key.as_str()).collect();
        let adjacency: Vec<Vec<(usize, f64)>> = keys
            .iter()
            .map(|key| {
                topology
                    .outgoing(key)
                    .filter_map(|c| {
                        let next = keys.iter().position(|k| *k == c.to)?;
                        Some((next, c.cost))
                    })
                    .collect()
            })
            .collect();
        let candidate = topology
            .assets()
            .iter()
            .enumerate()
            .map(|(i, a)| i != source && !a.category.is_boundary())
            .collect();

        Self {
            visited: vec![false; keys.len()],
            keys,
            adjacency,
            candidate,
            path: Vec::new(),
            found: Vec::new(),
            max_paths,
            truncated: false,
        }
    }

    fn search(&mut self, current: usize, cost: f64) {
        if self.candidate[current] {
            if self.found.len() >= self.max_paths {
                self.truncated = true;
                return;
            }
            self.record(current, cost);
        }

        self.path.push(current);
        self.visited[current] = true;
        for edge in 0..self.adjacency[current].len() {
            if self.truncated {
                break;
            }
            let (next, step) = self.adjacency[current][edge];
            if !self.visited[next] {
                self.search(next, cost + step);
            }
        }
        self.visited[current] = false;
        self.path.pop();
    }

    fn record(&mut self, target: usize, cost: f64) {
        let path: Vec<String> = self
            .path
            .iter()
            .chain(std::iter::once(&target))
            .map(|&i| self.keys[i].to_string())
            .collect();
        debug!("Discovered path {} (cost {:.2})", path.join(" -> "), cost);
        self.found.push(RankedPath {
            target: self.keys[target].to_string(),
            path,
            cost,
        });
    }
}

/// Enumerate every simple path from `source` to each non-boundary asset.
///
/// Exponential in the worst case, so the topology size is checked against
/// `limits.max_assets` first and collection stops at `limits.max_paths`.
pub fn enumerate_paths(
    topology: &Topology,
    source: &str,
    limits: EnumerationLimits,
) -> Result<PathEnumeration> {
    check_enumeration_size(topology, limits)?;
    let Some(source_index) = topology.index_of(source) else {
        return Ok(PathEnumeration::default());
    };

    let mut enumerator = Enumerator::new(topology, source_index, limits.max_paths);
    enumerator.search(source_index, 0.0);

    let mut paths = enumerator.found;
    paths.sort_by(|a, b| a.cost.total_cmp(&b.cost));

    Ok(PathEnumeration {
        paths,
        truncated: enumerator.truncated,
    })
}

fn check_enumeration_size(topology: &Topology, limits: EnumerationLimits) -> Result<()> {
    if topology.len() > limits.max_assets {
        return Err(Error::ResourceLimitExceeded(format!(
            "exhaustive enumeration allows at most {} assets, topology has {}",
            limits.max_assets,
            topology.len()
        )));
    }
    Ok(())
}

// ============================================================================
// Analyzer
// ============================================================================

/// Runs attack path analysis over a topology
#[derive(Debug, Clone, Default)]
pub struct AttackPathAnalyzer {
    model: RiskModel,
    limits: EnumerationLimits,
}

impl AttackPathAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            model: RiskModel::with_floor(config.cost_floor)
                .with_missing_endpoint_cost(config.missing_endpoint_cost),
            limits: EnumerationLimits {
                max_assets: config.max_enumeration_assets,
                max_paths: config.max_enumeration_paths,
            },
        }
    }

    pub fn with_model(mut self, model: RiskModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_limits(mut self, limits: EnumerationLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn risk_model(&self) -> &RiskModel {
        &self.model
    }

    /// Fail early if `strategy` would refuse this topology
    pub fn check(&self, topology: &Topology, strategy: AnalysisStrategy) -> Result<()> {
        match strategy {
            AnalysisStrategy::Dijkstra => Ok(()),
            AnalysisStrategy::ExhaustiveDfs => check_enumeration_size(topology, self.limits),
        }
    }

    /// Recompute costs, analyze, and flag the selected path on the topology
    pub fn run(&self, topology: &mut Topology, strategy: AnalysisStrategy) -> Result<AnalysisResult> {
        let unresolved = topology.recompute_costs(&self.model);
        if unresolved > 0 {
            warn!("{} connections reference missing assets", unresolved);
        }
        let result = self.analyze(topology, strategy)?;
        topology.mark_critical_path(&result.path);
        Ok(result)
    }

    /// Analyze the topology as-is; costs must already be current
    pub fn analyze(&self, topology: &Topology, strategy: AnalysisStrategy) -> Result<AnalysisResult> {
        if topology.costs_stale() {
            warn!("Analyzing a topology whose connection costs have not been recomputed");
        }

        let Some(source) = topology.source() else {
            warn!("No boundary asset found, nothing to analyze");
            return Ok(AnalysisResult::empty(strategy, AnalysisOutcome::NoSource, None));
        };
        let source_key = source.key.clone();
        info!("Starting {} analysis from {}", strategy, source_key);

        let result = match strategy {
            AnalysisStrategy::Dijkstra => self.analyze_least_cost(topology, source_key),
            AnalysisStrategy::ExhaustiveDfs => self.analyze_exhaustive(topology, source_key)?,
        };

        if result.is_found() {
            info!(
                "Riskiest path (cost {:.2}): {}",
                result.total_cost,
                result.path.join(" -> ")
            );
        } else {
            warn!("No target reachable from {}", result.source.as_deref().unwrap_or("-"));
        }
        Ok(result)
    }

    fn analyze_least_cost(&self, topology: &Topology, source: String) -> AnalysisResult {
        let strategy = AnalysisStrategy::Dijkstra;
        let Some(paths) = least_cost(topology, &source) else {
            return AnalysisResult::empty(strategy, AnalysisOutcome::NoSource, None);
        };

        let mut target: Option<(&str, f64)> = None;
        for asset in topology.assets() {
            if asset.key == source || asset.category.is_boundary() || !paths.is_reachable(&asset.key) {
                continue;
            }
            let severity = asset.aggregate_severity();
            if target.map_or(true, |(_, best)| severity > best) {
                target = Some((asset.key.as_str(), severity));
            }
        }

        let Some((target, severity)) = target else {
            return AnalysisResult::empty(strategy, AnalysisOutcome::Unreachable, Some(source));
        };

        let path = paths.path_to(target).unwrap_or_default();
        let total_cost = paths.cost_to(target).unwrap_or_default();
        AnalysisResult {
            target: Some(target.to_string()),
            target_severity: severity,
            path,
            total_cost,
            ..AnalysisResult::empty(strategy, AnalysisOutcome::Found, Some(source))
        }
    }

    fn analyze_exhaustive(&self, topology: &Topology, source: String) -> Result<AnalysisResult> {
        let strategy = AnalysisStrategy::ExhaustiveDfs;
        let enumeration = enumerate_paths(topology, &source, self.limits)?;
        info!("Discovered {} paths", enumeration.paths.len());
        if enumeration.truncated {
            warn!("Path enumeration stopped at the configured budget");
        }

        let Some(best) = enumeration.best().cloned() else {
            return Ok(AnalysisResult {
                truncated: enumeration.truncated,
                ..AnalysisResult::empty(strategy, AnalysisOutcome::Unreachable, Some(source))
            });
        };

        let target_severity = topology
            .asset(&best.target)
            .map(|a| a.aggregate_severity())
            .unwrap_or_default();

        Ok(AnalysisResult {
            target: Some(best.target),
            target_severity,
            path: best.path,
            total_cost: best.cost,
            truncated: enumeration.truncated,
            ranked_paths: enumeration.paths,
            ..AnalysisResult::empty(strategy, AnalysisOutcome::Found, Some(source))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forgepath_core::{Asset, AssetCategory, VulnerabilityRecord};

    fn asset(key: &str, category: AssetCategory, scores: &[f64]) -> Asset {
        let mut builder = Asset::builder(key, category);
        for (i, score) in scores.iter().enumerate() {
            builder = builder.vulnerability(VulnerabilityRecord::new(
                format!("CVE-{}-{}", key, i),
                *score,
                "test",
            ));
        }
        builder.build()
    }

    /// internet -> web -> db, admin -> web
    fn reference_topology() -> Topology {
        let mut topology = Topology::new();
        topology.add_asset(asset("internet", AssetCategory::Boundary, &[])).unwrap();
        topology.add_asset(asset("web", AssetCategory::Server, &[9.8, 7.5, 6.2])).unwrap();
        topology.add_asset(asset("db", AssetCategory::Database, &[8.9, 7.1])).unwrap();
        topology.add_asset(asset("admin", AssetCategory::Workstation, &[7.8])).unwrap();
        topology.add_connection("internet", "web").unwrap();
        topology.add_connection("web", "db").unwrap();
        topology.add_connection("admin", "web").unwrap();
        topology.recompute_costs(&RiskModel::new());
        topology
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("dijkstra".parse::<AnalysisStrategy>().unwrap(), AnalysisStrategy::Dijkstra);
        assert_eq!(
            "exhaustive-dfs".parse::<AnalysisStrategy>().unwrap(),
            AnalysisStrategy::ExhaustiveDfs
        );
        assert!("bfs".parse::<AnalysisStrategy>().is_err());
    }

    #[test]
    fn test_least_cost_reference_scenario() {
        let topology = reference_topology();
        let result = AttackPathAnalyzer::new()
            .analyze(&topology, AnalysisStrategy::Dijkstra)
            .unwrap();

        let web = 23.5 / 3.0;
        let expected = (10.0 - web / 2.0) + (10.0 - (web + 8.0) / 2.0);
        assert_eq!(result.outcome, AnalysisOutcome::Found);
        assert_eq!(result.source.as_deref(), Some("internet"));
        assert_eq!(result.target.as_deref(), Some("db"));
        assert_eq!(result.path, vec!["internet", "web", "db"]);
        assert!((result.total_cost - expected).abs() < 1e-9);
        assert!((result.target_severity - 8.0).abs() < 1e-9);
        assert_eq!(result.hops(), 2);
    }

    #[test]
    fn test_unreachable_assets_are_never_targets() {
        let topology = reference_topology();
        let paths = least_cost(&topology, "internet").unwrap();
        assert!(!paths.is_reachable("admin"));
        assert!(paths.path_to("admin").is_none());
        assert_eq!(paths.cost_to("internet"), Some(0.0));
        assert_eq!(paths.source(), "internet");
    }

    #[test]
    fn test_source_without_outgoing_connections() {
        let mut topology = Topology::new();
        topology.add_asset(asset("internet", AssetCategory::Boundary, &[])).unwrap();
        topology.add_asset(asset("db", AssetCategory::Database, &[9.0])).unwrap();
        topology.add_connection("db", "internet").unwrap();
        topology.recompute_costs(&RiskModel::new());

        for strategy in [AnalysisStrategy::Dijkstra, AnalysisStrategy::ExhaustiveDfs] {
            let result = AttackPathAnalyzer::new().analyze(&topology, strategy).unwrap();
            assert_eq!(result.outcome, AnalysisOutcome::Unreachable);
            assert!(result.path.is_empty());
            assert_eq!(result.total_cost, 0.0);
        }
    }

    #[test]
    fn test_single_boundary_asset() {
        let mut topology = Topology::new();
        topology.add_asset(asset("internet", AssetCategory::Boundary, &[])).unwrap();

        let analyzer = AttackPathAnalyzer::new();
        for strategy in [AnalysisStrategy::Dijkstra, AnalysisStrategy::ExhaustiveDfs] {
            let result = analyzer.run(&mut topology, strategy).unwrap();
            assert!(!result.is_found());
            assert!(result.path.is_empty());
            assert!(result.ranked_paths.is_empty());
        }
    }

    #[test]
    fn test_missing_source_reported() {
        let mut topology = Topology::new();
        topology.add_asset(asset("web", AssetCategory::Server, &[9.0])).unwrap();
        topology.recompute_costs(&RiskModel::new());

        let result = AttackPathAnalyzer::new()
            .analyze(&topology, AnalysisStrategy::Dijkstra)
            .unwrap();
        assert_eq!(result.outcome, AnalysisOutcome::NoSource);
        assert!(result.source.is_none());
        assert!(result.path.is_empty());
    }

    #[test]
    fn test_prefers_riskier_route_over_fewer_hops() {
        let mut topology = Topology::new();
        topology.add_asset(asset("internet", AssetCategory::Boundary, &[])).unwrap();
        topology.add_asset(asset("hardened", AssetCategory::Server, &[1.0])).unwrap();
        topology.add_asset(asset("weak-a", AssetCategory::Iot, &[9.5])).unwrap();
        topology.add_asset(asset("weak-b", AssetCategory::Router, &[9.5])).unwrap();
        topology.add_asset(asset("vault", AssetCategory::Database, &[9.9])).unwrap();
        topology.add_connection("internet", "hardened").unwrap();
        topology.add_connection("hardened", "vault").unwrap();
        topology.add_connection("internet", "weak-a").unwrap();
        topology.add_connection("weak-a", "weak-b").unwrap();
        topology.add_connection("weak-b", "vault").unwrap();
        topology.recompute_costs(&RiskModel::new());

        let result = AttackPathAnalyzer::new()
            .analyze(&topology, AnalysisStrategy::Dijkstra)
            .unwrap();
        assert_eq!(result.path, vec!["internet", "weak-a", "weak-b", "vault"]);
    }

    #[test]
    fn test_exhaustive_ranks_all_paths() {
        let topology = reference_topology();
        let result = AttackPathAnalyzer::new()
            .analyze(&topology, AnalysisStrategy::ExhaustiveDfs)
            .unwrap();

        // internet->web and internet->web->db; admin is unreachable
        assert_eq!(result.ranked_paths.len(), 2);
        assert!(result
            .ranked_paths
            .windows(2)
            .all(|w| w[0].cost <= w[1].cost));
        assert_eq!(result.path, result.ranked_paths[0].path);
        assert_eq!(result.path, vec!["internet", "web"]);
        assert_eq!(result.total_cost, result.ranked_paths[0].cost);
    }

    #[test]
    fn test_strategies_agree_on_acyclic_graph() {
        let mut topology = Topology::new();
        topology.add_asset(asset("internet", AssetCategory::Boundary, &[])).unwrap();
        topology.add_asset(asset("fw", AssetCategory::Firewall, &[6.8])).unwrap();
        topology.add_asset(asset("dmz", AssetCategory::Server, &[9.8, 7.5])).unwrap();
        topology.add_asset(asset("app", AssetCategory::Server, &[4.0])).unwrap();
        topology.add_asset(asset("db", AssetCategory::Database, &[8.9, 7.1])).unwrap();
        topology.add_connection("internet", "fw").unwrap();
        topology.add_connection("fw", "dmz").unwrap();
        topology.add_connection("fw", "app").unwrap();
        topology.add_connection("dmz", "db").unwrap();
        topology.add_connection("app", "db").unwrap();
        topology.add_connection("internet", "app").unwrap();
        topology.recompute_costs(&RiskModel::new());

        let shortest = least_cost(&topology, "internet").unwrap();
        let enumeration =
            enumerate_paths(&topology, "internet", EnumerationLimits::default()).unwrap();

        for target in ["fw", "dmz", "app", "db"] {
            let dijkstra = shortest.cost_to(target).unwrap();
            let dfs = enumeration.best_to(target).unwrap().cost;
            assert!((dijkstra - dfs).abs() < 1e-9, "mismatch for {}", target);
        }
        assert_eq!(enumeration.paths_to("db").count(), 3);
    }

    #[test]
    fn test_enumeration_terminates_on_cycles() {
        let mut topology = Topology::new();
        topology.add_asset(asset("internet", AssetCategory::Boundary, &[])).unwrap();
        topology.add_asset(asset("a", AssetCategory::Server, &[5.0])).unwrap();
        topology.add_asset(asset("b", AssetCategory::Server, &[6.0])).unwrap();
        topology.add_connection("internet", "a").unwrap();
        topology.add_connection("a", "b").unwrap();
        topology.add_connection("b", "a").unwrap();
        topology.recompute_costs(&RiskModel::new());

        let enumeration =
            enumerate_paths(&topology, "internet", EnumerationLimits::default()).unwrap();
        assert_eq!(enumeration.paths.len(), 2);
        for ranked in &enumeration.paths {
            let mut seen = ranked.path.clone();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), ranked.path.len());
        }
    }

    #[test]
    fn test_enumeration_limits() {
        let topology = reference_topology();
        let err = enumerate_paths(
            &topology,
            "internet",
            EnumerationLimits {
                max_assets: 3,
                ..EnumerationLimits::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::ResourceLimitExceeded(_)));

        let capped = enumerate_paths(
            &topology,
            "internet",
            EnumerationLimits {
                max_assets: 16,
                max_paths: 1,
            },
        )
        .unwrap();
        assert_eq!(capped.paths.len(), 1);
        assert!(capped.truncated);
    }

    #[test]
    fn test_exact_budget_is_not_truncated() {
        let mut topology = Topology::new();
        topology.add_asset(asset("internet", AssetCategory::Boundary, &[])).unwrap();
        topology.add_asset(asset("web", AssetCategory::Server, &[7.0])).unwrap();
        topology.add_asset(asset("isolated", AssetCategory::Database, &[9.0])).unwrap();
        topology.add_connection("internet", "web").unwrap();
        topology.recompute_costs(&RiskModel::new());

        let enumeration = enumerate_paths(
            &topology,
            "internet",
            EnumerationLimits {
                max_assets: 16,
                max_paths: 1,
            },
        )
        .unwrap();
        assert_eq!(enumeration.paths.len(), 1);
        assert!(!enumeration.truncated);
    }

    #[test]
    fn test_default_budget_bounds_dense_graph() {
        // 1 boundary + 8 fully connected assets: 109,600 simple paths
        let mut topology = Topology::new();
        topology.add_asset(asset("internet", AssetCategory::Boundary, &[])).unwrap();
        let keys: Vec<String> = (0..8).map(|i| format!("host-{}", i)).collect();
        for key in &keys {
            topology.add_asset(asset(key, AssetCategory::Server, &[5.0])).unwrap();
            topology.add_connection("internet", key).unwrap();
        }
        for from in &keys {
            for to in &keys {
                if from != to {
                    topology.add_connection(from, to).unwrap();
                }
            }
        }
        topology.recompute_costs(&RiskModel::new());

        let limits = EnumerationLimits::default();
        let enumeration = enumerate_paths(&topology, "internet", limits).unwrap();
        assert!(enumeration.truncated);
        assert_eq!(enumeration.paths.len(), limits.max_paths);
        assert!(enumeration.paths.windows(2).all(|w| w[0].cost <= w[1].cost));
    }

    #[test]
    fn test_check_rejects_oversized_exhaustive_run() {
        let topology = reference_topology();
        let analyzer = AttackPathAnalyzer::new().with_limits(EnumerationLimits {
            max_assets: 2,
            ..EnumerationLimits::default()
        });
        assert!(analyzer.check(&topology, AnalysisStrategy::Dijkstra).is_ok());
        assert!(matches!(
            analyzer.check(&topology, AnalysisStrategy::ExhaustiveDfs),
            Err(Error::ResourceLimitExceeded(_))
        ));
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let mut topology = reference_topology();
        let analyzer = AttackPathAnalyzer::new();
        for strategy in [AnalysisStrategy::Dijkstra, AnalysisStrategy::ExhaustiveDfs] {
            let first = analyzer.run(&mut topology, strategy).unwrap();
            let second = analyzer.run(&mut topology, strategy).unwrap();
            assert_eq!(first.path, second.path);
            assert_eq!(first.total_cost, second.total_cost);
            assert_eq!(first.target, second.target);
            assert_eq!(first.ranked_paths, second.ranked_paths);
        }
    }

    #[test]
    fn test_run_marks_critical_path() {
        let mut topology = reference_topology();
        AttackPathAnalyzer::new()
            .run(&mut topology, AnalysisStrategy::Dijkstra)
            .unwrap();
        assert_eq!(
            topology.critical_connections(),
            vec![("internet", "web"), ("web", "db")]
        );
        assert!(!topology.connection("admin", "web").unwrap().on_critical_path);
    }

    #[test]
    fn test_from_config() {
        let config = AnalysisConfig {
            cost_floor: 0.5,
            max_enumeration_assets: 2,
            ..AnalysisConfig::default()
        };
        let analyzer = AttackPathAnalyzer::from_config(&config);
        assert_eq!(analyzer.risk_model().floor, 0.5);

        let topology = reference_topology();
        assert!(analyzer
            .analyze(&topology, AnalysisStrategy::ExhaustiveDfs)
            .is_err());
    }
}
