//! Topology store - assets, directed connections and their derived costs
//!
//! The topology is the single mutable source of truth. Structural invariants
//! (unique asset keys, no duplicate or self-referencing connections, endpoints
//! that exist) are enforced here. Connection costs are derived data: call
//! [`Topology::recompute_costs`] after any vulnerability mutation before the
//! next analysis.

use crate::asset::{Asset, AssetCategory};
use crate::error::{Error, Result};
use crate::risk::RiskModel;
use crate::vulnerability::VulnerabilityRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Directed edge between two assets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
    /// Derived traversal cost (always >= the risk model floor once computed)
    #[serde(default)]
    pub cost: f64,
    /// Multiplier applied on top of the severity-derived cost. Lowered when a
    /// perimeter control fails.
    #[serde(default = "default_exposure_factor")]
    pub exposure_factor: f64,
    /// Set for connections on the most recently selected attack path
    #[serde(skip)]
    pub on_critical_path: bool,
}

fn default_exposure_factor() -> f64 {
    1.0
}

impl Connection {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            cost: RiskModel::new().missing_endpoint_cost,
            exposure_factor: default_exposure_factor(),
            on_critical_path: false,
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// Attack surface graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "RawTopology")]
pub struct Topology {
    assets: Vec<Asset>,
    connections: Vec<Connection>,
    #[serde(skip)]
    costs_stale: bool,
}

/// Serialized form, replayed through the store on load
#[derive(Deserialize)]
struct RawTopology {
    #[serde(default)]
    assets: Vec<Asset>,
    #[serde(default)]
    connections: Vec<Connection>,
}

impl TryFrom<RawTopology> for Topology {
    type Error = Error;

    /// Unique keys, valid severities and unique ordered pairs are enforced.
    /// Loaded self-loops and dangling endpoints are kept; traversal and cost
    /// recomputation tolerate both.
    fn try_from(raw: RawTopology) -> Result<Self> {
        let mut topology = Topology::new();
        for asset in raw.assets {
            topology.add_asset(asset)?;
        }
        for connection in raw.connections {
            if topology.connection(&connection.from, &connection.to).is_some() {
                return Err(Error::DuplicateConnection {
                    from: connection.from,
                    to: connection.to,
                });
            }
            topology.connections.push(connection);
        }
        topology.costs_stale = true;
        Ok(topology)
    }
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    // === Read access ===

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn asset(&self, key: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.asset(key).is_some()
    }

    /// Position of an asset in insertion order
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.assets.iter().position(|a| a.key == key)
    }

    pub fn connection(&self, from: &str, to: &str) -> Option<&Connection> {
        self.connections
            .iter()
            .find(|c| c.from == from && c.to == to)
    }

    /// Outgoing connections of an asset, self-loops excluded
    pub fn outgoing<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections
            .iter()
            .filter(move |c| c.from == key && !c.is_self_loop())
    }

    /// The attacker's entry point: the first boundary-category asset
    pub fn source(&self) -> Option<&Asset> {
        self.assets.iter().find(|a| a.category.is_boundary())
    }

    pub fn first_of_category(&self, category: AssetCategory) -> Option<&Asset> {
        self.assets.iter().find(|a| a.category == category)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Whether a mutation happened since the last cost recomputation
    pub fn costs_stale(&self) -> bool {
        self.costs_stale
    }

    /// Keys of the connections currently flagged as part of the critical path
    pub fn critical_connections(&self) -> Vec<(&str, &str)> {
        self.connections
            .iter()
            .filter(|c| c.on_critical_path)
            .map(|c| (c.from.as_str(), c.to.as_str()))
            .collect()
    }

    // === Structural mutation ===

    /// Insert an asset; keys must be unique and severities within 0-10
    pub fn add_asset(&mut self, asset: Asset) -> Result<()> {
        if self.contains(&asset.key) {
            return Err(Error::DuplicateAsset { key: asset.key });
        }
        for record in &asset.vulnerabilities {
            record.validate()?;
        }
        debug!("Adding asset {} ({})", asset.key, asset.category);
        self.assets.push(asset);
        self.costs_stale = true;
        Ok(())
    }

    /// Remove an asset together with every connection touching it
    pub fn remove_asset(&mut self, key: &str) -> Result<Asset> {
        let index = self.index_of(key).ok_or_else(|| Error::UnknownAsset {
            key: key.to_string(),
        })?;
        let asset = self.assets.remove(index);
        let before = self.connections.len();
        self.connections.retain(|c| c.from != key && c.to != key);
        debug!(
            "Removed asset {} and {} incident connections",
            key,
            before - self.connections.len()
        );
        self.costs_stale = true;
        Ok(asset)
    }

    /// Add a directed connection between two existing assets
    pub fn add_connection(&mut self, from: &str, to: &str) -> Result<()> {
        if from == to {
            return Err(Error::SelfLoop {
                key: from.to_string(),
            });
        }
        for key in [from, to] {
            if !self.contains(key) {
                return Err(Error::UnknownAsset {
                    key: key.to_string(),
                });
            }
        }
        if self.connection(from, to).is_some() {
            return Err(Error::DuplicateConnection {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        self.connections.push(Connection::new(from, to));
        self.costs_stale = true;
        Ok(())
    }

    pub fn attach_vulnerability(&mut self, key: &str, record: VulnerabilityRecord) -> Result<()> {
        record.validate()?;
        let asset = self.asset_mut(key)?;
        debug!(
            "Attaching {} (severity {:.1}) to {}",
            record.id, record.severity, asset.key
        );
        asset.vulnerabilities.push(record);
        self.costs_stale = true;
        Ok(())
    }

    /// Drop every record matching the predicate; returns what was removed
    pub fn remove_vulnerabilities<F>(&mut self, key: &str, predicate: F) -> Result<Vec<VulnerabilityRecord>>
    where
        F: Fn(&VulnerabilityRecord) -> bool,
    {
        let asset = self.asset_mut(key)?;
        let (removed, kept): (Vec<_>, Vec<_>) = asset
            .vulnerabilities
            .drain(..)
            .partition(|record| predicate(record));
        asset.vulnerabilities = kept;
        if !removed.is_empty() {
            self.costs_stale = true;
        }
        Ok(removed)
    }

    fn asset_mut(&mut self, key: &str) -> Result<&mut Asset> {
        self.assets
            .iter_mut()
            .find(|a| a.key == key)
            .ok_or_else(|| Error::UnknownAsset {
                key: key.to_string(),
            })
    }

    // === Derived state ===

    /// Re-derive every connection cost from current asset severities.
    ///
    /// Connections whose endpoints are missing receive the model's maximal
    /// default cost. Returns the number of such connections.
    pub fn recompute_costs(&mut self, model: &RiskModel) -> usize {
        let mut unresolved = 0;
        let severities: Vec<(String, f64)> = self
            .assets
            .iter()
            .map(|a| (a.key.clone(), a.aggregate_severity()))
            .collect();
        let lookup = |key: &str| {
            severities
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, s)| *s)
        };

        for connection in &mut self.connections {
            match (lookup(&connection.from), lookup(&connection.to)) {
                (Some(from), Some(to)) => {
                    let base = model.connection_cost(from, to);
                    connection.cost = model.floor_clamp(base * connection.exposure_factor);
                }
                _ => {
                    warn!(
                        "Connection {} -> {} references a missing asset, using default cost {}",
                        connection.from, connection.to, model.missing_endpoint_cost
                    );
                    connection.cost = model.missing_endpoint_cost;
                    unresolved += 1;
                }
            }
        }

        self.costs_stale = false;
        unresolved
    }

    /// Scale every connection's exposure factor (and current cost), floor-clamped
    pub fn scale_exposure(&mut self, factor: f64, model: &RiskModel) {
        for connection in &mut self.connections {
            connection.exposure_factor *= factor;
            connection.cost = model.floor_clamp(connection.cost * factor);
        }
    }

    /// Flag exactly the connections joining consecutive path entries
    pub fn mark_critical_path(&mut self, path: &[String]) {
        for connection in &mut self.connections {
            connection.on_critical_path = false;
        }
        for pair in path.windows(2) {
            if let Some(connection) = self
                .connections
                .iter_mut()
                .find(|c| c.from == pair[0] && c.to == pair[1])
            {
                connection.on_critical_path = true;
            }
        }
    }
}
