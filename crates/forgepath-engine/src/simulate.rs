//! Posture simulation - "what-if" mutations followed by re-analysis
//!
//! Each scenario mutates vulnerability records or connection exposure, after
//! which costs are recomputed and the attack path is analyzed again. Asset
//! selection is uniformly random; seed the simulator (or call the `*_on`
//! variants with an explicit asset) for reproducible runs.

use crate::analysis::{AnalysisResult, AnalysisStrategy, AttackPathAnalyzer};
use forgepath_common::SimulationConfig;
use forgepath_core::{AssetCategory, Error, Result, RiskModel, Topology, VulnerabilityRecord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Simulation scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    /// A perimeter control stops working
    ControlFailure,
    /// High-severity vulnerabilities are patched on one asset
    Remediation,
    /// A new high-severity vulnerability is disclosed on one asset
    NewDisclosure,
}

impl Scenario {
    pub fn all() -> [Scenario; 3] {
        [
            Scenario::ControlFailure,
            Scenario::Remediation,
            Scenario::NewDisclosure,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::ControlFailure => "control-failure",
            Scenario::Remediation => "remediation",
            Scenario::NewDisclosure => "new-disclosure",
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "control-failure" | "firewall-off" => Ok(Scenario::ControlFailure),
            "remediation" | "patch-applied" => Ok(Scenario::Remediation),
            "new-disclosure" | "new-vulnerability" => Ok(Scenario::NewDisclosure),
            other => Err(Error::UnknownScenario(other.to_string())),
        }
    }
}

/// What a scenario changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PostureChange {
    VulnerabilityAttached {
        asset: String,
        record: VulnerabilityRecord,
    },
    VulnerabilitiesRemoved {
        asset: String,
        removed: Vec<VulnerabilityRecord>,
    },
    ExposureScaled {
        factor: f64,
        connections: usize,
    },
    /// No asset qualified for the scenario
    NoEligibleAsset,
}

/// A scenario's mutation together with the analysis that followed it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub scenario: Scenario,
    pub change: PostureChange,
    pub analysis: AnalysisResult,
}

/// Applies posture scenarios to a topology
pub struct PostureSimulator<R: Rng = StdRng> {
    settings: SimulationConfig,
    rng: R,
}

impl PostureSimulator<StdRng> {
    /// Seeded from `settings.seed` when present, otherwise from OS entropy
    pub fn new(settings: SimulationConfig) -> Result<Self> {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(settings, rng)
    }

    pub fn seeded(settings: SimulationConfig, seed: u64) -> Result<Self> {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> PostureSimulator<R> {
    /// Use a caller-supplied random source; settings are validated first
    pub fn with_rng(settings: SimulationConfig, rng: R) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings, rng })
    }

    pub fn settings(&self) -> &SimulationConfig {
        &self.settings
    }

    /// Apply a scenario, then recompute costs and re-run the analysis.
    ///
    /// The topology is left untouched when the analyzer would refuse it.
    pub fn run(
        &mut self,
        topology: &mut Topology,
        scenario: Scenario,
        analyzer: &AttackPathAnalyzer,
        strategy: AnalysisStrategy,
    ) -> Result<SimulationReport> {
        info!("Simulating scenario: {}", scenario);
        analyzer.check(topology, strategy)?;
        let change = self.apply(topology, scenario, analyzer.risk_model())?;
        let analysis = analyzer.run(topology, strategy).map_err(|e| {
            error!("Analysis after {} failed, change already applied: {:?}", scenario, change);
            e
        })?;
        Ok(SimulationReport {
            scenario,
            change,
            analysis,
        })
    }

    /// Mutate the topology for a scenario without re-analyzing
    pub fn apply(
        &mut self,
        topology: &mut Topology,
        scenario: Scenario,
        model: &RiskModel,
    ) -> Result<PostureChange> {
        match scenario {
            Scenario::ControlFailure => self.control_failure(topology, model),
            Scenario::Remediation => self.remediate(topology),
            Scenario::NewDisclosure => self.disclose(topology),
        }
    }

    /// Compromise the first firewall, or raise exposure everywhere if there is none
    pub fn control_failure(&mut self, topology: &mut Topology, model: &RiskModel) -> Result<PostureChange> {
        if let Some(firewall) = topology.first_of_category(AssetCategory::Firewall) {
            let key = firewall.key.clone();
            let record = VulnerabilityRecord::new(
                synthetic_id(),
                self.settings.control_failure_severity,
                "Firewall disabled - all traffic permitted",
            );
            topology.attach_vulnerability(&key, record.clone())?;
            warn!("Firewall {} disabled", key);
            return Ok(PostureChange::VulnerabilityAttached { asset: key, record });
        }

        let factor = self.settings.control_failure_cost_factor;
        topology.scale_exposure(factor, model);
        let connections = topology.connections().len();
        warn!(
            "No firewall present, exposure of {} connections scaled by {}",
            connections, factor
        );
        Ok(PostureChange::ExposureScaled {
            factor,
            connections,
        })
    }

    /// Patch a randomly chosen vulnerable asset
    pub fn remediate(&mut self, topology: &mut Topology) -> Result<PostureChange> {
        let candidates: Vec<String> = topology
            .assets()
            .iter()
            .filter(|a| !a.category.is_boundary() && a.is_vulnerable())
            .map(|a| a.key.clone())
            .collect();
        match self.pick(&candidates) {
            Some(key) => self.remediate_on(topology, &key),
            None => {
                warn!("No vulnerable asset available for remediation");
                Ok(PostureChange::NoEligibleAsset)
            }
        }
    }

    /// Drop every record at or above the remediation threshold from one asset
    pub fn remediate_on(&mut self, topology: &mut Topology, key: &str) -> Result<PostureChange> {
        let threshold = self.settings.remediation_threshold;
        let removed = topology.remove_vulnerabilities(key, |v| v.is_at_least(threshold))?;
        info!(
            "Patched {}: removed {} vulnerabilities with severity >= {:.1}",
            key,
            removed.len(),
            threshold
        );
        Ok(PostureChange::VulnerabilitiesRemoved {
            asset: key.to_string(),
            removed,
        })
    }

    /// Disclose a new vulnerability on a randomly chosen asset
    pub fn disclose(&mut self, topology: &mut Topology) -> Result<PostureChange> {
        let candidates: Vec<String> = topology
            .assets()
            .iter()
            .filter(|a| !a.category.is_boundary())
            .map(|a| a.key.clone())
            .collect();
        match self.pick(&candidates) {
            Some(key) => self.disclose_on(topology, &key),
            None => {
                warn!("No asset available for a new disclosure");
                Ok(PostureChange::NoEligibleAsset)
            }
        }
    }

    /// Attach a new vulnerability with a random high severity to one asset
    pub fn disclose_on(&mut self, topology: &mut Topology, key: &str) -> Result<PostureChange> {
        let severity = self.rng.gen_range(
            self.settings.disclosure_min_severity..=self.settings.disclosure_max_severity,
        );
        let record = VulnerabilityRecord::new(
            synthetic_id(),
            severity,
            "Newly disclosed critical vulnerability",
        );
        topology.attach_vulnerability(key, record.clone())?;
        warn!(
            "New vulnerability {} (severity {:.1}) disclosed on {}",
            record.id, severity, key
        );
        Ok(PostureChange::VulnerabilityAttached {
            asset: key.to_string(),
            record,
        })
    }

    fn pick(&mut self, candidates: &[String]) -> Option<String> {
        if candidates.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..candidates.len());
        Some(candidates[index].clone())
    }
}

fn synthetic_id() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("CVE-SIM-{}", id[..8].to_uppercase())
}
