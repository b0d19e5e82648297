//! Built-in scenario topologies

use crate::catalog::{resolved_asset, VulnerabilitySource};
use forgepath_core::{Asset, AssetCategory, Error, Result, RiskModel, Topology};
use std::str::FromStr;
use tracing::debug;

/// Named example topology
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Internet -> web server -> database, with an admin workstation reaching the web server
    #[default]
    Default,
    /// Three-tier web / app / database chain
    Simple,
    /// Firewall-fronted DMZ leading to internal services
    Dmz,
    /// Router fanning out to IoT devices that all reach a backend server
    Iot,
}

impl Preset {
    pub fn all() -> [Preset; 4] {
        [Preset::Default, Preset::Simple, Preset::Dmz, Preset::Iot]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Default => "default",
            Preset::Simple => "simple",
            Preset::Dmz => "dmz",
            Preset::Iot => "iot",
        }
    }

    /// Build the topology with vulnerabilities from `source` and costs computed
    pub fn build(&self, source: &dyn VulnerabilitySource) -> Result<Topology> {
        self.build_with_model(source, &RiskModel::default())
    }

    pub fn build_with_model(&self, source: &dyn VulnerabilitySource, model: &RiskModel) -> Result<Topology> {
        use AssetCategory::*;

        let mut topology = Topology::new();
        let (assets, connections): (Vec<Asset>, Vec<(&str, &str)>) = match self {
            Preset::Default => (
                vec![
                    resolved_asset(source, "internet", Boundary, "Internet"),
                    with_attributes(
                        resolved_asset(source, "web-server", Server, "Web Server"),
                        "Linux",
                        &["Apache", "PHP"],
                        &[80, 443],
                    ),
                    with_attributes(
                        resolved_asset(source, "db-server", Database, "Database Server"),
                        "Linux",
                        &["MySQL"],
                        &[3306],
                    ),
                    with_attributes(
                        resolved_asset(source, "admin-pc", Workstation, "Admin Workstation"),
                        "Windows",
                        &["RDP"],
                        &[3389],
                    ),
                ],
                vec![
                    ("internet", "web-server"),
                    ("web-server", "db-server"),
                    ("admin-pc", "web-server"),
                ],
            ),
            Preset::Simple => (
                vec![
                    resolved_asset(source, "internet", Boundary, "Internet"),
                    resolved_asset(source, "web", Server, "Web Tier"),
                    resolved_asset(source, "app", Server, "Application Tier"),
                    resolved_asset(source, "db", Database, "Database Tier"),
                ],
                vec![("internet", "web"), ("web", "app"), ("app", "db")],
            ),
            Preset::Dmz => (
                vec![
                    resolved_asset(source, "internet", Boundary, "Internet"),
                    resolved_asset(source, "firewall", Firewall, "Perimeter Firewall"),
                    resolved_asset(source, "dmz-web", Server, "DMZ Web"),
                    resolved_asset(source, "internal-web", Server, "Internal Web"),
                    resolved_asset(source, "db", Database, "Database"),
                ],
                vec![
                    ("internet", "firewall"),
                    ("firewall", "dmz-web"),
                    ("dmz-web", "internal-web"),
                    ("internal-web", "db"),
                ],
            ),
            Preset::Iot => (
                vec![
                    resolved_asset(source, "internet", Boundary, "Internet"),
                    resolved_asset(source, "router", Router, "Router"),
                    resolved_asset(source, "iot1", Iot, "IoT Camera 1"),
                    resolved_asset(source, "iot2", Iot, "IoT Camera 2"),
                    resolved_asset(source, "iot3", Iot, "IoT Sensor"),
                    resolved_asset(source, "server", Server, "IoT Server"),
                ],
                vec![
                    ("internet", "router"),
                    ("router", "iot1"),
                    ("router", "iot2"),
                    ("router", "iot3"),
                    ("iot1", "server"),
                    ("iot2", "server"),
                    ("iot3", "server"),
                ],
            ),
        };

        for asset in assets {
            topology.add_asset(asset)?;
        }
        for (from, to) in connections {
            topology.add_connection(from, to)?;
        }
        topology.recompute_costs(model);

        debug!(
            "Loaded preset {} ({} assets, {} connections)",
            self.as_str(),
            topology.len(),
            topology.connections().len()
        );
        Ok(topology)
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(Preset::Default),
            "simple" => Ok(Preset::Simple),
            "dmz" => Ok(Preset::Dmz),
            "iot" => Ok(Preset::Iot),
            other => Err(Error::UnknownPreset(other.to_string())),
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn with_attributes(mut asset: Asset, os: &str, services: &[&str], ports: &[u16]) -> Asset {
    asset.attributes.os = Some(os.to_string());
    asset.attributes.services = services.iter().map(|s| s.to_string()).collect();
    asset.attributes.ports = ports.to_vec();
    asset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisStrategy, AttackPathAnalyzer};
    use crate::catalog::StaticCatalog;

    #[test]
    fn test_all_presets_build() {
        let catalog = StaticCatalog::builtin();
        for preset in Preset::all() {
            let topology = preset.build(&catalog).unwrap();
            assert!(topology.source().is_some(), "{} has no source", preset);
            assert!(!topology.costs_stale());
            assert!(topology.connections().iter().all(|c| c.cost >= 0.1));
        }
    }

    #[test]
    fn test_default_preset_costs() {
        let topology = Preset::Default.build(&StaticCatalog::builtin()).unwrap();
        let cost = topology.connection("internet", "web-server").unwrap().cost;
        assert!((cost - (10.0 - (23.5 / 3.0) / 2.0)).abs() < 1e-9);
        let web = topology.asset("web-server").unwrap();
        assert_eq!(web.attributes.ports, vec![80, 443]);
    }

    #[test]
    fn test_presets_analyze() {
        let catalog = StaticCatalog::builtin();
        let analyzer = AttackPathAnalyzer::new();

        let mut dmz = Preset::Dmz.build(&catalog).unwrap();
        let result = analyzer.run(&mut dmz, AnalysisStrategy::Dijkstra).unwrap();
        assert_eq!(result.target.as_deref(), Some("db"));
        assert_eq!(
            result.path,
            vec!["internet", "firewall", "dmz-web", "internal-web", "db"]
        );

        // IoT devices average 8.2, above the backend server's 7.83
        let mut iot = Preset::Iot.build(&catalog).unwrap();
        let result = analyzer.run(&mut iot, AnalysisStrategy::Dijkstra).unwrap();
        assert_eq!(result.target.as_deref(), Some("iot1"));
        assert_eq!(result.path, vec!["internet", "router", "iot1"]);
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("DMZ".parse::<Preset>().unwrap(), Preset::Dmz);
        assert!("mesh".parse::<Preset>().is_err());
    }
}
