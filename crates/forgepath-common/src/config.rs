//! Configuration management for ForgePath components

use forgepath_core::{Error, Result, DEFAULT_COST_FLOOR, DEFAULT_MISSING_ENDPOINT_COST, MAX_SEVERITY};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Path analysis settings
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Posture simulation settings
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Create a configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Merge with environment variables (FORGEPATH_ prefix)
    pub fn merge_env(mut self) -> Self {
        if let Ok(val) = std::env::var("FORGEPATH_STRATEGY") {
            self.analysis.strategy = val;
        }
        if let Ok(val) = std::env::var("FORGEPATH_SEED") {
            if let Ok(seed) = val.parse() {
                self.simulation.seed = Some(seed);
            }
        }

        // Logging
        if let Ok(val) = std::env::var("FORGEPATH_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("FORGEPATH_LOG_FORMAT") {
            self.logging.format = val;
        }

        self
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        self.analysis.validate()?;
        self.simulation.validate()
    }
}

fn invalid(key: &str, message: &str) -> Error {
    Error::InvalidConfig {
        key: key.to_string(),
        message: message.to_string(),
    }
}

/// Path analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Default strategy (dijkstra, exhaustive-dfs)
    #[serde(default = "default_strategy")]
    pub strategy: String,

    /// Minimum traversal cost of any connection
    #[serde(default = "default_cost_floor")]
    pub cost_floor: f64,

    /// Cost used for connections with a missing endpoint
    #[serde(default = "default_missing_endpoint_cost")]
    pub missing_endpoint_cost: f64,

    /// Largest topology the exhaustive enumeration will accept
    #[serde(default = "default_max_enumeration_assets")]
    pub max_enumeration_assets: usize,

    /// Stop enumerating after this many paths
    #[serde(default = "default_max_enumeration_paths")]
    pub max_enumeration_paths: usize,
}

fn default_strategy() -> String {
    String::from("dijkstra")
}

fn default_cost_floor() -> f64 {
    DEFAULT_COST_FLOOR
}

fn default_missing_endpoint_cost() -> f64 {
    DEFAULT_MISSING_ENDPOINT_COST
}

fn default_max_enumeration_assets() -> usize {
    16
}

fn default_max_enumeration_paths() -> usize {
    10_000
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            cost_floor: DEFAULT_COST_FLOOR,
            missing_endpoint_cost: DEFAULT_MISSING_ENDPOINT_COST,
            max_enumeration_assets: 16,
            max_enumeration_paths: default_max_enumeration_paths(),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.cost_floor > 0.0 && self.cost_floor < MAX_SEVERITY) {
            return Err(invalid("analysis.cost_floor", "must be within (0, 10)"));
        }
        if self.missing_endpoint_cost < self.cost_floor {
            return Err(invalid(
                "analysis.missing_endpoint_cost",
                "must not be below the cost floor",
            ));
        }
        if self.max_enumeration_assets == 0 {
            return Err(invalid("analysis.max_enumeration_assets", "must be at least 1"));
        }
        if self.max_enumeration_paths == 0 {
            return Err(invalid("analysis.max_enumeration_paths", "must be at least 1"));
        }
        Ok(())
    }
}

/// Posture simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Remediation drops records at or above this severity
    #[serde(default = "default_remediation_threshold")]
    pub remediation_threshold: f64,

    /// Lower bound of a newly disclosed vulnerability's severity
    #[serde(default = "default_disclosure_min")]
    pub disclosure_min_severity: f64,

    /// Upper bound of a newly disclosed vulnerability's severity
    #[serde(default = "default_disclosure_max")]
    pub disclosure_max_severity: f64,

    /// Severity of the synthetic record attached to a failed firewall
    #[serde(default = "default_control_failure_severity")]
    pub control_failure_severity: f64,

    /// Cost multiplier applied to every connection when no firewall exists
    #[serde(default = "default_control_failure_factor")]
    pub control_failure_cost_factor: f64,

    /// Seed for reproducible asset selection
    pub seed: Option<u64>,
}

fn default_remediation_threshold() -> f64 {
    7.0
}

fn default_disclosure_min() -> f64 {
    8.5
}

fn default_disclosure_max() -> f64 {
    10.0
}

fn default_control_failure_severity() -> f64 {
    9.5
}

fn default_control_failure_factor() -> f64 {
    0.5
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            remediation_threshold: 7.0,
            disclosure_min_severity: 8.5,
            disclosure_max_severity: 10.0,
            control_failure_severity: 9.5,
            control_failure_cost_factor: 0.5,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        let in_scale = |v: f64| (0.0..=MAX_SEVERITY).contains(&v);
        if !in_scale(self.remediation_threshold) {
            return Err(invalid("simulation.remediation_threshold", "must be within 0-10"));
        }
        if !in_scale(self.control_failure_severity) {
            return Err(invalid("simulation.control_failure_severity", "must be within 0-10"));
        }
        if !(in_scale(self.disclosure_min_severity)
            && in_scale(self.disclosure_max_severity)
            && self.disclosure_min_severity <= self.disclosure_max_severity)
        {
            return Err(invalid(
                "simulation.disclosure_min_severity",
                "disclosure range must be ordered and within 0-10",
            ));
        }
        if !(self.control_failure_cost_factor > 0.0 && self.control_failure_cost_factor <= 1.0) {
            return Err(invalid("simulation.control_failure_cost_factor", "must be within (0, 1]"));
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (pretty, json, compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    String::from("info")
}

fn default_log_format() -> String {
    String::from("pretty")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("pretty"),
        }
    }
}

/// Builder for constructing Config
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn strategy(mut self, strategy: impl Into<String>) -> Self {
        self.config.analysis.strategy = strategy.into();
        self
    }

    pub fn cost_floor(mut self, floor: f64) -> Self {
        self.config.analysis.cost_floor = floor;
        self
    }

    pub fn max_enumeration_assets(mut self, max: usize) -> Self {
        self.config.analysis.max_enumeration_assets = max;
        self
    }

    pub fn max_enumeration_paths(mut self, max: usize) -> Self {
        self.config.analysis.max_enumeration_paths = max;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.simulation.seed = Some(seed);
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
