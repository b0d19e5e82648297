//! Error types for ForgePath

use thiserror::Error;

/// Result type alias using ForgePath Error
pub type Result<T> = std::result::Result<T, Error>;

/// ForgePath error types
#[derive(Error, Debug)]
pub enum Error {
    // === Topology Errors ===
    #[error("Asset already exists: {key}")]
    DuplicateAsset { key: String },

    #[error("Unknown asset: {key}")]
    UnknownAsset { key: String },

    #[error("Connection already exists: {from} -> {to}")]
    DuplicateConnection { from: String, to: String },

    #[error("Self-loop connections are not allowed: {key}")]
    SelfLoop { key: String },

    // === Vulnerability Errors ===
    #[error("Invalid severity {score} for {vuln_id}: must be within 0.0-10.0")]
    InvalidSeverity { vuln_id: String, score: f64 },

    // === Analysis Errors ===
    #[error("Unknown analysis strategy: {0}")]
    UnknownStrategy(String),

    #[error("Unknown simulation scenario: {0}")]
    UnknownScenario(String),

    #[error("Unknown topology preset: {0}")]
    UnknownPreset(String),

    #[error("Unknown asset category: {0}")]
    UnknownCategory(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidConfig { key: String, message: String },

    // === Resource Errors ===
    #[error("Resource limit exceeded: {0}")]
    ResourceLimitExceeded(String),
}

impl Error {
    /// Check if this error is fatal (should stop the run)
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Configuration(_) | Error::InvalidConfig { .. })
    }

    /// Get an error code for logging
    pub fn code(&self) -> &'static str {
        match self {
            Error::DuplicateAsset { .. } => "DUPLICATE_ASSET",
            Error::UnknownAsset { .. } => "UNKNOWN_ASSET",
            Error::DuplicateConnection { .. } => "DUPLICATE_CONNECTION",
            Error::SelfLoop { .. } => "SELF_LOOP",
            Error::InvalidSeverity { .. } => "INVALID_SEVERITY",
            Error::UnknownStrategy(_) => "UNKNOWN_STRATEGY",
            Error::UnknownScenario(_) => "UNKNOWN_SCENARIO",
            Error::UnknownPreset(_) => "UNKNOWN_PRESET",
            Error::UnknownCategory(_) => "UNKNOWN_CATEGORY",
            Error::Configuration(_) => "CONFIG_ERROR",
            Error::InvalidConfig { .. } => "INVALID_CONFIG",
            Error::ResourceLimitExceeded(_) => "RESOURCE_LIMIT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = Error::DuplicateConnection {
            from: "web".into(),
            to: "db".into(),
        };
        assert_eq!(err.code(), "DUPLICATE_CONNECTION");
        assert_eq!(err.to_string(), "Connection already exists: web -> db");
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_config_errors_are_fatal() {
        let err = Error::InvalidConfig {
            key: "analysis.cost_floor".into(),
            message: "must be positive".into(),
        };
        assert!(err.is_fatal());
        assert_eq!(err.code(), "INVALID_CONFIG");
    }
}
