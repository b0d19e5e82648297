//! Vulnerability records attached to assets

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Upper bound of the severity scale
pub const MAX_SEVERITY: f64 = 10.0;

/// A known weakness attached to an asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VulnerabilityRecord {
    /// Identifier (e.g., "CVE-2023-1234")
    pub id: String,
    /// Severity score on the 0-10 scale
    pub severity: f64,
    /// Human-readable description
    pub description: String,
}

impl VulnerabilityRecord {
    pub fn new(id: impl Into<String>, severity: f64, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            severity,
            description: description.into(),
        }
    }

    /// Reject severities that are not finite or fall outside 0-10
    pub fn validate(&self) -> Result<()> {
        if !self.severity.is_finite() || !(0.0..=MAX_SEVERITY).contains(&self.severity) {
            return Err(Error::InvalidSeverity {
                vuln_id: self.id.clone(),
                score: self.severity,
            });
        }
        Ok(())
    }

    /// Whether this record meets or exceeds the given severity
    pub fn is_at_least(&self, threshold: f64) -> bool {
        self.severity >= threshold
    }
}
