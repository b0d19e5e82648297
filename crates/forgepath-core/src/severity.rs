//! Severity bands and STRIDE threat classes

use serde::{Deserialize, Serialize};

/// Severity band derived from a 0-10 score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// No measurable weakness
    #[default]
    Info,
    /// Low severity, minimal risk
    Low,
    /// Medium severity, moderate risk
    Medium,
    /// High severity, significant risk
    High,
    /// Critical severity, immediate action required
    Critical,
}

impl Severity {
    /// Convert a CVSS-style score to a band
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 9.0 => Severity::Critical,
            s if s >= 7.0 => Severity::High,
            s if s >= 4.0 => Severity::Medium,
            s if s >= 0.1 => Severity::Low,
            _ => Severity::Info,
        }
    }

    /// Get display string
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// STRIDE threat class assigned to an asset from its aggregate severity.
///
/// Only the three classes with a severity threshold are produced; spoofing,
/// tampering and repudiation are never inferred from a score alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrideCategory {
    ElevationOfPrivilege,
    InformationDisclosure,
    DenialOfService,
}

impl StrideCategory {
    /// Classify an aggregate severity (>= 9 E, >= 7 I, >= 5 D)
    pub fn classify(aggregate_severity: f64) -> Option<Self> {
        match aggregate_severity {
            s if s >= 9.0 => Some(StrideCategory::ElevationOfPrivilege),
            s if s >= 7.0 => Some(StrideCategory::InformationDisclosure),
            s if s >= 5.0 => Some(StrideCategory::DenialOfService),
            _ => None,
        }
    }

    /// Single-letter STRIDE code
    pub fn letter(&self) -> char {
        match self {
            StrideCategory::ElevationOfPrivilege => 'E',
            StrideCategory::InformationDisclosure => 'I',
            StrideCategory::DenialOfService => 'D',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrideCategory::ElevationOfPrivilege => "Elevation of Privilege",
            StrideCategory::InformationDisclosure => "Information Disclosure",
            StrideCategory::DenialOfService => "Denial of Service",
        }
    }
}

impl std::fmt::Display for StrideCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_to_severity() {
        assert_eq!(Severity::from_score(9.8), Severity::Critical);
        assert_eq!(Severity::from_score(7.83), Severity::High);
        assert_eq!(Severity::from_score(5.0), Severity::Medium);
        assert_eq!(Severity::from_score(2.0), Severity::Low);
        assert_eq!(Severity::from_score(0.0), Severity::Info);
    }

    #[test]
    fn test_stride_thresholds() {
        assert_eq!(
            StrideCategory::classify(9.0),
            Some(StrideCategory::ElevationOfPrivilege)
        );
        assert_eq!(
            StrideCategory::classify(8.0),
            Some(StrideCategory::InformationDisclosure)
        );
        assert_eq!(
            StrideCategory::classify(5.4),
            Some(StrideCategory::DenialOfService)
        );
        assert_eq!(StrideCategory::classify(4.99), None);
        assert_eq!(StrideCategory::classify(0.0), None);
    }

    #[test]
    fn test_stride_letters() {
        assert_eq!(StrideCategory::ElevationOfPrivilege.letter(), 'E');
        assert_eq!(StrideCategory::InformationDisclosure.letter(), 'I');
        assert_eq!(StrideCategory::DenialOfService.letter(), 'D');
    }
}
