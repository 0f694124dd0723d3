//! Manual risk assessment
//!
//! Likelihood × impact scoring on a 1-5 scale, banded into four levels with
//! canned recommendations per level.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Record, RecordId};
use crate::errors::IrmapError;

/// Lowest accepted likelihood/impact rating.
pub const MIN_RATING: u8 = 1;
/// Highest accepted likelihood/impact rating.
pub const MAX_RATING: u8 = 5;

/// Methodology the assessment was carried out under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum AssessmentMethod {
    #[serde(rename = "ISO/IEC 27005")]
    #[value(name = "iso27005")]
    Iso27005,
    #[serde(rename = "NIST SP 800-30")]
    #[value(name = "nist800-30")]
    Nist80030,
    #[serde(rename = "OCTAVE")]
    #[value(name = "octave")]
    Octave,
}

impl AssessmentMethod {
    pub fn all() -> [Self; 3] {
        [Self::Iso27005, Self::Nist80030, Self::Octave]
    }
}

impl std::fmt::Display for AssessmentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssessmentMethod::Iso27005 => write!(f, "ISO/IEC 27005"),
            AssessmentMethod::Nist80030 => write!(f, "NIST SP 800-30"),
            AssessmentMethod::Octave => write!(f, "OCTAVE"),
        }
    }
}

/// Risk band derived from the likelihood × impact score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Band a score: 15+ critical, 10+ high, 5+ medium, otherwise low.
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 15 => RiskLevel::Critical,
            s if s >= 10 => RiskLevel::High,
            s if s >= 5 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }

    pub fn recommendations(&self) -> &'static [&'static str] {
        match self {
            RiskLevel::Critical => &["Immediate remediation", "Halt the process"],
            RiskLevel::High => &["Planned remediation", "Temporary protective measures"],
            RiskLevel::Medium => &["Monitoring", "Planned measures"],
            RiskLevel::Low => &["Acceptable risk", "Periodic review"],
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
            RiskLevel::Critical => write!(f, "Critical"),
        }
    }
}

/// A scored, manually entered risk assessment of one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub id: RecordId,
    pub asset_id: RecordId,
    pub method: AssessmentMethod,
    pub threat: String,
    pub vulnerability: String,
    pub likelihood: u8,
    pub impact: u8,
    pub score: u32,
    pub level: RiskLevel,
    pub recommendations: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl RiskAssessment {
    /// Score a new assessment. Ratings outside 1-5 are rejected.
    pub fn new(
        asset_id: RecordId,
        method: AssessmentMethod,
        threat: impl Into<String>,
        vulnerability: impl Into<String>,
        likelihood: u8,
        impact: u8,
    ) -> Result<Self, IrmapError> {
        check_rating("likelihood", likelihood)?;
        check_rating("impact", impact)?;

        let score = u32::from(likelihood) * u32::from(impact);
        let level = RiskLevel::from_score(score);

        Ok(Self {
            id: 0,
            asset_id,
            method,
            threat: threat.into(),
            vulnerability: vulnerability.into(),
            likelihood,
            impact,
            score,
            level,
            recommendations: level
                .recommendations()
                .iter()
                .map(|r| r.to_string())
                .collect(),
            created_at: Utc::now(),
        })
    }
}

fn check_rating(name: &str, value: u8) -> Result<(), IrmapError> {
    if (MIN_RATING..=MAX_RATING).contains(&value) {
        Ok(())
    } else {
        Err(IrmapError::Assessment(format!(
            "{} must be between {} and {}, got {}",
            name, MIN_RATING, MAX_RATING, value
        )))
    }
}

impl Record for RiskAssessment {
    const TABLE: &'static str = "risk_assessments";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "asset_id",
        "method",
        "threat",
        "vulnerability",
        "likelihood",
        "impact",
        "score",
        "level",
        "recommendations",
        "created_at",
    ];

    fn id(&self) -> RecordId {
        self.id
    }
}
