//! Data records
//!
//! Plain serde records for assets, threats, the threat library, ML risk
//! analyses and manual risk assessments. Storage lives outside this crate; [`Record`] only describes
//! how each record maps onto a relational table.

pub mod asset;
pub mod risk_analysis;
pub mod risk_assessment;
pub mod threat;
pub mod threat_library;

pub use asset::Asset;
pub use risk_analysis::RiskAnalysis;
pub use risk_assessment::{AssessmentMethod, RiskAssessment, RiskLevel};
pub use threat::Threat;
pub use threat_library::{import_attack_patterns, AttackPattern, Locale, ThreatLibrary};

/// Primary key type shared by every table.
pub type RecordId = u64;

/// Table mapping of a stored record.
///
/// Names follow the usual ORM defaults: snake_case plural table, snake_case
/// columns, primary key `id` listed first.
pub trait Record {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> RecordId;

    fn primary_key() -> &'static str {
        Self::COLUMNS[0]
    }
}
