use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Record, RecordId};

/// Outcome of one ML scoring event for an asset.
///
/// Written once and never updated, so fields are private with getters only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAnalysis {
    id: RecordId,
    asset_id: RecordId,
    risk_score: f64,
    description: String,
    created_at: DateTime<Utc>,
}

impl RiskAnalysis {
    /// New, not yet stored analysis (`id` 0) stamped with the current time.
    pub fn new(asset_id: RecordId, risk_score: f64, description: impl Into<String>) -> Self {
        Self::with_id(0, asset_id, risk_score, description, Utc::now())
    }

    /// Rebuild a stored analysis.
    pub fn with_id(
        id: RecordId,
        asset_id: RecordId,
        risk_score: f64,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            asset_id,
            risk_score,
            description: description.into(),
            created_at,
        }
    }

    pub fn asset_id(&self) -> RecordId {
        self.asset_id
    }

    pub fn risk_score(&self) -> f64 {
        self.risk_score
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Record for RiskAnalysis {
    const TABLE: &'static str = "risk_analyses";
    const COLUMNS: &'static [&'static str] =
        &["id", "asset_id", "risk_score", "description", "created_at"];

    fn id(&self) -> RecordId {
        self.id
    }
}
