use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{RecordId, RiskAnalysis};

/// Untyped response body: whatever JSON object the service returned.
pub type RawAnalysis = Map<String, Value>;

/// Response schema of the ML scoring service.
///
/// All four documented fields are required. Anything else the service sends
/// is kept in `extra` rather than rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlResponse {
    pub asset: String,
    pub risk_level: String,
    pub risk_score: f64,
    pub recommendation: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MlResponse {
    /// Validate an already decoded raw mapping against the schema.
    pub fn from_raw(raw: RawAnalysis) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(raw))
    }

    /// The record persisted for this scoring event.
    pub fn into_risk_analysis(self, asset_id: RecordId) -> RiskAnalysis {
        let description = format!("{}: {}", self.risk_level, self.recommendation);
        RiskAnalysis::new(asset_id, self.risk_score, description)
    }
}
