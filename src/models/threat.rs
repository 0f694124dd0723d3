use serde::{Deserialize, Serialize};

use super::{Record, RecordId};

/// A security threat recorded against an asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threat {
    pub id: RecordId,
    pub name: String,
    pub category: String,
    pub severity: String,
    /// The asset this threat applies to
    pub asset_id: RecordId,
}

impl Record for Threat {
    const TABLE: &'static str = "threats";
    const COLUMNS: &'static [&'static str] = &["id", "name", "category", "severity", "asset_id"];

    fn id(&self) -> RecordId {
        self.id
    }
}
