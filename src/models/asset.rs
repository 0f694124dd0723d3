use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Record, RecordId};

/// An inventoried asset: the thing that gets threats attached and is scored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: RecordId,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub criticality: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Imported from an external CMDB rather than entered by hand
    #[serde(default)]
    pub is_external: bool,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_status() -> String {
    "active".to_string()
}

impl Asset {
    /// Manually entered asset with the defaults a fresh record gets.
    pub fn new(
        name: impl Into<String>,
        asset_type: impl Into<String>,
        criticality: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            asset_type: asset_type.into(),
            criticality: criticality.into(),
            owner: None,
            department: None,
            status: default_status(),
            created_at: None,
            external_id: None,
            is_external: false,
            source: "manual".to_string(),
            inventory_number: None,
            description: None,
        }
    }
}

impl Record for Asset {
    const TABLE: &'static str = "assets";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "type",
        "criticality",
        "owner",
        "department",
        "status",
        "created_at",
        "external_id",
        "is_external",
        "source",
        "inventory_number",
        "description",
    ];

    fn id(&self) -> RecordId {
        self.id
    }
}
