//! Reference catalogue of known threats
//!
//! Unlike [`Threat`](super::Threat), a library entry is not tied to an asset.
//! It carries Russian and Kazakh renderings next to the English name, and can
//! be filled from a MITRE ATT&CK attack-pattern export.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{Record, RecordId};

/// Category given to every entry imported from ATT&CK.
pub const ATTACK_CATEGORY: &str = "MITRE ATT&CK";
/// Severity given to imported entries until someone rates them.
pub const IMPORTED_SEVERITY: &str = "medium";

const ATTACK_SOURCE: &str = "mitre-attack";

/// Display language of a threat name or description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
    Kz,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatLibrary {
    pub id: RecordId,
    /// Unique across the library
    pub name: String,
    pub name_ru: String,
    pub name_kz: String,
    pub description: Option<String>,
    pub description_ru: Option<String>,
    pub description_kz: Option<String>,
    pub category: Option<String>,
    pub severity: Option<String>,
    #[serde(default)]
    pub common_controls: Vec<String>,
}

impl ThreatLibrary {
    /// New, not yet stored entry whose translations start as the English name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: 0,
            name_ru: name.clone(),
            name_kz: name.clone(),
            name,
            description: None,
            description_ru: None,
            description_kz: None,
            category: None,
            severity: None,
            common_controls: Vec::new(),
        }
    }

    /// Build an entry from one ATT&CK pattern.
    ///
    /// Returns `None` for patterns without a name or without a `mitre-attack`
    /// external id. Missing translations fall back to the English text.
    pub fn from_attack_pattern(pattern: AttackPattern) -> Option<Self> {
        pattern.mitre_id().filter(|id| !id.is_empty())?;
        let name = pattern.name.filter(|n| !n.is_empty())?;

        let description = pattern.description;
        Some(Self {
            id: 0,
            name_ru: pattern.name_ru.unwrap_or_else(|| name.clone()),
            name_kz: pattern.name_kz.unwrap_or_else(|| name.clone()),
            name,
            description_ru: pattern.description_ru.or_else(|| description.clone()),
            description_kz: pattern.description_kz.or_else(|| description.clone()),
            description,
            category: Some(ATTACK_CATEGORY.to_string()),
            severity: Some(IMPORTED_SEVERITY.to_string()),
            common_controls: Vec::new(),
        })
    }

    pub fn name_in(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.name,
            Locale::Ru => &self.name_ru,
            Locale::Kz => &self.name_kz,
        }
    }

    pub fn description_in(&self, locale: Locale) -> Option<&str> {
        match locale {
            Locale::En => self.description.as_deref(),
            Locale::Ru => self.description_ru.as_deref(),
            Locale::Kz => self.description_kz.as_deref(),
        }
    }
}

impl Record for ThreatLibrary {
    const TABLE: &'static str = "threat_library";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "name_ru",
        "name_kz",
        "description",
        "description_ru",
        "description_kz",
        "category",
        "severity",
        "common_controls",
    ];

    fn id(&self) -> RecordId {
        self.id
    }
}

/// One object of a translated ATT&CK `attack-pattern` export.
///
/// Only the fields the library keeps are read; the rest of the STIX object
/// is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttackPattern {
    pub name: Option<String>,
    pub name_ru: Option<String>,
    pub name_kz: Option<String>,
    pub description: Option<String>,
    pub description_ru: Option<String>,
    pub description_kz: Option<String>,
    #[serde(default)]
    pub external_references: Vec<ExternalReference>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalReference {
    pub source_name: Option<String>,
    pub external_id: Option<String>,
}

impl AttackPattern {
    /// Technique id (e.g. `T1566`) from the first `mitre-attack` reference.
    pub fn mitre_id(&self) -> Option<&str> {
        let reference = self
            .external_references
            .iter()
            .find(|r| r.source_name.as_deref() == Some(ATTACK_SOURCE))?;
        Some(reference.external_id.as_deref().unwrap_or_default())
    }
}

/// Append new ATT&CK patterns to `library`, skipping any whose name is
/// already present. Returns how many entries were added.
pub fn import_attack_patterns(
    library: &mut Vec<ThreatLibrary>,
    patterns: impl IntoIterator<Item = AttackPattern>,
) -> usize {
    let mut known: HashSet<String> = library.iter().map(|t| t.name.clone()).collect();
    let before = library.len();

    for entry in patterns.into_iter().filter_map(ThreatLibrary::from_attack_pattern) {
        if known.insert(entry.name.clone()) {
            library.push(entry);
        } else {
            tracing::debug!("Skipping duplicate threat '{}'", entry.name);
        }
    }

    let imported = library.len() - before;
    tracing::info!("Imported {} threats into the library", imported);
    imported
}

/// Name of `threat` in `locale`, or `threat` itself when the library has no
/// entry for it.
pub fn localized_threat_name<'a>(
    library: &'a [ThreatLibrary],
    threat: &'a str,
    locale: Locale,
) -> &'a str {
    library
        .iter()
        .find(|t| t.name == threat)
        .map_or(threat, |t| t.name_in(locale))
}
