use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Renderable equipment categories. Each one maps to a 3D asset on the viewer side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    Tank,
    Drone,
    Armor,
    Exoskeleton,
    Fighter,
    Carrier,
    Artillery,
    Missile,
}

impl ModelType {
    pub const ALL: [ModelType; 8] = [
        ModelType::Tank,
        ModelType::Drone,
        ModelType::Armor,
        ModelType::Exoskeleton,
        ModelType::Fighter,
        ModelType::Carrier,
        ModelType::Artillery,
        ModelType::Missile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Tank => "tank",
            ModelType::Drone => "drone",
            ModelType::Armor => "armor",
            ModelType::Exoskeleton => "exoskeleton",
            ModelType::Fighter => "fighter",
            ModelType::Carrier => "carrier",
            ModelType::Artillery => "artillery",
            ModelType::Missile => "missile",
        }
    }

    /// Lenient parse used for AI-supplied hints. Unknown values yield `None`.
    pub fn parse(raw: &str) -> Option<ModelType> {
        let lower = raw.trim().to_lowercase();
        ModelType::ALL.into_iter().find(|m| m.as_str() == lower)
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const STAT_MIN: i64 = 0;
pub const STAT_MAX: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub speed: u8,
    pub armor: u8,
    pub firepower: u8,
    pub stealth: u8,
}

impl Stats {
    pub fn new(speed: i64, armor: i64, firepower: i64, stealth: i64) -> Self {
        Self {
            speed: clamp_stat(speed),
            armor: clamp_stat(armor),
            firepower: clamp_stat(firepower),
            stealth: clamp_stat(stealth),
        }
    }
}

pub fn clamp_stat(value: i64) -> u8 {
    value.clamp(STAT_MIN, STAT_MAX) as u8
}

/// Structured output of the AI analysis step for one prompt.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignResult {
    #[serde(default)]
    pub equipment_type: String,

    /// Category suggested by the AI. Only consulted after every keyword rule misses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_type: Option<ModelType>,

    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub design_suggestions: Vec<String>,
    #[serde(default)]
    pub technical_specs: BTreeMap<String, String>,
    #[serde(default)]
    pub analysis: String,
}

impl DesignResult {
    pub fn spec(&self, key: &str) -> Option<&str> {
        self.technical_specs.get(key).map(String::as_str)
    }

    /// Stable identity of the classification-relevant fields.
    pub fn fingerprint(&self) -> String {
        use sha1::{Digest, Sha1};

        let hint = self.model_type.map(|m| m.as_str()).unwrap_or("");

        let mut hasher = Sha1::new();
        hasher.update(self.name.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.equipment_type.as_bytes());
        hasher.update([0u8]);
        hasher.update(hint.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Server-persisted wrapper associating a result with its prompt and identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDesign {
    pub id: String,
    pub name: String,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
    pub result: DesignResult,
}

/// Response of `POST /ai/analyze-design`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeOutcome {
    pub result: DesignResult,
    pub design_id: Option<String>,
}
