use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    #[default]
    Absolute,
    Percentage,
    Intensity,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Absolute => "absolute",
            TargetType::Percentage => "percentage",
            TargetType::Intensity => "intensity",
        }
    }

    pub fn from_str(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "absolute" => Some(TargetType::Absolute),
            "percentage" => Some(TargetType::Percentage),
            "intensity" => Some(TargetType::Intensity),
            _ => None,
        }
    }

    pub fn variants() -> [&'static str; 3] {
        ["absolute", "percentage", "intensity"]
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A measurable sustainability goal. Progress is never stored on the row;
/// it is derived from milestone statuses on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<i64>,
    pub baseline_year: i32,
    pub baseline_value: f64,
    pub target_year: i32,
    pub target_value: f64,
    #[serde(default)]
    pub target_type: TargetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
    #[serde(default)]
    pub science_based: bool,
}

impl Target {
    pub fn new(id: i64, name: impl Into<String>, baseline_year: i32, target_year: i32) -> Self {
        Self {
            id,
            name: name.into(),
            topic_id: None,
            baseline_year,
            baseline_value: 0.0,
            target_year,
            target_value: 0.0,
            target_type: TargetType::Absolute,
            owner_id: None,
            science_based: false,
        }
    }
}
