use serde::{Deserialize, Serialize};
use std::fmt;

/// ESG relevance classification. A stored attribute, never computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Materiality {
    Material,
    NotMaterial,
    #[default]
    ToAssess,
}

impl Materiality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Materiality::Material => "material",
            Materiality::NotMaterial => "not_material",
            Materiality::ToAssess => "to_assess",
        }
    }

    pub fn from_str(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "material" => Some(Materiality::Material),
            "not_material" | "not material" => Some(Materiality::NotMaterial),
            "to_assess" | "to assess" => Some(Materiality::ToAssess),
            _ => None,
        }
    }

    pub fn variants() -> [&'static str; 3] {
        ["material", "not_material", "to_assess"]
    }
}

impl fmt::Display for Materiality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A sustainability topic (e.g. emissions, water, workforce). Targets may
/// reference a topic once its materiality has been assessed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub materiality: Materiality,
}

impl Topic {
    pub fn new(id: i64, name: impl Into<String>, materiality: Materiality) -> Self {
        Self {
            id,
            name: name.into(),
            materiality,
        }
    }
}
