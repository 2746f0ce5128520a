use crate::status::WorkStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A checkpoint toward a target. Carries its own status; its progress
/// percentage is derived from the actions underneath it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: i64,
    pub target_id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub status: WorkStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_on_target: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Milestone {
    pub fn new(id: i64, target_id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            target_id,
            name: name.into(),
            owner_id: None,
            due_date: None,
            required: false,
            status: WorkStatus::Planned,
            impact_on_target: None,
            notes: None,
        }
    }
}
