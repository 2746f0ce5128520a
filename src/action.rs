use crate::status::WorkStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A concrete activity under a milestone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: i64,
    pub milestone_id: i64,
    pub documentation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: WorkStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_on_target: Option<f64>,
}

impl Action {
    pub fn new(id: i64, milestone_id: i64, documentation: impl Into<String>) -> Self {
        Self {
            id,
            milestone_id,
            documentation: documentation.into(),
            owner_id: None,
            due_date: None,
            status: WorkStatus::Planned,
            impact_on_target: None,
        }
    }
}
