use crate::status::WorkStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The finest-grained status-tracked unit of work, nested under an action.
/// The only entity that can carry `missed_deadline`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub action_id: i64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: WorkStatus,
}

impl Task {
    pub fn new(id: i64, action_id: i64, description: impl Into<String>) -> Self {
        Self {
            id,
            action_id,
            description: description.into(),
            owner_id: None,
            due_date: None,
            status: WorkStatus::Planned,
        }
    }
}
