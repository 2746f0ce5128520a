use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow status shared by milestones, actions, and tasks.
/// `MissedDeadline` is only valid on tasks; the validation layer enforces
/// that restriction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
    MissedDeadline,
}

impl WorkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkStatus::Planned => "planned",
            WorkStatus::InProgress => "in_progress",
            WorkStatus::Completed => "completed",
            WorkStatus::MissedDeadline => "missed_deadline",
        }
    }

    pub fn from_str(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "planned" => Some(WorkStatus::Planned),
            "in_progress" | "in progress" => Some(WorkStatus::InProgress),
            "completed" => Some(WorkStatus::Completed),
            "missed_deadline" | "missed deadline" => Some(WorkStatus::MissedDeadline),
            _ => None,
        }
    }

    pub fn variants() -> [&'static str; 4] {
        ["planned", "in_progress", "completed", "missed_deadline"]
    }

    pub fn is_completed(self) -> bool {
        self == WorkStatus::Completed
    }
}

impl fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
