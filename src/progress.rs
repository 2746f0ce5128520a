use crate::status::WorkStatus;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::fmt;

/// Derived completion of a parent entity. An empty child set reports
/// `NotApplicable` rather than 0% so a target without milestones is not
/// mistaken for one that has made no progress. Serializes as `null` or a
/// number rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressValue {
    NotApplicable,
    Percent(f64),
}

impl ProgressValue {
    pub fn percent(&self) -> Option<f64> {
        match self {
            ProgressValue::NotApplicable => None,
            ProgressValue::Percent(value) => Some(*value),
        }
    }

    /// Display contract: two decimals, round half away from zero.
    pub fn rounded(&self) -> Option<f64> {
        self.percent().map(|value| (value * 100.0).round() / 100.0)
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, ProgressValue::Percent(_))
    }
}

impl fmt::Display for ProgressValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rounded() {
            Some(value) => write!(f, "{value:.2}%"),
            None => write!(f, "n/a"),
        }
    }
}

impl Serialize for ProgressValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.rounded() {
            Some(value) => serializer.serialize_f64(value),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for ProgressValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<f64>::deserialize(deserializer)?;
        Ok(match value {
            Some(percent) => ProgressValue::Percent(percent),
            None => ProgressValue::NotApplicable,
        })
    }
}

/// Completed children over total children, as a percentage in [0, 100].
pub fn completion_ratio(statuses: &[WorkStatus]) -> ProgressValue {
    if statuses.is_empty() {
        return ProgressValue::NotApplicable;
    }
    let completed = statuses.iter().filter(|status| status.is_completed()).count();
    ProgressValue::Percent(completed as f64 / statuses.len() as f64 * 100.0)
}

/// Same ratio over raw status text. Anything that does not parse to a known
/// status counts toward the denominator only, so malformed rows read as
/// "not completed" instead of failing the whole computation.
pub fn completion_ratio_raw<'a, I>(raw: I) -> ProgressValue
where
    I: IntoIterator<Item = &'a str>,
{
    let mut total = 0usize;
    let mut completed = 0usize;
    for status in raw {
        total += 1;
        if WorkStatus::from_str(status) == Some(WorkStatus::Completed) {
            completed += 1;
        }
    }
    if total == 0 {
        return ProgressValue::NotApplicable;
    }
    ProgressValue::Percent(completed as f64 / total as f64 * 100.0)
}

/// Per-status counts for one child set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StatusBreakdown {
    pub planned: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub missed_deadline: usize,
}

impl StatusBreakdown {
    pub fn tally<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = WorkStatus>,
    {
        let mut breakdown = Self::default();
        for status in statuses {
            match status {
                WorkStatus::Planned => breakdown.planned += 1,
                WorkStatus::InProgress => breakdown.in_progress += 1,
                WorkStatus::Completed => breakdown.completed += 1,
                WorkStatus::MissedDeadline => breakdown.missed_deadline += 1,
            }
        }
        breakdown
    }

    pub fn total(&self) -> usize {
        self.planned + self.in_progress + self.completed + self.missed_deadline
    }

    pub fn ratio(&self) -> ProgressValue {
        if self.total() == 0 {
            return ProgressValue::NotApplicable;
        }
        ProgressValue::Percent(self.completed as f64 / self.total() as f64 * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_child_set_is_not_applicable() {
        assert_eq!(completion_ratio(&[]), ProgressValue::NotApplicable);
        assert_eq!(completion_ratio(&[]).percent(), None);
    }

    #[test]
    fn four_milestones_half_completed() {
        let statuses = [
            WorkStatus::Completed,
            WorkStatus::Completed,
            WorkStatus::Planned,
            WorkStatus::InProgress,
        ];
        assert_eq!(completion_ratio(&statuses).rounded(), Some(50.0));
    }

    #[test]
    fn thirds_round_to_two_decimals() {
        let statuses = [
            WorkStatus::Completed,
            WorkStatus::Planned,
            WorkStatus::Planned,
        ];
        assert_eq!(completion_ratio(&statuses).rounded(), Some(33.33));
    }

    #[test]
    fn malformed_status_counts_as_not_completed() {
        let ratio = completion_ratio_raw(["completed", "garbage", "done?"]);
        assert_eq!(ratio.rounded(), Some(33.33));
    }

    #[test]
    fn missed_deadline_is_not_completed() {
        let statuses = [WorkStatus::Completed, WorkStatus::MissedDeadline];
        assert_eq!(completion_ratio(&statuses).rounded(), Some(50.0));
    }

    #[test]
    fn breakdown_ratio_matches_completion_ratio() {
        let statuses = [
            WorkStatus::Completed,
            WorkStatus::InProgress,
            WorkStatus::Completed,
            WorkStatus::Planned,
        ];
        let breakdown = StatusBreakdown::tally(statuses);
        assert_eq!(breakdown.completed, 2);
        assert_eq!(breakdown.total(), 4);
        assert_eq!(breakdown.ratio(), completion_ratio(&statuses));
    }

    #[test]
    fn display_contract() {
        assert_eq!(ProgressValue::Percent(50.0).to_string(), "50.00%");
        assert_eq!(ProgressValue::NotApplicable.to_string(), "n/a");
    }

    #[test]
    fn serializes_as_null_or_rounded_number() {
        let json = serde_json::to_string(&ProgressValue::NotApplicable).unwrap();
        assert_eq!(json, "null");
        let json = serde_json::to_string(&ProgressValue::Percent(100.0 / 3.0)).unwrap();
        assert_eq!(json, "33.33");
    }
}
