use crate::action::Action;
use crate::company::{Company, Profile};
use crate::milestone::Milestone;
use crate::status::WorkStatus;
use crate::target::Target;
use crate::task::Task;
use crate::topic::Topic;
use std::collections::HashSet;
use std::fmt;

const EPSILON: f64 = 1e-6;

#[derive(Debug, Clone)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

fn require_text(entity: &str, field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(format!(
            "{entity} is missing required field '{field}'"
        )));
    }
    Ok(())
}

fn check_impact(entity: &str, id: i64, impact: Option<f64>) -> Result<(), ValidationError> {
    if let Some(pct) = impact {
        if !pct.is_finite() || pct < -EPSILON || pct > 100.0 + EPSILON {
            return Err(ValidationError::new(format!(
                "{entity} {id} has invalid impact_on_target {pct} (must be between 0 and 100)"
            )));
        }
    }
    Ok(())
}

pub fn validate_company(company: &Company) -> Result<(), ValidationError> {
    require_text("company", "name", &company.name)
}

pub fn validate_profile(profile: &Profile) -> Result<(), ValidationError> {
    require_text("profile", "name", &profile.name)?;
    require_text("profile", "email", &profile.email)
}

pub fn validate_topic(topic: &Topic) -> Result<(), ValidationError> {
    require_text("topic", "name", &topic.name)
}

pub fn validate_target(target: &Target) -> Result<(), ValidationError> {
    require_text("target", "name", &target.name)?;
    if target.baseline_year > target.target_year {
        return Err(ValidationError::new(format!(
            "target {} has baseline year {} after target year {}",
            target.id, target.baseline_year, target.target_year
        )));
    }
    if !target.baseline_value.is_finite() {
        return Err(ValidationError::new(format!(
            "target {} has non-finite baseline_value",
            target.id
        )));
    }
    if !target.target_value.is_finite() {
        return Err(ValidationError::new(format!(
            "target {} has non-finite target_value",
            target.id
        )));
    }
    Ok(())
}

pub fn validate_milestone(milestone: &Milestone) -> Result<(), ValidationError> {
    require_text("milestone", "name", &milestone.name)?;
    if milestone.status == WorkStatus::MissedDeadline {
        return Err(ValidationError::new(format!(
            "milestone {} status 'missed_deadline' is only valid on tasks",
            milestone.id
        )));
    }
    check_impact("milestone", milestone.id, milestone.impact_on_target)
}

pub fn validate_action(action: &Action) -> Result<(), ValidationError> {
    require_text("action", "documentation", &action.documentation)?;
    if action.status == WorkStatus::MissedDeadline {
        return Err(ValidationError::new(format!(
            "action {} status 'missed_deadline' is only valid on tasks",
            action.id
        )));
    }
    check_impact("action", action.id, action.impact_on_target)
}

pub fn validate_task(task: &Task) -> Result<(), ValidationError> {
    require_text("task", "description", &task.description)
}

fn check_unique_ids<I>(entity: &str, ids: I) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = i64>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ValidationError::new(format!("duplicate {entity} id {id}")));
        }
    }
    Ok(())
}

/// Whole-workspace validation used by the persistence layer before a save
/// and after a load: per-record rules plus unique IDs and resolvable
/// references across the hierarchy.
pub fn validate_workspace(
    company: &Company,
    profiles: &[Profile],
    topics: &[Topic],
    targets: &[Target],
    milestones: &[Milestone],
    actions: &[Action],
    tasks: &[Task],
) -> Result<(), ValidationError> {
    validate_company(company)?;

    check_unique_ids("profile", profiles.iter().map(|p| p.id))?;
    check_unique_ids("topic", topics.iter().map(|t| t.id))?;
    check_unique_ids("target", targets.iter().map(|t| t.id))?;
    check_unique_ids("milestone", milestones.iter().map(|m| m.id))?;
    check_unique_ids("action", actions.iter().map(|a| a.id))?;
    check_unique_ids("task", tasks.iter().map(|t| t.id))?;

    let profile_ids: HashSet<i64> = profiles.iter().map(|p| p.id).collect();
    let topic_ids: HashSet<i64> = topics.iter().map(|t| t.id).collect();
    let target_ids: HashSet<i64> = targets.iter().map(|t| t.id).collect();
    let milestone_ids: HashSet<i64> = milestones.iter().map(|m| m.id).collect();
    let action_ids: HashSet<i64> = actions.iter().map(|a| a.id).collect();

    let check_owner = |entity: &str, id: i64, owner: Option<i64>| {
        if let Some(owner_id) = owner {
            if !profile_ids.contains(&owner_id) {
                return Err(ValidationError::new(format!(
                    "{entity} {id} references unknown owner profile {owner_id}"
                )));
            }
        }
        Ok(())
    };

    for profile in profiles {
        validate_profile(profile)?;
    }
    for topic in topics {
        validate_topic(topic)?;
    }
    for target in targets {
        validate_target(target)?;
        check_owner("target", target.id, target.owner_id)?;
        if let Some(topic_id) = target.topic_id {
            if !topic_ids.contains(&topic_id) {
                return Err(ValidationError::new(format!(
                    "target {} references unknown topic {topic_id}",
                    target.id
                )));
            }
        }
    }
    for milestone in milestones {
        validate_milestone(milestone)?;
        check_owner("milestone", milestone.id, milestone.owner_id)?;
        if !target_ids.contains(&milestone.target_id) {
            return Err(ValidationError::new(format!(
                "milestone {} references unknown target {}",
                milestone.id, milestone.target_id
            )));
        }
    }
    for action in actions {
        validate_action(action)?;
        check_owner("action", action.id, action.owner_id)?;
        if !milestone_ids.contains(&action.milestone_id) {
            return Err(ValidationError::new(format!(
                "action {} references unknown milestone {}",
                action.id, action.milestone_id
            )));
        }
    }
    for task in tasks {
        validate_task(task)?;
        check_owner("task", task.id, task.owner_id)?;
        if !action_ids.contains(&task.action_id) {
            return Err(ValidationError::new(format!(
                "task {} references unknown action {}",
                task.id, task.action_id
            )));
        }
    }

    Ok(())
}
