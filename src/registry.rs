use crate::action::Action;
use crate::company::{Company, Profile};
use crate::milestone::Milestone;
use crate::progress::{ProgressValue, StatusBreakdown, completion_ratio};
use crate::status::WorkStatus;
use crate::target::Target;
use crate::task::Task;
use crate::topic::Topic;
use crate::validation::{self, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone)]
pub enum RegistryError {
    Validation(String),
    NotFound { entity: &'static str, id: i64 },
    MissingReference {
        entity: &'static str,
        id: i64,
        field: &'static str,
        reference: i64,
    },
}

impl RegistryError {
    fn not_found(entity: &'static str, id: i64) -> Self {
        RegistryError::NotFound { entity, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound { .. })
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Validation(message) => write!(f, "{message}"),
            RegistryError::NotFound { entity, id } => write!(f, "{entity} {id} not found"),
            RegistryError::MissingReference {
                entity,
                id,
                field,
                reference,
            } => write!(f, "{entity} {id} references unknown {field} {reference}"),
        }
    }
}

impl std::error::Error for RegistryError {}

impl From<ValidationError> for RegistryError {
    fn from(value: ValidationError) -> Self {
        RegistryError::Validation(value.to_string())
    }
}

/// Per-target slice of the roll-up report. `progress` is the completion
/// ratio over the target's milestones, recomputed at call time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetProgressEntry {
    pub target_id: i64,
    pub name: String,
    pub progress: ProgressValue,
    pub milestones: StatusBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    pub target_count: usize,
    pub milestone_count: usize,
    pub action_count: usize,
    pub task_count: usize,
    pub missed_deadline_tasks: usize,
    pub overall: ProgressValue,
    pub targets: Vec<TargetProgressEntry>,
}

impl ProgressReport {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("targets={}", self.target_count));
        parts.push(format!("milestones={}", self.milestone_count));
        parts.push(format!("actions={}", self.action_count));
        parts.push(format!("tasks={}", self.task_count));
        if self.missed_deadline_tasks > 0 {
            parts.push(format!("missed={}", self.missed_deadline_tasks));
        }
        parts.push(format!("overall={}", self.overall));
        for entry in &self.targets {
            parts.push(format!("t{}={}", entry.target_id, entry.progress));
        }
        parts.join(", ")
    }
}

/// Single-company workspace holding the whole entity hierarchy. All
/// progress views are derived from child rows at read time; nothing here
/// stores a completion percentage.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    company: Company,
    profiles: Vec<Profile>,
    topics: Vec<Topic>,
    targets: Vec<Target>,
    milestones: Vec<Milestone>,
    actions: Vec<Action>,
    tasks: Vec<Task>,
}

fn next_id<I>(ids: I) -> i64
where
    I: IntoIterator<Item = i64>,
{
    ids.into_iter().max().map_or(1, |max| max + 1)
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_company(company: Company) -> Self {
        Self {
            company,
            ..Self::default()
        }
    }

    pub fn company(&self) -> &Company {
        &self.company
    }

    pub fn set_company(&mut self, company: Company) -> Result<(), RegistryError> {
        validation::validate_company(&company)?;
        self.company = company;
        Ok(())
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn find_profile(&self, id: i64) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn find_topic(&self, id: i64) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    pub fn find_target(&self, id: i64) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn find_milestone(&self, id: i64) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.id == id)
    }

    pub fn find_action(&self, id: i64) -> Option<&Action> {
        self.actions.iter().find(|a| a.id == id)
    }

    pub fn find_task(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn check_owner(
        &self,
        entity: &'static str,
        id: i64,
        owner: Option<i64>,
    ) -> Result<(), RegistryError> {
        if let Some(owner_id) = owner {
            if self.find_profile(owner_id).is_none() {
                return Err(RegistryError::MissingReference {
                    entity,
                    id,
                    field: "owner profile",
                    reference: owner_id,
                });
            }
        }
        Ok(())
    }

    // --- profiles ---

    pub fn upsert_profile(&mut self, profile: Profile) -> Result<(), RegistryError> {
        validation::validate_profile(&profile)?;
        match self.profiles.iter_mut().find(|p| p.id == profile.id) {
            Some(existing) => *existing = profile,
            None => self.profiles.push(profile),
        }
        Ok(())
    }

    pub fn create_profile(&mut self, mut profile: Profile) -> Result<i64, RegistryError> {
        profile.id = next_id(self.profiles.iter().map(|p| p.id));
        let id = profile.id;
        self.upsert_profile(profile)?;
        tracing::debug!(profile_id = id, "profile created");
        Ok(id)
    }

    /// Removes the profile and clears any ownership references to it.
    pub fn delete_profile(&mut self, id: i64) -> bool {
        let before = self.profiles.len();
        self.profiles.retain(|p| p.id != id);
        if self.profiles.len() == before {
            return false;
        }
        let clear = |owner: &mut Option<i64>| {
            if *owner == Some(id) {
                *owner = None;
            }
        };
        self.targets.iter_mut().for_each(|t| clear(&mut t.owner_id));
        self.milestones.iter_mut().for_each(|m| clear(&mut m.owner_id));
        self.actions.iter_mut().for_each(|a| clear(&mut a.owner_id));
        self.tasks.iter_mut().for_each(|t| clear(&mut t.owner_id));
        tracing::debug!(profile_id = id, "profile deleted");
        true
    }

    // --- topics ---

    pub fn upsert_topic(&mut self, topic: Topic) -> Result<(), RegistryError> {
        validation::validate_topic(&topic)?;
        match self.topics.iter_mut().find(|t| t.id == topic.id) {
            Some(existing) => *existing = topic,
            None => self.topics.push(topic),
        }
        Ok(())
    }

    pub fn create_topic(&mut self, mut topic: Topic) -> Result<i64, RegistryError> {
        topic.id = next_id(self.topics.iter().map(|t| t.id));
        let id = topic.id;
        self.upsert_topic(topic)?;
        tracing::debug!(topic_id = id, "topic created");
        Ok(id)
    }

    /// Removes the topic; targets pointing at it fall back to "no topic".
    pub fn delete_topic(&mut self, id: i64) -> bool {
        let before = self.topics.len();
        self.topics.retain(|t| t.id != id);
        if self.topics.len() == before {
            return false;
        }
        for target in &mut self.targets {
            if target.topic_id == Some(id) {
                target.topic_id = None;
            }
        }
        tracing::debug!(topic_id = id, "topic deleted");
        true
    }

    // --- targets ---

    pub fn upsert_target(&mut self, target: Target) -> Result<(), RegistryError> {
        validation::validate_target(&target)?;
        self.check_owner("target", target.id, target.owner_id)?;
        if let Some(topic_id) = target.topic_id {
            if self.find_topic(topic_id).is_none() {
                return Err(RegistryError::MissingReference {
                    entity: "target",
                    id: target.id,
                    field: "topic",
                    reference: topic_id,
                });
            }
        }
        match self.targets.iter_mut().find(|t| t.id == target.id) {
            Some(existing) => *existing = target,
            None => self.targets.push(target),
        }
        Ok(())
    }

    pub fn create_target(&mut self, mut target: Target) -> Result<i64, RegistryError> {
        target.id = next_id(self.targets.iter().map(|t| t.id));
        let id = target.id;
        self.upsert_target(target)?;
        tracing::debug!(target_id = id, "target created");
        Ok(id)
    }

    /// Deletes the target and every milestone, action, and task beneath it.
    pub fn delete_target(&mut self, id: i64) -> bool {
        if self.find_target(id).is_none() {
            return false;
        }
        self.targets.retain(|t| t.id != id);
        let milestone_ids: Vec<i64> = self
            .milestones
            .iter()
            .filter(|m| m.target_id == id)
            .map(|m| m.id)
            .collect();
        for milestone_id in milestone_ids {
            self.delete_milestone(milestone_id);
        }
        tracing::debug!(target_id = id, "target deleted");
        true
    }

    // --- milestones ---

    pub fn upsert_milestone(&mut self, milestone: Milestone) -> Result<(), RegistryError> {
        validation::validate_milestone(&milestone)?;
        self.check_owner("milestone", milestone.id, milestone.owner_id)?;
        if self.find_target(milestone.target_id).is_none() {
            return Err(RegistryError::MissingReference {
                entity: "milestone",
                id: milestone.id,
                field: "target",
                reference: milestone.target_id,
            });
        }
        match self.milestones.iter_mut().find(|m| m.id == milestone.id) {
            Some(existing) => *existing = milestone,
            None => self.milestones.push(milestone),
        }
        Ok(())
    }

    pub fn create_milestone(&mut self, mut milestone: Milestone) -> Result<i64, RegistryError> {
        milestone.id = next_id(self.milestones.iter().map(|m| m.id));
        let id = milestone.id;
        self.upsert_milestone(milestone)?;
        tracing::debug!(milestone_id = id, "milestone created");
        Ok(id)
    }

    pub fn delete_milestone(&mut self, id: i64) -> bool {
        if self.find_milestone(id).is_none() {
            return false;
        }
        self.milestones.retain(|m| m.id != id);
        let action_ids: Vec<i64> = self
            .actions
            .iter()
            .filter(|a| a.milestone_id == id)
            .map(|a| a.id)
            .collect();
        for action_id in action_ids {
            self.delete_action(action_id);
        }
        true
    }

    pub fn set_milestone_status(
        &mut self,
        id: i64,
        status: WorkStatus,
    ) -> Result<(), RegistryError> {
        let mut milestone = self
            .find_milestone(id)
            .cloned()
            .ok_or_else(|| RegistryError::not_found("milestone", id))?;
        milestone.status = status;
        self.upsert_milestone(milestone)
    }

    // --- actions ---

    pub fn upsert_action(&mut self, action: Action) -> Result<(), RegistryError> {
        validation::validate_action(&action)?;
        self.check_owner("action", action.id, action.owner_id)?;
        if self.find_milestone(action.milestone_id).is_none() {
            return Err(RegistryError::MissingReference {
                entity: "action",
                id: action.id,
                field: "milestone",
                reference: action.milestone_id,
            });
        }
        match self.actions.iter_mut().find(|a| a.id == action.id) {
            Some(existing) => *existing = action,
            None => self.actions.push(action),
        }
        Ok(())
    }

    pub fn create_action(&mut self, mut action: Action) -> Result<i64, RegistryError> {
        action.id = next_id(self.actions.iter().map(|a| a.id));
        let id = action.id;
        self.upsert_action(action)?;
        tracing::debug!(action_id = id, "action created");
        Ok(id)
    }

    pub fn delete_action(&mut self, id: i64) -> bool {
        if self.find_action(id).is_none() {
            return false;
        }
        self.actions.retain(|a| a.id != id);
        self.tasks.retain(|t| t.action_id != id);
        true
    }

    pub fn set_action_status(&mut self, id: i64, status: WorkStatus) -> Result<(), RegistryError> {
        let mut action = self
            .find_action(id)
            .cloned()
            .ok_or_else(|| RegistryError::not_found("action", id))?;
        action.status = status;
        self.upsert_action(action)
    }

    // --- tasks ---

    pub fn upsert_task(&mut self, task: Task) -> Result<(), RegistryError> {
        validation::validate_task(&task)?;
        self.check_owner("task", task.id, task.owner_id)?;
        if self.find_action(task.action_id).is_none() {
            return Err(RegistryError::MissingReference {
                entity: "task",
                id: task.id,
                field: "action",
                reference: task.action_id,
            });
        }
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
        Ok(())
    }

    pub fn create_task(&mut self, mut task: Task) -> Result<i64, RegistryError> {
        task.id = next_id(self.tasks.iter().map(|t| t.id));
        let id = task.id;
        self.upsert_task(task)?;
        tracing::debug!(task_id = id, "task created");
        Ok(id)
    }

    pub fn delete_task(&mut self, id: i64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    pub fn set_task_status(&mut self, id: i64, status: WorkStatus) -> Result<(), RegistryError> {
        let mut task = self
            .find_task(id)
            .cloned()
            .ok_or_else(|| RegistryError::not_found("task", id))?;
        task.status = status;
        self.upsert_task(task)
    }

    /// Marks every non-completed task whose due date is strictly before
    /// `as_of` as `missed_deadline`. Returns the number of tasks updated.
    /// The reference date is explicit so the sweep stays deterministic.
    pub fn sweep_missed_deadlines(&mut self, as_of: NaiveDate) -> usize {
        let mut updated = 0;
        for task in &mut self.tasks {
            let overdue = task
                .due_date
                .map(|due| due < as_of)
                .unwrap_or(false);
            if overdue
                && task.status != WorkStatus::Completed
                && task.status != WorkStatus::MissedDeadline
            {
                task.status = WorkStatus::MissedDeadline;
                updated += 1;
            }
        }
        if updated > 0 {
            tracing::info!(%as_of, updated, "deadline sweep marked tasks as missed");
        }
        updated
    }

    // --- derived progress ---

    pub fn milestones_for(&self, target_id: i64) -> Vec<&Milestone> {
        self.milestones
            .iter()
            .filter(|m| m.target_id == target_id)
            .collect()
    }

    pub fn actions_for(&self, milestone_id: i64) -> Vec<&Action> {
        self.actions
            .iter()
            .filter(|a| a.milestone_id == milestone_id)
            .collect()
    }

    pub fn tasks_for(&self, action_id: i64) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.action_id == action_id)
            .collect()
    }

    pub fn target_progress(&self, id: i64) -> Result<ProgressValue, RegistryError> {
        if self.find_target(id).is_none() {
            return Err(RegistryError::not_found("target", id));
        }
        let statuses: Vec<WorkStatus> = self
            .milestones_for(id)
            .iter()
            .map(|m| m.status)
            .collect();
        Ok(completion_ratio(&statuses))
    }

    pub fn milestone_progress(&self, id: i64) -> Result<ProgressValue, RegistryError> {
        if self.find_milestone(id).is_none() {
            return Err(RegistryError::not_found("milestone", id));
        }
        let statuses: Vec<WorkStatus> = self.actions_for(id).iter().map(|a| a.status).collect();
        Ok(completion_ratio(&statuses))
    }

    pub fn action_progress(&self, id: i64) -> Result<ProgressValue, RegistryError> {
        if self.find_action(id).is_none() {
            return Err(RegistryError::not_found("action", id));
        }
        let statuses: Vec<WorkStatus> = self.tasks_for(id).iter().map(|t| t.status).collect();
        Ok(completion_ratio(&statuses))
    }

    pub fn target_progress_entry(&self, id: i64) -> Result<TargetProgressEntry, RegistryError> {
        let target = self
            .find_target(id)
            .ok_or_else(|| RegistryError::not_found("target", id))?;
        let statuses: Vec<WorkStatus> = self
            .milestones_for(id)
            .iter()
            .map(|m| m.status)
            .collect();
        Ok(TargetProgressEntry {
            target_id: target.id,
            name: target.name.clone(),
            progress: completion_ratio(&statuses),
            milestones: StatusBreakdown::tally(statuses),
        })
    }

    /// Roll-up across the whole workspace. `overall` is the completion
    /// ratio over every milestone regardless of target.
    pub fn progress_report(&self) -> ProgressReport {
        let entries: Vec<TargetProgressEntry> = self
            .targets
            .iter()
            .map(|target| {
                self.target_progress_entry(target.id)
                    .expect("target listed by the registry must resolve")
            })
            .collect();

        let all_milestone_statuses: Vec<WorkStatus> =
            self.milestones.iter().map(|m| m.status).collect();
        let missed_deadline_tasks = self
            .tasks
            .iter()
            .filter(|t| t.status == WorkStatus::MissedDeadline)
            .count();

        ProgressReport {
            target_count: self.targets.len(),
            milestone_count: self.milestones.len(),
            action_count: self.actions.len(),
            task_count: self.tasks.len(),
            missed_deadline_tasks,
            overall: completion_ratio(&all_milestone_statuses),
            targets: entries,
        }
    }

    pub fn validate(&self) -> Result<(), RegistryError> {
        validation::validate_workspace(
            &self.company,
            &self.profiles,
            &self.topics,
            &self.targets,
            &self.milestones,
            &self.actions,
            &self.tasks,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_target() -> (Registry, i64) {
        let mut registry = Registry::new();
        let target_id = registry
            .create_target(Target::new(0, "Cut scope 1 emissions", 2020, 2030))
            .unwrap();
        (registry, target_id)
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let (mut registry, first) = registry_with_target();
        let second = registry
            .create_target(Target::new(0, "Water usage", 2022, 2028))
            .unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[test]
    fn milestone_requires_existing_target() {
        let mut registry = Registry::new();
        let err = registry
            .create_milestone(Milestone::new(0, 99, "Phase 1"))
            .unwrap_err();
        assert!(err.to_string().contains("unknown target 99"));
    }

    #[test]
    fn target_progress_recomputes_after_status_change() {
        let (mut registry, target_id) = registry_with_target();
        let m1 = registry
            .create_milestone(Milestone::new(0, target_id, "Phase 1"))
            .unwrap();
        registry
            .create_milestone(Milestone::new(0, target_id, "Phase 2"))
            .unwrap();

        assert_eq!(
            registry.target_progress(target_id).unwrap().rounded(),
            Some(0.0)
        );
        registry
            .set_milestone_status(m1, WorkStatus::Completed)
            .unwrap();
        assert_eq!(
            registry.target_progress(target_id).unwrap().rounded(),
            Some(50.0)
        );
    }

    #[test]
    fn deleting_target_cascades_to_children() {
        let (mut registry, target_id) = registry_with_target();
        let milestone_id = registry
            .create_milestone(Milestone::new(0, target_id, "Phase 1"))
            .unwrap();
        let action_id = registry
            .create_action(Action::new(0, milestone_id, "Install meters"))
            .unwrap();
        registry
            .create_task(Task::new(0, action_id, "Order hardware"))
            .unwrap();

        assert!(registry.delete_target(target_id));
        assert!(registry.milestones().is_empty());
        assert!(registry.actions().is_empty());
        assert!(registry.tasks().is_empty());
    }

    #[test]
    fn milestone_rejects_missed_deadline() {
        let (mut registry, target_id) = registry_with_target();
        let milestone_id = registry
            .create_milestone(Milestone::new(0, target_id, "Phase 1"))
            .unwrap();
        let err = registry
            .set_milestone_status(milestone_id, WorkStatus::MissedDeadline)
            .unwrap_err();
        assert!(err.to_string().contains("only valid on tasks"));
    }

    #[test]
    fn sweep_marks_overdue_tasks_only() {
        let (mut registry, target_id) = registry_with_target();
        let milestone_id = registry
            .create_milestone(Milestone::new(0, target_id, "Phase 1"))
            .unwrap();
        let action_id = registry
            .create_action(Action::new(0, milestone_id, "Install meters"))
            .unwrap();

        let mut overdue = Task::new(0, action_id, "Order hardware");
        overdue.due_date = NaiveDate::from_ymd_opt(2025, 1, 10);
        let overdue_id = registry.create_task(overdue).unwrap();

        let mut done = Task::new(0, action_id, "Scope the order");
        done.due_date = NaiveDate::from_ymd_opt(2025, 1, 10);
        done.status = WorkStatus::Completed;
        let done_id = registry.create_task(done).unwrap();

        let mut future = Task::new(0, action_id, "Commission meters");
        future.due_date = NaiveDate::from_ymd_opt(2025, 3, 1);
        let future_id = registry.create_task(future).unwrap();

        let as_of = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        assert_eq!(registry.sweep_missed_deadlines(as_of), 1);
        assert_eq!(
            registry.find_task(overdue_id).unwrap().status,
            WorkStatus::MissedDeadline
        );
        assert_eq!(
            registry.find_task(done_id).unwrap().status,
            WorkStatus::Completed
        );
        assert_eq!(
            registry.find_task(future_id).unwrap().status,
            WorkStatus::Planned
        );
    }
}
