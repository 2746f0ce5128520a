use super::{PersistenceError, PersistenceResult};
use crate::action::Action;
use crate::company::{Company, Profile};
use crate::milestone::Milestone;
use crate::registry::Registry;
use crate::status::WorkStatus;
use crate::target::{Target, TargetType};
use crate::task::Task;
use crate::topic::Topic;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

#[derive(Serialize, Deserialize)]
struct WorkspaceSnapshot {
    company: Company,
    #[serde(default)]
    profiles: Vec<Profile>,
    #[serde(default)]
    topics: Vec<Topic>,
    #[serde(default)]
    targets: Vec<Target>,
    #[serde(default)]
    milestones: Vec<Milestone>,
    #[serde(default)]
    actions: Vec<Action>,
    #[serde(default)]
    tasks: Vec<Task>,
}

impl WorkspaceSnapshot {
    fn from_registry(registry: &Registry) -> PersistenceResult<Self> {
        super::validate_registry(registry)?;
        Ok(Self {
            company: registry.company().clone(),
            profiles: registry.profiles().to_vec(),
            topics: registry.topics().to_vec(),
            targets: registry.targets().to_vec(),
            milestones: registry.milestones().to_vec(),
            actions: registry.actions().to_vec(),
            tasks: registry.tasks().to_vec(),
        })
    }

    fn into_registry(self) -> PersistenceResult<Registry> {
        let mut registry = Registry::with_company(self.company);
        for profile in self.profiles {
            registry.upsert_profile(profile)?;
        }
        for topic in self.topics {
            registry.upsert_topic(topic)?;
        }
        for target in self.targets {
            registry.upsert_target(target)?;
        }
        for milestone in self.milestones {
            registry.upsert_milestone(milestone)?;
        }
        for action in self.actions {
            registry.upsert_action(action)?;
        }
        for task in self.tasks {
            registry.upsert_task(task)?;
        }
        super::validate_registry(&registry)?;
        Ok(registry)
    }
}

pub fn save_registry_to_json<P: AsRef<Path>>(
    registry: &Registry,
    path: P,
) -> PersistenceResult<()> {
    let snapshot = WorkspaceSnapshot::from_registry(registry)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_registry_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Registry> {
    let file = File::open(path)?;
    let snapshot: WorkspaceSnapshot = serde_json::from_reader(file)?;
    snapshot.into_registry()
}

/// Target columns that have no place in the shared row shape travel as a
/// JSON blob in `detail_json`.
#[derive(Serialize, Deserialize)]
struct TargetDetail {
    baseline_year: i32,
    baseline_value: f64,
    target_year: i32,
    target_value: f64,
    target_type: TargetType,
    science_based: bool,
}

const METADATA_KIND: &str = "__metadata__";

#[derive(Default, Serialize, Deserialize)]
struct EntityCsvRecord {
    kind: String,
    id: i64,
    parent_id: String,
    name: String,
    status: String,
    owner_id: String,
    due_date: String,
    required: String,
    impact_on_target: String,
    notes: String,
    detail_json: String,
    #[serde(default)]
    company_json: String,
    #[serde(default)]
    profiles_json: String,
    #[serde(default)]
    topics_json: String,
}

impl EntityCsvRecord {
    fn metadata_row(registry: &Registry) -> PersistenceResult<Self> {
        let mut record = EntityCsvRecord::default();
        record.kind = METADATA_KIND.to_string();
        record.company_json = serde_json::to_string(registry.company())?;
        record.profiles_json = serde_json::to_string(registry.profiles())?;
        record.topics_json = serde_json::to_string(registry.topics())?;
        Ok(record)
    }

    fn is_metadata_row(&self) -> bool {
        self.kind == METADATA_KIND || !self.company_json.trim().is_empty()
    }

    fn from_target(target: &Target) -> PersistenceResult<Self> {
        let detail = TargetDetail {
            baseline_year: target.baseline_year,
            baseline_value: target.baseline_value,
            target_year: target.target_year,
            target_value: target.target_value,
            target_type: target.target_type,
            science_based: target.science_based,
        };
        let mut record = EntityCsvRecord::default();
        record.kind = "target".to_string();
        record.id = target.id;
        record.parent_id = format_option_i64(target.topic_id);
        record.name = target.name.clone();
        record.owner_id = format_option_i64(target.owner_id);
        record.detail_json = serde_json::to_string(&detail)?;
        Ok(record)
    }

    fn from_milestone(milestone: &Milestone) -> Self {
        let mut record = EntityCsvRecord::default();
        record.kind = "milestone".to_string();
        record.id = milestone.id;
        record.parent_id = milestone.target_id.to_string();
        record.name = milestone.name.clone();
        record.status = milestone.status.as_str().to_string();
        record.owner_id = format_option_i64(milestone.owner_id);
        record.due_date = format_date(milestone.due_date);
        record.required = milestone.required.to_string();
        record.impact_on_target = format_option_f64(milestone.impact_on_target);
        record.notes = milestone.notes.clone().unwrap_or_default();
        record
    }

    fn from_action(action: &Action) -> Self {
        let mut record = EntityCsvRecord::default();
        record.kind = "action".to_string();
        record.id = action.id;
        record.parent_id = action.milestone_id.to_string();
        record.name = action.documentation.clone();
        record.status = action.status.as_str().to_string();
        record.owner_id = format_option_i64(action.owner_id);
        record.due_date = format_date(action.due_date);
        record.impact_on_target = format_option_f64(action.impact_on_target);
        record
    }

    fn from_task(task: &Task) -> Self {
        let mut record = EntityCsvRecord::default();
        record.kind = "task".to_string();
        record.id = task.id;
        record.parent_id = task.action_id.to_string();
        record.name = task.description.clone();
        record.status = task.status.as_str().to_string();
        record.owner_id = format_option_i64(task.owner_id);
        record.due_date = format_date(task.due_date);
        record
    }

    fn parent_id(&self) -> PersistenceResult<i64> {
        self.parent_id.trim().parse::<i64>().map_err(|e| {
            PersistenceError::InvalidData(format!(
                "invalid parent id '{}' on {} {}: {e}",
                self.parent_id, self.kind, self.id
            ))
        })
    }

    fn status(&self) -> PersistenceResult<WorkStatus> {
        WorkStatus::from_str(&self.status).ok_or_else(|| {
            PersistenceError::InvalidData(format!(
                "invalid status '{}' on {} {}",
                self.status, self.kind, self.id
            ))
        })
    }

    fn into_target(self) -> PersistenceResult<Target> {
        let detail: TargetDetail = serde_json::from_str(&self.detail_json)
            .map_err(|err| PersistenceError::InvalidData(format!("invalid target detail: {err}")))?;
        let mut target = Target::new(self.id, self.name, detail.baseline_year, detail.target_year);
        target.topic_id = parse_option_i64(&self.parent_id)?;
        target.baseline_value = detail.baseline_value;
        target.target_value = detail.target_value;
        target.target_type = detail.target_type;
        target.owner_id = parse_option_i64(&self.owner_id)?;
        target.science_based = detail.science_based;
        Ok(target)
    }

    fn into_milestone(self) -> PersistenceResult<Milestone> {
        let mut milestone = Milestone::new(self.id, self.parent_id()?, self.name.clone());
        milestone.status = self.status()?;
        milestone.owner_id = parse_option_i64(&self.owner_id)?;
        milestone.due_date = parse_date(&self.due_date)?;
        milestone.required = parse_bool(&self.required)?.unwrap_or(false);
        milestone.impact_on_target = parse_option_f64(&self.impact_on_target)?;
        milestone.notes = parse_string_option(self.notes);
        Ok(milestone)
    }

    fn into_action(self) -> PersistenceResult<Action> {
        let mut action = Action::new(self.id, self.parent_id()?, self.name.clone());
        action.status = self.status()?;
        action.owner_id = parse_option_i64(&self.owner_id)?;
        action.due_date = parse_date(&self.due_date)?;
        action.impact_on_target = parse_option_f64(&self.impact_on_target)?;
        Ok(action)
    }

    fn into_task(self) -> PersistenceResult<Task> {
        let mut task = Task::new(self.id, self.parent_id()?, self.name.clone());
        task.status = self.status()?;
        task.owner_id = parse_option_i64(&self.owner_id)?;
        task.due_date = parse_date(&self.due_date)?;
        Ok(task)
    }
}

pub fn save_registry_to_csv<P: AsRef<Path>>(registry: &Registry, path: P) -> PersistenceResult<()> {
    super::validate_registry(registry)?;
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.serialize(EntityCsvRecord::metadata_row(registry)?)?;
    for target in registry.targets() {
        writer.serialize(EntityCsvRecord::from_target(target)?)?;
    }
    for milestone in registry.milestones() {
        writer.serialize(EntityCsvRecord::from_milestone(milestone))?;
    }
    for action in registry.actions() {
        writer.serialize(EntityCsvRecord::from_action(action))?;
    }
    for task in registry.tasks() {
        writer.serialize(EntityCsvRecord::from_task(task))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_registry_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Registry> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let mut company: Option<Company> = None;
    let mut profiles: Vec<Profile> = Vec::new();
    let mut topics: Vec<Topic> = Vec::new();
    let mut targets: Vec<Target> = Vec::new();
    let mut milestones: Vec<Milestone> = Vec::new();
    let mut actions: Vec<Action> = Vec::new();
    let mut tasks: Vec<Task> = Vec::new();

    for record in reader.deserialize::<EntityCsvRecord>() {
        let record = record?;
        if record.is_metadata_row() {
            if company.is_some() {
                return Err(PersistenceError::InvalidData(
                    "CSV file contained multiple metadata rows".into(),
                ));
            }
            company = Some(serde_json::from_str(&record.company_json).map_err(|err| {
                PersistenceError::InvalidData(format!("invalid company json: {err}"))
            })?);
            if !record.profiles_json.trim().is_empty() {
                profiles = serde_json::from_str(&record.profiles_json).map_err(|err| {
                    PersistenceError::InvalidData(format!("invalid profiles json: {err}"))
                })?;
            }
            if !record.topics_json.trim().is_empty() {
                topics = serde_json::from_str(&record.topics_json).map_err(|err| {
                    PersistenceError::InvalidData(format!("invalid topics json: {err}"))
                })?;
            }
            continue;
        }
        match record.kind.as_str() {
            "target" => targets.push(record.into_target()?),
            "milestone" => milestones.push(record.into_milestone()?),
            "action" => actions.push(record.into_action()?),
            "task" => tasks.push(record.into_task()?),
            other => {
                return Err(PersistenceError::InvalidData(format!(
                    "unknown entity kind '{other}'"
                )));
            }
        }
    }

    let snapshot = WorkspaceSnapshot {
        company: company.unwrap_or_default(),
        profiles,
        topics,
        targets,
        milestones,
        actions,
        tasks,
    };
    snapshot.into_registry()
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn parse_date(input: &str) -> PersistenceResult<Option<NaiveDate>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map(Some)
        .map_err(|e| PersistenceError::InvalidData(format!("invalid date '{input}': {e}")))
}

fn format_option_f64(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn parse_option_f64(input: &str) -> PersistenceResult<Option<f64>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input
        .trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|e| PersistenceError::InvalidData(format!("invalid float '{input}': {e}")))
}

fn format_option_i64(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn parse_option_i64(input: &str) -> PersistenceResult<Option<i64>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input
        .trim()
        .parse::<i64>()
        .map(Some)
        .map_err(|e| PersistenceError::InvalidData(format!("invalid integer '{input}': {e}")))
}

fn parse_bool(input: &str) -> PersistenceResult<Option<bool>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    match input.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(Some(true)),
        "false" => Ok(Some(false)),
        other => Err(PersistenceError::InvalidData(format!(
            "invalid boolean '{other}'"
        ))),
    }
}

fn parse_string_option(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}
