#![cfg(feature = "sqlite")]

use chrono::NaiveDate;
use esg_tool::{
    Action, Company, Materiality, Milestone, Profile, Registry, RegistryStore, Role,
    SqliteRegistryStore, Target, TargetType, Task, Topic, WorkStatus,
};
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn sample_registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .set_company(Company {
            name: "Acme Industrial".into(),
            industry: Some("Manufacturing".into()),
            description: Some("Pumps and valves".into()),
        })
        .unwrap();
    let owner = registry
        .create_profile(Profile::new(0, "Dana", "dana@acme.example", Role::Admin))
        .unwrap();
    let topic = registry
        .create_topic(Topic::new(0, "Emissions", Materiality::Material))
        .unwrap();

    let mut target = Target::new(0, "Cut scope 1 emissions", 2020, 2030);
    target.topic_id = Some(topic);
    target.owner_id = Some(owner);
    target.baseline_value = 1200.5;
    target.target_value = 600.0;
    target.target_type = TargetType::Percentage;
    target.science_based = true;
    let target_id = registry.create_target(target).unwrap();

    let mut milestone = Milestone::new(0, target_id, "Electrify the fleet");
    milestone.owner_id = Some(owner);
    milestone.due_date = Some(d(2026, 6, 30));
    milestone.required = true;
    milestone.status = WorkStatus::InProgress;
    milestone.impact_on_target = Some(35.0);
    milestone.notes = Some("Pilot in plant A first".into());
    let milestone_id = registry.create_milestone(milestone).unwrap();

    let mut action = Action::new(0, milestone_id, "Replace diesel vans");
    action.due_date = Some(d(2026, 3, 31));
    action.status = WorkStatus::InProgress;
    action.impact_on_target = Some(20.0);
    let action_id = registry.create_action(action).unwrap();

    let mut task = Task::new(0, action_id, "Tender for EV supplier");
    task.due_date = Some(d(2025, 11, 1));
    task.status = WorkStatus::Completed;
    registry.create_task(task).unwrap();

    registry
}

#[test]
fn sqlite_store_round_trips_the_workspace() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteRegistryStore::new(file.path()).unwrap();

    let registry = sample_registry();
    store.save_registry(&registry).expect("save workspace");

    let loaded = store
        .load_registry()
        .expect("load workspace")
        .expect("workspace exists");

    assert_eq!(loaded.company().name, "Acme Industrial");
    assert_eq!(loaded.profiles().len(), 1);
    assert_eq!(loaded.topics().len(), 1);
    assert_eq!(loaded.targets(), registry.targets());
    assert_eq!(loaded.milestones(), registry.milestones());
    assert_eq!(loaded.actions(), registry.actions());
    assert_eq!(loaded.tasks(), registry.tasks());
}

#[test]
fn empty_database_loads_as_none() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteRegistryStore::new(file.path()).unwrap();
    assert!(store.load_registry().unwrap().is_none());
}

#[test]
fn save_replaces_the_previous_snapshot() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteRegistryStore::new(file.path()).unwrap();

    let mut registry = sample_registry();
    store.save_registry(&registry).unwrap();

    let target_id = registry.targets()[0].id;
    registry.delete_target(target_id);
    store.save_registry(&registry).unwrap();

    let loaded = store.load_registry().unwrap().unwrap();
    assert!(loaded.targets().is_empty());
    assert!(loaded.milestones().is_empty());
    assert!(loaded.tasks().is_empty());
    // Directory rows survive the delete.
    assert_eq!(loaded.profiles().len(), 1);
}

#[test]
fn derived_progress_survives_a_round_trip_without_being_stored() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteRegistryStore::new(file.path()).unwrap();

    let mut registry = sample_registry();
    let target_id = registry.targets()[0].id;
    let milestone_id = registry.milestones()[0].id;
    registry
        .set_milestone_status(milestone_id, WorkStatus::Completed)
        .unwrap();
    store.save_registry(&registry).unwrap();

    let loaded = store.load_registry().unwrap().unwrap();
    assert_eq!(
        loaded.target_progress(target_id).unwrap().rounded(),
        Some(100.0)
    );
}

#[test]
fn empty_company_name_is_refused_before_it_can_reach_the_store() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteRegistryStore::new(file.path()).unwrap();

    let mut registry = sample_registry();
    let err = registry
        .set_company(Company {
            name: "".into(),
            industry: None,
            description: None,
        })
        .unwrap_err();
    assert!(err.to_string().contains("missing required field 'name'"));

    // The mutation was refused, so the workspace is still valid and savable.
    store.save_registry(&registry).unwrap();
}
