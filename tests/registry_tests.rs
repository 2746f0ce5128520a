use chrono::NaiveDate;
use esg_tool::{
    Action, Company, Materiality, Milestone, Profile, Registry, Role, Target, Task, Topic,
    WorkStatus,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn seeded_registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .set_company(Company {
            name: "Acme Industrial".into(),
            industry: Some("Manufacturing".into()),
            description: None,
        })
        .unwrap();
    registry
        .create_profile(Profile::new(0, "Dana", "dana@acme.example", Role::Admin))
        .unwrap();
    registry
        .create_topic(Topic::new(0, "Emissions", Materiality::Material))
        .unwrap();
    registry
}

#[test]
fn create_target_returns_generated_identifier() {
    let mut registry = seeded_registry();
    let mut draft = Target::new(0, "Cut scope 1 emissions by 40%", 2020, 2030);
    draft.topic_id = Some(1);
    draft.owner_id = Some(1);
    let id = registry.create_target(draft).unwrap();
    assert_eq!(id, 1);
    assert_eq!(
        registry.find_target(id).unwrap().name,
        "Cut scope 1 emissions by 40%"
    );
}

#[test]
fn create_target_with_empty_name_names_the_field() {
    let mut registry = seeded_registry();
    let err = registry
        .create_target(Target::new(0, "  ", 2020, 2030))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "target is missing required field 'name'"
    );
}

#[test]
fn target_rejects_inverted_year_range() {
    let mut registry = seeded_registry();
    let err = registry
        .create_target(Target::new(0, "Backwards", 2030, 2020))
        .unwrap_err();
    assert!(err.to_string().contains("baseline year"));
}

#[test]
fn target_rejects_unknown_topic_and_owner() {
    let mut registry = seeded_registry();
    let mut draft = Target::new(0, "Dangling topic", 2020, 2030);
    draft.topic_id = Some(42);
    let err = registry.create_target(draft).unwrap_err();
    assert!(err.to_string().contains("unknown topic 42"));

    let mut draft = Target::new(0, "Dangling owner", 2020, 2030);
    draft.owner_id = Some(42);
    let err = registry.create_target(draft).unwrap_err();
    assert!(err.to_string().contains("unknown owner profile 42"));
}

#[test]
fn milestone_impact_must_be_a_percentage() {
    let mut registry = seeded_registry();
    let target_id = registry
        .create_target(Target::new(0, "Renewables", 2021, 2026))
        .unwrap();
    let mut milestone = Milestone::new(0, target_id, "Solar roll-out");
    milestone.impact_on_target = Some(140.0);
    let err = registry.create_milestone(milestone).unwrap_err();
    assert!(err.to_string().contains("impact_on_target"));
}

#[test]
fn hierarchy_progress_rolls_up_per_level() {
    let mut registry = seeded_registry();
    let target_id = registry
        .create_target(Target::new(0, "Renewables", 2021, 2026))
        .unwrap();
    let milestone_id = registry
        .create_milestone(Milestone::new(0, target_id, "Solar roll-out"))
        .unwrap();
    let action_id = registry
        .create_action(Action::new(0, milestone_id, "Install panels on plant A"))
        .unwrap();
    let t1 = registry
        .create_task(Task::new(0, action_id, "Survey the roof"))
        .unwrap();
    registry
        .create_task(Task::new(0, action_id, "Mount the racking"))
        .unwrap();

    // No completed children anywhere yet.
    assert_eq!(registry.action_progress(action_id).unwrap().rounded(), Some(0.0));
    assert_eq!(
        registry.milestone_progress(milestone_id).unwrap().rounded(),
        Some(0.0)
    );
    assert_eq!(registry.target_progress(target_id).unwrap().rounded(), Some(0.0));

    registry.set_task_status(t1, WorkStatus::Completed).unwrap();
    assert_eq!(registry.action_progress(action_id).unwrap().rounded(), Some(50.0));

    // Milestone progress counts action statuses, not task statuses.
    registry
        .set_action_status(action_id, WorkStatus::Completed)
        .unwrap();
    assert_eq!(
        registry.milestone_progress(milestone_id).unwrap().rounded(),
        Some(100.0)
    );

    registry
        .set_milestone_status(milestone_id, WorkStatus::Completed)
        .unwrap();
    assert_eq!(
        registry.target_progress(target_id).unwrap().rounded(),
        Some(100.0)
    );
}

#[test]
fn progress_is_recomputed_not_cached() {
    let mut registry = seeded_registry();
    let target_id = registry
        .create_target(Target::new(0, "Renewables", 2021, 2026))
        .unwrap();
    let m1 = registry
        .create_milestone(Milestone::new(0, target_id, "Phase 1"))
        .unwrap();
    registry
        .create_milestone(Milestone::new(0, target_id, "Phase 2"))
        .unwrap();

    registry.set_milestone_status(m1, WorkStatus::Completed).unwrap();
    assert_eq!(registry.target_progress(target_id).unwrap().rounded(), Some(50.0));

    // Reverting the status must immediately revert the derived value.
    registry.set_milestone_status(m1, WorkStatus::Planned).unwrap();
    assert_eq!(registry.target_progress(target_id).unwrap().rounded(), Some(0.0));

    // Deleting the other milestone changes the denominator.
    registry.set_milestone_status(m1, WorkStatus::Completed).unwrap();
    let phase2 = registry
        .milestones()
        .iter()
        .find(|m| m.name == "Phase 2")
        .unwrap()
        .id;
    assert!(registry.delete_milestone(phase2));
    assert_eq!(
        registry.target_progress(target_id).unwrap().rounded(),
        Some(100.0)
    );
}

#[test]
fn deleting_profile_clears_ownership() {
    let mut registry = seeded_registry();
    let mut draft = Target::new(0, "Owned", 2020, 2030);
    draft.owner_id = Some(1);
    let target_id = registry.create_target(draft).unwrap();

    assert!(registry.delete_profile(1));
    assert_eq!(registry.find_target(target_id).unwrap().owner_id, None);
}

#[test]
fn deleting_topic_detaches_targets() {
    let mut registry = seeded_registry();
    let mut draft = Target::new(0, "Emissions cut", 2020, 2030);
    draft.topic_id = Some(1);
    let target_id = registry.create_target(draft).unwrap();

    assert!(registry.delete_topic(1));
    assert_eq!(registry.find_target(target_id).unwrap().topic_id, None);
}

#[test]
fn status_update_on_missing_entity_reports_not_found() {
    let mut registry = seeded_registry();
    let err = registry
        .set_task_status(7, WorkStatus::Completed)
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "task 7 not found");
}

#[test]
fn sweep_is_idempotent() {
    let mut registry = seeded_registry();
    let target_id = registry
        .create_target(Target::new(0, "Renewables", 2021, 2026))
        .unwrap();
    let milestone_id = registry
        .create_milestone(Milestone::new(0, target_id, "Phase 1"))
        .unwrap();
    let action_id = registry
        .create_action(Action::new(0, milestone_id, "Install"))
        .unwrap();
    let mut task = Task::new(0, action_id, "Order parts");
    task.due_date = Some(d(2025, 1, 1));
    registry.create_task(task).unwrap();

    let as_of = d(2025, 6, 1);
    assert_eq!(registry.sweep_missed_deadlines(as_of), 1);
    assert_eq!(registry.sweep_missed_deadlines(as_of), 0);
}

#[test]
fn ids_are_not_reused_within_a_session() {
    let mut registry = seeded_registry();
    let first = registry
        .create_target(Target::new(0, "One", 2020, 2030))
        .unwrap();
    let second = registry
        .create_target(Target::new(0, "Two", 2020, 2030))
        .unwrap();
    registry.delete_target(first);
    let third = registry
        .create_target(Target::new(0, "Three", 2020, 2030))
        .unwrap();
    // max+1 allocation: deleting 1 while 2 lives never hands out 2 again.
    assert_eq!(second, 2);
    assert_eq!(third, 3);
}

#[test]
fn validate_catches_dangling_references() {
    let mut registry = seeded_registry();
    let target_id = registry
        .create_target(Target::new(0, "Renewables", 2021, 2026))
        .unwrap();
    registry
        .create_milestone(Milestone::new(0, target_id, "Phase 1"))
        .unwrap();
    registry.validate().unwrap();
}
