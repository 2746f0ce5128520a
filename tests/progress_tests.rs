use esg_tool::{
    Milestone, ProgressValue, Registry, StatusBreakdown, Target, WorkStatus, completion_ratio,
    completion_ratio_raw,
};

#[test]
fn ratio_is_completed_over_total() {
    // N=4, K=2 -> 50.00%
    let statuses = [
        WorkStatus::Completed,
        WorkStatus::Completed,
        WorkStatus::Planned,
        WorkStatus::InProgress,
    ];
    let progress = completion_ratio(&statuses);
    assert_eq!(progress.rounded(), Some(50.0));
    assert_eq!(progress.to_string(), "50.00%");
}

#[test]
fn single_completed_child_is_full_progress() {
    assert_eq!(
        completion_ratio(&[WorkStatus::Completed]).rounded(),
        Some(100.0)
    );
}

#[test]
fn empty_child_set_is_not_applicable_not_zero() {
    let progress = completion_ratio(&[]);
    assert_eq!(progress, ProgressValue::NotApplicable);
    assert_eq!(progress.percent(), None);
    assert_eq!(progress.to_string(), "n/a");
    assert!(!progress.is_applicable());
}

#[test]
fn uneven_ratios_follow_two_decimal_display_contract() {
    let statuses = [
        WorkStatus::Completed,
        WorkStatus::Planned,
        WorkStatus::Planned,
        WorkStatus::Planned,
        WorkStatus::Planned,
        WorkStatus::Planned,
    ];
    // 1/6 = 16.666...% -> 16.67%
    assert_eq!(completion_ratio(&statuses).rounded(), Some(16.67));
    assert_eq!(completion_ratio(&statuses).to_string(), "16.67%");
}

#[test]
fn malformed_raw_status_lands_in_denominator_only() {
    let progress = completion_ratio_raw(["completed", "completed", "finished!!", "nope"]);
    assert_eq!(progress.rounded(), Some(50.0));
}

#[test]
fn all_malformed_raw_statuses_mean_zero_percent() {
    let progress = completion_ratio_raw(["bogus", "???"]);
    assert_eq!(progress.rounded(), Some(0.0));
}

#[test]
fn breakdown_counts_every_status() {
    let breakdown = StatusBreakdown::tally([
        WorkStatus::Planned,
        WorkStatus::InProgress,
        WorkStatus::Completed,
        WorkStatus::MissedDeadline,
        WorkStatus::MissedDeadline,
    ]);
    assert_eq!(breakdown.planned, 1);
    assert_eq!(breakdown.in_progress, 1);
    assert_eq!(breakdown.completed, 1);
    assert_eq!(breakdown.missed_deadline, 2);
    assert_eq!(breakdown.total(), 5);
}

#[test]
fn progress_serializes_null_for_not_applicable() {
    assert_eq!(
        serde_json::to_string(&ProgressValue::NotApplicable).unwrap(),
        "null"
    );
    assert_eq!(
        serde_json::to_string(&ProgressValue::Percent(50.0)).unwrap(),
        "50.0"
    );
}

#[test]
fn report_pins_the_four_milestone_example() {
    let mut registry = Registry::new();
    let target_id = registry
        .create_target(Target::new(0, "Net zero scope 1", 2020, 2030))
        .unwrap();
    for (name, status) in [
        ("Q1", WorkStatus::Completed),
        ("Q2", WorkStatus::Completed),
        ("Q3", WorkStatus::Planned),
        ("Q4", WorkStatus::InProgress),
    ] {
        let mut milestone = Milestone::new(0, target_id, name);
        milestone.status = status;
        registry.create_milestone(milestone).unwrap();
    }

    let report = registry.progress_report();
    assert_eq!(report.target_count, 1);
    assert_eq!(report.milestone_count, 4);
    assert_eq!(report.overall.rounded(), Some(50.0));
    assert_eq!(report.targets[0].progress.rounded(), Some(50.0));
    assert_eq!(report.targets[0].milestones.completed, 2);
}

#[test]
fn report_with_no_milestones_is_not_applicable() {
    let mut registry = Registry::new();
    registry
        .create_target(Target::new(0, "Water neutrality", 2022, 2027))
        .unwrap();
    let report = registry.progress_report();
    assert_eq!(report.overall, ProgressValue::NotApplicable);
    assert_eq!(report.targets[0].progress, ProgressValue::NotApplicable);
}
