#![cfg(feature = "cli_api")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::NamedTempFile;

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.write_stdin(script.to_string()).assert()
}

#[test]
fn cli_adds_target_and_reports_progress() {
    run_cli(
        "target add 2020 2030 Cut scope 1 emissions\n\
         ms add 1 Electrify fleet\n\
         ms add 1 Switch to renewables\n\
         status ms 1 completed\n\
         progress 1\n\
         quit\n",
    )
    .success()
    .stdout(str_contains("Target 1 'Cut scope 1 emissions': 50.00%"));
}

#[test]
fn cli_progress_without_milestones_is_not_applicable() {
    run_cli("target add 2020 2030 Lonely target\nprogress 1\nquit\n")
        .success()
        .stdout(str_contains("Target 1 'Lonely target': n/a"));
}

#[test]
fn cli_rejects_missed_deadline_on_milestones() {
    run_cli(
        "target add 2020 2030 T\nms add 1 Phase 1\nstatus ms 1 missed_deadline\nquit\n",
    )
    .success()
    .stdout(str_contains("only valid on tasks"));
}

#[test]
fn cli_delete_cascades_to_children() {
    run_cli(
        "target add 2020 2030 T\n\
         ms add 1 Phase 1\n\
         action add 1 Install meters\n\
         task add 1 Order hardware\n\
         delete target 1\n\
         report\n\
         quit\n",
    )
    .success()
    .stdout(str_contains("Deleted target 1."))
    .stdout(str_contains("targets=0, milestones=0, actions=0, tasks=0"));
}

#[test]
fn cli_sweep_marks_overdue_tasks() {
    run_cli(
        "target add 2020 2030 T\n\
         ms add 1 Phase 1\n\
         action add 1 Install meters\n\
         task add 1 Order hardware\n\
         task due 1 2025-01-10\n\
         sweep 2025-02-01\n\
         quit\n",
    )
    .success()
    .stdout(str_contains("Marked 1 task(s) as missed_deadline."));
}

#[test]
fn cli_save_and_load_json_round_trip() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().replace('\\', "\\\\");
    let script = format!(
        "target add 2020 2030 Persisted target\nsave json {}\ntarget add 2021 2026 Scratch\nload json {}\nshow targets\nquit\n",
        path, path
    );
    let assert = run_cli(&script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(
        output.contains("Workspace loaded from"),
        "expected output to mention load completion"
    );
    let after_reload = output.split("Workspace loaded from").last().unwrap_or_default();
    assert!(
        after_reload.contains("Persisted target"),
        "expected persisted target to remain"
    );
    assert!(
        !after_reload.contains("Scratch"),
        "expected scratch target to be replaced by the loaded workspace"
    );
}

#[test]
fn cli_sqlite_round_trip() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().replace('\\', "\\\\");
    let script = format!(
        "target add 2020 2030 Durable target\nsave sqlite {}\nload sqlite {}\nquit\n",
        path, path
    );
    run_cli(&script)
        .success()
        .stdout(str_contains("Workspace loaded from"));
}

#[test]
fn cli_directory_commands_assign_ids() {
    run_cli("profile add Dana dana@acme.example admin\ntopic add material Emissions\nquit\n")
        .success()
        .stdout(str_contains("Added profile id=1"))
        .stdout(str_contains("Added topic id=1"));
}
