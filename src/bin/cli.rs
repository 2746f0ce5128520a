use chrono::NaiveDate;
use esg_tool::{
    Action, Materiality, Milestone, Profile, Registry, RegistryStore, Role, SqliteRegistryStore,
    Target, TargetType, Task, Topic, WorkStatus, load_registry_from_csv, load_registry_from_json,
    save_registry_to_csv, save_registry_to_json,
};
use std::io::{self, Write};

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            if ci < widths.len() && cell.len() > widths[ci] {
                widths[ci] = cell.len();
            }
        }
    }

    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');

    out.push('|');
    for (i, name) in headers.iter().enumerate() {
        out.push(' ');
        out.push_str(name);
        let pad = widths[i] - name.len();
        if pad > 0 {
            out.push_str(&" ".repeat(pad));
        }
        out.push(' ');
        out.push('|');
    }
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');

    for row in rows {
        out.push('|');
        for (ci, cell) in row.iter().enumerate() {
            out.push(' ');
            out.push_str(cell);
            let pad = widths[ci].saturating_sub(cell.len());
            if pad > 0 {
                out.push_str(&" ".repeat(pad));
            }
            out.push(' ');
            out.push('|');
        }
        out.push('\n');
    }

    out.push_str(&sep);
    out.push('\n');
    out
}

fn opt_i64(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn opt_date(value: Option<NaiveDate>) -> String {
    value.map(|d| d.to_string()).unwrap_or_default()
}

fn opt_f64(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn show_targets(registry: &Registry) {
    let rows: Vec<Vec<String>> = registry
        .targets()
        .iter()
        .map(|t| {
            let progress = registry
                .target_progress(t.id)
                .map(|p| p.to_string())
                .unwrap_or_default();
            vec![
                t.id.to_string(),
                t.name.clone(),
                opt_i64(t.topic_id),
                format!("{} ({})", t.baseline_value, t.baseline_year),
                format!("{} ({})", t.target_value, t.target_year),
                t.target_type.to_string(),
                opt_i64(t.owner_id),
                t.science_based.to_string(),
                progress,
            ]
        })
        .collect();
    let headers = [
        "id", "name", "topic", "baseline", "target", "type", "owner", "science", "progress",
    ];
    println!("{}", render_table(&headers, &rows));
}

fn show_milestones(registry: &Registry) {
    let rows: Vec<Vec<String>> = registry
        .milestones()
        .iter()
        .map(|m| {
            let progress = registry
                .milestone_progress(m.id)
                .map(|p| p.to_string())
                .unwrap_or_default();
            vec![
                m.id.to_string(),
                m.target_id.to_string(),
                m.name.clone(),
                m.status.to_string(),
                opt_date(m.due_date),
                m.required.to_string(),
                opt_f64(m.impact_on_target),
                progress,
            ]
        })
        .collect();
    let headers = [
        "id", "target", "name", "status", "due", "required", "impact", "progress",
    ];
    println!("{}", render_table(&headers, &rows));
}

fn show_actions(registry: &Registry) {
    let rows: Vec<Vec<String>> = registry
        .actions()
        .iter()
        .map(|a| {
            let progress = registry
                .action_progress(a.id)
                .map(|p| p.to_string())
                .unwrap_or_default();
            vec![
                a.id.to_string(),
                a.milestone_id.to_string(),
                a.documentation.clone(),
                a.status.to_string(),
                opt_date(a.due_date),
                opt_f64(a.impact_on_target),
                progress,
            ]
        })
        .collect();
    let headers = ["id", "milestone", "documentation", "status", "due", "impact", "progress"];
    println!("{}", render_table(&headers, &rows));
}

fn show_tasks(registry: &Registry) {
    let rows: Vec<Vec<String>> = registry
        .tasks()
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.action_id.to_string(),
                t.description.clone(),
                t.status.to_string(),
                opt_date(t.due_date),
                opt_i64(t.owner_id),
            ]
        })
        .collect();
    let headers = ["id", "action", "description", "status", "due", "owner"];
    println!("{}", render_table(&headers, &rows));
}

fn show_topics(registry: &Registry) {
    let rows: Vec<Vec<String>> = registry
        .topics()
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.name.clone(),
                t.materiality.to_string(),
            ]
        })
        .collect();
    println!("{}", render_table(&["id", "name", "materiality"], &rows));
}

fn show_profiles(registry: &Registry) {
    let rows: Vec<Vec<String>> = registry
        .profiles()
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.name.clone(),
                p.email.clone(),
                p.role.to_string(),
            ]
        })
        .collect();
    println!("{}", render_table(&["id", "name", "email", "role"], &rows));
}

fn print_company(registry: &Registry) {
    let company = registry.company();
    println!("Company name : {}", company.name);
    println!("Industry     : {}", company.industry.clone().unwrap_or_default());
    println!("Description  : {}", company.description.clone().unwrap_or_default());
}

fn print_help() {
    println!(
        "Commands:\n  help                                    Show this help\n  show [targets|milestones|actions|tasks|topics|profiles]\n                                          Show a table (default targets)\n  company show                            Show company metadata\n  company name <text...>                  Update company name\n  company industry <text...>              Update company industry\n  company desc <text...>                  Update company description\n  profile add <name> <email> [role]       Add a profile (admin|member)\n  topic add <materiality> <name...>       Add a topic (material|not_material|to_assess)\n  target add <byear> <tyear> <name...>    Add a target\n  target values <id> <baseline> <goal>    Set baseline/target values\n  target type <id> <type>                 Set type (absolute|percentage|intensity)\n  target owner <id> <profile_id>          Assign an owner\n  target topic <id> <topic_id>            Assign a topic\n  target science <id> <true|false>        Set the science-based flag\n  ms add <target_id> <name...>            Add a milestone\n  ms due <id> <YYYY-MM-DD>                Set milestone due date\n  ms impact <id> <pct>                    Set impact on target (0-100)\n  ms required <id> <true|false>           Set the required flag\n  ms notes <id> <text...>                 Set milestone notes\n  action add <milestone_id> <doc...>      Add an action\n  action due <id> <YYYY-MM-DD>            Set action due date\n  action impact <id> <pct>                Set impact on target (0-100)\n  task add <action_id> <desc...>          Add a task\n  task due <id> <YYYY-MM-DD>              Set task due date\n  status <ms|action|task> <id> <status>   Update a status\n  delete <kind> <id>                      Delete profile|topic|target|ms|action|task\n  progress <target_id>                    Show derived progress for a target\n  report                                  Roll-up report across all targets\n  sweep <YYYY-MM-DD>                      Mark overdue tasks as missed_deadline\n  save <json|csv|sqlite> <path>           Persist workspace to disk\n  load <json|csv|sqlite> <path>           Load workspace from disk\n  quit|exit                               Exit"
    );
}

fn parse_id(input: Option<&str>) -> Option<i64> {
    input.and_then(|s| s.parse::<i64>().ok())
}

fn parse_date(input: Option<&str>) -> Option<NaiveDate> {
    input.and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

fn rest(parts: &mut std::str::SplitWhitespace<'_>) -> String {
    parts.collect::<Vec<_>>().join(" ")
}

fn main() {
    let mut registry = Registry::new();

    println!("ESG Tool (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        if stdin.read_line(&mut line).is_err() {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => match parts.next().unwrap_or("targets") {
                "targets" => show_targets(&registry),
                "milestones" => show_milestones(&registry),
                "actions" => show_actions(&registry),
                "tasks" => show_tasks(&registry),
                "topics" => show_topics(&registry),
                "profiles" => show_profiles(&registry),
                other => println!("Unknown table '{other}'"),
            },
            "company" => match parts.next() {
                Some("show") => print_company(&registry),
                Some("name") => {
                    let mut company = registry.company().clone();
                    company.name = rest(&mut parts);
                    match registry.set_company(company) {
                        Ok(()) => print_company(&registry),
                        Err(e) => println!("Error: {e}"),
                    }
                }
                Some("industry") => {
                    let mut company = registry.company().clone();
                    company.industry = Some(rest(&mut parts));
                    match registry.set_company(company) {
                        Ok(()) => print_company(&registry),
                        Err(e) => println!("Error: {e}"),
                    }
                }
                Some("desc") => {
                    let mut company = registry.company().clone();
                    company.description = Some(rest(&mut parts));
                    match registry.set_company(company) {
                        Ok(()) => print_company(&registry),
                        Err(e) => println!("Error: {e}"),
                    }
                }
                _ => println!("Usage: company show|name|industry|desc"),
            },
            "profile" => match parts.next() {
                Some("add") => {
                    let name = parts.next();
                    let email = parts.next();
                    let role = parts.next().and_then(Role::from_str).unwrap_or(Role::Member);
                    match (name, email) {
                        (Some(name), Some(email)) => {
                            match registry.create_profile(Profile::new(0, name, email, role)) {
                                Ok(id) => println!("Added profile id={id}"),
                                Err(e) => println!("Error: {e}"),
                            }
                        }
                        _ => println!("Usage: profile add <name> <email> [admin|member]"),
                    }
                }
                _ => println!("Usage: profile add <name> <email> [admin|member]"),
            },
            "topic" => match parts.next() {
                Some("add") => {
                    let materiality = parts.next().and_then(Materiality::from_str);
                    let name = rest(&mut parts);
                    match materiality {
                        Some(materiality) if !name.is_empty() => {
                            match registry.create_topic(Topic::new(0, name, materiality)) {
                                Ok(id) => println!("Added topic id={id}"),
                                Err(e) => println!("Error: {e}"),
                            }
                        }
                        _ => println!("Usage: topic add <materiality> <name...>"),
                    }
                }
                _ => println!("Usage: topic add <materiality> <name...>"),
            },
            "target" => match parts.next() {
                Some("add") => {
                    let byear = parts.next().and_then(|s| s.parse::<i32>().ok());
                    let tyear = parts.next().and_then(|s| s.parse::<i32>().ok());
                    let name = rest(&mut parts);
                    match (byear, tyear) {
                        (Some(byear), Some(tyear)) if !name.is_empty() => {
                            match registry.create_target(Target::new(0, name, byear, tyear)) {
                                Ok(id) => println!("Added target id={id}"),
                                Err(e) => println!("Error: {e}"),
                            }
                        }
                        _ => println!("Usage: target add <byear> <tyear> <name...>"),
                    }
                }
                Some("values") => {
                    let id = parse_id(parts.next());
                    let baseline = parts.next().and_then(|s| s.parse::<f64>().ok());
                    let goal = parts.next().and_then(|s| s.parse::<f64>().ok());
                    match (id, baseline, goal) {
                        (Some(id), Some(baseline), Some(goal)) => {
                            match registry.find_target(id).cloned() {
                                Some(mut target) => {
                                    target.baseline_value = baseline;
                                    target.target_value = goal;
                                    match registry.upsert_target(target) {
                                        Ok(()) => show_targets(&registry),
                                        Err(e) => println!("Error: {e}"),
                                    }
                                }
                                None => println!("Target {id} not found."),
                            }
                        }
                        _ => println!("Usage: target values <id> <baseline> <goal>"),
                    }
                }
                Some("type") => {
                    let id = parse_id(parts.next());
                    let kind = parts.next().and_then(TargetType::from_str);
                    match (id, kind) {
                        (Some(id), Some(kind)) => match registry.find_target(id).cloned() {
                            Some(mut target) => {
                                target.target_type = kind;
                                match registry.upsert_target(target) {
                                    Ok(()) => show_targets(&registry),
                                    Err(e) => println!("Error: {e}"),
                                }
                            }
                            None => println!("Target {id} not found."),
                        },
                        _ => println!("Usage: target type <id> <absolute|percentage|intensity>"),
                    }
                }
                Some("owner") => {
                    let id = parse_id(parts.next());
                    let owner = parse_id(parts.next());
                    match (id, owner) {
                        (Some(id), Some(owner)) => match registry.find_target(id).cloned() {
                            Some(mut target) => {
                                target.owner_id = Some(owner);
                                match registry.upsert_target(target) {
                                    Ok(()) => show_targets(&registry),
                                    Err(e) => println!("Error: {e}"),
                                }
                            }
                            None => println!("Target {id} not found."),
                        },
                        _ => println!("Usage: target owner <id> <profile_id>"),
                    }
                }
                Some("topic") => {
                    let id = parse_id(parts.next());
                    let topic = parse_id(parts.next());
                    match (id, topic) {
                        (Some(id), Some(topic)) => match registry.find_target(id).cloned() {
                            Some(mut target) => {
                                target.topic_id = Some(topic);
                                match registry.upsert_target(target) {
                                    Ok(()) => show_targets(&registry),
                                    Err(e) => println!("Error: {e}"),
                                }
                            }
                            None => println!("Target {id} not found."),
                        },
                        _ => println!("Usage: target topic <id> <topic_id>"),
                    }
                }
                Some("science") => {
                    let id = parse_id(parts.next());
                    let flag = parts.next().and_then(|s| s.parse::<bool>().ok());
                    match (id, flag) {
                        (Some(id), Some(flag)) => match registry.find_target(id).cloned() {
                            Some(mut target) => {
                                target.science_based = flag;
                                match registry.upsert_target(target) {
                                    Ok(()) => show_targets(&registry),
                                    Err(e) => println!("Error: {e}"),
                                }
                            }
                            None => println!("Target {id} not found."),
                        },
                        _ => println!("Usage: target science <id> <true|false>"),
                    }
                }
                _ => println!("Unknown target command; see 'help'"),
            },
            "ms" => match parts.next() {
                Some("add") => {
                    let target_id = parse_id(parts.next());
                    let name = rest(&mut parts);
                    match target_id {
                        Some(target_id) if !name.is_empty() => {
                            match registry.create_milestone(Milestone::new(0, target_id, name)) {
                                Ok(id) => println!("Added milestone id={id}"),
                                Err(e) => println!("Error: {e}"),
                            }
                        }
                        _ => println!("Usage: ms add <target_id> <name...>"),
                    }
                }
                Some("due") => {
                    let id = parse_id(parts.next());
                    let date = parse_date(parts.next());
                    match (id, date) {
                        (Some(id), Some(date)) => match registry.find_milestone(id).cloned() {
                            Some(mut milestone) => {
                                milestone.due_date = Some(date);
                                match registry.upsert_milestone(milestone) {
                                    Ok(()) => show_milestones(&registry),
                                    Err(e) => println!("Error: {e}"),
                                }
                            }
                            None => println!("Milestone {id} not found."),
                        },
                        _ => println!("Usage: ms due <id> <YYYY-MM-DD>"),
                    }
                }
                Some("impact") => {
                    let id = parse_id(parts.next());
                    let pct = parts.next().and_then(|s| s.parse::<f64>().ok());
                    match (id, pct) {
                        (Some(id), Some(pct)) => match registry.find_milestone(id).cloned() {
                            Some(mut milestone) => {
                                milestone.impact_on_target = Some(pct);
                                match registry.upsert_milestone(milestone) {
                                    Ok(()) => show_milestones(&registry),
                                    Err(e) => println!("Error: {e}"),
                                }
                            }
                            None => println!("Milestone {id} not found."),
                        },
                        _ => println!("Usage: ms impact <id> <pct>"),
                    }
                }
                Some("required") => {
                    let id = parse_id(parts.next());
                    let flag = parts.next().and_then(|s| s.parse::<bool>().ok());
                    match (id, flag) {
                        (Some(id), Some(flag)) => match registry.find_milestone(id).cloned() {
                            Some(mut milestone) => {
                                milestone.required = flag;
                                match registry.upsert_milestone(milestone) {
                                    Ok(()) => show_milestones(&registry),
                                    Err(e) => println!("Error: {e}"),
                                }
                            }
                            None => println!("Milestone {id} not found."),
                        },
                        _ => println!("Usage: ms required <id> <true|false>"),
                    }
                }
                Some("notes") => {
                    let id = parse_id(parts.next());
                    let notes = rest(&mut parts);
                    match id {
                        Some(id) => match registry.find_milestone(id).cloned() {
                            Some(mut milestone) => {
                                milestone.notes = Some(notes);
                                match registry.upsert_milestone(milestone) {
                                    Ok(()) => show_milestones(&registry),
                                    Err(e) => println!("Error: {e}"),
                                }
                            }
                            None => println!("Milestone {id} not found."),
                        },
                        None => println!("Usage: ms notes <id> <text...>"),
                    }
                }
                _ => println!("Unknown ms command; see 'help'"),
            },
            "action" => match parts.next() {
                Some("add") => {
                    let milestone_id = parse_id(parts.next());
                    let documentation = rest(&mut parts);
                    match milestone_id {
                        Some(milestone_id) if !documentation.is_empty() => {
                            match registry.create_action(Action::new(0, milestone_id, documentation))
                            {
                                Ok(id) => println!("Added action id={id}"),
                                Err(e) => println!("Error: {e}"),
                            }
                        }
                        _ => println!("Usage: action add <milestone_id> <doc...>"),
                    }
                }
                Some("due") => {
                    let id = parse_id(parts.next());
                    let date = parse_date(parts.next());
                    match (id, date) {
                        (Some(id), Some(date)) => match registry.find_action(id).cloned() {
                            Some(mut action) => {
                                action.due_date = Some(date);
                                match registry.upsert_action(action) {
                                    Ok(()) => show_actions(&registry),
                                    Err(e) => println!("Error: {e}"),
                                }
                            }
                            None => println!("Action {id} not found."),
                        },
                        _ => println!("Usage: action due <id> <YYYY-MM-DD>"),
                    }
                }
                Some("impact") => {
                    let id = parse_id(parts.next());
                    let pct = parts.next().and_then(|s| s.parse::<f64>().ok());
                    match (id, pct) {
                        (Some(id), Some(pct)) => match registry.find_action(id).cloned() {
                            Some(mut action) => {
                                action.impact_on_target = Some(pct);
                                match registry.upsert_action(action) {
                                    Ok(()) => show_actions(&registry),
                                    Err(e) => println!("Error: {e}"),
                                }
                            }
                            None => println!("Action {id} not found."),
                        },
                        _ => println!("Usage: action impact <id> <pct>"),
                    }
                }
                _ => println!("Unknown action command; see 'help'"),
            },
            "task" => match parts.next() {
                Some("add") => {
                    let action_id = parse_id(parts.next());
                    let description = rest(&mut parts);
                    match action_id {
                        Some(action_id) if !description.is_empty() => {
                            match registry.create_task(Task::new(0, action_id, description)) {
                                Ok(id) => println!("Added task id={id}"),
                                Err(e) => println!("Error: {e}"),
                            }
                        }
                        _ => println!("Usage: task add <action_id> <desc...>"),
                    }
                }
                Some("due") => {
                    let id = parse_id(parts.next());
                    let date = parse_date(parts.next());
                    match (id, date) {
                        (Some(id), Some(date)) => match registry.find_task(id).cloned() {
                            Some(mut task) => {
                                task.due_date = Some(date);
                                match registry.upsert_task(task) {
                                    Ok(()) => show_tasks(&registry),
                                    Err(e) => println!("Error: {e}"),
                                }
                            }
                            None => println!("Task {id} not found."),
                        },
                        _ => println!("Usage: task due <id> <YYYY-MM-DD>"),
                    }
                }
                _ => println!("Unknown task command; see 'help'"),
            },
            "status" => {
                let kind = parts.next();
                let id = parse_id(parts.next());
                let status = parts.next().and_then(WorkStatus::from_str);
                match (kind, id, status) {
                    (Some(kind), Some(id), Some(status)) => {
                        let result = match kind {
                            "ms" => registry.set_milestone_status(id, status),
                            "action" => registry.set_action_status(id, status),
                            "task" => registry.set_task_status(id, status),
                            other => {
                                println!("Unknown kind '{other}' (expected ms|action|task)");
                                continue;
                            }
                        };
                        match result {
                            Ok(()) => println!("{kind} {id} status set to {status}"),
                            Err(e) => println!("Error: {e}"),
                        }
                    }
                    _ => println!("Usage: status <ms|action|task> <id> <status>"),
                }
            }
            "delete" => {
                let kind = parts.next();
                let id = parse_id(parts.next());
                match (kind, id) {
                    (Some(kind), Some(id)) => {
                        let removed = match kind {
                            "profile" => registry.delete_profile(id),
                            "topic" => registry.delete_topic(id),
                            "target" => registry.delete_target(id),
                            "ms" => registry.delete_milestone(id),
                            "action" => registry.delete_action(id),
                            "task" => registry.delete_task(id),
                            other => {
                                println!("Unknown kind '{other}'");
                                continue;
                            }
                        };
                        if removed {
                            println!("Deleted {kind} {id}.");
                        } else {
                            println!("{kind} {id} not found.");
                        }
                    }
                    _ => println!("Usage: delete <kind> <id>"),
                }
            }
            "progress" => match parse_id(parts.next()) {
                Some(id) => match registry.target_progress_entry(id) {
                    Ok(entry) => {
                        println!("Target {} '{}': {}", entry.target_id, entry.name, entry.progress);
                        println!(
                            "Milestones: {} planned, {} in progress, {} completed",
                            entry.milestones.planned,
                            entry.milestones.in_progress,
                            entry.milestones.completed
                        );
                    }
                    Err(e) => println!("Error: {e}"),
                },
                None => println!("Usage: progress <target_id>"),
            },
            "report" => {
                let report = registry.progress_report();
                println!("{}", report.to_cli_summary());
            }
            "sweep" => match parse_date(parts.next()) {
                Some(as_of) => {
                    let updated = registry.sweep_missed_deadlines(as_of);
                    println!("Marked {updated} task(s) as missed_deadline.");
                }
                None => println!("Usage: sweep <YYYY-MM-DD>"),
            },
            "save" => {
                let format = parts.next();
                let path = parts.next();
                match (format, path) {
                    (Some("json"), Some(path)) => match save_registry_to_json(&registry, path) {
                        Ok(()) => println!("Saved workspace to {path}"),
                        Err(e) => println!("Error saving: {e}"),
                    },
                    (Some("csv"), Some(path)) => match save_registry_to_csv(&registry, path) {
                        Ok(()) => println!("Saved workspace to {path}"),
                        Err(e) => println!("Error saving: {e}"),
                    },
                    (Some("sqlite"), Some(path)) => {
                        match SqliteRegistryStore::new(path)
                            .and_then(|store| store.save_registry(&registry))
                        {
                            Ok(()) => println!("Saved workspace to {path}"),
                            Err(e) => println!("Error saving: {e}"),
                        }
                    }
                    _ => println!("Usage: save <json|csv|sqlite> <path>"),
                }
            }
            "load" => {
                let format = parts.next();
                let path = parts.next();
                match (format, path) {
                    (Some("json"), Some(path)) => match load_registry_from_json(path) {
                        Ok(loaded) => {
                            registry = loaded;
                            println!("Workspace loaded from {path}");
                            show_targets(&registry);
                        }
                        Err(e) => println!("Error loading: {e}"),
                    },
                    (Some("csv"), Some(path)) => match load_registry_from_csv(path) {
                        Ok(loaded) => {
                            registry = loaded;
                            println!("Workspace loaded from {path}");
                            show_targets(&registry);
                        }
                        Err(e) => println!("Error loading: {e}"),
                    },
                    (Some("sqlite"), Some(path)) => {
                        match SqliteRegistryStore::new(path).and_then(|store| store.load_registry())
                        {
                            Ok(Some(loaded)) => {
                                registry = loaded;
                                println!("Workspace loaded from {path}");
                                show_targets(&registry);
                            }
                            Ok(None) => println!("No workspace stored in {path}"),
                            Err(e) => println!("Error loading: {e}"),
                        }
                    }
                    _ => println!("Usage: load <json|csv|sqlite> <path>"),
                }
            }
            other => println!("Unknown command '{other}'; type 'help'"),
        }
    }
}
