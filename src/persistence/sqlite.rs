use super::{PersistenceError, PersistenceResult, RegistryStore};
use crate::action::Action;
use crate::company::{Company, Profile, Role};
use crate::milestone::Milestone;
use crate::registry::Registry;
use crate::status::WorkStatus;
use crate::target::{Target, TargetType};
use crate::task::Task;
use crate::topic::{Materiality, Topic};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Mutex;

/// Workspace store over a normalized relational schema. The connection is a
/// single shared handle guarded by a mutex; saves are replace-all inside one
/// transaction.
pub struct SqliteRegistryStore {
    connection: Mutex<Connection>,
}

impl SqliteRegistryStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            PRAGMA foreign_keys = ON;
            CREATE TABLE IF NOT EXISTS companies (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                name TEXT NOT NULL,
                industry TEXT,
                description TEXT
            );
            CREATE TABLE IF NOT EXISTS profiles (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                role TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS topics (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                materiality TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS targets (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                topic_id INTEGER REFERENCES topics(id),
                baseline_year INTEGER NOT NULL,
                baseline_value REAL NOT NULL,
                target_year INTEGER NOT NULL,
                target_value REAL NOT NULL,
                target_type TEXT NOT NULL,
                owner_id INTEGER REFERENCES profiles(id),
                science_based INTEGER NOT NULL DEFAULT 0
            );
            CREATE TABLE IF NOT EXISTS milestones (
                id INTEGER PRIMARY KEY,
                target_id INTEGER NOT NULL REFERENCES targets(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                owner_id INTEGER REFERENCES profiles(id),
                due_date TEXT,
                required INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL,
                impact_on_target REAL,
                notes TEXT
            );
            CREATE TABLE IF NOT EXISTS actions (
                id INTEGER PRIMARY KEY,
                milestone_id INTEGER NOT NULL REFERENCES milestones(id) ON DELETE CASCADE,
                documentation TEXT NOT NULL,
                owner_id INTEGER REFERENCES profiles(id),
                due_date TEXT,
                status TEXT NOT NULL,
                impact_on_target REAL
            );
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY,
                action_id INTEGER NOT NULL REFERENCES actions(id) ON DELETE CASCADE,
                description TEXT NOT NULL,
                owner_id INTEGER REFERENCES profiles(id),
                due_date TEXT,
                status TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn save_rows(tx: &rusqlite::Transaction, registry: &Registry) -> PersistenceResult<()> {
        tx.execute("DELETE FROM tasks", [])?;
        tx.execute("DELETE FROM actions", [])?;
        tx.execute("DELETE FROM milestones", [])?;
        tx.execute("DELETE FROM targets", [])?;
        tx.execute("DELETE FROM topics", [])?;
        tx.execute("DELETE FROM profiles", [])?;
        tx.execute("DELETE FROM companies", [])?;

        let company = registry.company();
        tx.execute(
            "INSERT INTO companies (id, name, industry, description) VALUES (1, ?1, ?2, ?3)",
            params![company.name, company.industry, company.description],
        )?;

        let mut stmt =
            tx.prepare("INSERT INTO profiles (id, name, email, role) VALUES (?1, ?2, ?3, ?4)")?;
        for profile in registry.profiles() {
            stmt.execute(params![
                profile.id,
                profile.name,
                profile.email,
                profile.role.as_str()
            ])?;
        }

        let mut stmt =
            tx.prepare("INSERT INTO topics (id, name, materiality) VALUES (?1, ?2, ?3)")?;
        for topic in registry.topics() {
            stmt.execute(params![topic.id, topic.name, topic.materiality.as_str()])?;
        }

        let mut stmt = tx.prepare(
            "INSERT INTO targets (id, name, topic_id, baseline_year, baseline_value, \
             target_year, target_value, target_type, owner_id, science_based) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )?;
        for target in registry.targets() {
            stmt.execute(params![
                target.id,
                target.name,
                target.topic_id,
                target.baseline_year,
                target.baseline_value,
                target.target_year,
                target.target_value,
                target.target_type.as_str(),
                target.owner_id,
                target.science_based
            ])?;
        }

        let mut stmt = tx.prepare(
            "INSERT INTO milestones (id, target_id, name, owner_id, due_date, required, \
             status, impact_on_target, notes) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?;
        for milestone in registry.milestones() {
            stmt.execute(params![
                milestone.id,
                milestone.target_id,
                milestone.name,
                milestone.owner_id,
                format_date(milestone.due_date),
                milestone.required,
                milestone.status.as_str(),
                milestone.impact_on_target,
                milestone.notes
            ])?;
        }

        let mut stmt = tx.prepare(
            "INSERT INTO actions (id, milestone_id, documentation, owner_id, due_date, \
             status, impact_on_target) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for action in registry.actions() {
            stmt.execute(params![
                action.id,
                action.milestone_id,
                action.documentation,
                action.owner_id,
                format_date(action.due_date),
                action.status.as_str(),
                action.impact_on_target
            ])?;
        }

        let mut stmt = tx.prepare(
            "INSERT INTO tasks (id, action_id, description, owner_id, due_date, status) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for task in registry.tasks() {
            stmt.execute(params![
                task.id,
                task.action_id,
                task.description,
                task.owner_id,
                format_date(task.due_date),
                task.status.as_str()
            ])?;
        }

        Ok(())
    }
}

fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

fn parse_date(raw: Option<String>) -> PersistenceResult<Option<NaiveDate>> {
    match raw {
        None => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|e| PersistenceError::InvalidData(format!("invalid date '{text}': {e}"))),
    }
}

fn parse_status(raw: &str) -> PersistenceResult<WorkStatus> {
    WorkStatus::from_str(raw)
        .ok_or_else(|| PersistenceError::InvalidData(format!("invalid status '{raw}'")))
}

fn parse_role(raw: &str) -> PersistenceResult<Role> {
    Role::from_str(raw)
        .ok_or_else(|| PersistenceError::InvalidData(format!("invalid role '{raw}'")))
}

fn parse_materiality(raw: &str) -> PersistenceResult<Materiality> {
    Materiality::from_str(raw)
        .ok_or_else(|| PersistenceError::InvalidData(format!("invalid materiality '{raw}'")))
}

fn parse_target_type(raw: &str) -> PersistenceResult<TargetType> {
    TargetType::from_str(raw)
        .ok_or_else(|| PersistenceError::InvalidData(format!("invalid target type '{raw}'")))
}

impl RegistryStore for SqliteRegistryStore {
    fn save_registry(&self, registry: &Registry) -> PersistenceResult<()> {
        super::validate_registry(registry)?;
        let mut conn = self.connection.lock().expect("sqlite mutex poisoned");
        let tx = conn.transaction()?;
        Self::save_rows(&tx, registry)?;
        tx.commit()?;
        tracing::debug!("workspace saved to sqlite");
        Ok(())
    }

    fn load_registry(&self) -> PersistenceResult<Option<Registry>> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");

        let mut stmt =
            conn.prepare("SELECT name, industry, description FROM companies WHERE id = 1")?;
        let company: Option<Company> = stmt
            .query_row([], |row| {
                Ok(Company {
                    name: row.get(0)?,
                    industry: row.get(1)?,
                    description: row.get(2)?,
                })
            })
            .optional()?;

        let Some(company) = company else {
            return Ok(None);
        };

        let mut registry = Registry::with_company(company);

        let mut stmt = conn.prepare("SELECT id, name, email, role FROM profiles ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;
        for row in rows {
            let (id, name, email, role) = row?;
            registry.upsert_profile(Profile::new(id, name, email, parse_role(&role)?))?;
        }

        let mut stmt = conn.prepare("SELECT id, name, materiality FROM topics ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        for row in rows {
            let (id, name, materiality) = row?;
            registry.upsert_topic(Topic::new(id, name, parse_materiality(&materiality)?))?;
        }

        let mut stmt = conn.prepare(
            "SELECT id, name, topic_id, baseline_year, baseline_value, target_year, \
             target_value, target_type, owner_id, science_based FROM targets ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<i64>>(2)?,
                row.get::<_, i32>(3)?,
                row.get::<_, f64>(4)?,
                row.get::<_, i32>(5)?,
                row.get::<_, f64>(6)?,
                row.get::<_, String>(7)?,
                row.get::<_, Option<i64>>(8)?,
                row.get::<_, bool>(9)?,
            ))
        })?;
        for row in rows {
            let (
                id,
                name,
                topic_id,
                baseline_year,
                baseline_value,
                target_year,
                target_value,
                target_type,
                owner_id,
                science_based,
            ) = row?;
            let mut target = Target::new(id, name, baseline_year, target_year);
            target.topic_id = topic_id;
            target.baseline_value = baseline_value;
            target.target_value = target_value;
            target.target_type = parse_target_type(&target_type)?;
            target.owner_id = owner_id;
            target.science_based = science_based;
            registry.upsert_target(target)?;
        }

        let mut stmt = conn.prepare(
            "SELECT id, target_id, name, owner_id, due_date, required, status, \
             impact_on_target, notes FROM milestones ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<i64>>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, bool>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, Option<f64>>(7)?,
                row.get::<_, Option<String>>(8)?,
            ))
        })?;
        for row in rows {
            let (id, target_id, name, owner_id, due_date, required, status, impact, notes) = row?;
            let mut milestone = Milestone::new(id, target_id, name);
            milestone.owner_id = owner_id;
            milestone.due_date = parse_date(due_date)?;
            milestone.required = required;
            milestone.status = parse_status(&status)?;
            milestone.impact_on_target = impact;
            milestone.notes = notes;
            registry.upsert_milestone(milestone)?;
        }

        let mut stmt = conn.prepare(
            "SELECT id, milestone_id, documentation, owner_id, due_date, status, \
             impact_on_target FROM actions ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<i64>>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, Option<f64>>(6)?,
            ))
        })?;
        for row in rows {
            let (id, milestone_id, documentation, owner_id, due_date, status, impact) = row?;
            let mut action = Action::new(id, milestone_id, documentation);
            action.owner_id = owner_id;
            action.due_date = parse_date(due_date)?;
            action.status = parse_status(&status)?;
            action.impact_on_target = impact;
            registry.upsert_action(action)?;
        }

        let mut stmt = conn.prepare(
            "SELECT id, action_id, description, owner_id, due_date, status FROM tasks \
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<i64>>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;
        for row in rows {
            let (id, action_id, description, owner_id, due_date, status) = row?;
            let mut task = Task::new(id, action_id, description);
            task.owner_id = owner_id;
            task.due_date = parse_date(due_date)?;
            task.status = parse_status(&status)?;
            registry.upsert_task(task)?;
        }

        super::validate_registry(&registry)?;
        tracing::debug!("workspace loaded from sqlite");
        Ok(Some(registry))
    }
}
