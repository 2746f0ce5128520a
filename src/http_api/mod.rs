use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::company::{Company, Profile, Role};
use crate::milestone::Milestone;
use crate::persistence::RegistryStore;
use crate::registry::{ProgressReport, Registry, RegistryError, TargetProgressEntry};
use crate::status::WorkStatus;
use crate::target::{Target, TargetType};
use crate::task::Task;
use crate::topic::{Materiality, Topic};

#[derive(Clone)]
pub struct AppState {
    registry: Arc<RwLock<Registry>>,
    store: Option<Arc<dyn RegistryStore + Send + Sync>>,
}

impl AppState {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
            store: None,
        }
    }

    pub fn with_shared(registry: Arc<RwLock<Registry>>) -> Self {
        Self {
            registry,
            store: None,
        }
    }

    pub fn with_store(registry: Registry, store: Arc<dyn RegistryStore + Send + Sync>) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
            store: Some(store),
        }
    }

    fn registry(&self) -> Arc<RwLock<Registry>> {
        self.registry.clone()
    }

    /// One round trip to the persistence gateway per mutation; a failed
    /// save surfaces as `database_unavailable`.
    fn persist(&self, registry: &Registry) -> Result<(), ApiError> {
        if let Some(store) = &self.store {
            store
                .save_registry(registry)
                .map_err(|err| ApiError::Database(err.to_string()))?;
        }
        Ok(())
    }
}

/// Uniform wire envelope for every response, success or failure.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

fn ok_env<T: Serialize>(message: impl Into<String>, data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        message: message.into(),
        data: Some(data),
        error: None,
    })
}

fn created_env<T: Serialize>(
    message: impl Into<String>,
    data: T,
) -> (StatusCode, Json<Envelope<T>>) {
    (
        StatusCode::CREATED,
        Json(Envelope {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }),
    )
}

#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    NotFound(String),
    Forbidden(String),
    Database(String),
    Internal(String),
}

impl ApiError {
    fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_failed",
            ApiError::NotFound(_) => "not_found",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::Database(_) => "database_unavailable",
            ApiError::Internal(_) => "unknown",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(value: RegistryError) -> Self {
        if value.is_not_found() {
            ApiError::NotFound(value.to_string())
        } else {
            ApiError::Validation(value.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Validation(m)
            | ApiError::NotFound(m)
            | ApiError::Forbidden(m)
            | ApiError::Database(m)
            | ApiError::Internal(m) => m.clone(),
        };
        let body = Json(Envelope::<()> {
            success: false,
            message,
            data: None,
            error: Some(self.kind()),
        });
        (self.status(), body).into_response()
    }
}

fn require<T>(value: Option<T>, entity: &str, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| {
        ApiError::validation(format!("{entity} is missing required field '{field}'"))
    })
}

fn parse_status_field(raw: &str) -> Result<WorkStatus, ApiError> {
    WorkStatus::from_str(raw).ok_or_else(|| {
        ApiError::validation(format!(
            "unknown status '{raw}' (expected one of: {})",
            WorkStatus::variants().join(", ")
        ))
    })
}

fn parse_date_field(raw: &str) -> Result<Option<NaiveDate>, ApiError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ApiError::validation(format!("invalid date '{raw}' (expected YYYY-MM-DD)")))
}

fn parse_target_type_field(raw: &str) -> Result<TargetType, ApiError> {
    TargetType::from_str(raw).ok_or_else(|| {
        ApiError::validation(format!(
            "unknown target type '{raw}' (expected one of: {})",
            TargetType::variants().join(", ")
        ))
    })
}

fn parse_materiality_field(raw: &str) -> Result<Materiality, ApiError> {
    Materiality::from_str(raw).ok_or_else(|| {
        ApiError::validation(format!(
            "unknown materiality '{raw}' (expected one of: {})",
            Materiality::variants().join(", ")
        ))
    })
}

fn parse_role_field(raw: &str) -> Result<Role, ApiError> {
    Role::from_str(raw)
        .ok_or_else(|| ApiError::validation(format!("unknown role '{raw}' (expected admin or member)")))
}

#[derive(Debug, Deserialize)]
struct ActorQuery {
    actor: Option<i64>,
}

fn require_admin(registry: &Registry, actor: Option<i64>) -> Result<(), ApiError> {
    let actor_id = actor.ok_or_else(|| {
        ApiError::forbidden("delete requires an admin actor (pass ?actor=<profile_id>)")
    })?;
    let profile = registry
        .find_profile(actor_id)
        .ok_or_else(|| ApiError::forbidden(format!("actor profile {actor_id} not found")))?;
    if !profile.role.is_admin() {
        return Err(ApiError::forbidden(format!(
            "profile {actor_id} is not an admin"
        )));
    }
    Ok(())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/company", get(get_company).put(update_company))
        .route("/profiles", get(list_profiles).post(create_profile))
        .route("/profiles/:id", delete(delete_profile))
        .route("/topics", get(list_topics).post(create_topic))
        .route(
            "/topics/:id",
            get(get_topic).put(update_topic).delete(delete_topic),
        )
        .route("/targets", get(list_targets).post(create_target))
        .route(
            "/targets/:id",
            get(get_target).put(update_target).delete(delete_target),
        )
        .route("/targets/:id/progress", get(target_progress))
        .route("/milestones", get(list_milestones).post(create_milestone))
        .route(
            "/milestones/:id",
            get(get_milestone)
                .put(update_milestone)
                .delete(delete_milestone),
        )
        .route("/milestones/:id/status", post(set_milestone_status))
        .route("/actions", get(list_actions).post(create_action))
        .route(
            "/actions/:id",
            get(get_action).put(update_action).delete(delete_action),
        )
        .route("/actions/:id/status", post(set_action_status))
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/tasks/:id/status", post(set_task_status))
        .route("/tasks/deadline_sweep", post(deadline_sweep))
        .route("/report", get(report))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "http api listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    ok_env("ok", serde_json::json!({ "status": "ok" }))
}

// --- company ---

#[derive(Debug, Deserialize)]
struct CompanyPayload {
    name: Option<String>,
    industry: Option<String>,
    description: Option<String>,
}

async fn get_company(State(state): State<AppState>) -> Json<Envelope<Company>> {
    let registry = state.registry();
    let company = registry.read().company().clone();
    ok_env("ok", company)
}

async fn update_company(
    State(state): State<AppState>,
    Form(payload): Form<CompanyPayload>,
) -> Result<Json<Envelope<Company>>, ApiError> {
    let registry = state.registry();
    let company = {
        let mut guard = registry.write();
        let mut company = guard.company().clone();
        if let Some(name) = payload.name {
            company.name = name;
        }
        if let Some(industry) = payload.industry {
            company.industry = Some(industry);
        }
        if let Some(description) = payload.description {
            company.description = Some(description);
        }
        guard.set_company(company).map_err(ApiError::from)?;
        state.persist(&guard)?;
        guard.company().clone()
    };
    Ok(ok_env("company updated", company))
}

// --- profiles ---

#[derive(Debug, Deserialize)]
struct ProfilePayload {
    name: Option<String>,
    email: Option<String>,
    role: Option<String>,
}

async fn list_profiles(State(state): State<AppState>) -> Json<Envelope<Vec<Profile>>> {
    let registry = state.registry();
    let profiles = registry.read().profiles().to_vec();
    ok_env("ok", profiles)
}

async fn create_profile(
    State(state): State<AppState>,
    Form(payload): Form<ProfilePayload>,
) -> Result<(StatusCode, Json<Envelope<Profile>>), ApiError> {
    let name = require(payload.name, "profile", "name")?;
    let email = require(payload.email, "profile", "email")?;
    let role = match payload.role {
        Some(raw) => parse_role_field(&raw)?,
        None => Role::Member,
    };
    let registry = state.registry();
    let created = {
        let mut guard = registry.write();
        let id = guard
            .create_profile(Profile::new(0, name, email, role))
            .map_err(ApiError::from)?;
        state.persist(&guard)?;
        guard
            .find_profile(id)
            .cloned()
            .ok_or_else(|| ApiError::internal("profile not found after creation"))?
    };
    Ok(created_env(format!("profile {} created", created.id), created))
}

async fn delete_profile(
    State(state): State<AppState>,
    Path(profile_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let registry = state.registry();
    {
        let mut guard = registry.write();
        require_admin(&guard, query.actor)?;
        if !guard.delete_profile(profile_id) {
            return Err(ApiError::not_found(format!(
                "profile {profile_id} not found"
            )));
        }
        state.persist(&guard)?;
    }
    Ok(ok_env(format!("profile {profile_id} deleted"), ()))
}

// --- topics ---

#[derive(Debug, Deserialize)]
struct TopicPayload {
    name: Option<String>,
    materiality: Option<String>,
}

async fn list_topics(State(state): State<AppState>) -> Json<Envelope<Vec<Topic>>> {
    let registry = state.registry();
    let topics = registry.read().topics().to_vec();
    ok_env("ok", topics)
}

async fn create_topic(
    State(state): State<AppState>,
    Form(payload): Form<TopicPayload>,
) -> Result<(StatusCode, Json<Envelope<Topic>>), ApiError> {
    let name = require(payload.name, "topic", "name")?;
    let materiality = match payload.materiality {
        Some(raw) => parse_materiality_field(&raw)?,
        None => Materiality::ToAssess,
    };
    let registry = state.registry();
    let created = {
        let mut guard = registry.write();
        let id = guard
            .create_topic(Topic::new(0, name, materiality))
            .map_err(ApiError::from)?;
        state.persist(&guard)?;
        guard
            .find_topic(id)
            .cloned()
            .ok_or_else(|| ApiError::internal("topic not found after creation"))?
    };
    Ok(created_env(format!("topic {} created", created.id), created))
}

async fn get_topic(
    State(state): State<AppState>,
    Path(topic_id): Path<i64>,
) -> Result<Json<Envelope<Topic>>, ApiError> {
    let registry = state.registry();
    let topic = registry
        .read()
        .find_topic(topic_id)
        .cloned()
        .ok_or_else(|| ApiError::not_found(format!("topic {topic_id} not found")))?;
    Ok(ok_env("ok", topic))
}

async fn update_topic(
    State(state): State<AppState>,
    Path(topic_id): Path<i64>,
    Form(payload): Form<TopicPayload>,
) -> Result<Json<Envelope<Topic>>, ApiError> {
    let registry = state.registry();
    let updated = {
        let mut guard = registry.write();
        let mut topic = guard
            .find_topic(topic_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("topic {topic_id} not found")))?;
        if let Some(name) = payload.name {
            topic.name = name;
        }
        if let Some(raw) = payload.materiality {
            topic.materiality = parse_materiality_field(&raw)?;
        }
        guard.upsert_topic(topic).map_err(ApiError::from)?;
        state.persist(&guard)?;
        guard
            .find_topic(topic_id)
            .cloned()
            .ok_or_else(|| ApiError::internal("topic not found after update"))?
    };
    Ok(ok_env(format!("topic {topic_id} updated"), updated))
}

async fn delete_topic(
    State(state): State<AppState>,
    Path(topic_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let registry = state.registry();
    {
        let mut guard = registry.write();
        require_admin(&guard, query.actor)?;
        if !guard.delete_topic(topic_id) {
            return Err(ApiError::not_found(format!("topic {topic_id} not found")));
        }
        state.persist(&guard)?;
    }
    Ok(ok_env(format!("topic {topic_id} deleted"), ()))
}

// --- targets ---

#[derive(Debug, Deserialize)]
struct TargetPayload {
    name: Option<String>,
    topic_id: Option<i64>,
    baseline_year: Option<i32>,
    baseline_value: Option<f64>,
    target_year: Option<i32>,
    target_value: Option<f64>,
    target_type: Option<String>,
    owner_id: Option<i64>,
    science_based: Option<bool>,
}

async fn list_targets(State(state): State<AppState>) -> Json<Envelope<Vec<Target>>> {
    let registry = state.registry();
    let targets = registry.read().targets().to_vec();
    ok_env("ok", targets)
}

async fn create_target(
    State(state): State<AppState>,
    Form(payload): Form<TargetPayload>,
) -> Result<(StatusCode, Json<Envelope<Target>>), ApiError> {
    let name = require(payload.name, "target", "name")?;
    let baseline_year = require(payload.baseline_year, "target", "baseline_year")?;
    let baseline_value = require(payload.baseline_value, "target", "baseline_value")?;
    let target_year = require(payload.target_year, "target", "target_year")?;
    let target_value = require(payload.target_value, "target", "target_value")?;
    let target_type =
        parse_target_type_field(&require(payload.target_type, "target", "target_type")?)?;

    let mut draft = Target::new(0, name, baseline_year, target_year);
    draft.baseline_value = baseline_value;
    draft.target_value = target_value;
    draft.target_type = target_type;
    draft.topic_id = payload.topic_id;
    draft.owner_id = payload.owner_id;
    draft.science_based = payload.science_based.unwrap_or(false);

    let registry = state.registry();
    let created = {
        let mut guard = registry.write();
        let id = guard.create_target(draft).map_err(ApiError::from)?;
        state.persist(&guard)?;
        guard
            .find_target(id)
            .cloned()
            .ok_or_else(|| ApiError::internal("target not found after creation"))?
    };
    Ok(created_env(format!("target {} created", created.id), created))
}

async fn get_target(
    State(state): State<AppState>,
    Path(target_id): Path<i64>,
) -> Result<Json<Envelope<Target>>, ApiError> {
    let registry = state.registry();
    let target = registry
        .read()
        .find_target(target_id)
        .cloned()
        .ok_or_else(|| ApiError::not_found(format!("target {target_id} not found")))?;
    Ok(ok_env("ok", target))
}

async fn update_target(
    State(state): State<AppState>,
    Path(target_id): Path<i64>,
    Form(payload): Form<TargetPayload>,
) -> Result<Json<Envelope<Target>>, ApiError> {
    let registry = state.registry();
    let updated = {
        let mut guard = registry.write();
        let mut target = guard
            .find_target(target_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("target {target_id} not found")))?;
        if let Some(name) = payload.name {
            target.name = name;
        }
        if let Some(topic_id) = payload.topic_id {
            target.topic_id = Some(topic_id);
        }
        if let Some(year) = payload.baseline_year {
            target.baseline_year = year;
        }
        if let Some(value) = payload.baseline_value {
            target.baseline_value = value;
        }
        if let Some(year) = payload.target_year {
            target.target_year = year;
        }
        if let Some(value) = payload.target_value {
            target.target_value = value;
        }
        if let Some(raw) = payload.target_type {
            target.target_type = parse_target_type_field(&raw)?;
        }
        if let Some(owner_id) = payload.owner_id {
            target.owner_id = Some(owner_id);
        }
        if let Some(science_based) = payload.science_based {
            target.science_based = science_based;
        }
        guard.upsert_target(target).map_err(ApiError::from)?;
        state.persist(&guard)?;
        guard
            .find_target(target_id)
            .cloned()
            .ok_or_else(|| ApiError::internal("target not found after update"))?
    };
    Ok(ok_env(format!("target {target_id} updated"), updated))
}

async fn delete_target(
    State(state): State<AppState>,
    Path(target_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let registry = state.registry();
    {
        let mut guard = registry.write();
        require_admin(&guard, query.actor)?;
        if !guard.delete_target(target_id) {
            return Err(ApiError::not_found(format!("target {target_id} not found")));
        }
        state.persist(&guard)?;
    }
    Ok(ok_env(format!("target {target_id} deleted"), ()))
}

async fn target_progress(
    State(state): State<AppState>,
    Path(target_id): Path<i64>,
) -> Result<Json<Envelope<TargetProgressEntry>>, ApiError> {
    let registry = state.registry();
    let entry = registry
        .read()
        .target_progress_entry(target_id)
        .map_err(ApiError::from)?;
    Ok(ok_env("ok", entry))
}

// --- milestones ---

#[derive(Debug, Deserialize)]
struct MilestonePayload {
    target_id: Option<i64>,
    name: Option<String>,
    owner_id: Option<i64>,
    due_date: Option<String>,
    required: Option<bool>,
    status: Option<String>,
    impact_on_target: Option<f64>,
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MilestoneFilter {
    target: Option<i64>,
}

async fn list_milestones(
    State(state): State<AppState>,
    Query(filter): Query<MilestoneFilter>,
) -> Json<Envelope<Vec<Milestone>>> {
    let registry = state.registry();
    let guard = registry.read();
    let milestones: Vec<Milestone> = match filter.target {
        Some(target_id) => guard
            .milestones_for(target_id)
            .into_iter()
            .cloned()
            .collect(),
        None => guard.milestones().to_vec(),
    };
    ok_env("ok", milestones)
}

async fn create_milestone(
    State(state): State<AppState>,
    Form(payload): Form<MilestonePayload>,
) -> Result<(StatusCode, Json<Envelope<Milestone>>), ApiError> {
    let target_id = require(payload.target_id, "milestone", "target_id")?;
    let name = require(payload.name, "milestone", "name")?;

    let mut draft = Milestone::new(0, target_id, name);
    draft.owner_id = payload.owner_id;
    if let Some(raw) = payload.due_date {
        draft.due_date = parse_date_field(&raw)?;
    }
    draft.required = payload.required.unwrap_or(false);
    if let Some(raw) = payload.status {
        draft.status = parse_status_field(&raw)?;
    }
    draft.impact_on_target = payload.impact_on_target;
    draft.notes = payload.notes;

    let registry = state.registry();
    let created = {
        let mut guard = registry.write();
        let id = guard.create_milestone(draft).map_err(ApiError::from)?;
        state.persist(&guard)?;
        guard
            .find_milestone(id)
            .cloned()
            .ok_or_else(|| ApiError::internal("milestone not found after creation"))?
    };
    Ok(created_env(
        format!("milestone {} created", created.id),
        created,
    ))
}

async fn get_milestone(
    State(state): State<AppState>,
    Path(milestone_id): Path<i64>,
) -> Result<Json<Envelope<Milestone>>, ApiError> {
    let registry = state.registry();
    let milestone = registry
        .read()
        .find_milestone(milestone_id)
        .cloned()
        .ok_or_else(|| ApiError::not_found(format!("milestone {milestone_id} not found")))?;
    Ok(ok_env("ok", milestone))
}

async fn update_milestone(
    State(state): State<AppState>,
    Path(milestone_id): Path<i64>,
    Form(payload): Form<MilestonePayload>,
) -> Result<Json<Envelope<Milestone>>, ApiError> {
    let registry = state.registry();
    let updated = {
        let mut guard = registry.write();
        let mut milestone = guard
            .find_milestone(milestone_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("milestone {milestone_id} not found")))?;
        if let Some(target_id) = payload.target_id {
            milestone.target_id = target_id;
        }
        if let Some(name) = payload.name {
            milestone.name = name;
        }
        if let Some(owner_id) = payload.owner_id {
            milestone.owner_id = Some(owner_id);
        }
        if let Some(raw) = payload.due_date {
            milestone.due_date = parse_date_field(&raw)?;
        }
        if let Some(required) = payload.required {
            milestone.required = required;
        }
        if let Some(raw) = payload.status {
            milestone.status = parse_status_field(&raw)?;
        }
        if let Some(impact) = payload.impact_on_target {
            milestone.impact_on_target = Some(impact);
        }
        if let Some(notes) = payload.notes {
            milestone.notes = Some(notes);
        }
        guard.upsert_milestone(milestone).map_err(ApiError::from)?;
        state.persist(&guard)?;
        guard
            .find_milestone(milestone_id)
            .cloned()
            .ok_or_else(|| ApiError::internal("milestone not found after update"))?
    };
    Ok(ok_env(format!("milestone {milestone_id} updated"), updated))
}

#[derive(Debug, Deserialize)]
struct StatusPayload {
    status: Option<String>,
}

async fn set_milestone_status(
    State(state): State<AppState>,
    Path(milestone_id): Path<i64>,
    Form(payload): Form<StatusPayload>,
) -> Result<Json<Envelope<Milestone>>, ApiError> {
    let status = parse_status_field(&require(payload.status, "status update", "status")?)?;
    let registry = state.registry();
    let updated = {
        let mut guard = registry.write();
        guard
            .set_milestone_status(milestone_id, status)
            .map_err(ApiError::from)?;
        state.persist(&guard)?;
        guard
            .find_milestone(milestone_id)
            .cloned()
            .ok_or_else(|| ApiError::internal("milestone not found after status update"))?
    };
    Ok(ok_env(
        format!("milestone {milestone_id} status set to {status}"),
        updated,
    ))
}

async fn delete_milestone(
    State(state): State<AppState>,
    Path(milestone_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let registry = state.registry();
    {
        let mut guard = registry.write();
        require_admin(&guard, query.actor)?;
        if !guard.delete_milestone(milestone_id) {
            return Err(ApiError::not_found(format!(
                "milestone {milestone_id} not found"
            )));
        }
        state.persist(&guard)?;
    }
    Ok(ok_env(format!("milestone {milestone_id} deleted"), ()))
}

// --- actions ---

#[derive(Debug, Deserialize)]
struct ActionPayload {
    milestone_id: Option<i64>,
    documentation: Option<String>,
    owner_id: Option<i64>,
    due_date: Option<String>,
    status: Option<String>,
    impact_on_target: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ActionFilter {
    milestone: Option<i64>,
}

async fn list_actions(
    State(state): State<AppState>,
    Query(filter): Query<ActionFilter>,
) -> Json<Envelope<Vec<Action>>> {
    let registry = state.registry();
    let guard = registry.read();
    let actions: Vec<Action> = match filter.milestone {
        Some(milestone_id) => guard
            .actions_for(milestone_id)
            .into_iter()
            .cloned()
            .collect(),
        None => guard.actions().to_vec(),
    };
    ok_env("ok", actions)
}

async fn create_action(
    State(state): State<AppState>,
    Form(payload): Form<ActionPayload>,
) -> Result<(StatusCode, Json<Envelope<Action>>), ApiError> {
    let milestone_id = require(payload.milestone_id, "action", "milestone_id")?;
    let documentation = require(payload.documentation, "action", "documentation")?;

    let mut draft = Action::new(0, milestone_id, documentation);
    draft.owner_id = payload.owner_id;
    if let Some(raw) = payload.due_date {
        draft.due_date = parse_date_field(&raw)?;
    }
    if let Some(raw) = payload.status {
        draft.status = parse_status_field(&raw)?;
    }
    draft.impact_on_target = payload.impact_on_target;

    let registry = state.registry();
    let created = {
        let mut guard = registry.write();
        let id = guard.create_action(draft).map_err(ApiError::from)?;
        state.persist(&guard)?;
        guard
            .find_action(id)
            .cloned()
            .ok_or_else(|| ApiError::internal("action not found after creation"))?
    };
    Ok(created_env(format!("action {} created", created.id), created))
}

async fn get_action(
    State(state): State<AppState>,
    Path(action_id): Path<i64>,
) -> Result<Json<Envelope<Action>>, ApiError> {
    let registry = state.registry();
    let action = registry
        .read()
        .find_action(action_id)
        .cloned()
        .ok_or_else(|| ApiError::not_found(format!("action {action_id} not found")))?;
    Ok(ok_env("ok", action))
}

async fn update_action(
    State(state): State<AppState>,
    Path(action_id): Path<i64>,
    Form(payload): Form<ActionPayload>,
) -> Result<Json<Envelope<Action>>, ApiError> {
    let registry = state.registry();
    let updated = {
        let mut guard = registry.write();
        let mut action = guard
            .find_action(action_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("action {action_id} not found")))?;
        if let Some(milestone_id) = payload.milestone_id {
            action.milestone_id = milestone_id;
        }
        if let Some(documentation) = payload.documentation {
            action.documentation = documentation;
        }
        if let Some(owner_id) = payload.owner_id {
            action.owner_id = Some(owner_id);
        }
        if let Some(raw) = payload.due_date {
            action.due_date = parse_date_field(&raw)?;
        }
        if let Some(raw) = payload.status {
            action.status = parse_status_field(&raw)?;
        }
        if let Some(impact) = payload.impact_on_target {
            action.impact_on_target = Some(impact);
        }
        guard.upsert_action(action).map_err(ApiError::from)?;
        state.persist(&guard)?;
        guard
            .find_action(action_id)
            .cloned()
            .ok_or_else(|| ApiError::internal("action not found after update"))?
    };
    Ok(ok_env(format!("action {action_id} updated"), updated))
}

async fn set_action_status(
    State(state): State<AppState>,
    Path(action_id): Path<i64>,
    Form(payload): Form<StatusPayload>,
) -> Result<Json<Envelope<Action>>, ApiError> {
    let status = parse_status_field(&require(payload.status, "status update", "status")?)?;
    let registry = state.registry();
    let updated = {
        let mut guard = registry.write();
        guard
            .set_action_status(action_id, status)
            .map_err(ApiError::from)?;
        state.persist(&guard)?;
        guard
            .find_action(action_id)
            .cloned()
            .ok_or_else(|| ApiError::internal("action not found after status update"))?
    };
    Ok(ok_env(
        format!("action {action_id} status set to {status}"),
        updated,
    ))
}

async fn delete_action(
    State(state): State<AppState>,
    Path(action_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let registry = state.registry();
    {
        let mut guard = registry.write();
        require_admin(&guard, query.actor)?;
        if !guard.delete_action(action_id) {
            return Err(ApiError::not_found(format!("action {action_id} not found")));
        }
        state.persist(&guard)?;
    }
    Ok(ok_env(format!("action {action_id} deleted"), ()))
}

// --- tasks ---

#[derive(Debug, Deserialize)]
struct TaskPayload {
    action_id: Option<i64>,
    description: Option<String>,
    owner_id: Option<i64>,
    due_date: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TaskFilter {
    action: Option<i64>,
}

async fn list_tasks(
    State(state): State<AppState>,
    Query(filter): Query<TaskFilter>,
) -> Json<Envelope<Vec<Task>>> {
    let registry = state.registry();
    let guard = registry.read();
    let tasks: Vec<Task> = match filter.action {
        Some(action_id) => guard.tasks_for(action_id).into_iter().cloned().collect(),
        None => guard.tasks().to_vec(),
    };
    ok_env("ok", tasks)
}

async fn create_task(
    State(state): State<AppState>,
    Form(payload): Form<TaskPayload>,
) -> Result<(StatusCode, Json<Envelope<Task>>), ApiError> {
    let action_id = require(payload.action_id, "task", "action_id")?;
    let description = require(payload.description, "task", "description")?;

    let mut draft = Task::new(0, action_id, description);
    draft.owner_id = payload.owner_id;
    if let Some(raw) = payload.due_date {
        draft.due_date = parse_date_field(&raw)?;
    }
    if let Some(raw) = payload.status {
        draft.status = parse_status_field(&raw)?;
    }

    let registry = state.registry();
    let created = {
        let mut guard = registry.write();
        let id = guard.create_task(draft).map_err(ApiError::from)?;
        state.persist(&guard)?;
        guard
            .find_task(id)
            .cloned()
            .ok_or_else(|| ApiError::internal("task not found after creation"))?
    };
    Ok(created_env(format!("task {} created", created.id), created))
}

async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
) -> Result<Json<Envelope<Task>>, ApiError> {
    let registry = state.registry();
    let task = registry
        .read()
        .find_task(task_id)
        .cloned()
        .ok_or_else(|| ApiError::not_found(format!("task {task_id} not found")))?;
    Ok(ok_env("ok", task))
}

async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
    Form(payload): Form<TaskPayload>,
) -> Result<Json<Envelope<Task>>, ApiError> {
    let registry = state.registry();
    let updated = {
        let mut guard = registry.write();
        let mut task = guard
            .find_task(task_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("task {task_id} not found")))?;
        if let Some(action_id) = payload.action_id {
            task.action_id = action_id;
        }
        if let Some(description) = payload.description {
            task.description = description;
        }
        if let Some(owner_id) = payload.owner_id {
            task.owner_id = Some(owner_id);
        }
        if let Some(raw) = payload.due_date {
            task.due_date = parse_date_field(&raw)?;
        }
        if let Some(raw) = payload.status {
            task.status = parse_status_field(&raw)?;
        }
        guard.upsert_task(task).map_err(ApiError::from)?;
        state.persist(&guard)?;
        guard
            .find_task(task_id)
            .cloned()
            .ok_or_else(|| ApiError::internal("task not found after update"))?
    };
    Ok(ok_env(format!("task {task_id} updated"), updated))
}

async fn set_task_status(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
    Form(payload): Form<StatusPayload>,
) -> Result<Json<Envelope<Task>>, ApiError> {
    let status = parse_status_field(&require(payload.status, "status update", "status")?)?;
    let registry = state.registry();
    let updated = {
        let mut guard = registry.write();
        guard
            .set_task_status(task_id, status)
            .map_err(ApiError::from)?;
        state.persist(&guard)?;
        guard
            .find_task(task_id)
            .cloned()
            .ok_or_else(|| ApiError::internal("task not found after status update"))?
    };
    Ok(ok_env(
        format!("task {task_id} status set to {status}"),
        updated,
    ))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let registry = state.registry();
    {
        let mut guard = registry.write();
        require_admin(&guard, query.actor)?;
        if !guard.delete_task(task_id) {
            return Err(ApiError::not_found(format!("task {task_id} not found")));
        }
        state.persist(&guard)?;
    }
    Ok(ok_env(format!("task {task_id} deleted"), ()))
}

#[derive(Debug, Deserialize)]
struct SweepPayload {
    as_of: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SweepResult {
    pub as_of: NaiveDate,
    pub updated: usize,
}

async fn deadline_sweep(
    State(state): State<AppState>,
    Form(payload): Form<SweepPayload>,
) -> Result<Json<Envelope<SweepResult>>, ApiError> {
    let as_of = match payload.as_of {
        Some(raw) => parse_date_field(&raw)?
            .ok_or_else(|| ApiError::validation("sweep is missing required field 'as_of'"))?,
        None => chrono::Local::now().date_naive(),
    };
    let registry = state.registry();
    let updated = {
        let mut guard = registry.write();
        let updated = guard.sweep_missed_deadlines(as_of);
        if updated > 0 {
            state.persist(&guard)?;
        }
        updated
    };
    Ok(ok_env(
        format!("{updated} task(s) marked missed_deadline"),
        SweepResult { as_of, updated },
    ))
}

// --- report ---

async fn report(State(state): State<AppState>) -> Json<Envelope<ProgressReport>> {
    let registry = state.registry();
    let report = registry.read().progress_report();
    ok_env("ok", report)
}
