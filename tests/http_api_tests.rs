#![cfg(feature = "http_api")]

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
};
use esg_tool::{Registry, http_api};
use serde_json::{Value, json};
use tower::util::ServiceExt;

fn new_router() -> axum::Router {
    let state = http_api::AppState::new(Registry::new());
    http_api::router(state)
}

async fn send_form(
    app: &axum::Router,
    method: &str,
    uri: &str,
    form_body: &str,
) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(form_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

async fn send_empty(app: &axum::Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

const TARGET_FORM: &str = "name=Cut+scope+1+emissions&baseline_year=2020&baseline_value=1200.5\
&target_year=2030&target_value=600&target_type=absolute";

#[tokio::test]
async fn target_lifecycle_via_http_api() {
    let app = new_router();

    // Create target -> 201 with generated id inside the envelope
    let (status, body) = send_form(&app, "POST", "/targets", TARGET_FORM).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["id"], json!(1));
    assert_eq!(body["data"]["name"], json!("Cut scope 1 emissions"));

    // Fetch it back
    let (status, body) = send_empty(&app, "GET", "/targets/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["baseline_year"], json!(2020));

    // Delete without an admin actor is refused
    let (status, body) = send_empty(&app, "DELETE", "/targets/1").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("forbidden"));

    // Create an admin and retry
    let (status, body) = send_form(
        &app,
        "POST",
        "/profiles",
        "name=Dana&email=dana%40acme.example&role=admin",
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let admin_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) =
        send_empty(&app, "DELETE", &format!("/targets/1?actor={admin_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    // Gone
    let (status, body) = send_empty(&app, "GET", "/targets/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("not_found"));
}

#[tokio::test]
async fn create_target_missing_required_field_names_it() {
    let app = new_router();
    let (status, body) = send_form(
        &app,
        "POST",
        "/targets",
        "name=Missing+years&baseline_value=1&target_value=2&target_type=absolute",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("validation_failed"));
    assert_eq!(
        body["message"],
        json!("target is missing required field 'baseline_year'")
    );
}

#[tokio::test]
async fn progress_endpoint_reports_half_completed() {
    let app = new_router();
    send_form(&app, "POST", "/targets", TARGET_FORM).await;

    for status in ["completed", "completed", "planned", "in_progress"] {
        let form = format!("target_id=1&name=Checkpoint&status={status}");
        let (code, _) = send_form(&app, "POST", "/milestones", &form).await;
        assert_eq!(code, StatusCode::CREATED);
    }

    let (status, body) = send_empty(&app, "GET", "/targets/1/progress").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["progress"], json!(50.0));
    assert_eq!(body["data"]["milestones"]["completed"], json!(2));
}

#[tokio::test]
async fn progress_without_milestones_is_null() {
    let app = new_router();
    send_form(&app, "POST", "/targets", TARGET_FORM).await;

    let (status, body) = send_empty(&app, "GET", "/targets/1/progress").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["progress"].is_null());

    let (_, report) = send_empty(&app, "GET", "/report").await;
    assert!(report["data"]["overall"].is_null());
}

#[tokio::test]
async fn milestone_rejects_missed_deadline_status() {
    let app = new_router();
    send_form(&app, "POST", "/targets", TARGET_FORM).await;
    send_form(&app, "POST", "/milestones", "target_id=1&name=Phase+1").await;

    let (status, body) = send_form(
        &app,
        "POST",
        "/milestones/1/status",
        "status=missed_deadline",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("validation_failed"));
    assert!(
        body["message"]
            .as_str()
            .unwrap_or_default()
            .contains("only valid on tasks")
    );
}

#[tokio::test]
async fn unknown_status_value_is_rejected_with_the_allowed_list() {
    let app = new_router();
    send_form(&app, "POST", "/targets", TARGET_FORM).await;
    send_form(&app, "POST", "/milestones", "target_id=1&name=Phase+1").await;

    let (status, body) = send_form(&app, "POST", "/milestones/1/status", "status=donezo").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap_or_default()
            .contains("planned, in_progress, completed, missed_deadline")
    );
}

#[tokio::test]
async fn deadline_sweep_marks_overdue_tasks() {
    let app = new_router();
    send_form(&app, "POST", "/targets", TARGET_FORM).await;
    send_form(&app, "POST", "/milestones", "target_id=1&name=Phase+1").await;
    send_form(&app, "POST", "/actions", "milestone_id=1&documentation=Install+meters").await;
    send_form(
        &app,
        "POST",
        "/tasks",
        "action_id=1&description=Order+hardware&due_date=2025-01-10",
    )
    .await;

    let (status, body) = send_form(&app, "POST", "/tasks/deadline_sweep", "as_of=2025-02-01").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["updated"], json!(1));

    let (_, task) = send_empty(&app, "GET", "/tasks/1").await;
    assert_eq!(task["data"]["status"], json!("missed_deadline"));
}

#[tokio::test]
async fn milestone_requires_existing_target() {
    let app = new_router();
    let (status, body) = send_form(&app, "POST", "/milestones", "target_id=9&name=Orphan").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap_or_default()
            .contains("unknown target 9")
    );
}

#[tokio::test]
async fn company_update_round_trips() {
    let app = new_router();
    let (status, body) = send_form(
        &app,
        "PUT",
        "/company",
        "name=Acme+Industrial&industry=Manufacturing",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], json!("Acme Industrial"));

    let (_, body) = send_empty(&app, "GET", "/company").await;
    assert_eq!(body["data"]["industry"], json!("Manufacturing"));
}
