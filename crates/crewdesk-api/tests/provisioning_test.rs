//! Onboarding workflow tests: branch selection, transactional rollback,
//! and the error taxonomy across client types.

mod helpers;

use axum::http::StatusCode;
use serde_json::{json, Value};
use std::sync::atomic::Ordering;

use helpers::{spawn_app, staff_body};

#[tokio::test]
async fn booking_client_with_password_provisions_communication_account() {
    let app = spawn_app().await;
    let client_id = app.seed_client("MetroSuites", "booking", Some("omni-key-1")).await;

    let mut body = staff_body(client_id);
    body["password"] = json!("s3cret-pass");

    let response = app.server.post("/api/staff").json(&body).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let staff: Value = response.json();
    assert_eq!(staff["client_id"], json!(client_id));
    assert!(staff["external_ids"]["supabase"].is_null());

    // The stamped omnistack id is the one the CRM assigned
    let (crm_id, _) = app.crm.created.lock().unwrap()[0].clone();
    assert_eq!(staff["external_ids"]["omnistack"], json!(crm_id));
    assert!(staff["employee_id"]
        .as_str()
        .unwrap()
        .starts_with("EMP-"));

    // Communication-only account: CRM called, identity untouched
    assert_eq!(app.crm.created_count(), 1);
    assert_eq!(app.identity.created_count(), 0);

    let (role, _) = app
        .user_row(client_id, "jane.doe@example.com")
        .await
        .expect("user row should exist");
    assert_eq!(role, "staff");
}

#[tokio::test]
async fn sales_client_with_app_access_provisions_full_account() {
    let app = spawn_app().await;
    let client_id = app.seed_client("Brightline", "sales", Some("omni-key-2")).await;

    let mut body = staff_body(client_id);
    body["password"] = json!("s3cret-pass");
    body["can_access_app"] = json!(true);

    let response = app.server.post("/api/staff").json(&body).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let staff: Value = response.json();
    assert!(staff["external_ids"]["omnistack"].is_string());
    assert!(staff["external_ids"]["supabase"].is_string());

    assert_eq!(app.crm.created_count(), 1);
    assert_eq!(app.identity.created_count(), 1);

    let (role, _) = app
        .user_row(client_id, "jane.doe@example.com")
        .await
        .expect("user row should exist");
    assert_eq!(role, "sales");
}

#[tokio::test]
async fn record_only_branch_creates_no_accounts() {
    let app = spawn_app().await;
    let client_id = app.seed_client("Brightline", "sales", Some("omni-key-3")).await;

    // No password, no app access requested
    let response = app.server.post("/api/staff").json(&staff_body(client_id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    assert_eq!(app.crm.created_count(), 0);
    assert_eq!(app.identity.created_count(), 0);
    assert_eq!(app.user_count().await, 0);
    assert_eq!(app.staff_count().await, 1);
}

#[tokio::test]
async fn booking_client_without_crm_key_degrades_to_record_only() {
    let app = spawn_app().await;
    let client_id = app.seed_client("MetroSuites", "booking", None).await;

    let mut body = staff_body(client_id);
    body["password"] = json!("s3cret-pass");

    let response = app.server.post("/api/staff").json(&body).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(app.crm.created_count(), 0);
    assert_eq!(app.user_count().await, 0);
}

#[tokio::test]
async fn missing_email_fails_validation_with_no_rows() {
    let app = spawn_app().await;
    let client_id = app.seed_client("MetroSuites", "booking", Some("omni-key-4")).await;

    let mut body = staff_body(client_id);
    body["password"] = json!("s3cret-pass");
    body.as_object_mut().unwrap().remove("email");

    let response = app.server.post("/api/staff").json(&body).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(app.staff_count().await, 0);
    assert_eq!(app.crm.created_count(), 0);
}

#[tokio::test]
async fn sales_client_without_crm_key_is_a_configuration_error() {
    let app = spawn_app().await;
    let client_id = app.seed_client("Brightline", "sales", None).await;

    let mut body = staff_body(client_id);
    body["password"] = json!("s3cret-pass");
    body["can_access_app"] = json!(true);

    let response = app.server.post("/api/staff").json(&body).await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    let error: Value = response.json();
    assert_eq!(error["code"], "CONFIGURATION_ERROR");
    assert_eq!(app.staff_count().await, 0);
    assert_eq!(app.identity.created_count(), 0);
}

#[tokio::test]
async fn crm_outage_rolls_back_all_local_writes() {
    let app = spawn_app().await;
    let client_id = app.seed_client("MetroSuites", "booking", Some("omni-key-5")).await;
    app.crm.fail_create.store(true, Ordering::SeqCst);

    let mut body = staff_body(client_id);
    body["password"] = json!("s3cret-pass");

    let response = app.server.post("/api/staff").json(&body).await;
    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);

    let error: Value = response.json();
    assert_eq!(error["code"], "GATEWAY_ERROR");
    assert_eq!(error["recoverable"], json!(true));

    // Nothing survives the rollback, so a retry starts clean
    assert_eq!(app.staff_count().await, 0);
    assert_eq!(app.user_count().await, 0);

    app.crm.fail_create.store(false, Ordering::SeqCst);
    let retry = app.server.post("/api/staff").json(&body).await;
    assert_eq!(retry.status_code(), StatusCode::OK);
    assert_eq!(app.staff_count().await, 1);
}

#[tokio::test]
async fn identity_outage_rolls_back_full_access_onboarding() {
    let app = spawn_app().await;
    let client_id = app.seed_client("Brightline", "sales", Some("omni-key-6")).await;
    app.identity.fail_create.store(true, Ordering::SeqCst);

    let mut body = staff_body(client_id);
    body["password"] = json!("s3cret-pass");
    body["can_access_app"] = json!(true);

    let response = app.server.post("/api/staff").json(&body).await;
    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    assert_eq!(app.staff_count().await, 0);
    assert_eq!(app.user_count().await, 0);
    // Identity fails before the CRM call, so no orphan is created there
    assert_eq!(app.crm.created_count(), 0);
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let app = spawn_app().await;
    let client_id = app.seed_client("MetroSuites", "booking", Some("omni-key-7")).await;

    let body = staff_body(client_id);
    let first = app.server.post("/api/staff").json(&body).await;
    assert_eq!(first.status_code(), StatusCode::OK);

    let second = app.server.post("/api/staff").json(&body).await;
    assert_eq!(second.status_code(), StatusCode::CONFLICT);

    let error: Value = second.json();
    assert_eq!(error["code"], "CONFLICT");
    assert_eq!(app.staff_count().await, 1);
}

#[tokio::test]
async fn unknown_client_is_not_found() {
    let app = spawn_app().await;
    let body = staff_body(uuid::Uuid::new_v4());

    let response = app.server.post("/api/staff").json(&body).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_department_is_not_found() {
    let app = spawn_app().await;
    let client_id = app.seed_client("MetroSuites", "booking", None).await;

    let mut body = staff_body(client_id);
    body["department_id"] = json!(uuid::Uuid::new_v4());

    let response = app.server.post("/api/staff").json(&body).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(app.staff_count().await, 0);
}

#[tokio::test]
async fn sms_preference_requires_a_phone_number() {
    let app = spawn_app().await;
    let client_id = app.seed_client("MetroSuites", "booking", Some("omni-key-8")).await;

    let mut body = staff_body(client_id);
    body["password"] = json!("s3cret-pass");
    body["communication_preferences"] = json!({ "email": true, "sms": true });

    let response = app.server.post("/api/staff").json(&body).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(app.staff_count().await, 0);

    body["phone"] = json!("+15550100");
    let response = app.server.post("/api/staff").json(&body).await;
    assert_eq!(response.status_code(), StatusCode::OK);
}
