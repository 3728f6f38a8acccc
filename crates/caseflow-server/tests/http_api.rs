//! HTTP-level tests driving the router directly.
//!
//! `test_unauthenticated_requests_rejected` runs anywhere (the pool is
//! lazy and never touched). The end-to-end test needs a PostgreSQL
//! database and is `#[ignore]`d; run it with
//! `DATABASE_URL=... cargo test -- --ignored`.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use caseflow_db::DbContext;
use caseflow_server::config::{AppState, Config};
use caseflow_server::routes;

fn test_config() -> Config {
    dotenvy::dotenv().ok();
    let mut config = Config::from_env();
    config.jwt_secret = "test-secret".to_string();
    config
}

fn lazy_state() -> AppState {
    let config = test_config();
    let pool = caseflow_db::connect_lazy(&config.database).expect("lazy pool");
    AppState::new(config, DbContext::new(pool))
}

async fn connected_state() -> AppState {
    let config = test_config();
    let pool = caseflow_db::connect(&config.database).await.expect("connect to db");
    let db = DbContext::new(pool);
    db.migrate().await.expect("run migrations");

    sqlx::query(
        "TRUNCATE cases, processes, steps, process_data, task_rules, tasks, \
         process_definitions, process_types, process_data_types, users \
         RESTART IDENTITY CASCADE",
    )
    .execute(&db.pool)
    .await
    .expect("truncate");

    AppState::new(config, db)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

async fn login(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    let form = format!("username={username}&password={password}");
    let request = Request::builder()
        .method("POST")
        .uri("/auth/token")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn token_for(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = login(app, username, password).await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_unauthenticated_requests_rejected() {
    let app = routes::router(lazy_state());

    for uri in ["/steps", "/cases", "/process-data", "/process-types", "/auth/me"] {
        let (status, body) = send(&app, "GET", uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["detail"], "Could not validate credentials");
    }

    // A syntactically invalid token is also a 401, before any DB access.
    let (status, _) = send(&app, "GET", "/steps", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_end_to_end_workflow() {
    let state = connected_state().await;
    let app = routes::router(state);

    // First registered user bootstraps as admin, later ones as user.
    let (status, body) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({"username": "root", "password": "rootpw"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "admin");

    for name in ["alice", "bob"] {
        let (status, body) = send(
            &app,
            "POST",
            "/auth/register",
            None,
            Some(json!({"username": name, "password": format!("{name}pw")})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["role"], "user");
    }

    // Duplicate usernames are rejected.
    let (status, _) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({"username": "alice", "password": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Wrong password is a 401.
    let (status, _) = login(&app, "alice", "wrong").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let admin = token_for(&app, "root", "rootpw").await;
    let alice = token_for(&app, "alice", "alicepw").await;
    let bob = token_for(&app, "bob", "bobpw").await;

    // Admin wires up the catalog: a type, a definition with its start
    // task, a second task, and the default rule redirected to it.
    let (status, body) = send(
        &app,
        "POST",
        "/process-types/",
        Some(&admin),
        Some(json!({"description": "review"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let process_type_no = body["process_type_no"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/process-definitions/",
        Some(&admin),
        Some(json!({
            "process_type_no": process_type_no,
            "version": "1",
            "is_active": true,
            "start_task_description": "intake review",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let start_task_no = body["start_task_no"].as_i64().unwrap();
    let definition_no = body["process_definition_no"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/tasks/",
        Some(&admin),
        Some(json!({
            "process_definition_no": definition_no,
            "description": "approval",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let approval_task_no = body["taskno"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", "/task-rules", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let default_rule_no = body
        .as_array()
        .unwrap()
        .iter()
        .find(|rule| rule["taskno"].as_i64() == Some(start_task_no) && rule["rule"] == "default")
        .map(|rule| rule["taskruleno"].as_i64().unwrap())
        .expect("definition creation seeds a default rule");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/task-rules/{default_rule_no}"),
        Some(&admin),
        Some(json!({"next_task_no": approval_task_no})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["next_task_no"].as_i64(), Some(approval_task_no));

    // Catalog authorization: users may read process types and statuses,
    // nothing else; writes are admin-only.
    let (status, _) = send(&app, "GET", "/process-types", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", "/statuses", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", "/tasks", Some(&alice), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(
        &app,
        "POST",
        "/process-types/",
        Some(&alice),
        Some(json!({"description": "sneaky"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Alice opens a case; the initial step sits on the start task.
    let (status, body) = send(
        &app,
        "POST",
        "/cases/",
        Some(&alice),
        Some(json!({
            "client_id": "client-1",
            "client_type": "person",
            "process_type_no": process_type_no,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let caseno = body["caseno"].as_i64().unwrap();
    assert_eq!(body["usrid"], "alice");

    let (status, body) = send(
        &app,
        "GET",
        &format!("/cases/{caseno}/current-step"),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["taskno"].as_i64(), Some(start_task_no));
    let step_no = body["stepno"].as_i64().unwrap();

    // Ownership: bob cannot see alice's case, its data is empty for him,
    // and he may not close her step.
    let (status, _) = send(&app, "GET", &format!("/cases/{caseno}"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/cases/{caseno}/process-data"),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/steps/{step_no}/close"),
        Some(&bob),
        Some(json!({"rule_data": {}})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Insufficient permissions");

    let (status, _) = send(&app, "GET", "/cases", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);

    // Alice closes her step; the default rule opens the approval step.
    let (status, body) = send(
        &app,
        "POST",
        &format!("/steps/{step_no}/close"),
        Some(&alice),
        Some(json!({"rule_data": {}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["taskno"].as_i64(), Some(approval_task_no));
    assert_eq!(body["date_ended"], Value::Null);

    // Closing the same step twice is an illegal transition.
    let (status, body) = send(
        &app,
        "POST",
        &format!("/steps/{step_no}/close"),
        Some(&alice),
        Some(json!({"rule_data": {}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Step is not busy");

    // The ledger shows both steps, oldest first.
    let (status, body) = send(
        &app,
        "GET",
        &format!("/cases/{caseno}/steps"),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let steps = body.as_array().unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0]["stepno"].as_i64(), Some(step_no));
    assert!(steps[0]["date_ended"].is_string());
    assert!(steps[1]["date_ended"].is_null());

    // Step listing stays admin-only.
    let (status, _) = send(&app, "GET", "/steps", Some(&alice), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, "GET", "/steps", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    // Listings are ownership-filtered.
    let (status, body) = send(&app, "GET", "/cases", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    let (status, body) = send(&app, "GET", "/cases", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
#[ignore]
async fn test_process_data_drives_branching() {
    let state = connected_state().await;
    let app = routes::router(state);

    send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({"username": "root", "password": "rootpw"})),
    )
    .await;
    let admin = token_for(&app, "root", "rootpw").await;

    let (_, body) = send(
        &app,
        "POST",
        "/process-types/",
        Some(&admin),
        Some(json!({"description": "claims"})),
    )
    .await;
    let process_type_no = body["process_type_no"].as_i64().unwrap();

    let (_, body) = send(
        &app,
        "POST",
        "/process-definitions/",
        Some(&admin),
        Some(json!({
            "process_type_no": process_type_no,
            "version": "1",
            "is_active": true,
            "start_task_description": "triage",
        })),
    )
    .await;
    let start_task_no = body["start_task_no"].as_i64().unwrap();
    let definition_no = body["process_definition_no"].as_i64().unwrap();

    // Two downstream tasks: escalation (via rule) and archive (default).
    let (_, body) = send(
        &app,
        "POST",
        "/tasks/",
        Some(&admin),
        Some(json!({"process_definition_no": definition_no, "description": "escalation"})),
    )
    .await;
    let escalation_no = body["taskno"].as_i64().unwrap();

    let (_, body) = send(
        &app,
        "POST",
        "/tasks/",
        Some(&admin),
        Some(json!({"process_definition_no": definition_no, "description": "archive"})),
    )
    .await;
    let archive_no = body["taskno"].as_i64().unwrap();

    let (_, body) = send(&app, "GET", "/task-rules", Some(&admin), None).await;
    let default_rule_no = body
        .as_array()
        .unwrap()
        .iter()
        .find(|rule| rule["taskno"].as_i64() == Some(start_task_no) && rule["rule"] == "default")
        .map(|rule| rule["taskruleno"].as_i64().unwrap())
        .unwrap();
    send(
        &app,
        "PUT",
        &format!("/task-rules/{default_rule_no}"),
        Some(&admin),
        Some(json!({"next_task_no": archive_no})),
    )
    .await;

    let (status, _) = send(
        &app,
        "POST",
        "/task-rules/",
        Some(&admin),
        Some(json!({
            "taskno": start_task_no,
            "rule": "procdata.amount.total == \"100\"",
            "next_task_no": escalation_no,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(
        &app,
        "POST",
        "/process-data-types/",
        Some(&admin),
        Some(json!({"description": "amount"})),
    )
    .await;
    let amount_type_no = body["process_data_type_no"].as_i64().unwrap();

    // Open the case and attach the datum the rule looks for.
    let (_, body) = send(
        &app,
        "POST",
        "/cases/",
        Some(&admin),
        Some(json!({
            "client_id": "client-9",
            "client_type": "company",
            "process_type_no": process_type_no,
        })),
    )
    .await;
    let caseno = body["caseno"].as_i64().unwrap();

    let (_, body) = send(
        &app,
        "GET",
        &format!("/cases/{caseno}/current-step"),
        Some(&admin),
        None,
    )
    .await;
    let step_no = body["stepno"].as_i64().unwrap();
    let processno = body["processno"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/processes/{processno}/data/"),
        Some(&admin),
        Some(json!({
            "process_data_type_no": amount_type_no,
            "fieldname": "total",
            "value": "100",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // The expression rule wins over the default.
    let (status, body) = send(
        &app,
        "POST",
        &format!("/steps/{step_no}/close"),
        Some(&admin),
        Some(json!({"rule_data": {}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["taskno"].as_i64(), Some(escalation_no));
}
