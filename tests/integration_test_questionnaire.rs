mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{AuthHeaders, TestApp};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn authed(method: &str, uri: &str, auth: &AuthHeaders, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, format!("access_token={}", auth.access_token))
        .header("X-CSRF-Token", &auth.csrf_token);
    match body {
        Some(v) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &TestApp, req: Request<Body>) -> axum::response::Response {
    app.router.clone().oneshot(req).await.unwrap()
}

fn full_payload() -> Value {
    json!({
        "weight": 82.5,
        "height": 180.0,
        "birthday": "1991-06-14",
        "health_issues": "Lower back pain",
        "bad_habits": "Late-night snacking",
        "workout_environment": "gym",
        "work_shift": "morning",
        "wake_up_time": "06:30",
        "sleep_time": "23:00",
        "morning_routine": "Stretching, coffee",
        "evening_routine": "Short walk"
    })
}

#[tokio::test]
async fn test_questionnaire_lifecycle() {
    let app = TestApp::new().await;
    let auth = app.login_client().await;

    let res = send(&app, authed("GET", "/api/v1/questionnaire", &auth, None)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = send(
        &app,
        authed("POST", "/api/v1/questionnaire", &auth, Some(full_payload())),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = parse_body(res).await;
    assert_eq!(created["weight"], 82.5);
    assert_eq!(created["workout_environment"], "gym");
    assert_eq!(created["work_shift"], "morning");
    assert_eq!(created["birthday"], "1991-06-14");

    let res = send(&app, authed("GET", "/api/v1/questionnaire", &auth, None)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let fetched = parse_body(res).await;
    assert_eq!(fetched["id"], created["id"]);
    assert_eq!(fetched["wake_up_time"], "06:30");
}

#[tokio::test]
async fn test_duplicate_submission_conflicts() {
    let app = TestApp::new().await;
    let auth = app.login_client().await;

    let res = send(
        &app,
        authed("POST", "/api/v1/questionnaire", &auth, Some(full_payload())),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = send(
        &app,
        authed("POST", "/api/v1/questionnaire", &auth, Some(full_payload())),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_partial_update_keeps_other_answers() {
    let app = TestApp::new().await;
    let auth = app.login_client().await;

    let res = send(
        &app,
        authed("POST", "/api/v1/questionnaire", &auth, Some(full_payload())),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = send(
        &app,
        authed(
            "PATCH",
            "/api/v1/questionnaire",
            &auth,
            Some(json!({"weight": 79.0, "workout_environment": "outdoor"})),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = parse_body(res).await;
    assert_eq!(updated["weight"], 79.0);
    assert_eq!(updated["workout_environment"], "outdoor");
    assert_eq!(updated["height"], 180.0);
    assert_eq!(updated["sleep_time"], "23:00");
}

#[tokio::test]
async fn test_update_without_submission_is_not_found() {
    let app = TestApp::new().await;
    let auth = app.login_client().await;

    let res = send(
        &app,
        authed("PATCH", "/api/v1/questionnaire", &auth, Some(json!({"weight": 70.0}))),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_positive_measurements_rejected() {
    let app = TestApp::new().await;
    let auth = app.login_client().await;

    let res = send(
        &app,
        authed("POST", "/api/v1/questionnaire", &auth, Some(json!({"weight": -3.0}))),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = send(
        &app,
        authed("POST", "/api/v1/questionnaire", &auth, Some(json!({"height": 0.0}))),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_questionnaire_is_scoped_to_caller() {
    let app = TestApp::new().await;
    let client = app.login_client().await;
    let admin = app.login_admin().await;

    let res = send(
        &app,
        authed("POST", "/api/v1/questionnaire", &client, Some(full_payload())),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    // The admin has not filled one in; the client's answers stay private.
    let res = send(&app, authed("GET", "/api/v1/questionnaire", &admin, None)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
