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

#[tokio::test]
async fn test_create_and_fetch_event() {
    let app = TestApp::new().await;
    let auth = app.login_client().await;

    let res = app
        .router
        .clone()
        .oneshot(authed(
            "POST",
            "/api/v1/events",
            &auth,
            Some(json!({
                "title": "Morning run",
                "description": "Easy pace",
                "start_time": "2024-03-01T08:00:00",
                "end_time": "2024-03-01T09:00:00"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = parse_body(res).await;
    assert_eq!(created["title"], "Morning run");
    assert_eq!(created["start_time"], "2024-03-01T08:00:00");
    assert_eq!(created["repeat_type"], "none");
    assert_eq!(created["is_repeat_instance"], false);
    let id = created["id"].as_i64().unwrap();

    let res = app
        .router
        .clone()
        .oneshot(authed("GET", &format!("/api/v1/events/{}", id), &auth, None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let detail = parse_body(res).await;
    assert_eq!(detail["title"], "Morning run");
    assert_eq!(detail["user_name"], "Carl Client");
    assert_eq!(detail["creator_name"], "Carl Client");
}

#[tokio::test]
async fn test_create_rejects_inverted_time_range() {
    let app = TestApp::new().await;
    let auth = app.login_client().await;

    let res = app
        .router
        .clone()
        .oneshot(authed(
            "POST",
            "/api/v1/events",
            &auth,
            Some(json!({
                "title": "Broken",
                "start_time": "2024-03-01T10:00:00",
                "end_time": "2024-03-01T09:00:00"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_client_cannot_schedule_on_other_calendar() {
    let app = TestApp::new().await;
    let auth = app.login_client().await;

    let res = app
        .router
        .clone()
        .oneshot(authed(
            "POST",
            "/api/v1/events",
            &auth,
            Some(json!({
                "title": "Not yours",
                "user_id": app.admin_id,
                "start_time": "2024-03-01T08:00:00",
                "end_time": "2024-03-01T09:00:00"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_schedules_for_client() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;

    let res = app
        .router
        .clone()
        .oneshot(authed(
            "POST",
            "/api/v1/events",
            &auth,
            Some(json!({
                "title": "Leg day",
                "user_id": app.client_id,
                "start_time": "2024-03-01T17:00:00",
                "end_time": "2024-03-01T18:00:00"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = parse_body(res).await;
    assert_eq!(created["user_id"].as_i64().unwrap(), app.client_id);
    assert_eq!(created["created_by"].as_i64().unwrap(), app.admin_id);

    // Shows up on the client's own calendar.
    let client_auth = app.login_client().await;
    let res = app
        .router
        .clone()
        .oneshot(authed("GET", "/api/v1/events", &client_auth, None))
        .await
        .unwrap();
    let events = parse_body(res).await;
    assert_eq!(events.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_client_cannot_list_other_users_calendar() {
    let app = TestApp::new().await;
    let auth = app.login_client().await;

    let res = app
        .router
        .clone()
        .oneshot(authed(
            "GET",
            &format!("/api/v1/events?user_id={}", app.admin_id),
            &auth,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_patch_updates_whole_event() {
    let app = TestApp::new().await;
    let auth = app.login_client().await;

    let res = app
        .router
        .clone()
        .oneshot(authed(
            "POST",
            "/api/v1/events",
            &auth,
            Some(json!({
                "title": "Old title",
                "start_time": "2024-03-01T08:00:00",
                "end_time": "2024-03-01T09:00:00"
            })),
        ))
        .await
        .unwrap();
    let id = parse_body(res).await["id"].as_i64().unwrap();

    let res = app
        .router
        .clone()
        .oneshot(authed(
            "PATCH",
            &format!("/api/v1/events/{}", id),
            &auth,
            Some(json!({ "title": "New title", "description": "Updated" })),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated = parse_body(res).await;
    assert_eq!(updated["title"], "New title");
    assert_eq!(updated["description"], "Updated");
    // Untouched fields survive.
    assert_eq!(updated["start_time"], "2024-03-01T08:00:00");
}

#[tokio::test]
async fn test_unknown_scope_is_rejected() {
    let app = TestApp::new().await;
    let auth = app.login_client().await;

    let res = app
        .router
        .clone()
        .oneshot(authed(
            "POST",
            "/api/v1/events",
            &auth,
            Some(json!({
                "title": "Series",
                "start_time": "2024-03-01T08:00:00",
                "end_time": "2024-03-01T09:00:00",
                "repeat_type": "daily"
            })),
        ))
        .await
        .unwrap();
    let id = parse_body(res).await["id"].as_i64().unwrap();

    let res = app
        .router
        .clone()
        .oneshot(authed(
            "PATCH",
            &format!("/api/v1/events/{}", id),
            &auth,
            Some(json!({ "scope": "everything", "title": "x" })),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .router
        .clone()
        .oneshot(authed(
            "DELETE",
            &format!("/api/v1/events/{}", id),
            &auth,
            Some(json!({ "scope": "everything" })),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_event() {
    let app = TestApp::new().await;
    let auth = app.login_client().await;

    let res = app
        .router
        .clone()
        .oneshot(authed(
            "POST",
            "/api/v1/events",
            &auth,
            Some(json!({
                "title": "Doomed",
                "start_time": "2024-03-01T08:00:00",
                "end_time": "2024-03-01T09:00:00"
            })),
        ))
        .await
        .unwrap();
    let id = parse_body(res).await["id"].as_i64().unwrap();

    let res = app
        .router
        .clone()
        .oneshot(authed("DELETE", &format!("/api/v1/events/{}", id), &auth, None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .router
        .clone()
        .oneshot(authed("GET", &format!("/api/v1/events/{}", id), &auth, None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_client_cannot_edit_admin_created_event() {
    let app = TestApp::new().await;
    let admin_auth = app.login_admin().await;

    let res = app
        .router
        .clone()
        .oneshot(authed(
            "POST",
            "/api/v1/events",
            &admin_auth,
            Some(json!({
                "title": "Coach session",
                "user_id": app.client_id,
                "start_time": "2024-03-01T08:00:00",
                "end_time": "2024-03-01T09:00:00"
            })),
        ))
        .await
        .unwrap();
    let id = parse_body(res).await["id"].as_i64().unwrap();

    let client_auth = app.login_client().await;
    let res = app
        .router
        .clone()
        .oneshot(authed(
            "PATCH",
            &format!("/api/v1/events/{}", id),
            &client_auth,
            Some(json!({ "title": "Hijacked" })),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_missing_event_returns_not_found() {
    let app = TestApp::new().await;
    let auth = app.login_client().await;

    let res = app
        .router
        .clone()
        .oneshot(authed("GET", "/api/v1/events/9999", &auth, None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
