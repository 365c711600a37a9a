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

fn authed_tz(
    method: &str,
    uri: &str,
    auth: &AuthHeaders,
    offset: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, format!("access_token={}", auth.access_token))
        .header("X-CSRF-Token", &auth.csrf_token);
    if let Some(minutes) = offset {
        builder = builder.header("X-Timezone-Offset", minutes);
    }
    match body {
        Some(v) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[tokio::test]
async fn test_create_with_offset_stores_utc() {
    let app = TestApp::new().await;
    let auth = app.login_client().await;

    // UTC+2 client, so the browser reports -120 minutes.
    let res = app
        .router
        .clone()
        .oneshot(authed_tz(
            "POST",
            "/api/v1/events",
            &auth,
            Some("-120"),
            Some(json!({
                "title": "Local morning",
                "start_time": "2024-03-01T10:00:00",
                "end_time": "2024-03-01T11:00:00"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = parse_body(res).await;
    // Response is converted back to local time for the same caller.
    assert_eq!(created["start_time"], "2024-03-01T10:00:00");
    let event_id = created["id"].as_i64().unwrap();

    let stored: (String,) =
        sqlx::query_as("SELECT start_time FROM events WHERE id = ?")
            .bind(event_id)
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(stored.0, "2024-03-01 08:00:00");
}

#[tokio::test]
async fn test_fetch_without_offset_returns_utc() {
    let app = TestApp::new().await;
    let auth = app.login_client().await;

    let res = app
        .router
        .clone()
        .oneshot(authed_tz(
            "POST",
            "/api/v1/events",
            &auth,
            Some("-120"),
            Some(json!({
                "title": "Local morning",
                "start_time": "2024-03-01T10:00:00",
                "end_time": "2024-03-01T11:00:00"
            })),
        ))
        .await
        .unwrap();
    let event_id = parse_body(res).await["id"].as_i64().unwrap();

    let res = app
        .router
        .clone()
        .oneshot(authed_tz(
            "GET",
            &format!("/api/v1/events/{}", event_id),
            &auth,
            None,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched = parse_body(res).await;
    assert_eq!(fetched["start_time"], "2024-03-01T08:00:00");
    assert_eq!(fetched["end_time"], "2024-03-01T09:00:00");
}

#[tokio::test]
async fn test_offset_round_trips_on_fetch() {
    let app = TestApp::new().await;
    let auth = app.login_client().await;

    let res = app
        .router
        .clone()
        .oneshot(authed_tz(
            "POST",
            "/api/v1/events",
            &auth,
            Some("300"),
            Some(json!({
                "title": "New York workout",
                "start_time": "2024-03-01T18:00:00",
                "end_time": "2024-03-01T19:00:00"
            })),
        ))
        .await
        .unwrap();
    let event_id = parse_body(res).await["id"].as_i64().unwrap();

    let res = app
        .router
        .clone()
        .oneshot(authed_tz(
            "GET",
            &format!("/api/v1/events/{}", event_id),
            &auth,
            Some("300"),
            None,
        ))
        .await
        .unwrap();
    let fetched = parse_body(res).await;
    assert_eq!(fetched["start_time"], "2024-03-01T18:00:00");
}

#[tokio::test]
async fn test_window_bounds_are_interpreted_in_caller_timezone() {
    let app = TestApp::new().await;
    let auth = app.login_client().await;

    // Stored at 23:00 UTC on 2024-03-01; for a UTC+2 caller that is
    // 01:00 on 2024-03-02.
    app.router
        .clone()
        .oneshot(authed_tz(
            "POST",
            "/api/v1/events",
            &auth,
            None,
            Some(json!({
                "title": "Late session",
                "start_time": "2024-03-01T23:00:00",
                "end_time": "2024-03-01T23:30:00"
            })),
        ))
        .await
        .unwrap();

    let res = app
        .router
        .clone()
        .oneshot(authed_tz(
            "GET",
            "/api/v1/events?start_date=2024-03-02T00:00:00&end_date=2024-03-02T23:59:59",
            &auth,
            Some("-120"),
            None,
        ))
        .await
        .unwrap();
    let events = parse_body(res).await;
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["start_time"], "2024-03-02T01:00:00");
}

#[tokio::test]
async fn test_invalid_offset_header_rejected() {
    let app = TestApp::new().await;
    let auth = app.login_client().await;

    for bad in ["plus-two", "99999"] {
        let res = app
            .router
            .clone()
            .oneshot(authed_tz("GET", "/api/v1/events", &auth, Some(bad), None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "offset {:?}", bad);
    }
}
