use crate::api::handlers::{
    auth, event, event_copy, health, questionnaire, quote, reminder, user, water,
};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))

        // Users
        .route("/api/v1/users", post(user::create_user).get(user::list_users))
        .route("/api/v1/users/me", get(user::get_me))
        .route(
            "/api/v1/users/{user_id}",
            get(user::get_user).patch(user::update_user).delete(user::delete_user),
        )

        // Events
        .route("/api/v1/events", post(event::create_event).get(event::list_events))
        .route(
            "/api/v1/events/{event_id}",
            get(event::get_event).patch(event::update_event).delete(event::delete_event),
        )

        // Copies
        .route("/api/v1/events/{event_id}/copy", post(event_copy::copy_event))
        .route("/api/v1/events/{event_id}/bulk-copy", post(event_copy::bulk_copy))
        .route("/api/v1/events/{event_id}/copies", get(event_copy::list_copies))

        // Water tracking
        .route(
            "/api/v1/water/goal",
            get(water::get_goal).put(water::set_goal).delete(water::delete_goal),
        )
        .route(
            "/api/v1/water/entries",
            post(water::create_entry).get(water::list_entries),
        )
        .route(
            "/api/v1/water/entries/{entry_id}",
            axum::routing::patch(water::update_entry).delete(water::delete_entry),
        )

        // Intake questionnaire
        .route(
            "/api/v1/questionnaire",
            get(questionnaire::get_questionnaire)
                .post(questionnaire::create_questionnaire)
                .patch(questionnaire::update_questionnaire),
        )

        // Motivational quotes
        .route("/api/v1/quotes", get(quote::list_quotes).post(quote::create_quote))
        .route("/api/v1/quotes/random", get(quote::random_quote))
        .route(
            "/api/v1/quotes/{quote_id}",
            get(quote::get_quote).patch(quote::update_quote).delete(quote::delete_quote),
        )

        // Reminder settings
        .route(
            "/api/v1/reminders",
            get(reminder::get_settings).patch(reminder::update_settings),
        )

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!(
                        "started processing request: {} {}",
                        request.method(),
                        request.uri().path()
                    );
                })
                .on_response(
                    |response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                        info!(
                            status = response.status().as_u16(),
                            latency_ms = latency.as_millis(),
                            "finished processing request"
                        );
                    },
                )
                .on_failure(
                    |error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                        error!("request failed: {:?}", error);
                    },
                ),
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
