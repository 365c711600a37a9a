use crate::api::dtos::requests::{BulkCopyRequest, CopyEventRequest};
use crate::api::extractors::{auth::AdminUser, timezone::TimezoneOffset};
use crate::domain::models::event::{Event, RepeatEndType, RepeatType};
use crate::domain::models::user::CurrentUser;
use crate::domain::services::timezone;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDateTime, Utc};
use std::sync::Arc;
use tracing::info;

pub async fn copy_event(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    TimezoneOffset(offset): TimezoneOffset,
    Path(event_id): Path<i64>,
    Json(payload): Json<CopyEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let source = find_source(&state, event_id).await?;
    require_users(&state, &[payload.target_user_id]).await?;

    let target_start = timezone::to_utc(payload.target_date, offset);
    let copy = build_copy(&source, &admin, payload.target_user_id, target_start);

    let mut records = state
        .event_repo
        .create_copies(event_id, &[(copy, target_start)])
        .await?;
    let record = records.pop().ok_or(AppError::Internal)?;

    info!("Copied event {} to user {}", event_id, payload.target_user_id);
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn bulk_copy(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    TimezoneOffset(offset): TimezoneOffset,
    Path(event_id): Path<i64>,
    Json(payload): Json<BulkCopyRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.target_user_ids.is_empty() || payload.target_dates.is_empty() {
        return Err(AppError::Validation(
            "target_user_ids and target_dates must not be empty".into(),
        ));
    }

    let source = find_source(&state, event_id).await?;
    require_users(&state, &payload.target_user_ids).await?;

    let mut copies = Vec::with_capacity(payload.target_user_ids.len() * payload.target_dates.len());
    for &user_id in &payload.target_user_ids {
        for &target_date in &payload.target_dates {
            let target_start = timezone::to_utc(target_date, offset);
            copies.push((build_copy(&source, &admin, user_id, target_start), target_start));
        }
    }

    let records = state.event_repo.create_copies(event_id, &copies).await?;
    info!("Bulk-copied event {} into {} copies", event_id, records.len());
    Ok((StatusCode::CREATED, Json(records)))
}

pub async fn list_copies(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    find_source(&state, event_id).await?;
    let copies = state.event_repo.list_copies(event_id).await?;
    Ok(Json(copies))
}

async fn find_source(state: &AppState, event_id: i64) -> Result<Event, AppError> {
    state
        .event_repo
        .find_by_id(event_id)
        .await?
        .ok_or(AppError::NotFound("Event not found".into()))
}

async fn require_users(state: &AppState, user_ids: &[i64]) -> Result<(), AppError> {
    for &id in user_ids {
        state
            .user_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("One or more target users not found".into()))?;
    }
    Ok(())
}

/// The duplicate keeps the source's duration and shifts start/end by the
/// delta between the source start and the target timestamp. Copies are
/// always standalone, non-repeating events.
fn build_copy(source: &Event, admin: &CurrentUser, user_id: i64, target_start: NaiveDateTime) -> Event {
    let delta = target_start - source.start_time;
    Event {
        id: 0,
        user_id,
        created_by: admin.id,
        title: source.title.clone(),
        description: source.description.clone(),
        start_time: source.start_time + delta,
        end_time: source.end_time + delta,
        all_day: source.all_day,
        repeat_type: RepeatType::None,
        repeat_interval: 1,
        repeat_days: None,
        repeat_end_type: RepeatEndType::Never,
        repeat_until: None,
        repeat_count: None,
        parent_event_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
