use crate::api::dtos::requests::{
    CreateEventRequest, EditScope, ListEventsQuery, UpdateEventRequest,
};
use crate::api::dtos::responses::{EventDetailResponse, EventResponse, MessageResponse};
use crate::api::extractors::{auth::AuthUser, timezone::TimezoneOffset};
use crate::domain::models::event::{
    parse_repeat_days, Event, RepeatEndType, RepeatType,
};
use crate::domain::models::user::CurrentUser;
use crate::domain::services::occurrences::{
    expand_event, ExceptionEntry, ExceptionOverlay, Occurrence,
};
use crate::domain::services::series::{occurrence_start_on, previous_occurrence_before};
use crate::domain::services::timezone;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    TimezoneOffset(offset): TimezoneOffset,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let owner_id = payload.user_id.unwrap_or(caller.id);
    if owner_id != caller.id && !caller.is_admin() {
        return Err(AppError::Forbidden(
            "Cannot create events on another user's calendar".into(),
        ));
    }
    state
        .user_repo
        .find_by_id(owner_id)
        .await?
        .ok_or(AppError::NotFound("Calendar owner not found".into()))?;

    let start_time = timezone::to_utc(payload.start_time, offset);
    let end_time = timezone::to_utc(payload.end_time, offset);
    if end_time <= start_time {
        return Err(AppError::Validation("end_time must be after start_time".into()));
    }

    let repeat_type = payload.repeat_type.unwrap_or(RepeatType::None);
    let mut event = Event {
        id: 0,
        user_id: owner_id,
        created_by: caller.id,
        title: payload.title,
        description: payload.description,
        start_time,
        end_time,
        all_day: payload.all_day,
        repeat_type,
        repeat_interval: payload.repeat_interval.unwrap_or(1),
        repeat_days: payload.repeat_days,
        repeat_end_type: payload.repeat_end_type.unwrap_or(RepeatEndType::Never),
        repeat_until: payload.repeat_until.map(|ts| timezone::to_utc(ts, offset)),
        repeat_count: payload.repeat_count,
        parent_event_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    validate_recurrence(&mut event)?;

    let created = state.event_repo.create(&event).await?;
    info!("Created event {} for user {}", created.id, created.user_id);

    Ok((StatusCode::CREATED, Json(EventResponse::from_event(&created, offset))))
}

/// Normalizes and validates the recurrence columns in place. Non-repeating
/// events get inert values so a later switch to repeating starts clean.
fn validate_recurrence(event: &mut Event) -> Result<(), AppError> {
    if event.repeat_type == RepeatType::None {
        event.repeat_interval = 1;
        event.repeat_days = None;
        event.repeat_end_type = RepeatEndType::Never;
        event.repeat_until = None;
        event.repeat_count = None;
        return Ok(());
    }

    if event.repeat_interval < 1 {
        return Err(AppError::Validation("repeat_interval must be at least 1".into()));
    }

    match (&event.repeat_days, event.repeat_type) {
        (Some(raw), RepeatType::Weekly) => {
            parse_repeat_days(raw).map_err(AppError::Validation)?;
        }
        (Some(_), _) => {
            // Weekday subsets only apply to weekly rules.
            event.repeat_days = None;
        }
        (None, _) => {}
    }

    match event.repeat_end_type {
        RepeatEndType::Never => {
            event.repeat_until = None;
            event.repeat_count = None;
        }
        RepeatEndType::Date => {
            let until = event.repeat_until.ok_or_else(|| {
                AppError::Validation("repeat_until is required when repeat_end_type is 'date'".into())
            })?;
            if until <= event.start_time {
                return Err(AppError::Validation(
                    "repeat_until must be after start_time".into(),
                ));
            }
            event.repeat_count = None;
        }
        RepeatEndType::Count => {
            let count = event.repeat_count.ok_or_else(|| {
                AppError::Validation("repeat_count is required when repeat_end_type is 'count'".into())
            })?;
            if count < 1 {
                return Err(AppError::Validation("repeat_count must be at least 1".into()));
            }
            event.repeat_until = None;
        }
    }

    Ok(())
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    TimezoneOffset(offset): TimezoneOffset,
    Query(query): Query<ListEventsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let target_user = match query.user_id {
        Some(id) if id != caller.id && !caller.is_admin() => {
            return Err(AppError::Forbidden("Cannot view another user's calendar".into()));
        }
        Some(id) => Some(id),
        None if caller.is_admin() => None,
        None => Some(caller.id),
    };

    let window_start = query.start_date.map(|ts| timezone::to_utc(ts, offset));
    let window_end = query.end_date.map(|ts| timezone::to_utc(ts, offset));

    if query.include_repeating && (window_start.is_none() || window_end.is_none()) {
        return Err(AppError::Validation(
            "include_repeating requires both start_date and end_date".into(),
        ));
    }
    if let (Some(start), Some(end)) = (window_start, window_end) {
        if end < start {
            return Err(AppError::Validation("end_date must not precede start_date".into()));
        }
    }

    let candidates = state
        .event_repo
        .list(target_user, window_start, window_end)
        .await?;

    let mut responses: Vec<EventResponse> = Vec::new();

    if query.include_repeating {
        let window_start = window_start.ok_or(AppError::Internal)?;
        let window_end = window_end.ok_or(AppError::Internal)?;

        let repeating_ids: Vec<i64> = candidates
            .iter()
            .filter(|e| e.is_repeating())
            .map(|e| e.id)
            .collect();
        let overlay = if repeating_ids.is_empty() {
            ExceptionOverlay::empty()
        } else {
            let exceptions = state.event_repo.list_exceptions(&repeating_ids).await?;
            let replacement_ids: Vec<i64> = exceptions
                .iter()
                .filter_map(|x| x.modified_event_id)
                .collect();
            let replacements = if replacement_ids.is_empty() {
                Vec::new()
            } else {
                state.event_repo.find_by_ids(&replacement_ids).await?
            };
            ExceptionOverlay::build(exceptions, replacements)
        };

        for event in &candidates {
            // The base occurrence is subject to the overlay like any other;
            // expansion never emits it, so it is resolved here.
            match overlay.lookup(event.id, event.start_time.date()) {
                Some(ExceptionEntry::Deleted) => {}
                Some(ExceptionEntry::Modified(replacement)) => {
                    if replacement.start_time <= window_end && replacement.end_time >= window_start
                    {
                        responses.push(EventResponse::from_occurrence(
                            &Occurrence {
                                event: replacement.clone(),
                                original_start: event.start_time,
                            },
                            offset,
                        ));
                    }
                }
                None => {
                    if event.start_time >= window_start && event.end_time <= window_end {
                        responses.push(EventResponse::from_event(event, offset));
                    }
                }
            }
            for occ in expand_event(event, &overlay, window_start, window_end) {
                responses.push(EventResponse::from_occurrence(&occ, offset));
            }
        }
        responses.sort_by_key(|r| r.start_time);
    } else {
        for event in &candidates {
            if let (Some(start), Some(end)) = (window_start, window_end) {
                if event.start_time < start || event.end_time > end {
                    continue;
                }
            }
            responses.push(EventResponse::from_event(event, offset));
        }
    }

    Ok(Json(responses))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    TimezoneOffset(offset): TimezoneOffset,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let row = state
        .event_repo
        .find_with_users(event_id)
        .await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if row.event.user_id != caller.id && row.event.created_by != caller.id && !caller.is_admin() {
        return Err(AppError::Forbidden("Not allowed to view this event".into()));
    }

    Ok(Json(EventDetailResponse::from_joined(&row, offset)))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    TimezoneOffset(offset): TimezoneOffset,
    Path(event_id): Path<i64>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, AppError> {
    let event = state
        .event_repo
        .find_by_id(event_id)
        .await?
        .ok_or(AppError::NotFound("Event not found".into()))?;
    check_edit_permission(&event, &caller)?;

    let scope = EditScope::from_body(&body)?;
    let payload: UpdateEventRequest = serde_json::from_value(body)
        .map_err(|e| AppError::Validation(format!("Invalid request body: {}", e)))?;

    if !event.is_repeating() && scope != EditScope::All {
        return Err(AppError::Validation(
            "Occurrence scopes only apply to repeating events".into(),
        ));
    }

    match scope {
        EditScope::All => {
            let updated = apply_series_patch(&state, event, &payload, offset).await?;
            Ok(Json(EventResponse::from_event(&updated, offset)))
        }
        EditScope::This { occurrence_date } => {
            let replacement =
                modify_single_occurrence(&state, &caller, event, &payload, occurrence_date, offset)
                    .await?;
            Ok(Json(EventResponse::from_event(&replacement, offset)))
        }
        EditScope::Future { occurrence_date } => {
            let result =
                modify_future_occurrences(&state, event, &payload, occurrence_date, offset).await?;
            Ok(Json(EventResponse::from_event(&result, offset)))
        }
    }
}

fn check_edit_permission(event: &Event, caller: &CurrentUser) -> Result<(), AppError> {
    if event.created_by != caller.id && !caller.is_admin() {
        return Err(AppError::Forbidden("Not allowed to edit this event".into()));
    }
    Ok(())
}

/// Merge the patch into `event` and persist it. Covers both non-repeating
/// events and whole-series edits.
async fn apply_series_patch(
    state: &AppState,
    mut event: Event,
    payload: &UpdateEventRequest,
    offset: Option<i64>,
) -> Result<Event, AppError> {
    apply_patch_fields(&mut event, payload, offset);
    if event.end_time <= event.start_time {
        return Err(AppError::Validation("end_time must be after start_time".into()));
    }
    validate_recurrence(&mut event)?;
    event.updated_at = Utc::now();
    state.event_repo.update(&event).await
}

fn apply_patch_fields(event: &mut Event, payload: &UpdateEventRequest, offset: Option<i64>) {
    if let Some(title) = &payload.title {
        event.title = title.clone();
    }
    if let Some(description) = &payload.description {
        event.description = Some(description.clone());
    }
    if let Some(start) = payload.start_time {
        event.start_time = timezone::to_utc(start, offset);
    }
    if let Some(end) = payload.end_time {
        event.end_time = timezone::to_utc(end, offset);
    }
    if let Some(all_day) = payload.all_day {
        event.all_day = all_day;
    }
    if let Some(repeat_type) = payload.repeat_type {
        event.repeat_type = repeat_type;
    }
    if let Some(interval) = payload.repeat_interval {
        event.repeat_interval = interval;
    }
    if let Some(days) = &payload.repeat_days {
        event.repeat_days = Some(days.clone());
    }
    if let Some(end_type) = payload.repeat_end_type {
        event.repeat_end_type = end_type;
    }
    if let Some(until) = payload.repeat_until {
        event.repeat_until = Some(timezone::to_utc(until, offset));
    }
    if let Some(count) = payload.repeat_count {
        event.repeat_count = Some(count);
    }
}

/// "Only this occurrence": store a standalone replacement event plus a
/// `modified` exception pointing at it, in one transaction.
async fn modify_single_occurrence(
    state: &AppState,
    caller: &CurrentUser,
    event: Event,
    payload: &UpdateEventRequest,
    occurrence_date: NaiveDate,
    offset: Option<i64>,
) -> Result<Event, AppError> {
    let rule = event.recurrence_rule().map_err(AppError::Validation)?;
    let occurrence_start = occurrence_start_on(&event, &rule, occurrence_date)
        .ok_or(AppError::NotFound("No occurrence on that date".into()))?;

    let mut replacement = event.clone();
    replacement.id = 0;
    replacement.created_by = caller.id;
    replacement.parent_event_id = None;
    replacement.start_time = occurrence_start;
    replacement.end_time = occurrence_start + event.duration();
    // Replacements are standalone, non-repeating events.
    replacement.repeat_type = RepeatType::None;
    replacement.repeat_interval = 1;
    replacement.repeat_days = None;
    replacement.repeat_end_type = RepeatEndType::Never;
    replacement.repeat_until = None;
    replacement.repeat_count = None;
    replacement.created_at = Utc::now();
    replacement.updated_at = Utc::now();

    apply_patch_fields(&mut replacement, payload, offset);
    replacement.repeat_type = RepeatType::None;
    if payload.start_time.is_some() && payload.end_time.is_none() {
        replacement.end_time = replacement.start_time + event.duration();
    }
    if replacement.end_time <= replacement.start_time {
        return Err(AppError::Validation("end_time must be after start_time".into()));
    }

    let stored = state
        .event_repo
        .create_exception_with_replacement(event.id, occurrence_date, &replacement)
        .await?;
    info!(
        "Modified occurrence {} of event {} via replacement {}",
        occurrence_date, event.id, stored.id
    );
    Ok(stored)
}

/// "This and future occurrences": truncate the original series at the
/// previous occurrence and spawn a continuation event carrying the rest.
/// When the edited occurrence is the first one, the edit collapses to a
/// whole-series update.
async fn modify_future_occurrences(
    state: &AppState,
    event: Event,
    payload: &UpdateEventRequest,
    occurrence_date: NaiveDate,
    offset: Option<i64>,
) -> Result<Event, AppError> {
    let rule = event.recurrence_rule().map_err(AppError::Validation)?;

    let Some(previous) = previous_occurrence_before(&event, &rule, occurrence_date) else {
        return apply_series_patch(state, event, payload, offset).await;
    };

    let occurrence_start = occurrence_start_on(&event, &rule, occurrence_date)
        .ok_or(AppError::NotFound("No occurrence on that date".into()))?;

    let mut truncated = event.clone();
    truncated.repeat_end_type = RepeatEndType::Date;
    truncated.repeat_until = Some(previous);
    truncated.repeat_count = None;
    truncated.updated_at = Utc::now();

    let mut continuation = event.clone();
    continuation.id = 0;
    continuation.parent_event_id = Some(event.id);
    continuation.start_time = occurrence_start;
    continuation.end_time = occurrence_start + event.duration();
    continuation.created_at = Utc::now();
    continuation.updated_at = Utc::now();
    apply_patch_fields(&mut continuation, payload, offset);
    if payload.start_time.is_some() && payload.end_time.is_none() {
        continuation.end_time = continuation.start_time + event.duration();
    }
    if continuation.end_time <= continuation.start_time {
        return Err(AppError::Validation("end_time must be after start_time".into()));
    }
    validate_recurrence(&mut continuation)?;

    let stored = state.event_repo.split_series(&truncated, &continuation).await?;
    info!(
        "Split series {} at {}; continuation {}",
        event.id, occurrence_date, stored.id
    );
    Ok(stored)
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(event_id): Path<i64>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let event = state
        .event_repo
        .find_by_id(event_id)
        .await?
        .ok_or(AppError::NotFound("Event not found".into()))?;
    check_edit_permission(&event, &caller)?;

    let scope = if body.is_empty() {
        EditScope::All
    } else {
        let value: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|e| AppError::Validation(format!("Invalid request body: {}", e)))?;
        EditScope::from_body(&value)?
    };

    if !event.is_repeating() && scope != EditScope::All {
        return Err(AppError::Validation(
            "Occurrence scopes only apply to repeating events".into(),
        ));
    }

    match scope {
        EditScope::All => {
            state.event_repo.delete(event.id).await?;
            info!("Deleted event {}", event.id);
            Ok(Json(MessageResponse::new("Event deleted")))
        }
        EditScope::This { occurrence_date } => {
            let rule = event.recurrence_rule().map_err(AppError::Validation)?;
            occurrence_start_on(&event, &rule, occurrence_date)
                .ok_or(AppError::NotFound("No occurrence on that date".into()))?;
            state
                .event_repo
                .create_exception_deleted(event.id, occurrence_date)
                .await?;
            info!("Deleted occurrence {} of event {}", occurrence_date, event.id);
            Ok(Json(MessageResponse::new("Occurrence deleted")))
        }
        EditScope::Future { occurrence_date } => {
            let rule = event.recurrence_rule().map_err(AppError::Validation)?;
            match previous_occurrence_before(&event, &rule, occurrence_date) {
                None => {
                    state.event_repo.delete(event.id).await?;
                    info!("Deleted whole series {}", event.id);
                }
                Some(previous) => {
                    let mut truncated = event.clone();
                    truncated.repeat_end_type = RepeatEndType::Date;
                    truncated.repeat_until = Some(previous);
                    truncated.repeat_count = None;
                    truncated.updated_at = Utc::now();
                    state.event_repo.update(&truncated).await?;
                    info!("Truncated series {} before {}", event.id, occurrence_date);
                }
            }
            Ok(Json(MessageResponse::new("Future occurrences deleted")))
        }
    }
}
