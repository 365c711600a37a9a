use crate::api::dtos::requests::{
    CreateWaterEntryRequest, ListWaterEntriesQuery, SetWaterGoalRequest, UpdateWaterEntryRequest,
};
use crate::api::dtos::responses::MessageResponse;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::water::WaterEntry;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

pub async fn get_goal(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let goal = state
        .water_repo
        .find_goal(caller.id)
        .await?
        .ok_or(AppError::NotFound("No water goal set".into()))?;
    Ok(Json(goal))
}

pub async fn set_goal(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<SetWaterGoalRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.daily_ml <= 0 {
        return Err(AppError::Validation("daily_ml must be positive".into()));
    }
    let goal = state.water_repo.upsert_goal(caller.id, payload.daily_ml).await?;
    info!("Water goal set for user {}: {} ml", caller.id, goal.daily_ml);
    Ok(Json(goal))
}

pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    state
        .water_repo
        .find_goal(caller.id)
        .await?
        .ok_or(AppError::NotFound("No water goal set".into()))?;
    state.water_repo.delete_goal(caller.id).await?;
    Ok(Json(MessageResponse::new("Water goal removed")))
}

pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<CreateWaterEntryRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.amount_ml <= 0 {
        return Err(AppError::Validation("amount_ml must be positive".into()));
    }
    let entry = WaterEntry {
        id: 0,
        user_id: caller.id,
        amount_ml: payload.amount_ml,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        deleted_at: None,
    };
    let created = state.water_repo.create_entry(&entry).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Query(query): Query<ListWaterEntriesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);

    let entries = state
        .water_repo
        .list_entries(caller.id, query.start_date, query.end_date, limit, offset)
        .await?;
    Ok(Json(entries))
}

pub async fn update_entry(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(entry_id): Path<i64>,
    Json(payload): Json<UpdateWaterEntryRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.amount_ml <= 0 {
        return Err(AppError::Validation("amount_ml must be positive".into()));
    }
    let mut entry = owned_entry(&state, caller.id, entry_id).await?;
    entry.amount_ml = payload.amount_ml;
    entry.updated_at = Utc::now();
    let updated = state.water_repo.update_entry(&entry).await?;
    Ok(Json(updated))
}

pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(entry_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    owned_entry(&state, caller.id, entry_id).await?;
    state.water_repo.soft_delete_entry(entry_id).await?;
    Ok(Json(MessageResponse::new("Entry removed")))
}

async fn owned_entry(state: &AppState, user_id: i64, entry_id: i64) -> Result<WaterEntry, AppError> {
    let entry = state
        .water_repo
        .find_entry(entry_id)
        .await?
        .ok_or(AppError::NotFound("Water entry not found".into()))?;
    if entry.user_id != user_id {
        return Err(AppError::Forbidden("Not your water entry".into()));
    }
    Ok(entry)
}
