use crate::api::dtos::requests::{CreateQuoteRequest, UpdateQuoteRequest};
use crate::api::dtos::responses::{MessageResponse, RandomQuoteResponse};
use crate::api::extractors::auth::{AdminUser, AuthUser};
use crate::domain::models::quote::MotivationalQuote;
use crate::domain::services::quotes;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// The quote of the day. The first request after midnight UTC draws a new
/// quote and stamps it; everyone else gets the same one until the next day.
pub async fn random_quote(
    State(state): State<Arc<AppState>>,
    AuthUser(_caller): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    if let Some(todays) = state.quote_repo.find_shown_on(now.date_naive()).await? {
        return Ok(Json(RandomQuoteResponse::from_quote(&todays)));
    }

    let pool = state.quote_repo.list_active().await?;
    let picked = quotes::pick_next(&pool, now)
        .ok_or(AppError::NotFound("No active quotes available".into()))?;
    let shown = state.quote_repo.mark_shown(picked.id, now).await?;
    info!("Selected quote {} for {}", shown.id, now.date_naive());
    Ok(Json(RandomQuoteResponse::from_quote(&shown)))
}

pub async fn list_quotes(
    State(state): State<Arc<AppState>>,
    AuthUser(_caller): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.quote_repo.list().await?))
}

pub async fn get_quote(
    State(state): State<Arc<AppState>>,
    AuthUser(_caller): AuthUser,
    Path(quote_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quote = state
        .quote_repo
        .find_by_id(quote_id)
        .await?
        .ok_or(AppError::NotFound("Quote not found".into()))?;
    Ok(Json(quote))
}

pub async fn create_quote(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Json(payload): Json<CreateQuoteRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.quote.trim().is_empty() {
        return Err(AppError::Validation("quote must not be empty".into()));
    }
    let quote = MotivationalQuote {
        id: 0,
        quote: payload.quote,
        author: payload.author,
        is_active: payload.is_active.unwrap_or(true),
        times_shown: 0,
        last_shown_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        deleted_at: None,
    };
    let created = state.quote_repo.create(&quote).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_quote(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(quote_id): Path<i64>,
    Json(payload): Json<UpdateQuoteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut quote = state
        .quote_repo
        .find_by_id(quote_id)
        .await?
        .ok_or(AppError::NotFound("Quote not found".into()))?;

    if let Some(text) = payload.quote {
        if text.trim().is_empty() {
            return Err(AppError::Validation("quote must not be empty".into()));
        }
        quote.quote = text;
    }
    if let Some(author) = payload.author {
        quote.author = Some(author);
    }
    if let Some(active) = payload.is_active {
        quote.is_active = active;
    }
    quote.updated_at = Utc::now();

    let updated = state.quote_repo.update(&quote).await?;
    Ok(Json(updated))
}

pub async fn delete_quote(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(quote_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state
        .quote_repo
        .find_by_id(quote_id)
        .await?
        .ok_or(AppError::NotFound("Quote not found".into()))?;
    state.quote_repo.soft_delete(quote_id).await?;
    info!("Quote {} removed", quote_id);
    Ok(Json(MessageResponse::new("Quote removed")))
}
