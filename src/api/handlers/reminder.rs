use crate::api::dtos::requests::UpdateReminderSettingsRequest;
use crate::api::extractors::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use std::sync::Arc;

pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let settings = match state.reminder_repo.find_by_user(caller.id).await? {
        Some(settings) => settings,
        None => state.reminder_repo.create_default(caller.id).await?,
    };
    Ok(Json(settings))
}

pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<UpdateReminderSettingsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut settings = match state.reminder_repo.find_by_user(caller.id).await? {
        Some(settings) => settings,
        None => state.reminder_repo.create_default(caller.id).await?,
    };

    if let Some(v) = payload.water_reminder {
        settings.water_reminder = v;
    }
    if let Some(v) = payload.scale_reminder {
        settings.scale_reminder = v;
    }
    if let Some(v) = payload.photo_reminder {
        settings.photo_reminder = v;
    }
    if let Some(v) = payload.plan_day_reminder {
        settings.plan_day_reminder = v;
    }
    settings.updated_at = Utc::now();

    let updated = state.reminder_repo.update(&settings).await?;
    Ok(Json(updated))
}
