use crate::api::dtos::requests::{CreateQuestionnaireRequest, UpdateQuestionnaireRequest};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::questionnaire::Questionnaire;
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

pub async fn get_questionnaire(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let questionnaire = state
        .questionnaire_repo
        .find_by_user(caller.id)
        .await?
        .ok_or(AppError::NotFound("Questionnaire not found".into()))?;
    Ok(Json(questionnaire))
}

pub async fn create_questionnaire(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<CreateQuestionnaireRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_measurements(payload.weight, payload.height)?;
    if state.questionnaire_repo.find_by_user(caller.id).await?.is_some() {
        return Err(AppError::Conflict("Questionnaire already submitted".into()));
    }

    let questionnaire = Questionnaire {
        id: 0,
        user_id: caller.id,
        weight: payload.weight,
        height: payload.height,
        birthday: payload.birthday,
        health_issues: payload.health_issues,
        bad_habits: payload.bad_habits,
        workout_environment: payload.workout_environment,
        work_shift: payload.work_shift,
        wake_up_time: payload.wake_up_time,
        sleep_time: payload.sleep_time,
        morning_routine: payload.morning_routine,
        evening_routine: payload.evening_routine,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    let created = state.questionnaire_repo.create(&questionnaire).await?;
    info!("Questionnaire submitted by user {}", caller.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_questionnaire(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<UpdateQuestionnaireRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_measurements(payload.weight, payload.height)?;
    let mut questionnaire = state
        .questionnaire_repo
        .find_by_user(caller.id)
        .await?
        .ok_or(AppError::NotFound("Questionnaire not found".into()))?;

    if let Some(v) = payload.weight {
        questionnaire.weight = Some(v);
    }
    if let Some(v) = payload.height {
        questionnaire.height = Some(v);
    }
    if let Some(v) = payload.birthday {
        questionnaire.birthday = Some(v);
    }
    if let Some(v) = payload.health_issues {
        questionnaire.health_issues = Some(v);
    }
    if let Some(v) = payload.bad_habits {
        questionnaire.bad_habits = Some(v);
    }
    if let Some(v) = payload.workout_environment {
        questionnaire.workout_environment = Some(v);
    }
    if let Some(v) = payload.work_shift {
        questionnaire.work_shift = Some(v);
    }
    if let Some(v) = payload.wake_up_time {
        questionnaire.wake_up_time = Some(v);
    }
    if let Some(v) = payload.sleep_time {
        questionnaire.sleep_time = Some(v);
    }
    if let Some(v) = payload.morning_routine {
        questionnaire.morning_routine = Some(v);
    }
    if let Some(v) = payload.evening_routine {
        questionnaire.evening_routine = Some(v);
    }
    questionnaire.updated_at = Utc::now();

    let updated = state.questionnaire_repo.update(&questionnaire).await?;
    Ok(Json(updated))
}

fn validate_measurements(weight: Option<f64>, height: Option<f64>) -> Result<(), AppError> {
    if weight.is_some_and(|w| w <= 0.0) {
        return Err(AppError::Validation("weight must be positive".into()));
    }
    if height.is_some_and(|h| h <= 0.0) {
        return Err(AppError::Validation("height must be positive".into()));
    }
    Ok(())
}
