use crate::api::dtos::requests::{CreateUserRequest, UpdateUserRequest};
use crate::api::extractors::auth::{AdminUser, AuthUser};
use crate::domain::models::user::{User, ROLE_ADMIN, ROLE_CLIENT};
use crate::error::AppError;
use crate::state::AppState;
use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use rand::rngs::OsRng;
use std::sync::Arc;
use tracing::info;

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.email.trim().is_empty() || !payload.email.contains('@') {
        return Err(AppError::Validation("A valid email is required".into()));
    }
    if payload.password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".into(),
        ));
    }
    let role = match payload.role.as_deref() {
        None => ROLE_CLIENT.to_string(),
        Some(r) if r == ROLE_ADMIN || r == ROLE_CLIENT => r.to_string(),
        Some(other) => {
            return Err(AppError::Validation(format!("Unknown role '{}'", other)));
        }
    };

    if state.user_repo.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|_| AppError::Internal)?
        .to_string();

    let user = User {
        id: 0,
        role,
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        password_hash,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        deleted_at: None,
    };
    let created = state.user_repo.create(&user).await?;

    info!("Created user: {}", created.id);

    Ok((axum::http::StatusCode::CREATED, Json(created)))
}

/// The profile behind the current access token.
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .user_repo
        .find_by_id(caller.id)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;
    Ok(Json(user))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let users = state.user_repo.list().await?;
    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if caller.id != user_id && !caller.is_admin() {
        return Err(AppError::Forbidden("Not allowed to view this user".into()));
    }
    let user = state
        .user_repo
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;
    Ok(Json(user))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(user_id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if caller.id != user_id && !caller.is_admin() {
        return Err(AppError::Forbidden("Not allowed to edit this user".into()));
    }
    let mut user = state
        .user_repo
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    if let Some(first_name) = payload.first_name {
        user.first_name = first_name;
    }
    if let Some(last_name) = payload.last_name {
        user.last_name = last_name;
    }
    if let Some(email) = payload.email {
        if !email.contains('@') {
            return Err(AppError::Validation("A valid email is required".into()));
        }
        user.email = email;
    }
    user.updated_at = Utc::now();

    let updated = state.user_repo.update(&user).await?;
    Ok(Json(updated))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if admin.id == user_id {
        return Err(AppError::Conflict("Cannot delete yourself".into()));
    }

    state
        .user_repo
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    state.user_repo.soft_delete(user_id).await?;
    info!("Deleted user {}", user_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
