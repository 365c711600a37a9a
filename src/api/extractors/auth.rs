use crate::domain::models::auth::Claims;
use crate::domain::models::user::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::Span;

/// Authenticated caller, resolved from the `access_token` cookie. Mutating
/// requests additionally require the `X-CSRF-Token` header to match the
/// token's CSRF claim (double-submit check).
pub struct AuthUser(pub CurrentUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cookies = parts
            .extensions
            .get::<Cookies>()
            .ok_or(AppError::Internal)?;

        let access_token = cookies
            .get("access_token")
            .ok_or(AppError::Unauthorized)?
            .value()
            .to_string();

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let decoding_key = DecodingKey::from_ed_pem(app_state.config.jwt_public_key.as_bytes())
            .map_err(|_| AppError::Internal)?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&["fitcoach-frontend"]);

        let token_data = decode::<Claims>(&access_token, &decoding_key, &validation)
            .map_err(|_| AppError::Unauthorized)?;

        let method = &parts.method;
        if method != "GET" && method != "HEAD" && method != "OPTIONS" {
            let csrf_header_val = parts
                .headers
                .get("X-CSRF-Token")
                .ok_or_else(|| AppError::Forbidden("Missing CSRF token".to_string()))?
                .to_str()
                .map_err(|_| AppError::Forbidden("Invalid CSRF token".to_string()))?;

            if csrf_header_val != token_data.claims.csrf_token {
                return Err(AppError::Forbidden("Invalid CSRF token".to_string()));
            }
        }

        let user_id: i64 = token_data
            .claims
            .sub
            .parse()
            .map_err(|_| AppError::Unauthorized)?;

        let user = CurrentUser {
            id: user_id,
            role: token_data.claims.role,
        };

        Span::current().record("user_id", user.id);

        Ok(AuthUser(user))
    }
}

/// Like [`AuthUser`] but rejects non-admin callers with 403.
pub struct AdminUser(pub CurrentUser);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        Ok(AdminUser(user))
    }
}
