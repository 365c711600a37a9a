use crate::error::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Client UTC offset in minutes from the `X-Timezone-Offset` header, using
/// the JavaScript `getTimezoneOffset` sign convention (UTC+2 sends -120).
/// Absent header means timestamps pass through untranslated.
pub struct TimezoneOffset(pub Option<i64>);

impl<S> FromRequestParts<S> for TimezoneOffset
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(raw) = parts.headers.get("X-Timezone-Offset") else {
            return Ok(TimezoneOffset(None));
        };

        let minutes = raw
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .ok_or_else(|| {
                AppError::Validation("X-Timezone-Offset must be an integer number of minutes".to_string())
            })?;

        // Offsets beyond a day are always client bugs.
        if !(-1440..=1440).contains(&minutes) {
            return Err(AppError::Validation(
                "X-Timezone-Offset out of range".to_string(),
            ));
        }

        Ok(TimezoneOffset(Some(minutes)))
    }
}
