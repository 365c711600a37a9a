use crate::domain::models::event::{RepeatEndType, RepeatType};
use crate::domain::models::questionnaire::{WorkShift, WorkoutEnvironment};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    /// Calendar owner; defaults to the caller.
    pub user_id: Option<i64>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub repeat_type: Option<RepeatType>,
    pub repeat_interval: Option<i32>,
    pub repeat_days: Option<String>,
    pub repeat_end_type: Option<RepeatEndType>,
    pub repeat_until: Option<NaiveDateTime>,
    pub repeat_count: Option<i32>,
}

/// Which part of a repeating series an update or delete applies to. Arrives
/// in the request body as `{"scope": "this", "occurrence_date": ...}`.
/// Unknown scope values fail deserialization and surface as 400; an absent
/// `scope` key means the whole series.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "scope", rename_all = "lowercase")]
pub enum EditScope {
    This { occurrence_date: NaiveDate },
    Future { occurrence_date: NaiveDate },
    All,
}

impl EditScope {
    pub fn from_body(body: &serde_json::Value) -> Result<Self, crate::error::AppError> {
        if body.get("scope").is_none() {
            return Ok(EditScope::All);
        }
        serde_json::from_value(body.clone())
            .map_err(|e| crate::error::AppError::Validation(format!("Invalid scope: {}", e)))
    }
}

#[derive(Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub all_day: Option<bool>,
    pub repeat_type: Option<RepeatType>,
    pub repeat_interval: Option<i32>,
    pub repeat_days: Option<String>,
    pub repeat_end_type: Option<RepeatEndType>,
    pub repeat_until: Option<NaiveDateTime>,
    pub repeat_count: Option<i32>,
}

#[derive(Deserialize)]
pub struct ListEventsQuery {
    pub user_id: Option<i64>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub include_repeating: bool,
}

#[derive(Deserialize)]
pub struct CopyEventRequest {
    pub target_user_id: i64,
    pub target_date: NaiveDateTime,
}

/// Copy one event onto every (user, date) combination.
#[derive(Deserialize)]
pub struct BulkCopyRequest {
    pub target_user_ids: Vec<i64>,
    pub target_dates: Vec<NaiveDateTime>,
}

#[derive(Deserialize)]
pub struct SetWaterGoalRequest {
    pub daily_ml: i32,
}

#[derive(Deserialize)]
pub struct CreateWaterEntryRequest {
    pub amount_ml: i32,
}

#[derive(Deserialize)]
pub struct UpdateWaterEntryRequest {
    pub amount_ml: i32,
}

#[derive(Deserialize)]
pub struct ListWaterEntriesQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateQuestionnaireRequest {
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub birthday: Option<NaiveDate>,
    pub health_issues: Option<String>,
    pub bad_habits: Option<String>,
    pub workout_environment: Option<WorkoutEnvironment>,
    pub work_shift: Option<WorkShift>,
    pub wake_up_time: Option<String>,
    pub sleep_time: Option<String>,
    pub morning_routine: Option<String>,
    pub evening_routine: Option<String>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Deserialize)]
pub struct UpdateQuestionnaireRequest {
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub birthday: Option<NaiveDate>,
    pub health_issues: Option<String>,
    pub bad_habits: Option<String>,
    pub workout_environment: Option<WorkoutEnvironment>,
    pub work_shift: Option<WorkShift>,
    pub wake_up_time: Option<String>,
    pub sleep_time: Option<String>,
    pub morning_routine: Option<String>,
    pub evening_routine: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateQuoteRequest {
    pub quote: String,
    pub author: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct UpdateQuoteRequest {
    pub quote: Option<String>,
    pub author: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct UpdateReminderSettingsRequest {
    pub water_reminder: Option<bool>,
    pub scale_reminder: Option<bool>,
    pub photo_reminder: Option<bool>,
    pub plan_day_reminder: Option<bool>,
}
