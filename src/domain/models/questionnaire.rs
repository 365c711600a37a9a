use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum WorkoutEnvironment {
    Gym,
    Home,
    Outdoor,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum WorkShift {
    Morning,
    Afternoon,
    Night,
    Split,
    Flexible,
}

/// Intake questionnaire a client fills in once after signup. One row per
/// user; every answer is optional.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Questionnaire {
    pub id: i64,
    pub user_id: i64,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub birthday: Option<NaiveDate>,
    pub health_issues: Option<String>,
    pub bad_habits: Option<String>,
    pub workout_environment: Option<WorkoutEnvironment>,
    pub work_shift: Option<WorkShift>,
    /// "HH:MM" wall-clock strings, stored as entered.
    pub wake_up_time: Option<String>,
    pub sleep_time: Option<String>,
    pub morning_routine: Option<String>,
    pub evening_routine: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
