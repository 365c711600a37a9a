use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Per-user notification toggles. Created lazily with everything enabled the
/// first time a user reads their settings.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ReminderSettings {
    pub id: i64,
    pub user_id: i64,
    pub water_reminder: bool,
    pub scale_reminder: bool,
    pub photo_reminder: bool,
    pub plan_day_reminder: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
