use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Per-user daily hydration target in millilitres. One row per user.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct WaterGoal {
    pub id: i64,
    pub user_id: i64,
    pub daily_ml: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct WaterEntry {
    pub id: i64,
    pub user_id: i64,
    pub amount_ml: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}
