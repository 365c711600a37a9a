use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Coach-curated motivational quote. `times_shown` and `last_shown_at` feed
/// the daily rotation; one quote is served per UTC day.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct MotivationalQuote {
    pub id: i64,
    pub quote: String,
    pub author: Option<String>,
    pub is_active: bool,
    pub times_shown: i32,
    pub last_shown_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}
