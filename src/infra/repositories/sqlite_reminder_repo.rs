use crate::domain::{models::reminder::ReminderSettings, ports::ReminderRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteReminderRepo {
    pool: SqlitePool,
}

impl SqliteReminderRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReminderRepository for SqliteReminderRepo {
    async fn find_by_user(&self, user_id: i64) -> Result<Option<ReminderSettings>, AppError> {
        sqlx::query_as::<_, ReminderSettings>(
            "SELECT * FROM reminder_settings WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn create_default(&self, user_id: i64) -> Result<ReminderSettings, AppError> {
        sqlx::query_as::<_, ReminderSettings>(
            r#"INSERT INTO reminder_settings (user_id, created_at, updated_at)
               VALUES (?, ?, ?) RETURNING *"#,
        )
        .bind(user_id)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn update(&self, settings: &ReminderSettings) -> Result<ReminderSettings, AppError> {
        sqlx::query_as::<_, ReminderSettings>(
            r#"UPDATE reminder_settings SET
                water_reminder=?, scale_reminder=?, photo_reminder=?, plan_day_reminder=?, updated_at=?
               WHERE user_id=? RETURNING *"#,
        )
        .bind(settings.water_reminder)
        .bind(settings.scale_reminder)
        .bind(settings.photo_reminder)
        .bind(settings.plan_day_reminder)
        .bind(settings.updated_at)
        .bind(settings.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }
}
