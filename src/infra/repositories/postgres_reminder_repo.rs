use crate::domain::{models::reminder::ReminderSettings, ports::ReminderRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReminderRepository for PostgresReminderRepo {
    async fn find_by_user(&self, user_id: i64) -> Result<Option<ReminderSettings>, AppError> {
        sqlx::query_as::<_, ReminderSettings>(
            "SELECT * FROM reminder_settings WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn create_default(&self, user_id: i64) -> Result<ReminderSettings, AppError> {
        sqlx::query_as::<_, ReminderSettings>(
            r#"INSERT INTO reminder_settings (user_id, created_at, updated_at)
               VALUES ($1, $2, $2) RETURNING *"#,
        )
        .bind(user_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn update(&self, settings: &ReminderSettings) -> Result<ReminderSettings, AppError> {
        sqlx::query_as::<_, ReminderSettings>(
            r#"UPDATE reminder_settings SET
                water_reminder=$1, scale_reminder=$2, photo_reminder=$3, plan_day_reminder=$4, updated_at=$5
               WHERE user_id=$6 RETURNING *"#,
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
