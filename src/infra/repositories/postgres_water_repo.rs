use crate::domain::{
    models::water::{WaterEntry, WaterGoal},
    ports::WaterRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

pub struct PostgresWaterRepo {
    pool: PgPool,
}

impl PostgresWaterRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WaterRepository for PostgresWaterRepo {
    async fn upsert_goal(&self, user_id: i64, daily_ml: i32) -> Result<WaterGoal, AppError> {
        sqlx::query_as::<_, WaterGoal>(
            r#"INSERT INTO water_goals (user_id, daily_ml, created_at, updated_at)
               VALUES ($1, $2, $3, $3)
               ON CONFLICT (user_id) DO UPDATE SET daily_ml = EXCLUDED.daily_ml, updated_at = EXCLUDED.updated_at
               RETURNING *"#,
        )
        .bind(user_id)
        .bind(daily_ml)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_goal(&self, user_id: i64) -> Result<Option<WaterGoal>, AppError> {
        sqlx::query_as::<_, WaterGoal>("SELECT * FROM water_goals WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete_goal(&self, user_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM water_goals WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn create_entry(&self, entry: &WaterEntry) -> Result<WaterEntry, AppError> {
        sqlx::query_as::<_, WaterEntry>(
            r#"INSERT INTO water_entries (user_id, amount_ml, created_at, updated_at)
               VALUES ($1, $2, $3, $4) RETURNING *"#,
        )
        .bind(entry.user_id)
        .bind(entry.amount_ml)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_entry(&self, id: i64) -> Result<Option<WaterEntry>, AppError> {
        sqlx::query_as::<_, WaterEntry>(
            "SELECT * FROM water_entries WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list_entries(
        &self,
        user_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WaterEntry>, AppError> {
        sqlx::query_as::<_, WaterEntry>(
            r#"SELECT * FROM water_entries
               WHERE user_id = $1 AND deleted_at IS NULL
                 AND ($2::DATE IS NULL OR created_at::DATE >= $2)
                 AND ($3::DATE IS NULL OR created_at::DATE <= $3)
               ORDER BY created_at DESC LIMIT $4 OFFSET $5"#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn update_entry(&self, entry: &WaterEntry) -> Result<WaterEntry, AppError> {
        sqlx::query_as::<_, WaterEntry>(
            r#"UPDATE water_entries SET amount_ml=$1, updated_at=$2
               WHERE id=$3 AND deleted_at IS NULL RETURNING *"#,
        )
        .bind(entry.amount_ml)
        .bind(entry.updated_at)
        .bind(entry.id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn soft_delete_entry(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE water_entries SET deleted_at = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
