use crate::domain::{
    models::water::{WaterEntry, WaterGoal},
    ports::WaterRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

pub struct SqliteWaterRepo {
    pool: SqlitePool,
}

impl SqliteWaterRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WaterRepository for SqliteWaterRepo {
    async fn upsert_goal(&self, user_id: i64, daily_ml: i32) -> Result<WaterGoal, AppError> {
        sqlx::query_as::<_, WaterGoal>(
            r#"INSERT INTO water_goals (user_id, daily_ml, created_at, updated_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT(user_id) DO UPDATE SET daily_ml = excluded.daily_ml, updated_at = excluded.updated_at
               RETURNING *"#,
        )
        .bind(user_id)
        .bind(daily_ml)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_goal(&self, user_id: i64) -> Result<Option<WaterGoal>, AppError> {
        sqlx::query_as::<_, WaterGoal>("SELECT * FROM water_goals WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete_goal(&self, user_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM water_goals WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn create_entry(&self, entry: &WaterEntry) -> Result<WaterEntry, AppError> {
        sqlx::query_as::<_, WaterEntry>(
            r#"INSERT INTO water_entries (user_id, amount_ml, created_at, updated_at)
               VALUES (?, ?, ?, ?) RETURNING *"#,
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
            "SELECT * FROM water_entries WHERE id = ? AND deleted_at IS NULL",
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
        let mut sql =
            String::from("SELECT * FROM water_entries WHERE user_id = ? AND deleted_at IS NULL");
        if start.is_some() {
            sql.push_str(" AND date(created_at) >= ?");
        }
        if end.is_some() {
            sql.push_str(" AND date(created_at) <= ?");
        }
        sql.push_str(" ORDER BY created_at DESC LIMIT ? OFFSET ?");

        let mut query = sqlx::query_as::<_, WaterEntry>(&sql).bind(user_id);
        if let Some(s) = start {
            query = query.bind(s);
        }
        if let Some(e) = end {
            query = query.bind(e);
        }
        query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_entry(&self, entry: &WaterEntry) -> Result<WaterEntry, AppError> {
        sqlx::query_as::<_, WaterEntry>(
            r#"UPDATE water_entries SET amount_ml=?, updated_at=?
               WHERE id=? AND deleted_at IS NULL RETURNING *"#,
        )
        .bind(entry.amount_ml)
        .bind(entry.updated_at)
        .bind(entry.id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn soft_delete_entry(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE water_entries SET deleted_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
