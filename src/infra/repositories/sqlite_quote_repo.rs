use crate::domain::{models::quote::MotivationalQuote, ports::QuoteRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;

pub struct SqliteQuoteRepo {
    pool: SqlitePool,
}

impl SqliteQuoteRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuoteRepository for SqliteQuoteRepo {
    async fn create(&self, quote: &MotivationalQuote) -> Result<MotivationalQuote, AppError> {
        sqlx::query_as::<_, MotivationalQuote>(
            r#"INSERT INTO motivational_quotes (quote, author, is_active, times_shown, created_at, updated_at)
               VALUES (?, ?, ?, 0, ?, ?) RETURNING *"#,
        )
        .bind(&quote.quote)
        .bind(&quote.author)
        .bind(quote.is_active)
        .bind(quote.created_at)
        .bind(quote.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<MotivationalQuote>, AppError> {
        sqlx::query_as::<_, MotivationalQuote>(
            "SELECT * FROM motivational_quotes WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<MotivationalQuote>, AppError> {
        sqlx::query_as::<_, MotivationalQuote>(
            "SELECT * FROM motivational_quotes WHERE deleted_at IS NULL ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list_active(&self) -> Result<Vec<MotivationalQuote>, AppError> {
        sqlx::query_as::<_, MotivationalQuote>(
            "SELECT * FROM motivational_quotes WHERE is_active = 1 AND deleted_at IS NULL",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_shown_on(&self, date: NaiveDate) -> Result<Option<MotivationalQuote>, AppError> {
        sqlx::query_as::<_, MotivationalQuote>(
            r#"SELECT * FROM motivational_quotes
               WHERE is_active = 1 AND deleted_at IS NULL AND date(last_shown_at) = ?"#,
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn update(&self, quote: &MotivationalQuote) -> Result<MotivationalQuote, AppError> {
        sqlx::query_as::<_, MotivationalQuote>(
            r#"UPDATE motivational_quotes SET quote=?, author=?, is_active=?, updated_at=?
               WHERE id=? AND deleted_at IS NULL RETURNING *"#,
        )
        .bind(&quote.quote)
        .bind(&quote.author)
        .bind(quote.is_active)
        .bind(quote.updated_at)
        .bind(quote.id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn mark_shown(&self, id: i64, at: DateTime<Utc>) -> Result<MotivationalQuote, AppError> {
        sqlx::query_as::<_, MotivationalQuote>(
            r#"UPDATE motivational_quotes
               SET times_shown = times_shown + 1, last_shown_at = ?, updated_at = ?
               WHERE id = ? RETURNING *"#,
        )
        .bind(at)
        .bind(at)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn soft_delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE motivational_quotes SET deleted_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
