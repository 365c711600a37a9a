use crate::domain::{models::quote::MotivationalQuote, ports::QuoteRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

pub struct PostgresQuoteRepo {
    pool: PgPool,
}

impl PostgresQuoteRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuoteRepository for PostgresQuoteRepo {
    async fn create(&self, quote: &MotivationalQuote) -> Result<MotivationalQuote, AppError> {
        sqlx::query_as::<_, MotivationalQuote>(
            r#"INSERT INTO motivational_quotes (quote, author, is_active, times_shown, created_at, updated_at)
               VALUES ($1, $2, $3, 0, $4, $5) RETURNING *"#,
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
            "SELECT * FROM motivational_quotes WHERE id = $1 AND deleted_at IS NULL",
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
            "SELECT * FROM motivational_quotes WHERE is_active AND deleted_at IS NULL",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_shown_on(&self, date: NaiveDate) -> Result<Option<MotivationalQuote>, AppError> {
        sqlx::query_as::<_, MotivationalQuote>(
            r#"SELECT * FROM motivational_quotes
               WHERE is_active AND deleted_at IS NULL AND (last_shown_at AT TIME ZONE 'UTC')::DATE = $1"#,
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn update(&self, quote: &MotivationalQuote) -> Result<MotivationalQuote, AppError> {
        sqlx::query_as::<_, MotivationalQuote>(
            r#"UPDATE motivational_quotes SET quote=$1, author=$2, is_active=$3, updated_at=$4
               WHERE id=$5 AND deleted_at IS NULL RETURNING *"#,
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
               SET times_shown = times_shown + 1, last_shown_at = $1, updated_at = $1
               WHERE id = $2 RETURNING *"#,
        )
        .bind(at)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn soft_delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE motivational_quotes SET deleted_at = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
