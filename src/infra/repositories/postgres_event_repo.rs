use crate::domain::{
    models::event::{Event, EventCopy, EventException, EventWithUsers},
    ports::EventRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use sqlx::{PgConnection, PgPool};

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const INSERT_EVENT_SQL: &str = r#"INSERT INTO events (
        user_id, created_by, title, description, start_time, end_time, all_day,
        repeat_type, repeat_interval, repeat_days, repeat_end_type,
        repeat_until, repeat_count, parent_event_id, created_at, updated_at
    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
    RETURNING *"#;

async fn insert_event(conn: &mut PgConnection, event: &Event) -> Result<Event, sqlx::Error> {
    sqlx::query_as::<_, Event>(INSERT_EVENT_SQL)
        .bind(event.user_id)
        .bind(event.created_by)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(event.all_day)
        .bind(event.repeat_type)
        .bind(event.repeat_interval)
        .bind(&event.repeat_days)
        .bind(event.repeat_end_type)
        .bind(event.repeat_until)
        .bind(event.repeat_count)
        .bind(event.parent_event_id)
        .bind(event.created_at)
        .bind(event.updated_at)
        .fetch_one(&mut *conn)
        .await
}

#[async_trait]
impl EventRepository for PostgresEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        let mut conn = self.pool.acquire().await.map_err(AppError::Database)?;
        insert_event(&mut conn, event).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_with_users(&self, id: i64) -> Result<Option<EventWithUsers>, AppError> {
        sqlx::query_as::<_, EventWithUsers>(
            r#"SELECT e.*,
                      u.first_name AS user_first_name,
                      u.last_name AS user_last_name,
                      u.email AS user_email,
                      c.first_name AS creator_first_name,
                      c.last_name AS creator_last_name
               FROM events e
               LEFT JOIN users u ON u.id = e.user_id
               LEFT JOIN users c ON c.id = e.created_by
               WHERE e.id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Event>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(
        &self,
        user_id: Option<i64>,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<Event>, AppError> {
        // A repeating series stays a candidate as long as it has not
        // terminated before the window; instance containment is the caller's
        // concern.
        sqlx::query_as::<_, Event>(
            r#"SELECT * FROM events
               WHERE id NOT IN (SELECT modified_event_id FROM event_exceptions
                                WHERE modified_event_id IS NOT NULL)
                 AND ($1::BIGINT IS NULL OR user_id = $1)
                 AND ($3::TIMESTAMP IS NULL OR start_time <= $3)
                 AND ($2::TIMESTAMP IS NULL OR
                      (repeat_type = 'none' AND end_time >= $2)
                      OR (repeat_type != 'none' AND (repeat_until IS NULL OR repeat_until >= $2)))
               ORDER BY start_time"#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"UPDATE events SET
                user_id=$1, title=$2, description=$3, start_time=$4, end_time=$5, all_day=$6,
                repeat_type=$7, repeat_interval=$8, repeat_days=$9, repeat_end_type=$10,
                repeat_until=$11, repeat_count=$12, updated_at=$13
               WHERE id=$14 RETURNING *"#,
        )
        .bind(event.user_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(event.all_day)
        .bind(event.repeat_type)
        .bind(event.repeat_interval)
        .bind(&event.repeat_days)
        .bind(event.repeat_end_type)
        .bind(event.repeat_until)
        .bind(event.repeat_count)
        .bind(event.updated_at)
        .bind(event.id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query(
            "DELETE FROM events WHERE id IN ( \
               SELECT modified_event_id FROM event_exceptions \
               WHERE event_id = $1 AND modified_event_id IS NOT NULL)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)
    }

    async fn split_series(&self, truncated: &Event, continuation: &Event) -> Result<Event, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query(
            "UPDATE events SET repeat_end_type=$1, repeat_until=$2, repeat_count=$3, updated_at=$4 WHERE id=$5",
        )
        .bind(truncated.repeat_end_type)
        .bind(truncated.repeat_until)
        .bind(truncated.repeat_count)
        .bind(truncated.updated_at)
        .bind(truncated.id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        let stored = insert_event(&mut tx, continuation)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(stored)
    }

    async fn create_exception_deleted(&self, event_id: i64, date: NaiveDate) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO event_exceptions (event_id, exception_date, exception_type, modified_event_id, created_at) \
             VALUES ($1, $2, 'deleted', NULL, $3)",
        )
        .bind(event_id)
        .bind(date)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;
        Ok(())
    }

    async fn create_exception_with_replacement(
        &self,
        event_id: i64,
        date: NaiveDate,
        replacement: &Event,
    ) -> Result<Event, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let stored = insert_event(&mut tx, replacement)
            .await
            .map_err(AppError::Database)?;

        sqlx::query(
            "INSERT INTO event_exceptions (event_id, exception_date, exception_type, modified_event_id, created_at) \
             VALUES ($1, $2, 'modified', $3, $4)",
        )
        .bind(event_id)
        .bind(date)
        .bind(stored.id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(stored)
    }

    async fn list_exceptions(&self, event_ids: &[i64]) -> Result<Vec<EventException>, AppError> {
        if event_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, EventException>(
            "SELECT * FROM event_exceptions WHERE event_id = ANY($1)",
        )
        .bind(event_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn create_copies(
        &self,
        source_event_id: i64,
        copies: &[(Event, NaiveDateTime)],
    ) -> Result<Vec<EventCopy>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let mut records = Vec::with_capacity(copies.len());

        for (event, target_start) in copies {
            insert_event(&mut tx, event).await.map_err(AppError::Database)?;

            let record = sqlx::query_as::<_, EventCopy>(
                "INSERT INTO event_copies (event_id, user_id, date, created_at) \
                 VALUES ($1, $2, $3, $4) RETURNING *",
            )
            .bind(source_event_id)
            .bind(event.user_id)
            .bind(target_start)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;
            records.push(record);
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(records)
    }

    async fn list_copies(&self, event_id: i64) -> Result<Vec<EventCopy>, AppError> {
        sqlx::query_as::<_, EventCopy>(
            "SELECT * FROM event_copies WHERE event_id = $1 ORDER BY date",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }
}
