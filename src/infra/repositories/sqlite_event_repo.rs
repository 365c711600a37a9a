use crate::domain::{
    models::event::{Event, EventCopy, EventException, EventWithUsers},
    ports::EventRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

pub struct SqliteEventRepo {
    pool: SqlitePool,
}

impl SqliteEventRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const INSERT_EVENT_SQL: &str = r#"INSERT INTO events (
        user_id, created_by, title, description, start_time, end_time, all_day,
        repeat_type, repeat_interval, repeat_days, repeat_end_type,
        repeat_until, repeat_count, parent_event_id, created_at, updated_at
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    RETURNING *"#;

async fn insert_event(conn: &mut SqliteConnection, event: &Event) -> Result<Event, sqlx::Error> {
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

fn placeholders(n: usize) -> String {
    std::iter::repeat("?").take(n).collect::<Vec<_>>().join(", ")
}

#[async_trait]
impl EventRepository for SqliteEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        let mut conn = self.pool.acquire().await.map_err(AppError::Database)?;
        insert_event(&mut conn, event).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
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
               WHERE e.id = ?"#,
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
        let sql = format!(
            "SELECT * FROM events WHERE id IN ({})",
            placeholders(ids.len())
        );
        let mut query = sqlx::query_as::<_, Event>(&sql);
        for id in ids {
            query = query.bind(id);
        }
        query.fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(
        &self,
        user_id: Option<i64>,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<Event>, AppError> {
        // Replacement events spawned by single-occurrence edits render only
        // through their exception; they never appear as base rows.
        let mut sql = String::from(
            "SELECT * FROM events WHERE id NOT IN \
             (SELECT modified_event_id FROM event_exceptions WHERE modified_event_id IS NOT NULL)",
        );
        if user_id.is_some() {
            sql.push_str(" AND user_id = ?");
        }
        match (start, end) {
            (Some(_), Some(_)) => {
                // A repeating series stays a candidate as long as it has not
                // terminated before the window; containment of concrete
                // instances is decided by the caller.
                sql.push_str(
                    " AND start_time <= ? AND ( \
                       (repeat_type = 'none' AND end_time >= ?) \
                       OR (repeat_type != 'none' AND (repeat_until IS NULL OR repeat_until >= ?)))",
                );
            }
            (Some(_), None) => sql.push_str(
                " AND ((repeat_type = 'none' AND end_time >= ?) \
                   OR (repeat_type != 'none' AND (repeat_until IS NULL OR repeat_until >= ?)))",
            ),
            (None, Some(_)) => sql.push_str(" AND start_time <= ?"),
            (None, None) => {}
        }
        sql.push_str(" ORDER BY start_time");

        let mut query = sqlx::query_as::<_, Event>(&sql);
        if let Some(uid) = user_id {
            query = query.bind(uid);
        }
        match (start, end) {
            (Some(s), Some(e)) => {
                query = query.bind(e).bind(s).bind(s);
            }
            (Some(s), None) => query = query.bind(s).bind(s),
            (None, Some(e)) => query = query.bind(e),
            (None, None) => {}
        }
        query.fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"UPDATE events SET
                user_id=?, title=?, description=?, start_time=?, end_time=?, all_day=?,
                repeat_type=?, repeat_interval=?, repeat_days=?, repeat_end_type=?,
                repeat_until=?, repeat_count=?, updated_at=?
               WHERE id=? RETURNING *"#,
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

        // Replacement events spawned by modified exceptions go with the base.
        sqlx::query(
            "DELETE FROM events WHERE id IN ( \
               SELECT modified_event_id FROM event_exceptions \
               WHERE event_id = ? AND modified_event_id IS NOT NULL)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)
    }

    async fn split_series(&self, truncated: &Event, continuation: &Event) -> Result<Event, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query(
            "UPDATE events SET repeat_end_type=?, repeat_until=?, repeat_count=?, updated_at=? WHERE id=?",
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
             VALUES (?, ?, 'deleted', NULL, ?)",
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
             VALUES (?, ?, 'modified', ?, ?)",
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
        let sql = format!(
            "SELECT * FROM event_exceptions WHERE event_id IN ({})",
            placeholders(event_ids.len())
        );
        let mut query = sqlx::query_as::<_, EventException>(&sql);
        for id in event_ids {
            query = query.bind(id);
        }
        query.fetch_all(&self.pool).await.map_err(AppError::Database)
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
                 VALUES (?, ?, ?, ?) RETURNING *",
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
            "SELECT * FROM event_copies WHERE event_id = ? ORDER BY date",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }
}
