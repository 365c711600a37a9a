use crate::domain::models::{
    auth::RefreshTokenRecord,
    event::{Event, EventCopy, EventException, EventWithUsers},
    questionnaire::Questionnaire,
    quote::MotivationalQuote,
    reminder::ReminderSettings,
    user::User,
    water::{WaterEntry, WaterGoal},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
    async fn list(&self) -> Result<Vec<User>, AppError>;
    async fn update(&self, user: &User) -> Result<User, AppError>;
    async fn soft_delete(&self, id: i64) -> Result<(), AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Event>, AppError>;
    async fn find_with_users(&self, id: i64) -> Result<Option<EventWithUsers>, AppError>;
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Event>, AppError>;
    async fn list(
        &self,
        user_id: Option<i64>,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<Event>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    /// Deletes the event together with replacement events spawned by its
    /// modified exceptions, in one transaction.
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    /// Truncates the original series and inserts its continuation atomically.
    /// Returns the continuation event.
    async fn split_series(&self, truncated: &Event, continuation: &Event) -> Result<Event, AppError>;
    async fn create_exception_deleted(&self, event_id: i64, date: NaiveDate) -> Result<(), AppError>;
    /// Inserts the replacement event and the `modified` exception pointing at
    /// it in one transaction. Returns the stored replacement.
    async fn create_exception_with_replacement(
        &self,
        event_id: i64,
        date: NaiveDate,
        replacement: &Event,
    ) -> Result<Event, AppError>;
    async fn list_exceptions(&self, event_ids: &[i64]) -> Result<Vec<EventException>, AppError>;

    /// Inserts the copied events and their provenance rows in one
    /// transaction. Each pair is the event to insert and the copy-record
    /// timestamp. Returns the provenance rows.
    async fn create_copies(
        &self,
        source_event_id: i64,
        copies: &[(Event, NaiveDateTime)],
    ) -> Result<Vec<EventCopy>, AppError>;
    async fn list_copies(&self, event_id: i64) -> Result<Vec<EventCopy>, AppError>;
}

#[async_trait]
pub trait WaterRepository: Send + Sync {
    async fn upsert_goal(&self, user_id: i64, daily_ml: i32) -> Result<WaterGoal, AppError>;
    async fn find_goal(&self, user_id: i64) -> Result<Option<WaterGoal>, AppError>;
    async fn delete_goal(&self, user_id: i64) -> Result<(), AppError>;

    async fn create_entry(&self, entry: &WaterEntry) -> Result<WaterEntry, AppError>;
    async fn find_entry(&self, id: i64) -> Result<Option<WaterEntry>, AppError>;
    async fn list_entries(
        &self,
        user_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WaterEntry>, AppError>;
    async fn update_entry(&self, entry: &WaterEntry) -> Result<WaterEntry, AppError>;
    async fn soft_delete_entry(&self, id: i64) -> Result<(), AppError>;
}

#[async_trait]
pub trait QuestionnaireRepository: Send + Sync {
    async fn create(&self, questionnaire: &Questionnaire) -> Result<Questionnaire, AppError>;
    async fn find_by_user(&self, user_id: i64) -> Result<Option<Questionnaire>, AppError>;
    async fn update(&self, questionnaire: &Questionnaire) -> Result<Questionnaire, AppError>;
}

#[async_trait]
pub trait QuoteRepository: Send + Sync {
    async fn create(&self, quote: &MotivationalQuote) -> Result<MotivationalQuote, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<MotivationalQuote>, AppError>;
    async fn list(&self) -> Result<Vec<MotivationalQuote>, AppError>;
    async fn list_active(&self) -> Result<Vec<MotivationalQuote>, AppError>;
    /// Active quote already selected on `date`, if any.
    async fn find_shown_on(&self, date: NaiveDate) -> Result<Option<MotivationalQuote>, AppError>;
    async fn update(&self, quote: &MotivationalQuote) -> Result<MotivationalQuote, AppError>;
    /// Bumps the view counter and stamps the selection time.
    async fn mark_shown(&self, id: i64, at: DateTime<Utc>) -> Result<MotivationalQuote, AppError>;
    async fn soft_delete(&self, id: i64) -> Result<(), AppError>;
}

#[async_trait]
pub trait ReminderRepository: Send + Sync {
    async fn find_by_user(&self, user_id: i64) -> Result<Option<ReminderSettings>, AppError>;
    async fn create_default(&self, user_id: i64) -> Result<ReminderSettings, AppError>;
    async fn update(&self, settings: &ReminderSettings) -> Result<ReminderSettings, AppError>;
}
