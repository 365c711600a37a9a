pub mod postgres_auth_repo;
pub mod postgres_event_repo;
pub mod postgres_questionnaire_repo;
pub mod postgres_quote_repo;
pub mod postgres_reminder_repo;
pub mod postgres_user_repo;
pub mod postgres_water_repo;
pub mod sqlite_auth_repo;
pub mod sqlite_event_repo;
pub mod sqlite_questionnaire_repo;
pub mod sqlite_quote_repo;
pub mod sqlite_reminder_repo;
pub mod sqlite_user_repo;
pub mod sqlite_water_repo;
