pub mod auth;
pub mod event;
pub mod questionnaire;
pub mod quote;
pub mod reminder;
pub mod user;
pub mod water;
