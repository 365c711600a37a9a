pub mod auth_service;
pub mod occurrences;
pub mod quotes;
pub mod series;
pub mod timezone;
