pub mod auth;
pub mod timezone;
