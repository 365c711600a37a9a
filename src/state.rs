use crate::config::Config;
use crate::domain::ports::{
    AuthRepository, EventRepository, QuestionnaireRepository, QuoteRepository,
    ReminderRepository, UserRepository, WaterRepository,
};
use crate::domain::services::auth_service::AuthService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub water_repo: Arc<dyn WaterRepository>,
    pub questionnaire_repo: Arc<dyn QuestionnaireRepository>,
    pub quote_repo: Arc<dyn QuoteRepository>,
    pub reminder_repo: Arc<dyn ReminderRepository>,
    pub auth_service: Arc<AuthService>,
}
