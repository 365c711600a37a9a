use crate::domain::{models::questionnaire::Questionnaire, ports::QuestionnaireRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteQuestionnaireRepo {
    pool: SqlitePool,
}

impl SqliteQuestionnaireRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestionnaireRepository for SqliteQuestionnaireRepo {
    async fn create(&self, questionnaire: &Questionnaire) -> Result<Questionnaire, AppError> {
        sqlx::query_as::<_, Questionnaire>(
            r#"INSERT INTO questionnaires (
                user_id, weight, height, birthday, health_issues, bad_habits,
                workout_environment, work_shift, wake_up_time, sleep_time,
                morning_routine, evening_routine, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"#,
        )
        .bind(questionnaire.user_id)
        .bind(questionnaire.weight)
        .bind(questionnaire.height)
        .bind(questionnaire.birthday)
        .bind(&questionnaire.health_issues)
        .bind(&questionnaire.bad_habits)
        .bind(questionnaire.workout_environment)
        .bind(questionnaire.work_shift)
        .bind(&questionnaire.wake_up_time)
        .bind(&questionnaire.sleep_time)
        .bind(&questionnaire.morning_routine)
        .bind(&questionnaire.evening_routine)
        .bind(questionnaire.created_at)
        .bind(questionnaire.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Option<Questionnaire>, AppError> {
        sqlx::query_as::<_, Questionnaire>("SELECT * FROM questionnaires WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, questionnaire: &Questionnaire) -> Result<Questionnaire, AppError> {
        sqlx::query_as::<_, Questionnaire>(
            r#"UPDATE questionnaires SET
                weight=?, height=?, birthday=?, health_issues=?, bad_habits=?,
                workout_environment=?, work_shift=?, wake_up_time=?, sleep_time=?,
                morning_routine=?, evening_routine=?, updated_at=?
               WHERE user_id=? RETURNING *"#,
        )
        .bind(questionnaire.weight)
        .bind(questionnaire.height)
        .bind(questionnaire.birthday)
        .bind(&questionnaire.health_issues)
        .bind(&questionnaire.bad_habits)
        .bind(questionnaire.workout_environment)
        .bind(questionnaire.work_shift)
        .bind(&questionnaire.wake_up_time)
        .bind(&questionnaire.sleep_time)
        .bind(&questionnaire.morning_routine)
        .bind(&questionnaire.evening_routine)
        .bind(questionnaire.updated_at)
        .bind(questionnaire.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }
}
