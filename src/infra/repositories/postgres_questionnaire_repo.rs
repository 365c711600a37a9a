use crate::domain::{models::questionnaire::Questionnaire, ports::QuestionnaireRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresQuestionnaireRepo {
    pool: PgPool,
}

impl PostgresQuestionnaireRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestionnaireRepository for PostgresQuestionnaireRepo {
    async fn create(&self, questionnaire: &Questionnaire) -> Result<Questionnaire, AppError> {
        sqlx::query_as::<_, Questionnaire>(
            r#"INSERT INTO questionnaires (
                user_id, weight, height, birthday, health_issues, bad_habits,
                workout_environment, work_shift, wake_up_time, sleep_time,
                morning_routine, evening_routine, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *"#,
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
        sqlx::query_as::<_, Questionnaire>("SELECT * FROM questionnaires WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, questionnaire: &Questionnaire) -> Result<Questionnaire, AppError> {
        sqlx::query_as::<_, Questionnaire>(
            r#"UPDATE questionnaires SET
                weight=$1, height=$2, birthday=$3, health_issues=$4, bad_habits=$5,
                workout_environment=$6, work_shift=$7, wake_up_time=$8, sleep_time=$9,
                morning_routine=$10, evening_routine=$11, updated_at=$12
               WHERE user_id=$13 RETURNING *"#,
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
