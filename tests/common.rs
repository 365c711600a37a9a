#![allow(dead_code)]

use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2,
};
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use chrono::Utc;
use fitcoach_backend::{
    api::router::create_router,
    config::Config,
    domain::services::auth_service::AuthService,
    infra::repositories::{
        sqlite_auth_repo::SqliteAuthRepo, sqlite_event_repo::SqliteEventRepo,
        sqlite_questionnaire_repo::SqliteQuestionnaireRepo, sqlite_quote_repo::SqliteQuoteRepo,
        sqlite_reminder_repo::SqliteReminderRepo, sqlite_user_repo::SqliteUserRepo,
        sqlite_water_repo::SqliteWaterRepo,
    },
    state::AppState,
};
use rand::rngs::OsRng;
use serde_json::Value;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "coach@fitcoach.test";
pub const ADMIN_PASSWORD: &str = "coach-password";
pub const CLIENT_EMAIL: &str = "client@fitcoach.test";
pub const CLIENT_PASSWORD: &str = "client-password";

pub struct AuthHeaders {
    pub access_token: String,
    pub csrf_token: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub admin_id: i64,
    pub client_id: i64,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
        };

        let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));

        let state = Arc::new(AppState {
            config: config.clone(),
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            auth_repo,
            event_repo: Arc::new(SqliteEventRepo::new(pool.clone())),
            water_repo: Arc::new(SqliteWaterRepo::new(pool.clone())),
            questionnaire_repo: Arc::new(SqliteQuestionnaireRepo::new(pool.clone())),
            quote_repo: Arc::new(SqliteQuoteRepo::new(pool.clone())),
            reminder_repo: Arc::new(SqliteReminderRepo::new(pool.clone())),
            auth_service,
        });

        let admin_id = seed_user(&pool, "ADMIN", "Anna", "Coach", ADMIN_EMAIL, ADMIN_PASSWORD).await;
        let client_id =
            seed_user(&pool, "CLIENT", "Carl", "Client", CLIENT_EMAIL, CLIENT_PASSWORD).await;

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            admin_id,
            client_id,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthHeaders {
        let payload = serde_json::json!({
            "email": email,
            "password": password
        });

        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let cookies: Vec<String> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|h| h.to_str().unwrap().to_string())
            .collect();

        let access_token_cookie = cookies
            .iter()
            .find(|c| c.contains("access_token="))
            .expect("No access_token cookie returned");

        let start = access_token_cookie.find("access_token=").unwrap() + 13;
        let end = access_token_cookie[start..]
            .find(';')
            .unwrap_or(access_token_cookie.len() - start);
        let access_token = access_token_cookie[start..start + end].to_string();

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body_json: Value = serde_json::from_slice(&body_bytes).unwrap();
        let csrf_token = body_json["csrf_token"]
            .as_str()
            .expect("No csrf_token in body")
            .to_string();

        AuthHeaders {
            access_token,
            csrf_token,
        }
    }

    pub async fn login_admin(&self) -> AuthHeaders {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    #[allow(dead_code)]
    pub async fn login_client(&self) -> AuthHeaders {
        self.login(CLIENT_EMAIL, CLIENT_PASSWORD).await
    }
}

pub async fn seed_user(
    pool: &Pool<Sqlite>,
    role: &str,
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> i64 {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string();

    let row: (i64,) = sqlx::query_as(
        "INSERT INTO users (role, first_name, last_name, email, password_hash, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(role)
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(&password_hash)
    .bind(Utc::now())
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .expect("Failed to seed user");
    row.0
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
