use std::{collections::HashMap, env};

use axum::{
    body::Body,
    http::{header, Request},
    routing::get,
    Router,
};
use co2_predictor::{
    config::{AppConfig, ConfigError, SessionConfig},
    test_utils::test_helpers,
};
use serial_test::serial;
use tower::ServiceExt;
use tower_sessions::{cookie::SameSite, Session};
use tower_sessions_sqlx_store::SqliteStore;

#[derive(Default)]
struct EnvGuard {
    original: HashMap<String, Option<String>>,
}

impl EnvGuard {
    fn set(&mut self, key: &str, value: impl Into<String>) {
        self.original
            .entry(key.to_string())
            .or_insert_with(|| env::var(key).ok());
        env::set_var(key, value.into());
    }

    fn remove(&mut self, key: &str) {
        self.original
            .entry(key.to_string())
            .or_insert_with(|| env::var(key).ok());
        env::remove_var(key);
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.original.drain() {
            match value {
                Some(v) => env::set_var(&key, v),
                None => env::remove_var(&key),
            }
        }
    }
}

#[test]
#[serial]
fn app_config_defaults() {
    let mut env_guard = EnvGuard::default();
    env_guard.set("DATABASE_URL", "sqlite://data/co2.db");
    for key in ["HOST", "PORT", "MODEL_PATH", "STATIC_DIR"] {
        env_guard.remove(key);
    }

    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.database_url, "sqlite://data/co2.db");
    assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
    assert_eq!(config.model_path.to_str(), Some("model/co2_model.json"));
    assert_eq!(config.static_dir.to_str(), Some("static"));
}

#[test]
#[serial]
fn app_config_requires_database_url() {
    let mut env_guard = EnvGuard::default();
    env_guard.remove("DATABASE_URL");

    assert!(matches!(
        AppConfig::from_env(),
        Err(ConfigError::Missing("DATABASE_URL"))
    ));
}

#[test]
#[serial]
fn app_config_rejects_bad_port() {
    let mut env_guard = EnvGuard::default();
    env_guard.set("DATABASE_URL", "sqlite::memory:");
    env_guard.set("PORT", "eighty");

    assert!(matches!(
        AppConfig::from_env(),
        Err(ConfigError::Invalid { key: "PORT", .. })
    ));
}

#[test]
#[serial]
fn app_config_overrides() {
    let mut env_guard = EnvGuard::default();
    env_guard.set("DATABASE_URL", "sqlite::memory:");
    env_guard.set("HOST", "0.0.0.0");
    env_guard.set("PORT", "5000");
    env_guard.set("MODEL_PATH", "/srv/models/forest.json");

    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.socket_addr().to_string(), "0.0.0.0:5000");
    assert_eq!(config.model_path.to_str(), Some("/srv/models/forest.json"));
}

async fn session_cookie_for_environment() -> tower_sessions::cookie::Cookie<'static> {
    let pool = test_helpers::create_test_db().await.unwrap();
    let session_store = SqliteStore::new(pool)
        .with_table_name("sessions_test")
        .expect("valid session table name for tests");
    session_store
        .migrate()
        .await
        .expect("session table migration to succeed");

    let session_layer = SessionConfig::from_env().create_layer(session_store);

    async fn set_session(session: Session) -> &'static str {
        session.insert("user_id", 1_i64).await.unwrap();
        "ok"
    }

    let app = Router::new().route("/", get(set_session)).layer(session_layer);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .body(Body::empty())
                .expect("request to build"),
        )
        .await
        .expect("router to respond");

    let cookie_header = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie to be issued")
        .to_str()
        .expect("cookie header to be valid ASCII")
        .to_string();

    tower_sessions::cookie::Cookie::parse(cookie_header).expect("cookie header to parse correctly")
}

#[tokio::test]
#[serial]
async fn session_cookie_flags_in_production() {
    let mut env_guard = EnvGuard::default();
    env_guard.set("ENVIRONMENT", "production");
    env_guard.set("SESSION_SECRET", "a-long-enough-secret-for-signing-cookies");

    let cookie = session_cookie_for_environment().await;

    assert_eq!(cookie.name(), "__Host-co2-session");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Strict));
}

#[tokio::test]
#[serial]
async fn session_cookie_flags_in_development() {
    let mut env_guard = EnvGuard::default();
    env_guard.remove("ENVIRONMENT");
    env_guard.remove("SESSION_SECRET");

    let cookie = session_cookie_for_environment().await;

    assert_eq!(cookie.name(), "co2-session");
    assert_eq!(cookie.http_only(), Some(true));
    assert_ne!(cookie.secure(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
}
