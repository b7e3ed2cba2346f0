pub mod test_helpers {
    use crate::config::SessionConfig;
    use crate::services::{password::hash_password, EmissionModel};
    use crate::{routes, AppState};
    use axum::Router;
    use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
    use std::path::PathBuf;
    use std::sync::Arc;
    use tempfile::NamedTempFile;
    use tower_sessions_sqlx_store::SqliteStore;

    /// Two trees over engine size and three vehicle classes.
    ///
    /// COMPACT at 2.0L predicts (190 + 185) / 2 = 187.5,
    /// SUV - SMALL at 3.5L predicts (280 + 260) / 2 = 270.
    pub const TEST_MODEL_JSON: &str = r#"{
        "feature_names": [
            "Engine Size(L)",
            "Vehicle Class_COMPACT",
            "Vehicle Class_SUV - SMALL",
            "Vehicle Class_PICKUP TRUCK - STANDARD"
        ],
        "trees": [
            { "nodes": [
                { "feature": 0, "threshold": 2.5, "left": 1, "right": 2 },
                { "value": 190.0 },
                { "value": 280.0 }
            ] },
            { "nodes": [
                { "feature": 1, "threshold": 0.5, "left": 1, "right": 2 },
                { "value": 260.0 },
                { "value": 185.0 }
            ] }
        ]
    }"#;

    /// Create a new in-memory SQLite database for testing
    pub async fn create_test_db() -> Result<SqlitePool, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(pool)
    }

    /// Create a temporary file-based SQLite database for testing
    /// Useful when you need to test features that don't work with in-memory databases
    pub async fn create_test_db_file() -> Result<(SqlitePool, NamedTempFile), sqlx::Error> {
        let temp_file = NamedTempFile::new().map_err(sqlx::Error::Io)?;
        let db_path = temp_file
            .path()
            .to_str()
            .ok_or_else(|| sqlx::Error::Configuration("Invalid database path".into()))?;
        let database_url = format!("sqlite://{}", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok((pool, temp_file))
    }

    /// Insert a test user with hashed password
    pub async fn insert_test_user(
        pool: &SqlitePool,
        email: &str,
        password: &str,
    ) -> Result<i64, sqlx::Error> {
        let password_hash = hash_password(password).map_err(|e| {
            sqlx::Error::Configuration(format!("Password hashing failed: {}", e).into())
        })?;

        let result = sqlx::query("INSERT INTO users (email, password_hash) VALUES (?, ?)")
            .bind(email)
            .bind(password_hash)
            .execute(pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn count_emissions(pool: &SqlitePool, user_id: i64) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM emissions WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    pub fn test_model() -> EmissionModel {
        match EmissionModel::from_json(TEST_MODEL_JSON) {
            Ok(model) => model,
            Err(e) => panic!("Test model failed to load: {}", e),
        }
    }

    pub fn static_dir() -> PathBuf {
        PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
    }

    /// The full router over `pool`, with sessions stored in the same database.
    pub async fn create_test_app(pool: SqlitePool) -> Result<Router, sqlx::Error> {
        let session_store = SqliteStore::new(pool.clone());
        session_store.migrate().await?;
        let session_layer = SessionConfig::from_env().create_layer(session_store);

        let static_dir = static_dir();
        let state = AppState::new(pool, Arc::new(test_model()), &static_dir);
        Ok(routes::build_router(state, session_layer, &static_dir))
    }
}

// Note: This is test-only code. Panic on error is acceptable in tests.
#[cfg(test)]
pub async fn create_test_pool() -> sqlx::SqlitePool {
    match test_helpers::create_test_db().await {
        Ok(pool) => pool,
        Err(e) => panic!("Failed to create test pool: {}", e),
    }
}
