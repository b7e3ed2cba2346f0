pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod flash;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<services::UserService>,
    pub auth_service: Arc<services::AuthService>,
    pub prediction_service: Arc<services::PredictionService>,
    pub dashboard_service: Arc<services::DashboardService>,
}

impl AppState {
    /// Wires the SQLite repositories and services around one loaded model.
    pub fn new(
        pool: sqlx::SqlitePool,
        model: Arc<dyn services::Regressor>,
        static_dir: impl Into<std::path::PathBuf>,
    ) -> Self {
        let user_repository = Arc::new(repositories::SqliteUserRepository::new(pool.clone()));
        let emission_repository = Arc::new(repositories::SqliteEmissionRepository::new(pool));

        Self {
            user_service: Arc::new(services::UserService::new(
                user_repository.clone(),
                emission_repository.clone(),
            )),
            auth_service: Arc::new(services::AuthService::new(user_repository)),
            prediction_service: Arc::new(services::PredictionService::new(
                model,
                emission_repository,
            )),
            dashboard_service: Arc::new(services::DashboardService::new(static_dir)),
        }
    }
}
