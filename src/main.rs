use co2_predictor::{
    config::{AppConfig, SessionConfig},
    db, routes,
    services::{EmissionModel, Regressor},
    AppState,
};
use std::sync::Arc;
use tower_sessions_sqlx_store::SqliteStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "co2_predictor=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Database connection
    let pool = db::create_pool(&config.database_url).await?;
    db::migrate(&pool).await?;

    // Model is read-only after startup
    let model = EmissionModel::from_path(&config.model_path)?;
    tracing::info!(
        "Loaded model from {} ({} trees, {} features)",
        config.model_path.display(),
        model.tree_count(),
        model.feature_names().len()
    );

    let app_state = AppState::new(pool.clone(), Arc::new(model), &config.static_dir);

    // Session store
    let session_store = SqliteStore::new(pool.clone())
        .with_table_name("sessions")
        .map_err(|e| anyhow::anyhow!("Invalid session table name: {}", e))?;
    session_store.migrate().await?;

    let session_layer = SessionConfig::from_env().create_layer(session_store);

    let app = routes::build_router(app_state, session_layer, &config.static_dir);

    let addr = config.socket_addr();
    tracing::info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
