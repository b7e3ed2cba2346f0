use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One stored prediction, written when a logged-in user runs `/predict`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct EmissionRecord {
    pub id: i64,
    pub user_id: i64,
    pub vehicle_class: String,
    pub engine_size: f64,
    pub carbon_emission: f64,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewEmissionRecord {
    pub user_id: i64,
    pub vehicle_class: String,
    pub engine_size: f64,
    pub carbon_emission: f64,
}
