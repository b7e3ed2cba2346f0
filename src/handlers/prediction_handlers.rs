use crate::auth::session::current_user_id;
use crate::error::{AppError, Result};
use crate::services::{prediction_service::format_prediction, PredictionRequest};
use crate::AppState;
use axum::{
    extract::{Form, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::info;

#[derive(Deserialize)]
pub struct PredictForm {
    #[serde(default)]
    pub engine_size: String,
    #[serde(default)]
    pub vehicle_class: String,
}

#[derive(Debug, Deserialize)]
pub struct SavePredictionRequest {
    #[serde(default)]
    pub vehicle_class: Option<String>,
    #[serde(default)]
    pub engine_size: Option<f64>,
    #[serde(default)]
    pub prediction: Option<f64>,
}

#[derive(Serialize)]
pub struct SavePredictionResponse {
    pub success: bool,
}

/// POST /predict - Plain-text prediction for one vehicle
pub async fn predict_handler(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PredictForm>,
) -> Result<String> {
    let engine_size = form
        .engine_size
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|size| size.is_finite())
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "Error: Engine size \"{}\" is not a number.",
                form.engine_size
            ))
        })?;

    let request = PredictionRequest {
        engine_size,
        vehicle_class: form.vehicle_class,
    };

    let user_id = current_user_id(&session).await;
    let prediction = state.prediction_service.predict(request, user_id).await?;

    Ok(format_prediction(prediction))
}

/// POST /save_prediction - Accepted and logged; history is written by /predict.
pub async fn save_prediction_handler(
    session: Session,
    Json(payload): Json<SavePredictionRequest>,
) -> Json<SavePredictionResponse> {
    let user_id = current_user_id(&session).await;
    info!(
        "save_prediction received for user {:?}: class={:?} engine_size={:?} prediction={:?}",
        user_id, payload.vehicle_class, payload.engine_size, payload.prediction
    );

    Json(SavePredictionResponse { success: true })
}
