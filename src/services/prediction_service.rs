use crate::models::emission::NewEmissionRecord;
use crate::repositories::EmissionRepository;
use crate::services::emission_model::{
    ModelError, Regressor, ENGINE_SIZE_FEATURE, VEHICLE_CLASS_PREFIX,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("Error: Vehicle class \"{0}\" is not valid.")]
    InvalidVehicleClass(String),
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

pub struct PredictionRequest {
    pub engine_size: f64,
    pub vehicle_class: String,
}

/// Builds the model input row: every declared feature starts at zero, then the
/// engine size and the one-hot vehicle class column are set.
pub fn build_feature_vector(
    feature_names: &[String],
    engine_size: f64,
    vehicle_class: &str,
) -> Result<Vec<f64>, PredictionError> {
    let mut features: HashMap<&str, f64> = feature_names
        .iter()
        .map(|name| (name.as_str(), 0.0))
        .collect();

    features.insert(ENGINE_SIZE_FEATURE, engine_size);

    let class_feature = format!("{}{}", VEHICLE_CLASS_PREFIX, vehicle_class);
    match features.get_mut(class_feature.as_str()) {
        Some(slot) => *slot = 1.0,
        None => {
            return Err(PredictionError::InvalidVehicleClass(
                vehicle_class.to_string(),
            ))
        }
    }

    Ok(feature_names
        .iter()
        .map(|name| features.get(name.as_str()).copied().unwrap_or(0.0))
        .collect())
}

pub fn format_prediction(value: f64) -> String {
    format!("The predicted CO2 emissions is: {:.2} g/km", value)
}

pub struct PredictionService {
    model: Arc<dyn Regressor>,
    emission_repository: Arc<dyn EmissionRepository>,
}

impl PredictionService {
    pub fn new(model: Arc<dyn Regressor>, emission_repository: Arc<dyn EmissionRepository>) -> Self {
        Self {
            model,
            emission_repository,
        }
    }

    pub fn vehicle_classes(&self) -> Vec<String> {
        self.model.vehicle_classes()
    }

    /// Runs the model and, for a logged-in user, stores the result in the
    /// emission history. A failed insert is logged and the prediction still
    /// returned.
    pub async fn predict(
        &self,
        request: PredictionRequest,
        user_id: Option<i64>,
    ) -> Result<f64, PredictionError> {
        let row = build_feature_vector(
            self.model.feature_names(),
            request.engine_size,
            &request.vehicle_class,
        )?;

        let prediction = self.model.predict(&row)?;
        debug!(
            "Predicted {:.2} g/km for {} / {}L",
            prediction, request.vehicle_class, request.engine_size
        );

        if let Some(user_id) = user_id {
            let record = NewEmissionRecord {
                user_id,
                vehicle_class: request.vehicle_class,
                engine_size: request.engine_size,
                carbon_emission: prediction,
            };
            if let Err(e) = self.emission_repository.create_record(record).await {
                warn!("Failed to store emission record for user {}: {}", user_id, e);
            }
        }

        Ok(prediction)
    }
}
