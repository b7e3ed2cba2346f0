pub mod auth_service;
pub mod dashboard_service;
pub mod emission_model;
pub mod password;
pub mod prediction_service;
pub mod user_service;

pub use auth_service::{AuthService, AuthServiceError, LoginRequest};
pub use dashboard_service::{ChartKind, ChartView, Dashboard, DashboardService};
pub use emission_model::{EmissionModel, ModelError, Regressor};
pub use prediction_service::{PredictionError, PredictionRequest, PredictionService};
pub use user_service::{CreateUserRequest, UpdatePasswordRequest, UserService, UserServiceError};
