pub mod page_handlers;
pub mod prediction_handlers;

pub use crate::auth::handlers::{
    forgot_password_handler, forgot_password_page, login_handler, login_page, logout_handler,
    register_handler, register_page,
};
pub use page_handlers::{
    about_us_handler, calculator_handler, contact_us_handler, dashboard_handler,
    emission_handler, index_handler, predictor_handler, PageContext,
};
pub use prediction_handlers::{predict_handler, save_prediction_handler};
