use crate::config::SessionLayer;
use crate::{handlers, AppState};
use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::path::Path;
use tower_http::{services::ServeDir, trace::TraceLayer};

pub fn build_router(state: AppState, session_layer: SessionLayer, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(handlers::login_page))
        .route(
            "/login",
            get(handlers::login_page).post(handlers::login_handler),
        )
        .route(
            "/register",
            get(handlers::register_page).post(handlers::register_handler),
        )
        .route(
            "/forgot-password",
            get(handlers::forgot_password_page).post(handlers::forgot_password_handler),
        )
        .route("/logout", get(handlers::logout_handler))
        // Prediction
        .route("/predict", post(handlers::predict_handler))
        .route("/save_prediction", post(handlers::save_prediction_handler))
        // Pages
        .route("/index", get(handlers::index_handler))
        .route("/dashboard", get(handlers::dashboard_handler))
        .route("/emission", get(handlers::emission_handler))
        .route("/predictor", get(handlers::predictor_handler))
        .route(
            "/calculate_total_carbon_emission",
            get(handlers::calculator_handler),
        )
        .route("/about_us", get(handlers::about_us_handler))
        .route("/contact_us", get(handlers::contact_us_handler))
        // Static files, including the dashboard CSV data
        .nest_service("/static", ServeDir::new(static_dir))
        // Layers
        .layer(session_layer)
        .layer(middleware::from_fn(add_security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn add_security_headers(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        "Content-Security-Policy",
        HeaderValue::from_static(
            "default-src 'self'; \
             script-src 'self' 'unsafe-inline' https://cdn.jsdelivr.net; \
             style-src 'self' 'unsafe-inline'; \
             img-src 'self' data:; \
             connect-src 'self'; \
             frame-ancestors 'none';",
        ),
    );
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    response
}
