use crate::auth::session::current_user_id;
use crate::flash;
use crate::services::{ChartView, Dashboard};
use crate::AppState;
use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;

/// Values every page layout needs: pending flash messages and who is logged in.
pub struct PageContext {
    pub flashes: Vec<String>,
    pub user_email: Option<String>,
}

impl PageContext {
    pub async fn from_session(session: &Session) -> Self {
        let user_email = if current_user_id(session).await.is_some() {
            session
                .get::<String>(crate::auth::session::EMAIL_KEY)
                .await
                .ok()
                .flatten()
        } else {
            None
        };

        Self {
            flashes: flash::take(session).await,
            user_email,
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
struct IndexTemplate {
    page: PageContext,
}

#[derive(Template, WebTemplate)]
#[template(path = "about_us.html")]
struct AboutUsTemplate {
    page: PageContext,
}

#[derive(Template, WebTemplate)]
#[template(path = "contact_us.html")]
struct ContactUsTemplate {
    page: PageContext,
}

#[derive(Template, WebTemplate)]
#[template(path = "calculator.html")]
struct CalculatorTemplate {
    page: PageContext,
}

#[derive(Template, WebTemplate)]
#[template(path = "predictor.html")]
struct PredictorTemplate {
    page: PageContext,
    vehicle_classes: Vec<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    page: PageContext,
    heading: &'static str,
    charts: Vec<ChartView>,
}

/// GET /index - Landing page after login
pub async fn index_handler(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let mut page = PageContext::from_session(&session).await;

    // Prefer the stored email over the session copy when the account still exists.
    if let Some(user_id) = current_user_id(&session).await {
        if let Ok(user) = state.auth_service.get_user_by_id(user_id).await {
            page.user_email = Some(user.email);
        }
    }

    IndexTemplate { page }
}

/// GET /about_us
pub async fn about_us_handler(session: Session) -> impl IntoResponse {
    AboutUsTemplate {
        page: PageContext::from_session(&session).await,
    }
}

/// GET /contact_us
pub async fn contact_us_handler(session: Session) -> impl IntoResponse {
    ContactUsTemplate {
        page: PageContext::from_session(&session).await,
    }
}

/// GET /calculate_total_carbon_emission
pub async fn calculator_handler(session: Session) -> impl IntoResponse {
    CalculatorTemplate {
        page: PageContext::from_session(&session).await,
    }
}

/// GET /predictor - Form that posts to /predict
pub async fn predictor_handler(
    State(state): State<AppState>,
    session: Session,
) -> impl IntoResponse {
    PredictorTemplate {
        page: PageContext::from_session(&session).await,
        vehicle_classes: state.prediction_service.vehicle_classes(),
    }
}

/// GET /dashboard
pub async fn dashboard_handler(
    State(state): State<AppState>,
    session: Session,
) -> impl IntoResponse {
    DashboardTemplate {
        page: PageContext::from_session(&session).await,
        heading: "Emissions dashboard",
        charts: state.dashboard_service.charts(Dashboard::Overview).await,
    }
}

/// GET /emission
pub async fn emission_handler(
    State(state): State<AppState>,
    session: Session,
) -> impl IntoResponse {
    DashboardTemplate {
        page: PageContext::from_session(&session).await,
        heading: "Vehicle emissions",
        charts: state.dashboard_service.charts(Dashboard::Emission).await,
    }
}
