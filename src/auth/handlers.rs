use crate::auth::session::{log_in, log_out};
use crate::flash;
use crate::handlers::PageContext;
use crate::services::{
    auth_service::{AuthServiceError, LoginRequest},
    user_service::{CreateUserRequest, UserServiceError},
};
use crate::AppState;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Form, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, warn};

#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    page: PageContext,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
struct RegisterTemplate {
    page: PageContext,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/forgot_password.html")]
struct ForgotPasswordTemplate {
    page: PageContext,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    email: String,
    password: String,
    confirm_password: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    email: String,
    password: String,
}

/// GET / and GET /login
pub async fn login_page(session: Session) -> impl IntoResponse {
    LoginTemplate {
        page: PageContext::from_session(&session).await,
    }
}

/// POST /login - Redirects to /index on success, back to /login otherwise
pub async fn login_handler(
    State(app_state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Redirect {
    let request = LoginRequest {
        email: form.email,
        password: form.password,
    };

    match app_state.auth_service.authenticate(request).await {
        Ok(user) => {
            if let Err(e) = log_in(&session, &user).await {
                warn!("Failed to create session for {}: {}", user.email, e);
                flash::push(&session, format!("An error occurred: {}", e)).await;
                return Redirect::to("/login");
            }
            info!("User {} logged in", user.id);
            flash::push(&session, "Login successful!").await;
            Redirect::to("/index")
        }
        Err(err @ (AuthServiceError::EmailNotFound | AuthServiceError::IncorrectPassword)) => {
            flash::push(&session, err.to_string()).await;
            Redirect::to("/login")
        }
        Err(err) => {
            warn!("Login failed: {}", err);
            flash::push(&session, format!("An error occurred: {}", err)).await;
            Redirect::to("/login")
        }
    }
}

/// GET /register
pub async fn register_page(session: Session) -> impl IntoResponse {
    RegisterTemplate {
        page: PageContext::from_session(&session).await,
    }
}

/// POST /register - Redirects to /login on success, back to /register otherwise
pub async fn register_handler(
    State(app_state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Redirect {
    let request = CreateUserRequest {
        email: form.email,
        password: form.password,
        password_confirm: Some(form.confirm_password),
    };

    match app_state.user_service.create_user(request).await {
        Ok(user) => {
            info!("Registered user {}", user.id);
            flash::push(&session, "Registration successful! Please login.").await;
            Redirect::to("/login")
        }
        Err(err @ (UserServiceError::PasswordMismatch | UserServiceError::EmailTaken)) => {
            flash::push(&session, err.to_string()).await;
            Redirect::to("/register")
        }
        Err(err) => {
            warn!("Registration failed: {}", err);
            flash::push(&session, format!("An error occurred: {}", err)).await;
            Redirect::to("/register")
        }
    }
}

/// GET /forgot-password
pub async fn forgot_password_page(session: Session) -> impl IntoResponse {
    ForgotPasswordTemplate {
        page: PageContext::from_session(&session).await,
    }
}

/// POST /forgot-password - No reset flow; sends the user back to login.
pub async fn forgot_password_handler() -> Redirect {
    Redirect::to("/login")
}

/// GET /logout
pub async fn logout_handler(session: Session) -> Redirect {
    if let Err(e) = log_out(&session).await {
        warn!("Failed to clear session: {}", e);
    }
    Redirect::to("/login")
}
