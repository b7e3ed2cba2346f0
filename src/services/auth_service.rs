use crate::models::user::User;
use crate::repositories::{RepositoryError, UserRepository};
use crate::services::password::verify_password;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("Email not found. Please register first.")]
    EmailNotFound,
    #[error("Incorrect password. Please try again.")]
    IncorrectPassword,
    #[error("User not found")]
    UserNotFound,
    #[error("{0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
}

impl AuthService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    pub async fn authenticate(&self, request: LoginRequest) -> Result<User, AuthServiceError> {
        let user = self
            .user_repository
            .find_by_email(&request.email)
            .await?
            .ok_or(AuthServiceError::EmailNotFound)?;

        if !verify_password(&request.password, &user.password_hash) {
            return Err(AuthServiceError::IncorrectPassword);
        }

        Ok(user)
    }

    pub async fn get_user_by_id(&self, user_id: i64) -> Result<User, AuthServiceError> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::UserNotFound)
    }
}
