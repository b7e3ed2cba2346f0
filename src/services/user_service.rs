use crate::models::{EmissionRecord, User};
use crate::repositories::{EmissionRepository, RepositoryError, UserRepository};
use crate::services::password::hash_password;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("Passwords do not match!")]
    PasswordMismatch,
    #[error("User not found")]
    UserNotFound,
    #[error("Email already registered!")]
    EmailTaken,
    #[error("Password hashing failed: {0}")]
    HashingError(String),
    #[error("{0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub password_confirm: Option<String>,
}

pub struct UpdatePasswordRequest {
    pub user_id: i64,
    pub new_password: String,
    pub new_password_confirm: Option<String>,
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
    emission_repository: Arc<dyn EmissionRepository>,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        emission_repository: Arc<dyn EmissionRepository>,
    ) -> Self {
        Self {
            repository,
            emission_repository,
        }
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, UserServiceError> {
        if let Some(ref confirm) = request.password_confirm {
            if request.password != *confirm {
                return Err(UserServiceError::PasswordMismatch);
            }
        }

        // Checked up front so the common case gets a clean message; the
        // UNIQUE constraint still catches a concurrent insert.
        if self.repository.find_by_email(&request.email).await?.is_some() {
            return Err(UserServiceError::EmailTaken);
        }

        let password_hash = hash_password(&request.password)
            .map_err(|e| UserServiceError::HashingError(e.to_string()))?;

        match self
            .repository
            .create_user(&request.email, &password_hash)
            .await
        {
            Ok(user) => Ok(user),
            Err(RepositoryError::AlreadyExists) => Err(UserServiceError::EmailTaken),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_email(email).await?)
    }

    pub async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_id(id).await?)
    }

    pub async fn list_users(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<User>, UserServiceError> {
        Ok(self.repository.list_users(limit, offset).await?)
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), UserServiceError> {
        match self.repository.delete_user(id).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(UserServiceError::UserNotFound),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn update_password(
        &self,
        request: UpdatePasswordRequest,
    ) -> Result<(), UserServiceError> {
        if let Some(ref confirm) = request.new_password_confirm {
            if request.new_password != *confirm {
                return Err(UserServiceError::PasswordMismatch);
            }
        }

        let password_hash = hash_password(&request.new_password)
            .map_err(|e| UserServiceError::HashingError(e.to_string()))?;

        match self
            .repository
            .update_password(request.user_id, &password_hash)
            .await
        {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(UserServiceError::UserNotFound),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn emission_history(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<EmissionRecord>, UserServiceError> {
        Ok(self.emission_repository.list_by_user(user_id, limit).await?)
    }
}
