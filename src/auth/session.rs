use crate::models::User;
use tower_sessions::Session;

pub const USER_ID_KEY: &str = "user_id";
pub const EMAIL_KEY: &str = "email";

/// The logged-in user's id, if any.
pub async fn current_user_id(session: &Session) -> Option<i64> {
    session.get::<i64>(USER_ID_KEY).await.ok().flatten()
}

pub async fn log_in(session: &Session, user: &User) -> Result<(), tower_sessions::session::Error> {
    // New id on privilege change.
    session.cycle_id().await?;
    session.insert(USER_ID_KEY, user.id).await?;
    session.insert(EMAIL_KEY, &user.email).await?;
    session
        .insert("auth_timestamp", chrono::Utc::now().timestamp())
        .await?;
    Ok(())
}

pub async fn log_out(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    #[tokio::test]
    async fn test_log_in_and_out() {
        let store = Arc::new(MemoryStore::default());
        let session = Session::new(None, store, None);
        assert_eq!(current_user_id(&session).await, None);

        let user = User {
            id: 11,
            email: "driver@example.com".to_string(),
            password_hash: "hash".to_string(),
            created_at: None,
        };
        log_in(&session, &user).await.unwrap();
        assert_eq!(current_user_id(&session).await, Some(11));

        log_out(&session).await.unwrap();
        assert_eq!(current_user_id(&session).await, None);
    }
}
