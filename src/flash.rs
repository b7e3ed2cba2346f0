//! One-shot messages carried in the session until the next rendered page.

use tower_sessions::Session;
use tracing::warn;

pub const FLASH_KEY: &str = "_flashes";

pub async fn push(session: &Session, message: impl Into<String>) {
    let mut messages: Vec<String> = session
        .get(FLASH_KEY)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    messages.push(message.into());

    if let Err(e) = session.insert(FLASH_KEY, messages).await {
        warn!("Failed to store flash message: {}", e);
    }
}

/// Returns pending messages and clears them.
pub async fn take(session: &Session) -> Vec<String> {
    match session.remove::<Vec<String>>(FLASH_KEY).await {
        Ok(messages) => messages.unwrap_or_default(),
        Err(e) => {
            warn!("Failed to read flash messages: {}", e);
            Vec::new()
        }
    }
}
