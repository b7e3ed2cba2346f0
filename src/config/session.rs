use std::env;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha512};
use time::Duration;
use tower_sessions::{
    cookie::{Key, SameSite},
    service::SignedCookie,
    Expiry, SessionManagerLayer,
};
use tower_sessions_sqlx_store::SqliteStore;
use tracing::warn;

/// Convenience alias for the signed session layer produced by `SessionConfig`.
pub type SessionLayer = SessionManagerLayer<SqliteStore, SignedCookie>;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secure: bool,
    pub same_site: SameSite,
    pub expiry: Duration,
    pub name: String,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        if current_environment() == "production" {
            SessionConfig {
                secure: true,
                same_site: SameSite::Strict,
                expiry: Duration::hours(12),
                name: "__Host-co2-session".to_string(),
            }
        } else {
            SessionConfig {
                secure: false,
                same_site: SameSite::Lax,
                expiry: Duration::days(7),
                name: "co2-session".to_string(),
            }
        }
    }

    pub fn create_layer(&self, store: SqliteStore) -> SessionLayer {
        SessionManagerLayer::new(store)
            .with_secure(self.secure)
            .with_http_only(true)
            .with_same_site(self.same_site)
            .with_name(self.name.clone())
            .with_expiry(Expiry::OnInactivity(self.expiry))
            .with_signed(load_session_key())
    }
}

fn current_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string())
}

fn load_session_key() -> Key {
    match env::var("SESSION_SECRET") {
        Ok(secret) if !secret.is_empty() => {
            let bytes = STANDARD
                .decode(secret.as_bytes())
                .unwrap_or_else(|_| secret.as_bytes().to_vec());
            key_from_secret_bytes(&bytes)
        }
        _ => {
            warn!("SESSION_SECRET not set; generating ephemeral key, sessions end on restart");
            Key::generate()
        }
    }
}

fn key_from_secret_bytes(bytes: &[u8]) -> Key {
    if bytes.len() >= 64 {
        Key::from(&bytes[..64])
    } else {
        let digest = Sha512::digest(bytes);
        Key::from(digest.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_secret_is_stretched() {
        // Key::from panics below 64 bytes, so this only passes if hashed first.
        let key = key_from_secret_bytes(b"short");
        assert_eq!(key.master().len(), 64);
    }

    #[test]
    fn test_long_secret_used_directly() {
        let bytes = [7u8; 80];
        let key = key_from_secret_bytes(&bytes);
        assert_eq!(key.master(), &bytes[..64]);
    }
}
