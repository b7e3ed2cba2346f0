pub mod app;
pub mod session;

pub use app::{AppConfig, ConfigError};
pub use session::{SessionConfig, SessionLayer};
