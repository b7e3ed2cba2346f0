pub mod emission;
pub mod user;

pub use emission::{EmissionRecord, NewEmissionRecord};
pub use user::User;
