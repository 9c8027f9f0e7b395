pub mod auth;
pub mod config;
pub mod error;
pub mod module;
pub mod types;

pub use auth::{Authenticator, SharedPassword, WARDEN_PASSWORD_HEADER};
pub use config::ServiceConfig;
pub use error::ServiceError;
pub use module::Module;
pub use types::{now_rfc3339, parse_date};
