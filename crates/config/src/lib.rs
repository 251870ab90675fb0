// Configuration loading

pub mod error;
pub mod settings;

pub use error::ConfigError;
pub use settings::{Settings, ENV_API_KEY, ENV_IDENTITY_URL};
