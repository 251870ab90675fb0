use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    Read { path: PathBuf, message: String },
    /// TOML parse / deserialization error.
    Parse(String),
    /// A value (file or environment) is present but unusable.
    InvalidValue { key: String, value: String, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "cannot read config {}: {message}", path.display()),
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid value for {key} ({value:?}): {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
