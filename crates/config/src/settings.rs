// Run settings
// Defaults < TOML file (~/.config/fundcheck/config.toml or --config) < environment

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

/// Base URL of the identity service (the `/hash` path is appended by the client).
pub const ENV_IDENTITY_URL: &str = "MZ_IQ_FUNDS_DATA_URL";
/// Credential sent in the identity service's `mz-internal-app` header.
pub const ENV_API_KEY: &str = "MZ_IQ_API_KEY";
pub const ENV_REGISTRY_URL: &str = "FUNDCHECK_REGISTRY_URL";
pub const ENV_INPUT: &str = "FUNDCHECK_INPUT";
pub const ENV_OUTPUT: &str = "FUNDCHECK_OUTPUT";
pub const ENV_TIMEOUT_SECS: &str = "FUNDCHECK_TIMEOUT_SECS";

pub const DEFAULT_INPUT_PATH: &str = "application/documents/entrada.xlsx";
pub const DEFAULT_OUTPUT_PATH: &str = "application/documents/planilha-validada.xlsx";
pub const DEFAULT_REGISTRY_URL: &str =
    "http://fnet.bmfbovespa.com.br/fnet/publico/pesquisarGerenciadorDocumentosDados";
pub const DEFAULT_CNPJ_COLUMN: &str = "CNPJ";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Spreadsheet to reconcile
    pub input_path: PathBuf,
    /// Report destination; parent directories are created on write
    pub output_path: PathBuf,
    /// Header of the column holding the CNPJ
    pub cnpj_column: String,
    /// Document registry search endpoint
    pub registry_url: String,
    /// Identity service base URL. No default: the service location is deployment-specific.
    pub identity_base_url: Option<String>,
    pub identity_api_key: Option<String>,
    /// Per-request timeout for both services
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            cnpj_column: DEFAULT_CNPJ_COLUMN.to_string(),
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            identity_base_url: None,
            identity_api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// Keeps the API key out of logs.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("input_path", &self.input_path)
            .field("output_path", &self.output_path)
            .field("cnpj_column", &self.cnpj_column)
            .field("registry_url", &self.registry_url)
            .field("identity_base_url", &self.identity_base_url)
            .field("identity_api_key", &self.identity_api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Settings {
    /// Default config file location.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fundcheck")
            .join("config.toml")
    }

    /// Parse settings from TOML. Missing keys take their defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&contents)
    }

    /// Resolve settings for a run.
    ///
    /// An explicit path must exist. Without one, the default config file is
    /// used only if present. The process environment is applied last.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Self::config_path();
                if path.exists() {
                    debug!("loading config from {}", path.display());
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };

        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Overlay environment values. Unset or blank variables leave the field alone.
    ///
    /// `lookup` abstracts the environment so callers can pass a fixed map.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_IDENTITY_URL) {
            self.identity_base_url = Some(url);
        }
        if let Some(key) = get(ENV_API_KEY) {
            self.identity_api_key = Some(key);
        }
        if let Some(url) = get(ENV_REGISTRY_URL) {
            self.registry_url = url;
        }
        if let Some(path) = get(ENV_INPUT) {
            self.input_path = PathBuf::from(path);
        }
        if let Some(path) = get(ENV_OUTPUT) {
            self.output_path = PathBuf::from(path);
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            self.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_TIMEOUT_SECS.into(),
                value: raw.clone(),
                reason: "expected a whole number of seconds".into(),
            })?;
        }

        self.validate()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timeout_secs".into(),
                value: "0".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        if self.registry_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "registry_url".into(),
                value: self.registry_url.clone(),
                reason: "must not be empty".into(),
            });
        }
        if self.cnpj_column.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "cnpj_column".into(),
                value: String::new(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.input_path, PathBuf::from("application/documents/entrada.xlsx"));
        assert_eq!(s.output_path, PathBuf::from("application/documents/planilha-validada.xlsx"));
        assert_eq!(s.cnpj_column, "CNPJ");
        assert_eq!(s.timeout(), Duration::from_secs(10));
        assert!(s.identity_base_url.is_none());
        assert!(s.identity_api_key.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let s = Settings::from_toml(
            r#"
output_path = "out/report.xlsx"
identity_base_url = "https://ids.example.com"
timeout_secs = 3
"#,
        )
        .unwrap();
        assert_eq!(s.output_path, PathBuf::from("out/report.xlsx"));
        assert_eq!(s.identity_base_url.as_deref(), Some("https://ids.example.com"));
        assert_eq!(s.timeout_secs, 3);
        assert_eq!(s.registry_url, DEFAULT_REGISTRY_URL);
    }

    #[test]
    fn unknown_key_rejected() {
        let err = Settings::from_toml("inptu_path = \"x.xlsx\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = Settings::from_toml("timeout_secs = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn env_overrides_file() {
        let mut s = Settings::from_toml("identity_base_url = \"https://file.example.com\"").unwrap();
        s.apply_env(env(&[
            (ENV_IDENTITY_URL, "https://env.example.com"),
            (ENV_API_KEY, "secret"),
            (ENV_TIMEOUT_SECS, " 5 "),
            (ENV_INPUT, "in.csv"),
        ]))
        .unwrap();

        assert_eq!(s.identity_base_url.as_deref(), Some("https://env.example.com"));
        assert_eq!(s.identity_api_key.as_deref(), Some("secret"));
        assert_eq!(s.timeout_secs, 5);
        assert_eq!(s.input_path, PathBuf::from("in.csv"));
        assert_eq!(s.output_path, PathBuf::from(DEFAULT_OUTPUT_PATH));
    }

    #[test]
    fn blank_env_values_ignored() {
        let mut s = Settings::default();
        s.apply_env(env(&[(ENV_IDENTITY_URL, "   "), (ENV_API_KEY, "")])).unwrap();
        assert!(s.identity_base_url.is_none());
        assert!(s.identity_api_key.is_none());
    }

    #[test]
    fn bad_env_timeout() {
        let mut s = Settings::default();
        let err = s.apply_env(env(&[(ENV_TIMEOUT_SECS, "ten")])).unwrap_err();
        assert!(err.to_string().contains(ENV_TIMEOUT_SECS));
    }

    #[test]
    fn debug_redacts_api_key() {
        let s = Settings {
            identity_api_key: Some("super-secret".into()),
            ..Settings::default()
        };
        let dbg = format!("{:?}", s);
        assert!(!dbg.contains("super-secret"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "cnpj_column = \"cnpj_fundo\"\n").unwrap();
        let s = Settings::from_file(&path).unwrap();
        assert_eq!(s.cnpj_column, "cnpj_fundo");
    }
}
