// One verification run: settings -> load -> reconcile -> write.

use std::path::PathBuf;

use fundcheck_config::settings::{ENV_INPUT, ENV_OUTPUT};
use fundcheck_config::{ConfigError, Settings, ENV_IDENTITY_URL};
use fundcheck_io::{load_table, write_table, LoadError, WriteError};
use fundcheck_lookup::{IdentityClient, LookupError, RegistryClient};
use fundcheck_recon::{ReconOptions, ReconResult};
use tracing::{debug, info, warn};

use crate::exit_codes::{EXIT_CONFIG, EXIT_LOAD, EXIT_WRITE};

/// Values given on the command line. `None` leaves the resolved setting alone.
#[derive(Debug, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub cnpj_column: Option<String>,
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    pub fn load(msg: impl Into<String>) -> Self {
        Self { code: EXIT_LOAD, message: msg.into(), hint: None }
    }

    pub fn write(msg: impl Into<String>) -> Self {
        Self { code: EXIT_WRITE, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        let hint = match &err {
            ConfigError::Parse(_) => Some(format!(
                "check the keys in {} (or the file passed to --config)",
                Settings::config_path().display()
            )),
            _ => None,
        };
        Self { hint, ..Self::config(err.to_string()) }
    }
}

impl From<LoadError> for CliError {
    fn from(err: LoadError) -> Self {
        let hint = match &err {
            LoadError::NotFound(_) => Some(format!("pass --input or set {}", ENV_INPUT)),
            LoadError::Open { .. } | LoadError::Sheet { .. } => {
                Some("expected xlsx, xls, xlsb, ods, csv or tsv".to_string())
            }
            LoadError::NoSheets(_) => None,
        };
        Self { hint, ..Self::load(err.to_string()) }
    }
}

impl From<WriteError> for CliError {
    fn from(err: WriteError) -> Self {
        let err = Self::write(err.to_string());
        err.with_hint(format!("pass --output or set {} to a writable location", ENV_OUTPUT))
    }
}

// Only client construction surfaces here; per-row lookup errors stay in recon.
impl From<LookupError> for CliError {
    fn from(err: LookupError) -> Self {
        Self::config(format!("cannot set up HTTP client: {}", err))
    }
}

/// Defaults < config file < environment < command line.
pub fn resolve_settings(overrides: &Overrides) -> Result<Settings, CliError> {
    let mut settings = Settings::load(overrides.config.as_deref())?;

    if let Some(ref input) = overrides.input {
        settings.input_path = input.clone();
    }
    if let Some(ref output) = overrides.output {
        settings.output_path = output.clone();
    }
    if let Some(ref column) = overrides.cnpj_column {
        if column.is_empty() {
            return Err(CliError::config("--cnpj-column must not be empty"));
        }
        settings.cnpj_column = column.clone();
    }

    debug!(?settings, "resolved settings");
    Ok(settings)
}

/// Load, reconcile every row, write the report.
///
/// Only load, write and setup failures are errors. Lookup failures end up in
/// the result's statuses.
pub fn execute(settings: &Settings) -> Result<ReconResult, CliError> {
    let registry = RegistryClient::from_settings(settings)?;
    let identity = IdentityClient::from_settings(settings)?;
    if !identity.is_configured() {
        warn!(
            "{} is not set; identity lookups will fail and no row can be validated",
            ENV_IDENTITY_URL
        );
    }

    let table = load_table(&settings.input_path)?;

    let options = ReconOptions { cnpj_column: settings.cnpj_column.clone() };
    let result = fundcheck_recon::run(table, &options, &registry, &identity);

    write_table(&result.table, &settings.output_path)?;
    log_summary(&result);
    Ok(result)
}

fn log_summary(result: &ReconResult) {
    let s = &result.summary;
    info!(
        total = s.total_rows,
        validated = s.validated,
        mismatched = s.mismatched,
        identity_missing = s.identity_missing,
        identity_errors = s.identity_errors,
        registry_misses = s.registry_misses,
        registry_errors = s.registry_errors,
        no_cnpj = s.no_cnpj,
        "{} of {} rows validated ({} found in registry)",
        s.validated,
        s.total_rows,
        s.registry_hits()
    );
    if s.registry_errors + s.identity_errors > 0 {
        warn!(
            "{} lookups failed; affected rows kept default values",
            s.registry_errors + s.identity_errors
        );
    }
}

/// Machine-readable run summary for `--json`.
pub fn summary_json(result: &ReconResult) -> serde_json::Value {
    serde_json::json!({
        "meta": result.meta,
        "summary": result.summary,
        "registry_hits": result.summary.registry_hits(),
        "statuses": result.statuses,
    })
}
