use serde::Serialize;

use fundcheck_core::EnrichedTable;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ReconOptions {
    /// Header of the column holding the CNPJ.
    pub cnpj_column: String,
}

impl Default for ReconOptions {
    fn default() -> Self {
        Self { cnpj_column: "CNPJ".into() }
    }
}

// ---------------------------------------------------------------------------
// Per-row classification
// ---------------------------------------------------------------------------

/// How a single row came out of reconciliation.
///
/// Only `Validated` sets `validado`; every other status is a reason it stayed false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    /// Identity id equals the normalized CNPJ.
    Validated,
    /// Identity id present but different from the normalized CNPJ.
    Mismatch,
    /// Registry matched; identity service had no id for the fund name.
    IdentityMissing,
    /// Registry matched; identity lookup failed.
    IdentityError,
    /// Registry returned no filing.
    RegistryMiss,
    /// Registry lookup failed.
    RegistryError,
    /// Row has no CNPJ to look up.
    NoCnpj,
}

impl std::fmt::Display for RowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validated => write!(f, "validated"),
            Self::Mismatch => write!(f, "mismatch"),
            Self::IdentityMissing => write!(f, "identity_missing"),
            Self::IdentityError => write!(f, "identity_error"),
            Self::RegistryMiss => write!(f, "registry_miss"),
            Self::RegistryError => write!(f, "registry_error"),
            Self::NoCnpj => write!(f, "no_cnpj"),
        }
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub total_rows: usize,
    pub validated: usize,
    pub mismatched: usize,
    pub identity_missing: usize,
    pub identity_errors: usize,
    pub registry_misses: usize,
    pub registry_errors: usize,
    pub no_cnpj: usize,
}

impl ReconSummary {
    /// Rows where the registry returned a filing.
    pub fn registry_hits(&self) -> usize {
        self.validated + self.mismatched + self.identity_missing + self.identity_errors
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub engine_version: String,
    pub run_at: String,
    pub cnpj_column: String,
    /// False when the CNPJ column is absent from the input header.
    pub cnpj_column_found: bool,
}

#[derive(Debug, Clone)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub statuses: Vec<RowStatus>,
    pub table: EnrichedTable,
}
