use fundcheck_core::{
    format_filing_date, normalize_cnpj, DerivedFields, EnrichedRecord, EnrichedTable, FundTable,
};
use fundcheck_lookup::{FundRegistry, IdentityDirectory};
use tracing::{debug, info, warn};

use crate::evidence::compute_summary;
use crate::model::{ReconMeta, ReconOptions, ReconResult, RowStatus};

/// Reconcile every record, in order. Returns one enriched row per input row.
///
/// Lookup failures never abort the run: they are logged and the row keeps
/// default derived values.
pub fn run<R, I>(table: FundTable, options: &ReconOptions, registry: &R, identity: &I) -> ReconResult
where
    R: FundRegistry + ?Sized,
    I: IdentityDirectory + ?Sized,
{
    let FundTable { headers, records } = table;
    let cnpj_idx = headers.iter().position(|h| *h == options.cnpj_column);
    if cnpj_idx.is_none() {
        warn!(
            "column '{}' not found in input; every row keeps default values",
            options.cnpj_column
        );
    }

    let total = records.len();
    let (rows, statuses): (Vec<EnrichedRecord>, Vec<RowStatus>) = records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| {
            let cnpj = cnpj_idx.and_then(|i| record.get(i).as_text());
            info!(
                "processing row {}/{}: CNPJ={}",
                idx + 1,
                total,
                cnpj.as_deref().unwrap_or("")
            );

            let (derived, status) = reconcile_row(cnpj.as_deref(), registry, identity);
            if status == RowStatus::RegistryError {
                warn!("row {} kept default values after a registry failure", idx + 1);
            }
            (EnrichedRecord { record, derived }, status)
        })
        .unzip();

    let summary = compute_summary(&statuses);

    ReconResult {
        meta: ReconMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            cnpj_column: options.cnpj_column.clone(),
            cnpj_column_found: cnpj_idx.is_some(),
        },
        summary,
        statuses,
        table: EnrichedTable { headers, rows },
    }
}

/// Reconcile a single CNPJ.
///
/// The registry receives the CNPJ exactly as written; only the final
/// comparison uses the normalized form.
pub fn reconcile_row<R, I>(cnpj: Option<&str>, registry: &R, identity: &I) -> (DerivedFields, RowStatus)
where
    R: FundRegistry + ?Sized,
    I: IdentityDirectory + ?Sized,
{
    let raw = match cnpj {
        Some(c) if !c.trim().is_empty() => c,
        _ => return (DerivedFields::default(), RowStatus::NoCnpj),
    };

    let filing = match registry.lookup_by_tax_id(raw) {
        Ok(Some(filing)) => filing,
        Ok(None) => return (DerivedFields::default(), RowStatus::RegistryMiss),
        Err(e) => {
            warn!("registry lookup failed for CNPJ {}: {}", raw, e);
            return (DerivedFields::default(), RowStatus::RegistryError);
        }
    };

    let (fund_id, identity_failed) = match identity.lookup_by_name(&filing.fund_name) {
        Ok(id) => (id.filter(|s| !s.is_empty()), false),
        Err(e) => {
            warn!("identity lookup failed for fund '{}': {}", filing.fund_name, e);
            (None, true)
        }
    };
    debug!("identity id for '{}': {:?}", filing.fund_name, fund_id);

    let normalized = normalize_cnpj(Some(raw));
    debug!("normalized CNPJ: {}", normalized);

    let validated = fund_id.as_deref() == Some(normalized.as_str());
    let status = match (&fund_id, validated, identity_failed) {
        (_, true, _) => RowStatus::Validated,
        (_, _, true) => RowStatus::IdentityError,
        (None, _, _) => RowStatus::IdentityMissing,
        (Some(_), _, _) => RowStatus::Mismatch,
    };

    let derived = DerivedFields {
        validated,
        last_filing_date: format_filing_date(filing.delivery_date.as_deref()),
        external_id: filing.document_id.unwrap_or_default(),
        secondary_id: fund_id.unwrap_or_default(),
    };

    (derived, status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fundcheck_lookup::{FilingInfo, LookupError};

    struct FixedRegistry(Result<Option<FilingInfo>, LookupError>);

    impl FundRegistry for FixedRegistry {
        fn lookup_by_tax_id(&self, _cnpj: &str) -> Result<Option<FilingInfo>, LookupError> {
            self.0.clone()
        }
    }

    struct FixedIdentity(Result<Option<String>, LookupError>);

    impl IdentityDirectory for FixedIdentity {
        fn lookup_by_name(&self, _fund_name: &str) -> Result<Option<String>, LookupError> {
            self.0.clone()
        }
    }

    fn filing() -> Result<Option<FilingInfo>, LookupError> {
        Ok(Some(FilingInfo {
            fund_name: "Fund X".into(),
            delivery_date: Some("2024-01-15T00:00:00".into()),
            document_id: Some("D1".into()),
        }))
    }

    #[test]
    fn validated_when_identity_echoes_normalized_cnpj() {
        let (derived, status) = reconcile_row(
            Some("12.345.678/0001-99"),
            &FixedRegistry(filing()),
            &FixedIdentity(Ok(Some("12345678000199".into()))),
        );
        assert_eq!(status, RowStatus::Validated);
        assert!(derived.validated);
        assert_eq!(derived.last_filing_date, "2024-01-15");
        assert_eq!(derived.external_id, "D1");
        assert_eq!(derived.secondary_id, "12345678000199");
    }

    #[test]
    fn mismatch_keeps_identity_id() {
        let (derived, status) = reconcile_row(
            Some("12.345.678/0001-99"),
            &FixedRegistry(filing()),
            &FixedIdentity(Ok(Some("99999999000100".into()))),
        );
        assert_eq!(status, RowStatus::Mismatch);
        assert!(!derived.validated);
        assert_eq!(derived.secondary_id, "99999999000100");
        assert_eq!(derived.external_id, "D1");
    }

    #[test]
    fn formatted_identity_id_does_not_validate() {
        // Comparison is against the normalized CNPJ only
        let (derived, _) = reconcile_row(
            Some("12.345.678/0001-99"),
            &FixedRegistry(filing()),
            &FixedIdentity(Ok(Some("12.345.678/0001-99".into()))),
        );
        assert!(!derived.validated);
    }

    #[test]
    fn identity_failure_still_records_filing() {
        let (derived, status) = reconcile_row(
            Some("12.345.678/0001-99"),
            &FixedRegistry(filing()),
            &FixedIdentity(Err(LookupError::Timeout("10s".into()))),
        );
        assert_eq!(status, RowStatus::IdentityError);
        assert!(!derived.validated);
        assert_eq!(derived.last_filing_date, "2024-01-15");
        assert_eq!(derived.external_id, "D1");
        assert_eq!(derived.secondary_id, "");
    }

    #[test]
    fn empty_identity_id_is_missing() {
        let (derived, status) = reconcile_row(
            Some("12.345.678/0001-99"),
            &FixedRegistry(filing()),
            &FixedIdentity(Ok(Some(String::new()))),
        );
        assert_eq!(status, RowStatus::IdentityMissing);
        assert!(!derived.validated);
    }

    #[test]
    fn registry_miss_and_error_keep_defaults() {
        let identity = FixedIdentity(Ok(Some("12345678000199".into())));

        let (derived, status) = reconcile_row(Some("12.345.678/0001-99"), &FixedRegistry(Ok(None)), &identity);
        assert_eq!(status, RowStatus::RegistryMiss);
        assert_eq!(derived, DerivedFields::default());

        let (derived, status) = reconcile_row(
            Some("12.345.678/0001-99"),
            &FixedRegistry(Err(LookupError::Http(500, "boom".into()))),
            &identity,
        );
        assert_eq!(status, RowStatus::RegistryError);
        assert_eq!(derived, DerivedFields::default());
    }

    #[test]
    fn blank_cnpj() {
        let (derived, status) = reconcile_row(None, &FixedRegistry(filing()), &FixedIdentity(Ok(None)));
        assert_eq!(status, RowStatus::NoCnpj);
        assert_eq!(derived, DerivedFields::default());

        let (_, status) = reconcile_row(Some("  "), &FixedRegistry(filing()), &FixedIdentity(Ok(None)));
        assert_eq!(status, RowStatus::NoCnpj);
    }
}
