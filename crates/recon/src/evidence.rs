use crate::model::{ReconSummary, RowStatus};

/// Compute summary statistics from per-row statuses.
pub fn compute_summary(statuses: &[RowStatus]) -> ReconSummary {
    let mut summary = ReconSummary {
        total_rows: statuses.len(),
        ..ReconSummary::default()
    };

    for status in statuses {
        match status {
            RowStatus::Validated => summary.validated += 1,
            RowStatus::Mismatch => summary.mismatched += 1,
            RowStatus::IdentityMissing => summary.identity_missing += 1,
            RowStatus::IdentityError => summary.identity_errors += 1,
            RowStatus::RegistryMiss => summary.registry_misses += 1,
            RowStatus::RegistryError => summary.registry_errors += 1,
            RowStatus::NoCnpj => summary.no_cnpj += 1,
        }
    }

    summary
}
