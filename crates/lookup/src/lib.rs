//! Lookup clients for fund reconciliation.
//!
//! Two read-only services: the document registry (queried by CNPJ) and the
//! identity service (queried by fund name). Both are blocking, single-shot
//! and bounded by a timeout. No retries, no caching.
//!
//! Callers depend on the [`FundRegistry`] and [`IdentityDirectory`] traits so
//! tests can swap in fixed answers.

mod error;
mod http;
mod identity;
mod registry;

pub use error::LookupError;
pub use identity::{IdentityClient, IDENTITY_KEY_HEADER};
pub use registry::{search_params, FilingInfo, RegistryClient};

/// Document registry lookup by CNPJ.
pub trait FundRegistry {
    /// Most recent filing for `cnpj`. `Ok(None)` when the registry has nothing
    /// (or `cnpj` is blank, in which case no request is made).
    fn lookup_by_tax_id(&self, cnpj: &str) -> Result<Option<FilingInfo>, LookupError>;
}

/// Identity service lookup by fund name.
pub trait IdentityDirectory {
    /// Identifier registered for `fund_name`. `Ok(None)` when none is known
    /// (or the name is blank, in which case no request is made).
    fn lookup_by_name(&self, fund_name: &str) -> Result<Option<String>, LookupError>;
}

impl<T: FundRegistry + ?Sized> FundRegistry for &T {
    fn lookup_by_tax_id(&self, cnpj: &str) -> Result<Option<FilingInfo>, LookupError> {
        (**self).lookup_by_tax_id(cnpj)
    }
}

impl<T: IdentityDirectory + ?Sized> IdentityDirectory for &T {
    fn lookup_by_name(&self, fund_name: &str) -> Result<Option<String>, LookupError> {
        (**self).lookup_by_name(fund_name)
    }
}
