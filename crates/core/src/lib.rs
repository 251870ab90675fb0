//! `fundcheck-core`: data model shared by every fundcheck crate.
//!
//! Pure types and string helpers. No IO, no network.

pub mod cell;
pub mod cnpj;
pub mod date;
pub mod table;

pub use cell::Cell;
pub use cnpj::normalize_cnpj;
pub use date::format_filing_date;
pub use table::{
    DerivedFields, EnrichedRecord, EnrichedTable, FundRecord, FundTable, DERIVED_COLUMNS,
};
