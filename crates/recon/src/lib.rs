//! `fundcheck-recon`: per-row fund reconciliation.
//!
//! Receives a loaded table and two lookup capabilities, returns a new
//! enriched table plus a summary. No file IO; network access only through
//! the traits it is handed.

pub mod engine;
pub mod evidence;
pub mod model;

pub use engine::{reconcile_row, run};
pub use model::{ReconMeta, ReconOptions, ReconResult, ReconSummary, RowStatus};
