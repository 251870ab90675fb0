// File I/O for fund sheets
//
// Load: first sheet of xlsx/xls/xlsb/ods (calamine), or a delimited text file.
// Write: single-sheet xlsx report (rust_xlsxwriter), or CSV/TSV by extension.

pub mod csv;
pub mod error;
pub mod xlsx;

use std::path::Path;

use fundcheck_core::{Cell, EnrichedTable, FundRecord, FundTable};
use tracing::info;

pub use error::{LoadError, WriteError};

/// File format, chosen from the path extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Anything calamine opens on read; xlsx on write.
    Spreadsheet,
    Csv,
    Tsv,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => FileFormat::Csv,
            Some("tsv") | Some("tab") => FileFormat::Tsv,
            _ => FileFormat::Spreadsheet,
        }
    }
}

/// Load the input table. Row 1 is the header row.
pub fn load_table(path: &Path) -> Result<FundTable, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let table = match FileFormat::from_path(path) {
        FileFormat::Spreadsheet => xlsx::import(path)?,
        FileFormat::Csv => csv::import(path)?,
        FileFormat::Tsv => csv::import_with_delimiter(path, b'\t')?,
    };

    info!(rows = table.len(), columns = table.headers.len(), "read {} rows from {}", table.len(), path.display());
    Ok(table)
}

/// Write the report, creating missing parent directories.
pub fn write_table(table: &EnrichedTable, path: &Path) -> Result<(), WriteError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }
    }

    match FileFormat::from_path(path) {
        FileFormat::Spreadsheet => xlsx::export(table, path)?,
        FileFormat::Csv => csv::export(table, path, b',')?,
        FileFormat::Tsv => csv::export(table, path, b'\t')?,
    }

    info!(rows = table.len(), "results saved to {}", path.display());
    Ok(())
}

/// Split a raw cell grid into header row and records.
///
/// Blank header cells become `Unnamed: N` (0-based), repeated names get a
/// `.1`, `.2` suffix, and trailing all-blank rows are dropped.
pub(crate) fn table_from_grid(mut grid: Vec<Vec<Cell>>) -> FundTable {
    while grid.last().is_some_and(|row| row.iter().all(Cell::is_empty)) {
        grid.pop();
    }
    if grid.is_empty() {
        return FundTable::default();
    }

    let header_row = grid.remove(0);
    let width = grid.iter().map(Vec::len).max().unwrap_or(0).max(header_row.len());

    let mut headers: Vec<String> = Vec::with_capacity(width);
    for idx in 0..width {
        let base = header_row
            .get(idx)
            .and_then(Cell::as_text)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("Unnamed: {idx}"));
        let mut name = base.clone();
        let mut n = 1;
        while headers.contains(&name) {
            name = format!("{base}.{n}");
            n += 1;
        }
        headers.push(name);
    }

    let records = grid.into_iter().map(FundRecord::new).collect();
    FundTable::new(headers, records)
}
