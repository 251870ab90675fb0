use serde::Serialize;

use crate::cell::Cell;

/// Columns appended to the report, in output order.
pub const DERIVED_COLUMNS: [&str; 4] = ["validado", "dataUltimoArquivamento", "externalId", "idRedis"];

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One input row. Cells are positional, aligned with [`FundTable::headers`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FundRecord {
    pub cells: Vec<Cell>,
}

impl FundRecord {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// Cell at `idx`, or `Cell::Empty` for short rows.
    pub fn get(&self, idx: usize) -> &Cell {
        static EMPTY: Cell = Cell::Empty;
        self.cells.get(idx).unwrap_or(&EMPTY)
    }
}

/// The loaded input sheet: header row plus records in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FundTable {
    pub headers: Vec<String>,
    pub records: Vec<FundRecord>,
}

impl FundTable {
    pub fn new(headers: Vec<String>, records: Vec<FundRecord>) -> Self {
        Self { headers, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of a column by exact header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// The four fields reconciliation adds to every row.
///
/// Serialized names match the report's column headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DerivedFields {
    #[serde(rename = "validado")]
    pub validated: bool,
    #[serde(rename = "dataUltimoArquivamento")]
    pub last_filing_date: String,
    #[serde(rename = "externalId")]
    pub external_id: String,
    #[serde(rename = "idRedis")]
    pub secondary_id: String,
}

impl DerivedFields {
    /// Cells in [`DERIVED_COLUMNS`] order.
    pub fn cells(&self) -> [Cell; 4] {
        [
            Cell::Bool(self.validated),
            Cell::Text(self.last_filing_date.clone()),
            Cell::Text(self.external_id.clone()),
            Cell::Text(self.secondary_id.clone()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub record: FundRecord,
    pub derived: DerivedFields,
}

impl EnrichedRecord {
    /// A record with every derived field at its default.
    pub fn unmatched(record: FundRecord) -> Self {
        Self { record, derived: DerivedFields::default() }
    }
}

/// Reconciled rows, one per input record, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichedTable {
    pub headers: Vec<String>,
    pub rows: Vec<EnrichedRecord>,
}

impl EnrichedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header row of the report.
    ///
    /// Input columns come first. A derived column whose name already exists
    /// in the input replaces that column in place; the rest are appended.
    pub fn output_headers(&self) -> Vec<String> {
        let mut headers = self.headers.clone();
        for name in DERIVED_COLUMNS {
            if !headers.iter().any(|h| h == name) {
                headers.push(name.to_string());
            }
        }
        headers
    }

    /// Report cells for every row, aligned with [`Self::output_headers`].
    pub fn output_rows(&self) -> Vec<Vec<Cell>> {
        let headers = self.output_headers();
        let derived_positions: Vec<usize> = DERIVED_COLUMNS
            .iter()
            .filter_map(|name| headers.iter().position(|h| h == name))
            .collect();

        self.rows
            .iter()
            .map(|row| {
                let mut cells: Vec<Cell> = (0..headers.len())
                    .map(|i| if i < self.headers.len() { row.record.get(i).clone() } else { Cell::Empty })
                    .collect();
                for (pos, cell) in derived_positions.iter().zip(row.derived.cells()) {
                    cells[*pos] = cell;
                }
                cells
            })
            .collect()
    }
}
