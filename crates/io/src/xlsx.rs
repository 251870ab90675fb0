// Excel import (xlsx, xls, xlsb, ods) and report export (xlsx only)
//
// Import reads only the first worksheet. Export writes a single sheet named
// "Sheet1" with a bold header row.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use fundcheck_core::{Cell, EnrichedTable, FundTable};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::error::{LoadError, WriteError};

const SHEET_NAME: &str = "Sheet1";
const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Read the first worksheet into a table.
pub fn import(path: &Path) -> Result<FundTable, LoadError> {
    let mut workbook: Sheets<_> = open_workbook_auto(path).map_err(|e| LoadError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| LoadError::Sheet {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?,
        None => return Err(LoadError::NoSheets(path.to_path_buf())),
    };

    let grid: Vec<Vec<Cell>> = range
        .rows()
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();

    Ok(crate::table_from_grid(grid))
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Bool(*b),
        // 1900 date system assumed; calamine does not expose the 1904 flag
        Data::DateTime(dt) => Cell::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(format!("#{:?}", e)),
    }
}

/// Write the report as a single-sheet xlsx workbook.
pub fn export(table: &EnrichedTable, path: &Path) -> Result<(), WriteError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let datetime_format = Format::new().set_num_format(DATETIME_FORMAT);

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SHEET_NAME)
        .map_err(|e| WriteError::Sheet(e.to_string()))?;

    for (idx, name) in table.output_headers().iter().enumerate() {
        let col = column(idx)?;
        worksheet
            .write_string_with_format(0, col, name, &header_format)
            .map_err(|e| WriteError::Sheet(format!("header '{name}': {e}")))?;
    }

    for (row_idx, cells) in table.output_rows().iter().enumerate() {
        let row = u32::try_from(row_idx + 1)
            .map_err(|_| WriteError::Sheet(format!("row {} out of range", row_idx + 1)))?;
        for (col_idx, cell) in cells.iter().enumerate() {
            write_cell(worksheet, row, column(col_idx)?, cell, &datetime_format)?;
        }
    }

    workbook.save(path).map_err(|e| WriteError::Save {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn column(idx: usize) -> Result<u16, WriteError> {
    u16::try_from(idx).map_err(|_| WriteError::Sheet(format!("column {idx} out of range")))
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    datetime_format: &Format,
) -> Result<(), WriteError> {
    let result = match cell {
        Cell::Empty => return Ok(()),
        Cell::Text(s) if s.is_empty() => return Ok(()),
        Cell::Number(n) | Cell::DateTime(n) if !n.is_finite() => return Ok(()),
        Cell::Text(s) => worksheet.write_string(row, col, s),
        Cell::Number(n) => worksheet.write_number(row, col, *n),
        Cell::Bool(b) => worksheet.write_boolean(row, col, *b),
        Cell::DateTime(n) => worksheet.write_number_with_format(row, col, *n, datetime_format),
    };

    result
        .map(|_| ())
        .map_err(|e| WriteError::Sheet(format!("cell ({row}, {col}): {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fundcheck_core::{DerivedFields, EnrichedRecord, FundRecord};
    use tempfile::tempdir;

    /// Build an input workbook the way an operator would: mixed text and numbers.
    fn write_input(path: &Path) {
        let mut wb = Workbook::new();
        let ws = wb.add_worksheet();
        ws.write_string(0, 0, "CNPJ").unwrap();
        ws.write_string(0, 1, "Fundo").unwrap();
        ws.write_string(0, 2, "Cotas").unwrap();
        ws.write_string(1, 0, "12.345.678/0001-99").unwrap();
        ws.write_string(1, 1, "Fund X").unwrap();
        ws.write_number(1, 2, 1500.0).unwrap();
        ws.write_number(2, 0, 11222333000181.0).unwrap();
        ws.write_string(2, 1, "Fund Y").unwrap();
        wb.add_worksheet().set_name("ignored").unwrap().write_string(0, 0, "other").unwrap();
        wb.save(path).unwrap();
    }

    fn read_back(path: &Path) -> Vec<Vec<Data>> {
        let mut wb = open_workbook_auto(path).unwrap();
        let range = wb.worksheet_range_at(0).unwrap().unwrap();
        range.rows().map(|r| r.to_vec()).collect()
    }

    #[test]
    fn import_first_sheet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("entrada.xlsx");
        write_input(&path);

        let table = import(&path).unwrap();
        assert_eq!(table.headers, vec!["CNPJ", "Fundo", "Cotas"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].get(0), &Cell::from("12.345.678/0001-99"));
        assert_eq!(table.records[0].get(2), &Cell::Number(1500.0));
        // Numeric CNPJ keeps its digits when rendered
        assert_eq!(table.records[1].get(0).as_text().as_deref(), Some("11222333000181"));
        assert_eq!(table.records[1].get(2), &Cell::Empty);
    }

    #[test]
    fn import_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("entrada.xlsx");
        std::fs::write(&path, b"not a workbook").unwrap();

        assert!(matches!(import(&path), Err(LoadError::Open { .. })));
    }

    #[test]
    fn export_report_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("planilha-validada.xlsx");

        let table = EnrichedTable {
            headers: vec!["CNPJ".into(), "Cotas".into()],
            rows: vec![
                EnrichedRecord {
                    record: FundRecord::new(vec![Cell::from("12.345.678/0001-99"), Cell::Number(10.0)]),
                    derived: DerivedFields {
                        validated: true,
                        last_filing_date: "2024-01-15".into(),
                        external_id: "D1".into(),
                        secondary_id: "12345678000199".into(),
                    },
                },
                EnrichedRecord::unmatched(FundRecord::new(vec![Cell::from("99.999.999/9999-99")])),
            ],
        };

        export(&table, &path).unwrap();
        let rows = read_back(&path);

        assert_eq!(rows.len(), 3);
        let header: Vec<String> = rows[0].iter().map(|d| d.to_string()).collect();
        assert_eq!(
            header,
            vec!["CNPJ", "Cotas", "validado", "dataUltimoArquivamento", "externalId", "idRedis"]
        );
        assert_eq!(rows[1][1], Data::Float(10.0));
        assert_eq!(rows[1][2], Data::Bool(true));
        assert_eq!(rows[1][3], Data::String("2024-01-15".into()));
        assert_eq!(rows[1][4], Data::String("D1".into()));
        assert_eq!(rows[1][5], Data::String("12345678000199".into()));

        assert_eq!(rows[2][0], Data::String("99.999.999/9999-99".into()));
        assert_eq!(rows[2][2], Data::Bool(false));
        assert_eq!(rows[2][3], Data::Empty);
    }
}
