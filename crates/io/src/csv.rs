// CSV/TSV import/export
//
// Every CSV field loads as text, which keeps punctuated CNPJs intact.

use std::io::Read;
use std::path::Path;

use fundcheck_core::{Cell, EnrichedTable, FundTable};

use crate::error::{LoadError, WriteError};

pub fn import(path: &Path) -> Result<FundTable, LoadError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    import_from_string(path, &content, delimiter)
}

pub fn import_with_delimiter(path: &Path, delimiter: u8) -> Result<FundTable, LoadError> {
    let content = read_file_as_utf8(path)?;
    import_from_string(path, &content, delimiter)
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// Brazilian exports default to `;`, so semicolon is tried before comma.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed (Windows-1252 fallback for Excel exports).
fn read_file_as_utf8(path: &Path) -> Result<String, LoadError> {
    let open_err = |e: std::io::Error| LoadError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let mut file = std::fs::File::open(path).map_err(open_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(open_err)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s.trim_start_matches('\u{feff}').to_string()),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

fn import_from_string(path: &Path, content: &str, delimiter: u8) -> Result<FundTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut grid = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| LoadError::Sheet {
            path: path.to_path_buf(),
            message: format!("line {}: {}", row_idx + 1, e),
        })?;
        let row: Vec<Cell> = record
            .iter()
            .map(|field| if field.is_empty() { Cell::Empty } else { Cell::from(field) })
            .collect();
        grid.push(row);
    }

    Ok(crate::table_from_grid(grid))
}

pub fn export(table: &EnrichedTable, path: &Path, delimiter: u8) -> Result<(), WriteError> {
    let save_err = |message: String| WriteError::Save {
        path: path.to_path_buf(),
        message,
    };

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|e| save_err(e.to_string()))?;

    writer
        .write_record(table.output_headers())
        .map_err(|e| save_err(e.to_string()))?;

    for cells in table.output_rows() {
        let record: Vec<String> = cells.iter().map(|c| c.as_text().unwrap_or_default()).collect();
        writer.write_record(&record).map_err(|e| save_err(e.to_string()))?;
    }

    writer.flush().map_err(|e| save_err(e.to_string()))?;
    Ok(())
}
