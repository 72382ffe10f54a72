// LedgerSift - core/ingest.rs
//
// CSV loading for the raw ledger export and the product-code mapping.
// Core layer: accepts Read trait objects, never touches the filesystem.
// Paths are only used as labels in error context.

use crate::core::model::{Cell, MappingRow, MappingTable, RawTable};
use crate::util::constants::{MAPPING_GL_COLUMN, MAPPING_PRODUCT_COLUMN};
use crate::util::error::IngestError;
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;

/// Cell values read as missing, matching the usual spreadsheet export
/// placeholders for "no value".
const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn to_cell(field: &str) -> Cell {
    if NA_MARKERS.contains(&field) {
        None
    } else {
        Some(field.to_string())
    }
}

/// Load the raw ledger export.
///
/// The export has no header row. The first `skip_rows` records are report
/// metadata and are discarded. The column count is fixed by the first data
/// record: shorter records are padded with missing cells, longer ones are
/// rejected.
pub fn read_raw<R: Read>(
    reader: R,
    path: &Path,
    skip_rows: usize,
) -> Result<RawTable, IngestError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut table = RawTable::default();
    let mut record = StringRecord::new();
    let mut record_no: u64 = 0;

    loop {
        let more = csv_reader
            .read_record(&mut record)
            .map_err(|e| IngestError::Csv {
                path: path.to_path_buf(),
                source: e,
            })?;
        if !more {
            break;
        }
        record_no += 1;
        if record_no <= skip_rows as u64 {
            continue;
        }

        if table.rows.is_empty() {
            table.column_count = record.len();
        } else if record.len() > table.column_count {
            return Err(IngestError::RaggedRow {
                path: path.to_path_buf(),
                record: record_no,
                expected: table.column_count,
                found: record.len(),
            });
        }

        let mut cells: Vec<Cell> = record.iter().map(to_cell).collect();
        cells.resize(table.column_count, None);
        table.rows.push(cells);
    }

    if table.rows.is_empty() {
        return Err(IngestError::Empty {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!(
        file = %path.display(),
        rows = table.rows.len(),
        columns = table.column_count,
        skipped = skip_rows,
        "Raw ledger loaded"
    );

    Ok(table)
}

/// Load the product-code mapping.
///
/// The first record is a header; `GL_Code` and `Product_Code` are located by
/// name (whitespace-trimmed, BOM-stripped) and all other columns are ignored.
pub fn read_mapping<R: Read>(reader: R, path: &Path) -> Result<MappingTable, IngestError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| IngestError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?
        .clone();

    let missing = |column: &'static str| IngestError::MissingColumn {
        path: path.to_path_buf(),
        column,
    };
    let gl_idx = column_index(&headers, MAPPING_GL_COLUMN)
        .ok_or_else(|| missing(MAPPING_GL_COLUMN))?;
    let product_idx = column_index(&headers, MAPPING_PRODUCT_COLUMN)
        .ok_or_else(|| missing(MAPPING_PRODUCT_COLUMN))?;

    let mut table = MappingTable::default();
    for result in csv_reader.records() {
        let record = result.map_err(|e| IngestError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;
        table.rows.push(MappingRow {
            gl_code: record.get(gl_idx).and_then(to_cell),
            product_code: record.get(product_idx).and_then(to_cell),
        });
    }

    tracing::debug!(
        file = %path.display(),
        rows = table.rows.len(),
        "Mapping table loaded"
    );

    Ok(table)
}

fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
}
