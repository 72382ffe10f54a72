// LedgerSift - core/export.rs
//
// CSV and JSON export of the cleaned dataset.
// Core layer: writes to any Write trait object.

use crate::core::model::EnrichedRow;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

/// Output encodings for the cleaned dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    /// Conventional file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Export rows as UTF-8 CSV with a header row.
///
/// Columns: the 15 raw ledger columns followed by `Account number`,
/// `Operative account` and `Update_Product_Code`.
pub fn export_csv<W: Write>(
    rows: &[EnrichedRow],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(EnrichedRow::column_names())
        .map_err(csv_err)?;

    let mut count = 0;
    for row in rows {
        csv_writer.write_record(row.to_cells()).map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Export rows as a pretty-printed JSON array of objects keyed by column name.
pub fn export_json<W: Write>(
    rows: &[EnrichedRow],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, rows).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(rows.len())
}

/// Export in the requested format.
pub fn export<W: Write>(
    rows: &[EnrichedRow],
    writer: W,
    export_path: &Path,
    format: ExportFormat,
) -> Result<usize, ExportError> {
    match format {
        ExportFormat::Csv => export_csv(rows, writer, export_path),
        ExportFormat::Json => export_json(rows, writer, export_path),
    }
}
