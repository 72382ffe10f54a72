// LedgerSift - app/job.rs
//
// One end-to-end invocation: load both inputs, run the enrichment filter,
// write the cleaned dataset. Everything is request-scoped; nothing is kept
// between runs.

use crate::core::export::{self, ExportFormat};
use crate::core::ingest;
use crate::core::model::ProcessedTable;
use crate::core::pipeline::{self, DuplicateGlPolicy};
use crate::core::targets::TargetAccounts;
use crate::platform::fs;
use crate::util::error::{LedgerSiftError, PipelineError, Result};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Everything a single run needs.
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub raw_path: PathBuf,
    pub mapping_path: PathBuf,
    pub output_path: PathBuf,
    pub format: ExportFormat,
    pub targets: TargetAccounts,
    pub raw_skip_rows: usize,
    pub max_file_size_bytes: u64,
    pub duplicate_gl: DuplicateGlPolicy,
}

/// How a run ended, short of a generic failure.
#[derive(Debug)]
pub enum JobOutcome {
    /// Matching rows were written to `path`.
    Written {
        path: PathBuf,
        table: ProcessedTable,
    },

    /// Processing succeeded but no row matched the target accounts.
    /// Nothing is written.
    NoMatches { enriched_count: usize },

    /// The raw ledger did not have the fixed layout; the result is empty.
    ColumnMismatch { found: usize, expected: usize },
}

impl JobOutcome {
    /// Rows in the result set (zero unless written).
    pub fn row_count(&self) -> usize {
        match self {
            Self::Written { table, .. } => table.rows.len(),
            _ => 0,
        }
    }
}

/// Load and process both inputs without writing anything.
///
/// A column-count mismatch comes back as `Err(Pipeline(ColumnMismatch))`;
/// `run_job` turns it into an empty outcome.
pub fn process_files(request: &JobRequest) -> Result<ProcessedTable> {
    fs::ensure_within_size(&request.raw_path, request.max_file_size_bytes)?;
    fs::ensure_within_size(&request.mapping_path, request.max_file_size_bytes)?;

    let raw_text = fs::read_file_lossy(&request.raw_path)?;
    let raw = ingest::read_raw(raw_text.as_bytes(), &request.raw_path, request.raw_skip_rows)?;
    drop(raw_text);

    let mapping_text = fs::read_file_latin1(&request.mapping_path)?;
    let mapping = ingest::read_mapping(mapping_text.as_bytes(), &request.mapping_path)?;

    tracing::info!(
        raw_rows = raw.rows.len(),
        raw_columns = raw.column_count,
        mapping_rows = mapping.rows.len(),
        "Inputs loaded"
    );

    let table = pipeline::process_logic(raw, &mapping, &request.targets, request.duplicate_gl)?;
    Ok(table)
}

/// Run one full job: process, then write the output if any row matched.
pub fn run_job(request: &JobRequest) -> Result<JobOutcome> {
    let started = Instant::now();

    let table = match process_files(request) {
        Ok(table) => table,
        Err(LedgerSiftError::Pipeline(PipelineError::ColumnMismatch { found, expected })) => {
            return Ok(JobOutcome::ColumnMismatch { found, expected });
        }
        Err(e) => return Err(e),
    };

    if table.is_empty() {
        tracing::warn!(
            enriched = table.enriched_count,
            "No data found matching the filters"
        );
        return Ok(JobOutcome::NoMatches {
            enriched_count: table.enriched_count,
        });
    }

    let written = write_output(&table, &request.output_path, request.format)?;
    tracing::info!(
        path = %request.output_path.display(),
        rows = written,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Cleaned dataset written"
    );

    Ok(JobOutcome::Written {
        path: request.output_path.clone(),
        table,
    })
}

/// Write the result set to `path`, creating or truncating the file.
pub fn write_output(table: &ProcessedTable, path: &Path, format: ExportFormat) -> Result<usize> {
    let file = std::fs::File::create(path).map_err(|e| LedgerSiftError::Io {
        path: path.to_path_buf(),
        operation: "create output",
        source: e,
    })?;
    let count = export::export(&table.rows, BufWriter::new(file), path, format)?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::constants::RAW_COLUMN_COUNT;
    use std::fs as stdfs;

    const META: &str = "Bank Export\nGenerated,2024-06-30\nBranch,ALL\n";

    fn ledger_line(account_no: &str, narration: &str, gl: &str) -> String {
        let mut fields: Vec<String> = (0..RAW_COLUMN_COUNT).map(|i| format!("v{i}")).collect();
        fields[4] = account_no.to_string();
        fields[10] = narration.to_string();
        fields[13] = gl.to_string();
        fields.join(",")
    }

    fn make_request(dir: &Path, raw: &str, mapping: &str, targets: &[i64]) -> JobRequest {
        let raw_path = dir.join("raw.csv");
        let mapping_path = dir.join("mapping.csv");
        stdfs::write(&raw_path, raw).unwrap();
        stdfs::write(&mapping_path, mapping).unwrap();
        JobRequest {
            raw_path,
            mapping_path,
            output_path: dir.join("out.csv"),
            format: ExportFormat::Csv,
            targets: targets.iter().copied().collect(),
            raw_skip_rows: 3,
            max_file_size_bytes: 1024 * 1024,
            duplicate_gl: DuplicateGlPolicy::FirstWins,
        }
    }

    #[test]
    fn test_run_job_writes_matches() {
        let dir = tempfile::tempdir().unwrap();
        let raw = format!(
            "{META}{}\n{}\n",
            ledger_line("300016", "TRF 100000000001", "300016"),
            ledger_line("555555", "TRF 100000000002", "300016"),
        );
        let request = make_request(dir.path(), &raw, "GL_Code,Product_Code\n300016,SAV\n", &[300016]);

        let outcome = run_job(&request).unwrap();
        assert_eq!(outcome.row_count(), 1);
        let JobOutcome::Written { path, table } = outcome else {
            panic!("expected Written");
        };
        assert_eq!(table.enriched_count, 2);
        let written = stdfs::read_to_string(path).unwrap();
        assert_eq!(written.lines().count(), 2);
        assert!(written.contains(",SAV"));
    }

    #[test]
    fn test_run_job_no_matches_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let raw = format!("{META}{}\n", ledger_line("555555", "", "1"));
        let request = make_request(dir.path(), &raw, "GL_Code,Product_Code\n", &[300016]);

        let outcome = run_job(&request).unwrap();
        assert!(matches!(outcome, JobOutcome::NoMatches { enriched_count: 1 }));
        assert!(!request.output_path.exists());
    }

    #[test]
    fn test_run_job_column_mismatch_is_empty_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let raw = format!("{META}a,b,c\n");
        let request = make_request(dir.path(), &raw, "GL_Code,Product_Code\n", &[300016]);

        let outcome = run_job(&request).unwrap();
        assert!(matches!(
            outcome,
            JobOutcome::ColumnMismatch {
                found: 3,
                expected: 15
            }
        ));
        assert_eq!(outcome.row_count(), 0);
        assert!(!request.output_path.exists());
    }

    #[test]
    fn test_run_job_missing_mapping_column_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let raw = format!("{META}{}\n", ledger_line("300016", "", "1"));
        let request = make_request(dir.path(), &raw, "GL,Product\n1,X\n", &[300016]);

        let result = run_job(&request);
        assert!(matches!(result, Err(LedgerSiftError::Ingest(_))));
    }

    #[test]
    fn test_mapping_saved_with_utf8_bom() {
        let dir = tempfile::tempdir().unwrap();
        let raw = format!("{META}{}\n", ledger_line("300016", "", "300016"));
        let request = make_request(dir.path(), &raw, "", &[300016]);
        stdfs::write(
            &request.mapping_path,
            b"\xEF\xBB\xBFGL_Code,Product_Code\n300016,SAV\n",
        )
        .unwrap();

        let table = process_files(&request).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].update_product_code.as_deref(), Some("SAV"));
    }

    #[test]
    fn test_oversized_input_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let raw = format!("{META}{}\n", ledger_line("300016", "", "1"));
        let mut request = make_request(dir.path(), &raw, "GL_Code,Product_Code\n", &[300016]);
        request.max_file_size_bytes = 8;

        let err = run_job(&request).unwrap_err();
        assert!(err.to_string().contains("exceeds maximum"), "{err}");
    }
}
