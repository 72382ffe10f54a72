// LedgerSift - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation: every variant carries the path or
// value that caused it, and the causal chain is kept for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all LedgerSift operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum LedgerSiftError {
    /// Reading or decoding an input table failed.
    Ingest(IngestError),

    /// The enrichment pipeline rejected its input.
    Pipeline(PipelineError),

    /// Writing the cleaned dataset failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for LedgerSiftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ingest(e) => write!(f, "Input error: {e}"),
            Self::Pipeline(e) => write!(f, "Processing error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for LedgerSiftError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Ingest(e) => Some(e),
            Self::Pipeline(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Ingest errors
// ---------------------------------------------------------------------------

/// Errors raised while loading the raw ledger or the mapping table.
#[derive(Debug)]
pub enum IngestError {
    /// The CSV reader rejected the input.
    Csv { path: PathBuf, source: csv::Error },

    /// No data records remain after the skipped metadata rows.
    Empty { path: PathBuf },

    /// Input file exceeds the configured size limit.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// A record has more fields than the first data record.
    RaggedRow {
        path: PathBuf,
        record: u64,
        expected: usize,
        found: usize,
    },

    /// A required column is absent from the mapping header.
    MissingColumn { path: PathBuf, column: &'static str },

    /// I/O error reading an input file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv { path, source } => {
                write!(f, "'{}': CSV error: {source}", path.display())
            }
            Self::Empty { path } => {
                write!(f, "'{}': no data rows found", path.display())
            }
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "'{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::RaggedRow {
                path,
                record,
                expected,
                found,
            } => write!(
                f,
                "'{}' record {record}: expected {expected} fields, saw {found}",
                path.display()
            ),
            Self::MissingColumn { path, column } => write!(
                f,
                "'{}': required column '{column}' not found in header",
                path.display()
            ),
            Self::Io { path, source } => {
                write!(f, "'{}': I/O error: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Csv { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<IngestError> for LedgerSiftError {
    fn from(e: IngestError) -> Self {
        Self::Ingest(e)
    }
}

// ---------------------------------------------------------------------------
// Pipeline errors
// ---------------------------------------------------------------------------

/// Errors raised by the enrichment pipeline itself.
#[derive(Debug)]
pub enum PipelineError {
    /// The raw table does not have the fixed positional layout.
    ColumnMismatch { found: usize, expected: usize },

    /// The mapping holds more than one row for a GL code and the duplicate
    /// policy is strict. Row numbers are 1-based data rows.
    DuplicateGlCode {
        code: String,
        first_row: usize,
        duplicate_row: usize,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnMismatch { found, expected } => write!(
                f,
                "Column mismatch! File has {found} columns but expected {expected}."
            ),
            Self::DuplicateGlCode {
                code,
                first_row,
                duplicate_row,
            } => write!(
                f,
                "GL code {code} appears in mapping rows {first_row} and {duplicate_row}"
            ),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<PipelineError> for LedgerSiftError {
    fn from(e: PipelineError) -> Self {
        Self::Pipeline(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for LedgerSiftError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// An explicitly requested config file does not exist.
    NotFound { path: PathBuf },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::NotFound { path } => {
                write!(f, "Config file '{}' not found", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for LedgerSiftError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for LedgerSift results.
pub type Result<T> = std::result::Result<T, LedgerSiftError>;
