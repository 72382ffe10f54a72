// LedgerSift - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation
// 3. Target account list resolution
// 4. Running the job and reporting the outcome

use clap::{Parser, ValueEnum};
use ledgersift::app::job::{self, JobOutcome, JobRequest};
use ledgersift::app::settings;
use ledgersift::core::export::{self, ExportFormat};
use ledgersift::platform::config::{AppConfig, PlatformPaths};
use ledgersift::util::error::Result;
use ledgersift::util::{self, constants};
use std::path::{Path, PathBuf};

/// LedgerSift - bank transaction export cleaner.
///
/// Extracts account identifiers from narrations, corrects product codes from
/// a GL mapping, and keeps only rows for the target account numbers.
#[derive(Parser, Debug)]
#[command(name = "ledgersift", version, about)]
struct Cli {
    /// Raw ledger export (CSV, no header, metadata rows at the top).
    raw: PathBuf,

    /// Product code mapping (CSV with GL_Code and Product_Code columns, Latin-1).
    mapping: PathBuf,

    /// Output file (default from config, BOC_Performance_Report.csv).
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Output format.
    #[arg(long = "format", value_enum)]
    format: Option<FormatArg>,

    /// Target account numbers, comma or newline separated.
    #[arg(short = 'a', long = "accounts", conflicts_with = "accounts_file")]
    accounts: Option<String>,

    /// File containing the target account numbers.
    #[arg(long = "accounts-file")]
    accounts_file: Option<PathBuf>,

    /// Metadata rows to skip at the top of the raw export.
    #[arg(long = "skip-rows")]
    skip_rows: Option<usize>,

    /// Rows to echo to stdout after processing (0 disables the preview).
    #[arg(long = "preview")]
    preview: Option<usize>,

    /// Path to config.toml (defaults to the platform config location).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

fn default_output(app_config: &AppConfig, format: ExportFormat) -> PathBuf {
    Path::new(&app_config.export_file_name).with_extension(format.extension())
}

/// Report a setup failure and exit with the generic failure code.
fn or_exit<T>(result: Result<T>) -> T {
    result.unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1)
    })
}

fn main() {
    let cli = Cli::parse();

    let loaded = or_exit(settings::load(
        cli.config.as_deref(),
        PlatformPaths::resolve().config_file(),
    ));
    let app_config = loaded.config;

    util::logging::init(cli.debug, app_config.log_level.as_deref());

    tracing::info!(
        version = constants::APP_VERSION,
        config = %loaded.path.display(),
        "LedgerSift starting"
    );
    for warning in &loaded.warnings {
        tracing::warn!(error = %warning, "Config warning; using default");
    }

    let raw_skip_rows = or_exit(settings::skip_rows(cli.skip_rows, &app_config));
    let parsed = or_exit(settings::resolve_targets(
        cli.accounts.as_deref(),
        cli.accounts_file.as_deref(),
        &app_config,
    ));
    if !parsed.skipped.is_empty() {
        eprintln!(
            "Skipped {} malformed account entr{}: {}",
            parsed.skipped.len(),
            if parsed.skipped.len() == 1 { "y" } else { "ies" },
            parsed.skipped.join(", ")
        );
    }

    let format = cli
        .format
        .map(ExportFormat::from)
        .unwrap_or(app_config.export_format);
    let request = JobRequest {
        raw_path: cli.raw.clone(),
        mapping_path: cli.mapping.clone(),
        output_path: cli
            .output
            .clone()
            .unwrap_or_else(|| default_output(&app_config, format)),
        format,
        targets: parsed.targets,
        raw_skip_rows,
        max_file_size_bytes: app_config.max_file_size_bytes,
        duplicate_gl: app_config.duplicate_gl,
    };
    let preview_rows = cli
        .preview
        .unwrap_or(app_config.preview_rows)
        .min(constants::MAX_PREVIEW_ROWS);

    match job::run_job(&request) {
        Ok(JobOutcome::Written { path, table }) => {
            if preview_rows > 0 {
                let shown = &table.rows[..preview_rows.min(table.rows.len())];
                let stdout = std::io::stdout();
                if let Err(e) = export::export_csv(shown, stdout.lock(), Path::new("<stdout>")) {
                    tracing::warn!(error = %e, "Preview output failed");
                }
            }
            println!(
                "Processed {} records ({} enriched, {} with updated product code). Saved to '{}'.",
                table.rows.len(),
                table.enriched_count,
                table.mapped_count,
                path.display()
            );
        }
        Ok(JobOutcome::NoMatches { enriched_count }) => {
            println!("No data found matching the filters ({enriched_count} rows checked).");
        }
        Ok(JobOutcome::ColumnMismatch { found, expected }) => {
            eprintln!("Column mismatch! File has {found} columns but expected {expected}.");
            std::process::exit(2);
        }
        Err(e) => {
            tracing::error!(error = %e, "Processing failed");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
