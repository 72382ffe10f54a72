// LedgerSift - platform/config.rs
//
// Platform config directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::export::ExportFormat;
use crate::core::pipeline::DuplicateGlPolicy;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Resolved platform paths for LedgerSift configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/ledgersift/ or %APPDATA%\LedgerSift\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of config.toml.
    ///
    /// On Windows the config directory ends in a `config` component
    /// (%APPDATA%\LedgerSift\config), and the file sits one level above it.
    /// Everywhere else it lives inside the app's own config directory, e.g.
    /// ~/.config/ledgersift/config.toml.
    pub fn config_file(&self) -> PathBuf {
        let base = match self.config_dir.parent() {
            Some(parent) if self.config_dir.file_name() == Some(OsStr::new("config")) => parent,
            _ => self.config_dir.as_path(),
        };
        base.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub input: InputSection,
    pub mapping: MappingSection,
    pub filter: FilterSection,
    pub export: ExportSection,
    pub logging: LoggingSection,
}

/// `[input]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct InputSection {
    /// Metadata rows preceding the raw ledger data.
    pub raw_skip_rows: Option<usize>,
    /// Per-file size limit in MB.
    pub max_file_size_mb: Option<u64>,
}

/// `[mapping]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct MappingSection {
    /// "first" or "error".
    pub duplicate_gl: Option<String>,
}

/// `[filter]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct FilterSection {
    /// Comma/newline-separated target account list.
    pub accounts: Option<String>,
}

/// `[export]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExportSection {
    pub file_name: Option<String>,
    /// "csv" or "json".
    pub format: Option<String>,
    pub preview_rows: Option<usize>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Input --
    pub raw_skip_rows: usize,
    pub max_file_size_bytes: u64,

    // -- Mapping --
    pub duplicate_gl: DuplicateGlPolicy,

    // -- Filter --
    /// Operator account list; `None` means the built-in list.
    pub accounts: Option<String>,

    // -- Export --
    pub export_file_name: String,
    pub export_format: ExportFormat,
    pub preview_rows: usize,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            raw_skip_rows: constants::DEFAULT_RAW_SKIP_ROWS,
            max_file_size_bytes: constants::DEFAULT_MAX_FILE_SIZE_MB * constants::BYTES_PER_MB,
            duplicate_gl: DuplicateGlPolicy::default(),
            accounts: None,
            export_file_name: constants::DEFAULT_EXPORT_FILE_NAME.to_string(),
            export_format: ExportFormat::default(),
            preview_rows: constants::DEFAULT_PREVIEW_ROWS,
            log_level: None,
        }
    }
}

/// Load and validate the config file at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// A missing file yields defaults with no warnings (first run). An unreadable
/// or unparseable file yields defaults plus a warning.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<ConfigError>) {
    if !config_path.exists() {
        return (AppConfig::default(), Vec::new());
    }

    match std::fs::read_to_string(config_path) {
        Ok(content) => parse_config(&content, config_path),
        Err(e) => (
            AppConfig::default(),
            vec![ConfigError::Io {
                path: config_path.to_path_buf(),
                source: e,
            }],
        ),
    }
}

/// Validate config.toml text. `config_path` is used for error context only.
pub fn parse_config(content: &str, config_path: &Path) -> (AppConfig, Vec<ConfigError>) {
    let mut warnings = Vec::new();

    let raw: RawConfig = match toml::from_str(content) {
        Ok(r) => r,
        Err(e) => {
            warnings.push(ConfigError::TomlParse {
                path: config_path.to_path_buf(),
                source: e,
            });
            return (AppConfig::default(), warnings);
        }
    };

    let mut config = AppConfig::default();

    // -- Input: raw_skip_rows --
    if let Some(rows) = raw.input.raw_skip_rows {
        if rows <= constants::MAX_RAW_SKIP_ROWS {
            config.raw_skip_rows = rows;
        } else {
            warnings.push(out_of_range(
                "input.raw_skip_rows",
                rows,
                format!("0-{}", constants::MAX_RAW_SKIP_ROWS),
            ));
        }
    }

    // -- Input: max_file_size_mb --
    if let Some(mb) = raw.input.max_file_size_mb {
        if (constants::MIN_MAX_FILE_SIZE_MB..=constants::ABSOLUTE_MAX_FILE_SIZE_MB).contains(&mb) {
            config.max_file_size_bytes = mb * constants::BYTES_PER_MB;
        } else {
            warnings.push(out_of_range(
                "input.max_file_size_mb",
                mb,
                format!(
                    "{}-{}",
                    constants::MIN_MAX_FILE_SIZE_MB,
                    constants::ABSOLUTE_MAX_FILE_SIZE_MB
                ),
            ));
        }
    }

    // -- Mapping: duplicate_gl --
    if let Some(ref policy) = raw.mapping.duplicate_gl {
        match DuplicateGlPolicy::parse(policy) {
            Some(p) => config.duplicate_gl = p,
            None => warnings.push(out_of_range(
                "mapping.duplicate_gl",
                policy,
                "\"first\" or \"error\"".to_string(),
            )),
        }
    }

    // -- Filter: accounts --
    if let Some(accounts) = raw.filter.accounts {
        if !accounts.trim().is_empty() {
            config.accounts = Some(accounts);
        }
    }

    // -- Export: file_name --
    if let Some(name) = raw.export.file_name {
        if name.trim().is_empty() {
            warnings.push(out_of_range(
                "export.file_name",
                "",
                "a non-empty file name".to_string(),
            ));
        } else {
            config.export_file_name = name;
        }
    }

    // -- Export: format --
    if let Some(ref format) = raw.export.format {
        match format.to_lowercase().as_str() {
            "csv" => config.export_format = ExportFormat::Csv,
            "json" => config.export_format = ExportFormat::Json,
            _ => warnings.push(out_of_range(
                "export.format",
                format,
                "\"csv\" or \"json\"".to_string(),
            )),
        }
    }

    // -- Export: preview_rows --
    if let Some(rows) = raw.export.preview_rows {
        if rows <= constants::MAX_PREVIEW_ROWS {
            config.preview_rows = rows;
        } else {
            warnings.push(out_of_range(
                "export.preview_rows",
                rows,
                format!("0-{}", constants::MAX_PREVIEW_ROWS),
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(out_of_range(
                "logging.level",
                level,
                "error, warn, info, debug or trace".to_string(),
            ));
        }
    }

    (config, warnings)
}

fn out_of_range(field: &str, value: impl ToString, expected: String) -> ConfigError {
    ConfigError::ValueOutOfRange {
        field: field.to_string(),
        value: value.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> (AppConfig, Vec<ConfigError>) {
        parse_config(content, Path::new("config.toml"))
    }

    #[test]
    fn test_config_file_inside_app_dir() {
        let paths = PlatformPaths {
            config_dir: Path::new("home").join(".config").join("ledgersift"),
        };
        assert_eq!(
            paths.config_file(),
            Path::new("home")
                .join(".config")
                .join("ledgersift")
                .join("config.toml")
        );
    }

    #[test]
    fn test_config_file_above_windows_config_dir() {
        let paths = PlatformPaths {
            config_dir: Path::new("AppData").join("ledgersift").join("config"),
        };
        assert_eq!(
            paths.config_file(),
            Path::new("AppData").join("ledgersift").join("config.toml")
        );
    }

    #[test]
    fn test_config_file_current_dir_fallback() {
        let paths = PlatformPaths {
            config_dir: PathBuf::from("."),
        };
        assert_eq!(paths.config_file(), Path::new(".").join("config.toml"));
    }

    #[test]
    fn test_empty_config_is_default() {
        let (config, warnings) = parse("");
        assert!(warnings.is_empty());
        assert_eq!(config.raw_skip_rows, 3);
        assert_eq!(config.export_file_name, "BOC_Performance_Report.csv");
        assert_eq!(config.preview_rows, 50);
        assert_eq!(config.duplicate_gl, DuplicateGlPolicy::FirstWins);
        assert!(config.accounts.is_none());
    }

    #[test]
    fn test_full_config() {
        let (config, warnings) = parse(
            r#"
            [input]
            raw_skip_rows = 0
            max_file_size_mb = 10

            [mapping]
            duplicate_gl = "error"

            [filter]
            accounts = "300016,\n300015"

            [export]
            file_name = "Automated_Bank_Export.csv"
            format = "json"
            preview_rows = 0

            [logging]
            level = "DEBUG"

            [unknown]
            ignored = true
            "#,
        );
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(config.raw_skip_rows, 0);
        assert_eq!(config.max_file_size_bytes, 10 * 1024 * 1024);
        assert_eq!(config.duplicate_gl, DuplicateGlPolicy::Reject);
        assert_eq!(config.accounts.as_deref(), Some("300016,\n300015"));
        assert_eq!(config.export_file_name, "Automated_Bank_Export.csv");
        assert_eq!(config.export_format, ExportFormat::Json);
        assert_eq!(config.preview_rows, 0);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_out_of_range_values_fall_back() {
        let (config, warnings) = parse(
            r#"
            [input]
            raw_skip_rows = 500
            max_file_size_mb = 0

            [mapping]
            duplicate_gl = "last"

            [export]
            preview_rows = 5000
            "#,
        );
        assert_eq!(warnings.len(), 4);
        assert!(warnings
            .iter()
            .all(|w| matches!(w, ConfigError::ValueOutOfRange { .. })));
        assert_eq!(config.raw_skip_rows, 3);
        assert_eq!(config.duplicate_gl, DuplicateGlPolicy::FirstWins);
        assert_eq!(config.preview_rows, 50);
    }

    #[test]
    fn test_unparseable_config_uses_defaults() {
        let (config, warnings) = parse("[input\nraw_skip_rows = ");
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], ConfigError::TomlParse { .. }));
        assert_eq!(config.raw_skip_rows, 3);
    }

    #[test]
    fn test_missing_file_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(&dir.path().join("config.toml"));
        assert!(warnings.is_empty());
        assert_eq!(config.preview_rows, 50);
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[export]\npreview_rows = 5\n").unwrap();
        let (config, warnings) = load_config(&path);
        assert!(warnings.is_empty());
        assert_eq!(config.preview_rows, 5);
    }
}
