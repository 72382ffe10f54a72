// LedgerSift - app/settings.rs
//
// Resolution of per-run settings from the command line, config.toml and
// built-in defaults. Command-line values win over config values, which win
// over defaults.

use crate::core::targets::{ParsedTargets, TargetAccounts};
use crate::platform::config::{self, AppConfig};
use crate::util::constants;
use crate::util::error::{ConfigError, LedgerSiftError, Result};
use std::path::{Path, PathBuf};

/// A loaded configuration plus the path it came from.
#[derive(Debug)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: AppConfig,
    /// Non-fatal problems; the affected values fell back to defaults.
    pub warnings: Vec<ConfigError>,
}

/// Load config.toml from `explicit`, or from `default_path` when no path
/// was given.
///
/// A missing file at the default location is a normal first run. A missing
/// file that the operator named explicitly is an error.
pub fn load(explicit: Option<&Path>, default_path: PathBuf) -> Result<LoadedConfig> {
    let path = match explicit {
        Some(path) if !path.exists() => {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        Some(path) => path.to_path_buf(),
        None => default_path,
    };
    let (config, warnings) = config::load_config(&path);
    Ok(LoadedConfig {
        path,
        config,
        warnings,
    })
}

/// Metadata rows to skip: the command-line value if given, else the config.
///
/// The command-line value is held to the same bound as `[input]
/// raw_skip_rows`, but is rejected rather than replaced.
pub fn skip_rows(cli_value: Option<usize>, app_config: &AppConfig) -> Result<usize> {
    match cli_value {
        Some(rows) if rows > constants::MAX_RAW_SKIP_ROWS => {
            Err(LedgerSiftError::Config(ConfigError::ValueOutOfRange {
                field: "--skip-rows".to_string(),
                value: rows.to_string(),
                expected: format!("0-{}", constants::MAX_RAW_SKIP_ROWS),
            }))
        }
        Some(rows) => Ok(rows),
        None => Ok(app_config.raw_skip_rows),
    }
}

/// Pick the account list source: `accounts` text > `accounts_file` >
/// `[filter] accounts` > the built-in list.
pub fn resolve_targets(
    accounts: Option<&str>,
    accounts_file: Option<&Path>,
    app_config: &AppConfig,
) -> Result<ParsedTargets> {
    if let Some(text) = accounts {
        tracing::debug!(source = "command line", "Target accounts selected");
        return Ok(TargetAccounts::parse(text));
    }
    if let Some(path) = accounts_file {
        let text = std::fs::read_to_string(path).map_err(|e| LedgerSiftError::Io {
            path: path.to_path_buf(),
            operation: "read account list",
            source: e,
        })?;
        tracing::debug!(source = %path.display(), "Target accounts selected");
        return Ok(TargetAccounts::parse(&text));
    }
    if let Some(ref text) = app_config.accounts {
        tracing::debug!(source = "config", "Target accounts selected");
        return Ok(TargetAccounts::parse(text));
    }
    tracing::debug!(source = "built-in", "Target accounts selected");
    Ok(ParsedTargets {
        targets: TargetAccounts::builtin(),
        skipped: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_accounts(accounts: Option<&str>) -> AppConfig {
        AppConfig {
            accounts: accounts.map(str::to_string),
            ..AppConfig::default()
        }
    }

    fn write_accounts(dir: &Path, text: &str) -> PathBuf {
        let path = dir.join("accounts.txt");
        std::fs::write(&path, text).unwrap();
        path
    }

    // -------------------------------------------------------------------------
    // Account source priority
    // -------------------------------------------------------------------------

    #[test]
    fn test_cli_text_beats_everything() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_accounts(dir.path(), "222");
        let config = config_with_accounts(Some("333"));

        let parsed = resolve_targets(Some("111"), Some(&file), &config).unwrap();
        assert_eq!(parsed.targets.len(), 1);
        assert!(parsed.targets.contains(111));
    }

    #[test]
    fn test_accounts_file_beats_config() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_accounts(dir.path(), "222\n223\nbad\n");
        let config = config_with_accounts(Some("333"));

        let parsed = resolve_targets(None, Some(&file), &config).unwrap();
        assert_eq!(parsed.targets.len(), 2);
        assert!(parsed.targets.contains(223));
        assert!(!parsed.targets.contains(333));
        assert_eq!(parsed.skipped, vec!["bad"]);
    }

    #[test]
    fn test_config_beats_builtin() {
        let parsed = resolve_targets(None, None, &config_with_accounts(Some("333"))).unwrap();
        assert_eq!(parsed.targets.len(), 1);
        assert!(parsed.targets.contains(333));
    }

    #[test]
    fn test_builtin_when_nothing_given() {
        let parsed = resolve_targets(None, None, &config_with_accounts(None)).unwrap();
        assert_eq!(parsed.targets, TargetAccounts::builtin());
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_unreadable_accounts_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");

        let err = resolve_targets(None, Some(&missing), &AppConfig::default()).unwrap_err();
        assert!(matches!(err, LedgerSiftError::Io { .. }));
        assert!(err.to_string().contains("missing.txt"), "{err}");
    }

    // -------------------------------------------------------------------------
    // Skip rows
    // -------------------------------------------------------------------------

    #[test]
    fn test_skip_rows_cli_overrides_config() {
        let config = AppConfig {
            raw_skip_rows: 5,
            ..AppConfig::default()
        };
        assert_eq!(skip_rows(Some(0), &config).unwrap(), 0);
        assert_eq!(skip_rows(None, &config).unwrap(), 5);
        assert_eq!(
            skip_rows(Some(constants::MAX_RAW_SKIP_ROWS), &config).unwrap(),
            constants::MAX_RAW_SKIP_ROWS
        );
    }

    #[test]
    fn test_skip_rows_cli_out_of_range() {
        let err = skip_rows(Some(constants::MAX_RAW_SKIP_ROWS + 1), &AppConfig::default())
            .unwrap_err();
        assert!(
            matches!(
                err,
                LedgerSiftError::Config(ConfigError::ValueOutOfRange { ref field, .. })
                    if field == "--skip-rows"
            ),
            "got {err:?}"
        );
    }

    // -------------------------------------------------------------------------
    // Config loading
    // -------------------------------------------------------------------------

    #[test]
    fn test_explicit_missing_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = load(Some(&path), dir.path().join("config.toml")).unwrap_err();
        assert!(matches!(
            err,
            LedgerSiftError::Config(ConfigError::NotFound { .. })
        ));
        assert!(err.to_string().starts_with("Configuration error:"), "{err}");
    }

    #[test]
    fn test_missing_default_config_is_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let default_path = dir.path().join("config.toml");

        let loaded = load(None, default_path.clone()).unwrap();
        assert_eq!(loaded.path, default_path);
        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.config.raw_skip_rows, constants::DEFAULT_RAW_SKIP_ROWS);
    }

    #[test]
    fn test_explicit_config_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[filter]\naccounts = \"300016\"\n").unwrap();

        let loaded = load(Some(&path), dir.path().join("config.toml")).unwrap();
        assert_eq!(loaded.path, path);
        assert_eq!(loaded.config.accounts.as_deref(), Some("300016"));
    }
}
