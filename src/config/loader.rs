//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Default listing server.
pub const DEFAULT_API_BASE: &str = "http://localhost:8080";

/// Default listing endpoint path, relative to the API base.
pub const DEFAULT_LISTING_PATH: &str = "/api/pdfs";

/// Default listing request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/pdfws/config.toml`. Filter and sort criteria are
/// deliberately absent: they are never persisted.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Listing server base URL (e.g., "http://localhost:8080").
    #[serde(default)]
    pub api_base: Option<String>,

    /// Listing endpoint path (e.g., "/api/pdfs").
    #[serde(default)]
    pub listing_path: Option<String>,

    /// Listing request timeout in seconds.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// List a local directory instead of querying the server.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Listing server base URL, also used to resolve preview URLs.
    pub api_base: String,
    /// Listing endpoint path.
    pub listing_path: String,
    /// Listing request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Local directory source, if any.
    pub directory: Option<PathBuf>,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            listing_path: DEFAULT_LISTING_PATH.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            directory: None,
            log_file_path: default_log_path(),
        }
    }
}

/// CLI flags that override the resolved config when set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// `--api-base`
    pub api_base: Option<String>,
    /// `--listing-path`
    pub listing_path: Option<String>,
    /// `--timeout-secs`
    pub request_timeout_secs: Option<u64>,
    /// `--dir`
    pub directory: Option<PathBuf>,
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/pdfws/pdfws.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("pdfws").join("pdfws.log")
    } else {
        PathBuf::from("pdfws.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/pdfws/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pdfws").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `PDFWS_CONFIG` environment variable
/// 3. Default path `~/.config/pdfws/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var("PDFWS_CONFIG") {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        api_base: config.api_base.unwrap_or(defaults.api_base),
        listing_path: config.listing_path.unwrap_or(defaults.listing_path),
        request_timeout_secs: config
            .request_timeout_secs
            .unwrap_or(defaults.request_timeout_secs),
        directory: config.directory.or(defaults.directory),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `PDFWS_API_BASE`: Override listing server base URL
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(api_base) = std::env::var("PDFWS_API_BASE") {
        config.api_base = api_base;
    }

    config
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only flags that were explicitly set are applied.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, overrides: CliOverrides) -> ResolvedConfig {
    if let Some(api_base) = overrides.api_base {
        config.api_base = api_base;
    }

    if let Some(listing_path) = overrides.listing_path {
        config.listing_path = listing_path;
    }

    if let Some(timeout) = overrides.request_timeout_secs {
        config.request_timeout_secs = timeout;
    }

    if let Some(directory) = overrides.directory {
        config.directory = Some(directory);
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
