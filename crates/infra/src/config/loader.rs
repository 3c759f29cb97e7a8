//! Configuration loading
//!
//! Environment variables come first; when the required variables are
//! missing the loader falls back to probing for a config file.
//!
//! ## Environment variables
//! - `WORKLENS_API_ORIGIN`: backend origin, including the API prefix
//! - `WORKLENS_API_TIMEOUT`: request timeout in seconds
//! - `WORKLENS_CAPTURE_INTERVAL`: seconds between screenshots
//! - `WORKLENS_CAPTURE_INITIAL_DELAY`: seconds before the first screenshot
//! - `WORKLENS_CAPTURE_ENABLED`: whether capture runs at all (true/false)
//! - `WORKLENS_KEYRING_SERVICE` / `WORKLENS_KEYRING_ACCOUNT`: token storage
//!   location (optional, defaulted)
//!
//! ## File probing
//! `config.{json,toml}` and `worklens.{json,toml}` are looked up in the
//! working directory, its parent, and next to the executable, in that
//! order. Format is picked by extension.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use worklens_domain::{ApiConfig, AuthConfig, CaptureConfig, Config, Result, WorkLensError};

const FILE_NAMES: [&str; 4] = ["config.json", "config.toml", "worklens.json", "worklens.toml"];

/// Load configuration, preferring the environment over config files.
///
/// # Errors
/// Returns `WorkLensError::Config` when neither source yields a valid
/// configuration.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "environment incomplete, probing for a config file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables.
///
/// The API origin and the timing variables are required; everything else
/// falls back to its default.
///
/// # Errors
/// Returns `WorkLensError::Config` when a required variable is missing or
/// unparseable.
pub fn load_from_env() -> Result<Config> {
    let api = ApiConfig {
        origin: require("WORKLENS_API_ORIGIN")?,
        timeout_seconds: parse("WORKLENS_API_TIMEOUT")?,
    };

    let capture = CaptureConfig {
        interval_seconds: parse("WORKLENS_CAPTURE_INTERVAL")?,
        initial_delay_seconds: parse("WORKLENS_CAPTURE_INITIAL_DELAY")?,
        enabled: flag("WORKLENS_CAPTURE_ENABLED", true),
        ..CaptureConfig::default()
    };

    let auth_defaults = AuthConfig::default();
    let auth = AuthConfig {
        keyring_service: std::env::var("WORKLENS_KEYRING_SERVICE")
            .unwrap_or(auth_defaults.keyring_service),
        keyring_account: std::env::var("WORKLENS_KEYRING_ACCOUNT")
            .unwrap_or(auth_defaults.keyring_account),
    };

    Ok(Config { api, capture, auth })
}

/// Load configuration from a file, probing the standard locations when no
/// path is given.
///
/// # Errors
/// Returns `WorkLensError::Config` when the file is missing, no candidate
/// exists, or the contents do not parse.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) if p.exists() => p,
        Some(p) => {
            return Err(WorkLensError::Config(format!("config file not found: {}", p.display())));
        }
        None => probe_config_paths().ok_or_else(|| {
            WorkLensError::Config("no config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| WorkLensError::Config(format!("failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    match path.extension().and_then(|e| e.to_str()).unwrap_or("json") {
        "toml" => toml::from_str(contents)
            .map_err(|e| WorkLensError::Config(format!("invalid TOML config: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| WorkLensError::Config(format!("invalid JSON config: {e}"))),
        other => Err(WorkLensError::Config(format!("unsupported config format: {other}"))),
    }
}

/// The first config file present in any of the probed locations
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(parent) = cwd.parent() {
            roots.push(parent.to_path_buf());
        }
        roots.insert(0, cwd);
    }
    let exe_dir = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf));
    if let Some(exe_dir) = exe_dir {
        roots.push(exe_dir);
    }

    roots
        .iter()
        .flat_map(|root| FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|candidate| candidate.exists())
}

fn require(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| WorkLensError::Config(format!("missing required environment variable: {key}")))
}

fn parse<T: FromStr>(key: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    require(key)?
        .parse()
        .map_err(|e| WorkLensError::Config(format!("invalid value for {key}: {e}")))
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off`, case-insensitive
fn flag(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}
