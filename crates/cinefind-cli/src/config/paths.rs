//! Config directory resolution.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// File name of the log written while the TUI is running.
const LOG_FILE_NAME: &str = "cinefind.log";

/// Resolves the config file path.
///
/// - If `dir` is `Some`, returns `{dir}/config.toml`.
/// - Otherwise returns `~/.config/cinefind/config.toml`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined (when `dir` is `None`).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join("config.toml"));
    }

    let home = std::env::var("HOME").context("HOME environment variable is not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("cinefind")
        .join("config.toml"))
}

/// Returns the log file path next to `config_path`.
#[must_use]
pub fn log_file_path(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map_or_else(|| PathBuf::from(LOG_FILE_NAME), |dir| dir.join(LOG_FILE_NAME))
}
