//! Application configuration module.
//!
//! Manages the TOML config file holding API credentials, document store
//! identifiers and search tuning, with environment variable overrides.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
pub use paths::{log_file_path, resolve_config_path};
