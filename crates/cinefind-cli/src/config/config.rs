//! `AppConfig` struct, TOML loading and environment overrides.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default debounce quiet period in milliseconds.
const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Movie metadata API settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Search analytics document store settings.
    #[serde(default)]
    pub appwrite: AppwriteConfig,
    /// Search input tuning.
    #[serde(default)]
    pub search: SearchConfig,
}

/// TMDB configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TmdbConfig {
    /// v3 API key (`TMDB_API_KEY`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL override (`TMDB_BASE_URL`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Appwrite configuration. Recording is disabled unless all three IDs are set.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppwriteConfig {
    /// Endpoint override (`APPWRITE_ENDPOINT`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Project ID (`APPWRITE_PROJECT_ID`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Database ID (`APPWRITE_DATABASE_ID`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_id: Option<String>,
    /// Collection ID (`APPWRITE_COLLECTION_ID`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
}

/// Identifiers of the search-count collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionIds<'a> {
    /// Project ID.
    pub project_id: &'a str,
    /// Database ID.
    pub database_id: &'a str,
    /// Collection ID.
    pub collection_id: &'a str,
}

impl AppwriteConfig {
    /// Returns the collection identifiers, or `None` if any is missing.
    #[must_use]
    pub fn collection_ids(&self) -> Option<CollectionIds<'_>> {
        Some(CollectionIds {
            project_id: non_blank(self.project_id.as_deref())?,
            database_id: non_blank(self.database_id.as_deref())?,
            collection_id: non_blank(self.collection_id.as_deref())?,
        })
    }
}

/// Search input configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchConfig {
    /// Quiet period before typed input is searched, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

const fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

/// Returns `value` unless it is absent or blank.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Applies overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`. Unset or empty variables are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let targets: [(&str, &mut Option<String>); 6] = [
            ("TMDB_API_KEY", &mut self.tmdb.api_key),
            ("TMDB_BASE_URL", &mut self.tmdb.base_url),
            ("APPWRITE_ENDPOINT", &mut self.appwrite.endpoint),
            ("APPWRITE_PROJECT_ID", &mut self.appwrite.project_id),
            ("APPWRITE_DATABASE_ID", &mut self.appwrite.database_id),
            ("APPWRITE_COLLECTION_ID", &mut self.appwrite.collection_id),
        ];
        for (key, slot) in targets {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                tracing::debug!(key, "config value overridden from environment");
                *slot = Some(value);
            }
        }
    }

    /// Returns the TMDB API key.
    ///
    /// # Errors
    ///
    /// Returns an error if neither `TMDB_API_KEY` nor `tmdb.api_key` is set.
    pub fn tmdb_api_key(&self) -> Result<&str> {
        non_blank(self.tmdb.api_key.as_deref())
            .context("TMDB API key is required: set TMDB_API_KEY or tmdb.api_key in config.toml")
    }

    /// Returns the search debounce quiet period.
    #[must_use]
    pub const fn debounce_period(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }
}
