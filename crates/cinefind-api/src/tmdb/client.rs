//! `TmdbClient` - TMDB API client implementation.

use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use super::api::MovieApi;
use super::types::{Movie, TmdbErrorResponse};

/// Default base URL for TMDB API v3.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Language requested for popular listings.
const POPULAR_LANGUAGE: &str = "en-US";

/// TMDB API client.
///
/// Authenticates with the v3 `api_key` query parameter. Every request is a
/// single attempt: no retry, no timeout.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// v3 API key.
    api_key: String,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the v3 API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set or empty.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .context("api_key is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_key,
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Sends a GET request with the API key and returns the `results` array.
    ///
    /// A missing or malformed `results` field yields an empty list rather
    /// than an error. Non-2xx statuses and non-JSON bodies are errors.
    #[instrument(skip_all, fields(path = path))]
    async fn fetch_results(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<Movie>> {
        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let request = self
            .http_client
            .get(url)
            .query(query)
            .query(&[("api_key", self.api_key.as_str())])
            .build()
            .with_context(|| format!("failed to build request: {path}"))?;

        tracing::debug!(path, "TMDB API request");

        let result = self.http_client.execute(request).await;
        let response = result.with_context(|| format!("request failed: {path}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                bail!(
                    "TMDB API error (HTTP {}): code={}, message={}",
                    status,
                    error_response.status_code,
                    error_response.status_message,
                );
            }
            bail!("TMDB API error (HTTP {status}): {body}");
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {path}"))?;
        let value: serde_json::Value = serde_json::from_str(&body)
            .with_context(|| format!("failed to decode JSON response: {path}"))?;

        Ok(extract_results(&value, path))
    }
}

/// Pulls `results` out of a response body, tolerating its absence.
///
/// Entries are decoded one by one; an entry that does not decode as a
/// [`Movie`] is skipped so the rest of the list is still shown.
fn extract_results(value: &serde_json::Value, path: &str) -> Vec<Movie> {
    let Some(results) = value.get("results") else {
        tracing::debug!(path, "response has no results field");
        return Vec::new();
    };
    let Some(entries) = results.as_array() else {
        tracing::warn!(path, "results field is not an array, treating as empty");
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| match Movie::deserialize(entry) {
            Ok(movie) => Some(movie),
            Err(e) => {
                tracing::warn!(path, error = %e, "skipping malformed movie entry");
                None
            }
        })
        .collect()
}

impl MovieApi for TmdbClient {
    #[instrument(skip_all)]
    async fn popular(&self) -> Result<Vec<Movie>> {
        let query = [
            ("language", String::from(POPULAR_LANGUAGE)),
            ("page", String::from("1")),
        ];
        self.fetch_results("movie/popular", &query).await
    }

    #[instrument(skip_all)]
    async fn trending(&self) -> Result<Vec<Movie>> {
        self.fetch_results("trending/movie/day", &[]).await
    }

    #[instrument(skip_all)]
    async fn search(&self, query: &str) -> Result<Vec<Movie>> {
        let query = [("query", String::from(query))];
        self.fetch_results("search/movie", &query).await
    }
}
