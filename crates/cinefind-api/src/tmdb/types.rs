//! TMDB API response types.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Base URL for poster images (w500 size).
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Base URL for movie pages on the TMDB website.
pub const MOVIE_PAGE_BASE_URL: &str = "https://www.themoviedb.org/movie";

/// A single movie entry from a `results` array.
///
/// The same shape is returned by `movie/popular`, `trending/movie/day`
/// and `search/movie`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    #[serde(default)]
    pub title: String,
    /// Poster image path (e.g. `/abc.jpg`).
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Vote average (0.0 - 10.0).
    #[serde(default)]
    pub vote_average: Option<f64>,
    /// Release date (YYYY-MM-DD, empty, or null).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: String,
}

impl Movie {
    /// Returns the full w500 poster URL, if the movie has a poster.
    #[must_use]
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| format!("{POSTER_BASE_URL}{p}"))
    }

    /// Returns the TMDB website URL for this movie.
    #[must_use]
    pub fn page_url(&self) -> String {
        format!("{MOVIE_PAGE_BASE_URL}/{}", self.id)
    }

    /// Parses the release year out of `release_date`.
    ///
    /// TMDB sends an empty string for unreleased titles, which yields `None`.
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        let date = self.release_date.as_deref()?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .map(|d| d.year())
    }

    /// Formats the vote average with one decimal, or `N/A`.
    #[must_use]
    pub fn rating_label(&self) -> String {
        self.vote_average
            .map_or_else(|| String::from("N/A"), |v| format!("{v:.1}"))
    }
}

/// TMDB error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB internal status code.
    pub status_code: u32,
    /// Human-readable error message.
    pub status_message: String,
    /// Success flag (always `false` for errors).
    #[serde(default)]
    pub success: bool,
}
