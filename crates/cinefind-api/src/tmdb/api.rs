//! `MovieApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::Movie;

/// Movie metadata API trait.
///
/// Abstracts the three listing endpoints for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(MovieApi: Send)]
pub trait LocalMovieApi {
    /// Fetches the first page of popular movies (`movie/popular`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the status is not 2xx.
    async fn popular(&self) -> Result<Vec<Movie>>;

    /// Fetches today's trending movies (`trending/movie/day`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the status is not 2xx.
    async fn trending(&self) -> Result<Vec<Movie>>;

    /// Searches movies by title (`search/movie`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the status is not 2xx.
    async fn search(&self, query: &str) -> Result<Vec<Movie>>;
}
