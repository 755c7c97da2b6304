//! TMDB API client module.
//!
//! Fetches the popular, trending and search listings from TMDB API v3
//! and decodes their `results` arrays into [`Movie`] values.

mod api;
mod client;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalMovieApi, MovieApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{DEFAULT_BASE_URL, TmdbClient, TmdbClientBuilder};
pub use types::{MOVIE_PAGE_BASE_URL, Movie, POSTER_BASE_URL, TmdbErrorResponse};
