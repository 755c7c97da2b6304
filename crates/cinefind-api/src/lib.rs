//! API client library for cinefind.
//!
//! Provides clients for the TMDB movie metadata API and the Appwrite
//! document database that stores search analytics.

/// Appwrite document database client.
pub mod appwrite;

/// TMDB API client.
pub mod tmdb;
