//! `SearchCountStore` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::query::Query;
use super::types::{SearchCountDocument, SearchCountRecord};

/// Search-count collection trait.
///
/// Abstracts the document operations the analytics recorder needs so it
/// can run against an in-memory fake in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(SearchCountStore: Send)]
pub trait LocalSearchCountStore {
    /// Lists search-count documents matching `queries`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn list_search_counts(&self, queries: &[Query]) -> Result<Vec<SearchCountDocument>>;

    /// Creates a new search-count document with a server-generated ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn create_search_count(&self, record: &SearchCountRecord)
    -> Result<SearchCountDocument>;

    /// Overwrites the `count` attribute of an existing document.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn update_search_count(
        &self,
        document_id: &str,
        count: u64,
    ) -> Result<SearchCountDocument>;
}
