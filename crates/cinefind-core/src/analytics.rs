//! Search-count analytics backed by the document store.

use anyhow::{Context, Result};
use cinefind_api::appwrite::{Query, SearchCountDocument, SearchCountRecord, SearchCountStore};
use cinefind_api::tmdb::Movie;
use tracing::instrument;

/// Attribute the records are keyed by.
const SEARCH_TERM_ATTRIBUTE: &str = "searchTerm";

/// Attribute holding the search count.
const COUNT_ATTRIBUTE: &str = "count";

/// Default number of records returned by [`AnalyticsRecorder::trending_by_count`].
pub const DEFAULT_TRENDING_LIMIT: u32 = 5;

/// Records successful searches as per-term counters.
///
/// Each record holds the term, its count and a representative movie (the
/// first search result at the time the record was created). Updates are a
/// read-then-write without transactions, so concurrent identical searches
/// from several sessions can under-count.
#[derive(Debug)]
pub struct AnalyticsRecorder<S> {
    store: S,
}

/// What a successful [`AnalyticsRecorder::record_search`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recorded {
    /// A new record was created with count 1.
    Created,
    /// An existing record was bumped to this count.
    Incremented(u64),
}

impl<S: SearchCountStore + Sync> AnalyticsRecorder<S> {
    /// Creates a recorder over `store`.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Counts one successful search for `term`.
    ///
    /// Failures are logged and swallowed; the caller never sees them.
    #[instrument(skip_all, fields(term = term))]
    pub async fn record_search(&self, term: &str, movie: &Movie) {
        match self.try_record_search(term, movie).await {
            Ok(Recorded::Created) => tracing::debug!("search count record created"),
            Ok(Recorded::Incremented(count)) => tracing::debug!(count, "search count incremented"),
            Err(e) => tracing::warn!(error = %format!("{e:#}"), "failed to record search"),
        }
    }

    async fn try_record_search(&self, term: &str, movie: &Movie) -> Result<Recorded> {
        let existing = self
            .store
            .list_search_counts(&[Query::equal(SEARCH_TERM_ATTRIBUTE, term)])
            .await
            .context("failed to look up search count")?;

        if let Some(doc) = existing.into_iter().next() {
            let count = doc.record.count.saturating_add(1);
            self.store
                .update_search_count(&doc.id, count)
                .await
                .with_context(|| format!("failed to update search count {}", doc.id))?;
            return Ok(Recorded::Incremented(count));
        }

        let record = SearchCountRecord {
            search_term: String::from(term),
            count: 1,
            movie_id: Some(movie.id),
            poster_url: movie.poster_url(),
            title: Some(movie.title.clone()),
        };
        self.store
            .create_search_count(&record)
            .await
            .context("failed to create search count")?;
        Ok(Recorded::Created)
    }

    /// Returns up to `limit` records ordered by count, highest first.
    ///
    /// Failures are logged and yield an empty list.
    #[instrument(skip_all, fields(limit = limit))]
    pub async fn trending_by_count(&self, limit: u32) -> Vec<SearchCountDocument> {
        let queries = [Query::order_desc(COUNT_ATTRIBUTE), Query::limit(limit)];
        match self.store.list_search_counts(&queries).await {
            Ok(docs) => docs,
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "failed to list top searches");
                Vec::new()
            }
        }
    }
}
