//! In-memory fakes shared by the unit tests.
#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use cinefind_api::appwrite::{Query, SearchCountDocument, SearchCountRecord, SearchCountStore};
use cinefind_api::tmdb::{Movie, MovieApi};

/// Builds a movie with only the fields the tests look at.
pub fn movie(id: u64, title: &str) -> Movie {
    Movie {
        id,
        title: String::from(title),
        poster_path: Some(format!("/p{id}.jpg")),
        vote_average: Some(7.0),
        release_date: Some(String::from("2024-01-01")),
        original_language: String::from("en"),
    }
}

/// Builds a list of movies from `(id, title)` pairs.
pub fn movies(entries: &[(u64, &str)]) -> Vec<Movie> {
    entries.iter().map(|&(id, title)| movie(id, title)).collect()
}

/// Canned response: delay, then movies or a failure (`None`).
pub type CannedResponse = (Duration, Option<Vec<Movie>>);

/// Scripted movie API.
#[derive(Debug, Default)]
pub struct FakeMovieApi {
    /// Popular response (`None` fails).
    pub popular: Option<Vec<Movie>>,
    /// Trending response (`None` fails).
    pub trending: Option<Vec<Movie>>,
    /// Search responses keyed by query. Unknown queries return no results.
    pub searches: HashMap<String, CannedResponse>,
    /// Queries received, in call order.
    pub search_calls: Mutex<Vec<String>>,
}

impl FakeMovieApi {
    /// Adds a canned search response.
    pub fn with_search(mut self, query: &str, delay: Duration, movies: Option<Vec<Movie>>) -> Self {
        self.searches.insert(String::from(query), (delay, movies));
        self
    }

    /// Returns the queries received so far.
    pub fn calls(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }
}

impl MovieApi for FakeMovieApi {
    async fn popular(&self) -> Result<Vec<Movie>> {
        self.popular.clone().context("popular unavailable")
    }

    async fn trending(&self) -> Result<Vec<Movie>> {
        self.trending.clone().context("trending unavailable")
    }

    async fn search(&self, query: &str) -> Result<Vec<Movie>> {
        self.search_calls.lock().unwrap().push(String::from(query));
        let (delay, outcome) = self
            .searches
            .get(query)
            .cloned()
            .unwrap_or((Duration::ZERO, Some(Vec::new())));
        tokio::time::sleep(delay).await;
        outcome.context("search unavailable")
    }
}

/// In-memory search-count collection.
#[derive(Debug, Default)]
pub struct FakeStore {
    /// Stored documents.
    pub docs: Mutex<Vec<SearchCountDocument>>,
    /// Fail every call when set.
    pub fail: bool,
    next_id: AtomicU64,
}

impl FakeStore {
    /// Store that rejects every call.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Store pre-populated with `(term, count)` records.
    pub fn with_counts(counts: &[(&str, u64)]) -> Self {
        let store = Self::default();
        for &(term, count) in counts {
            let id = store.allocate_id();
            store.docs.lock().unwrap().push(SearchCountDocument {
                id,
                record: SearchCountRecord {
                    search_term: String::from(term),
                    count,
                    movie_id: None,
                    poster_url: None,
                    title: None,
                },
            });
        }
        store
    }

    /// Snapshot of stored documents.
    pub fn snapshot(&self) -> Vec<SearchCountDocument> {
        self.docs.lock().unwrap().clone()
    }

    fn allocate_id(&self) -> String {
        format!("doc-{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

impl SearchCountStore for FakeStore {
    async fn list_search_counts(&self, queries: &[Query]) -> Result<Vec<SearchCountDocument>> {
        if self.fail {
            bail!("store unavailable");
        }
        let mut docs = self.snapshot();
        for query in queries {
            match query {
                Query::Equal { attribute, values } if attribute == "searchTerm" => {
                    docs.retain(|d| {
                        values
                            .iter()
                            .any(|v| v.as_str() == Some(d.record.search_term.as_str()))
                    });
                }
                Query::OrderDesc(attribute) if attribute == "count" => {
                    docs.sort_by(|a, b| b.record.count.cmp(&a.record.count));
                }
                Query::Limit(limit) => docs.truncate(usize::try_from(*limit).unwrap()),
                Query::Equal { .. } | Query::OrderDesc(_) => {}
            }
        }
        Ok(docs)
    }

    async fn create_search_count(
        &self,
        record: &SearchCountRecord,
    ) -> Result<SearchCountDocument> {
        if self.fail {
            bail!("store unavailable");
        }
        let doc = SearchCountDocument {
            id: self.allocate_id(),
            record: record.clone(),
        };
        self.docs.lock().unwrap().push(doc.clone());
        Ok(doc)
    }

    async fn update_search_count(
        &self,
        document_id: &str,
        count: u64,
    ) -> Result<SearchCountDocument> {
        if self.fail {
            bail!("store unavailable");
        }
        let mut docs = self.docs.lock().unwrap();
        let doc = docs
            .iter_mut()
            .find(|d| d.id == document_id)
            .context("document not found")?;
        doc.record.count = count;
        Ok(doc.clone())
    }
}
