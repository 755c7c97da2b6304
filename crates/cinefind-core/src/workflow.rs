//! Fetch workflow state.

use std::fmt;

use anyhow::Result;
use cinefind_api::tmdb::Movie;

/// Number of trending movies kept for display.
pub const TRENDING_LIMIT: usize = 5;

/// Shown when a search succeeds with no results.
pub const NO_MOVIES_FOUND: &str = "No movies found!";

/// Shown when the search request fails.
pub const SEARCH_FAILED: &str = "Error fetching movies, please try again later";

/// Shown when the popular request fails.
pub const POPULAR_FAILED: &str = "Failed to load popular movies.";

/// Shown when the trending request fails.
pub const TRENDING_FAILED: &str = "Failed to load trending movies.";

/// One of the three independent fetch workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Workflow {
    /// First page of popular movies, fetched once at startup.
    Popular,
    /// Today's trending movies, fetched once at startup.
    Trending,
    /// Search by the effective term.
    Search,
}

impl Workflow {
    /// Fixed user-facing message for a failed request.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Popular => POPULAR_FAILED,
            Self::Trending => TRENDING_FAILED,
            Self::Search => SEARCH_FAILED,
        }
    }
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Popular => "popular",
            Self::Trending => "trending",
            Self::Search => "search",
        };
        f.write_str(name)
    }
}

/// Movies returned by one successful fetch, tagged by workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    source: Workflow,
    movies: Vec<Movie>,
}

impl ResultSet {
    /// Creates a result set.
    #[must_use]
    pub const fn new(source: Workflow, movies: Vec<Movie>) -> Self {
        Self { source, movies }
    }

    /// Workflow that produced this set.
    #[must_use]
    pub const fn source(&self) -> Workflow {
        self.source
    }

    /// Movies in API order.
    #[must_use]
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }
}

/// Why a workflow ended without a displayable list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailure {
    /// The search succeeded but matched nothing.
    NoResults,
    /// Transport, HTTP status or decoding failure.
    Unavailable(Workflow),
}

impl FetchFailure {
    /// Fixed user-facing message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NoResults => NO_MOVIES_FOUND,
            Self::Unavailable(workflow) => workflow.failure_message(),
        }
    }
}

/// State of a single workflow.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WorkflowState {
    /// Nothing requested (or search term is blank).
    #[default]
    Idle,
    /// Request in flight.
    Loading,
    /// Last request succeeded.
    Loaded(ResultSet),
    /// Last request failed or found nothing.
    Failed(FetchFailure),
}

impl WorkflowState {
    /// Converts a fetch outcome into the terminal state for `workflow`.
    ///
    /// Trending results are cut to [`TRENDING_LIMIT`]. An empty search result
    /// becomes [`FetchFailure::NoResults`]; empty popular/trending lists are
    /// simply loaded.
    #[must_use]
    pub fn from_outcome(workflow: Workflow, outcome: Result<Vec<Movie>>) -> Self {
        match outcome {
            Ok(movies) if movies.is_empty() && workflow == Workflow::Search => {
                Self::Failed(FetchFailure::NoResults)
            }
            Ok(mut movies) => {
                if workflow == Workflow::Trending {
                    movies.truncate(TRENDING_LIMIT);
                }
                Self::Loaded(ResultSet::new(workflow, movies))
            }
            Err(_) => Self::Failed(FetchFailure::Unavailable(workflow)),
        }
    }

    /// Returns `true` while a request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Movies of the last successful fetch, or an empty slice.
    #[must_use]
    pub fn movies(&self) -> &[Movie] {
        match self {
            Self::Loaded(set) => set.movies(),
            Self::Idle | Self::Loading | Self::Failed(_) => &[],
        }
    }

    /// User-facing error message, if the workflow failed.
    #[must_use]
    pub const fn error_message(&self) -> Option<&'static str> {
        match self {
            Self::Failed(failure) => Some(failure.message()),
            Self::Idle | Self::Loading | Self::Loaded(_) => None,
        }
    }
}
