//! Fetch orchestrator for the popular, trending and search workflows.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use cinefind_api::appwrite::SearchCountStore;
use cinefind_api::tmdb::{Movie, MovieApi};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::analytics::AnalyticsRecorder;
use crate::workflow::{Workflow, WorkflowState};

/// Result of a spawned fetch, delivered back to the orchestrator owner.
#[derive(Debug)]
pub struct Completion(CompletionKind);

#[derive(Debug)]
enum CompletionKind {
    Popular(Result<Vec<Movie>>),
    Trending(Result<Vec<Movie>>),
    Search {
        seq: u64,
        term: String,
        outcome: Result<Vec<Movie>>,
    },
}

impl Completion {
    /// Workflow this completion belongs to.
    #[must_use]
    pub const fn workflow(&self) -> Workflow {
        match self.0 {
            CompletionKind::Popular(_) => Workflow::Popular,
            CompletionKind::Trending(_) => Workflow::Trending,
            CompletionKind::Search { .. } => Workflow::Search,
        }
    }
}

/// Receiving end for [`Completion`]s.
pub type CompletionReceiver = mpsc::UnboundedReceiver<Completion>;

/// Runs the three fetch workflows and decides what is displayed.
///
/// Fetches run as spawned tasks and report back through the
/// [`CompletionReceiver`] returned by [`Orchestrator::new`]; the owner feeds
/// each completion to [`Orchestrator::apply`] on its own event loop, so all
/// state lives on a single task. Searches carry a sequence number and only
/// the most recently initiated one is applied.
///
/// A search task records analytics after reporting its completion. Those
/// tasks are tracked so [`Orchestrator::shutdown`] can let pending writes
/// finish before the runtime goes away.
#[derive(Debug)]
pub struct Orchestrator<A, S> {
    api: Arc<A>,
    recorder: Option<Arc<AnalyticsRecorder<S>>>,
    completions: mpsc::UnboundedSender<Completion>,
    popular: WorkflowState,
    trending: WorkflowState,
    search: WorkflowState,
    effective_term: String,
    search_seq: u64,
    started: bool,
    searches: JoinSet<()>,
}

impl<A, S> Orchestrator<A, S>
where
    A: MovieApi + Sync + 'static,
    S: SearchCountStore + Sync + 'static,
{
    /// Creates an orchestrator and the receiver its fetches report to.
    ///
    /// With `recorder` set to `None`, successful searches are not counted.
    #[must_use]
    pub fn new(
        api: Arc<A>,
        recorder: Option<Arc<AnalyticsRecorder<S>>>,
    ) -> (Self, CompletionReceiver) {
        let (completions, rx) = mpsc::unbounded_channel();
        let orchestrator = Self {
            api,
            recorder,
            completions,
            popular: WorkflowState::Idle,
            trending: WorkflowState::Idle,
            search: WorkflowState::Idle,
            effective_term: String::new(),
            search_seq: 0,
            started: false,
            searches: JoinSet::new(),
        };
        (orchestrator, rx)
    }

    /// Starts the popular and trending fetches. Later calls do nothing.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;

        self.popular = WorkflowState::Loading;
        let api = Arc::clone(&self.api);
        let tx = self.completions.clone();
        tokio::spawn(async move {
            let outcome = api.popular().await;
            let _ = tx.send(Completion(CompletionKind::Popular(outcome)));
        });

        self.trending = WorkflowState::Loading;
        let api = Arc::clone(&self.api);
        let tx = self.completions.clone();
        tokio::spawn(async move {
            let outcome = api.trending().await;
            let _ = tx.send(Completion(CompletionKind::Trending(outcome)));
        });
    }

    /// Sets the effective (debounced) search term.
    ///
    /// A blank term resets the search workflow to idle without a request.
    /// Any other new term starts a search; a repeated term does nothing.
    /// Must be called from within a Tokio runtime.
    pub fn set_effective_term(&mut self, term: &str) {
        if term == self.effective_term {
            return;
        }
        self.effective_term = String::from(term);
        self.search_seq = self.search_seq.wrapping_add(1);
        while self.searches.try_join_next().is_some() {}

        if term.trim().is_empty() {
            self.search = WorkflowState::Idle;
            return;
        }

        self.search = WorkflowState::Loading;
        tracing::debug!(term, seq = self.search_seq, "starting search");

        let seq = self.search_seq;
        let term = String::from(term);
        let api = Arc::clone(&self.api);
        let recorder = self.recorder.clone();
        let tx = self.completions.clone();
        self.searches.spawn(async move {
            let outcome = api.search(&term).await;
            let first = outcome.as_ref().ok().and_then(|m| m.first().cloned());
            let _ = tx.send(Completion(CompletionKind::Search {
                seq,
                term: term.clone(),
                outcome,
            }));
            if let (Some(recorder), Some(movie)) = (recorder, first) {
                recorder.record_search(&term, &movie).await;
            }
        });
    }

    /// Waits up to `grace` for in-flight searches and their analytics writes,
    /// then aborts whatever is still running.
    pub async fn shutdown(&mut self, grace: Duration) {
        if self.searches.is_empty() {
            return;
        }
        let searches = &mut self.searches;
        let drained = tokio::time::timeout(grace, async {
            while searches.join_next().await.is_some() {}
        })
        .await;
        if drained.is_err() {
            tracing::warn!(
                pending = self.searches.len(),
                "aborting unfinished search tasks"
            );
            self.searches.abort_all();
        }
    }

    /// Applies a completed fetch. Returns `false` for a stale search response.
    pub fn apply(&mut self, completion: Completion) -> bool {
        match completion.0 {
            CompletionKind::Popular(outcome) => {
                self.popular = settle(Workflow::Popular, outcome);
            }
            CompletionKind::Trending(outcome) => {
                self.trending = settle(Workflow::Trending, outcome);
            }
            CompletionKind::Search { seq, term, outcome } => {
                if seq != self.search_seq {
                    tracing::debug!(
                        term = %term,
                        seq,
                        current = self.search_seq,
                        "discarding stale search response"
                    );
                    return false;
                }
                self.search = settle(Workflow::Search, outcome);
            }
        }
        true
    }
}

impl<A, S> Orchestrator<A, S> {
    /// Popular workflow state.
    #[must_use]
    pub const fn popular(&self) -> &WorkflowState {
        &self.popular
    }

    /// Trending workflow state.
    #[must_use]
    pub const fn trending(&self) -> &WorkflowState {
        &self.trending
    }

    /// Search workflow state.
    #[must_use]
    pub const fn search(&self) -> &WorkflowState {
        &self.search
    }

    /// Current effective search term.
    #[must_use]
    pub fn effective_term(&self) -> &str {
        &self.effective_term
    }

    /// Returns `true` when the effective term is not blank.
    #[must_use]
    pub fn is_searching(&self) -> bool {
        !self.effective_term.trim().is_empty()
    }

    /// Workflow whose list is shown in the main section.
    #[must_use]
    pub fn displayed_workflow(&self) -> Workflow {
        if self.is_searching() {
            Workflow::Search
        } else {
            Workflow::Popular
        }
    }

    fn displayed_state(&self) -> &WorkflowState {
        match self.displayed_workflow() {
            Workflow::Search => &self.search,
            Workflow::Popular | Workflow::Trending => &self.popular,
        }
    }

    /// Movies for the main section.
    #[must_use]
    pub fn displayed_movies(&self) -> &[Movie] {
        self.displayed_state().movies()
    }

    /// Trending movies (at most five).
    #[must_use]
    pub fn trending_movies(&self) -> &[Movie] {
        self.trending.movies()
    }

    /// Returns `true` while the displayed workflow is loading.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.displayed_state().is_loading()
    }

    /// Error message for the main section, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&'static str> {
        self.displayed_state().error_message()
    }
}

/// Logs a failed outcome and converts it into the workflow's state.
fn settle(workflow: Workflow, outcome: Result<Vec<Movie>>) -> WorkflowState {
    match &outcome {
        Ok(movies) => tracing::debug!(%workflow, count = movies.len(), "fetch completed"),
        Err(e) => tracing::warn!(%workflow, error = %format!("{e:#}"), "fetch failed"),
    }
    WorkflowState::from_outcome(workflow, outcome)
}
