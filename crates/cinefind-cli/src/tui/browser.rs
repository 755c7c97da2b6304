//! Movie browser TUI main loop.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use cinefind_api::appwrite::{SearchCountDocument, SearchCountStore};
use cinefind_api::tmdb::{Movie, MovieApi};
use cinefind_core::analytics::{AnalyticsRecorder, DEFAULT_TRENDING_LIMIT};
use cinefind_core::debounce::Debouncer;
use cinefind_core::orchestrator::{CompletionReceiver, Orchestrator};
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::oneshot;
use tokio::time::MissedTickBehavior;

use super::state::{BrowserAction, BrowserState, InputMode};
use super::ui;

/// Spinner redraw interval.
const SPINNER_INTERVAL: Duration = Duration::from_millis(100);

/// How long pending searches may keep recording after the user quits.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Runs the movie browser until the user quits.
///
/// Starts the popular and trending fetches (and the top-searches lookup when
/// `recorder` is set), then multiplexes terminal input, the search debounce
/// timer and fetch completions on one task.
///
/// # Errors
///
/// Returns an error if terminal setup, drawing or event handling fails.
pub async fn run_browser<A, S>(
    mut orchestrator: Orchestrator<A, S>,
    mut completions: CompletionReceiver,
    mut debouncer: Debouncer,
    recorder: Option<Arc<AnalyticsRecorder<S>>>,
) -> Result<()>
where
    A: MovieApi + Sync + 'static,
    S: SearchCountStore + Sync + 'static,
{
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let mut state = BrowserState::new();
    orchestrator.start();

    let (top_tx, top_rx) = oneshot::channel();
    if let Some(recorder) = recorder {
        tokio::spawn(async move {
            let docs = recorder.trending_by_count(DEFAULT_TRENDING_LIMIT).await;
            let _ = top_tx.send(docs);
        });
    }

    let result = run_event_loop(
        &mut terminal,
        &mut state,
        &mut orchestrator,
        &mut completions,
        &mut debouncer,
        top_rx,
    )
    .await;

    debouncer.cancel();

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    orchestrator.shutdown(SHUTDOWN_GRACE).await;

    result
}

/// Main event loop.
async fn run_event_loop<A, S>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowserState,
    orchestrator: &mut Orchestrator<A, S>,
    completions: &mut CompletionReceiver,
    debouncer: &mut Debouncer,
    mut top_searches: oneshot::Receiver<Vec<SearchCountDocument>>,
) -> Result<()>
where
    A: MovieApi + Sync + 'static,
    S: SearchCountStore + Sync + 'static,
{
    let mut events = EventStream::new();
    let mut top_searches_done = false;
    let mut spinner = tokio::time::interval(SPINNER_INTERVAL);
    spinner.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        state.clamp_cursor(orchestrator.displayed_movies().len());
        terminal
            .draw(|frame| ui::draw(frame, state, orchestrator, debouncer.raw()))
            .context("failed to draw TUI")?;

        tokio::select! {
            event = events.next() => {
                let Some(event) = event else {
                    return Ok(());
                };
                if let Event::Key(key) = event.context("failed to read event")?
                    && key.kind == KeyEventKind::Press
                {
                    let action = if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        Some(BrowserAction::Quit)
                    } else {
                        match state.input_mode {
                            InputMode::Search => {
                                handle_search_input(state, debouncer, key.code);
                                None
                            }
                            InputMode::Normal => handle_normal_input(
                                state,
                                key.code,
                                orchestrator.displayed_movies().len(),
                            ),
                        }
                    };
                    match action {
                        Some(BrowserAction::Quit) => return Ok(()),
                        Some(BrowserAction::OpenSelected) => {
                            open_selected(orchestrator.displayed_movies(), state.cursor);
                        }
                        None => {}
                    }
                }
            }
            term = debouncer.settled() => {
                state.cursor = 0;
                orchestrator.set_effective_term(&term);
            }
            Some(completion) = completions.recv() => {
                orchestrator.apply(completion);
            }
            docs = &mut top_searches, if !top_searches_done => {
                top_searches_done = true;
                if let Ok(docs) = docs {
                    state.top_searches = docs
                        .into_iter()
                        .map(|d| (d.record.search_term, d.record.count))
                        .collect();
                }
            }
            _ = spinner.tick() => state.tick_spinner(),
        }
    }
}

/// Handles key input in search mode. Every key edits the raw term or leaves the mode.
fn handle_search_input(state: &mut BrowserState, debouncer: &mut Debouncer, key: KeyCode) {
    match key {
        KeyCode::Esc => {
            debouncer.set_raw(String::new());
            state.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            state.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            debouncer.pop();
        }
        KeyCode::Char(c) => {
            debouncer.push(c);
        }
        _ => {}
    }
}

/// Handles key input in normal mode. Returns `Some` to act on the key.
const fn handle_normal_input(
    state: &mut BrowserState,
    key: KeyCode,
    list_len: usize,
) -> Option<BrowserAction> {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => return Some(BrowserAction::Quit),
        KeyCode::Enter | KeyCode::Char('o') => return Some(BrowserAction::OpenSelected),
        KeyCode::Up | KeyCode::Char('k') => state.move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(list_len),
        KeyCode::Char('/') => {
            state.input_mode = InputMode::Search;
        }
        _ => {}
    }
    None
}

/// Opens the TMDB page of the movie under the cursor.
fn open_selected(movies: &[Movie], cursor: usize) {
    if let Some(movie) = movies.get(cursor) {
        let url = movie.page_url();
        tracing::info!(%url, "opening movie page");
        let _ = open::that(&url);
    }
}
