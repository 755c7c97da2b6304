//! TUI rendering logic for the movie browser.

use cinefind_api::tmdb::Movie;
use cinefind_core::orchestrator::Orchestrator;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use super::state::{BrowserState, InputMode};

/// Draws the movie browser UI.
#[allow(clippy::indexing_slicing)]
pub fn draw<A, S>(
    frame: &mut Frame,
    state: &BrowserState,
    orchestrator: &Orchestrator<A, S>,
    query: &str,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(3), // trending
            Constraint::Length(1), // status
            Constraint::Min(5),    // movie list
            Constraint::Length(4), // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], state, query);
    draw_trending(frame, chunks[1], state, orchestrator);
    draw_status(frame, chunks[2], state, orchestrator);
    draw_movies(frame, chunks[3], state, orchestrator.displayed_movies());
    draw_footer(frame, chunks[4], state);
}

/// Draws the header with the search input.
fn draw_header(frame: &mut Frame, area: Rect, state: &BrowserState, query: &str) {
    let style = if state.input_mode == InputMode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let text = if query.is_empty() && state.input_mode == InputMode::Normal {
        Line::from(Span::styled(
            "Search through thousands of movies",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(String::from(query))
    };

    let search = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" cinefind | Search: / "),
    );
    frame.render_widget(search, area);
}

/// Draws the trending row (rank, title and rating).
fn draw_trending<A, S>(
    frame: &mut Frame,
    area: Rect,
    state: &BrowserState,
    orchestrator: &Orchestrator<A, S>,
) {
    let trending = orchestrator.trending();
    let line = if trending.is_loading() {
        Line::from(format!("{} Loading...", state.spinner()))
    } else if let Some(message) = trending.error_message() {
        Line::from(Span::styled(message, Style::default().fg(Color::Red)))
    } else {
        let mut spans = Vec::new();
        for (rank, movie) in (1_usize..).zip(orchestrator.trending_movies()) {
            spans.push(Span::styled(
                format!("{rank}. "),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(format!(
                "{} ({})   ",
                movie.title,
                movie.rating_label()
            )));
        }
        Line::from(spans)
    };

    let row = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Trending Movies "),
    );
    frame.render_widget(row, area);
}

/// Draws the status line: spinner while loading, else the error or a count.
fn draw_status<A, S>(
    frame: &mut Frame,
    area: Rect,
    state: &BrowserState,
    orchestrator: &Orchestrator<A, S>,
) {
    let line = if orchestrator.is_loading() {
        Line::from(format!(" {} Loading...", state.spinner()))
    } else if let Some(message) = orchestrator.error_message() {
        Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(Color::Red),
        ))
    } else if orchestrator.is_searching() {
        Line::from(format!(
            " {} result(s) for \"{}\"",
            orchestrator.displayed_movies().len(),
            orchestrator.effective_term()
        ))
    } else {
        Line::from(String::new())
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Draws the "All Movies" list.
fn draw_movies(frame: &mut Frame, area: Rect, state: &BrowserState, movies: &[Movie]) {
    let items: Vec<ListItem> = movies
        .iter()
        .enumerate()
        .map(|(i, movie)| {
            let is_cursor = i == state.cursor && state.input_mode == InputMode::Normal;
            let marker = if is_cursor { "\u{25b8} " } else { "  " };
            let style = if is_cursor {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let year = movie
                .release_year()
                .map_or_else(|| String::from("N/A"), |y| y.to_string());

            ListItem::new(Line::from(vec![
                Span::raw(String::from(marker)),
                Span::styled(movie.title.clone(), style),
                Span::styled(
                    format!(
                        "  \u{2605} {}  \u{2022} {}  \u{2022} {}",
                        movie.rating_label(),
                        movie.original_language,
                        year
                    ),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list =
        List::new(items).block(Block::default().borders(Borders::ALL).title(" All Movies "));
    frame.render_widget(list, area);
}

/// Draws the footer with key hints and the most searched terms.
fn draw_footer(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let help_text = if state.input_mode == InputMode::Search {
        "Type to search | Esc: clear | Enter: done"
    } else {
        "\u{2191}\u{2193}/j/k: move  o/Enter: open in browser  /: search  q: quit"
    };

    let mut lines = vec![Line::from(help_text)];
    if !state.top_searches.is_empty() {
        let top = state
            .top_searches
            .iter()
            .map(|(term, count)| format!("{term} ({count})"))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(Line::from(Span::styled(
            format!("Top searches: {top}"),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let footer = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
