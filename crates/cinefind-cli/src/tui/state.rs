//! Movie browser state management.

/// Spinner frames shown while a list is loading.
const SPINNER_FRAMES: [char; 10] = [
    '\u{280b}', '\u{2819}', '\u{2839}', '\u{2838}', '\u{283c}', '\u{2834}', '\u{2826}', '\u{2827}',
    '\u{2807}', '\u{280f}',
];

/// Input mode for the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// Search text input mode.
    Search,
}

/// Action requested by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserAction {
    /// Open the selected movie's page in the browser.
    OpenSelected,
    /// Leave the browser.
    Quit,
}

/// Presentation state for the movie browser.
///
/// Fetch results live in the orchestrator; this only tracks what the user
/// is doing with them.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserState {
    /// Current input mode.
    pub input_mode: InputMode,
    /// Cursor position in the movie list.
    pub cursor: usize,
    /// Most searched terms with their counts, highest first.
    pub top_searches: Vec<(String, u64)>,
    /// Current spinner frame.
    spinner_frame: usize,
}

impl BrowserState {
    /// Creates a new state in normal mode.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            input_mode: InputMode::Normal,
            cursor: 0,
            top_searches: Vec::new(),
            spinner_frame: 0,
        }
    }

    /// Moves the cursor up.
    #[allow(clippy::arithmetic_side_effects)]
    pub const fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Moves the cursor down within a list of `len` movies.
    #[allow(clippy::arithmetic_side_effects)]
    pub const fn move_down(&mut self, len: usize) {
        if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    /// Keeps the cursor inside a list of `len` movies.
    pub fn clamp_cursor(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Advances the spinner by one frame.
    #[allow(clippy::arithmetic_side_effects)]
    pub const fn tick_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
    }

    /// Returns the current spinner frame.
    #[must_use]
    pub fn spinner(&self) -> char {
        SPINNER_FRAMES.get(self.spinner_frame).copied().unwrap_or('*')
    }
}

impl Default for BrowserState {
    fn default() -> Self {
        Self::new()
    }
}
