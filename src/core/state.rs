//! # Application State
//!
//! The single state tree for the dashboard. This module contains domain
//! state only - no ratatui types. Presentation happens in the `tui`
//! module from a read-only snapshot of this tree.
//!
//! ```text
//! State
//! ├── logs: Vec<LogRecord>           // newest-first fetch results
//! ├── cursor: Cursor                 // bounded to the viewport
//! ├── view: View                     // Logs list vs Expanded detail
//! ├── input_mode: InputMode          // Normal keys vs Command text entry
//! ├── command_buffer: Option<String> // Some(..) iff Command mode
//! ├── status: String                 // transient status-line message
//! ├── shutdown: bool                 // cooperative stop flag
//! ├── filter: FetchFilter            // consumed by the fetch service
//! └── term: TermSize                 // terminal dimensions at apply time
//! ```
//!
//! State changes only happen through `update(state, action)` in
//! action.rs, applied serially by the [`Store`](super::store::Store).
//! The tree is plain comparable data, so reducer runs can be replayed
//! and diffed in tests.

use crate::logs::{FetchFilter, LogRecord};

/// Terminal dimensions, installed by `Action::SetTerm` at startup and on
/// resize. Reducers read bounds from here at apply time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermSize {
    pub width: u16,
    pub height: u16,
}

impl TermSize {
    /// Rows available to log entries: everything except the status line
    /// and the command line. Never zero, so cursor clamping stays sane
    /// on tiny terminals.
    pub fn visible_rows(&self) -> u16 {
        self.height.saturating_sub(2).max(1)
    }
}

impl Default for TermSize {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub x: u16,
    pub y: u16,
}

/// A named rendering mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Logs,
    Expanded,
}

/// Modal input mode: determines how keyboard events are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Key bindings act directly (`j`/`k`, `r`, `q`, ...).
    #[default]
    Normal,
    /// Keystrokes accumulate into the command buffer until Enter.
    Command,
}

#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub logs: Vec<LogRecord>,
    pub cursor: Cursor,
    pub view: View,
    pub input_mode: InputMode,
    pub command_buffer: Option<String>,
    pub status: String,
    pub shutdown: bool,
    pub filter: FetchFilter,
    pub term: TermSize,
}

impl State {
    pub fn new(filter: FetchFilter) -> Self {
        Self {
            logs: Vec::new(),
            cursor: Cursor::default(),
            view: View::default(),
            input_mode: InputMode::default(),
            command_buffer: None,
            status: String::new(),
            shutdown: false,
            filter,
            term: TermSize::default(),
        }
    }

    /// The record under the cursor, if any.
    pub fn selected(&self) -> Option<&LogRecord> {
        self.logs.get(self.cursor.y as usize)
    }

    /// `command_buffer` is present exactly when Command mode is active.
    pub fn command_invariant_holds(&self) -> bool {
        self.command_buffer.is_none() == (self.input_mode == InputMode::Normal)
    }
}
