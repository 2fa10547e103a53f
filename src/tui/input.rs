//! # Input State Machine
//!
//! Translates terminal events into actions according to the current
//! input mode. This is a pure function of `(state, event)`: it never
//! mutates anything, it just names what should happen. The dispatch
//! loop sends the returned actions through the single queue and
//! executes the returned effect (only `r` asks for a fetch here; the
//! command grammar's fetches come out of the reducer).

use crate::core::action::{Action, Effect};
use crate::core::state::{InputMode, State, TermSize, View};

use super::event::TuiEvent;

/// Translate one event under the current state. Returns the actions to
/// enqueue, in order, plus any effect the input layer itself requests.
pub fn translate(state: &State, event: &TuiEvent) -> (Vec<Action>, Effect) {
    // Mode-independent events first.
    match event {
        TuiEvent::ForceQuit => return (vec![Action::Shutdown], Effect::None),
        TuiEvent::Resize(width, height) => {
            let term = TermSize {
                width: *width,
                height: *height,
            };
            return (vec![Action::SetTerm(term)], Effect::None);
        }
        _ => {}
    }

    match state.input_mode {
        InputMode::Normal => translate_normal(state, event),
        InputMode::Command => translate_command(state, event),
    }
}

fn translate_normal(state: &State, event: &TuiEvent) -> (Vec<Action>, Effect) {
    let actions = match event {
        TuiEvent::Char(':') => vec![
            Action::CommandAppend(String::new()),
            Action::SetInputMode(InputMode::Command),
        ],
        TuiEvent::Char('r') => return (vec![Action::Loading], Effect::Fetch),
        TuiEvent::Char('j') | TuiEvent::Down => vec![Action::MoveCursor { dx: 0, dy: 1 }],
        TuiEvent::Char('k') | TuiEvent::Up => vec![Action::MoveCursor { dx: 0, dy: -1 }],
        TuiEvent::Char('J') => vec![Action::MoveCursor { dx: 0, dy: 10 }],
        TuiEvent::Char('K') => vec![Action::MoveCursor { dx: 0, dy: -10 }],
        TuiEvent::Char('g') => vec![Action::MoveCursor {
            dx: 0,
            dy: -i32::from(state.cursor.y),
        }],
        TuiEvent::Char('G') => vec![Action::MoveCursor {
            dx: 0,
            dy: i32::from(state.term.visible_rows()),
        }],
        TuiEvent::Char('>') => vec![Action::SetView(View::Expanded)],
        TuiEvent::Char('<') => vec![Action::SetView(View::Logs)],
        // `q` quits from the log list, otherwise backs out to it.
        TuiEvent::Char('q') => match state.view {
            View::Logs => vec![Action::Shutdown],
            View::Expanded => vec![Action::SetView(View::Logs)],
        },
        _ => Vec::new(),
    };
    (actions, Effect::None)
}

fn translate_command(state: &State, event: &TuiEvent) -> (Vec<Action>, Effect) {
    let actions = match event {
        TuiEvent::Enter => {
            // Run, then clear, then leave Command mode — in that order,
            // so the reducer sees the buffer text before it is dropped.
            vec![
                Action::CommandRun(state.command_buffer.clone().unwrap_or_default()),
                Action::CommandClear,
                Action::SetInputMode(InputMode::Normal),
            ]
        }
        TuiEvent::Backspace => vec![Action::CommandBackspace],
        TuiEvent::Char(c) if !c.is_control() => vec![Action::CommandAppend(c.to_string())],
        _ => Vec::new(),
    };
    (actions, Effect::None)
}
