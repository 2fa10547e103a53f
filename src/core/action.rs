//! # Actions
//!
//! Everything that can happen in the dashboard becomes an `Action`.
//! Operator presses `j`? That's `Action::MoveCursor`. A fetch lands?
//! That's `Action::StoreLogs(records)`.
//!
//! The `update()` function takes the current state and an action, then
//! mutates the state and returns an [`Effect`] describing any follow-up
//! work. No I/O here - the dispatch loop executes effects.
//!
//! ```text
//! State + Action  →  update()  →  State' + Effect
//! ```
//!
//! The enum is closed and the match exhaustive, so "unknown action" is
//! a compile error rather than a runtime crash. This also makes
//! everything testable: apply a sequence, compare the resulting state.

use super::command::{self, Command};
use super::state::{InputMode, State, TermSize, View};
use crate::logs::{LevelFilter, LogRecord};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Begin cooperative shutdown. The loop drains what is already
    /// queued, then stops.
    Shutdown,
    /// A fetch completed; replace the log list and clear the status.
    StoreLogs(Vec<LogRecord>),
    /// A fetch failed after its retry budget; keep the old logs.
    FetchFailed(String),
    /// Install terminal dimensions (startup and resize).
    SetTerm(TermSize),
    /// Move the cursor by a delta, clamped to the viewport.
    MoveCursor { dx: i32, dy: i32 },
    SetView(View),
    /// A fetch is in flight.
    Loading,
    /// Set the minimum severity consumed by the next fetch.
    SetLogLevel(LevelFilter),
    SetInputMode(InputMode),
    /// Append text to the command buffer (missing buffer reads as empty).
    CommandAppend(String),
    /// Drop the last character of the command buffer; no-op when empty.
    CommandBackspace,
    /// Discard the command buffer entirely.
    CommandClear,
    /// Execute command-line text against the command grammar.
    CommandRun(String),
}

/// Follow-up work a reducer asks the dispatch loop to perform.
/// Reducers stay pure; effect execution lives in the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Spawn a log fetch with the state's current filter.
    Fetch,
}

/// Clamp `value` into `[0, bound - 1]`, treating a zero bound as one.
fn clamp_to(value: i64, bound: u16) -> u16 {
    let max = i64::from(bound.max(1)) - 1;
    value.clamp(0, max) as u16
}

/// The reducer. Applies `action` to `state` and reports any effect.
pub fn update(state: &mut State, action: Action) -> Effect {
    match action {
        Action::Shutdown => {
            state.shutdown = true;
        }
        Action::StoreLogs(logs) => {
            state.logs = logs;
            state.status.clear();
        }
        Action::FetchFailed(message) => {
            state.status = format!("Error: {message}");
        }
        Action::SetTerm(term) => {
            state.term = term;
        }
        Action::MoveCursor { dx, dy } => {
            // Bounds come from the terminal size at apply time, not from
            // whenever the action was constructed.
            let term = state.term;
            state.cursor.x = clamp_to(i64::from(state.cursor.x) + i64::from(dx), term.width);
            state.cursor.y =
                clamp_to(i64::from(state.cursor.y) + i64::from(dy), term.visible_rows());
        }
        Action::SetView(view) => {
            state.view = view;
        }
        Action::Loading => {
            state.status = "Loading...".to_string();
        }
        Action::SetLogLevel(level) => {
            state.filter.min_level = level;
        }
        Action::SetInputMode(mode) => {
            state.input_mode = mode;
            // Keep the buffer/mode invariant true at every mode boundary.
            match mode {
                InputMode::Normal => state.command_buffer = None,
                InputMode::Command => {
                    state.command_buffer.get_or_insert_with(String::new);
                }
            }
        }
        Action::CommandAppend(text) => {
            state.command_buffer.get_or_insert_with(String::new).push_str(&text);
        }
        Action::CommandBackspace => {
            if let Some(buffer) = state.command_buffer.as_mut() {
                buffer.pop();
            }
        }
        Action::CommandClear => {
            state.command_buffer = None;
        }
        Action::CommandRun(text) => {
            return match command::parse(&text) {
                Some(Command::SetLevel(level)) => {
                    state.filter.min_level = level;
                    state.status = format!("level={level}");
                    Effect::Fetch
                }
                Some(Command::SetResource(resource)) => {
                    state.status = format!("resource={resource}");
                    state.filter.resource = Some(resource);
                    Effect::Fetch
                }
                Some(Command::UnsetLevel) => {
                    state.filter.min_level = LevelFilter::All;
                    state.status = "level=ALL".to_string();
                    Effect::Fetch
                }
                Some(Command::UnsetResource) => {
                    state.filter.resource = None;
                    state.status = "resource cleared".to_string();
                    Effect::Fetch
                }
                None => {
                    if !text.trim().is_empty() {
                        state.status = format!("unknown command: {}", text.trim());
                    }
                    Effect::None
                }
            };
        }
    }
    Effect::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::{FetchFilter, Severity};
    use crate::test_support::sample_records;

    fn test_state() -> State {
        State::new(FetchFilter::default())
    }

    #[test]
    fn test_shutdown_only_sets_flag() {
        let mut state = test_state();
        let before = state.clone();
        let effect = update(&mut state, Action::Shutdown);
        assert_eq!(effect, Effect::None);
        assert!(state.shutdown);
        let mut expected = before;
        expected.shutdown = true;
        assert_eq!(state, expected);
    }

    #[test]
    fn test_store_logs_replaces_and_clears_status() {
        let mut state = test_state();
        state.status = "Loading...".to_string();
        update(&mut state, Action::StoreLogs(sample_records(2)));
        assert_eq!(state.logs.len(), 2);
        assert!(state.status.is_empty());
    }

    #[test]
    fn test_fetch_failed_keeps_logs() {
        let mut state = test_state();
        state.logs = sample_records(3);
        update(&mut state, Action::FetchFailed("boom".to_string()));
        assert_eq!(state.logs.len(), 3);
        assert_eq!(state.status, "Error: boom");
    }

    #[test]
    fn test_move_cursor_clamps_low_and_high() {
        let mut state = test_state();
        state.term = TermSize { width: 80, height: 24 };

        update(&mut state, Action::MoveCursor { dx: 0, dy: -5 });
        assert_eq!(state.cursor.y, 0);

        update(&mut state, Action::MoveCursor { dx: 0, dy: 1000 });
        assert_eq!(state.cursor.y, state.term.visible_rows() - 1);

        update(&mut state, Action::MoveCursor { dx: -3, dy: 0 });
        assert_eq!(state.cursor.x, 0);

        update(&mut state, Action::MoveCursor { dx: 500, dy: 0 });
        assert_eq!(state.cursor.x, 79);
    }

    #[test]
    fn test_repeated_moves_equal_one_clamped_move() {
        // N small steps land exactly where one big clamped step does.
        let mut stepped = test_state();
        let mut jumped = test_state();
        for _ in 0..50 {
            update(&mut stepped, Action::MoveCursor { dx: 0, dy: 3 });
        }
        update(&mut jumped, Action::MoveCursor { dx: 0, dy: 150 });
        assert_eq!(stepped.cursor, jumped.cursor);

        for _ in 0..50 {
            update(&mut stepped, Action::MoveCursor { dx: 0, dy: -7 });
        }
        update(&mut jumped, Action::MoveCursor { dx: 0, dy: -350 });
        assert_eq!(stepped.cursor, jumped.cursor);
    }

    #[test]
    fn test_move_cursor_uses_size_at_apply_time() {
        let mut state = test_state();
        update(&mut state, Action::MoveCursor { dx: 0, dy: 100 });
        let tall_bound = state.cursor.y;

        update(&mut state, Action::SetTerm(TermSize { width: 80, height: 10 }));
        update(&mut state, Action::MoveCursor { dx: 0, dy: 100 });
        assert!(state.cursor.y < tall_bound);
        assert_eq!(state.cursor.y, state.term.visible_rows() - 1);
    }

    #[test]
    fn test_input_mode_maintains_buffer_invariant() {
        let mut state = test_state();
        update(&mut state, Action::SetInputMode(InputMode::Command));
        assert_eq!(state.command_buffer.as_deref(), Some(""));
        assert!(state.command_invariant_holds());

        update(&mut state, Action::CommandAppend("set".to_string()));
        update(&mut state, Action::SetInputMode(InputMode::Normal));
        assert!(state.command_buffer.is_none());
        assert!(state.command_invariant_holds());
    }

    #[test]
    fn test_command_editing_scenario() {
        // CommandAppend(""), enter Command mode, type a/b/c, backspace.
        let mut state = test_state();
        update(&mut state, Action::CommandAppend(String::new()));
        update(&mut state, Action::SetInputMode(InputMode::Command));
        for ch in ["a", "b", "c"] {
            update(&mut state, Action::CommandAppend(ch.to_string()));
        }
        update(&mut state, Action::CommandBackspace);
        assert_eq!(state.command_buffer.as_deref(), Some("ab"));
    }

    #[test]
    fn test_backspace_on_empty_buffer_is_noop() {
        let mut state = test_state();
        update(&mut state, Action::SetInputMode(InputMode::Command));
        update(&mut state, Action::CommandBackspace);
        assert_eq!(state.command_buffer.as_deref(), Some(""));

        let mut normal = test_state();
        update(&mut normal, Action::CommandBackspace);
        assert!(normal.command_buffer.is_none());
    }

    #[test]
    fn test_command_run_set_level() {
        let mut state = test_state();
        assert_eq!(state.filter.min_level, LevelFilter::All);
        let effect = update(&mut state, Action::CommandRun("set level=ERROR".to_string()));
        assert_eq!(effect, Effect::Fetch);
        assert_eq!(state.filter.min_level, LevelFilter::AtLeast(Severity::Error));
    }

    #[test]
    fn test_command_run_resource_round_trip() {
        let mut state = test_state();
        let effect = update(
            &mut state,
            Action::CommandRun("set resource=/api/".to_string()),
        );
        assert_eq!(effect, Effect::Fetch);
        assert_eq!(state.filter.resource.as_deref(), Some("/api/"));

        let effect = update(&mut state, Action::CommandRun("unset resource".to_string()));
        assert_eq!(effect, Effect::Fetch);
        assert!(state.filter.resource.is_none());
    }

    #[test]
    fn test_command_run_unknown_leaves_filter_unchanged() {
        let mut state = test_state();
        let before_filter = state.filter.clone();
        let effect = update(&mut state, Action::CommandRun("not a command".to_string()));
        assert_eq!(effect, Effect::None);
        assert_eq!(state.filter, before_filter);
        assert_eq!(state.status, "unknown command: not a command");
    }

    #[test]
    fn test_set_log_level_has_no_effect_side() {
        let mut state = test_state();
        let effect = update(
            &mut state,
            Action::SetLogLevel(LevelFilter::AtLeast(Severity::Warning)),
        );
        assert_eq!(effect, Effect::None);
        assert_eq!(
            state.filter.min_level,
            LevelFilter::AtLeast(Severity::Warning)
        );
    }
}
