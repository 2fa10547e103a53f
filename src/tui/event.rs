use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use std::time::Duration;

/// Terminal input events, already reduced to what the dashboard reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuiEvent {
    Char(char),
    Up,
    Down,
    Enter,
    Backspace,
    /// Ctrl+C — shutdown regardless of mode.
    ForceQuit,
    Resize(u16, u16),
}

/// Poll for an event with a bounded timeout. A timeout with no input is
/// a normal `None`, not an error; decode failures are also swallowed to
/// `None` so a garbled escape sequence can't take the loop down.
pub fn poll_event(timeout: Duration) -> Option<TuiEvent> {
    if !event::poll(timeout).ok()? {
        return None;
    }
    match event::read().ok()? {
        Event::Key(key) => match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
            (_, KeyCode::Char(c)) => Some(TuiEvent::Char(c)),
            (_, KeyCode::Up) => Some(TuiEvent::Up),
            (_, KeyCode::Down) => Some(TuiEvent::Down),
            (_, KeyCode::Enter) => Some(TuiEvent::Enter),
            (_, KeyCode::Backspace) | (_, KeyCode::Delete) => Some(TuiEvent::Backspace),
            _ => None,
        },
        Event::Resize(width, height) => Some(TuiEvent::Resize(width, height)),
        _ => None,
    }
}
