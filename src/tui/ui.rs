//! # Renderer
//!
//! Pure function of [`State`] to a ratatui frame. Dispatches on the
//! active view: the Logs list or the Expanded detail of the selected
//! record. Every draw is a full repaint — ratatui clears the frame
//! buffer each time — so a view or mode switch can never leave stale
//! cells behind, and rendering the same state twice produces the same
//! buffer both times.
//!
//! Layout, top to bottom: one status line, the log viewport, one
//! command line.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::state::{InputMode, State, View};
use crate::logs::{LogLine, LogRecord, Severity};

const TIMESTAMP_WIDTH: usize = 12; // HH:MM:SS.mmm
const VERSION_WIDTH: usize = 11;
const MODULE_WIDTH: usize = 7;
const STATUS_WIDTH: usize = 3;
const METHOD_WIDTH: usize = 4;

/// Message bodies longer than this are elided to first-3/"..."/last-3.
const MAX_DETAIL_LINES: usize = 7;

pub fn draw_ui(frame: &mut Frame, state: &State) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(1)]);
    let [status_area, main_area, command_area] = layout.areas(frame.area());

    draw_status_line(frame, status_area, state);
    match state.view {
        View::Logs => draw_logs_view(frame, main_area, state),
        View::Expanded => draw_expanded_view(frame, main_area, state),
    }
    draw_command_line(frame, command_area, state);
}

// ============================================================================
// Chrome: status line and command line
// ============================================================================

fn draw_status_line(frame: &mut Frame, area: Rect, state: &State) {
    let text = if state.status.is_empty() {
        format!(
            "timber | {} entries | level={} resource={}",
            state.logs.len(),
            state.filter.min_level,
            state.filter.resource.as_deref().unwrap_or("*"),
        )
    } else {
        format!("timber | {}", state.status)
    };
    frame.render_widget(Span::raw(text), area);
}

fn draw_command_line(frame: &mut Frame, area: Rect, state: &State) {
    let text = match state.input_mode {
        InputMode::Command => {
            format!(":{}", state.command_buffer.as_deref().unwrap_or(""))
        }
        InputMode::Normal => String::new(),
    };
    frame.render_widget(Span::raw(text), area);
}

// ============================================================================
// Logs view
// ============================================================================

fn draw_logs_view(frame: &mut Frame, area: Rect, state: &State) {
    let lines: Vec<Line> = state
        .logs
        .iter()
        .take(area.height as usize)
        .enumerate()
        .map(|(row, record)| summary_line(record, row == state.cursor.y as usize, area.width))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

/// One formatted log row: marker, severity glyph, timestamp, version,
/// module, colored status, method, resource.
fn summary_line(record: &LogRecord, selected: bool, width: u16) -> Line<'_> {
    let mut spans = vec![cursor_marker(selected), severity_glyph(record.severity)];
    spans.push(Span::raw(format!(
        " {} {} {} ",
        pad(&timestamp_text(record), TIMESTAMP_WIDTH),
        pad(&record.version, VERSION_WIDTH),
        pad(module_text(record), MODULE_WIDTH),
    )));
    spans.push(status_span(&record.status));
    spans.push(Span::raw(format!(" {} ", pad(&record.method, METHOD_WIDTH))));

    let consumed: usize = spans.iter().map(|s| s.content.width()).sum();
    let remaining = (width as usize).saturating_sub(consumed + 2);
    spans.push(Span::raw(pad(&record.resource, remaining)));
    if selected {
        spans.push(Span::styled(" ◀", Style::default().fg(Color::Cyan)));
    }
    Line::from(spans)
}

fn cursor_marker(selected: bool) -> Span<'static> {
    if selected {
        Span::styled("▶ ", Style::default().fg(Color::Cyan))
    } else {
        Span::raw("  ")
    }
}

fn severity_glyph(severity: Severity) -> Span<'static> {
    let (glyph, style) = match severity {
        Severity::Debug => (" λ ", Style::default().fg(Color::White).bg(Color::Black)),
        Severity::Info => (" i ", Style::default().fg(Color::White).bg(Color::Blue)),
        Severity::Warning => (" ! ", Style::default().fg(Color::Black).bg(Color::Yellow)),
        Severity::Error => (" → ", Style::default().fg(Color::White).bg(Color::Red)),
        Severity::Critical => (" ▶ ", Style::default().fg(Color::White).bg(Color::Magenta)),
    };
    Span::styled(glyph, style)
}

/// HTTP status class coloring: 2xx blue, 4xx yellow, 5xx red.
fn status_span(status: &str) -> Span<'_> {
    let padded = pad(status, STATUS_WIDTH);
    let style = match status.chars().next() {
        Some('2') => Style::default().fg(Color::Blue),
        Some('4') => Style::default().fg(Color::Yellow),
        Some('5') => Style::default().fg(Color::Red),
        _ => Style::default(),
    };
    Span::styled(padded, style)
}

fn timestamp_text(record: &LogRecord) -> String {
    match record.timestamp {
        Some(ts) => ts.format("%H:%M:%S%.3f").to_string(),
        None => " ".repeat(TIMESTAMP_WIDTH),
    }
}

fn module_text(record: &LogRecord) -> &str {
    if record.module.is_empty() {
        "default"
    } else {
        &record.module
    }
}

/// Truncate or pad `text` to exactly `width` display columns.
fn pad(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

// ============================================================================
// Expanded view
// ============================================================================

fn draw_expanded_view(frame: &mut Frame, area: Rect, state: &State) {
    let Some(record) = state.selected() else {
        frame.render_widget(Span::raw("no log selected"), area);
        return;
    };

    let mut lines = vec![summary_line(record, false, area.width)];
    for entry in elide(&record.lines) {
        lines.push(match entry {
            Some(line) => detail_line(line),
            None => Line::from(Span::raw("    ...")),
        });
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn detail_line(line: &LogLine) -> Line<'_> {
    let timestamp = match line.timestamp {
        Some(ts) => ts.format("%H:%M:%S%.3f").to_string(),
        None => " ".repeat(TIMESTAMP_WIDTH),
    };
    Line::from(vec![
        Span::raw("  "),
        severity_glyph(line.severity),
        Span::raw(format!(" {} {}", timestamp, line.message)),
    ])
}

/// Long bodies collapse to the first three and last three lines with an
/// ellipsis row (`None`) in between.
fn elide(lines: &[LogLine]) -> Vec<Option<&LogLine>> {
    if lines.len() <= MAX_DETAIL_LINES {
        return lines.iter().map(Some).collect();
    }
    let mut out: Vec<Option<&LogLine>> = lines[..3].iter().map(Some).collect();
    out.push(None);
    out.extend(lines[lines.len() - 3..].iter().map(Some));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::core::state::TermSize;
    use crate::logs::FetchFilter;
    use crate::test_support::{record_with_lines, sample_records};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw_to_backend(state: &State) -> ratatui::buffer::Buffer {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_ui(f, state)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn populated_state(n: usize) -> State {
        let mut state = State::new(FetchFilter::default());
        update(&mut state, Action::SetTerm(TermSize { width: 80, height: 24 }));
        update(&mut state, Action::StoreLogs(sample_records(n)));
        state
    }

    #[test]
    fn test_pad_truncates_and_pads() {
        assert_eq!(pad("abcdef", 4), "abcd");
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("", 3), "   ");
    }

    #[test]
    fn test_status_span_classes() {
        assert_eq!(status_span("200").style.fg, Some(Color::Blue));
        assert_eq!(status_span("404").style.fg, Some(Color::Yellow));
        assert_eq!(status_span("503").style.fg, Some(Color::Red));
        assert_eq!(status_span("302").style.fg, None);
        assert_eq!(status_span("---").style.fg, None);
    }

    #[test]
    fn test_severity_glyphs_are_distinct() {
        let glyphs: Vec<String> = [
            Severity::Debug,
            Severity::Info,
            Severity::Warning,
            Severity::Error,
            Severity::Critical,
        ]
        .iter()
        .map(|s| severity_glyph(*s).content.to_string())
        .collect();
        for (i, a) in glyphs.iter().enumerate() {
            for b in &glyphs[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_elide_short_body_untouched() {
        let record = record_with_lines(7);
        let elided = elide(&record.lines);
        assert_eq!(elided.len(), 7);
        assert!(elided.iter().all(Option::is_some));
    }

    #[test]
    fn test_elide_long_body_keeps_ends() {
        let record = record_with_lines(20);
        let elided = elide(&record.lines);
        assert_eq!(elided.len(), 7);
        assert!(elided[3].is_none());
        assert_eq!(elided[0].unwrap().message, record.lines[0].message);
        assert_eq!(elided[6].unwrap().message, record.lines[19].message);
    }

    #[test]
    fn test_rendering_is_pure() {
        // Same state, two draws, byte-identical buffers.
        let state = populated_state(5);
        assert_eq!(draw_to_backend(&state), draw_to_backend(&state));

        let mut expanded = populated_state(5);
        update(&mut expanded, Action::SetView(View::Expanded));
        assert_eq!(draw_to_backend(&expanded), draw_to_backend(&expanded));
    }

    #[test]
    fn test_logs_view_marks_cursor_row() {
        // The trailing marker is unique to the cursor row (the leading
        // glyph also appears in the CRITICAL severity indicator).
        let mut state = populated_state(5);
        let rendered = format!("{:?}", draw_to_backend(&state));
        assert_eq!(rendered.matches('◀').count(), 1);

        update(&mut state, Action::MoveCursor { dx: 0, dy: 2 });
        let moved = format!("{:?}", draw_to_backend(&state));
        assert_ne!(rendered, moved);
        assert_eq!(moved.matches('◀').count(), 1);
    }

    #[test]
    fn test_command_line_renders_buffer() {
        let mut state = populated_state(2);
        update(&mut state, Action::CommandAppend(String::new()));
        update(&mut state, Action::SetInputMode(InputMode::Command));
        update(&mut state, Action::CommandAppend("set lev".to_string()));
        let rendered = format!("{:?}", draw_to_backend(&state));
        assert!(rendered.contains(":set lev"));
    }

    #[test]
    fn test_expanded_view_end_to_end() {
        // SetTerm, StoreLogs, SetView(Expanded) with cursor at row 0:
        // the summary of record 0 plus all of its message lines.
        let mut state = State::new(FetchFilter::default());
        update(&mut state, Action::SetTerm(TermSize { width: 80, height: 24 }));
        let mut records = sample_records(5);
        records[0] = record_with_lines(4);
        let expected_resource = records[0].resource.clone();
        update(&mut state, Action::StoreLogs(records));
        update(&mut state, Action::SetView(View::Expanded));

        let rendered = format!("{:?}", draw_to_backend(&state));
        assert!(rendered.contains(&expected_resource[..expected_resource.len().min(20)]));
        for line in &state.logs[0].lines {
            assert!(rendered.contains(&line.message), "missing {}", line.message);
        }
    }

    #[test]
    fn test_expanded_view_elides_long_bodies() {
        let mut state = State::new(FetchFilter::default());
        update(&mut state, Action::SetTerm(TermSize { width: 80, height: 24 }));
        update(&mut state, Action::StoreLogs(vec![record_with_lines(12)]));
        update(&mut state, Action::SetView(View::Expanded));

        let rendered = format!("{:?}", draw_to_backend(&state));
        assert!(rendered.contains("line 0"));
        assert!(rendered.contains("line 11"));
        assert!(rendered.contains("..."));
        assert!(!rendered.contains("line 5"));
    }

    #[test]
    fn test_expanded_view_without_selection() {
        let mut state = State::new(FetchFilter::default());
        update(&mut state, Action::SetView(View::Expanded));
        let rendered = format!("{:?}", draw_to_backend(&state));
        assert!(rendered.contains("no log selected"));
    }

    #[test]
    fn test_status_line_shows_fetch_error() {
        let mut state = populated_state(3);
        update(&mut state, Action::FetchFailed("boom".to_string()));
        let rendered = format!("{:?}", draw_to_backend(&state));
        assert!(rendered.contains("Error: boom"));
        // Logs stay on screen under the error status.
        assert_eq!(state.logs.len(), 3);
    }
}
