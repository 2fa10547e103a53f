//! # TUI Adapter
//!
//! The ratatui-specific layer. Owns the terminal for the lifetime of the
//! UI, runs the dispatch loop, and translates keyboard events into
//! `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Dispatch model
//!
//! One `mpsc` channel is the action queue. The input machine's actions
//! and background-fetch completions both go through it, so everything
//! that happens is serialized into a single arrival order. Each loop
//! iteration:
//!
//! 1. poll for one key with a bounded timeout and enqueue its actions;
//! 2. drain the queue, applying each action through the [`Store`] and
//!    redrawing after every application;
//! 3. stop once the drained state says `shutdown`.
//!
//! The store is only ever touched from this loop, so no two reducers
//! can run concurrently and a render can never observe a state older
//! than the most recently applied action. A fetch that completes after
//! shutdown sends into a channel nobody drains again; its result is
//! simply dropped.

mod event;
mod input;
pub mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;

use crate::core::action::{Action, Effect};
use crate::core::config::ResolvedConfig;
use crate::core::state::{State, TermSize};
use crate::core::store::Store;
use crate::logs::{FetchFilter, LogService};
use crate::tui::event::{TuiEvent, poll_event};

const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Hides the terminal cursor for the lifetime of the UI. Raw mode and
/// the alternate screen are handled by `ratatui::init`/`restore`; this
/// guard covers the one mode ratatui leaves to us, and restores it on
/// every exit path including panics.
struct CursorGuard;

impl CursorGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), Hide)?;
        Ok(Self)
    }
}

impl Drop for CursorGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), Show);
    }
}

pub fn run(service: Arc<dyn LogService>, config: ResolvedConfig) -> std::io::Result<()> {
    // Terminal acquisition is fatal: without raw mode and the alternate
    // screen there is no dashboard to run.
    let mut terminal = ratatui::try_init()?;
    let _cursor_guard = CursorGuard::new()?;
    info!("Terminal acquired (alternate screen, raw mode, hidden cursor)");

    let mut store = Store::new(State::new(config.filter.clone()));
    let (tx, rx) = mpsc::channel::<Action>();

    // Seed the queue: install the terminal size, then kick off the
    // initial fetch.
    let size = terminal.size()?;
    let _ = tx.send(Action::SetTerm(TermSize {
        width: size.width,
        height: size.height,
    }));
    let _ = tx.send(Action::Loading);
    spawn_fetch(service.clone(), store.state().filter.clone(), tx.clone());

    loop {
        // Bounded poll so the input side never blocks out fetch results.
        if let Some(tui_event) = poll_event(POLL_TIMEOUT) {
            let (actions, effect) = input::translate(store.state(), &tui_event);
            for action in actions {
                let _ = tx.send(action);
            }
            if effect == Effect::Fetch {
                spawn_fetch(service.clone(), store.state().filter.clone(), tx.clone());
            }
            if matches!(tui_event, TuiEvent::Resize(_, _)) {
                debug!("Terminal resized");
            }
        }

        // Drain in arrival order, one action at a time, rendering after
        // each so the screen always reflects the cumulative state.
        while let Ok(action) = rx.try_recv() {
            let effect = store.apply(action);
            terminal.draw(|f| ui::draw_ui(f, store.state()))?;
            if effect == Effect::Fetch {
                spawn_fetch(service.clone(), store.state().filter.clone(), tx.clone());
            }
        }

        // Checked only between drains: actions already queued behind a
        // Shutdown still applied above, in order.
        if store.state().shutdown {
            info!("Shutdown requested, stopping dispatch loop");
            break;
        }
    }

    ratatui::restore();
    Ok(())
}

/// Runs one fetch in the background and feeds its outcome back into the
/// action queue.
fn spawn_fetch(service: Arc<dyn LogService>, filter: FetchFilter, tx: mpsc::Sender<Action>) {
    info!("Spawning log fetch ({:?})", filter);
    tokio::spawn(async move {
        let action = match service.fetch_latest(&filter).await {
            Ok(records) => {
                debug!("Fetch returned {} records", records.len());
                Action::StoreLogs(records)
            }
            Err(e) => {
                warn!("Fetch failed: {e}");
                Action::FetchFailed(e.to_string())
            }
        };
        if tx.send(action).is_err() {
            debug!("Fetch completed after shutdown; result dropped");
        }
    });
}
