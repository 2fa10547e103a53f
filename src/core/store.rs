//! # Store
//!
//! The single owner of [`State`]. Every mutation goes through
//! [`Store::apply`], which runs the reducer and hands back the effect.
//! There is exactly one store per process, owned by the dispatch loop;
//! nothing else holds a mutable reference, so reducer application is
//! non-reentrant and non-concurrent by construction.

use log::debug;

use super::action::{Action, Effect, update};
use super::state::State;

pub struct Store {
    state: State,
}

impl Store {
    pub fn new(state: State) -> Self {
        Self { state }
    }

    /// Read-only snapshot for the renderer and the input machine.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Applies one action through the reducer.
    pub fn apply(&mut self, action: Action) -> Effect {
        debug!("Applying {:?}", action);
        update(&mut self.state, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{InputMode, TermSize, View};
    use crate::logs::{FetchFilter, LogService};
    use crate::test_support::{FailingLogService, StaticLogService, sample_records};

    fn scripted_actions() -> Vec<Action> {
        vec![
            Action::SetTerm(TermSize { width: 100, height: 30 }),
            Action::Loading,
            Action::StoreLogs(sample_records(5)),
            Action::MoveCursor { dx: 0, dy: 3 },
            Action::SetView(View::Expanded),
            Action::SetInputMode(InputMode::Command),
            Action::CommandAppend("set level=ERROR".to_string()),
            Action::CommandRun("set level=ERROR".to_string()),
            Action::CommandClear,
            Action::SetInputMode(InputMode::Normal),
        ]
    }

    #[test]
    fn test_replaying_a_sequence_is_deterministic() {
        let mut first = Store::new(State::new(FetchFilter::default()));
        let mut second = Store::new(State::new(FetchFilter::default()));
        for action in scripted_actions() {
            first.apply(action);
        }
        for action in scripted_actions() {
            second.apply(action);
        }
        assert_eq!(first.state(), second.state());
    }

    #[tokio::test]
    async fn test_fetch_result_replaces_logs_and_clears_status() {
        let service = StaticLogService { records: sample_records(4) };
        let mut store = Store::new(State::new(FetchFilter::default()));
        store.apply(Action::Loading);

        let action = match service.fetch_latest(&store.state().filter).await {
            Ok(records) => Action::StoreLogs(records),
            Err(e) => Action::FetchFailed(e.to_string()),
        };
        store.apply(action);

        assert_eq!(store.state().logs.len(), 4);
        assert!(store.state().status.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_logs_and_sets_status() {
        let mut store = Store::new(State::new(FetchFilter::default()));
        store.apply(Action::StoreLogs(sample_records(2)));

        let action = match FailingLogService.fetch_latest(&store.state().filter).await {
            Ok(records) => Action::StoreLogs(records),
            Err(e) => Action::FetchFailed(e.to_string()),
        };
        store.apply(action);

        assert_eq!(store.state().logs.len(), 2);
        assert_eq!(store.state().status, "Error: network error: connection refused");
    }

    #[test]
    fn test_actions_queued_behind_shutdown_still_apply() {
        // The loop only checks the flag between drains, so anything
        // already enqueued when Shutdown lands is still applied in order.
        let mut store = Store::new(State::new(FetchFilter::default()));
        store.apply(Action::Loading);
        store.apply(Action::Shutdown);
        store.apply(Action::StoreLogs(sample_records(2)));
        assert!(store.state().shutdown);
        assert_eq!(store.state().logs.len(), 2);
        assert!(store.state().status.is_empty());
    }
}
