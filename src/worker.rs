//! Background search on a dedicated thread.
//!
//! The worker owns the engine and a clone of the state for the duration of
//! the search. Both the result and the engine, with its updated depth
//! allowance, come back through the join handle.

use std::panic;
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::game::GameState;
use crate::search::{SearchEngine, SearchOutcome, Termination};

pub struct PendingSearch {
    handle: JoinHandle<(SearchEngine, Option<SearchOutcome>)>,
}

/// Start searching `state` in the background.
///
/// After a real search the worker sleeps for the configured move delay
/// before finishing. A single forced action is returned without delay.
pub fn spawn_search(mut engine: SearchEngine, state: &GameState) -> PendingSearch {
    let state = state.clone();
    let handle = thread::spawn(move || {
        let outcome = engine.choose_move(&state);
        if outcome
            .as_ref()
            .is_some_and(|o| o.termination != Termination::Forced)
        {
            let delay = engine.config().move_delay();
            debug!("holding move for {delay:?}");
            thread::sleep(delay);
        }
        (engine, outcome)
    });
    PendingSearch { handle }
}

impl PendingSearch {
    pub fn is_ready(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the search is done. A panic in the worker is re-raised
    /// on the caller.
    pub fn wait(self) -> (SearchEngine, Option<SearchOutcome>) {
        match self.handle.join() {
            Ok(result) => result,
            Err(payload) => panic::resume_unwind(payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Color;
    use crate::config::EngineConfig;

    #[test]
    fn test_worker_returns_engine_and_move() {
        let state = GameState::new(Color::White);
        let engine = SearchEngine::new(EngineConfig {
            base_cutoff: 3,
            move_delay_ms: 0,
            ..EngineConfig::default()
        });
        let pending = spawn_search(engine, &state);
        let (engine, outcome) = pending.wait();
        let outcome = outcome.unwrap();
        assert!(state.legal_moves().contains(&outcome.best));
        assert_eq!(outcome.termination, Termination::ReachedCutoff);
        assert_eq!(engine.depth_adjustment(), 1);
    }

    #[test]
    fn test_worker_leaves_state_untouched() {
        let state = GameState::new(Color::Black);
        let snapshot = state.clone();
        let engine = SearchEngine::new(EngineConfig {
            base_cutoff: 2,
            move_delay_ms: 0,
            ..EngineConfig::default()
        });
        let (_, outcome) = spawn_search(engine, &state).wait();
        assert!(outcome.is_some());
        assert_eq!(state, snapshot);
    }
}
