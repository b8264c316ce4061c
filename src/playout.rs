//! Random playouts.
//!
//! A playout picks uniformly among the legal actions until the game is
//! decided or a turn limit is hit. Used for self-play against the engine and
//! for checking that every reachable state stays consistent.

use fastrand::Rng;
use tracing::info;

use crate::board::Color;
use crate::game::GameState;
use crate::piece::Move;
use crate::search::SearchEngine;

/// Default turn limit for a playout. Pieces only step forward, so games on a
/// 6x6 board finish long before this.
pub const MAX_PLAYOUT_TURNS: u32 = 200;

/// A uniformly random legal action, or `None` if the game is over.
pub fn random_move(state: &GameState, rng: &mut Rng) -> Option<Move> {
    if state.winner.is_some() {
        return None;
    }
    let mut moves = state.legal_moves();
    if moves.is_empty() {
        return None;
    }
    let i = rng.usize(..moves.len());
    Some(moves.swap_remove(i))
}

/// Play random moves on `state` until someone wins or `max_turns` more turns
/// have passed. Returns the winner, if any.
pub fn playout(state: &mut GameState, rng: &mut Rng, max_turns: u32) -> Option<Color> {
    let limit = state.turns_elapsed.saturating_add(max_turns);
    while state.turns_elapsed < limit {
        let Some(mv) = random_move(state, rng) else {
            break;
        };
        state.apply(&mv);
    }
    state.winner
}

/// One game from the opening: the engine plays `engine_color`, a random
/// mover plays the other side. The engine keeps adapting its depth allowance
/// across the moves of the game.
pub fn play_match(engine: &mut SearchEngine, engine_color: Color, rng: &mut Rng) -> Option<Color> {
    let mut state = GameState::new(engine_color.opposite());
    while state.winner.is_none() && state.turns_elapsed < MAX_PLAYOUT_TURNS {
        let mv = if state.turn == Some(engine_color) {
            engine.choose_move(&state).map(|o| o.best)
        } else {
            random_move(&state, rng)
        };
        let Some(mv) = mv else {
            break;
        };
        state.apply(&mv);
    }
    info!(
        turns = state.turns_elapsed,
        depth_adjustment = engine.depth_adjustment(),
        "match over, winner: {:?}",
        state.winner
    );
    state.winner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_move_is_legal() {
        let state = GameState::new(Color::Black);
        let mut rng = Rng::with_seed(7);
        for _ in 0..20 {
            let mv = random_move(&state, &mut rng).unwrap();
            assert!(state.legal_moves().contains(&mv));
        }
    }

    #[test]
    fn test_playout_reaches_a_winner() {
        let mut rng = Rng::with_seed(42);
        for _ in 0..20 {
            let mut state = GameState::new(Color::Black);
            let winner = playout(&mut state, &mut rng, MAX_PLAYOUT_TURNS);
            assert!(winner.is_some());
            assert!(state.is_consistent());
            assert!(random_move(&state, &mut rng).is_none());
        }
    }

    #[test]
    fn test_playout_respects_turn_limit() {
        let mut rng = Rng::with_seed(1);
        let mut state = GameState::new(Color::Black);
        playout(&mut state, &mut rng, 3);
        assert!(state.turns_elapsed <= 4);
    }
}
