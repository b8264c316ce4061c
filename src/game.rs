//! Game state: board, rosters, turn order, forced capture, and win detection.
//!
//! A [`GameState`] owns everything about one game by value. Cloning it gives
//! a fully independent hypothetical position, which is what the search
//! relies on.
//!
//! Turn flow:
//! - a new game gives the first turn to Black;
//! - [`GameState::select_piece`] picks one of the movable pieces and marks
//!   its destinations on the board;
//! - [`GameState::select_tile`] (or [`GameState::play`]) applies a legal
//!   move: captures are resolved, the mover is relocated, and the turn
//!   passes to the other side, whose movable pieces are recomputed;
//! - the winner is re-evaluated at every turn change.
//!
//! Anything that is not a legal action is ignored and reported as `false`.

use std::fmt;

use tracing::info;

use crate::board::{Board, Color, MoveKind, Point};
use crate::constants::{N_I8, PIECES_PER_SIDE};
use crate::piece::{Move, Piece};

/// Where the game currently stands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    NoGame,
    AwaitingSelection(Color),
    PieceSelected { turn: Color, piece: Point },
    Finished(Color),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub black: Vec<Piece>,
    pub white: Vec<Piece>,
    /// Side to move, `None` before the first turn is assigned
    pub turn: Option<Color>,
    pub winner: Option<Color>,
    /// Some piece of the side to move can capture this turn
    pub must_jump: bool,
    /// Number of turn changes so far, the opening assignment included
    pub turns_elapsed: u32,
    pub human: Option<Color>,
    pub engine: Option<Color>,
    /// Positions of the side-to-move pieces that have a legal action
    movable: Vec<Point>,
    /// Piece picked by the last successful selection
    active: Option<Point>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::empty()
    }
}

impl GameState {
    /// A state with no pieces and no game in progress.
    pub fn empty() -> Self {
        Self {
            board: Board::new(),
            black: Vec::new(),
            white: Vec::new(),
            turn: None,
            winner: None,
            must_jump: false,
            turns_elapsed: 0,
            human: None,
            engine: None,
            movable: Vec::new(),
            active: None,
        }
    }

    /// Start a game with the human playing `human`. Each side fills the dark
    /// squares of its two back rows and Black moves first.
    pub fn new(human: Color) -> Self {
        let mut state = Self::empty();
        for i in 0..PIECES_PER_SIDE as i8 {
            let (black, white) = if i < 3 {
                ((i * 2, N_I8 - 1), (i * 2 + 1, 0))
            } else {
                ((i * 2 + 1 - N_I8, N_I8 - 2), (i * 2 - N_I8, 1))
            };
            state.place(Color::Black, black);
            state.place(Color::White, white);
        }
        state.human = Some(human);
        state.engine = Some(human.opposite());
        info!("new game: human plays {human}, engine plays {}", human.opposite());
        state.change_turn(Color::Black);
        state
    }

    /// Build an arbitrary position with `turn` to move. No human or engine
    /// color is assigned.
    pub fn from_layout(black: &[Point], white: &[Point], turn: Color) -> Self {
        let mut state = Self::empty();
        for &pt in black {
            state.place(Color::Black, pt);
        }
        for &pt in white {
            state.place(Color::White, pt);
        }
        state.change_turn(turn);
        state
    }

    fn place(&mut self, color: Color, pt: Point) {
        self.board.set_occupant(pt, color);
        self.roster_mut(color).push(Piece::new(color, pt));
    }

    pub fn pieces(&self, color: Color) -> &[Piece] {
        match color {
            Color::Black => &self.black,
            Color::White => &self.white,
        }
    }

    fn roster_mut(&mut self, color: Color) -> &mut Vec<Piece> {
        match color {
            Color::Black => &mut self.black,
            Color::White => &mut self.white,
        }
    }

    pub fn count(&self, color: Color) -> usize {
        self.pieces(color).iter().filter(|p| !p.captured).count()
    }

    /// The live piece standing on `pt`, of either color.
    pub fn piece_at(&self, pt: Point) -> Option<&Piece> {
        let color = self.board.occupant(pt)?;
        self.pieces(color)
            .iter()
            .find(|p| p.position == pt && !p.captured)
    }

    /// Positions of the pieces allowed to move this turn.
    pub fn movable(&self) -> &[Point] {
        &self.movable
    }

    pub fn movable_pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.movable.iter().filter_map(|&pt| self.piece_at(pt))
    }

    /// Every legal action for the side to move, grouped by piece in roster
    /// order.
    pub fn legal_moves(&self) -> Vec<Move> {
        self.movable_pieces()
            .flat_map(|p| p.legal_moves().iter().cloned())
            .collect()
    }

    /// Destinations (with their kind) reachable by the piece on `pt` this
    /// turn. Empty for pieces that cannot move.
    pub fn legal_destinations(&self, pt: Point) -> Vec<(Point, MoveKind)> {
        if !self.movable.contains(&pt) {
            return Vec::new();
        }
        self.piece_at(pt)
            .map(|p| {
                p.legal_moves()
                    .iter()
                    .map(|m| (m.destination, m.kind()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn active(&self) -> Option<Point> {
        self.active
    }

    pub fn phase(&self) -> Phase {
        if let Some(winner) = self.winner {
            return Phase::Finished(winner);
        }
        match (self.turn, self.active) {
            (None, _) => Phase::NoGame,
            (Some(turn), None) => Phase::AwaitingSelection(turn),
            (Some(turn), Some(piece)) => Phase::PieceSelected { turn, piece },
        }
    }

    /// The engine's color is on move.
    pub fn is_engine_turn(&self) -> bool {
        self.engine.is_some() && self.turn == self.engine
    }

    /// The human's color is on move.
    pub fn is_human_turn(&self) -> bool {
        self.human.is_some() && self.turn == self.human
    }

    fn in_progress(&self) -> bool {
        self.turn.is_some() && self.winner.is_none()
    }

    /// Select the piece on `pt` and highlight its destinations.
    ///
    /// Returns `false`, changing nothing, unless `pt` holds a movable piece
    /// of the side to move.
    pub fn select_piece(&mut self, pt: Point) -> bool {
        if !self.in_progress() || !self.movable.contains(&pt) {
            return false;
        }
        let Some(color) = self.turn else {
            return false;
        };
        let Some(idx) = self
            .pieces(color)
            .iter()
            .position(|p| p.position == pt && !p.captured)
        else {
            return false;
        };

        self.active = Some(pt);
        let must_jump = self.must_jump;
        let piece = match color {
            Color::Black => &mut self.black[idx],
            Color::White => &mut self.white[idx],
        };
        piece.determine_moves(&mut self.board, must_jump, false);
        true
    }

    /// Move the selected piece to `dest` if one of its legal moves ends there.
    /// When several chains land on the same cell the first one generated is
    /// taken.
    pub fn select_tile(&mut self, dest: Point) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        let Some(mv) = self
            .piece_at(active)
            .and_then(|p| p.legal_moves().iter().find(|m| m.destination == dest))
            .cloned()
        else {
            return false;
        };
        self.apply(&mv);
        true
    }

    /// Apply `mv` if it is currently legal; otherwise nothing happens.
    pub fn play(&mut self, mv: &Move) -> bool {
        if !self.in_progress() || self.turn != Some(mv.color) || !self.movable.contains(&mv.origin)
        {
            return false;
        }
        let legal = self
            .piece_at(mv.origin)
            .is_some_and(|p| p.legal_moves().contains(mv));
        if legal {
            self.apply(mv);
        }
        legal
    }

    /// Resolve a move already known to be legal in this state.
    pub(crate) fn apply(&mut self, mv: &Move) {
        let enemy = mv.color.opposite();

        if mv.is_jump() {
            for &pt in &mv.captured {
                self.board.clear_occupant(pt);
                if let Some(victim) = self
                    .roster_mut(enemy)
                    .iter_mut()
                    .find(|p| p.position == pt && !p.captured)
                {
                    victim.captured = true;
                }
            }
            self.remove_captured(enemy);
        }

        if let Some(piece) = self
            .roster_mut(mv.color)
            .iter_mut()
            .find(|p| p.position == mv.origin && !p.captured)
        {
            piece.position = mv.destination;
        }
        self.board.clear_occupant(mv.origin);
        self.board.set_occupant(mv.destination, mv.color);
        self.board.clear_markers();

        self.change_turn(mv.color.opposite());
    }

    /// Drop captured pieces of `color` from the roster and the board.
    fn remove_captured(&mut self, color: Color) {
        let Self {
            board,
            black,
            white,
            ..
        } = &mut *self;
        let roster = match color {
            Color::Black => black,
            Color::White => white,
        };
        roster.retain(|p| {
            if p.captured {
                board.clear_occupant(p.position);
            }
            !p.captured
        });
    }

    /// Hand the turn to `color`: recompute its movable pieces under the
    /// forced-capture rule and check for a winner.
    fn change_turn(&mut self, color: Color) {
        self.turns_elapsed += 1;
        self.turn = Some(color);
        self.active = None;
        self.update_movable(color);
        self.update_winner();
    }

    fn update_movable(&mut self, color: Color) {
        let Self {
            board,
            black,
            white,
            ..
        } = &mut *self;
        let roster = match color {
            Color::Black => black,
            Color::White => white,
        };

        let must_jump = roster
            .iter()
            .any(|p| !p.captured && !p.jumps(board).is_empty());

        let mut movable = Vec::new();
        for piece in roster.iter_mut() {
            if piece.determine_moves(board, must_jump, true).is_some() {
                movable.push(piece.position);
            }
        }

        self.must_jump = must_jump;
        self.movable = movable;
    }

    fn update_winner(&mut self) {
        if self.winner.is_some() {
            return;
        }
        self.winner = if self.count(Color::Black) == 0 {
            Some(Color::White)
        } else if self.count(Color::White) == 0 {
            Some(Color::Black)
        } else if self.movable.is_empty() {
            self.turn.map(Color::opposite)
        } else {
            None
        };
        if let Some(winner) = self.winner {
            info!(turns = self.turns_elapsed, "{winner} wins");
        }
    }

    /// Every occupied cell holds exactly one live piece of the matching color
    /// and every live piece stands on a cell occupied by its color.
    pub fn is_consistent(&self) -> bool {
        let live = |color: Color| self.pieces(color).iter().filter(|p| !p.captured);
        let pieces_on_board = [Color::Black, Color::White].into_iter().all(|color| {
            live(color).all(|p| self.board.occupant(p.position) == Some(color))
        });
        let cells_have_one_piece = Board::points().all(|pt| match self.board.occupant(pt) {
            Some(color) => live(color).filter(|p| p.position == pt).count() == 1,
            None => true,
        });
        let counts_match = [Color::Black, Color::White]
            .into_iter()
            .all(|color| self.board.count(Some(color)) == self.count(color));
        let captured_purged = self.black.iter().chain(&self.white).all(|p| !p.captured);
        pieces_on_board && cells_have_one_piece && counts_match && captured_purged
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)?;
        match self.phase() {
            Phase::NoGame => writeln!(f, "no game"),
            Phase::Finished(winner) => writeln!(f, "{winner} wins"),
            Phase::AwaitingSelection(turn) | Phase::PieceSelected { turn, .. } => {
                writeln!(
                    f,
                    "{turn} to move (turn {}){}",
                    self.turns_elapsed,
                    if self.must_jump { ", must jump" } else { "" }
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_layout() {
        let state = GameState::new(Color::Black);
        assert_eq!(state.count(Color::Black), 6);
        assert_eq!(state.count(Color::White), 6);
        assert_eq!(state.turn, Some(Color::Black));
        assert_eq!(state.engine, Some(Color::White));
        assert_eq!(state.turns_elapsed, 1);
        for pt in [(0, 5), (2, 5), (4, 5), (1, 4), (3, 4), (5, 4)] {
            assert_eq!(state.board.occupant(pt), Some(Color::Black));
        }
        for pt in [(1, 0), (3, 0), (5, 0), (0, 1), (2, 1), (4, 1)] {
            assert_eq!(state.board.occupant(pt), Some(Color::White));
        }
        assert!(state.is_consistent());
    }

    #[test]
    fn test_opening_movable_pieces() {
        let state = GameState::new(Color::White);
        // Only the front row can step; (5,4) has a single destination.
        assert_eq!(state.movable(), &[(1, 4), (3, 4), (5, 4)]);
        assert!(!state.must_jump);
        assert_eq!(state.legal_moves().len(), 5);
    }

    #[test]
    fn test_empty_state_is_no_game() {
        let mut state = GameState::empty();
        assert_eq!(state.phase(), Phase::NoGame);
        assert!(!state.select_piece((0, 5)));
        assert!(!state.select_tile((1, 4)));
    }

    #[test]
    fn test_select_then_move() {
        let mut state = GameState::new(Color::Black);
        assert!(state.select_piece((1, 4)));
        assert_eq!(
            state.phase(),
            Phase::PieceSelected {
                turn: Color::Black,
                piece: (1, 4)
            }
        );
        assert_eq!(state.board.cell(0, 3).unwrap().marker, Some(MoveKind::Move));
        assert_eq!(state.board.cell(2, 3).unwrap().marker, Some(MoveKind::Move));

        assert!(state.select_tile((2, 3)));
        assert_eq!(state.turn, Some(Color::White));
        assert_eq!(state.board.occupant((2, 3)), Some(Color::Black));
        assert!(state.board.is_vacant((1, 4)));
        assert!(state.board.cell(0, 3).unwrap().marker.is_none());
        assert_eq!(state.turns_elapsed, 2);
        assert!(state.is_consistent());
    }

    #[test]
    fn test_illegal_actions_change_nothing() {
        let mut state = GameState::new(Color::Black);
        let before = state.clone();
        // Back-row piece cannot move, white piece is not ours, empty cell.
        assert!(!state.select_piece((0, 5)));
        assert!(!state.select_piece((0, 1)));
        assert!(!state.select_piece((2, 2)));
        // No piece selected yet.
        assert!(!state.select_tile((2, 3)));
        assert_eq!(state, before);

        assert!(state.select_piece((1, 4)));
        let selected = state.clone();
        assert!(!state.select_tile((1, 2)));
        assert_eq!(state, selected);
    }

    #[test]
    fn test_play_rejects_moves_not_on_the_list() {
        let mut state = GameState::new(Color::Black);
        let before = state.clone();
        assert!(!state.play(&Move::step(Color::White, (0, 1), (1, 2))));
        assert!(!state.play(&Move::step(Color::Black, (1, 4), (1, 3))));
        assert!(!state.play(&Move::step(Color::Black, (0, 5), (1, 4))));
        assert_eq!(state, before);
        assert!(state.play(&Move::step(Color::Black, (1, 4), (0, 3))));
    }

    #[test]
    fn test_capture_purges_roster() {
        let mut state = GameState::from_layout(&[(2, 3), (0, 5)], &[(3, 2), (5, 0)], Color::Black);
        assert!(state.must_jump);
        assert_eq!(state.movable(), &[(2, 3)]);
        let mv = state.legal_moves()[0].clone();
        assert!(state.play(&mv));
        assert_eq!(state.count(Color::White), 1);
        assert_eq!(state.white.len(), 1);
        assert!(state.board.is_vacant((3, 2)));
        assert_eq!(state.board.occupant((4, 1)), Some(Color::Black));
        assert!(state.is_consistent());
    }

    #[test]
    fn test_capture_turn_strips_moves_from_non_jumpers() {
        let mut state = GameState::from_layout(&[(2, 3), (0, 5)], &[(3, 2), (5, 0)], Color::Black);
        assert!(state.piece_at((0, 5)).unwrap().legal_moves().is_empty());
        assert!(state.piece_at((2, 3)).unwrap().legal_moves().iter().all(Move::is_jump));

        assert!(state.select_piece((2, 3)));
        assert_eq!(state.board.cell(4, 1).unwrap().marker, Some(MoveKind::Jump));
        // Step destinations of the jumper are not offered either.
        assert!(state.board.cell(1, 2).unwrap().marker.is_none());
        assert!(state.board.cell(3, 2).unwrap().marker.is_none());
    }

    #[test]
    fn test_side_roles() {
        let state = GameState::new(Color::White);
        assert!(state.is_engine_turn());
        assert!(!state.is_human_turn());

        let layout = GameState::from_layout(&[(2, 3)], &[(5, 0)], Color::Black);
        assert!(!layout.is_engine_turn());
        assert!(!layout.is_human_turn());
    }

    #[test]
    fn test_winner_when_side_has_no_pieces() {
        let mut state = GameState::from_layout(&[(2, 3)], &[(3, 2)], Color::Black);
        let mv = state.legal_moves()[0].clone();
        assert!(state.play(&mv));
        assert_eq!(state.winner, Some(Color::Black));
        assert_eq!(state.phase(), Phase::Finished(Color::Black));
        // Nothing is playable once the game is decided.
        assert!(!state.select_piece((4, 1)));
    }

    #[test]
    fn test_clone_is_independent() {
        let original = GameState::new(Color::Black);
        let snapshot = original.clone();
        let mut copy = original.clone();
        let mv = copy.legal_moves()[0].clone();
        assert!(copy.play(&mv));
        assert_ne!(copy, original);
        assert_eq!(original, snapshot);
    }
}
