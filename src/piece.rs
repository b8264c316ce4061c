//! Pieces, moves, and move/jump generation.
//!
//! A piece only ever steps diagonally forward, but it may capture along all
//! four diagonals. Captures chain: after landing, the piece keeps jumping as
//! long as another enemy can be taken, and every distinct chain becomes its
//! own [`Move`]. Nothing forces the longest chain.
//!
//! Generation never mutates the board. The mover's origin stays occupied
//! while chains are explored, and enemies jumped earlier in the same chain
//! stay on the board but are tracked in a visited list so they are never
//! captured twice.

use std::fmt;

use crate::board::{Board, Color, MoveKind, Point, str_point};
use crate::constants::DIAGONALS;

/// A candidate action. The moving piece is identified by its color and
/// origin inside the state the move was generated from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Move {
    pub color: Color,
    pub origin: Point,
    pub destination: Point,
    /// Enemy pieces taken, in the order they are jumped.
    pub captured: Vec<Point>,
}

impl Move {
    pub fn step(color: Color, origin: Point, destination: Point) -> Self {
        Self {
            color,
            origin,
            destination,
            captured: Vec::new(),
        }
    }

    pub fn kind(&self) -> MoveKind {
        if self.captured.is_empty() {
            MoveKind::Move
        } else {
            MoveKind::Jump
        }
    }

    pub fn is_jump(&self) -> bool {
        !self.captured.is_empty()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.is_jump() { 'x' } else { '-' };
        write!(
            f,
            "{}{}{}",
            str_point(self.origin),
            sep,
            str_point(self.destination)
        )
    }
}

/// One checker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub color: Color,
    pub position: Point,
    pub captured: bool,
    legal_moves: Vec<Move>,
}

impl Piece {
    pub fn new(color: Color, position: Point) -> Self {
        Self {
            color,
            position,
            captured: false,
            legal_moves: Vec::new(),
        }
    }

    /// Moves found by the last call to [`Piece::generate_moves`].
    pub fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    /// Single forward diagonal steps onto empty cells.
    pub fn regular_moves(&self, board: &Board) -> Vec<Move> {
        let (x, y) = self.position;
        let dy = self.color.forward();
        [(x - 1, y + dy), (x + 1, y + dy)]
            .into_iter()
            .filter(|&dest| board.is_vacant(dest))
            .map(|dest| Move::step(self.color, self.position, dest))
            .collect()
    }

    /// Every capture chain available from the piece's current position.
    pub fn jumps(&self, board: &Board) -> Vec<Move> {
        let mut jumped = Vec::new();
        self.jump_chains(board, self.position, &mut jumped)
            .into_iter()
            .map(|(destination, captured)| Move {
                color: self.color,
                origin: self.position,
                destination,
                captured,
            })
            .collect()
    }

    /// Chains starting at `from`, as `(landing, captures)` pairs.
    ///
    /// `jumped` holds the enemies already taken on the current path; it is
    /// restored before returning.
    fn jump_chains(
        &self,
        board: &Board,
        from: Point,
        jumped: &mut Vec<Point>,
    ) -> Vec<(Point, Vec<Point>)> {
        let enemy = self.color.opposite();
        let mut chains = Vec::new();

        for (dx, dy) in DIAGONALS {
            let over = (from.0 + dx, from.1 + dy);
            let landing = (from.0 + 2 * dx, from.1 + 2 * dy);
            if board.occupant(over) != Some(enemy)
                || !board.is_vacant(landing)
                || jumped.contains(&over)
            {
                continue;
            }

            jumped.push(over);
            let continuations = self.jump_chains(board, landing, jumped);
            jumped.pop();

            if continuations.is_empty() {
                chains.push((landing, vec![over]));
            } else {
                for (end, rest) in continuations {
                    let mut captured = Vec::with_capacity(rest.len() + 1);
                    captured.push(over);
                    captured.extend(rest);
                    chains.push((end, captured));
                }
            }
        }

        chains
    }

    /// Recompute this piece's legal moves and classify them.
    ///
    /// Jumps always win over steps. When `jump_required` is set (another piece
    /// of the same side can capture) steps are not offered at all.
    pub fn generate_moves(&mut self, board: &Board, jump_required: bool) -> Option<MoveKind> {
        self.legal_moves.clear();
        if self.captured {
            return None;
        }

        let jumps = self.jumps(board);
        if !jumps.is_empty() {
            self.legal_moves = jumps;
            return Some(MoveKind::Jump);
        }
        if jump_required {
            return None;
        }

        let steps = self.regular_moves(board);
        if steps.is_empty() {
            None
        } else {
            self.legal_moves = steps;
            Some(MoveKind::Move)
        }
    }

    /// Mark the destinations of the current legal moves on the board.
    pub fn highlight(&self, board: &mut Board) {
        board.clear_markers();
        for mv in &self.legal_moves {
            board.set_marker(mv.destination, mv.kind());
        }
    }

    /// [`Piece::generate_moves`] followed by highlighting unless `quiet`.
    pub fn determine_moves(
        &mut self,
        board: &mut Board,
        jump_required: bool,
        quiet: bool,
    ) -> Option<MoveKind> {
        let kind = self.generate_moves(board, jump_required);
        if !quiet {
            self.highlight(board);
        }
        kind
    }
}
