use std::fmt;

use crate::constants::{BOARDSIZE, N, N_I8};
use crate::error::{CheckersError, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opposite(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Row delta of a forward step.
    pub fn forward(self) -> i8 {
        match self {
            Color::Black => -1,
            Color::White => 1,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Color::Black => 'b',
            Color::White => 'w',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "Black"),
            Color::White => write!(f, "White"),
        }
    }
}

impl std::str::FromStr for Color {
    type Err = CheckersError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "b" | "black" => Ok(Color::Black),
            "w" | "white" => Ok(Color::White),
            _ => Err(CheckersError::InvalidColor(s.to_string())),
        }
    }
}

/// `(x, y)`: column then row, row 0 at the top. Signed so that neighbour
/// probes past the edge are representable.
pub type Point = (i8, i8);

/// Kind of action reaching a cell; doubles as the cell highlight.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveKind {
    Move,
    Jump,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub occupant: Option<Color>,
    pub marker: Option<MoveKind>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; BOARDSIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [Cell::default(); BOARDSIZE],
        }
    }

    pub fn in_bounds(x: i8, y: i8) -> bool {
        (0..N_I8).contains(&x) && (0..N_I8).contains(&y)
    }

    fn idx(x: i8, y: i8) -> Option<usize> {
        Self::in_bounds(x, y).then(|| y as usize * N + x as usize)
    }

    /// The cell at `(x, y)`, or `None` off the board.
    pub fn cell(&self, x: i8, y: i8) -> Option<&Cell> {
        Self::idx(x, y).map(|i| &self.cells[i])
    }

    pub fn occupant(&self, pt: Point) -> Option<Color> {
        self.cell(pt.0, pt.1).and_then(|c| c.occupant)
    }

    /// True if `pt` is on the board and nobody stands there.
    pub fn is_vacant(&self, pt: Point) -> bool {
        self.cell(pt.0, pt.1).is_some_and(|c| c.occupant.is_none())
    }

    pub fn set_occupant(&mut self, pt: Point, color: Color) {
        if let Some(i) = Self::idx(pt.0, pt.1) {
            self.cells[i].occupant = Some(color);
        }
    }

    pub fn clear_occupant(&mut self, pt: Point) {
        if let Some(i) = Self::idx(pt.0, pt.1) {
            self.cells[i].occupant = None;
        }
    }

    pub fn set_marker(&mut self, pt: Point, marker: MoveKind) {
        if let Some(i) = Self::idx(pt.0, pt.1) {
            self.cells[i].marker = Some(marker);
        }
    }

    pub fn clear_markers(&mut self) {
        for cell in &mut self.cells {
            cell.marker = None;
        }
    }

    /// Number of occupied cells, optionally restricted to one color.
    pub fn count(&self, color: Option<Color>) -> usize {
        self.cells
            .iter()
            .filter(|c| match color {
                Some(col) => c.occupant == Some(col),
                None => c.occupant.is_some(),
            })
            .count()
    }

    /// All on-board points, row by row.
    pub fn points() -> impl Iterator<Item = Point> {
        (0..N_I8).flat_map(|y| (0..N_I8).map(move |x| (x, y)))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..N_I8 {
            write!(f, "{} ", N_I8 - y)?;
            for x in 0..N_I8 {
                let cell = &self.cells[y as usize * N + x as usize];
                let c = match (cell.occupant, cell.marker) {
                    (Some(color), _) => color.symbol(),
                    (None, Some(MoveKind::Move)) => '*',
                    (None, Some(MoveKind::Jump)) => 'x',
                    (None, None) => '.',
                };
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        write!(f, "  ")?;
        for x in 0..N_I8 {
            write!(f, " {}", (b'a' + x as u8) as char)?;
        }
        writeln!(f)
    }
}

/// Parse an `a1`-style coordinate: file a-f is the column, rank 1 is the
/// bottom row.
pub fn parse_point(s: &str) -> Result<Point> {
    let s = s.trim().to_ascii_lowercase();
    let bad = || CheckersError::InvalidCoordinate(s.clone());
    let mut chars = s.chars();
    let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
        return Err(bad());
    };
    let x = (file as i32) - ('a' as i32);
    let y = N as i32 - rank.to_digit(10).ok_or_else(bad)? as i32;
    if !(0..N as i32).contains(&x) || !(0..N as i32).contains(&y) {
        return Err(bad());
    }
    Ok((x as i8, y as i8))
}

/// Format a point in `a1` notation.
pub fn str_point(pt: Point) -> String {
    format!("{}{}", (b'a' + pt.0 as u8) as char, N_I8 - pt.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_off_board_cells_are_none() {
        let board = Board::new();
        assert!(board.cell(-1, 0).is_none());
        assert!(board.cell(0, -1).is_none());
        assert!(board.cell(6, 2).is_none());
        assert!(board.cell(2, 6).is_none());
        assert!(board.cell(5, 5).is_some());
    }

    #[test]
    fn test_occupy_and_clear() {
        let mut board = Board::new();
        board.set_occupant((2, 3), Color::White);
        assert_eq!(board.occupant((2, 3)), Some(Color::White));
        assert!(!board.is_vacant((2, 3)));
        board.clear_occupant((2, 3));
        assert!(board.is_vacant((2, 3)));
        // Off-board writes are ignored.
        board.set_occupant((9, 9), Color::Black);
        assert_eq!(board.count(None), 0);
    }

    #[test]
    fn test_clear_markers() {
        let mut board = Board::new();
        board.set_marker((1, 1), MoveKind::Move);
        board.set_marker((3, 3), MoveKind::Jump);
        board.clear_markers();
        assert!(Board::points().all(|(x, y)| board.cell(x, y).unwrap().marker.is_none()));
    }

    #[test]
    fn test_clone_does_not_alias() {
        let mut board = Board::new();
        board.set_occupant((0, 1), Color::White);
        let mut copy = board.clone();
        copy.clear_occupant((0, 1));
        copy.set_marker((2, 2), MoveKind::Jump);
        assert_eq!(board.occupant((0, 1)), Some(Color::White));
        assert!(board.cell(2, 2).unwrap().marker.is_none());
    }

    #[test]
    fn test_parse_and_format_points() {
        assert_eq!(parse_point("a1").unwrap(), (0, 5));
        assert_eq!(parse_point("F6").unwrap(), (5, 0));
        assert_eq!(parse_point("c3").unwrap(), (2, 3));
        assert!(parse_point("g1").is_err());
        assert!(parse_point("a7").is_err());
        assert!(parse_point("a").is_err());
        assert!(parse_point("a10").is_err());
        for pt in Board::points() {
            assert_eq!(parse_point(&str_point(pt)).unwrap(), pt);
        }
    }

    #[test]
    fn test_parse_color() {
        assert_eq!("black".parse::<Color>().unwrap(), Color::Black);
        assert_eq!("W".parse::<Color>().unwrap(), Color::White);
        assert!("red".parse::<Color>().is_err());
    }
}
