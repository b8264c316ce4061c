//! Constants for board geometry, starting layout, and search parameters.
//!
//! The board is a fixed 6x6 grid addressed as `(x, y)` where `x` is the
//! column (0 = left) and `y` is the row (0 = top). White starts on rows 0-1
//! and advances toward larger `y`; Black starts on rows 4-5 and advances
//! toward smaller `y`.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN).
pub const N: usize = 6;

/// Board size as a signed coordinate bound, for neighbour probing.
pub const N_I8: i8 = N as i8;

/// Total number of cells.
pub const BOARDSIZE: usize = N * N;

/// Pieces each side starts with.
pub const PIECES_PER_SIDE: usize = 6;

/// Diagonal directions as `(dx, dy)`.
/// Order: up-left, up-right, down-left, down-right.
pub const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

// =============================================================================
// Search Parameters
// =============================================================================

/// Default base cutoff depth for alpha-beta.
pub const BASE_CUTOFF: u32 = 12;

/// Smallest usable cutoff: the root must expand at least one ply.
pub const MIN_CUTOFF: u32 = 2;

/// Hard wall-clock ceiling for a single search, in milliseconds.
pub const TIME_CEILING_MS: u64 = 55_000;

/// Pause after a computed move before it is reported ready, in milliseconds.
pub const MOVE_DELAY_MS: u64 = 1_000;

/// Per-turn growth of the material weight in the evaluation function.
pub const TURN_WEIGHT: f64 = 0.25;

/// Fraction of the effective cutoff kept after a search hits the time ceiling.
pub const SHRINK_FACTOR: f64 = 0.75;

/// Value of a position won by the searching side.
pub const WIN_SCORE: i32 = i32::MAX;

/// Value of a position lost by the searching side.
pub const LOSS_SCORE: i32 = i32::MIN;
