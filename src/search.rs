//! Alpha-beta search with an adaptive depth allowance.
//!
//! The engine searches a clone of the authoritative state to a cutoff depth
//! of `base_cutoff + depth_adjustment`, bounded by a wall-clock ceiling.
//! After each search the adjustment for the next one is tuned:
//!
//! - the ceiling was hit: the effective cutoff shrinks to `shrink_factor` of
//!   itself, never below the base;
//! - the cutoff depth was reached in time: the allowance grows by
//!   `1 + turns_elapsed * turn_weight`;
//! - the tree ended before the cutoff (decided lines): unchanged.
//!
//! Values are from the perspective of the side to move at the root, with
//! `i32::MAX` / `i32::MIN` reserved for won and lost positions.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::board::Color;
use crate::config::EngineConfig;
use crate::constants::{LOSS_SCORE, MIN_CUTOFF, WIN_SCORE};
use crate::game::GameState;
use crate::piece::Move;

/// Why a search stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Only one legal action existed; nothing was searched
    Forced,
    /// Every line ended in a decided game before the cutoff depth
    Decided,
    /// Some line was cut off at the full depth
    ReachedCutoff,
    /// The wall-clock ceiling was hit
    TimedOut,
}

/// Diagnostics for one search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub max_depth: u32,
    pub cutoff_depth: u32,
    pub max_pruned: u64,
    pub min_pruned: u64,
    pub elapsed: Duration,
    pub value: i32,
}

#[derive(Clone, Debug)]
pub struct SearchOutcome {
    pub best: Move,
    pub stats: SearchStats,
    pub termination: Termination,
}

/// Static evaluation of `state` for `side`.
///
/// Decided games map to the sentinels. Otherwise the material difference is
/// multiplied by the whole part of `1 + turns_elapsed * turn_weight`, so with
/// the default weight trades count one unit more every four turns.
pub fn evaluate(state: &GameState, side: Color, turn_weight: f64) -> i32 {
    match state.winner {
        Some(winner) if winner == side => return WIN_SCORE,
        Some(_) => return LOSS_SCORE,
        None => {}
    }
    let diff = state.count(side) as i64 - state.count(side.opposite()) as i64;
    let weight = (1.0 + f64::from(state.turns_elapsed) * turn_weight) as i64;
    diff.saturating_mul(weight)
        .clamp(i64::from(LOSS_SCORE) + 1, i64::from(WIN_SCORE) - 1) as i32
}

/// The unique action when exactly one piece can move and it has exactly one
/// legal move.
pub fn forced_move(state: &GameState) -> Option<Move> {
    let [pt] = state.movable() else {
        return None;
    };
    match state.piece_at(*pt)?.legal_moves() {
        [mv] => Some(mv.clone()),
        _ => None,
    }
}

#[derive(Clone, Debug)]
pub struct SearchEngine {
    config: EngineConfig,
    depth_adjustment: u32,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl SearchEngine {
    /// A base cutoff below [`MIN_CUTOFF`] is raised to it.
    pub fn new(mut config: EngineConfig) -> Self {
        if config.base_cutoff < MIN_CUTOFF {
            warn!(
                "base cutoff {} too shallow, using {MIN_CUTOFF}",
                config.base_cutoff
            );
            config.base_cutoff = MIN_CUTOFF;
        }
        Self {
            config,
            depth_adjustment: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn depth_adjustment(&self) -> u32 {
        self.depth_adjustment
    }

    pub fn set_depth_adjustment(&mut self, adjustment: u32) {
        self.depth_adjustment = adjustment;
    }

    /// Effective cutoff depth of the next search.
    pub fn cutoff_depth(&self) -> u32 {
        self.config.base_cutoff.saturating_add(self.depth_adjustment)
    }

    /// Forget what was learned in the previous game.
    pub fn reset(&mut self) {
        self.depth_adjustment = 0;
    }

    /// Pick a move for the side to move and adapt the depth allowance.
    ///
    /// Returns `None` only when the game is not in progress.
    pub fn choose_move(&mut self, state: &GameState) -> Option<SearchOutcome> {
        if state.winner.is_some() {
            return None;
        }
        let side = state.turn?;

        if let Some(best) = forced_move(state) {
            debug!("{side}: single legal action {best}, search skipped");
            return Some(SearchOutcome {
                best,
                stats: SearchStats {
                    cutoff_depth: self.cutoff_depth(),
                    value: evaluate(state, side, self.config.turn_weight),
                    ..SearchStats::default()
                },
                termination: Termination::Forced,
            });
        }

        let outcome = self.search(state)?;
        self.adapt(outcome.termination, state.turns_elapsed);
        Some(outcome)
    }

    /// Run one alpha-beta search without touching the depth allowance.
    pub fn search(&self, state: &GameState) -> Option<SearchOutcome> {
        if state.winner.is_some() {
            return None;
        }
        let side = state.turn?;

        let mut ctx = SearchContext::new(side, self.cutoff_depth(), &self.config);
        let value = ctx.max_value(state, LOSS_SCORE, WIN_SCORE, 0);
        ctx.stats.elapsed = ctx.start.elapsed();
        ctx.stats.value = value;

        let best = match ctx.best.take() {
            Some(mv) => mv,
            None => {
                warn!(value, "{side}: no move improves on the worst case, playing the first legal action");
                state.legal_moves().into_iter().next()?
            }
        };

        let termination = if ctx.timed_out {
            Termination::TimedOut
        } else if ctx.stats.max_depth >= ctx.stats.cutoff_depth {
            Termination::ReachedCutoff
        } else {
            Termination::Decided
        };

        let stats = ctx.stats;
        debug!(
            nodes = stats.nodes,
            max_depth = stats.max_depth,
            cutoff = stats.cutoff_depth,
            max_pruned = stats.max_pruned,
            min_pruned = stats.min_pruned,
            value = stats.value,
            "{side}: {best} after {:.3}s ({termination:?})",
            stats.elapsed.as_secs_f64()
        );

        Some(SearchOutcome {
            best,
            stats,
            termination,
        })
    }

    /// Tune the depth allowance for the next search.
    pub fn adapt(&mut self, termination: Termination, turns_elapsed: u32) {
        let base = self.config.base_cutoff;
        let before = self.depth_adjustment;
        match termination {
            Termination::TimedOut => {
                let shrunk = (self.config.shrink_factor * f64::from(self.cutoff_depth())) as u32;
                self.depth_adjustment = shrunk.saturating_sub(base);
            }
            Termination::ReachedCutoff => {
                let growth = ((f64::from(turns_elapsed) * self.config.turn_weight) as u32).saturating_add(1);
                self.depth_adjustment = before.saturating_add(growth);
            }
            Termination::Decided | Termination::Forced => {}
        }
        if self.depth_adjustment != before {
            debug!(
                "depth adjustment {before} -> {} ({termination:?})",
                self.depth_adjustment
            );
        }
    }
}

/// Mutable bookkeeping for a single search.
struct SearchContext<'a> {
    side: Color,
    config: &'a EngineConfig,
    start: Instant,
    stats: SearchStats,
    best: Option<Move>,
    timed_out: bool,
}

impl<'a> SearchContext<'a> {
    fn new(side: Color, cutoff_depth: u32, config: &'a EngineConfig) -> Self {
        Self {
            side,
            config,
            start: Instant::now(),
            stats: SearchStats {
                cutoff_depth,
                ..SearchStats::default()
            },
            best: None,
            timed_out: false,
        }
    }

    /// Static value if `state` is a leaf at `depth`.
    fn cutoff_test(&mut self, state: &GameState, depth: u32) -> Option<i32> {
        if state.winner.is_some() || depth >= self.stats.cutoff_depth {
            return Some(evaluate(state, self.side, self.config.turn_weight));
        }
        if self.start.elapsed() >= self.config.time_ceiling() {
            self.timed_out = true;
            return Some(evaluate(state, self.side, self.config.turn_weight));
        }
        None
    }

    fn enter(&mut self, depth: u32) -> u32 {
        let depth = depth + 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);
        depth
    }

    fn max_value(&mut self, state: &GameState, mut alpha: i32, beta: i32, depth: u32) -> i32 {
        let depth = self.enter(depth);
        if let Some(value) = self.cutoff_test(state, depth) {
            return value;
        }

        let mut value = LOSS_SCORE;
        for mv in state.legal_moves() {
            let mut child = state.clone();
            child.apply(&mv);
            self.stats.nodes += 1;

            value = value.max(self.min_value(&child, alpha, beta, depth));
            if depth == 1 && value > alpha {
                self.best = Some(mv);
            }
            if value >= beta {
                self.stats.max_pruned += 1;
                return value;
            }
            alpha = alpha.max(value);
        }
        value
    }

    fn min_value(&mut self, state: &GameState, alpha: i32, mut beta: i32, depth: u32) -> i32 {
        let depth = self.enter(depth);
        if let Some(value) = self.cutoff_test(state, depth) {
            return value;
        }

        let mut value = WIN_SCORE;
        for mv in state.legal_moves() {
            let mut child = state.clone();
            child.apply(&mv);
            self.stats.nodes += 1;

            value = value.min(self.max_value(&child, alpha, beta, depth));
            if value <= alpha {
                self.stats.min_pruned += 1;
                return value;
            }
            beta = beta.min(value);
        }
        value
    }
}
