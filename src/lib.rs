//! Mini-Checkers: 6x6 checkers with forced captures and an alpha-beta engine.
//!
//! Each side starts with six pieces on the dark squares of its two back rows.
//! Pieces step diagonally forward, capture by jumping along any diagonal, and
//! chain jumps within one move. A capture must be taken when one exists. A
//! side with no pieces or no legal move loses. There are no kings.
//!
//! The engine searches to an adaptive cutoff depth under a wall-clock
//! ceiling, growing the depth when searches finish in time and shrinking it
//! after a timeout.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry and search defaults
//! - [`board`] - Cells, occupancy, highlight markers, coordinates
//! - [`piece`] - Pieces, moves, and jump-chain generation
//! - [`game`] - Turn order, forced capture, and win detection
//! - [`search`] - Alpha-beta search and depth adaptation
//! - [`worker`] - Background search thread
//! - [`config`] - JSON-loadable engine parameters
//! - [`playout`] - Random playouts and engine-vs-random matches
//! - [`protocol`] - Text protocol for interactive play
//!
//! ## Example
//!
//! ```
//! use mini_checkers::board::Color;
//! use mini_checkers::config::EngineConfig;
//! use mini_checkers::game::GameState;
//! use mini_checkers::search::SearchEngine;
//!
//! // Human plays White, so the engine opens for Black
//! let mut state = GameState::new(Color::White);
//!
//! let mut engine = SearchEngine::new(EngineConfig {
//!     base_cutoff: 4,
//!     ..EngineConfig::default()
//! });
//! let outcome = engine.choose_move(&state).unwrap();
//! println!("Engine plays {}", outcome.best);
//! assert!(state.play(&outcome.best));
//! ```

pub mod board;
pub mod config;
pub mod constants;
pub mod error;
pub mod game;
pub mod piece;
pub mod playout;
pub mod protocol;
pub mod search;
pub mod worker;

pub use error::{CheckersError, Result};
