//! Gomoku engine with Ninuki-renju rules
//!
//! A Gomoku engine and game session implementing the Ninuki-renju variant:
//! - Standard 19x19 board
//! - 5-in-a-row to win; with captures on, the opponent gets one reply to break it
//! - Capture win: 10 captured stones (5 pairs)
//! - Pair capture rule: X-O-O-X pattern captures the O-O pair
//! - Double-three forbidden for the side to move
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Immutable position snapshots with a priority grid
//! - [`rules`]: Game rules (capture, win, forbidden moves)
//! - [`eval`]: Move-ordering priority and static evaluation
//! - [`search`]: Worker pool and parallel negamax
//! - [`engine`]: Game session tying the board chain to the search
//! - [`config`]: Rule toggles and engine tuning from `Gomoku.toml`
//! - [`ui`]: egui front-end with the engine searching off the UI thread
//!
//! # Quick Start
//!
//! ```no_run
//! use gomoku::config::Config;
//! use gomoku::{Game, Pos};
//!
//! let config = Config::load_or_default();
//! let mut game = Game::new(config.rules, config.search).unwrap();
//!
//! game.play(Pos::new(9, 9)).unwrap();
//! game.play_ai().unwrap();
//! println!("{}", game.state());
//! ```
//!
//! # Search
//!
//! The engine expands the best candidates of the root position in parallel,
//! one job per child, and runs a bounded negamax with alpha-beta pruning
//! below each child until the time budget runs out. Candidates are ordered
//! by the priority grid; ties at the best score are broken at random.

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod rules;
pub mod search;
pub mod ui;

// Re-export commonly used types for convenience
pub use board::{Board, Pos, Stone, VictoryKind, VictoryState, BOARD_SIZE};
pub use engine::{Game, SearchRequest};
pub use error::{GameError, GameResult};
