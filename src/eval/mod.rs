//! Position evaluation and move ordering
//!
//! - [`priority`]: per-cell weights used to pick and order candidate moves
//! - [`heuristic`]: static score of a position, White positive

pub mod heuristic;
pub mod priority;

pub use heuristic::{fill_score, score};
pub use priority::{best_priority, fill_priority};
