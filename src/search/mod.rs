//! Search module for Gomoku AI
//!
//! Contains:
//! - A fixed worker pool running one batch of root jobs at a time
//! - Negamax with alpha-beta pruning below each root child

pub mod negamax;
pub mod pool;

pub use negamax::{negamax, MoveChoice, SearchContext, Searcher};
pub use pool::ThreadPool;
