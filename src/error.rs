//! Error types for the game engine
//!
//! Illegal move attempts are recoverable and leave the session untouched.
//! Missing candidates and pool start-up failures indicate a broken engine and
//! are propagated to the caller.

use crate::board::{Pos, Stone};

/// Errors that can occur while playing or searching
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// Target cell already holds a stone
    #[error("Cell {pos} is occupied")]
    Occupied { pos: Pos },

    /// Target cell is a forbidden double-three for the mover
    #[error("Cell {pos} is forbidden (double three)")]
    Taboo { pos: Pos },

    /// Move requested on a finished game
    #[error("Game is already over")]
    GameOver,

    /// Live position without a single candidate (priority grid never filled)
    #[error("No candidate moves for {} on a live position", turn.name())]
    NoCandidates { turn: Stone },

    /// Worker thread could not be started
    #[error("Failed to spawn search worker: {0}")]
    ThreadSpawn(#[from] std::io::Error),

    /// Configuration could not be read, parsed or validated
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;
