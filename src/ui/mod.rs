//! GUI module for the Gomoku game
//!
//! This module provides a native Rust GUI using egui/eframe. Engine moves are
//! searched on a background thread so the board stays responsive.

mod app;
mod board_view;
mod game_state;
mod theme;

pub use app::GomokuApp;
pub use game_state::{GameMode, GameState};
