//! Game rules for Gomoku with Ninuki-renju variant
//!
//! This module implements the rule set for Gomoku including:
//! - Capture rules (pair capture)
//! - Win conditions (5-in-a-row with capture confirmation, capture win)
//! - Forbidden moves (double-three)

pub mod capture;
pub mod forbidden;
pub mod win;

// Re-exports for convenient access
pub use capture::{captures_in_direction, play_capture};
pub use forbidden::{check_free_three, fill_taboo, is_double_three};
pub use win::{aligned_in_direction, is_aligned_at, is_aligned_stone, WIN_LENGTH};
