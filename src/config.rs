//! Configuration for rules and engine tuning
//!
//! Values are read from `Gomoku.toml` at the repository root. The hardcoded
//! defaults mirror that file and are used when it is missing.

use std::fs;
use std::path::Path;
use std::time::Duration;

use log::warn;
use serde::Deserialize;

use crate::error::{GameError, GameResult};

/// Default configuration file name
pub const CONFIG_FILE: &str = "Gomoku.toml";

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub search: EngineConfig,
    pub rules: Options,
}

/// Search tuning
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EngineConfig {
    /// Wall-clock budget per AI move in normal mode
    pub time_limit_ms: u64,
    /// Wall-clock budget per AI move in slow mode
    pub slow_time_limit_ms: u64,
    /// Subtracted from the budget to leave room for bookkeeping
    pub time_margin_ms: u64,
    /// Base search depth (root ply included)
    pub depth: u32,
    /// Extra plies in slow mode
    pub slow_depth_bonus: u32,
    /// Candidates expanded at the root
    pub initial_width: usize,
    /// Candidates expanded below the root
    pub deep_width: usize,
    /// Worker threads in the search pool
    pub thread_count: usize,
}

impl EngineConfig {
    /// Configured budget for one move
    pub fn time_limit(&self, slow_mode: bool) -> Duration {
        if slow_mode {
            Duration::from_millis(self.slow_time_limit_ms)
        } else {
            Duration::from_millis(self.time_limit_ms)
        }
    }

    /// Budget the search may actually use: the limit minus the margin
    pub fn search_budget(&self, slow_mode: bool) -> Duration {
        self.time_limit(slow_mode)
            .saturating_sub(Duration::from_millis(self.time_margin_ms))
    }

    /// Search depth for the given mode
    pub fn depth(&self, slow_mode: bool) -> u32 {
        if slow_mode {
            self.depth + self.slow_depth_bonus
        } else {
            self.depth
        }
    }

    /// Reject settings the search cannot run with
    pub fn validate(&self) -> GameResult<()> {
        if self.thread_count == 0 {
            return Err(GameError::Config("thread_count must be at least 1".into()));
        }
        if self.depth < 2 {
            return Err(GameError::Config("depth must be at least 2".into()));
        }
        if self.initial_width == 0 || self.deep_width == 0 {
            return Err(GameError::Config("search widths must be at least 1".into()));
        }
        if self.time_margin_ms >= self.time_limit_ms.min(self.slow_time_limit_ms) {
            return Err(GameError::Config(format!(
                "time_margin_ms ({}) must be below both time limits",
                self.time_margin_ms
            )));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 500,
            slow_time_limit_ms: 10_000,
            time_margin_ms: 5,
            depth: 7,
            slow_depth_bonus: 1,
            initial_width: 40,
            deep_width: 20,
            thread_count: 8,
        }
    }
}

/// Rule and seat toggles for one game
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Forbid moves creating two free-threes
    pub double_three: bool,
    /// Enable pair capture
    pub capture: bool,
    /// Win by capturing 10 stones
    pub capture_win: bool,
    /// Black seat played by the engine
    pub black_ai: bool,
    /// White seat played by the engine
    pub white_ai: bool,
    /// Longer budget and one extra ply
    pub slow_mode: bool,
    /// Highlight the best-priority cell
    pub show_tips: bool,
    /// Draw priority values on empty cells
    pub show_priority: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            double_three: true,
            capture: true,
            capture_win: true,
            black_ai: false,
            white_ai: true,
            slow_mode: false,
            show_tips: false,
            show_priority: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> GameResult<Self> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| {
            GameError::Config(format!("Failed to read {}: {}", path.as_ref().display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration text
    pub fn from_toml(contents: &str) -> GameResult<Self> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| GameError::Config(format!("Failed to parse config: {}", e)))?;
        config.search.validate()?;
        Ok(config)
    }

    /// Load `Gomoku.toml` from the working directory
    pub fn load_default() -> GameResult<Self> {
        Self::from_file(CONFIG_FILE)
    }

    /// Built-in values, identical to the shipped `Gomoku.toml`
    pub fn default_hardcoded() -> Self {
        Self {
            search: EngineConfig::default(),
            rules: Options::default(),
        }
    }

    /// Load `Gomoku.toml`, falling back to the built-in values
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            warn!("Could not load {} ({}), using hardcoded defaults", CONFIG_FILE, e);
            Self::default_hardcoded()
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_hardcoded()
    }
}
