//! Game state management for the Gomoku GUI

use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{error, info};

use crate::board::VictoryKind;
use crate::config::{Config, Options};
use crate::search::{MoveChoice, Searcher};
use crate::{Game, GameResult, Pos, Stone};

/// Who sits in each seat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// One human against the engine
    HumanVsAi { human: Stone },
    /// Hotseat
    HumanVsHuman,
    /// Engine against itself
    AiVsAi,
}

impl GameMode {
    /// Read the seats from rule options
    pub fn from_options(options: &Options) -> Self {
        match (options.black_ai, options.white_ai) {
            (false, false) => GameMode::HumanVsHuman,
            (true, true) => GameMode::AiVsAi,
            (false, true) => GameMode::HumanVsAi { human: Stone::Black },
            (true, false) => GameMode::HumanVsAi { human: Stone::White },
        }
    }

    /// Write the seats into rule options
    pub fn apply(self, options: &mut Options) {
        let (black_ai, white_ai) = match self {
            GameMode::HumanVsAi { human: Stone::White } => (true, false),
            GameMode::HumanVsAi { .. } => (false, true),
            GameMode::HumanVsHuman => (false, false),
            GameMode::AiVsAi => (true, true),
        };
        options.black_ai = black_ai;
        options.white_ai = white_ai;
    }

    pub fn label(self) -> &'static str {
        match self {
            GameMode::HumanVsAi { human: Stone::White } => "You play White",
            GameMode::HumanVsAi { .. } => "You play Black",
            GameMode::HumanVsHuman => "Hotseat",
            GameMode::AiVsAi => "Engine vs engine",
        }
    }
}

/// AI computation state
pub enum AiState {
    Idle,
    Thinking {
        receiver: Receiver<GameResult<MoveChoice>>,
    },
}

/// Move timer for tracking thinking time
pub struct MoveTimer {
    pub start_time: Option<Instant>,
    pub last_move_duration: Option<Duration>,
    pub ai_thinking_time: Option<Duration>,
}

impl Default for MoveTimer {
    fn default() -> Self {
        Self {
            start_time: Some(Instant::now()),
            last_move_duration: None,
            ai_thinking_time: None,
        }
    }
}

impl MoveTimer {
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn stop(&mut self) -> Duration {
        let duration = self.elapsed();
        self.last_move_duration = Some(duration);
        self.start_time = None;
        duration
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.map_or(Duration::ZERO, |t| t.elapsed())
    }

    pub fn set_ai_time(&mut self, duration: Duration) {
        self.ai_thinking_time = Some(duration);
    }
}

/// Session shown by the GUI.
///
/// Rule toggles edited in the panel are staged in `rules` and take effect on
/// the next restart; display toggles apply to the running game at once.
pub struct GameState {
    pub game: Game,
    pub mode: GameMode,
    pub rules: Options,
    pub last_choice: Option<MoveChoice>,
    pub ai_state: AiState,
    pub move_timer: MoveTimer,
    pub message: Option<String>,
    /// Engine seats stop after a search failure until the next restart
    ai_halted: bool,
    searcher: Arc<Searcher>,
}

impl GameState {
    pub fn new(config: &Config) -> GameResult<Self> {
        let searcher = Arc::new(Searcher::new(config.search.clone())?);
        let rules = config.rules;
        Ok(Self {
            game: Game::with_searcher(rules, Arc::clone(&searcher)),
            mode: GameMode::from_options(&rules),
            rules,
            last_choice: None,
            ai_state: AiState::Idle,
            move_timer: MoveTimer::default(),
            message: None,
            ai_halted: false,
            searcher,
        })
    }

    /// Start a new game with the staged rules and the current mode.
    ///
    /// A search still running for the old game finishes in the background and
    /// its result is discarded.
    pub fn restart(&mut self) {
        let mut options = self.rules;
        self.mode.apply(&mut options);
        self.rules = options;
        self.game = Game::with_searcher(options, Arc::clone(&self.searcher));
        self.last_choice = None;
        self.ai_state = AiState::Idle;
        self.move_timer = MoveTimer::default();
        self.message = None;
        self.ai_halted = false;
        info!("New game: {}", self.mode.label());
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        self.restart();
    }

    /// Apply the staged display toggles to the running game
    pub fn sync_display(&mut self) {
        self.game
            .set_display(self.rules.show_tips, self.rules.show_priority);
    }

    pub fn is_human_turn(&self) -> bool {
        !self.game.is_over() && self.game.is_player_next()
    }

    pub fn is_ai_turn(&self) -> bool {
        !self.game.is_over() && !self.game.is_player_next() && !self.ai_halted
    }

    pub fn is_ai_thinking(&self) -> bool {
        matches!(self.ai_state, AiState::Thinking { .. })
    }

    /// Try to play a human move
    pub fn try_place_stone(&mut self, pos: Pos) -> Result<(), String> {
        if !self.is_human_turn() {
            return Err("Not your turn".to_string());
        }
        self.game.play(pos).map_err(|e| e.to_string())?;
        self.message = None;
        self.move_timer.stop();
        self.move_timer.start();
        Ok(())
    }

    /// Launch the engine search on a background thread
    pub fn start_ai_thinking(&mut self) {
        let (sender, receiver) = channel();
        let request = self.game.begin_search();

        let spawned = thread::Builder::new()
            .name("gomoku-ai".to_string())
            .spawn(move || {
                let _ = sender.send(request.run());
            });

        match spawned {
            Ok(_) => self.ai_state = AiState::Thinking { receiver },
            Err(e) => self.halt_ai(format!("Could not start the engine: {e}")),
        }
    }

    /// Play the engine move once the search has answered
    pub fn check_ai_result(&mut self) {
        let AiState::Thinking { receiver } = &self.ai_state else {
            return;
        };
        let received = receiver.try_recv();

        match received {
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.ai_state = AiState::Idle;
                self.halt_ai("Engine thread stopped without a move".to_string());
            }
            Ok(Err(e)) => {
                self.ai_state = AiState::Idle;
                self.halt_ai(e.to_string());
            }
            Ok(Ok(choice)) => {
                self.ai_state = AiState::Idle;
                self.move_timer.set_ai_time(choice.elapsed);
                match self.game.play_choice(&choice) {
                    Ok(_) => {
                        self.last_choice = Some(choice);
                        self.move_timer.start();
                    }
                    Err(e) => self.halt_ai(e.to_string()),
                }
            }
        }
    }

    fn halt_ai(&mut self, msg: String) {
        error!("Engine stopped: {}", msg);
        self.game.abort_search();
        self.ai_halted = true;
        self.message = Some(msg);
    }

    /// Warning shown while a five waits for the opponent's reply
    pub fn pending_five_text(&self) -> Option<String> {
        if self.game.is_over() || !self.game.state().is_flagged_final() {
            return None;
        }
        let pending = self.game.state().pending_alignment()?;
        Some(format!(
            "{} has five at {}: {} must break it by capture",
            pending.owner.name(),
            pending.pos,
            pending.owner.opponent().name()
        ))
    }

    /// Best-priority cell for the human to move, when tips are on
    pub fn tip(&self) -> Option<Pos> {
        if !self.game.options().show_tips || !self.is_human_turn() {
            return None;
        }
        let best = self.game.state().best_priority();
        (best.score > 0).then_some(best.pos)
    }

    /// Human-readable outcome of a finished game
    pub fn outcome_text(&self) -> Option<String> {
        let victory = self.game.victory();
        match victory.kind {
            VictoryKind::Ongoing => None,
            VictoryKind::Aligned => Some(format!("{} wins by alignment", victory.victor.name())),
            VictoryKind::Captured => Some(format!("{} wins by captures", victory.victor.name())),
            VictoryKind::Stalemate => Some("Draw: the board is full".to_string()),
        }
    }
}
