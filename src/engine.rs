//! Game session driver
//!
//! [`Game`] owns the authoritative board chain (current and previous
//! position), the side to move and the search engine. Human moves go through
//! [`Game::play`]; engine moves through [`Game::play_ai`], or through
//! [`Game::request_ai_move`] followed by `play` when the caller wants to look
//! at the move first.
//!
//! # Example
//!
//! ```no_run
//! use gomoku::config::{EngineConfig, Options};
//! use gomoku::{Game, Pos};
//!
//! let mut game = Game::new(Options::default(), EngineConfig::default()).unwrap();
//! game.play(Pos::new(9, 9)).unwrap();
//! let over = game.play_ai().unwrap();
//! println!("White answered in {:?}, game over: {}", game.time_taken(), over);
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::board::{Board, Pos, Score, Stone, VictoryState};
use crate::config::{EngineConfig, Options};
use crate::error::{GameError, GameResult};
use crate::search::{MoveChoice, Searcher};

/// One game between two seats, each human or engine.
pub struct Game {
    options: Options,
    searcher: Arc<Searcher>,
    state: Board,
    previous: Option<Board>,
    turn: Stone,
    /// Search budget per engine move (limit minus margin)
    budget: Duration,
    search_started: Option<Instant>,
    time_taken: Duration,
}

impl Game {
    /// Start a new game with its own search engine
    pub fn new(options: Options, config: EngineConfig) -> GameResult<Self> {
        let searcher = Arc::new(Searcher::new(config)?);
        Ok(Self::with_searcher(options, searcher))
    }

    /// Start a new game reusing an existing search engine
    pub fn with_searcher(options: Options, searcher: Arc<Searcher>) -> Self {
        let turn = Stone::Black;
        let mut state = Board::new(turn);
        state.fill_taboo(options.double_three, turn);

        let budget = searcher.config().search_budget(options.slow_mode);
        debug!(
            "New game: depth {}, budget {:?}, {:?}",
            searcher.config().depth(options.slow_mode),
            budget,
            options
        );

        Self {
            options,
            searcher,
            state,
            previous: None,
            turn,
            budget,
            search_started: None,
            time_taken: Duration::ZERO,
        }
    }

    /// Play `pos` for the side to move.
    ///
    /// # Returns
    /// Whether the game is over after the move.
    ///
    /// # Errors
    /// `Occupied`, `Taboo` or `GameOver`; the session is left unchanged.
    pub fn play(&mut self, pos: Pos) -> GameResult<bool> {
        if self.state.is_terminal() {
            return Err(GameError::GameOver);
        }
        if !self.state.is_empty(pos) {
            return Err(GameError::Occupied { pos });
        }
        if self.state.is_taboo(pos) {
            return Err(GameError::Taboo { pos });
        }

        let next = Board::derive(&self.state, pos, self.turn, &self.options);
        self.previous = Some(std::mem::replace(&mut self.state, next));
        let mover = self.turn;
        self.turn = self.turn.opponent();

        self.state.fill_taboo(self.options.double_three, self.turn);
        self.state.fill_priority(&self.options);

        debug!(
            "{} played {} (turn {}), score {}",
            mover.name(),
            pos,
            self.state.turn_number(),
            self.current_score()
        );

        let victory = self.state.victory();
        if victory.is_over() {
            info!("Game over: {:?} for {}", victory.kind, victory.victor.name());
        }
        Ok(victory.is_over())
    }

    /// Snapshot the position for a search and start the elapsed clock.
    ///
    /// The request can run on any thread; hand its result back through
    /// [`Game::play_choice`], or call [`Game::abort_search`] if it failed.
    pub fn begin_search(&mut self) -> SearchRequest {
        self.search_started = Some(Instant::now());
        SearchRequest {
            searcher: Arc::clone(&self.searcher),
            board: self.state.clone(),
            mover: self.turn,
            options: self.options,
            budget: self.budget,
        }
    }

    /// Stop the elapsed clock without playing a move
    pub fn abort_search(&mut self) {
        self.search_started = None;
    }

    /// Ask the engine for a move for the side to move, without playing it.
    pub fn request_ai_move(&mut self) -> GameResult<Pos> {
        let result = self.begin_search().run();
        self.search_started = None;

        let choice = result?;
        self.time_taken = choice.elapsed;
        Ok(choice.pos)
    }

    /// Choose and play the engine's move
    pub fn play_ai(&mut self) -> GameResult<bool> {
        let pos = self.request_ai_move()?;
        self.play(pos)
    }

    /// Play a move computed by a [`SearchRequest`] and record its search time.
    pub fn play_choice(&mut self, choice: &MoveChoice) -> GameResult<bool> {
        self.search_started = None;
        let over = self.play(choice.pos)?;
        self.time_taken = choice.elapsed;
        Ok(over)
    }

    #[inline]
    pub fn cell(&self, pos: Pos) -> Stone {
        self.state.get(pos)
    }

    #[inline]
    pub fn priority(&self, pos: Pos) -> i32 {
        self.state.priority(pos)
    }

    #[inline]
    pub fn victory(&self) -> VictoryState {
        self.state.victory()
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.state.is_terminal()
    }

    /// Stones captured by (black, white)
    pub fn captured_counts(&self) -> (u32, u32) {
        (self.state.captured_by_black(), self.state.captured_by_white())
    }

    /// Duration of the last engine search
    pub fn time_taken(&self) -> Duration {
        self.time_taken
    }

    /// Time spent by the running engine search, zero when none is running
    pub fn elapsed(&self) -> Duration {
        self.search_started
            .map(|start| start.elapsed())
            .unwrap_or_default()
    }

    /// Side to move
    #[inline]
    pub fn turn(&self) -> Stone {
        self.turn
    }

    /// Whether the side to move is a human seat
    pub fn is_player_next(&self) -> bool {
        match self.turn {
            Stone::Black => !self.options.black_ai,
            Stone::White => !self.options.white_ai,
            Stone::Empty => false,
        }
    }

    /// Whether `pos` differs between the previous and the current position
    pub fn has_pos_changed(&self, pos: Pos) -> bool {
        self.previous
            .as_ref()
            .is_some_and(|previous| previous.get(pos) != self.state.get(pos))
    }

    /// Static evaluation of the current position, White positive
    pub fn current_score(&self) -> Score {
        self.state.score(self.options.capture_win)
    }

    pub fn state(&self) -> &Board {
        &self.state
    }

    pub fn previous_state(&self) -> Option<&Board> {
        self.previous.as_ref()
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Change display-only toggles without restarting
    pub fn set_display(&mut self, show_tips: bool, show_priority: bool) {
        self.options.show_tips = show_tips;
        self.options.show_priority = show_priority;
    }

    /// Search budget per engine move
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Shared handle to the search engine, for searching off the UI thread
    pub fn searcher(&self) -> Arc<Searcher> {
        Arc::clone(&self.searcher)
    }
}

/// Everything a search needs, detached from the session
pub struct SearchRequest {
    searcher: Arc<Searcher>,
    board: Board,
    mover: Stone,
    options: Options,
    budget: Duration,
}

impl SearchRequest {
    /// Run the search on the calling thread
    pub fn run(self) -> GameResult<MoveChoice> {
        self.searcher
            .choose_move(&self.board, self.mover, &self.options, self.budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::VictoryKind;

    fn test_config() -> EngineConfig {
        EngineConfig {
            time_limit_ms: 5_000,
            depth: 2,
            thread_count: 2,
            ..EngineConfig::default()
        }
    }

    fn new_game(options: Options) -> Game {
        let searcher = Arc::new(Searcher::with_seed(test_config(), 17).unwrap());
        Game::with_searcher(options, searcher)
    }

    fn play_all(game: &mut Game, moves: &[(u8, u8)]) {
        for &(r, c) in moves {
            game.play(Pos::new(r, c)).unwrap();
        }
    }

    #[test]
    fn test_new_game() {
        let game = new_game(Options::default());
        assert_eq!(game.turn(), Stone::Black);
        assert!(game.is_player_next());
        assert!(!game.is_over());
        assert_eq!(game.captured_counts(), (0, 0));
        assert_eq!(game.priority(Pos::CENTER), 1);
        assert!(!game.has_pos_changed(Pos::CENTER));
    }

    #[test]
    fn test_play_alternates_and_highlights() {
        let mut game = new_game(Options::default());
        assert!(!game.play(Pos::new(9, 9)).unwrap());

        assert_eq!(game.turn(), Stone::White);
        assert!(!game.is_player_next());
        assert_eq!(game.cell(Pos::new(9, 9)), Stone::Black);
        assert!(game.has_pos_changed(Pos::new(9, 9)));
        assert!(!game.has_pos_changed(Pos::new(9, 10)));
        assert_eq!(game.state().turn_number(), 1);
        // Priority is ready for the next mover
        assert!(game.priority(Pos::new(9, 10)) > 0);
    }

    #[test]
    fn test_occupied_cell_is_rejected_without_change() {
        let mut game = new_game(Options::default());
        game.play(Pos::new(9, 9)).unwrap();
        let before = game.state().clone();

        let err = game.play(Pos::new(9, 9)).unwrap_err();
        assert!(matches!(err, GameError::Occupied { .. }));
        assert_eq!(game.turn(), Stone::White);
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn test_taboo_cell_is_rejected() {
        let moves = [
            (9, 7),
            (0, 0),
            (9, 8),
            (0, 2),
            (7, 9),
            (18, 18),
            (8, 9),
            (18, 16),
        ];

        let mut game = new_game(Options::default());
        play_all(&mut game, &moves);
        assert_eq!(game.turn(), Stone::Black);
        assert!(game.state().is_taboo(Pos::new(9, 9)));
        let err = game.play(Pos::new(9, 9)).unwrap_err();
        assert!(matches!(err, GameError::Taboo { .. }));

        let mut free = new_game(Options {
            double_three: false,
            ..Options::default()
        });
        play_all(&mut free, &moves);
        assert!(free.play(Pos::new(9, 9)).is_ok());
    }

    #[test]
    fn test_capture_through_session() {
        let mut game = new_game(Options::default());
        // Black flanks the white pair at (9,10),(9,11)
        play_all(&mut game, &[(9, 9), (9, 10), (0, 0), (9, 11)]);
        game.play(Pos::new(9, 12)).unwrap();

        assert_eq!(game.captured_counts(), (2, 0));
        assert_eq!(game.cell(Pos::new(9, 10)), Stone::Empty);
        assert!(game.has_pos_changed(Pos::new(9, 11)));
    }

    #[test]
    fn test_five_ends_game_without_captures() {
        let mut game = new_game(Options {
            capture: false,
            capture_win: false,
            ..Options::default()
        });
        play_all(
            &mut game,
            &[(9, 5), (0, 0), (9, 6), (0, 2), (9, 7), (0, 4), (9, 8), (0, 6)],
        );
        assert!(game.play(Pos::new(9, 9)).unwrap());

        assert_eq!(
            game.victory(),
            VictoryState::won(Stone::Black, VictoryKind::Aligned)
        );
        assert!(matches!(game.play(Pos::new(5, 5)), Err(GameError::GameOver)));
        assert!(matches!(game.request_ai_move(), Err(GameError::GameOver)));
    }

    #[test]
    fn test_ai_opens_in_center() {
        let mut game = new_game(Options {
            black_ai: true,
            ..Options::default()
        });
        assert!(!game.is_player_next());
        assert_eq!(game.request_ai_move().unwrap(), Pos::CENTER);
        assert!(!game.play_ai().unwrap());
        assert_eq!(game.cell(Pos::CENTER), Stone::Black);
    }

    #[test]
    fn test_ai_reply_is_legal() {
        let mut game = new_game(Options::default());
        game.play(Pos::new(9, 9)).unwrap();
        let before = game.state().clone();

        let pos = game.request_ai_move().unwrap();
        assert!(before.is_empty(pos));
        assert!(!before.is_taboo(pos));
        assert!(game.time_taken() <= Duration::from_secs(10));
        game.play(pos).unwrap();
        assert_eq!(game.turn(), Stone::Black);
    }

    #[test]
    fn test_elapsed_runs_only_during_a_search() {
        let mut game = new_game(Options::default());
        game.play(Pos::new(9, 9)).unwrap();
        assert_eq!(game.elapsed(), Duration::ZERO);

        let request = game.begin_search();
        std::thread::sleep(Duration::from_millis(5));
        assert!(game.elapsed() >= Duration::from_millis(5));

        let choice = std::thread::spawn(move || request.run()).join().unwrap().unwrap();
        assert!(game.elapsed() > Duration::ZERO);

        game.play_choice(&choice).unwrap();
        assert_eq!(game.elapsed(), Duration::ZERO);
        assert_eq!(game.time_taken(), choice.elapsed);
        assert_eq!(game.turn(), Stone::Black);
    }

    #[test]
    fn test_abort_search_stops_the_clock() {
        let mut game = new_game(Options::default());
        let _request = game.begin_search();
        std::thread::sleep(Duration::from_millis(1));
        assert!(game.elapsed() > Duration::ZERO);
        game.abort_search();
        assert_eq!(game.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_display_toggles_are_live() {
        let mut game = new_game(Options::default());
        game.play(Pos::new(9, 9)).unwrap();
        game.set_display(true, true);
        assert!(game.options().show_tips);
        assert!(game.options().show_priority);
        assert_eq!(game.turn(), Stone::White);
    }
}
