//! Parallel root fan-out over a bounded negamax search
//!
//! The root position is expanded into its best candidates, each child board
//! is handed to the worker pool as an independent job, and every job runs a
//! single-threaded negamax below it. Jobs share one atomic bound: the best
//! root score found so far. It tightens the window of jobs that start later
//! and lets them skip work once a forced win has been found.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use gomoku::config::{EngineConfig, Options};
//! use gomoku::search::Searcher;
//! use gomoku::{Board, Stone};
//!
//! let searcher = Searcher::new(EngineConfig::default()).unwrap();
//! let board = Board::new(Stone::Black);
//! let choice = searcher
//!     .choose_move(&board, Stone::Black, &Options::default(), Duration::from_millis(500))
//!     .unwrap();
//! println!("Best move: {}", choice.pos);
//! ```

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::{move_buffer, Board, MoveScore, Pos, Score, Stone, INFINITY, NEG_INFINITY};
use crate::config::{EngineConfig, Options};
use crate::error::{GameError, GameResult};

use super::pool::ThreadPool;

/// Per-decision search parameters, copied into every job
#[derive(Debug, Clone, Copy)]
pub struct SearchContext {
    /// Rules applied when deriving child boards
    pub options: Options,
    /// Nodes reached after this instant return without a score
    pub deadline: Instant,
    /// Depth of the root children (root ply included)
    pub depth: u32,
    /// Candidates expanded below the root
    pub deep_width: usize,
}

impl SearchContext {
    #[inline]
    pub fn overdue(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

/// One root child handed to the pool
pub struct ChildJob {
    board: Box<Board>,
    mv: Pos,
    bound: Arc<AtomicI64>,
    mover: Stone,
}

/// Decided move with search statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveChoice {
    pub pos: Pos,
    /// Score from the mover's point of view
    pub score: Score,
    /// Root candidates searched
    pub candidates: usize,
    /// Candidates tied at the best score
    pub ties: usize,
    pub elapsed: Duration,
    /// No root job finished in time; `pos` is the best-priority candidate
    pub timed_out: bool,
}

/// Move-choosing engine owning its worker pool.
pub struct Searcher {
    pool: ThreadPool<ChildJob, GameResult<MoveScore>>,
    config: EngineConfig,
    rng: Mutex<StdRng>,
}

impl Searcher {
    /// Create a searcher with an OS-seeded tie-breaker
    pub fn new(config: EngineConfig) -> GameResult<Self> {
        Self::build(config, StdRng::from_os_rng())
    }

    /// Create a searcher with a fixed tie-breaking seed
    pub fn with_seed(config: EngineConfig, seed: u64) -> GameResult<Self> {
        Self::build(config, StdRng::seed_from_u64(seed))
    }

    fn build(config: EngineConfig, rng: StdRng) -> GameResult<Self> {
        config.validate()?;
        let pool = ThreadPool::new(config.thread_count)?;
        Ok(Self {
            pool,
            config,
            rng: Mutex::new(rng),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Pick a move for `mover` on `board` within `time_budget`.
    ///
    /// Search depth comes from the configuration and the slow-mode flag of
    /// `options`. Ties at the best score are broken uniformly at random.
    ///
    /// # Errors
    /// `GameOver` on a finished position, `NoCandidates` when no cell carries
    /// any priority.
    pub fn choose_move(
        &self,
        board: &Board,
        mover: Stone,
        options: &Options,
        time_budget: Duration,
    ) -> GameResult<MoveChoice> {
        let start = Instant::now();
        if board.is_terminal() {
            return Err(GameError::GameOver);
        }

        let ctx = SearchContext {
            options: *options,
            deadline: start + time_budget,
            depth: self.config.depth(options.slow_mode),
            deep_width: self.config.deep_width,
        };

        let mut root = board.clone();
        root.fill_priority(options);

        let mut buffer = move_buffer();
        let count = root.children(&mut buffer, self.config.initial_width);
        if count == 0 {
            return Err(GameError::NoCandidates { turn: mover });
        }
        let candidates = &buffer[..count];

        let bound = Arc::new(AtomicI64::new(NEG_INFINITY));
        let jobs: Vec<ChildJob> = candidates
            .iter()
            .map(|candidate| ChildJob {
                board: Box::new(Board::derive(&root, candidate.pos, mover, options)),
                mv: candidate.pos,
                bound: Arc::clone(&bound),
                mover,
            })
            .collect();

        debug!(
            "{} searching {} root moves at depth {}",
            mover.name(),
            jobs.len(),
            ctx.depth
        );

        let scored = self
            .pool
            .run(jobs, move |job| root_job(job, &ctx))
            .into_iter()
            .collect::<GameResult<Vec<MoveScore>>>()?;

        let choice = self.select(&scored, candidates, start.elapsed());
        info!(
            "{} plays {} (score {}, {} candidates, {} tied) in {:?}",
            mover.name(),
            choice.pos,
            choice.score,
            choice.candidates,
            choice.ties,
            choice.elapsed
        );
        Ok(choice)
    }

    fn select(&self, scored: &[MoveScore], candidates: &[MoveScore], elapsed: Duration) -> MoveChoice {
        // Exactly NEG_INFINITY marks a job that produced no information;
        // proven losses score strictly below it and stay eligible.
        let best = scored
            .iter()
            .map(|m| m.score)
            .filter(|&score| score != NEG_INFINITY)
            .max();

        let Some(best) = best else {
            warn!("No root move finished in time, playing best-priority candidate");
            return MoveChoice {
                pos: candidates[0].pos,
                score: NEG_INFINITY,
                candidates: candidates.len(),
                ties: 0,
                elapsed,
                timed_out: true,
            };
        };

        let ties: Vec<Pos> = scored
            .iter()
            .filter(|m| m.score == best)
            .map(|m| m.pos)
            .collect();
        let index = self.rng.lock().random_range(0..ties.len());

        MoveChoice {
            pos: ties[index],
            score: best,
            candidates: candidates.len(),
            ties: ties.len(),
            elapsed,
            timed_out: false,
        }
    }
}

/// Score of a finished position for the player who moved into it.
///
/// Wins found higher in the tree (more remaining depth) score higher.
#[inline]
fn terminal_score(board: &Board, depth: u32, player: Stone) -> Score {
    (INFINITY + depth as Score) * board.victory().victor.sign() * player.sign()
}

fn root_job(job: ChildJob, ctx: &SearchContext) -> GameResult<MoveScore> {
    let ChildJob {
        mut board,
        mv,
        bound,
        mover,
    } = job;

    // Another job already proved a forced win
    if ctx.overdue() || bound.load(Ordering::Relaxed) > INFINITY {
        return Ok(MoveScore::new(NEG_INFINITY, mv));
    }

    let score = if board.is_terminal() {
        terminal_score(&board, ctx.depth, mover)
    } else {
        let beta = -bound.load(Ordering::Relaxed);
        match negamax(&mut board, ctx.depth - 1, NEG_INFINITY, beta, mover.opponent(), ctx)? {
            Some(score) => -score,
            None => NEG_INFINITY,
        }
    };

    bound.fetch_max(score, Ordering::Relaxed);
    Ok(MoveScore::new(score, mv))
}

/// Negamax with alpha-beta pruning, from `player`'s point of view.
///
/// `player` is the side to move on `node`. Returns the best score over the
/// children explored, or `None` when the deadline passed before any child
/// was scored.
///
/// # Errors
/// `NoCandidates` if the live node has no cell with positive priority.
pub fn negamax(
    node: &mut Board,
    depth: u32,
    mut alpha: Score,
    beta: Score,
    player: Stone,
    ctx: &SearchContext,
) -> GameResult<Option<Score>> {
    node.fill_priority(&ctx.options);

    let mut buffer = move_buffer();
    let count = node.children(&mut buffer, ctx.deep_width);
    if count == 0 {
        return Err(GameError::NoCandidates { turn: player });
    }

    let mut best: Option<Score> = None;
    for candidate in &buffer[..count] {
        if alpha > beta || ctx.overdue() {
            break;
        }

        let mut child = Board::derive(node, candidate.pos, player, &ctx.options);
        let score = if child.is_terminal() {
            terminal_score(&child, depth, player)
        } else if depth <= 1 {
            player.sign() * child.score(ctx.options.capture_win)
        } else {
            match negamax(&mut child, depth - 1, -beta, -alpha, player.opponent(), ctx)? {
                Some(score) => -score,
                None => continue,
            }
        };

        best = Some(best.map_or(score, |b| b.max(score)));
        alpha = alpha.max(score);
    }

    Ok(best)
}
