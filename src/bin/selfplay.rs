//! Headless engine-vs-engine games
//!
//! Plays full games in the terminal with both seats on the engine, printing
//! the board after every move along with the static score and search time.
//! A scripted opening can be played first, e.g. `--opening 9,9 --opening 9,10`.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use gomoku::config::{Config, Options};
use gomoku::search::Searcher;
use gomoku::{Game, GameResult, Pos, Stone, VictoryKind, BOARD_SIZE};

#[derive(Parser, Debug)]
#[command(author, version, about = "Engine-vs-engine Gomoku games", long_about = None)]
struct Args {
    /// Number of games to play
    #[arg(short, long, default_value_t = 1)]
    games: u32,

    /// Fixed tie-breaking seed for reproducible games
    #[arg(short, long)]
    seed: Option<u64>,

    /// Use the slow-mode budget and depth
    #[arg(long)]
    slow: bool,

    /// Disable pair capture
    #[arg(long)]
    no_capture: bool,

    /// Disable the 10-capture win
    #[arg(long)]
    no_capture_win: bool,

    /// Allow double-three moves
    #[arg(long)]
    no_double_three: bool,

    /// Moves played before the engine takes over, as `row,col`
    #[arg(long, value_parser = parse_pos)]
    opening: Vec<Pos>,

    /// Configuration file (defaults to Gomoku.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Only print the final position of each game
    #[arg(short, long)]
    quiet: bool,
}

fn parse_pos(text: &str) -> Result<Pos, String> {
    let (row, col) = text
        .split_once(',')
        .ok_or_else(|| format!("expected row,col, got '{text}'"))?;
    let row: i32 = row.trim().parse().map_err(|e| format!("bad row '{row}': {e}"))?;
    let col: i32 = col.trim().parse().map_err(|e| format!("bad column '{col}': {e}"))?;
    if !Pos::is_valid(row, col) {
        return Err(format!("{row},{col} is outside the {BOARD_SIZE}x{BOARD_SIZE} board"));
    }
    Ok(Pos::new(row as u8, col as u8))
}

impl Args {
    fn options(&self, base: Options) -> Options {
        Options {
            capture: base.capture && !self.no_capture,
            capture_win: base.capture_win && !self.no_capture_win && !self.no_capture,
            double_three: base.double_three && !self.no_double_three,
            slow_mode: base.slow_mode || self.slow,
            black_ai: true,
            white_ai: true,
            ..base
        }
    }
}

/// Totals over all games
#[derive(Debug, Default)]
struct Tally {
    black: u32,
    white: u32,
    draws: u32,
    longest_move: Duration,
}

fn play_game(game: &mut Game, opening: &[Pos], quiet: bool, tally: &mut Tally) -> GameResult<()> {
    for &pos in opening {
        if game.play(pos)? {
            break;
        }
    }

    while !game.is_over() {
        let mover = game.turn();
        game.play_ai()?;
        tally.longest_move = tally.longest_move.max(game.time_taken());

        if !quiet {
            let (black, white) = game.captured_counts();
            println!("{}", game.state());
            println!(
                "turn {} | {} searched {:.3}s | score {} | captures B {} W {}",
                game.state().turn_number(),
                mover.name(),
                game.time_taken().as_secs_f64(),
                game.current_score(),
                black,
                white
            );
        }
    }

    let victory = game.victory();
    match victory.victor {
        Stone::Black => tally.black += 1,
        Stone::White => tally.white += 1,
        Stone::Empty => tally.draws += 1,
    }

    println!("{}", game.state());
    let how = match victory.kind {
        VictoryKind::Aligned => "by alignment",
        VictoryKind::Captured => "by captures",
        VictoryKind::Stalemate | VictoryKind::Ongoing => "(board full)",
    };
    println!(
        "{} wins {} after {} plies",
        victory.victor.name(),
        how,
        game.state().turn_number()
    );
    Ok(())
}

fn run(args: &Args) -> GameResult<Tally> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load_or_default(),
    };
    let options = args.options(config.rules);
    info!("Self-play with {:?}", options);

    let searcher = Arc::new(match args.seed {
        Some(seed) => Searcher::with_seed(config.search.clone(), seed)?,
        None => Searcher::new(config.search.clone())?,
    });

    let mut tally = Tally::default();
    for index in 1..=args.games {
        println!("=== Game {} of {} ===", index, args.games);
        let mut game = Game::with_searcher(options, Arc::clone(&searcher));
        play_game(&mut game, &args.opening, args.quiet, &mut tally)?;
    }
    Ok(tally)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match run(&args) {
        Ok(tally) => {
            println!(
                "Black {} | White {} | Draws {} | slowest move {:.3}s",
                tally.black,
                tally.white,
                tally.draws,
                tally.longest_move.as_secs_f64()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Self-play failed: {}", e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
