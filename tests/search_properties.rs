//! Properties of the search that hold for any reasonable position

use std::time::{Duration, Instant};

use gomoku::board::{INFINITY, NEG_INFINITY};
use gomoku::config::{EngineConfig, Options};
use gomoku::search::{negamax, SearchContext, Searcher};
use gomoku::{Board, Pos, Stone};

fn no_capture() -> Options {
    Options {
        capture: false,
        capture_win: false,
        ..Options::default()
    }
}

fn context(options: Options, depth: u32) -> SearchContext {
    SearchContext {
        options,
        deadline: Instant::now() + Duration::from_secs(600),
        depth,
        deep_width: 12,
    }
}

fn position(stones: &[(u8, u8)], first: Stone) -> Board {
    let mut board = Board::new(Stone::Black);
    let mut color = first;
    for &(r, c) in stones {
        board.place_stone(Pos::new(r, c), color);
        color = color.opponent();
    }
    board
}

const OPENING: [(u8, u8); 6] = [(9, 9), (9, 10), (10, 10), (8, 8), (10, 9), (11, 8)];

#[test]
fn swapping_colors_mirrors_the_score() {
    for depth in 1..=2 {
        let mut original = position(&OPENING, Stone::Black);
        let mut swapped = position(&OPENING, Stone::White);
        let ctx = context(no_capture(), depth);

        let white = negamax(&mut original, depth, NEG_INFINITY, INFINITY, Stone::White, &ctx).unwrap();
        let black = negamax(&mut swapped, depth, NEG_INFINITY, INFINITY, Stone::Black, &ctx).unwrap();
        assert!(white.is_some());
        assert_eq!(white, black, "depth {depth}");
    }
}

#[test]
fn winning_move_scores_above_infinity() {
    // White to move with four in a row on row 3
    let mut board = Board::new(Stone::White);
    for col in 3..7 {
        board.place_stone(Pos::new(3, col), Stone::White);
    }
    board.place_stone(Pos::new(12, 12), Stone::Black);
    board.place_stone(Pos::new(13, 13), Stone::Black);

    let ctx = context(no_capture(), 2);
    let score = negamax(&mut board, 2, NEG_INFINITY, INFINITY, Stone::White, &ctx)
        .unwrap()
        .unwrap();
    assert!(score > INFINITY, "score {score}");
}

#[test]
fn search_fills_priority_on_a_fresh_position() {
    let searcher = Searcher::with_seed(small_config(), 5).unwrap();
    let board = position(&OPENING, Stone::Black);
    // Stones placed directly leave the priority grid unfilled
    let choice = searcher
        .choose_move(&board, Stone::Black, &Options::default(), Duration::from_secs(5))
        .unwrap();
    assert!(board.is_empty(choice.pos));
}

fn small_config() -> EngineConfig {
    EngineConfig {
        depth: 2,
        thread_count: 2,
        initial_width: 20,
        deep_width: 10,
        ..EngineConfig::default()
    }
}

#[test]
fn same_seed_same_choice() {
    let board = position(&OPENING, Stone::Black);
    let options = Options::default();

    let a = Searcher::with_seed(small_config(), 99).unwrap();
    let b = Searcher::with_seed(small_config(), 99).unwrap();
    let first = a
        .choose_move(&board, Stone::Black, &options, Duration::from_secs(30))
        .unwrap();
    let second = b
        .choose_move(&board, Stone::Black, &options, Duration::from_secs(30))
        .unwrap();

    assert!(!first.timed_out && !second.timed_out);
    assert_eq!(first.pos, second.pos);
    assert_eq!(first.score, second.score);
}

#[test]
fn search_respects_the_budget() {
    let config = EngineConfig {
        depth: 9,
        thread_count: 2,
        ..EngineConfig::default()
    };
    let searcher = Searcher::with_seed(config, 11).unwrap();
    let board = position(&OPENING, Stone::Black);

    let start = Instant::now();
    let choice = searcher
        .choose_move(&board, Stone::Black, &Options::default(), Duration::from_millis(200))
        .unwrap();

    // One leaf evaluation past the deadline per worker at most
    assert!(start.elapsed() < Duration::from_secs(3), "took {:?}", start.elapsed());
    assert!(board.is_empty(choice.pos));
}

#[test]
fn candidates_are_never_occupied_or_forbidden() {
    let searcher = Searcher::with_seed(small_config(), 3).unwrap();
    let options = Options::default();

    let mut board = Board::new(Stone::Black);
    let mut mover = Stone::Black;
    for _ in 0..12 {
        board.fill_taboo(options.double_three, mover);
        let before = board.clone();
        let choice = searcher
            .choose_move(&board, mover, &options, Duration::from_secs(5))
            .unwrap();
        assert!(before.is_empty(choice.pos));
        assert!(!before.is_taboo(choice.pos));

        board = Board::derive(&board, choice.pos, mover, &options);
        if board.is_terminal() {
            break;
        }
        mover = mover.opponent();
    }
}
