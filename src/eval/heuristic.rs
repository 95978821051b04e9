//! Heuristic evaluation function for Gomoku board positions
//!
//! Scores are always from White's point of view: positive favours White,
//! negative favours Black. The search multiplies by the mover's sign.
//!
//! The evaluation combines:
//! - Open-line potential of every stone (exponential in run length)
//! - Capture counts (2^(captures/2) per side)
//! - A large skew toward the owner of a pending five-in-a-row

use crate::board::{Board, Pos, Score, Stone, ALL_DIRECTIONS, BOARD_SIZE, INFINITY};

/// Line scans stop this many cells out, exclusive
const REACH: i32 = 5;

/// Open-line potential of the whole board, White total minus Black total.
///
/// For each stone and direction, every empty cell within reach adds the current
/// weight, every friendly stone multiplies it by 8 and an enemy stone ends the
/// line. A quarter of the final weight is then added per empty cell seen.
#[must_use]
pub fn fill_score(board: &Board) -> Score {
    let mut score: Score = 0;

    for pos in Pos::all() {
        let color = board.get(pos);
        if color == Stone::Empty {
            continue;
        }

        let square_score: Score = ALL_DIRECTIONS
            .iter()
            .map(|&(dr, dc)| line_potential(board, pos, dr, dc, color))
            .sum();

        score += square_score * color.sign();
    }
    score
}

fn line_potential(board: &Board, pos: Pos, dr: i32, dc: i32, color: Stone) -> Score {
    let n = BOARD_SIZE as i32;
    let (row, col) = (pos.row as i32, pos.col as i32);
    let end_r = (row + REACH * dr).clamp(-1, n);
    let end_c = (col + REACH * dc).clamp(-1, n);

    let mut value: Score = 1;
    let mut empty_count: Score = 0;
    let mut total: Score = 0;
    let (mut r, mut c) = (row + dr, col + dc);

    while (dc == 0 || c != end_c) && (dr == 0 || r != end_r) {
        let square = board.at(r, c);
        if square == Stone::Empty {
            total += value;
            empty_count += 1;
        } else if square == color {
            value <<= 3;
        } else {
            break;
        }
        r += dr;
        c += dc;
    }

    value >>= 2;
    total + value * empty_count
}

/// Static evaluation of `board`, White positive.
///
/// # Arguments
/// * `board` - Position to evaluate
/// * `consider_capture` - Fold in the capture counts of both sides
#[must_use]
pub fn score(board: &Board, consider_capture: bool) -> Score {
    let mut score = fill_score(board);

    if consider_capture {
        score += 1 << (board.captured_by_white() / 2);
        score -= 1 << (board.captured_by_black() / 2);
    }

    match board.pending_alignment().map(|p| p.owner) {
        Some(Stone::White) => score += INFINITY / 2,
        Some(Stone::Black) => score -= INFINITY / 2,
        _ => {}
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PendingAlignment;

    fn setup_board(stones: &[(u8, u8, Stone)]) -> Board {
        let mut board = Board::new(Stone::Black);
        for &(r, c, s) in stones {
            board.place_stone(Pos::new(r, c), s);
        }
        board
    }

    #[test]
    fn test_evaluate_empty_board() {
        let board = Board::new(Stone::Black);
        assert_eq!(fill_score(&board), 0);
        assert_eq!(score(&board, true), 0);
    }

    #[test]
    fn test_single_stone_values() {
        // 8 open directions of 4 cells each
        let center = setup_board(&[(9, 9, Stone::Black)]);
        assert_eq!(fill_score(&center), -32);

        // Corner: only 3 directions lead onto the board
        let corner = setup_board(&[(0, 0, Stone::White)]);
        assert_eq!(fill_score(&corner), 12);
    }

    #[test]
    fn test_evaluate_symmetry() {
        let board = setup_board(&[
            (9, 9, Stone::Black),
            (9, 10, Stone::Black),
            (10, 10, Stone::White),
            (8, 8, Stone::White),
            (7, 9, Stone::Black),
        ]);
        assert_eq!(fill_score(&board), -fill_score(&board.color_swapped()));
    }

    #[test]
    fn test_longer_runs_score_higher() {
        let two = setup_board(&[(9, 8, Stone::White), (9, 9, Stone::White)]);
        let three = setup_board(&[
            (9, 7, Stone::White),
            (9, 8, Stone::White),
            (9, 9, Stone::White),
        ]);
        assert!(fill_score(&three) > fill_score(&two));
        assert!(fill_score(&two) > 2 * 32);
    }

    #[test]
    fn test_blocked_line_scores_lower() {
        let open = setup_board(&[(9, 8, Stone::Black), (9, 9, Stone::Black)]);
        let blocked = setup_board(&[
            (9, 7, Stone::White),
            (9, 8, Stone::Black),
            (9, 9, Stone::Black),
        ]);
        let white_alone = setup_board(&[(9, 7, Stone::White)]);

        // Remove the blocker's own contribution before comparing Black's potential
        let black_blocked = fill_score(&blocked) - fill_score(&white_alone);
        assert!(black_blocked > fill_score(&open));
    }

    #[test]
    fn test_evaluate_captures_matter() {
        let mut board = Board::new(Stone::Black);
        board.add_captures(Stone::White, 4);

        // White removed 4 stones: 2^2 - 2^0
        assert_eq!(score(&board, true), 3);
        assert_eq!(score(&board, false), 0);

        board.add_captures(Stone::Black, 8);
        assert_eq!(score(&board, true), 4 - 16);
    }

    #[test]
    fn test_pending_alignment_skews_score() {
        let mut board = setup_board(&[(9, 9, Stone::White)]);
        let base = score(&board, false);

        board.pending_alignment = Some(PendingAlignment {
            owner: Stone::White,
            pos: Pos::new(9, 9),
        });
        assert_eq!(score(&board, false), base + INFINITY / 2);

        board.pending_alignment = Some(PendingAlignment {
            owner: Stone::Black,
            pos: Pos::new(9, 9),
        });
        assert_eq!(score(&board, false), base - INFINITY / 2);
    }
}
