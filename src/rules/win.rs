//! Win conditions: five-in-a-row, capture win and stalemate
//!
//! With captures enabled a five-in-a-row is not final right away: the opponent
//! gets one reply, and only if that reply does not break the line by capture is
//! the alignment confirmed.

use crate::board::{
    Board, PendingAlignment, Pos, Stone, VictoryKind, VictoryState, BOARD_SIZE,
    CAPTURE_VICTORY_POINTS, LINE_DIRECTIONS,
};
use crate::config::Options;

/// Stones in a row needed to win
pub const WIN_LENGTH: i32 = 5;

/// Check for `size` consecutive `color` stones on the line through (row, col).
///
/// The scan covers `size - 1` cells behind and `size` cells ahead of the
/// origin, clamped to the board so runs never wrap past an edge.
pub fn aligned_in_direction(
    board: &Board,
    row: i32,
    col: i32,
    dr: i32,
    dc: i32,
    color: Stone,
    size: i32,
) -> bool {
    let n = BOARD_SIZE as i32;

    let mut r = row - (size - 1) * dr;
    let mut c = col - (size - 1) * dc;
    let mut end_r = row + size * dr;
    let mut end_c = col + size * dc;

    while !Pos::is_valid(r, c) {
        r += dr;
        c += dc;
    }
    while end_r < -1 || end_c < -1 || end_r > n || end_c > n {
        end_r -= dr;
        end_c -= dc;
    }

    let mut count = 0;
    while (dc == 0 || c != end_c) && (dr == 0 || r != end_r) {
        if board.at(r, c) != color {
            count = 0;
        } else {
            count += 1;
            if count == size {
                return true;
            }
        }
        r += dr;
        c += dc;
    }
    false
}

/// Check whether the stone at `pos` belongs to a run of at least `size`.
pub fn is_aligned_at(board: &Board, pos: Pos, size: i32) -> bool {
    let color = board.get(pos);
    if color == Stone::Empty {
        return false;
    }

    LINE_DIRECTIONS.iter().any(|&(dr, dc)| {
        aligned_in_direction(board, pos.row as i32, pos.col as i32, dr, dc, color, size)
    })
}

/// Check every occupied cell for a run of at least `size`.
pub fn is_aligned_stone(board: &Board, size: i32) -> bool {
    Pos::all().any(|pos| !board.is_empty(pos) && is_aligned_at(board, pos, size))
}

/// Compute the victory state after `mover` played `pos`.
///
/// Only called while a board is being derived; it is the single place where the
/// pending-alignment flag changes.
pub(crate) fn resolve_victory(
    board: &mut Board,
    pos: Pos,
    mover: Stone,
    options: &Options,
) -> VictoryState {
    if options.capture_win {
        if board.captures(Stone::Black) >= CAPTURE_VICTORY_POINTS {
            return VictoryState::won(Stone::Black, VictoryKind::Captured);
        }
        if board.captures(Stone::White) >= CAPTURE_VICTORY_POINTS {
            return VictoryState::won(Stone::White, VictoryKind::Captured);
        }
    }

    // Opponent's five from the previous ply: confirm it, or drop it if broken
    if let Some(pending) = board.pending_alignment {
        if pending.owner == mover.opponent() {
            if is_aligned_at(board, pending.pos, WIN_LENGTH) {
                return VictoryState::won(pending.owner, VictoryKind::Aligned);
            }
            board.pending_alignment = None;
        }
    }

    if is_aligned_at(board, pos, WIN_LENGTH) {
        if options.capture {
            board.pending_alignment = Some(PendingAlignment { owner: mover, pos });
        } else {
            return VictoryState::won(mover, VictoryKind::Aligned);
        }
    }

    if board.is_full() {
        return VictoryState::stalemate();
    }

    VictoryState::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_five() {
        let mut board = Board::new(Stone::Black);
        for col in 3..8 {
            board.place_stone(Pos::new(9, col), Stone::Black);
        }
        assert!(is_aligned_at(&board, Pos::new(9, 3), 5));
        assert!(is_aligned_at(&board, Pos::new(9, 7), 5));
        assert!(is_aligned_stone(&board, 5));
    }

    #[test]
    fn test_four_is_not_five() {
        let mut board = Board::new(Stone::Black);
        for col in 3..7 {
            board.place_stone(Pos::new(9, col), Stone::Black);
        }
        board.place_stone(Pos::new(9, 7), Stone::White);
        assert!(!is_aligned_stone(&board, 5));
        assert!(is_aligned_stone(&board, 4));
    }

    #[test]
    fn test_no_wrap_across_rows() {
        let mut board = Board::new(Stone::Black);
        // Consecutive in row-major order, but split over two rows
        board.place_stone(Pos::new(4, 16), Stone::White);
        board.place_stone(Pos::new(4, 17), Stone::White);
        board.place_stone(Pos::new(4, 18), Stone::White);
        board.place_stone(Pos::new(5, 0), Stone::White);
        board.place_stone(Pos::new(5, 1), Stone::White);
        assert!(!is_aligned_stone(&board, 5));
    }

    #[test]
    fn test_diagonals_touching_corners() {
        let mut board = Board::new(Stone::Black);
        for i in 0..5u8 {
            board.place_stone(Pos::new(14 + i, 14 + i), Stone::Black);
        }
        assert!(is_aligned_at(&board, Pos::new(18, 18), 5));

        let mut board = Board::new(Stone::Black);
        for i in 0..5u8 {
            board.place_stone(Pos::new(i, 18 - i), Stone::White);
        }
        assert!(is_aligned_at(&board, Pos::new(0, 18), 5));
        assert!(is_aligned_at(&board, Pos::new(4, 14), 5));
    }

    #[test]
    fn test_scan_is_safe_from_every_cell() {
        let mut board = Board::new(Stone::Black);
        for pos in Pos::all() {
            board.place_stone(pos, Stone::Black);
        }
        for pos in Pos::all() {
            for &(dr, dc) in &LINE_DIRECTIONS {
                assert!(aligned_in_direction(
                    &board,
                    pos.row as i32,
                    pos.col as i32,
                    dr,
                    dc,
                    Stone::Black,
                    1
                ));
            }
        }
    }

    #[test]
    fn test_empty_cell_is_never_aligned() {
        let board = Board::new(Stone::Black);
        assert!(!is_aligned_at(&board, Pos::CENTER, 1));
        assert!(!is_aligned_stone(&board, 1));
    }
}
