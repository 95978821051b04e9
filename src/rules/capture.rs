//! Capture rules for Ninuki-renju (Pente-style pair capture)
//!
//! Capture pattern: X-O-O-X where the first X is the stone just placed and
//! O is the opponent's stone. Only exactly 2 stones can be captured, and
//! several directions may capture at once.

use crate::board::{Board, Pos, Stone, ALL_DIRECTIONS};

/// Check whether the stone at `pos` closes an X-O-O-X line toward (dr, dc).
#[inline]
pub fn captures_in_direction(board: &Board, pos: Pos, dr: i32, dc: i32) -> bool {
    let stone = board.get(pos);
    if stone == Stone::Empty {
        return false;
    }

    // Farthest cell must be on the board; the two in between then are too
    let Some(end) = pos.offset(dr, dc, 3) else {
        return false;
    };

    let enemy = stone.opponent();
    let row = pos.row as i32;
    let col = pos.col as i32;

    board.at(row + dr, col + dc) == enemy
        && board.at(row + 2 * dr, col + 2 * dc) == enemy
        && board.get(end) == stone
}

/// Remove every pair closed by the stone at `pos`.
///
/// # Returns
/// Number of pairs removed (0 to 8)
pub fn play_capture(board: &mut Board, pos: Pos) -> u32 {
    let mut pairs = 0;

    for &(dr, dc) in &ALL_DIRECTIONS {
        if captures_in_direction(board, pos, dr, dc) {
            for step in 1..=2 {
                if let Some(captured) = pos.offset(dr, dc, step) {
                    board.remove_stone(captured);
                }
            }
            pairs += 1;
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_horizontal() {
        let mut board = Board::new(Stone::Black);
        // Setup: B _ W W B  (B places at _, captures W W)
        board.place_stone(Pos::new(9, 5), Stone::Black);
        board.place_stone(Pos::new(9, 7), Stone::White);
        board.place_stone(Pos::new(9, 8), Stone::White);
        board.place_stone(Pos::new(9, 9), Stone::Black);

        board.place_stone(Pos::new(9, 6), Stone::Black);
        let pairs = play_capture(&mut board, Pos::new(9, 6));

        assert_eq!(pairs, 1);
        assert!(board.is_empty(Pos::new(9, 7)));
        assert!(board.is_empty(Pos::new(9, 8)));
        assert_eq!(board.get(Pos::new(9, 9)), Stone::Black);
        assert_eq!(board.stone_count(), 3);
    }

    #[test]
    fn test_capture_vertical() {
        let mut board = Board::new(Stone::Black);
        board.place_stone(Pos::new(7, 9), Stone::White);
        board.place_stone(Pos::new(8, 9), Stone::White);
        board.place_stone(Pos::new(9, 9), Stone::Black);

        board.place_stone(Pos::new(6, 9), Stone::Black);
        assert_eq!(play_capture(&mut board, Pos::new(6, 9)), 1);
        assert!(board.is_empty(Pos::new(7, 9)));
        assert!(board.is_empty(Pos::new(8, 9)));
    }

    #[test]
    fn test_capture_diagonal_sw() {
        let mut board = Board::new(Stone::Black);
        // Diagonal ↙ capture
        board.place_stone(Pos::new(5, 9), Stone::Black);
        board.place_stone(Pos::new(6, 8), Stone::White);
        board.place_stone(Pos::new(7, 7), Stone::White);
        board.place_stone(Pos::new(8, 6), Stone::Black);

        assert!(captures_in_direction(&board, Pos::new(5, 9), 1, -1));
        assert!(captures_in_direction(&board, Pos::new(8, 6), -1, 1));
        assert!(!captures_in_direction(&board, Pos::new(5, 9), 1, 1));
    }

    #[test]
    fn test_double_capture_from_one_stone() {
        let mut board = Board::new(Stone::Black);
        // Left: B W W _ ; Up: B / W / W / _
        board.place_stone(Pos::new(9, 6), Stone::Black);
        board.place_stone(Pos::new(9, 7), Stone::White);
        board.place_stone(Pos::new(9, 8), Stone::White);
        board.place_stone(Pos::new(6, 9), Stone::Black);
        board.place_stone(Pos::new(7, 9), Stone::White);
        board.place_stone(Pos::new(8, 9), Stone::White);

        board.place_stone(Pos::new(9, 9), Stone::Black);
        assert_eq!(play_capture(&mut board, Pos::new(9, 9)), 2);
        assert_eq!(board.stone_count(), 3);
    }

    #[test]
    fn test_no_capture_of_three() {
        let mut board = Board::new(Stone::Black);
        // B W W W B - three stones are never captured
        board.place_stone(Pos::new(9, 5), Stone::Black);
        board.place_stone(Pos::new(9, 6), Stone::White);
        board.place_stone(Pos::new(9, 7), Stone::White);
        board.place_stone(Pos::new(9, 8), Stone::White);

        board.place_stone(Pos::new(9, 9), Stone::Black);
        assert_eq!(play_capture(&mut board, Pos::new(9, 9)), 0);
        assert_eq!(board.stone_count(), 5);
    }

    #[test]
    fn test_moving_into_flanked_pair_is_safe() {
        let mut board = Board::new(Stone::Black);
        // B W _ B: White completes W W between two blacks, nothing is captured
        board.place_stone(Pos::new(9, 5), Stone::Black);
        board.place_stone(Pos::new(9, 6), Stone::White);
        board.place_stone(Pos::new(9, 8), Stone::Black);

        board.place_stone(Pos::new(9, 7), Stone::White);
        assert_eq!(play_capture(&mut board, Pos::new(9, 7)), 0);
        assert_eq!(board.stone_count(), 4);
    }

    #[test]
    fn test_capture_at_board_edge() {
        let mut board = Board::new(Stone::Black);
        // Pattern running into the edge: B W W | (off board)
        board.place_stone(Pos::new(0, 16), Stone::Black);
        board.place_stone(Pos::new(0, 17), Stone::White);
        board.place_stone(Pos::new(0, 18), Stone::White);
        assert!(!captures_in_direction(&board, Pos::new(0, 16), 0, 1));

        // Same pattern ending exactly on the last column captures
        board.place_stone(Pos::new(1, 15), Stone::Black);
        board.place_stone(Pos::new(1, 16), Stone::White);
        board.place_stone(Pos::new(1, 17), Stone::White);
        board.place_stone(Pos::new(1, 18), Stone::Black);
        assert!(captures_in_direction(&board, Pos::new(1, 15), 0, 1));
    }
}
