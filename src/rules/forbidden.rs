//! Double-three forbidden move rules for Gomoku
//!
//! A double-three is a move that creates two or more free-threes at once.
//! Free-three here means a 6-cell window on a line through the cell whose two
//! ends are empty, holding no enemy stone and exactly 4 empty cells (the
//! candidate cell included), so 2 friendly stones sit beside the candidate.
//!
//! Forbidden cells are written into the board's priority grid as `TABOO`.

use crate::board::{Board, Pos, Stone, BOARD_SIZE, LINE_DIRECTIONS, TABOO};

/// Window length for free-three detection
const WINDOW: usize = 6;

/// Check one line through `pos` for a free-three window.
///
/// Scans from 4 cells behind to 4 cells ahead of `pos`, clamped to the board,
/// keeping the last 6 cells in a ring buffer.
pub fn check_free_three(board: &Board, pos: Pos, dr: i32, dc: i32, enemy: Stone) -> bool {
    let n = BOARD_SIZE as i32;

    let mut r = pos.row as i32 - 4 * dr;
    let mut c = pos.col as i32 - 4 * dc;
    let mut end_r = pos.row as i32 + 5 * dr;
    let mut end_c = pos.col as i32 + 5 * dc;

    while !Pos::is_valid(r, c) {
        r += dr;
        c += dc;
    }
    while end_r < -1 || end_c < -1 || end_r > n || end_c > n {
        end_r -= dr;
        end_c -= dc;
    }

    let mut window = [Stone::Empty; WINDOW];
    let mut index = 0;
    let mut wrapped = false;

    while (dc == 0 || c != end_c) && (dr == 0 || r != end_r) {
        let cell = board.at(r, c);
        window[index] = cell;
        index += 1;
        if index == WINDOW {
            index = 0;
            wrapped = true;
        }

        // window[index] is now the oldest cell of the current window
        if wrapped && cell == Stone::Empty && window[index] == Stone::Empty {
            let mut empties = 0;
            let mut blocked = false;
            for &stone in &window {
                if stone == enemy {
                    blocked = true;
                    break;
                }
                if stone == Stone::Empty {
                    empties += 1;
                }
            }
            if !blocked && empties == 4 {
                return true;
            }
        }

        r += dr;
        c += dc;
    }
    false
}

/// Check whether playing `pos` gives `player` two or more free-threes.
pub fn is_double_three(board: &Board, pos: Pos, player: Stone) -> bool {
    let enemy = player.opponent();
    let mut count = 0;

    for &(dr, dc) in &LINE_DIRECTIONS {
        if check_free_three(board, pos, dr, dc, enemy) {
            count += 1;
            if count >= 2 {
                return true;
            }
        }
    }
    false
}

/// Mark every empty cell that would be a double-three for `player` as `TABOO`.
///
/// Does nothing when the rule is disabled.
pub fn fill_taboo(board: &mut Board, double_three: bool, player: Stone) {
    if !double_three {
        return;
    }

    for pos in Pos::all() {
        if board.is_empty(pos) && is_double_three(board, pos, player) {
            board.priority[pos.row as usize][pos.col as usize] = TABOO;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_board(stones: &[(u8, u8, Stone)]) -> Board {
        let mut board = Board::new(Stone::Black);
        for &(r, c, s) in stones {
            board.place_stone(Pos::new(r, c), s);
        }
        board
    }

    #[test]
    fn test_empty_board_has_no_free_three() {
        let board = Board::new(Stone::Black);
        for pos in Pos::all() {
            for &(dr, dc) in &LINE_DIRECTIONS {
                assert!(!check_free_three(&board, pos, dr, dc, Stone::White));
            }
        }
    }

    #[test]
    fn test_single_free_three_is_allowed() {
        // _ B B _ _ _ around (9,9)
        let mut board = setup_board(&[(9, 7, Stone::Black), (9, 8, Stone::Black)]);
        assert!(check_free_three(&board, Pos::new(9, 9), 0, 1, Stone::White));
        assert!(!is_double_three(&board, Pos::new(9, 9), Stone::Black));

        fill_taboo(&mut board, true, Stone::Black);
        assert!(!board.is_taboo(Pos::new(9, 9)));
    }

    #[test]
    fn test_double_three_is_taboo() {
        let mut board = setup_board(&[
            (9, 7, Stone::Black),
            (9, 8, Stone::Black),
            (7, 9, Stone::Black),
            (8, 9, Stone::Black),
        ]);
        assert!(is_double_three(&board, Pos::new(9, 9), Stone::Black));

        fill_taboo(&mut board, true, Stone::Black);
        assert!(board.is_taboo(Pos::new(9, 9)));
        assert_eq!(board.priority(Pos::new(9, 9)), TABOO);
    }

    #[test]
    fn test_rule_disabled_marks_nothing() {
        let mut board = setup_board(&[
            (9, 7, Stone::Black),
            (9, 8, Stone::Black),
            (7, 9, Stone::Black),
            (8, 9, Stone::Black),
        ]);
        fill_taboo(&mut board, false, Stone::Black);
        assert!(Pos::all().all(|p| !board.is_taboo(p)));
    }

    #[test]
    fn test_taboo_is_per_player() {
        // Same shape in White: forbidden for White, not for Black
        let stones = [
            (9, 7, Stone::White),
            (9, 8, Stone::White),
            (7, 9, Stone::White),
            (8, 9, Stone::White),
        ];

        let mut board = setup_board(&stones);
        fill_taboo(&mut board, true, Stone::Black);
        assert!(!board.is_taboo(Pos::new(9, 9)));

        let mut board = setup_board(&stones);
        fill_taboo(&mut board, true, Stone::White);
        assert!(board.is_taboo(Pos::new(9, 9)));
    }

    #[test]
    fn test_enemy_stone_blocks_free_three() {
        // W B B _ _ _ with W right behind: the only open windows hold the enemy
        let board = setup_board(&[
            (9, 6, Stone::White),
            (9, 7, Stone::Black),
            (9, 8, Stone::Black),
            (9, 12, Stone::White),
        ]);
        assert!(!check_free_three(&board, Pos::new(9, 9), 0, 1, Stone::White));
    }

    #[test]
    fn test_free_three_near_every_edge() {
        // Two friendly stones right after the candidate. A free-three window
        // exists iff offsets -2..=3 or -1..=4 fit on the board.
        let fits = |pos: Pos, dr: i32, dc: i32, from: i32, to: i32| {
            (from..=to).all(|k| pos.offset(dr, dc, k).is_some())
        };

        for pos in Pos::all() {
            for &(dr, dc) in &LINE_DIRECTIONS {
                let (Some(a), Some(b)) = (pos.offset(dr, dc, 1), pos.offset(dr, dc, 2)) else {
                    continue;
                };
                let mut board = Board::new(Stone::Black);
                board.place_stone(a, Stone::Black);
                board.place_stone(b, Stone::Black);

                let expected = fits(pos, dr, dc, -2, 3) || fits(pos, dr, dc, -1, 4);
                assert_eq!(
                    check_free_three(&board, pos, dr, dc, Stone::White),
                    expected,
                    "pos {pos} dir ({dr},{dc})"
                );
            }
        }
    }
}
