//! Move-ordering priority grid
//!
//! Every stone radiates weight into the empty cells along its 8 directions.
//! Weight grows by 8x for each friendly stone crossed, so cells extending long
//! runs rank first. With captures enabled, cells that would take a pair get a
//! flat bonus. Taboo cells keep their mark and never receive weight.

use crate::board::{Board, MoveScore, Pos, Stone, ALL_DIRECTIONS, BOARD_SIZE, CAPTURE_PRIORITY};
use crate::config::Options;

/// Line walks stop this many cells out, exclusive
const REACH: i32 = 5;

/// Accumulate priority from every stone on the board.
pub fn fill_priority(board: &mut Board, options: &Options) {
    for pos in Pos::all() {
        let color = board.get(pos);
        if color == Stone::Empty {
            continue;
        }

        let (row, col) = (pos.row as i32, pos.col as i32);
        for &(dr, dc) in &ALL_DIRECTIONS {
            fill_priority_dir(board, row, col, dr, dc, color);
        }

        if options.capture {
            let enemy = color.opponent();
            for &(dr, dc) in &ALL_DIRECTIONS {
                fill_capture_priority_dir(board, pos, dr, dc, enemy);
            }
        }
    }
}

#[inline]
fn add_priority(board: &mut Board, row: i32, col: i32, value: i32) {
    let cell = &mut board.priority[row as usize][col as usize];
    if *cell >= 0 {
        *cell += value;
    }
}

/// Walk away from the stone at (row, col), then walk back.
///
/// Outward, each empty cell gets the current weight and each friendly stone
/// multiplies it by 8; an enemy stone ends the walk. Inward, every empty cell
/// passed gets a quarter of the final weight.
fn fill_priority_dir(board: &mut Board, row: i32, col: i32, dr: i32, dc: i32, color: Stone) {
    let n = BOARD_SIZE as i32;
    let end_r = (row + REACH * dr).clamp(-1, n);
    let end_c = (col + REACH * dc).clamp(-1, n);

    let mut value: i32 = 1;
    let mut count = 0;
    let (mut r, mut c) = (row + dr, col + dc);

    while (dc == 0 || c != end_c) && (dr == 0 || r != end_r) {
        let square = board.at(r, c);
        if square == color {
            value <<= 3;
        } else if square == Stone::Empty {
            add_priority(board, r, c, value);
        } else {
            count += 1;
            break;
        }
        r += dr;
        c += dc;
        count += 1;
    }

    value >>= 2;
    while count > 0 {
        count -= 1;
        r -= dr;
        c -= dc;
        if board.at(r, c) == Stone::Empty {
            add_priority(board, r, c, value);
        }
    }
}

/// Bonus for the cell 3 steps away when the 2 in between hold `enemy`.
fn fill_capture_priority_dir(board: &mut Board, pos: Pos, dr: i32, dc: i32, enemy: Stone) {
    let Some(end) = pos.offset(dr, dc, 3) else {
        return;
    };
    let (row, col) = (pos.row as i32, pos.col as i32);

    if board.at(row + dr, col + dc) == enemy
        && board.at(row + 2 * dr, col + 2 * dc) == enemy
        && board.is_empty(end)
    {
        add_priority(board, end.row as i32, end.col as i32, CAPTURE_PRIORITY);
    }
}

/// Highest-priority empty cell. Score is -1 when no cell has weight.
pub fn best_priority(board: &Board) -> MoveScore {
    let mut best = MoveScore::new(-1, Pos::default());
    for pos in Pos::all() {
        let p = board.priority(pos) as i64;
        if board.is_empty(pos) && p > best.score {
            best = MoveScore::new(p, pos);
        }
    }
    best
}
