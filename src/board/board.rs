//! Position snapshot with capture tracking, priority grid and cached victory

use super::{Pos, Score, Stone, BOARD_SIZE, TABOO, TOTAL_CELLS};
use crate::config::Options;
use crate::eval::{heuristic, priority};
use crate::rules::{capture, forbidden, win};

/// How a game ended. `Ongoing` means the position is not terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VictoryKind {
    #[default]
    Ongoing,
    Aligned,
    Captured,
    Stalemate,
}

/// Victory result cached on every board at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VictoryState {
    /// Winning color, `Stone::Empty` when nobody won
    pub victor: Stone,
    pub kind: VictoryKind,
}

impl VictoryState {
    pub fn won(victor: Stone, kind: VictoryKind) -> Self {
        Self { victor, kind }
    }

    pub fn stalemate() -> Self {
        Self {
            victor: Stone::Empty,
            kind: VictoryKind::Stalemate,
        }
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.kind != VictoryKind::Ongoing
    }
}

/// Five-in-a-row waiting one ply for confirmation (captures may still break it)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAlignment {
    pub owner: Stone,
    pub pos: Pos,
}

/// Candidate move with its ordering score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveScore {
    pub score: Score,
    pub pos: Pos,
}

impl MoveScore {
    #[inline]
    pub fn new(score: Score, pos: Pos) -> Self {
        Self { score, pos }
    }
}

/// Fixed-size candidate buffer, large enough for every cell of the board
pub type MoveBuffer = [MoveScore; TOTAL_CELLS];

/// Allocate an empty candidate buffer
#[inline]
pub fn move_buffer() -> MoveBuffer {
    [MoveScore::default(); TOTAL_CELLS]
}

/// Game position.
///
/// A board is built once, either empty or from a parent plus one move, and is
/// never modified afterwards except for its priority grid, which callers must
/// fill explicitly before enumerating children.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pub(crate) cells: [[Stone; BOARD_SIZE]; BOARD_SIZE],
    pub(crate) priority: [[i32; BOARD_SIZE]; BOARD_SIZE],
    pub(crate) priority_ready: bool,
    /// White stones removed by Black
    captured_by_black: u32,
    /// Black stones removed by White
    captured_by_white: u32,
    stones: u16,
    turn_number: u32,
    /// Color that plays the next derived board
    turn: Stone,
    pub(crate) pending_alignment: Option<PendingAlignment>,
    victory: VictoryState,
}

impl Board {
    /// Empty starting position. `first` moves first; only the center is a candidate.
    pub fn new(first: Stone) -> Self {
        let mut priority = [[0; BOARD_SIZE]; BOARD_SIZE];
        priority[Pos::CENTER.row as usize][Pos::CENTER.col as usize] = 1;
        Self {
            cells: [[Stone::Empty; BOARD_SIZE]; BOARD_SIZE],
            priority,
            priority_ready: false,
            captured_by_black: 0,
            captured_by_white: 0,
            stones: 0,
            turn_number: 0,
            turn: first,
            pending_alignment: None,
            victory: VictoryState::default(),
        }
    }

    /// Build the position reached when `mover` plays `pos` on `parent`.
    ///
    /// Copies the grid and counters (not the priority grid), places the stone,
    /// resolves captures and computes the victory state. The target cell must be
    /// empty; checking that is the caller's job.
    pub fn derive(parent: &Board, pos: Pos, mover: Stone, options: &Options) -> Board {
        debug_assert!(parent.is_empty(pos), "derive onto occupied cell {pos}");
        debug_assert!(mover != Stone::Empty);

        let mut board = Board {
            cells: parent.cells,
            priority: [[0; BOARD_SIZE]; BOARD_SIZE],
            priority_ready: false,
            captured_by_black: parent.captured_by_black,
            captured_by_white: parent.captured_by_white,
            stones: parent.stones,
            turn_number: parent.turn_number + 1,
            turn: mover.opponent(),
            pending_alignment: parent.pending_alignment,
            victory: VictoryState::default(),
        };

        board.place_stone(pos, mover);

        if options.capture {
            let pairs = capture::play_capture(&mut board, pos);
            board.add_captures(mover, 2 * pairs);
        }

        board.victory = win::resolve_victory(&mut board, pos, mover, options);
        board
    }

    #[inline]
    pub fn size(&self) -> usize {
        BOARD_SIZE
    }

    /// Get stone at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Stone {
        self.cells[pos.row as usize][pos.col as usize]
    }

    /// Unchecked access by signed coordinates, for line scans already clamped to the board
    #[inline]
    pub(crate) fn at(&self, row: i32, col: i32) -> Stone {
        self.cells[row as usize][col as usize]
    }

    /// Check if position is empty
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.get(pos) == Stone::Empty
    }

    /// Place a stone without capture or victory processing (position setup).
    /// Use `derive` for game moves.
    pub fn place_stone(&mut self, pos: Pos, stone: Stone) {
        let cell = &mut self.cells[pos.row as usize][pos.col as usize];
        match (*cell == Stone::Empty, stone == Stone::Empty) {
            (true, false) => self.stones += 1,
            (false, true) => self.stones -= 1,
            _ => {}
        }
        *cell = stone;
    }

    /// Remove a stone
    #[inline]
    pub(crate) fn remove_stone(&mut self, pos: Pos) {
        self.place_stone(pos, Stone::Empty);
    }

    /// Heuristic weight of a cell; `TABOO` marks a forbidden cell
    #[inline]
    pub fn priority(&self, pos: Pos) -> i32 {
        self.priority[pos.row as usize][pos.col as usize]
    }

    #[inline]
    pub fn is_taboo(&self, pos: Pos) -> bool {
        self.priority(pos) < 0
    }

    /// Enemy stones removed by `stone`
    #[inline]
    pub fn captures(&self, stone: Stone) -> u32 {
        match stone {
            Stone::Black => self.captured_by_black,
            Stone::White => self.captured_by_white,
            Stone::Empty => 0,
        }
    }

    #[inline]
    pub fn captured_by_black(&self) -> u32 {
        self.captured_by_black
    }

    #[inline]
    pub fn captured_by_white(&self) -> u32 {
        self.captured_by_white
    }

    /// Credit `count` removed stones to `stone`
    #[inline]
    pub fn add_captures(&mut self, stone: Stone, count: u32) {
        match stone {
            Stone::Black => self.captured_by_black += count,
            Stone::White => self.captured_by_white += count,
            Stone::Empty => {}
        }
    }

    /// Plies played to reach this position
    #[inline]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Color to move next
    #[inline]
    pub fn turn(&self) -> Stone {
        self.turn
    }

    #[inline]
    pub fn victory(&self) -> VictoryState {
        self.victory
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.victory.is_over()
    }

    #[inline]
    pub fn pending_alignment(&self) -> Option<PendingAlignment> {
        self.pending_alignment
    }

    /// Whether a five-in-a-row is waiting for confirmation
    #[inline]
    pub fn is_flagged_final(&self) -> bool {
        self.pending_alignment.is_some()
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> u32 {
        self.stones as u32
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.stones as usize == TOTAL_CELLS
    }

    /// Mark cells where `player` would form a double free-three
    pub fn fill_taboo(&mut self, double_three: bool, player: Stone) {
        forbidden::fill_taboo(self, double_three, player);
    }

    /// Accumulate move-ordering weights. Runs once per board.
    pub fn fill_priority(&mut self, options: &Options) {
        if self.priority_ready {
            return;
        }
        priority::fill_priority(self, options);
        self.priority_ready = true;
    }

    /// Highest-priority empty cell, used for move suggestions
    pub fn best_priority(&self) -> MoveScore {
        priority::best_priority(self)
    }

    /// Collect empty cells with positive priority into `buffer`, best first.
    ///
    /// Returns how many of them to expand: at most `count`. A return value of zero
    /// on a live position means the priority grid was never filled.
    pub fn children(&self, buffer: &mut MoveBuffer, count: usize) -> usize {
        let mut len = 0;
        for pos in Pos::all() {
            if self.is_empty(pos) {
                let p = self.priority(pos);
                if p > 0 {
                    buffer[len] = MoveScore::new(p as Score, pos);
                    len += 1;
                }
            }
        }

        buffer[..len].sort_unstable_by(|a, b| b.score.cmp(&a.score));
        len.min(count)
    }

    /// Whether any line holds `size` consecutive stones of one color
    pub fn is_aligned_stone(&self, size: i32) -> bool {
        win::is_aligned_stone(self, size)
    }

    /// Raw open-line potential, White minus Black
    pub fn fill_score(&self) -> Score {
        heuristic::fill_score(self)
    }

    /// Static evaluation from White's point of view
    pub fn score(&self, consider_capture: bool) -> Score {
        heuristic::score(self, consider_capture)
    }

    /// Same position with colors, counters and pending flag swapped
    #[cfg(test)]
    pub(crate) fn color_swapped(&self) -> Board {
        let mut swapped = self.clone();
        for pos in Pos::all() {
            let stone = self.get(pos);
            swapped.cells[pos.row as usize][pos.col as usize] = stone.opponent();
        }
        swapped.captured_by_black = self.captured_by_white;
        swapped.captured_by_white = self.captured_by_black;
        swapped.turn = self.turn.opponent();
        swapped.pending_alignment = self.pending_alignment.map(|p| PendingAlignment {
            owner: p.owner.opponent(),
            pos: p.pos,
        });
        swapped.victory = VictoryState {
            victor: self.victory.victor.opponent(),
            kind: self.victory.kind,
        };
        swapped
    }

    #[cfg(test)]
    pub(crate) fn set_priority(&mut self, pos: Pos, value: i32) {
        self.priority[pos.row as usize][pos.col as usize] = value;
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(Stone::Black)
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "   ")?;
        for col in 0..BOARD_SIZE {
            write!(f, " {}", (b'A' + col as u8) as char)?;
        }
        writeln!(f)?;
        for row in 0..BOARD_SIZE {
            write!(f, "{:>3}", BOARD_SIZE - row)?;
            for col in 0..BOARD_SIZE {
                let symbol = match self.cells[row][col] {
                    Stone::Black => 'X',
                    Stone::White => 'O',
                    Stone::Empty if self.priority[row][col] == TABOO => '#',
                    Stone::Empty => '.',
                };
                write!(f, " {symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
