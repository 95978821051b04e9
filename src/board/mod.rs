//! Board representation for Gomoku

pub mod board;


// Re-exports
pub use board::{
    move_buffer, Board, MoveBuffer, MoveScore, PendingAlignment, VictoryKind, VictoryState,
};

/// Board size (19x19)
pub const BOARD_SIZE: usize = 19;
pub const TOTAL_CELLS: usize = BOARD_SIZE * BOARD_SIZE; // 361

/// Score type shared by evaluation and search
pub type Score = i64;

/// Positive infinity for search bounds. Kept well below `i64::MAX` so that
/// `INFINITY + depth` and negation never overflow.
pub const INFINITY: Score = Score::MAX / 4;
pub const NEG_INFINITY: Score = -INFINITY;

/// Captured stones needed for a capture win (5 pairs)
pub const CAPTURE_VICTORY_POINTS: u32 = 10;

/// Flat priority bonus for a cell that would capture a pair
pub const CAPTURE_PRIORITY: i32 = 50;

/// Priority value marking a forbidden (double free-three) cell
pub const TABOO: i32 = -1;

/// All 8 scan directions as (row, col) deltas
pub(crate) const ALL_DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// The 4 line orientations (one per axis)
pub(crate) const LINE_DIRECTIONS: [(i32, i32); 4] = [
    (0, 1),  // Horizontal
    (1, 1),  // Diagonal SE
    (1, 0),  // Vertical
    (1, -1), // Diagonal SW
];

/// Cell state, doubling as player color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stone {
    #[default]
    Empty,
    Black,
    White,
}

impl Stone {
    /// Get opponent color
    #[inline]
    pub fn opponent(self) -> Stone {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
            Stone::Empty => Stone::Empty,
        }
    }

    /// Zero-sum orientation: White counts positive, Black negative.
    #[inline]
    pub fn sign(self) -> Score {
        match self {
            Stone::White => 1,
            Stone::Black => -1,
            Stone::Empty => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stone::Black => "Black",
            Stone::White => "White",
            Stone::Empty => "Nobody",
        }
    }
}

/// Position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    #[inline]
    pub fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < BOARD_SIZE as u8 && col < BOARD_SIZE as u8);
        Self { row, col }
    }

    /// Board center, the only cell with an initial priority
    pub const CENTER: Pos = Pos {
        row: (BOARD_SIZE / 2) as u8,
        col: (BOARD_SIZE / 2) as u8,
    };

    #[inline]
    pub fn to_index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    #[inline]
    pub fn from_index(idx: usize) -> Self {
        Self {
            row: (idx / BOARD_SIZE) as u8,
            col: (idx % BOARD_SIZE) as u8,
        }
    }

    #[inline]
    pub fn is_valid(row: i32, col: i32) -> bool {
        row >= 0 && row < BOARD_SIZE as i32 && col >= 0 && col < BOARD_SIZE as i32
    }

    /// Position `steps` cells away along a direction, if still on the board
    #[inline]
    pub fn offset(self, dr: i32, dc: i32, steps: i32) -> Option<Pos> {
        let r = self.row as i32 + dr * steps;
        let c = self.col as i32 + dc * steps;
        if Pos::is_valid(r, c) {
            Some(Pos::new(r as u8, c as u8))
        } else {
            None
        }
    }

    /// Iterate over every cell in row-major order
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..TOTAL_CELLS).map(Pos::from_index)
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let col = (b'A' + self.col) as char;
        write!(f, "{}{}", col, BOARD_SIZE - self.row as usize)
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_index().cmp(&other.to_index())
    }
}
