//! Board representation for m,n,k-games

pub mod board;
pub mod geometry;

#[cfg(test)]
mod tests;

// Re-exports
pub use board::{Board, BoardError};
pub use geometry::{step, Axis, Direction};

/// The two sides of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Player {
    P1,
    P2,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::P1, Player::P2];

    /// Get opponent side
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::P1 => Player::P2,
            Player::P2 => Player::P1,
        }
    }

    /// Dense index for per-player tables
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Player::P1 => 0,
            Player::P2 => 1,
        }
    }

    /// The mark this side leaves on a cell
    #[inline]
    pub fn mark(self) -> Mark {
        match self {
            Player::P1 => Mark::P1,
            Player::P2 => Mark::P2,
        }
    }
}

/// Cell contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mark {
    Free,
    P1,
    P2,
}

impl Mark {
    /// Side owning this mark, if any
    #[inline]
    pub fn owner(self) -> Option<Player> {
        match self {
            Mark::Free => None,
            Mark::P1 => Some(Player::P1),
            Mark::P2 => Some(Player::P2),
        }
    }
}

/// A board coordinate together with the mark seen there.
///
/// Coordinates may lie outside the board: such cells always carry
/// [`Mark::Free`] and must be told apart from real free cells with
/// [`Board::in_bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
    pub state: Mark,
}

impl Cell {
    #[inline]
    pub fn new(row: i32, col: i32, state: Mark) -> Self {
        Self { row, col, state }
    }

    #[inline]
    pub fn free(row: i32, col: i32) -> Self {
        Self::new(row, col, Mark::Free)
    }

    /// Same coordinates, whatever the marks
    #[inline]
    pub fn same_position(self, other: Cell) -> bool {
        self.row == other.row && self.col == other.col
    }
}

/// Outcome of the game so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    Open,
    WinP1,
    WinP2,
    Draw,
}

impl GameState {
    #[inline]
    pub fn winner(self) -> Option<Player> {
        match self {
            GameState::WinP1 => Some(Player::P1),
            GameState::WinP2 => Some(Player::P2),
            GameState::Open | GameState::Draw => None,
        }
    }

    #[inline]
    pub fn is_open(self) -> bool {
        self == GameState::Open
    }

    #[inline]
    pub(crate) fn won_by(player: Player) -> Self {
        match player {
            Player::P1 => GameState::WinP1,
            Player::P2 => GameState::WinP2,
        }
    }
}
