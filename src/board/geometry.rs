//! Axis and direction geometry
//!
//! Threat extremities are always ordered along an axis' forward direction:
//! - Horizontal: west to east
//! - Vertical: north to south
//! - Diagonal: north-west to south-east
//! - Anti-diagonal: north-east to south-west

use super::{Board, Cell};

/// One of the four alignment directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    Horizontal,
    Vertical,
    Diagonal,
    AntiDiagonal,
}

/// Compass scan direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Direction {
    /// (row, col) offset of one step
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::N => (-1, 0),
            Direction::NE => (-1, 1),
            Direction::E => (0, 1),
            Direction::SE => (1, 1),
            Direction::S => (1, 0),
            Direction::SW => (1, -1),
            Direction::W => (0, -1),
            Direction::NW => (-1, -1),
        }
    }

    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::N => Direction::S,
            Direction::NE => Direction::SW,
            Direction::E => Direction::W,
            Direction::SE => Direction::NW,
            Direction::S => Direction::N,
            Direction::SW => Direction::NE,
            Direction::W => Direction::E,
            Direction::NW => Direction::SE,
        }
    }
}

impl Axis {
    pub const ALL: [Axis; 4] = [
        Axis::Horizontal,
        Axis::Vertical,
        Axis::Diagonal,
        Axis::AntiDiagonal,
    ];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::Horizontal => 0,
            Axis::Vertical => 1,
            Axis::Diagonal => 2,
            Axis::AntiDiagonal => 3,
        }
    }

    /// Canonical scan direction
    #[inline]
    pub fn forward(self) -> Direction {
        match self {
            Axis::Horizontal => Direction::E,
            Axis::Vertical => Direction::S,
            Axis::Diagonal => Direction::SE,
            Axis::AntiDiagonal => Direction::SW,
        }
    }

    #[inline]
    pub fn backward(self) -> Direction {
        self.forward().opposite()
    }

    /// Identifier of the axis line through a coordinate.
    ///
    /// Defined for out-of-bounds coordinates too, so a boundary lying past
    /// the edge still belongs to the line of the run it closes.
    #[inline]
    pub fn line_of(self, row: i32, col: i32) -> i32 {
        match self {
            Axis::Horizontal => row,
            Axis::Vertical => col,
            Axis::Diagonal => col - row,
            Axis::AntiDiagonal => row + col,
        }
    }

    /// Position along the line, increasing by one per forward step
    #[inline]
    pub fn ordinal(self, row: i32, col: i32) -> i32 {
        match self {
            Axis::Horizontal => col,
            Axis::Vertical | Axis::Diagonal | Axis::AntiDiagonal => row,
        }
    }
}

/// The cell `distance` steps away from `cell` along `direction`.
///
/// Total: off-board results come back carrying [`super::Mark::Free`].
#[inline]
pub fn step(board: &Board, cell: Cell, direction: Direction, distance: i32) -> Cell {
    let (dr, dc) = direction.delta();
    board.cell_at(cell.row + dr * distance, cell.col + dc * distance)
}
