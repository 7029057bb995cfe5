//! Board structure with move history

use thiserror::Error;

use super::{Cell, GameState, Mark, Player};
use crate::rules::has_k_at;

/// Errors raised by illegal board operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("cell ({row}, {col}) is outside the board")]
    OutOfBounds { row: i32, col: i32 },
    #[error("cell ({row}, {col}) is already marked")]
    Occupied { row: i32, col: i32 },
    #[error("the game is already over")]
    GameOver,
    #[error("no mark left to undo")]
    EmptyHistory,
    #[error("invalid board {rows}x{cols} with win length {k}")]
    InvalidDimensions { rows: usize, cols: usize, k: usize },
}

/// M x N game board with K-in-a-row win rule.
///
/// P1 always moves first and sides alternate. Every mark is pushed on a
/// history stack so the search can undo moves in reverse order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    k: usize,
    cells: Vec<Mark>,
    /// Marked cells in play order
    history: Vec<Cell>,
    state: GameState,
}

impl Board {
    pub fn new(rows: usize, cols: usize, k: usize) -> Result<Self, BoardError> {
        if rows == 0 || cols == 0 || k == 0 || k > rows.max(cols) {
            return Err(BoardError::InvalidDimensions { rows, cols, k });
        }
        Ok(Self {
            rows,
            cols,
            k,
            cells: vec![Mark::Free; rows * cols],
            history: Vec::with_capacity(rows * cols),
            state: GameState::Open,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of aligned marks needed to win
    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    #[inline]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[inline]
    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    /// Row-major index of an in-bounds coordinate
    #[inline]
    pub fn index_of(&self, row: i32, col: i32) -> Option<usize> {
        if self.in_bounds(row, col) {
            Some(row as usize * self.cols + col as usize)
        } else {
            None
        }
    }

    /// Mark at a coordinate; out-of-bounds coordinates read as free
    #[inline]
    pub fn cell_state_at(&self, row: i32, col: i32) -> Mark {
        self.index_of(row, col).map_or(Mark::Free, |idx| self.cells[idx])
    }

    #[inline]
    pub fn cell_at(&self, row: i32, col: i32) -> Cell {
        Cell::new(row, col, self.cell_state_at(row, col))
    }

    /// Side to move
    #[inline]
    pub fn current_player(&self) -> Player {
        if self.history.len() % 2 == 0 {
            Player::P1
        } else {
            Player::P2
        }
    }

    /// Marked cells in play order
    #[inline]
    pub fn marked_cells(&self) -> &[Cell] {
        &self.history
    }

    /// Most recent mark
    #[inline]
    pub fn last_marked(&self) -> Option<Cell> {
        self.history.last().copied()
    }

    #[inline]
    pub fn free_count(&self) -> usize {
        self.cells.len() - self.history.len()
    }

    /// Free cells in row-major order
    pub fn free_cells(&self) -> Vec<Cell> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, mark)| **mark == Mark::Free)
            .map(|(idx, _)| Cell::free((idx / self.cols) as i32, (idx % self.cols) as i32))
            .collect()
    }

    /// Free cells touching at least one mark (8-neighbourhood), row-major
    pub fn contour(&self) -> Vec<Cell> {
        let mut seen = vec![false; self.cells.len()];

        for cell in &self.history {
            for dr in -1..=1 {
                for dc in -1..=1 {
                    if let Some(idx) = self.index_of(cell.row + dr, cell.col + dc) {
                        if self.cells[idx] == Mark::Free {
                            seen[idx] = true;
                        }
                    }
                }
            }
        }

        seen.iter()
            .enumerate()
            .filter(|(_, near)| **near)
            .map(|(idx, _)| Cell::free((idx / self.cols) as i32, (idx % self.cols) as i32))
            .collect()
    }

    /// Mark a cell for the side to move and update the game state
    pub fn mark(&mut self, row: i32, col: i32) -> Result<GameState, BoardError> {
        if !self.state.is_open() {
            return Err(BoardError::GameOver);
        }
        let idx = self
            .index_of(row, col)
            .ok_or(BoardError::OutOfBounds { row, col })?;
        if self.cells[idx] != Mark::Free {
            return Err(BoardError::Occupied { row, col });
        }

        let player = self.current_player();
        self.cells[idx] = player.mark();
        self.history.push(Cell::new(row, col, player.mark()));

        self.state = if has_k_at(self, row, col, player.mark(), self.k) {
            GameState::won_by(player)
        } else if self.free_count() == 0 {
            GameState::Draw
        } else {
            GameState::Open
        };
        Ok(self.state)
    }

    /// Undo the most recent mark. Returns the cell as it was marked.
    pub fn unmark(&mut self) -> Result<Cell, BoardError> {
        let cell = self.history.pop().ok_or(BoardError::EmptyHistory)?;
        if let Some(idx) = self.index_of(cell.row, cell.col) {
            self.cells[idx] = Mark::Free;
        }
        // Marking is only legal on an open game, so undoing always reopens it
        self.state = GameState::Open;
        Ok(cell)
    }
}
