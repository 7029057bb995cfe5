//! Board plus threat catalog, updated together
//!
//! Every mark is paired with its unmark through [`MoveGuard`]: the guard
//! undoes the move when it goes out of scope, so an early return inside the
//! search can never leave the board and catalog out of step.

use std::ops::{Deref, DerefMut};

use crate::board::{Board, BoardError, Cell, GameState, Player};
use crate::threats::{on_mark, on_unmark, ThreatCatalog};

/// A board together with its incrementally maintained threat catalog
#[derive(Debug, Clone)]
pub struct Position {
    board: Board,
    catalog: ThreatCatalog,
}

impl Position {
    pub fn new(rows: usize, cols: usize, k: usize) -> Result<Self, BoardError> {
        let board = Board::new(rows, cols, k)?;
        let catalog = ThreatCatalog::new(k);
        Ok(Self { board, catalog })
    }

    /// Fresh position with `moves` replayed in order
    pub fn replay(rows: usize, cols: usize, k: usize, moves: &[Cell]) -> Result<Self, BoardError> {
        let mut position = Self::new(rows, cols, k)?;
        for cell in moves {
            position.mark(cell.row, cell.col)?;
        }
        Ok(position)
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn catalog(&self) -> &ThreatCatalog {
        &self.catalog
    }

    #[inline]
    pub fn state(&self) -> GameState {
        self.board.state()
    }

    #[inline]
    pub fn current_player(&self) -> Player {
        self.board.current_player()
    }

    /// Mark a cell for the side to move and update the catalog
    pub fn mark(&mut self, row: i32, col: i32) -> Result<GameState, BoardError> {
        let state = self.board.mark(row, col)?;
        on_mark(&mut self.catalog, &self.board, row, col);
        Ok(state)
    }

    /// Undo the last mark and update the catalog
    pub fn unmark(&mut self) -> Result<Cell, BoardError> {
        let freed = self.board.unmark()?;
        on_unmark(&mut self.catalog, &self.board, freed);
        Ok(freed)
    }

    /// Mark a cell for the duration of the returned guard
    pub fn play(&mut self, row: i32, col: i32) -> Result<MoveGuard<'_>, BoardError> {
        let state = self.mark(row, col)?;
        let cell = self.board.cell_at(row, col);
        Ok(MoveGuard {
            position: self,
            cell,
            state,
        })
    }
}

/// A move that is undone on drop
#[derive(Debug)]
pub struct MoveGuard<'a> {
    position: &'a mut Position,
    cell: Cell,
    state: GameState,
}

impl MoveGuard<'_> {
    /// The cell marked by this guard
    #[inline]
    pub fn cell(&self) -> Cell {
        self.cell
    }

    /// Game state right after the move
    #[inline]
    pub fn outcome(&self) -> GameState {
        self.state
    }
}

impl Deref for MoveGuard<'_> {
    type Target = Position;

    fn deref(&self) -> &Position {
        self.position
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Position {
        self.position
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        let undone = self.position.unmark();
        debug_assert!(
            matches!(undone, Ok(cell) if cell.same_position(self.cell)),
            "move guard for {:?} released out of order: {:?}",
            self.cell,
            undone
        );
    }
}
