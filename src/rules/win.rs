//! Win condition checking
//!
//! A side wins as soon as K or more of its marks are aligned
//! horizontally, vertically or on either diagonal.

use crate::board::{Axis, Board, Direction, Mark};

/// Count consecutive `mark` cells starting next to (row, col) along `direction`.
///
/// The starting cell itself is not counted.
#[inline]
pub fn run_length(board: &Board, row: i32, col: i32, direction: Direction, mark: Mark) -> usize {
    let (dr, dc) = direction.delta();
    let mut count = 0;
    let mut r = row + dr;
    let mut c = col + dc;
    while board.in_bounds(r, c) && board.cell_state_at(r, c) == mark {
        count += 1;
        r += dr;
        c += dc;
    }
    count
}

/// Fast K-in-a-row check through a specific cell.
///
/// Only checks the 4 axes through (row, col). No allocation.
#[inline]
pub fn has_k_at(board: &Board, row: i32, col: i32, mark: Mark, k: usize) -> bool {
    if mark == Mark::Free || board.cell_state_at(row, col) != mark {
        return false;
    }
    Axis::ALL.iter().any(|axis| {
        let forward = run_length(board, row, col, axis.forward(), mark);
        let backward = run_length(board, row, col, axis.backward(), mark);
        1 + forward + backward >= k
    })
}
