//! Incremental catalog maintenance
//!
//! Maintenance is a per-line re-resolve. After every mark or unmark of one
//! cell, the four lines through that cell are rescanned for both owners, the
//! candidates filtered by the [`RedundancyResolver`], and the catalog
//! reconciled against the result for those lines only. Reconciling a line
//! covers every local revision at once:
//! - a boundary taken by the opponent turns an open K-1 threat half-open
//! - a boundary freed again turns it back open
//! - a run that grew or was cut replaces or drops the old threat
//! - an unmark next to a gap degrades a jump threat to the smaller open one
//!
//! A threat depends only on the cells of its own line, so nothing outside
//! the four pivot lines can change. The whole line is re-resolved because
//! resolver verdicts chain along it. Each update costs O(max(rows, cols))
//! per axis.

use tracing::trace;

use crate::board::{step, Axis, Board, Cell, Mark, Player};

use super::redundancy::{Candidate, RedundancyResolver};
use super::{Threat, ThreatCatalog, ThreatKind};

// =============================================================================
// Lines
// =============================================================================

/// The in-bounds cells of one axis line, from its first cell forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub axis: Axis,
    row: i32,
    col: i32,
    len: i32,
}

impl Line {
    /// The line of `axis` passing through (row, col)
    pub fn through(board: &Board, axis: Axis, row: i32, col: i32) -> Self {
        let (dr, dc) = axis.forward().delta();
        let (mut row, mut col) = (row, col);
        while board.in_bounds(row - dr, col - dc) {
            row -= dr;
            col -= dc;
        }
        let mut len = 0;
        while board.in_bounds(row + dr * len, col + dc * len) {
            len += 1;
        }
        Self { axis, row, col, len }
    }

    /// Every line of `axis` on the board
    pub fn all(board: &Board, axis: Axis) -> Vec<Line> {
        let (dr, dc) = axis.forward().delta();
        let mut lines = Vec::new();
        for row in 0..board.rows() as i32 {
            for col in 0..board.cols() as i32 {
                if !board.in_bounds(row - dr, col - dc) {
                    lines.push(Self::through(board, axis, row, col));
                }
            }
        }
        lines
    }

    /// Line identifier, as [`Axis::line_of`]
    #[inline]
    pub fn id(&self) -> i32 {
        self.axis.line_of(self.row, self.col)
    }

    /// Number of in-bounds cells
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cell at position `i`; -1 and `len` are the off-board cells past
    /// either end.
    #[inline]
    pub fn cell(&self, board: &Board, i: i32) -> Cell {
        step(board, Cell::free(self.row, self.col), self.axis.forward(), i)
    }
}

// =============================================================================
// Discovery
// =============================================================================

/// Candidate threats of `owner` on one line, before redundancy filtering.
///
/// Runs are maximal, so boundaries are never owned by `owner`:
/// - run of K-1, both ends free: open
/// - run of K-1, one end free: half-open
/// - run of K-2, both ends free: open (K >= 3)
/// - two runs summing to K-1 around one free gap: half-open with a jump
pub fn candidates(board: &Board, line: &Line, owner: Player) -> Vec<Candidate> {
    let k = board.k();
    if k < 2 || line.is_empty() {
        return Vec::new();
    }
    let mark = owner.mark();

    // Index 0 and len + 1 are the off-board cells past either end
    let cells: Vec<Cell> = (-1..=line.len).map(|i| line.cell(board, i)).collect();
    let free = |i: usize| {
        let cell = cells[i];
        board.in_bounds(cell.row, cell.col) && cell.state == Mark::Free
    };

    let mut runs = Vec::new();
    let mut i = 1;
    while i <= line.len() {
        if cells[i].state == mark {
            let start = i;
            while cells[i].state == mark {
                i += 1;
            }
            runs.push((start, i));
        } else {
            i += 1;
        }
    }

    let threat = |left: usize, right: usize, size: usize, jumps: u8, kind: ThreatKind| {
        let threat = Threat {
            axis: line.axis,
            left: cells[left],
            right: cells[right],
            owner,
            size,
            jumps,
            kind,
        };
        Candidate::new(threat, board)
    };

    let mut found = Vec::new();
    for &(start, end) in &runs {
        let (left, right) = (start - 1, end);
        let size = end - start;
        if size == k - 1 {
            match (free(left), free(right)) {
                (true, true) => found.push(threat(left, right, size, 0, ThreatKind::Open)),
                (true, false) | (false, true) => {
                    found.push(threat(left, right, size, 0, ThreatKind::HalfOpen))
                }
                (false, false) => {}
            }
        } else if k >= 3 && size == k - 2 && free(left) && free(right) {
            found.push(threat(left, right, size, 0, ThreatKind::Open));
        }
    }

    for pair in runs.windows(2) {
        let ((s1, e1), (s2, e2)) = (pair[0], pair[1]);
        if s2 == e1 + 1 && free(e1) && (e1 - s1) + (e2 - s2) == k - 1 {
            found.push(threat(s1 - 1, e2, k - 1, 1, ThreatKind::HalfOpen));
        }
    }

    found
}

/// Redundancy-filtered threats of both owners on one line
pub fn discover(board: &Board, line: &Line) -> Vec<Threat> {
    Player::BOTH
        .into_iter()
        .flat_map(|owner| RedundancyResolver::resolve(candidates(board, line, owner)))
        .collect()
}

// =============================================================================
// Maintenance
// =============================================================================

/// Update the catalog after (row, col) was marked on `board`
pub fn on_mark(catalog: &mut ThreatCatalog, board: &Board, row: i32, col: i32) {
    debug_assert!(
        board.cell_state_at(row, col).owner().is_some(),
        "on_mark called on free cell ({}, {})",
        row,
        col
    );
    let (removed, inserted) = rediscover(catalog, board, row, col);
    trace!(row, col, removed, inserted, "catalog updated after mark");
}

/// Update the catalog after `freed` (as it was marked) was unmarked on `board`
pub fn on_unmark(catalog: &mut ThreatCatalog, board: &Board, freed: Cell) {
    debug_assert!(freed.state.owner().is_some(), "on_unmark called with a free cell {:?}", freed);
    debug_assert_eq!(board.cell_state_at(freed.row, freed.col), Mark::Free);
    let (removed, inserted) = rediscover(catalog, board, freed.row, freed.col);
    trace!(
        row = freed.row,
        col = freed.col,
        removed,
        inserted,
        "catalog updated after unmark"
    );
}

/// Rescan the four lines through (row, col) and reconcile them
fn rediscover(catalog: &mut ThreatCatalog, board: &Board, row: i32, col: i32) -> (usize, usize) {
    let mut removed = 0;
    let mut inserted = 0;
    for axis in Axis::ALL {
        let line = Line::through(board, axis, row, col);
        let fresh = discover(board, &line);
        let (r, i) = catalog.reconcile_line(axis, line.id(), &fresh);
        removed += r;
        inserted += i;
    }
    (removed, inserted)
}
