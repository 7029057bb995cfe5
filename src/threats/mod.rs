//! Threat catalog for m,n,k-games
//!
//! A threat is a partial alignment one or two marks away from a win:
//! - **k-1 open**: K-1 consecutive marks, both extremities free
//! - **k-1 half-open**: K-1 consecutive marks with exactly one free extremity,
//!   or K-1 marks split by a single free gap ("jump")
//! - **k-2 open**: K-2 consecutive marks, both extremities free
//!
//! The catalog is kept in sync with the board one mark/unmark at a time by
//! [`maintenance`], and filtered by [`redundancy`] so one physical shape is
//! never counted twice.

pub mod catalog;
pub mod maintenance;
pub mod redundancy;

#[cfg(test)]
mod proptest_catalog;

pub use catalog::ThreatCatalog;
pub use maintenance::{on_mark, on_unmark};
pub use redundancy::{Admission, Candidate, RedundancyResolver};

use crate::board::{Axis, Board, Cell, Mark, Player};

/// Shape of a threat's extremities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ThreatKind {
    Open,
    HalfOpen,
}

/// Counting bucket used by the evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    KMinus1Open,
    KMinus1HalfOpen,
    KMinus2Open,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [
        Bucket::KMinus1Open,
        Bucket::KMinus1HalfOpen,
        Bucket::KMinus2Open,
    ];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Bucket::KMinus1Open => 0,
            Bucket::KMinus1HalfOpen => 1,
            Bucket::KMinus2Open => 2,
        }
    }
}

/// A partial alignment of `owner` marks between two boundary cells.
///
/// `left` precedes `right` along the axis' forward direction. Neither
/// boundary is ever owned by `owner`; `size` counts the owner marks strictly
/// between them and `jumps` the free gaps there (0 or 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Threat {
    pub axis: Axis,
    pub left: Cell,
    pub right: Cell,
    pub owner: Player,
    pub size: usize,
    pub jumps: u8,
    pub kind: ThreatKind,
}

impl Threat {
    /// Bucket this threat is counted in for win length `k`, if any
    #[inline]
    pub fn bucket(&self, k: usize) -> Option<Bucket> {
        match self.kind {
            ThreatKind::Open if self.size + 1 == k => Some(Bucket::KMinus1Open),
            ThreatKind::Open if self.size + 2 == k => Some(Bucket::KMinus2Open),
            ThreatKind::HalfOpen if self.size + 1 == k => Some(Bucket::KMinus1HalfOpen),
            _ => None,
        }
    }

    /// Identifier of the board line the threat lies on
    #[inline]
    pub fn line(&self) -> i32 {
        self.axis.line_of(self.left.row, self.left.col)
    }

    /// Ordinals of the two boundaries along the axis
    #[inline]
    pub fn span(&self) -> (i32, i32) {
        (
            self.axis.ordinal(self.left.row, self.left.col),
            self.axis.ordinal(self.right.row, self.right.col),
        )
    }

    /// Whether (row, col) lies on the threat, boundaries included
    #[inline]
    pub fn contains(&self, row: i32, col: i32) -> bool {
        if self.axis.line_of(row, col) != self.line() {
            return false;
        }
        let (lo, hi) = self.span();
        (lo..=hi).contains(&self.axis.ordinal(row, col))
    }

    /// Interior cells, read from the board, in forward order
    pub fn interior<'b>(&self, board: &'b Board) -> impl Iterator<Item = Cell> + 'b {
        let (dr, dc) = self.axis.forward().delta();
        let (lo, hi) = self.span();
        let (row, col) = (self.left.row, self.left.col);
        (1..hi - lo).map(move |i| board.cell_at(row + dr * i, col + dc * i))
    }

    /// The free gap of a one-jump threat
    pub fn gap(&self, board: &Board) -> Option<Cell> {
        if self.jumps == 0 {
            return None;
        }
        self.interior(board).find(|cell| cell.state == Mark::Free)
    }

    /// Free cells that would advance this threat: both boundaries of an open
    /// threat, the free boundary of a zero-jump half-open threat, the gap of
    /// a one-jump threat.
    pub fn relevant_cells(&self, board: &Board) -> impl Iterator<Item = Cell> {
        let open = |cell: Cell| board.in_bounds(cell.row, cell.col) && cell.state == Mark::Free;
        let cells = match (self.kind, self.jumps) {
            (_, 1) => [self.gap(board), None],
            (ThreatKind::Open, _) => [Some(self.left), Some(self.right)],
            (ThreatKind::HalfOpen, _) => [
                Some(self.left).filter(|c| open(*c)),
                Some(self.right).filter(|c| open(*c)),
            ],
        };
        cells.into_iter().flatten()
    }

    /// Check the threat against the board it was catalogued from.
    ///
    /// Used by tests and debug assertions; a catalogued threat that fails
    /// this is a maintenance bug.
    pub fn is_well_formed(&self, board: &Board) -> bool {
        let k = board.k();
        let owner = self.owner.mark();
        let (lo, hi) = self.span();

        if self.bucket(k).is_none() || hi <= lo || self.right_line() != self.line() {
            return false;
        }
        // Recorded boundary marks must match the board
        for boundary in [self.left, self.right] {
            if board.cell_at(boundary.row, boundary.col) != boundary || boundary.state == owner {
                return false;
            }
        }

        let interior: Vec<Cell> = self.interior(board).collect();
        let marks = interior.iter().filter(|c| c.state == owner).count();
        let gaps: Vec<usize> = interior
            .iter()
            .enumerate()
            .filter(|(_, c)| c.state == Mark::Free)
            .map(|(i, _)| i)
            .collect();
        let jumps = usize::from(self.jumps);
        if marks != self.size || marks + gaps.len() != interior.len() || gaps.len() != jumps {
            return false;
        }

        let open = |cell: Cell| board.in_bounds(cell.row, cell.col) && cell.state == Mark::Free;
        match (self.kind, self.jumps) {
            (ThreatKind::Open, 0) => open(self.left) && open(self.right),
            (ThreatKind::Open, _) => false,
            (ThreatKind::HalfOpen, 0) => open(self.left) != open(self.right),
            // The gap sits strictly inside, with marks on both sides
            (ThreatKind::HalfOpen, 1) => gaps[0] > 0 && gaps[0] + 1 < interior.len(),
            (ThreatKind::HalfOpen, _) => false,
        }
    }

    #[inline]
    fn right_line(&self) -> i32 {
        self.axis.line_of(self.right.row, self.right.col)
    }
}
