//! Redundancy filtering for threats found on one line
//!
//! Overlapping shapes on the same line are counted once. Candidates are
//! admitted strongest first; a weaker candidate nested inside an admitted
//! span, or competing for the same free cell with an admitted threat of the
//! same size, is dropped.

use crate::board::Board;

use super::{Threat, ThreatKind};

/// A threat prepared for admission: span and relevant free cells projected
/// onto axis ordinals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub threat: Threat,
    pub lo: i32,
    pub hi: i32,
    relevant: [Option<i32>; 2],
    rank: u8,
}

impl Candidate {
    pub fn new(threat: Threat, board: &Board) -> Self {
        let (lo, hi) = threat.span();
        let mut relevant = [None; 2];
        for (slot, cell) in relevant.iter_mut().zip(threat.relevant_cells(board)) {
            *slot = Some(threat.axis.ordinal(cell.row, cell.col));
        }
        let rank = match (threat.kind, threat.jumps) {
            (ThreatKind::Open, _) if threat.size + 1 == board.k() => 0,
            (ThreatKind::HalfOpen, 0) => 1,
            (ThreatKind::HalfOpen, _) => 2,
            (ThreatKind::Open, _) => 3,
        };
        Self {
            threat,
            lo,
            hi,
            relevant,
            rank,
        }
    }

    /// Admission priority, lower first
    #[inline]
    pub fn rank(&self) -> u8 {
        self.rank
    }

    /// Span lies inside `other`'s span, boundaries inclusive
    #[inline]
    pub fn is_contained_in(&self, other: &Candidate) -> bool {
        other.lo <= self.lo && self.hi <= other.hi
    }

    /// Both threats have the same size and advance through a common cell
    pub fn shares_relevant_cell(&self, other: &Candidate) -> bool {
        self.threat.size == other.threat.size
            && self
                .relevant
                .iter()
                .flatten()
                .any(|cell| other.relevant.iter().flatten().any(|o| o == cell))
    }
}

/// Verdict for one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Admitted, evicting this many previously admitted threats
    Accepted { evicted: usize },
    /// Nested inside an admitted threat
    Contained,
    /// Competes with an admitted threat for the same free cell
    SharesRelevantCell,
}

/// Admits candidates of one owner on one line
#[derive(Debug, Default)]
pub struct RedundancyResolver {
    admitted: Vec<Candidate>,
}

impl RedundancyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Why `candidate` would be rejected, if it would
    pub fn conflict(&self, candidate: &Candidate) -> Option<Admission> {
        for other in &self.admitted {
            if candidate.is_contained_in(other) {
                return Some(Admission::Contained);
            }
            if candidate.shares_relevant_cell(other) {
                return Some(Admission::SharesRelevantCell);
            }
        }
        None
    }

    /// Admit one candidate, evicting admitted threats nested inside it
    pub fn admit(&mut self, candidate: Candidate) -> Admission {
        if let Some(rejection) = self.conflict(&candidate) {
            return rejection;
        }
        let before = self.admitted.len();
        self.admitted.retain(|other| !other.is_contained_in(&candidate));
        let evicted = before - self.admitted.len();
        self.admitted.push(candidate);
        Admission::Accepted { evicted }
    }

    /// Admitted threats so far, in admission order
    pub fn admitted(&self) -> impl Iterator<Item = &Threat> {
        self.admitted.iter().map(|c| &c.threat)
    }

    /// Admit every candidate in priority order (rank, then left boundary)
    /// and return the survivors.
    pub fn resolve(mut candidates: Vec<Candidate>) -> Vec<Threat> {
        candidates.sort_by_key(|c| (c.rank, c.lo));
        let mut resolver = Self::new();
        for candidate in candidates {
            resolver.admit(candidate);
        }
        resolver.admitted.into_iter().map(|c| c.threat).collect()
    }
}
