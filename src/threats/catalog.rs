//! Per-player, per-axis threat storage with O(1) bucket counts

use std::collections::BTreeSet;

use crate::board::{Axis, Board, Player};

use super::maintenance::{discover, Line};
use super::{Bucket, Threat};

/// All current threats of both players.
///
/// Threats are kept in one ordered set per (player, axis); identity is by
/// value, so a threat whose boundary marks change is a different threat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreatCatalog {
    k: usize,
    threats: [[BTreeSet<Threat>; 4]; 2],
    counts: [[usize; 3]; 2],
}

impl ThreatCatalog {
    /// Empty catalog for win length `k`
    pub fn new(k: usize) -> Self {
        Self {
            k,
            threats: Default::default(),
            counts: [[0; 3]; 2],
        }
    }

    /// Full-board scan: every line of every axis, both owners.
    ///
    /// O(rows * cols); the search never calls this, it only keeps the
    /// catalog equal to what this would return.
    pub fn scan(board: &Board) -> Self {
        let mut catalog = Self::new(board.k());
        for axis in Axis::ALL {
            for line in Line::all(board, axis) {
                for threat in discover(board, &line) {
                    catalog.insert(threat);
                }
            }
        }
        catalog
    }

    /// Add a threat. Returns false if it was already present.
    pub fn insert(&mut self, threat: Threat) -> bool {
        let Some(bucket) = threat.bucket(self.k) else {
            debug_assert!(false, "threat outside every bucket: {:?}", threat);
            return false;
        };
        let inserted = self.threats[threat.owner.index()][threat.axis.index()].insert(threat);
        if inserted {
            self.counts[threat.owner.index()][bucket.index()] += 1;
        }
        inserted
    }

    /// Remove a threat. Returns false if it was not present.
    pub fn remove(&mut self, threat: &Threat) -> bool {
        let removed = self.threats[threat.owner.index()][threat.axis.index()].remove(threat);
        if removed {
            if let Some(bucket) = threat.bucket(self.k) {
                self.counts[threat.owner.index()][bucket.index()] -= 1;
            }
        }
        removed
    }

    #[inline]
    #[must_use]
    pub fn count(&self, player: Player, bucket: Bucket) -> usize {
        self.counts[player.index()][bucket.index()]
    }

    /// Counts indexed by [`Bucket::index`]
    #[inline]
    #[must_use]
    pub fn counts(&self, player: Player) -> [usize; 3] {
        self.counts[player.index()]
    }

    #[inline]
    pub fn threats(&self, player: Player, axis: Axis) -> &BTreeSet<Threat> {
        &self.threats[player.index()][axis.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Threat> {
        self.threats.iter().flatten().flatten()
    }

    pub fn len(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Threats of either player on one axis line
    pub fn on_line(&self, axis: Axis, line: i32) -> impl Iterator<Item = &Threat> {
        Player::BOTH
            .into_iter()
            .flat_map(move |player| self.threats(player, axis).iter())
            .filter(move |t| t.line() == line)
    }

    /// Make the threats on one axis line exactly `fresh`.
    ///
    /// Returns how many threats were removed and inserted.
    pub fn reconcile_line(&mut self, axis: Axis, line: i32, fresh: &[Threat]) -> (usize, usize) {
        let stale: Vec<Threat> = self
            .on_line(axis, line)
            .filter(|t| !fresh.contains(*t))
            .copied()
            .collect();
        for threat in &stale {
            self.remove(threat);
        }
        let inserted = fresh.iter().filter(|t| self.insert(**t)).count();
        (stale.len(), inserted)
    }
}
