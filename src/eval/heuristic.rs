//! Static evaluation of a position from catalog counts
//!
//! The score is a weighted difference of both sides' threat counts, or a
//! fixed magnitude once someone has K in a row. Weights are bound to sides,
//! not to the perspective asked for, so the evaluation is antisymmetric:
//! `evaluate(p, A) == -evaluate(p, B)`.

use crate::board::Player;
use crate::position::Position;
use crate::threats::ThreatCatalog;

use super::patterns::ThreatWeights;

/// Evaluator for one engine side
#[derive(Debug, Clone)]
pub struct Evaluator {
    me: Player,
    weights: ThreatWeights,
}

impl Evaluator {
    pub fn new(me: Player, weights: ThreatWeights) -> Self {
        Self { me, weights }
    }

    /// Score magnitude of a decided game
    #[inline]
    pub fn win_score(&self) -> i32 {
        self.weights.win
    }

    /// Evaluate the position for `owner`.
    ///
    /// Returns:
    /// - `win` if `owner` has K in a row, `-win` if the opponent does
    /// - otherwise the weighted count difference, kept strictly inside
    ///   `(-win, win)`
    ///
    /// The catalog must be current; [`Position`] guarantees this.
    #[must_use]
    pub fn evaluate(&self, position: &Position, owner: Player) -> i32 {
        let win = self.weights.win;
        match position.state().winner() {
            Some(winner) if winner == owner => return win,
            Some(_) => return -win,
            None => {}
        }

        let catalog = position.catalog();
        let mine = self.side_score(catalog, owner);
        let theirs = self.side_score(catalog, owner.opponent());
        let bound = win.saturating_sub(1);
        mine.saturating_sub(theirs).clamp(-bound, bound)
    }

    fn side_score(&self, catalog: &ThreatCatalog, player: Player) -> i32 {
        let weights = if player == self.me {
            &self.weights.own
        } else {
            &self.weights.adversary
        };
        weights.score(catalog.counts(player))
    }
}
