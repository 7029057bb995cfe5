//! Property-based tests for incremental catalog maintenance.
//!
//! Random legal games on small boards; after every mark and every unmark
//! the incrementally maintained catalog is compared with a full scan and
//! checked for well-formed, non-redundant threats.

use proptest::prelude::*;

use super::redundancy::Candidate;
use super::ThreatCatalog;
use crate::board::{Axis, Player};
use crate::eval::{Evaluator, ThreatWeights};
use crate::position::Position;

/// Strategy for board dimensions with a win length that fits
fn dimensions() -> impl Strategy<Value = (usize, usize, usize)> {
    (3usize..8, 3usize..8).prop_flat_map(|(rows, cols)| {
        let longest = rows.max(cols);
        (Just(rows), Just(cols), 2usize..=longest.min(5))
    })
}

/// Strategy for move choices, each taken modulo the free cell count
fn choices() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..1_000, 0..40)
}

/// Play choices until the game ends; returns the number of moves made
fn play(position: &mut Position, picks: &[usize]) -> usize {
    let mut played = 0;
    for &pick in picks {
        if !position.state().is_open() {
            break;
        }
        let free = position.board().free_cells();
        let cell = free[pick % free.len()];
        position.mark(cell.row, cell.col).unwrap();
        played += 1;
    }
    played
}

fn assert_non_redundant(position: &Position) -> Result<(), TestCaseError> {
    let board = position.board();
    for player in Player::BOTH {
        for axis in Axis::ALL {
            let threats: Vec<_> = position.catalog().threats(player, axis).iter().collect();
            for (i, a) in threats.iter().enumerate() {
                for b in threats.iter().skip(i + 1) {
                    if a.line() != b.line() {
                        continue;
                    }
                    let ca = Candidate::new(**a, board);
                    let cb = Candidate::new(**b, board);
                    prop_assert!(!ca.is_contained_in(&cb), "{:?} inside {:?}", a, b);
                    prop_assert!(!cb.is_contained_in(&ca), "{:?} inside {:?}", b, a);
                    prop_assert!(!ca.shares_relevant_cell(&cb), "{:?} and {:?} overlap", a, b);
                }
            }
        }
    }
    Ok(())
}

proptest! {
    /// Property: incremental maintenance always equals a full-board scan.
    #[test]
    fn prop_scan_equivalence((rows, cols, k) in dimensions(), picks in choices()) {
        let mut position = Position::new(rows, cols, k).unwrap();
        for &pick in &picks {
            if !position.state().is_open() {
                break;
            }
            let free = position.board().free_cells();
            let cell = free[pick % free.len()];
            position.mark(cell.row, cell.col).unwrap();
            prop_assert_eq!(position.catalog(), &ThreatCatalog::scan(position.board()));
        }
    }

    /// Property: unmarking in reverse restores every earlier catalog.
    #[test]
    fn prop_unmark_restores_catalog((rows, cols, k) in dimensions(), picks in choices()) {
        let mut position = Position::new(rows, cols, k).unwrap();
        let mut snapshots = vec![position.catalog().clone()];
        for &pick in &picks {
            if !position.state().is_open() {
                break;
            }
            let free = position.board().free_cells();
            let cell = free[pick % free.len()];
            position.mark(cell.row, cell.col).unwrap();
            snapshots.push(position.catalog().clone());
        }

        snapshots.pop();
        while let Some(expected) = snapshots.pop() {
            position.unmark().unwrap();
            prop_assert_eq!(position.catalog(), &expected);
        }
        prop_assert!(position.catalog().is_empty());
    }

    /// Property: every catalogued threat matches the board it describes.
    #[test]
    fn prop_threats_well_formed((rows, cols, k) in dimensions(), picks in choices()) {
        let mut position = Position::new(rows, cols, k).unwrap();
        play(&mut position, &picks);
        for threat in position.catalog().iter() {
            prop_assert!(threat.is_well_formed(position.board()), "{:?}", threat);
        }
    }

    /// Property: no two threats of one owner on one line overlap.
    #[test]
    fn prop_no_false_containment((rows, cols, k) in dimensions(), picks in choices()) {
        let mut position = Position::new(rows, cols, k).unwrap();
        play(&mut position, &picks);
        assert_non_redundant(&position)?;
    }

    /// Property: evaluate(A) == -evaluate(B) whatever side the engine plays.
    #[test]
    fn prop_evaluation_antisymmetric((rows, cols, k) in dimensions(), picks in choices()) {
        let mut position = Position::new(rows, cols, k).unwrap();
        play(&mut position, &picks);
        for me in Player::BOTH {
            let evaluator = Evaluator::new(me, ThreatWeights::default());
            prop_assert_eq!(
                evaluator.evaluate(&position, Player::P1),
                -evaluator.evaluate(&position, Player::P2)
            );
        }
    }
}
