//! Alpha-Beta search with iterative deepening and null-window refinement
//!
//! This module implements the move search for the m,n,k engine.
//! It uses minimax with alpha-beta pruning over a single mutable
//! [`Position`]; every move is applied through a [`MoveGuard`] so the board
//! and threat catalog unwind together.
//!
//! # Features
//!
//! - Iterative deepening with the previous best move searched first
//! - Null-window probes for every root move after the first, re-searched
//!   with an open window only when the probe fails high
//! - Catalog-driven move ordering (wins, blocks, then building moves)
//! - Candidate moves restricted to the contour once the board fills up
//! - Cooperative deadline polling: an interrupted iteration is discarded
//!
//! [`MoveGuard`]: crate::position::MoveGuard

use std::cmp::Reverse;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::board::{BoardError, Cell, Player};
use crate::eval::Evaluator;
use crate::position::Position;
use crate::threats::Bucket;

use super::time::Deadline;

/// Infinity score for alpha-beta bounds
pub const INF: i32 = i32::MAX / 2;

/// Errors raised while searching
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("no candidate moves: the game is over or the board is full")]
    NoCandidates,
}

/// Outcome of one search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Move to play
    pub best: Cell,
    /// Score of `best` for the side to move, from the deepest completed
    /// iteration (0 if none completed)
    pub score: i32,
    /// Plies searched below the root move in the deepest completed
    /// iteration; `None` when the deadline hit before depth 0 finished
    pub depth: Option<usize>,
    /// Nodes visited
    pub nodes: u64,
    pub elapsed: Duration,
}

/// Iterative-deepening alpha-beta searcher
#[derive(Debug, Clone)]
pub struct Searcher {
    evaluator: Evaluator,
    max_depth: Option<usize>,
    contour_threshold: usize,
    nodes: u64,
}

impl Searcher {
    pub fn new(evaluator: Evaluator) -> Self {
        Self {
            evaluator,
            max_depth: None,
            contour_threshold: 1,
            nodes: 0,
        }
    }

    /// Stop deepening after this many plies below the root move
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Restrict candidates to the contour once this many cells are marked
    pub fn with_contour_threshold(mut self, threshold: usize) -> Self {
        self.contour_threshold = threshold;
        self
    }

    /// Search the position for the side to move until the deadline.
    ///
    /// The position is left exactly as it was given.
    pub fn search(
        &mut self,
        position: &mut Position,
        deadline: &Deadline,
    ) -> Result<SearchResult, SearchError> {
        self.nodes = 0;
        let root = position.current_player();
        let free = position.board().free_count();
        if !position.state().is_open() || free == 0 {
            return Err(SearchError::NoCandidates);
        }

        let mut best: Option<(Cell, i32)> = None;
        let mut completed = None;
        let win = self.evaluator.win_score();

        for depth in 0.. {
            let first = best.map(|(cell, _)| cell);
            let moves = self.ordered_candidates(position, first);

            let iteration = self.search_root(position, &moves, root, depth, deadline)?;
            let Some((cell, score)) = iteration else {
                break;
            };
            best = Some((cell, score));
            completed = Some(depth);
            debug!(
                depth,
                row = cell.row,
                col = cell.col,
                score,
                nodes = self.nodes,
                elapsed_ms = deadline.elapsed().as_millis() as u64,
                "iteration complete"
            );

            let decided = score >= win || score <= -win;
            let exhausted = depth + 1 >= free;
            let capped = self.max_depth.is_some_and(|max| depth >= max);
            if decided || exhausted || capped || deadline.expired() {
                break;
            }
        }

        let (best, score) = match best {
            Some(found) => found,
            None => {
                let fallback = self
                    .ordered_candidates(position, None)
                    .first()
                    .copied()
                    .ok_or(SearchError::NoCandidates)?;
                (fallback, 0)
            }
        };

        Ok(SearchResult {
            best,
            score,
            depth: completed,
            nodes: self.nodes,
            elapsed: deadline.elapsed(),
        })
    }

    /// One root iteration. Returns `None` if the deadline passed before
    /// every root move was searched.
    fn search_root(
        &mut self,
        position: &mut Position,
        moves: &[Cell],
        root: Player,
        depth: usize,
        deadline: &Deadline,
    ) -> Result<Option<(Cell, i32)>, SearchError> {
        let mut best: Option<(Cell, i32)> = None;

        for &cell in moves {
            let mut child = position.play(cell.row, cell.col)?;

            let score = match best {
                // First move: full window
                None => self.alpha_beta(&mut child, root, false, -INF, INF, depth, deadline)?,
                Some((_, best_score)) => {
                    // Null-window probe: can this move beat the running best?
                    let probe = self.alpha_beta(
                        &mut child,
                        root,
                        false,
                        best_score,
                        best_score + 1,
                        depth,
                        deadline,
                    )?;
                    if probe > best_score {
                        self.alpha_beta(&mut child, root, false, best_score, INF, depth, deadline)?
                    } else {
                        probe
                    }
                }
            };
            drop(child);

            if deadline.expired() {
                return Ok(None);
            }
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((cell, score));
            }
        }

        Ok(best)
    }

    /// Minimax with alpha-beta pruning. Scores are for `root`; `maximizing`
    /// tells whether `root` is the side to move.
    #[allow(clippy::too_many_arguments)]
    fn alpha_beta(
        &mut self,
        position: &mut Position,
        root: Player,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
        depth: usize,
        deadline: &Deadline,
    ) -> Result<i32, SearchError> {
        self.nodes += 1;

        if !position.state().is_open() || depth == 0 || deadline.expired() {
            return Ok(self.leaf_score(position, root, depth));
        }

        let moves = self.ordered_candidates(position, None);
        let mut value = if maximizing { -INF } else { INF };

        for cell in moves {
            let mut child = position.play(cell.row, cell.col)?;
            let score =
                self.alpha_beta(&mut child, root, !maximizing, alpha, beta, depth - 1, deadline)?;
            drop(child);

            if maximizing {
                value = value.max(score);
                alpha = alpha.max(value);
            } else {
                value = value.min(score);
                beta = beta.min(value);
            }
            if alpha >= beta || deadline.expired() {
                break;
            }
        }

        Ok(value)
    }

    /// Static score, with decided games shifted so a quicker win (more
    /// depth left) scores higher and a quicker loss lower
    fn leaf_score(&self, position: &Position, root: Player, depth: usize) -> i32 {
        let score = self.evaluator.evaluate(position, root);
        let bonus = i32::try_from(depth).unwrap_or(0);
        match position.state().winner() {
            Some(winner) if winner == root => score + bonus,
            Some(_) => score - bonus,
            None => score,
        }
    }

    /// Candidate moves: the contour once enough cells are marked, every
    /// free cell otherwise (or when the contour is empty).
    pub fn candidates(&self, position: &Position) -> Vec<Cell> {
        let board = position.board();
        let mut cells = if board.marked_cells().len() >= self.contour_threshold {
            board.contour()
        } else {
            Vec::new()
        };
        if cells.is_empty() {
            cells = board.free_cells();
        }
        cells
    }

    /// Candidates ordered by urgency, with `first` moved to the front.
    ///
    /// Priority from the catalog, for the side to move:
    /// 1. cells completing an own k-1 threat (wins)
    /// 2. cells completing an opponent k-1 threat (forced blocks)
    /// 3. cells advancing an own k-2 threat
    /// 4. cells advancing an opponent k-2 threat
    /// 5. everything else
    ///
    /// The sort is stable, so ties keep row-major order.
    pub fn ordered_candidates(&self, position: &Position, first: Option<Cell>) -> Vec<Cell> {
        let board = position.board();
        let mover = position.current_player();
        let mut priority = vec![0u8; board.rows() * board.cols()];

        for threat in position.catalog().iter() {
            let own = threat.owner == mover;
            let rank = match (threat.bucket(board.k()), own) {
                (Some(Bucket::KMinus1Open | Bucket::KMinus1HalfOpen), true) => 4,
                (Some(Bucket::KMinus1Open | Bucket::KMinus1HalfOpen), false) => 3,
                (Some(Bucket::KMinus2Open), true) => 2,
                (Some(Bucket::KMinus2Open), false) => 1,
                (None, _) => 0,
            };
            for cell in threat.relevant_cells(board) {
                if let Some(idx) = board.index_of(cell.row, cell.col) {
                    priority[idx] = priority[idx].max(rank);
                }
            }
        }

        let mut moves = self.candidates(position);
        moves.sort_by_key(|cell| {
            Reverse(board.index_of(cell.row, cell.col).map_or(0, |idx| priority[idx]))
        });

        if let Some(first) = first {
            if let Some(pos) = moves.iter().position(|cell| cell.same_position(first)) {
                let cell = moves.remove(pos);
                moves.insert(0, cell);
            }
        }
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use crate::board::GameState;
    use crate::eval::ThreatWeights;

    fn position(rows: usize, cols: usize, k: usize, moves: &[(i32, i32)]) -> Position {
        let mut position = Position::new(rows, cols, k).unwrap();
        for &(r, c) in moves {
            position.mark(r, c).unwrap();
        }
        position
    }

    fn searcher(me: Player) -> Searcher {
        Searcher::new(Evaluator::new(me, ThreatWeights::default()))
    }

    fn generous() -> Deadline {
        Deadline::new(Instant::now(), Duration::from_secs(60))
    }

    /// Plain minimax over the same candidates and leaf scores, no pruning
    fn minimax(
        searcher: &Searcher,
        position: &mut Position,
        root: Player,
        maximizing: bool,
        depth: usize,
    ) -> i32 {
        if !position.state().is_open() || depth == 0 {
            return searcher.leaf_score(position, root, depth);
        }
        let mut value = if maximizing { -INF } else { INF };
        for cell in searcher.ordered_candidates(position, None) {
            let mut child = position.play(cell.row, cell.col).unwrap();
            let score = minimax(searcher, &mut child, root, !maximizing, depth - 1);
            value = if maximizing { value.max(score) } else { value.min(score) };
        }
        value
    }

    #[test]
    fn test_finds_immediate_win() {
        // P1: _XXXO on row 1, P1 to move
        let mut position = position(7, 7, 4, &[(1, 1), (5, 5), (1, 2), (5, 0), (1, 3), (1, 4)]);
        let result = searcher(Player::P1)
            .with_max_depth(Some(2))
            .search(&mut position, &generous())
            .unwrap();

        assert_eq!((result.best.row, result.best.col), (1, 0));
        assert!(result.score >= ThreatWeights::default().win);
        assert_eq!(result.depth, Some(0));
    }

    #[test]
    fn test_blocks_opponent_threat() {
        // P1: XXX_ from the left edge of row 1, P2 to move
        let mut position = position(7, 7, 4, &[(1, 0), (5, 5), (1, 1), (5, 0), (1, 2)]);
        let result = searcher(Player::P2)
            .with_max_depth(Some(1))
            .search(&mut position, &generous())
            .unwrap();

        assert_eq!((result.best.row, result.best.col), (1, 3));
        assert_eq!(result.depth, Some(1));
    }

    #[test]
    fn test_search_restores_position() {
        let mut position = position(7, 7, 4, &[(3, 3), (3, 4), (2, 2), (4, 4)]);
        let board_before = position.board().clone();
        let catalog_before = position.catalog().clone();

        let result = searcher(Player::P1)
            .with_max_depth(Some(2))
            .search(&mut position, &generous())
            .unwrap();

        assert_eq!(position.board(), &board_before);
        assert_eq!(position.catalog(), &catalog_before);
        assert!(result.nodes > 0);
        let chosen = position.board().cell_state_at(result.best.row, result.best.col);
        assert_eq!(chosen, crate::board::Mark::Free);
    }

    #[test]
    fn test_expired_deadline_falls_back_to_ordering() {
        let mut position = position(7, 7, 4, &[(1, 1), (5, 5), (1, 2), (5, 0), (1, 3), (1, 4)]);
        let result = searcher(Player::P1)
            .search(&mut position, &Deadline::new(Instant::now(), Duration::ZERO))
            .unwrap();

        assert_eq!(result.depth, None);
        // The winning cell is ordered first
        assert_eq!((result.best.row, result.best.col), (1, 0));
        assert_eq!(position.board().marked_cells().len(), 6);
    }

    #[test]
    fn test_root_matches_minimax() {
        let mut later_best = 0;

        for seed in 0..40usize {
            let mut position = Position::new(5, 5, 3).unwrap();
            for ply in 0..seed % 7 {
                let free = position.board().free_cells();
                let pick = free[(seed * 7 + ply * 13) % free.len()];
                if position.mark(pick.row, pick.col).unwrap() != GameState::Open {
                    break;
                }
            }
            if !position.state().is_open() {
                continue;
            }

            let root = position.current_player();
            let mut searcher = searcher(root);
            // Worst-first order, so later root moves must fail high and be
            // re-searched to take over
            let mut moves = searcher.ordered_candidates(&position, None);
            moves.reverse();

            for depth in 0..=2 {
                let expected = moves
                    .iter()
                    .map(|cell| {
                        let mut child = position.play(cell.row, cell.col).unwrap();
                        minimax(&searcher, &mut child, root, false, depth)
                    })
                    .max()
                    .unwrap();

                let (best, score) = searcher
                    .search_root(&mut position, &moves, root, depth, &generous())
                    .unwrap()
                    .unwrap();
                assert_eq!(score, expected, "seed {} depth {}", seed, depth);

                let mut child = position.play(best.row, best.col).unwrap();
                assert_eq!(minimax(&searcher, &mut child, root, false, depth), expected);
                drop(child);

                if best != moves[0] {
                    later_best += 1;
                }
            }
        }
        assert!(later_best > 0);
    }

    #[test]
    fn test_interrupted_iteration_discarded() {
        let moves = [(4, 4), (4, 5), (3, 3), (5, 5)];
        let mut timed = position(9, 9, 5, &moves);
        let free = timed.board().free_count();

        let deadline = Deadline::new(Instant::now(), Duration::from_millis(200));
        let result = searcher(Player::P1).search(&mut timed, &deadline).unwrap();
        let depth = result.depth.expect("depth 0 completes well within the deadline");
        assert!(depth + 1 < free);
        assert!(result.score.abs() < ThreatWeights::default().win);

        // Iterations up to `depth` run identically without a deadline, so a
        // depth-capped search must agree with the last completed iteration
        let mut capped = position(9, 9, 5, &moves);
        let reference = searcher(Player::P1)
            .with_max_depth(Some(depth))
            .search(&mut capped, &generous())
            .unwrap();
        assert_eq!(reference.depth, Some(depth));
        assert_eq!(result.best, reference.best);
        assert_eq!(result.score, reference.score);
        assert!(result.nodes >= reference.nodes);
    }

    #[test]
    fn test_finished_game_has_no_candidates() {
        let mut position = position(3, 3, 3, &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        assert_eq!(position.state(), GameState::WinP1);
        assert_eq!(
            searcher(Player::P2).search(&mut position, &generous()),
            Err(SearchError::NoCandidates)
        );
    }

    #[test]
    fn test_candidates_contour_threshold() {
        let position = position(5, 5, 3, &[(0, 0)]);

        let near = searcher(Player::P2).candidates(&position);
        assert_eq!(near, vec![Cell::free(0, 1), Cell::free(1, 0), Cell::free(1, 1)]);

        let all = searcher(Player::P2).with_contour_threshold(2).candidates(&position);
        assert_eq!(all.len(), 24);

        let empty = Position::new(5, 5, 3).unwrap();
        assert_eq!(searcher(Player::P1).candidates(&empty).len(), 25);
    }

    #[test]
    fn test_ordering_wins_before_blocks() {
        // P1: XXX_ on row 0 from the edge; P2: XXX_ on row 6 from the edge;
        // P1 to move
        let moves = [(0, 0), (6, 0), (0, 1), (6, 1), (0, 2), (6, 2)];
        let position = position(7, 7, 4, &moves);
        let ordered = searcher(Player::P1).ordered_candidates(&position, None);

        assert_eq!(ordered[0], Cell::free(0, 3));
        assert_eq!(ordered[1], Cell::free(6, 3));

        let forced = searcher(Player::P1).ordered_candidates(&position, Some(Cell::free(1, 1)));
        assert_eq!(forced[0], Cell::free(1, 1));
        assert_eq!(forced[1], Cell::free(0, 3));
    }

    #[test]
    fn test_takes_win_over_block() {
        let moves = [(0, 0), (6, 0), (0, 1), (6, 1), (0, 2), (6, 2)];
        let mut position = position(7, 7, 4, &moves);
        let result = searcher(Player::P1)
            .with_max_depth(Some(3))
            .search(&mut position, &generous())
            .unwrap();
        assert_eq!(result.best, Cell::free(0, 3));
    }
}
