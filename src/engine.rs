//! Player engine exposed to the game harness
//!
//! The harness drives a player through three calls:
//!
//! 1. `init_player` once per game, with the board size, win length, turn
//!    order and per-move time limit
//! 2. `select_cell` once per own turn, with the free cells and every mark
//!    played so far
//! 3. `player_name` for reporting
//!
//! Between calls the engine keeps its own [`Position`] and only replays the
//! marks it has not seen yet, so the threat catalog is never rebuilt from
//! scratch during a game.
//!
//! # Example
//!
//! ```
//! use mnk::{Engine, EngineConfig, MnkPlayer};
//!
//! let mut engine = Engine::with_config(EngineConfig::default().with_max_depth(Some(1)));
//! engine.init_player(5, 5, 4, true, 1).unwrap();
//!
//! let board = mnk::Board::new(5, 5, 4).unwrap();
//! let cell = engine.select_cell(&board.free_cells(), board.marked_cells()).unwrap();
//! assert_eq!((cell.row, cell.col), (2, 2));
//! ```

use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info};

use crate::board::{BoardError, Cell, Player};
use crate::eval::{Evaluator, ThreatWeights};
use crate::position::Position;
use crate::search::time::{DEFAULT_MARGIN, DEFAULT_MAX_MARGIN};
use crate::search::{SearchError, SearchResult, Searcher, TimeBudget};

/// Name reported by [`MnkPlayer::player_name`] unless configured otherwise
pub const DEFAULT_NAME: &str = "GW";

/// Errors surfaced to the harness
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("select_cell called before init_player")]
    NotInitialized,
    #[error("no free cells left to play")]
    NoFreeCells,
    #[error("cannot replay cell ({row}, {col}) from the harness history")]
    UnknownCell { row: i32, col: i32 },
    #[error("asked to move for {expected:?} but {actual:?} is to move")]
    OutOfTurn { expected: Player, actual: Player },
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Harness-facing player interface
pub trait MnkPlayer {
    /// Start a new game. `first` is true when this player moves first.
    fn init_player(
        &mut self,
        rows: usize,
        cols: usize,
        k: usize,
        first: bool,
        timeout_secs: u64,
    ) -> Result<(), EngineError>;

    /// Choose a cell among `free`, given every mark played so far
    fn select_cell(&mut self, free: &[Cell], marked: &[Cell]) -> Result<Cell, EngineError>;

    fn player_name(&self) -> &str;
}

/// Engine tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Cushion kept between the search deadline and the per-move limit
    pub safety_margin: Duration,
    /// Ceiling for the margin after overruns
    pub max_safety_margin: Duration,
    /// Plies below the root move; `None` searches until the deadline
    pub max_depth: Option<usize>,
    /// Marks on the board before candidates shrink to the contour
    pub contour_threshold: usize,
    pub weights: ThreatWeights,
    /// Name reported to the harness
    pub name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            safety_margin: DEFAULT_MARGIN,
            max_safety_margin: DEFAULT_MAX_MARGIN,
            max_depth: None,
            contour_threshold: 1,
            weights: ThreatWeights::default(),
            name: DEFAULT_NAME.to_string(),
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn with_safety_margin(mut self, margin: Duration) -> Self {
        self.safety_margin = margin;
        self
    }

    #[must_use]
    pub fn with_max_safety_margin(mut self, margin: Duration) -> Self {
        self.max_safety_margin = margin;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_contour_threshold(mut self, threshold: usize) -> Self {
        self.contour_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_weights(mut self, weights: ThreatWeights) -> Self {
        self.weights = weights;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// State of one game in progress
#[derive(Debug)]
struct Game {
    rows: usize,
    cols: usize,
    k: usize,
    me: Player,
    position: Position,
    time: TimeBudget,
    searcher: Searcher,
}

impl Game {
    /// Bring the position in line with the harness history: replay unseen
    /// marks, or start over when the histories diverge.
    fn sync(&mut self, marked: &[Cell]) -> Result<(), EngineError> {
        let known = self.position.board().marked_cells();
        let common = known.iter().zip(marked).take_while(|(a, b)| a == b).count();

        let replay_from = if common < known.len() {
            debug!(known = known.len(), common, "harness history diverged, rebuilding position");
            self.position = Position::new(self.rows, self.cols, self.k)?;
            0
        } else {
            common
        };

        for cell in &marked[replay_from..] {
            if cell.state != self.position.current_player().mark() {
                return Err(EngineError::UnknownCell {
                    row: cell.row,
                    col: cell.col,
                });
            }
            self.position.mark(cell.row, cell.col)?;
        }
        Ok(())
    }

    /// Free cell closest to the centre, ties in row-major order
    fn opening(&self, free: &[Cell]) -> Option<Cell> {
        let (cr, cc) = ((self.rows as i32 - 1) / 2, (self.cols as i32 - 1) / 2);
        free.iter().copied().min_by_key(|cell| {
            let distance = (cell.row - cr).abs().max((cell.col - cc).abs());
            (distance, cell.row, cell.col)
        })
    }
}

/// Threat-catalog alpha-beta player
#[derive(Debug, Default)]
pub struct Engine {
    config: EngineConfig,
    game: Option<Game>,
    last_result: Option<SearchResult>,
}

impl Engine {
    /// Engine with the default configuration:
    /// - 250 ms safety margin, growing up to 2 s after overruns
    /// - no depth cap
    /// - contour candidates once one cell is marked
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            game: None,
            last_result: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Side this engine plays, once initialised
    pub fn me(&self) -> Option<Player> {
        self.game.as_ref().map(|game| game.me)
    }

    /// The engine's private copy of the game
    pub fn position(&self) -> Option<&Position> {
        self.game.as_ref().map(|game| &game.position)
    }

    /// Current per-move time budget
    pub fn time_budget(&self) -> Option<TimeBudget> {
        self.game.as_ref().map(|game| game.time)
    }

    /// Statistics of the most recent search; `None` after an opening move
    pub fn last_result(&self) -> Option<&SearchResult> {
        self.last_result.as_ref()
    }

    /// Start a game with an arbitrary per-move budget
    pub fn init_with_budget(
        &mut self,
        rows: usize,
        cols: usize,
        k: usize,
        first: bool,
        budget: Duration,
    ) -> Result<(), EngineError> {
        let me = if first { Player::P1 } else { Player::P2 };
        let position = Position::new(rows, cols, k)?;
        let time = TimeBudget::new(
            budget,
            self.config.safety_margin,
            self.config.max_safety_margin,
        );
        let searcher = Searcher::new(Evaluator::new(me, self.config.weights))
            .with_max_depth(self.config.max_depth)
            .with_contour_threshold(self.config.contour_threshold);

        info!(
            rows,
            cols,
            k,
            ?me,
            budget_ms = budget.as_millis() as u64,
            margin_ms = time.margin().as_millis() as u64,
            "new game"
        );
        self.game = Some(Game {
            rows,
            cols,
            k,
            me,
            position,
            time,
            searcher,
        });
        self.last_result = None;
        Ok(())
    }
}

impl MnkPlayer for Engine {
    fn init_player(
        &mut self,
        rows: usize,
        cols: usize,
        k: usize,
        first: bool,
        timeout_secs: u64,
    ) -> Result<(), EngineError> {
        self.init_with_budget(rows, cols, k, first, Duration::from_secs(timeout_secs))
    }

    fn select_cell(&mut self, free: &[Cell], marked: &[Cell]) -> Result<Cell, EngineError> {
        let start = Instant::now();
        let game = self.game.as_mut().ok_or(EngineError::NotInitialized)?;
        if free.is_empty() {
            return Err(EngineError::NoFreeCells);
        }

        game.sync(marked)?;
        let to_move = game.position.current_player();
        if to_move != game.me {
            return Err(EngineError::OutOfTurn {
                expected: game.me,
                actual: to_move,
            });
        }

        if marked.is_empty() {
            let cell = game.opening(free).ok_or(EngineError::NoFreeCells)?;
            info!(row = cell.row, col = cell.col, "opening move");
            self.last_result = None;
            return Ok(cell);
        }

        let deadline = game.time.deadline(start);
        let result = game.searcher.search(&mut game.position, &deadline)?;
        let elapsed = start.elapsed();
        game.time.record(elapsed);

        info!(
            row = result.best.row,
            col = result.best.col,
            depth = ?result.depth,
            score = result.score,
            nodes = result.nodes,
            elapsed_ms = elapsed.as_millis() as u64,
            "selected cell"
        );
        debug_assert!(free.iter().any(|cell| cell.same_position(result.best)));

        let cell = result.best;
        self.last_result = Some(result);
        Ok(cell)
    }

    fn player_name(&self) -> &str {
        &self.config.name
    }
}
