//! m,n,k-game engine driven by an incremental threat catalog
//!
//! Plays generalized tic-tac-toe: an M x N board, K in a row to win:
//! - P1 moves first, sides alternate
//! - K or more consecutive marks on a row, column or diagonal win
//! - a full board without a win is a draw
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Board representation, axis geometry, move history
//! - [`rules`]: K-in-a-row detection
//! - [`threats`]: Threat catalog, incremental maintenance, redundancy filtering
//! - [`position`]: Board and catalog kept in step, scoped move guard
//! - [`eval`]: Position evaluation from threat counts
//! - [`search`]: Time-bounded iterative-deepening alpha-beta
//! - [`engine`]: Harness-facing player
//!
//! # Quick Start
//!
//! ```
//! use mnk::{Engine, EngineConfig, MnkPlayer, Board};
//!
//! let mut board = Board::new(7, 7, 4).unwrap();
//! let mut engine = Engine::with_config(EngineConfig::default().with_max_depth(Some(2)));
//! engine.init_player(7, 7, 4, false, 1).unwrap();
//!
//! board.mark(3, 3).unwrap();
//!
//! // Engine replies as P2
//! let cell = engine.select_cell(&board.free_cells(), board.marked_cells()).unwrap();
//! board.mark(cell.row, cell.col).unwrap();
//! println!("engine plays at ({}, {})", cell.row, cell.col);
//! ```
//!
//! # Threats
//!
//! The catalog tracks, per player and axis, runs one or two marks short of
//! K: k-1 open, k-1 half-open (optionally with one gap) and k-2 open. It is
//! updated after every mark and unmark by rescanning only the four lines
//! through the changed cell, and always equals what a full-board scan would
//! produce.

pub mod board;
pub mod engine;
pub mod eval;
pub mod position;
pub mod rules;
pub mod search;
pub mod threats;

// Re-export commonly used types for convenience
pub use board::{Axis, Board, BoardError, Cell, GameState, Mark, Player};
pub use engine::{Engine, EngineConfig, EngineError, MnkPlayer};
pub use eval::{Evaluator, ThreatWeights};
pub use position::{MoveGuard, Position};
pub use search::{Deadline, SearchError, SearchResult, Searcher, TimeBudget};
pub use threats::{Threat, ThreatCatalog, ThreatKind};
