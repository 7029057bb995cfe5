//! Search module for the m,n,k engine
//!
//! Contains:
//! - Per-move time budget with an adaptive safety margin
//! - Alpha-Beta search with iterative deepening and null-window refinement

pub mod alphabeta;
pub mod time;

pub use alphabeta::{SearchError, SearchResult, Searcher, INF};
pub use time::{Deadline, TimeBudget};
