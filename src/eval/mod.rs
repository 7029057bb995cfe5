//! Evaluation module for m,n,k positions
//!
//! The evaluation reads only catalog counts and the game state:
//! - K in a row for either side
//! - k-1 open, k-1 half-open and k-2 open threat counts per side
//! - per-side weights, heavier for the adversary

pub mod heuristic;
pub mod patterns;

pub use heuristic::Evaluator;
pub use patterns::{BucketWeights, ThreatScore, ThreatWeights};
