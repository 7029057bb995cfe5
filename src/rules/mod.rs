//! Game rules for m,n,k-games
//!
//! This module implements the win condition: K or more marks of one side
//! aligned on any axis.

pub mod win;

// Re-exports for convenient access
pub use win::{has_k_at, run_length};
