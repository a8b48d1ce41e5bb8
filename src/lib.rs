//! SmartRank - Glicko-2 based ratings for badminton singles
//!
//! This crate provides the statistical rating engine (scale transform,
//! expectation model, volatility solver, per-period update), the match point
//! calculator with its outsider, grade, round and forfeit adjustments, and
//! replay of a match history into rating trajectories.

pub mod config;
pub mod error;
pub mod rating;
pub mod replay;
pub mod types;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use rating::{
    InMemoryRatingStore, MatchPointCalculator, MatchPoints, Rating, RatingEngine, RatingStore,
    Score,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
