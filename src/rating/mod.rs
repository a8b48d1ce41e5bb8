//! Glicko-2 rating engine with badminton-specific adjustments
//!
//! This module provides the rating value types, the scale transform, the
//! expectation model, the volatility solver, the per-period update engine and
//! the match point calculator that commits ratings into a store.

pub mod adjustments;
pub mod calculator;
pub mod engine;
pub mod expectation;
pub mod model;
pub mod scale;
pub mod storage;
pub mod volatility;

// Re-export commonly used types
pub use adjustments::{EventGrade, Forfeit, MatchDeltas, RoundStage, Side};
pub use calculator::{MatchPointCalculator, MatchPoints, PointsBreakdown};
pub use engine::{OneOnOneUpdate, RatingEngine};
pub use model::{Rating, Score};
pub use scale::{InternalRating, ScaleTransform};
pub use storage::{InMemoryRatingStore, MockRatingStore, RatingEntry, RatingStore};
pub use volatility::{volatility_objective, VolatilitySolver};
