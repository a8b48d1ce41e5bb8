//! Opponent impact and expected score on the internal scale

use crate::rating::scale::InternalRating;
use std::f64::consts::PI;

/// The `g(φ)` factor: shrinks towards 0 as the opponent's deviation grows,
/// so results against uncertain opponents move ratings less.
pub fn reduce_impact(rating: &InternalRating) -> f64 {
    1.0 / (1.0 + 3.0 * rating.deviation.powi(2) / (PI * PI)).sqrt()
}

/// Probability that `rating` beats `other`, given the opponent impact factor
pub fn expect_score(rating: &InternalRating, other: &InternalRating, impact: f64) -> f64 {
    1.0 / (1.0 + (-impact * (rating.mean - other.mean)).exp())
}
