//! Rating snapshot and match score values

use serde::{Deserialize, Serialize};
use std::fmt;

/// A competitor's rating at one point in time, on the public scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Skill estimate. Higher is better.
    pub mean: f64,
    /// Uncertainty of the skill estimate. Must be positive.
    pub deviation: f64,
    /// Expected fluctuation of skill over time. Must be positive.
    pub volatility: f64,
}

impl Rating {
    pub fn new(mean: f64, deviation: f64, volatility: f64) -> Self {
        Self {
            mean,
            deviation,
            volatility,
        }
    }

    /// Copy of this rating with `delta` added to the mean
    #[must_use]
    pub fn shifted(self, delta: f64) -> Self {
        Self {
            mean: self.mean + delta,
            ..self
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rating(mean={:.3}, deviation={:.3}, volatility={:.3})",
            self.mean, self.deviation, self.volatility
        )
    }
}

/// Deviation implied by how many matches a competitor has played.
///
/// Few matches mean little is known about the competitor.
pub fn deviation_for_activity(matches_played: u32) -> f64 {
    match matches_played {
        0..=4 => 350.0,
        5..=20 => 250.0,
        _ => 150.0,
    }
}

/// A score in the range `0.0..=1.0`, where `0.0` is a loss and `1.0` is a win.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Score(pub f64);

impl Score {
    pub const LOSS: Score = Score(0.0);
    pub const DRAW: Score = Score(0.5);
    pub const WIN: Score = Score(1.0);

    pub fn opposite(self) -> Score {
        Score(1.0 - self.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<Score> for f64 {
    fn from(Score(score): Score) -> f64 {
        score
    }
}
