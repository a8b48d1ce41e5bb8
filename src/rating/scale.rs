//! Conversion between the public rating scale and the internal Glicko-2 scale

use crate::config::rating::INTERNAL_RATING_SCALE;
use crate::rating::model::Rating;

/// A rating expressed on the internal scale used by the statistical update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InternalRating {
    pub mean: f64,
    pub deviation: f64,
    pub volatility: f64,
}

/// Maps ratings between scales around a baseline mean
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleTransform {
    baseline_mean: f64,
    ratio: f64,
}

impl ScaleTransform {
    pub fn new(baseline_mean: f64, ratio: f64) -> Self {
        Self {
            baseline_mean,
            ratio,
        }
    }

    /// Standard ratio around the given baseline mean
    pub fn with_baseline(baseline_mean: f64) -> Self {
        Self::new(baseline_mean, INTERNAL_RATING_SCALE)
    }

    pub fn baseline_mean(&self) -> f64 {
        self.baseline_mean
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn scale_down(&self, rating: &Rating) -> InternalRating {
        InternalRating {
            mean: (rating.mean - self.baseline_mean) / self.ratio,
            deviation: rating.deviation / self.ratio,
            volatility: rating.volatility,
        }
    }

    pub fn scale_up(&self, rating: &InternalRating) -> Rating {
        Rating {
            mean: rating.mean * self.ratio + self.baseline_mean,
            deviation: rating.deviation * self.ratio,
            volatility: rating.volatility,
        }
    }
}
