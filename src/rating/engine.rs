//! Glicko-2 rating update engine
//!
//! Runs the per-period statistical update for one competitor and offers a
//! one-on-one form that rates each side of a single match independently.

use crate::config::rating::RatingConfig;
use crate::error::RatingError;
use crate::rating::expectation::{expect_score, reduce_impact};
use crate::rating::model::{deviation_for_activity, Rating, Score};
use crate::rating::scale::{InternalRating, ScaleTransform};
use crate::rating::volatility::VolatilitySolver;
use serde::{Deserialize, Serialize};

/// Both sides of a single match after the statistical update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OneOnOneUpdate {
    pub player1: Rating,
    pub player2: Rating,
    /// `player1.mean` minus player 1's mean before the match
    pub delta1: f64,
    /// `player2.mean` minus player 2's mean before the match
    pub delta2: f64,
}

#[derive(Debug, Clone)]
pub struct RatingEngine {
    config: RatingConfig,
    scale: ScaleTransform,
    solver: VolatilitySolver,
}

impl RatingEngine {
    /// Create a new rating engine
    pub fn new(config: RatingConfig) -> crate::error::Result<Self> {
        config.validate()?;

        Ok(Self {
            scale: ScaleTransform::new(config.default_mean, config.scale_ratio),
            solver: VolatilitySolver::from_config(&config),
            config,
        })
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    pub fn scale(&self) -> &ScaleTransform {
        &self.scale
    }

    pub fn solver(&self) -> &VolatilitySolver {
        &self.solver
    }

    /// Rating given to competitors nobody has seen yet
    pub fn default_rating(&self) -> Rating {
        self.create_rating(None, None, None, None)
    }

    /// Build a rating, falling back to configured defaults.
    ///
    /// Without an explicit `deviation`, `matches_played` picks one from the
    /// competitor's activity.
    pub fn create_rating(
        &self,
        mean: Option<f64>,
        deviation: Option<f64>,
        volatility: Option<f64>,
        matches_played: Option<u32>,
    ) -> Rating {
        let deviation = deviation.unwrap_or_else(|| {
            matches_played
                .map(deviation_for_activity)
                .unwrap_or(self.config.default_deviation)
        });

        Rating {
            mean: mean.unwrap_or(self.config.default_mean),
            deviation,
            volatility: volatility.unwrap_or(self.config.default_volatility),
        }
    }

    /// Update `rating` from one period of results against other competitors.
    ///
    /// An empty `series` only widens the deviation, modelling inactivity.
    pub fn rate(&self, rating: &Rating, series: &[(Score, Rating)]) -> crate::error::Result<Rating> {
        let current = self.scale.scale_down(rating);

        if series.is_empty() {
            let deviation_star = (current.deviation.powi(2) + current.volatility.powi(2)).sqrt();
            return Ok(self.scale.scale_up(&InternalRating {
                deviation: deviation_star,
                ..current
            }));
        }

        let mut variance_inv = 0.0;
        let mut difference = 0.0;
        for (score, opponent) in series {
            let opponent = self.scale.scale_down(opponent);
            let impact = reduce_impact(&opponent);
            let expected = expect_score(&current, &opponent, impact);
            variance_inv += impact.powi(2) * expected * (1.0 - expected);
            difference += impact * (score.value() - expected);
        }

        if !(variance_inv > 0.0) || !variance_inv.is_finite() {
            return Err(RatingError::RatingCalculationFailed {
                reason: format!("Degenerate result variance (inverse {})", variance_inv),
            }
            .into());
        }

        difference /= variance_inv;
        let variance = 1.0 / variance_inv;

        let volatility =
            self.solver
                .solve(current.deviation, current.volatility, difference, variance)?;

        let deviation_star = (current.deviation.powi(2) + volatility.powi(2)).sqrt();
        let deviation = 1.0 / (1.0 / deviation_star.powi(2) + 1.0 / variance).sqrt();
        let mean = current.mean + deviation.powi(2) * (difference / variance);

        Ok(self.scale.scale_up(&InternalRating {
            mean,
            deviation,
            volatility,
        }))
    }

    /// Rate both sides of one match, each against the other's pre-match rating.
    pub fn rate_1v1(
        &self,
        player1: &Rating,
        player2: &Rating,
        player1_won: bool,
    ) -> crate::error::Result<OneOnOneUpdate> {
        let score1 = if player1_won { Score::WIN } else { Score::LOSS };

        let rated1 = self.rate(player1, &[(score1, *player2)])?;
        let rated2 = self.rate(player2, &[(score1.opposite(), *player1)])?;

        Ok(OneOnOneUpdate {
            delta1: rated1.mean - player1.mean,
            delta2: rated2.mean - player2.mean,
            player1: rated1,
            player2: rated2,
        })
    }
}

impl Default for RatingEngine {
    fn default() -> Self {
        let config = RatingConfig::default();
        Self {
            scale: ScaleTransform::new(config.default_mean, config.scale_ratio),
            solver: VolatilitySolver::from_config(&config),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rating_defaults() {
        let engine = RatingEngine::default();
        let rating = engine.default_rating();
        assert_eq!(rating, Rating::new(1800.0, 350.0, 0.06));
    }

    #[test]
    fn test_create_rating_activity_hint() {
        let engine = RatingEngine::default();
        assert_eq!(engine.create_rating(None, None, None, Some(2)).deviation, 350.0);
        assert_eq!(engine.create_rating(None, None, None, Some(12)).deviation, 250.0);
        assert_eq!(engine.create_rating(None, None, None, Some(40)).deviation, 150.0);

        // An explicit deviation wins over the hint
        let rating = engine.create_rating(Some(2000.0), Some(90.0), Some(0.05), Some(40));
        assert_eq!(rating, Rating::new(2000.0, 90.0, 0.05));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RatingConfig {
            tau: 0.0,
            ..RatingConfig::default()
        };
        assert!(RatingEngine::new(config).is_err());
    }

    #[test]
    fn test_inactivity_widens_deviation_only() {
        let engine = RatingEngine::default();
        let rating = Rating::new(1800.0, 350.0, 0.06);

        let decayed = engine.rate(&rating, &[]).unwrap();

        assert!((decayed.mean - 1800.0).abs() < 1e-9);
        assert!(decayed.deviation > 350.0);
        assert_eq!(decayed.volatility, 0.06);
    }

    #[test]
    fn test_glickman_reference_example() {
        // Glickman's worked example, shifted by +300 onto this baseline
        let engine = RatingEngine::new(RatingConfig {
            tau: 0.5,
            ..RatingConfig::default()
        })
        .unwrap();

        let player = Rating::new(1800.0, 200.0, 0.06);
        let series = [
            (Score::WIN, Rating::new(1700.0, 30.0, 0.06)),
            (Score::LOSS, Rating::new(1850.0, 100.0, 0.06)),
            (Score::LOSS, Rating::new(2000.0, 300.0, 0.06)),
        ];

        let rated = engine.rate(&player, &series).unwrap();

        assert!((rated.mean - 1764.05).abs() < 0.1);
        assert!((rated.deviation - 151.52).abs() < 0.1);
        assert!((rated.volatility - 0.05999).abs() < 1e-4);
    }

    #[test]
    fn test_rate_1v1_symmetric() {
        let engine = RatingEngine::default();
        let rating = engine.default_rating();

        let update = engine.rate_1v1(&rating, &rating, true).unwrap();

        assert!(update.delta1 > 0.0);
        assert!(update.delta2 < 0.0);
        assert!((update.delta1 + update.delta2).abs() < 1e-9);
        assert!((update.player1.deviation - update.player2.deviation).abs() < 1e-9);
        assert!(update.player1.deviation < 350.0);
    }

    #[test]
    fn test_rate_1v1_upset_moves_more() {
        let engine = RatingEngine::default();
        let favourite = Rating::new(2100.0, 150.0, 0.06);
        let underdog = Rating::new(1700.0, 150.0, 0.06);

        let expected_win = engine.rate_1v1(&favourite, &underdog, true).unwrap();
        let upset = engine.rate_1v1(&favourite, &underdog, false).unwrap();

        assert!(upset.delta2 > expected_win.delta1);
        assert!(upset.delta1 < 0.0);
        assert!(expected_win.delta2 < 0.0);
    }

    #[test]
    fn test_draw_between_equals_keeps_mean() {
        let engine = RatingEngine::default();
        let rating = engine.default_rating();

        let rated = engine.rate(&rating, &[(Score::DRAW, rating)]).unwrap();

        assert!((rated.mean - rating.mean).abs() < 1e-9);
        assert!(rated.deviation < rating.deviation);
    }
}
