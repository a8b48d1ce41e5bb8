//! Rating system configuration

use crate::error::RatingError;
use serde::{Deserialize, Serialize};

/// Ratio between the public rating scale and the internal Glicko-2 scale
pub const INTERNAL_RATING_SCALE: f64 = 173.7178;

/// Parameters of the statistical rating model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Mean given to new competitors, also the origin of the internal scale
    pub default_mean: f64,
    /// Deviation given to new competitors without an activity hint
    pub default_deviation: f64,
    /// Volatility given to new competitors
    pub default_volatility: f64,
    /// Constrains how fast volatility may change between periods
    pub tau: f64,
    /// Convergence tolerance of the volatility solver
    pub epsilon: f64,
    /// Public-to-internal scale ratio
    pub scale_ratio: f64,
    /// Upper bound on bracket expansion and Illinois iterations
    pub max_solver_iterations: usize,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            default_mean: 1800.0,
            default_deviation: 350.0,
            default_volatility: 0.06,
            tau: 1.0,
            epsilon: 0.000001,
            scale_ratio: INTERNAL_RATING_SCALE,
            max_solver_iterations: 100,
        }
    }
}

impl RatingConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.default_mean.is_finite() {
            return Err(RatingError::ConfigurationError {
                message: "Default mean must be finite".to_string(),
            }
            .into());
        }

        if !(self.default_deviation > 0.0) {
            return Err(RatingError::ConfigurationError {
                message: "Default deviation must be positive".to_string(),
            }
            .into());
        }

        if !(self.default_volatility > 0.0) {
            return Err(RatingError::ConfigurationError {
                message: "Default volatility must be positive".to_string(),
            }
            .into());
        }

        if !(self.tau > 0.0) {
            return Err(RatingError::ConfigurationError {
                message: "Tau must be positive".to_string(),
            }
            .into());
        }

        if !(self.epsilon > 0.0) {
            return Err(RatingError::ConfigurationError {
                message: "Epsilon must be positive".to_string(),
            }
            .into());
        }

        if !(self.scale_ratio > 0.0) {
            return Err(RatingError::ConfigurationError {
                message: "Scale ratio must be positive".to_string(),
            }
            .into());
        }

        if self.max_solver_iterations == 0 {
            return Err(RatingError::ConfigurationError {
                message: "Solver iteration bound must be greater than 0".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Sport-specific adjustments applied on top of the statistical update.
///
/// The grade and round tables are fixed enumerations, see
/// [`crate::rating::adjustments`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentConfig {
    /// Mean gap above which the winner is treated as an outsider
    pub outsider_gap_threshold: f64,
    /// Fraction added to the outsider winner's delta
    pub outsider_bonus: f64,
    /// Points removed from a competitor who retired mid-match
    pub retirement_penalty: f64,
    /// Points removed from a competitor who gave a walkover
    pub walkover_penalty: f64,
}

impl Default for AdjustmentConfig {
    fn default() -> Self {
        Self {
            outsider_gap_threshold: 250.0,
            outsider_bonus: 0.1,
            retirement_penalty: 40.0,
            walkover_penalty: 80.0,
        }
    }
}

impl AdjustmentConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(self.outsider_gap_threshold >= 0.0) {
            return Err(RatingError::ConfigurationError {
                message: "Outsider gap threshold must be non-negative".to_string(),
            }
            .into());
        }

        if !(self.outsider_bonus >= 0.0) {
            return Err(RatingError::ConfigurationError {
                message: "Outsider bonus must be non-negative".to_string(),
            }
            .into());
        }

        if !(self.retirement_penalty >= 0.0) || !(self.walkover_penalty >= 0.0) {
            return Err(RatingError::ConfigurationError {
                message: "Penalties must be non-negative".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_config_default() {
        let config = RatingConfig::default();
        assert_eq!(config.default_mean, 1800.0);
        assert_eq!(config.default_deviation, 350.0);
        assert_eq!(config.default_volatility, 0.06);
        assert_eq!(config.tau, 1.0);
        assert_eq!(config.epsilon, 1e-6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rating_config_validation() {
        let mut config = RatingConfig::default();
        config.default_deviation = 0.0;
        assert!(config.validate().is_err());

        config = RatingConfig::default();
        config.default_volatility = -0.1;
        assert!(config.validate().is_err());

        config = RatingConfig::default();
        config.tau = f64::NAN;
        assert!(config.validate().is_err());

        config = RatingConfig::default();
        config.max_solver_iterations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_adjustment_config_validation() {
        let config = AdjustmentConfig::default();
        assert_eq!(config.outsider_gap_threshold, 250.0);
        assert_eq!(config.retirement_penalty, 40.0);
        assert_eq!(config.walkover_penalty, 80.0);
        assert!(config.validate().is_ok());

        let mut config = AdjustmentConfig::default();
        config.walkover_penalty = -1.0;
        assert!(config.validate().is_err());
    }
}
