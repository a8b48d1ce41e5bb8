//! Volatility update via the Illinois variant of regula falsi
//!
//! Finds the root of [`volatility_objective`] in `x = ln(σ²)`, following
//! step 5 of Glickman's Glicko-2 procedure. Both the bracket search and the
//! root iteration are bounded; running out of iterations is reported as
//! [`RatingError::SolverDidNotConverge`].

use crate::config::rating::RatingConfig;
use crate::error::RatingError;
use tracing::trace;

/// Twice the derivative of the conditional log-posterior of `x = ln(σ'²)`.
///
/// `deviation` is the pre-period deviation `φ`, `variance` the estimated
/// variance `v` of the period results, `difference_squared` the squared
/// estimated improvement `Δ²` and `alpha` is `ln(σ²)` of the current volatility.
pub fn volatility_objective(
    x: f64,
    deviation: f64,
    variance: f64,
    difference_squared: f64,
    alpha: f64,
    tau: f64,
) -> f64 {
    let ex = x.exp();
    let tmp = deviation.powi(2) + variance + ex;
    let a = ex * (difference_squared - tmp) / (2.0 * tmp.powi(2));
    let b = (x - alpha) / tau.powi(2);
    a - b
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatilitySolver {
    tau: f64,
    epsilon: f64,
    max_iterations: usize,
}

impl VolatilitySolver {
    pub fn new(tau: f64, epsilon: f64, max_iterations: usize) -> Self {
        Self {
            tau,
            epsilon,
            max_iterations,
        }
    }

    pub fn from_config(config: &RatingConfig) -> Self {
        Self::new(config.tau, config.epsilon, config.max_solver_iterations)
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Compute the new volatility `σ'` on the internal scale.
    pub fn solve(
        &self,
        deviation: f64,
        volatility: f64,
        difference: f64,
        variance: f64,
    ) -> crate::error::Result<f64> {
        let difference_squared = difference.powi(2);
        let alpha = volatility.powi(2).ln();
        let f = |x: f64| {
            volatility_objective(x, deviation, variance, difference_squared, alpha, self.tau)
        };

        let mut a = alpha;
        let mut b = if difference_squared > deviation.powi(2) + variance {
            (difference_squared - deviation.powi(2) - variance).ln()
        } else {
            self.expand_bracket(alpha, &f)?
        };

        let mut fa = f(a);
        let mut fb = f(b);

        let mut iterations = 0;
        while (b - a).abs() > self.epsilon {
            if iterations >= self.max_iterations {
                return Err(RatingError::SolverDidNotConverge {
                    stage: "illinois iteration".to_string(),
                    iterations,
                }
                .into());
            }
            iterations += 1;

            let c = a + (a - b) * fa / (fb - fa);
            let fc = f(c);
            if fc * fb < 0.0 {
                a = b;
                fa = fb;
            } else {
                fa /= 2.0;
            }
            b = c;
            fb = fc;
        }

        trace!(iterations, volatility = (a / 2.0).exp(), "volatility solver converged");
        Ok((a / 2.0).exp())
    }

    /// Step down from `alpha` in multiples of `τ` until the objective is
    /// non-negative.
    fn expand_bracket(&self, alpha: f64, f: &impl Fn(f64) -> f64) -> crate::error::Result<f64> {
        let step = self.tau.powi(2).sqrt();
        for k in 1..=self.max_iterations {
            let b = alpha - k as f64 * step;
            if f(b) >= 0.0 {
                return Ok(b);
            }
        }

        Err(RatingError::SolverDidNotConverge {
            stage: "bracket expansion".to_string(),
            iterations: self.max_iterations,
        }
        .into())
    }
}

impl Default for VolatilitySolver {
    fn default() -> Self {
        Self::from_config(&RatingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_converges_on_first_match_input() {
        // A fresh 350-deviation player beating an identical opponent
        let solver = VolatilitySolver::default();
        let deviation = 350.0 / 173.7178;
        let g = 1.0 / (1.0 + 3.0 * deviation * deviation / std::f64::consts::PI.powi(2)).sqrt();
        let variance = 1.0 / (g * g * 0.25);
        let difference = variance * g * 0.5;

        let sigma = solver.solve(deviation, 0.06, difference, variance).unwrap();
        assert!(sigma > 0.0);
        assert!((sigma - 0.06).abs() < 0.001);

        let residual = volatility_objective(
            sigma.powi(2).ln(),
            deviation,
            variance,
            difference * difference,
            0.06f64.powi(2).ln(),
            solver.tau(),
        );
        assert!(residual.abs() < solver.epsilon());
    }

    #[test]
    fn test_glickman_reference_volatility() {
        let solver = VolatilitySolver::new(0.5, 0.000001, 100);
        let sigma = solver.solve(1.1513, 0.06, -0.4834, 1.7785).unwrap();
        assert!((sigma - 0.05999).abs() < 1e-4);
    }

    #[test]
    fn test_large_surprise_uses_direct_bracket() {
        // Δ² > φ² + v, so no bracket expansion happens
        let solver = VolatilitySolver::default();
        let sigma = solver.solve(0.5, 0.06, 3.0, 1.0).unwrap();
        assert!(sigma.is_finite());
        assert!(sigma > 0.06);
    }

    #[test]
    fn test_bracket_expansion_bound() {
        let solver = VolatilitySolver::new(10.0, 0.000001, 1);
        let err = solver.solve(0.001, 1.0, 0.0, 0.000001).unwrap_err();
        match err.downcast_ref::<RatingError>() {
            Some(RatingError::SolverDidNotConverge { stage, iterations }) => {
                assert_eq!(stage, "bracket expansion");
                assert_eq!(*iterations, 1);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        // The same input converges once the bound allows a second step
        let solver = VolatilitySolver::new(10.0, 0.000001, 100);
        assert!(solver.solve(0.001, 1.0, 0.0, 0.000001).is_ok());
    }

    #[test]
    fn test_illinois_iteration_bound() {
        let solver = VolatilitySolver::new(0.5, 0.000001, 1);
        let err = solver.solve(1.1513, 0.06, -0.4834, 1.7785).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RatingError>(),
            Some(RatingError::SolverDidNotConverge { .. })
        ));
    }

    #[test]
    fn test_objective_negative_at_alpha_without_surprise() {
        // Δ² = φ² + v leaves only the -eˣ part of the data term
        let alpha = 0.06f64.powi(2).ln();
        let f = volatility_objective(alpha, 1.0, 1.0, 2.0, alpha, 1.0);
        assert!(f < 0.0);
    }

    proptest! {
        #[test]
        fn prop_solver_returns_positive_volatility(
            deviation in 0.2f64..2.1,
            volatility in 0.02f64..0.2,
            difference in -4.0f64..4.0,
            variance in 0.5f64..20.0,
        ) {
            let solver = VolatilitySolver::default();
            let sigma = solver.solve(deviation, volatility, difference, variance).unwrap();
            prop_assert!(sigma.is_finite());
            prop_assert!(sigma > 0.0);
        }
    }
}
