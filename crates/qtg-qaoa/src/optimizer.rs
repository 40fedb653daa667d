//! Derivative-free minimisation.
//!
//! The [`Optimizer`] trait abstracts over the classical minimiser driving the
//! variational loop. [`NelderMead`] is the default: a downhill simplex with
//! the standard reflection, expansion, contraction and shrink steps.
//!
//! Termination is on the simplex size alone, like COBYLA's final trust
//! radius, so shot-based objectives terminate too.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::QaoaResult;

/// Result of an optimisation run.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Best parameter values found.
    pub optimal_params: Vec<f64>,
    /// Objective value at `optimal_params`.
    pub optimal_value: f64,
    /// Number of objective evaluations.
    pub num_evaluations: usize,
    /// Number of iterations.
    pub num_iterations: usize,
    /// Best value after each iteration.
    pub history: Vec<f64>,
    /// Whether the convergence criterion was met.
    pub converged: bool,
    /// Termination message.
    pub message: String,
}

/// A classical minimiser.
pub trait Optimizer {
    /// Minimise `objective` starting from `initial_params`.
    ///
    /// Errors returned by the objective abort the run and are passed
    /// through unchanged. Running out of iterations is not an error here;
    /// it is reported through [`OptimizationResult::converged`].
    fn minimize<F>(&self, objective: F, initial_params: Vec<f64>) -> QaoaResult<OptimizationResult>
    where
        F: FnMut(&[f64]) -> QaoaResult<f64>;
}

// Standard Nelder-Mead coefficients.
const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Nelder–Mead simplex minimiser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NelderMead {
    /// Maximum number of iterations.
    pub maxiter: usize,
    /// Largest coordinate distance from the best vertex at which the
    /// simplex counts as collapsed.
    pub tol: f64,
    /// Edge length of the initial simplex.
    pub initial_step: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            maxiter: 2000,
            tol: 1e-5,
            initial_step: 0.25,
        }
    }
}

impl NelderMead {
    /// Create a minimiser with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum iterations.
    #[must_use]
    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = maxiter;
        self
    }

    /// Set convergence tolerance.
    #[must_use]
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the initial simplex edge length.
    #[must_use]
    pub fn with_initial_step(mut self, step: f64) -> Self {
        self.initial_step = step;
        self
    }

    fn converged(&self, simplex: &[(Vec<f64>, f64)]) -> bool {
        let best = &simplex[0].0;
        let diameter = simplex
            .iter()
            .flat_map(|(x, _)| x.iter().zip(best).map(|(a, b)| (a - b).abs()))
            .fold(0.0, f64::max);
        diameter <= self.tol
    }
}

impl Optimizer for NelderMead {
    #[allow(clippy::cast_precision_loss)]
    fn minimize<F>(&self, mut objective: F, initial_params: Vec<f64>) -> QaoaResult<OptimizationResult>
    where
        F: FnMut(&[f64]) -> QaoaResult<f64>,
    {
        let n = initial_params.len();
        let mut num_evaluations = 0;
        let mut eval = |x: &[f64]| -> QaoaResult<f64> {
            num_evaluations += 1;
            objective(x)
        };

        let mut simplex = Vec::with_capacity(n + 1);
        let f0 = eval(&initial_params)?;
        simplex.push((initial_params.clone(), f0));
        for i in 0..n {
            let mut point = initial_params.clone();
            point[i] += self.initial_step;
            let f = eval(&point)?;
            simplex.push((point, f));
        }

        let mut history = Vec::new();
        let mut converged = false;
        let mut num_iterations = 0;

        while num_iterations < self.maxiter {
            simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
            if self.converged(&simplex) {
                converged = true;
                break;
            }
            num_iterations += 1;

            let f_best = simplex[0].1;
            let f_second = simplex[n.saturating_sub(1)].1;
            let (worst, f_worst) = simplex[n].clone();

            let mut centroid = vec![0.0; n];
            for (x, _) in &simplex[..n] {
                for (c, v) in centroid.iter_mut().zip(x) {
                    *c += v / n as f64;
                }
            }
            let toward = |t: f64, from: &[f64]| -> Vec<f64> {
                centroid
                    .iter()
                    .zip(from)
                    .map(|(c, x)| c + t * (x - c))
                    .collect()
            };

            let reflected = toward(-REFLECTION, &worst);
            let f_reflected = eval(&reflected)?;

            let mut shrink = false;
            if f_reflected < f_best {
                let expanded = toward(-REFLECTION * EXPANSION, &worst);
                let f_expanded = eval(&expanded)?;
                simplex[n] = if f_expanded < f_reflected {
                    (expanded, f_expanded)
                } else {
                    (reflected, f_reflected)
                };
            } else if f_reflected < f_second {
                simplex[n] = (reflected, f_reflected);
            } else if f_reflected < f_worst {
                let contracted = toward(-REFLECTION * CONTRACTION, &worst);
                let f_contracted = eval(&contracted)?;
                if f_contracted <= f_reflected {
                    simplex[n] = (contracted, f_contracted);
                } else {
                    shrink = true;
                }
            } else {
                let contracted = toward(CONTRACTION, &worst);
                let f_contracted = eval(&contracted)?;
                if f_contracted < f_worst {
                    simplex[n] = (contracted, f_contracted);
                } else {
                    shrink = true;
                }
            }

            if shrink {
                let best = simplex[0].0.clone();
                for vertex in simplex.iter_mut().skip(1) {
                    let point: Vec<f64> = best
                        .iter()
                        .zip(&vertex.0)
                        .map(|(b, x)| b + SHRINK * (x - b))
                        .collect();
                    let f = eval(&point)?;
                    *vertex = (point, f);
                }
            }

            let best = simplex
                .iter()
                .map(|(_, f)| *f)
                .fold(f64::INFINITY, f64::min);
            trace!(iteration = num_iterations, best, "Nelder-Mead step");
            history.push(best);
        }

        simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
        let message = if converged {
            "optimization terminated successfully".to_string()
        } else {
            format!("maximum number of iterations ({}) exceeded", self.maxiter)
        };
        let (optimal_params, optimal_value) = simplex.swap_remove(0);

        Ok(OptimizationResult {
            optimal_params,
            optimal_value,
            num_evaluations,
            num_iterations,
            history,
            converged,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QaoaError;

    fn rosenbrock(x: &[f64]) -> QaoaResult<f64> {
        Ok((1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2))
    }

    #[test]
    fn test_quadratic() {
        let opt = NelderMead::new().with_tol(1e-8);
        let result = opt
            .minimize(
                |x| Ok((x[0] - 1.0).powi(2) + (x[1] + 2.0).powi(2)),
                vec![0.0, 0.0],
            )
            .unwrap();
        assert!(result.converged);
        assert!((result.optimal_params[0] - 1.0).abs() < 1e-3);
        assert!((result.optimal_params[1] + 2.0).abs() < 1e-3);
        assert!(result.optimal_value < 1e-6);
        assert_eq!(result.history.len(), result.num_iterations);
    }

    #[test]
    fn test_rosenbrock() {
        let opt = NelderMead::new().with_maxiter(5000).with_tol(1e-8);
        let result = opt.minimize(rosenbrock, vec![-1.2, 1.0]).unwrap();
        assert!(result.converged);
        assert!((result.optimal_params[0] - 1.0).abs() < 1e-3);
        assert!((result.optimal_params[1] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_iterations_not_converged() {
        let result = NelderMead::new()
            .with_maxiter(0)
            .minimize(|x| Ok(x[0] * x[0]), vec![0.0])
            .unwrap();
        assert!(!result.converged);
        assert_eq!(result.num_iterations, 0);
        assert_eq!(result.message, "maximum number of iterations (0) exceeded");
    }

    #[test]
    fn test_no_parameters() {
        let result = NelderMead::new().minimize(|_| Ok(4.0), vec![]).unwrap();
        assert!(result.converged);
        assert_eq!(result.num_evaluations, 1);
        assert_eq!(result.optimal_value, 4.0);
    }

    #[test]
    fn test_noisy_objective_converges() {
        use rand::{Rng, SeedableRng, rngs::StdRng};

        let mut rng = StdRng::seed_from_u64(17);
        let result = NelderMead::new()
            .minimize(
                |x| {
                    let noise: f64 = rng.gen_range(-0.05..0.05);
                    Ok(x[0].cos() * x[1].sin() + noise)
                },
                vec![3.14, 1.57],
            )
            .unwrap();
        assert!(result.converged);
        assert!(result.num_iterations < 2000);
        assert!(result.optimal_value < 0.0);
    }

    #[test]
    fn test_objective_error_propagates() {
        let mut calls = 0;
        let result = NelderMead::new().minimize(
            |_| {
                calls += 1;
                if calls > 3 {
                    Err(QaoaError::InvalidConfig("boom".into()))
                } else {
                    Ok(1.0)
                }
            },
            vec![0.0, 0.0],
        );
        assert!(matches!(result, Err(QaoaError::InvalidConfig(_))));
    }
}
