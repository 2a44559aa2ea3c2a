//! Damped Newton iteration with bound-enforcing line search.

use crate::error::{SolverError, SolverResult};
use nalgebra::DVector;
use tracing::debug;

/// Line-search strategy applied to each Newton step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineSearch {
    /// Scalar bound enforcement: violating variables are clipped to their
    /// declared bounds; the step is otherwise taken at full length. This is
    /// the default and suffices for most cycle configurations.
    BoundsEnforce,
    /// Armijo-Goldstein backtracking on the residual norm (with bound
    /// clipping), for harder-converging configurations. `c` is the required
    /// fractional decrease per unit step.
    ArmijoGoldstein { c: f64 },
}

/// Newton solver configuration.
#[derive(Debug, Clone)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance for residual norm
    pub abs_tol: f64,
    /// Relative tolerance for residual norm (vs. the initial norm)
    pub rel_tol: f64,
    /// Line-search strategy
    pub line_search: LineSearch,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            abs_tol: 1e-6,
            rel_tol: 1e-6,
            line_search: LineSearch::BoundsEnforce,
            line_search_beta: 0.5,
            max_line_search_iters: 20,
        }
    }
}

/// Per-variable box bounds for the iterate.
#[derive(Debug, Clone)]
pub struct Bounds {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl Bounds {
    /// Unbounded in every variable.
    pub fn none(n: usize) -> Self {
        Self {
            lower: vec![f64::NEG_INFINITY; n],
            upper: vec![f64::INFINITY; n],
        }
    }

    pub fn validate(&self, n: usize) -> SolverResult<()> {
        if self.lower.len() != n || self.upper.len() != n {
            return Err(SolverError::ProblemSetup {
                what: format!(
                    "bounds length mismatch: lower={}, upper={}, n={}",
                    self.lower.len(),
                    self.upper.len(),
                    n
                ),
            });
        }
        for i in 0..n {
            if self.lower[i] > self.upper[i] {
                return Err(SolverError::ProblemSetup {
                    what: format!("lower bound exceeds upper bound at variable {i}"),
                });
            }
        }
        Ok(())
    }

    /// Clip a candidate iterate into the box (scalar enforcement).
    fn clip(&self, x: &mut DVector<f64>) {
        for i in 0..x.len() {
            x[i] = x[i].max(self.lower[i]).min(self.upper[i]);
        }
    }
}

/// Terminal state of a Newton solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Residual norm met the requested tolerance.
    Converged,
    /// Iteration budget exhausted without meeting tolerance.
    MaxIterExceeded,
    /// The line search could make no further progress.
    Stalled,
}

/// Newton iteration result.
#[derive(Debug, Clone)]
pub struct NewtonResult {
    /// Solution vector (best iterate seen)
    pub x: DVector<f64>,
    /// Final residual norm
    pub residual_norm: f64,
    /// Number of iterations
    pub iterations: usize,
    /// Terminal status
    pub status: SolveStatus,
}

impl NewtonResult {
    pub fn converged(&self) -> bool {
        self.status == SolveStatus::Converged
    }
}

/// Damped Newton: solve `R(x) = 0` within the given bounds.
///
/// Each iteration evaluates the residual and Jacobian, solves
/// `J · Δx = −R` by dense LU, then applies the configured line search. A
/// residual evaluation that *errors* during the line search is treated as an
/// invalid trial step and backtracked, not propagated; transient excursions
/// into evaluable-but-unphysical regions are the line search's problem, not
/// the caller's. Only a failure at the accepted iterate is fatal.
pub fn newton_solve<F, J>(
    x0: DVector<f64>,
    bounds: &Bounds,
    residual_fn: F,
    jacobian_fn: J,
    config: &NewtonConfig,
) -> SolverResult<NewtonResult>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
    J: Fn(&DVector<f64>) -> SolverResult<nalgebra::DMatrix<f64>>,
{
    bounds.validate(x0.len())?;

    let mut x = x0.clone();
    bounds.clip(&mut x);
    let mut r = residual_fn(&x)?;
    let mut r_norm = r.norm();
    let r0_norm = r_norm;

    if !r_norm.is_finite() {
        return Err(SolverError::Numeric {
            what: "non-finite residual at initial point".to_string(),
        });
    }

    for iter in 0..config.max_iterations {
        // Check convergence
        if r_norm < config.abs_tol || r_norm < config.rel_tol * r0_norm {
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
                status: SolveStatus::Converged,
            });
        }

        // Compute Jacobian and solve J * dx = -r
        let jac = jacobian_fn(&x)?;
        let dx = jac
            .lu()
            .solve(&(-r.clone()))
            .ok_or(SolverError::SingularJacobian { iteration: iter })?;

        // Line search
        let mut alpha = 1.0_f64;
        let mut accepted = None;
        for _ in 0..=config.max_line_search_iters {
            let mut x_new = &x + alpha * &dx;
            bounds.clip(&mut x_new);

            match residual_fn(&x_new) {
                Ok(r_new) => {
                    let r_new_norm = r_new.norm();
                    let ok = match config.line_search {
                        // Bound enforcement alone: accept the (clipped) step.
                        LineSearch::BoundsEnforce => r_new_norm.is_finite(),
                        LineSearch::ArmijoGoldstein { c } => {
                            r_new_norm.is_finite() && r_new_norm <= (1.0 - c * alpha) * r_norm
                        }
                    };
                    if ok {
                        accepted = Some((x_new, r_new, r_new_norm));
                        break;
                    }
                }
                Err(_) => {
                    // invalid trial point; backtrack and retry
                }
            }
            alpha *= config.line_search_beta;
        }

        let Some((x_new, r_new, r_new_norm)) = accepted else {
            debug!(iteration = iter, "line search stalled");
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
                status: SolveStatus::Stalled,
            });
        };

        debug!(
            iteration = iter,
            alpha,
            residual_norm = r_new_norm,
            "newton step"
        );

        // Detect stagnation: the clipped step moved nowhere
        let step = (&x_new - &x).norm();
        x = x_new;
        r = r_new;
        r_norm = r_new_norm;
        if step < 1e-14 * (1.0 + x.norm()) {
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter + 1,
                status: SolveStatus::Stalled,
            });
        }
    }

    // Final convergence check after the last step
    let status = if r_norm < config.abs_tol || r_norm < config.rel_tol * r0_norm {
        SolveStatus::Converged
    } else {
        SolveStatus::MaxIterExceeded
    };
    Ok(NewtonResult {
        x,
        residual_norm: r_norm,
        iterations: config.max_iterations,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jacobian::finite_difference_jacobian;

    #[test]
    fn simple_quadratic() {
        // Solve x^2 - 4 = 0, x > 0
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] * x[0] - 4.0))
        };
        let jacobian = |x: &DVector<f64>| -> SolverResult<nalgebra::DMatrix<f64>> {
            Ok(nalgebra::DMatrix::from_element(1, 1, 2.0 * x[0]))
        };

        let x0 = DVector::from_element(1, 3.0);
        let config = NewtonConfig::default();
        let result = newton_solve(x0, &Bounds::none(1), residual, jacobian, &config).unwrap();

        assert!(result.converged());
        assert!((result.x[0] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn bounds_keep_iterate_on_positive_root() {
        // x^2 = 4 has two roots; a lower bound of 0 forces x = +2 even from a
        // starting point whose Newton step would cross into negative territory.
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] * x[0] - 4.0))
        };
        let jacobian = |x: &DVector<f64>| -> SolverResult<nalgebra::DMatrix<f64>> {
            Ok(nalgebra::DMatrix::from_element(1, 1, 2.0 * x[0]))
        };

        let bounds = Bounds {
            lower: vec![0.5],
            upper: vec![f64::INFINITY],
        };
        let x0 = DVector::from_element(1, 0.6);
        let result = newton_solve(x0, &bounds, residual, jacobian, &NewtonConfig::default()).unwrap();
        assert!(result.converged());
        assert!((result.x[0] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn coupled_system_with_fd_jacobian() {
        // x0 + x1 = 3, x0 * x1 = 2  ->  (1, 2) or (2, 1)
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_vec(vec![
                x[0] + x[1] - 3.0,
                x[0] * x[1] - 2.0,
            ]))
        };
        let jacobian = |x: &DVector<f64>| -> SolverResult<nalgebra::DMatrix<f64>> {
            finite_difference_jacobian(x, residual, 1e-7)
        };
        let x0 = DVector::from_vec(vec![0.5, 2.5]);
        let result =
            newton_solve(x0, &Bounds::none(2), residual, jacobian, &NewtonConfig::default())
                .unwrap();
        assert!(result.converged());
        assert!((result.x[0] * result.x[1] - 2.0).abs() < 1e-6);
        assert!((result.x[0] + result.x[1] - 3.0).abs() < 1e-6);
    }

    #[test]
    fn singular_jacobian_is_fatal() {
        let residual = |_x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, 1.0))
        };
        let jacobian = |_x: &DVector<f64>| -> SolverResult<nalgebra::DMatrix<f64>> {
            Ok(nalgebra::DMatrix::from_element(1, 1, 0.0))
        };
        let x0 = DVector::from_element(1, 1.0);
        let err = newton_solve(
            x0,
            &Bounds::none(1),
            residual,
            jacobian,
            &NewtonConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SolverError::SingularJacobian { .. }));
    }

    #[test]
    fn max_iterations_is_a_status_not_an_error() {
        // cos(x) = 0 from a pathological config: 1 iteration budget
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0].cos()))
        };
        let jacobian = |x: &DVector<f64>| -> SolverResult<nalgebra::DMatrix<f64>> {
            Ok(nalgebra::DMatrix::from_element(1, 1, -x[0].sin()))
        };
        let config = NewtonConfig {
            max_iterations: 1,
            ..NewtonConfig::default()
        };
        let result = newton_solve(
            DVector::from_element(1, 0.3),
            &Bounds::none(1),
            residual,
            jacobian,
            &config,
        )
        .unwrap();
        assert_eq!(result.status, SolveStatus::MaxIterExceeded);
    }

    #[test]
    fn residual_error_during_line_search_is_backtracked() {
        // ln(x) is only evaluable for x > 0: the full Newton step from x = 3
        // lands at a negative iterate, which must be treated as an invalid
        // trial point (backtrack), not a fatal error.
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            if x[0] <= 0.0 {
                return Err(SolverError::Residual {
                    what: "non-positive argument".to_string(),
                });
            }
            Ok(DVector::from_element(1, x[0].ln()))
        };
        let jacobian = |x: &DVector<f64>| -> SolverResult<nalgebra::DMatrix<f64>> {
            Ok(nalgebra::DMatrix::from_element(1, 1, 1.0 / x[0]))
        };
        let result = newton_solve(
            DVector::from_element(1, 3.0),
            &Bounds::none(1),
            residual,
            jacobian,
            &NewtonConfig::default(),
        )
        .unwrap();
        // the solve recovers and converges to x = 1
        assert!(result.converged());
        assert!((result.x[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn armijo_goldstein_converges_on_stiff_problem() {
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0].atan()))
        };
        let jacobian = |x: &DVector<f64>| -> SolverResult<nalgebra::DMatrix<f64>> {
            Ok(nalgebra::DMatrix::from_element(
                1,
                1,
                1.0 / (1.0 + x[0] * x[0]),
            ))
        };
        // plain Newton diverges on atan from |x0| > ~1.39; Armijo damping fixes it
        let config = NewtonConfig {
            line_search: LineSearch::ArmijoGoldstein { c: 1e-4 },
            ..NewtonConfig::default()
        };
        let result = newton_solve(
            DVector::from_element(1, 3.0),
            &Bounds::none(1),
            residual,
            jacobian,
            &config,
        )
        .unwrap();
        assert!(result.converged());
        assert!(result.x[0].abs() < 1e-6);
    }

    #[test]
    fn already_converged_returns_in_zero_iterations() {
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] * x[0] - 4.0))
        };
        let jacobian = |x: &DVector<f64>| -> SolverResult<nalgebra::DMatrix<f64>> {
            Ok(nalgebra::DMatrix::from_element(1, 1, 2.0 * x[0]))
        };
        let result = newton_solve(
            DVector::from_element(1, 2.0),
            &Bounds::none(1),
            residual,
            jacobian,
            &NewtonConfig::default(),
        )
        .unwrap();
        assert!(result.converged());
        assert_eq!(result.iterations, 0);
    }
}
