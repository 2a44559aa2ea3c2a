//! Jacobian assembly: analytic (forward-mode dual) and finite-difference.

use crate::error::{SolverError, SolverResult};
use nalgebra::{DMatrix, DVector};
use num_dual::Dual64;

/// Compute the Jacobian with forward-mode dual numbers, one column per
/// variable.
///
/// Each column j seeds a unit derivative on `x[j]` and evaluates the model in
/// dual arithmetic; the `eps` parts of the residuals form column j exactly
/// (chain-rule composition of every element's closed-form partials). This is
/// the production Jacobian path; the finite-difference variants below exist
/// to cross-check it in tests.
pub fn forward_jacobian<F>(x: &DVector<f64>, f: F) -> SolverResult<DMatrix<f64>>
where
    F: Fn(&[Dual64]) -> SolverResult<Vec<Dual64>>,
{
    let n = x.len();
    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(n);
    let mut m = 0;

    for j in 0..n {
        let mut x_dual: Vec<Dual64> = x.iter().map(|&v| Dual64::from(v)).collect();
        x_dual[j] = Dual64::from(x[j]).derivative();

        let residuals = f(&x_dual)?;
        if j == 0 {
            m = residuals.len();
        } else if residuals.len() != m {
            return Err(SolverError::Numeric {
                what: format!(
                    "residual length changed between Jacobian columns: {} != {}",
                    residuals.len(),
                    m
                ),
            });
        }
        columns.push(residuals.iter().map(|r| r.eps).collect());
    }

    let mut jac = DMatrix::zeros(m, n);
    for (j, col) in columns.iter().enumerate() {
        for (i, v) in col.iter().enumerate() {
            jac[(i, j)] = *v;
        }
    }
    Ok(jac)
}

/// Compute Jacobian using forward finite differences.
///
/// For each column j, perturbs x[j] by epsilon and computes (f(x+e) - f(x))/epsilon.
pub fn finite_difference_jacobian<F>(
    x: &DVector<f64>,
    f: F,
    epsilon: f64,
) -> SolverResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    let n = x.len();
    let f_x = f(x)?;
    let m = f_x.len();

    let mut jac = DMatrix::zeros(m, n);

    for j in 0..n {
        let mut x_perturbed = x.clone();
        let dx = epsilon * x[j].abs().max(1.0);
        x_perturbed[j] += dx;

        let f_perturbed = f(&x_perturbed)?;
        let df = (f_perturbed - &f_x) / dx;

        for i in 0..m {
            jac[(i, j)] = df[i];
        }
    }

    Ok(jac)
}

/// Compute Jacobian using central finite differences (more accurate but 2x cost).
pub fn central_difference_jacobian<F>(
    x: &DVector<f64>,
    f: F,
    epsilon: f64,
) -> SolverResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    let n = x.len();
    let f_x = f(x)?;
    let m = f_x.len();

    let mut jac = DMatrix::zeros(m, n);

    for j in 0..n {
        let dx = epsilon * x[j].abs().max(1.0);

        let mut x_plus = x.clone();
        x_plus[j] += dx;
        let f_plus = f(&x_plus)?;

        let mut x_minus = x.clone();
        x_minus[j] -= dx;
        let f_minus = f(&x_minus)?;

        let df = (f_plus - f_minus) / (2.0 * dx);

        for i in 0..m {
            jac[(i, j)] = df[i];
        }
    }

    Ok(jac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_dual::DualNum;

    #[test]
    fn forward_jacobian_exact_on_polynomials() {
        // f(x, y) = [x^2 y, x + y^3]
        let f = |v: &[Dual64]| -> SolverResult<Vec<Dual64>> {
            Ok(vec![v[0] * v[0] * v[1], v[0] + v[1] * v[1] * v[1]])
        };
        let x = DVector::from_vec(vec![2.0, 3.0]);
        let jac = forward_jacobian(&x, f).unwrap();
        assert_relative_eq!(jac[(0, 0)], 12.0, max_relative = 1e-14);
        assert_relative_eq!(jac[(0, 1)], 4.0, max_relative = 1e-14);
        assert_relative_eq!(jac[(1, 0)], 1.0, max_relative = 1e-14);
        assert_relative_eq!(jac[(1, 1)], 27.0, max_relative = 1e-14);
    }

    #[test]
    fn forward_matches_central_difference() {
        let f_dual = |v: &[Dual64]| -> SolverResult<Vec<Dual64>> {
            Ok(vec![(v[0] * v[1]).sin(), v[0].exp() / v[1]])
        };
        let f_real = |v: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_vec(vec![
                (v[0] * v[1]).sin(),
                v[0].exp() / v[1],
            ]))
        };
        let x = DVector::from_vec(vec![0.7, 1.3]);
        let exact = forward_jacobian(&x, f_dual).unwrap();
        let approx_j = central_difference_jacobian(&x, f_real, 1e-6).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                assert_relative_eq!(exact[(i, j)], approx_j[(i, j)], max_relative = 1e-7);
            }
        }
    }

    #[test]
    fn jacobian_linear() {
        // f(x) = 2*x, J = 2
        let f = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, 2.0 * x[0]))
        };

        let x = DVector::from_element(1, 3.0);
        let jac = finite_difference_jacobian(&x, f, 1e-7).unwrap();

        assert!((jac[(0, 0)] - 2.0).abs() < 1e-5);
    }

    #[test]
    fn jacobian_quadratic() {
        // f(x) = x^2, J = 2*x
        let f = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] * x[0]))
        };

        let x = DVector::from_element(1, 3.0);
        let jac = finite_difference_jacobian(&x, f, 1e-7).unwrap();

        assert!((jac[(0, 0)] - 6.0).abs() < 1e-5);
    }
}
