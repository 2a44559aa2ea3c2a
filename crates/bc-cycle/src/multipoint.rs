//! Multi-point models: several operating points of one engine.
//!
//! Points with no data dependency (beyond frozen design calibration passed
//! at build time) are logically independent solves and run in parallel.
//! Points tied by cross-point balances (a variable in one point driven to
//! match a quantity computed in another) are **not** independent and must
//! share one joint Newton iteration space.

use crate::balance::Probe;
use crate::error::{CycleError, CycleResult};
use crate::model::{CycleModel, SolveOptions};
use crate::outputs::CycleSolution;
use bc_solver::{Bounds, SolveStatus, forward_jacobian, newton_solve};
use nalgebra::DVector;
use num_dual::{Dual64, DualNum};
use rayon::prelude::*;

/// A cross-point coupling: the named balance of `point` stops targeting its
/// own rhs and instead matches `rhs_probe` evaluated in `rhs_point`.
///
/// The classic use: a design-point sizing variable driven until an
/// off-design point hits its target.
#[derive(Debug, Clone)]
pub struct CrossLink {
    pub point: String,
    pub balance: String,
    pub rhs_point: String,
    pub rhs_probe: Probe,
}

/// A set of named operating points.
#[derive(Debug, Default)]
pub struct MultiPoint {
    points: Vec<(String, CycleModel)>,
}

impl MultiPoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_point(&mut self, name: impl Into<String>, model: CycleModel) -> &mut Self {
        self.points.push((name.into(), model));
        self
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn point_idx(&self, name: &str) -> CycleResult<usize> {
        self.points
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| CycleError::Config {
                what: format!("no point named '{name}'"),
            })
    }

    /// Solve every point independently, in parallel.
    ///
    /// Safe only when no cross-point balances exist; the points share nothing
    /// but read-only models.
    pub fn solve_independent(
        &self,
        opts: &SolveOptions,
    ) -> CycleResult<Vec<(String, CycleSolution)>> {
        self.points
            .par_iter()
            .map(|(name, model)| Ok((name.clone(), model.solve(opts)?)))
            .collect()
    }

    /// Solve all points jointly with cross-point couplings.
    ///
    /// Every point's unknowns concatenate into one vector; the cross links
    /// redirect the named balances' right-hand sides to probes evaluated in
    /// other points. One Newton iteration therefore spans the whole set.
    pub fn solve_joint(
        &self,
        cross: &[CrossLink],
        opts: &SolveOptions,
    ) -> CycleResult<Vec<(String, CycleSolution)>> {
        // resolve cross links to (point, balance idx, rhs point) up front
        let mut resolved: Vec<(usize, usize, usize, Probe)> = Vec::with_capacity(cross.len());
        for c in cross {
            let pi = self.point_idx(&c.point)?;
            let ri = self.point_idx(&c.rhs_point)?;
            let bi = self.points[pi]
                .1
                .balances
                .iter()
                .position(|b| b.name == c.balance)
                .ok_or_else(|| CycleError::Config {
                    what: format!("point '{}' has no balance '{}'", c.point, c.balance),
                })?;
            resolved.push((pi, bi, ri, c.rhs_probe.clone()));
        }

        // joint unknown vector layout
        let offsets: Vec<usize> = self
            .points
            .iter()
            .scan(0, |acc, (_, m)| {
                let o = *acc;
                *acc += m.n_unknowns();
                Some(o)
            })
            .collect();
        let total: usize = self.points.iter().map(|(_, m)| m.n_unknowns()).sum();

        let joint_residuals = |x: &[Dual64]| -> Result<Vec<Dual64>, bc_solver::SolverError> {
            self.joint_residuals::<Dual64>(x, &offsets, &resolved)
                .map_err(|e| bc_solver::SolverError::Residual { what: e.to_string() })
        };

        let mut x0 = DVector::zeros(total);
        let mut lower = vec![f64::NEG_INFINITY; total];
        let mut upper = vec![f64::INFINITY; total];
        for ((_, m), &off) in self.points.iter().zip(&offsets) {
            let b = m.scaled_bounds();
            for (k, u) in m.unknowns.iter().enumerate() {
                x0[off + k] = u.init / u.x_ref;
                lower[off + k] = b.lower[k];
                upper[off + k] = b.upper[k];
            }
        }

        let residual_fn = |xv: &DVector<f64>| {
            self.joint_residuals::<f64>(xv.as_slice(), &offsets, &resolved)
                .map(DVector::from_vec)
                .map_err(|e| bc_solver::SolverError::Residual { what: e.to_string() })
        };
        let jacobian_fn = |xv: &DVector<f64>| forward_jacobian(xv, joint_residuals);

        let result = newton_solve(
            x0,
            &Bounds { lower, upper },
            residual_fn,
            jacobian_fn,
            &opts.newton,
        )?;
        if opts.err_on_non_converge && result.status != SolveStatus::Converged {
            return Err(CycleError::NotConverged {
                residual_norm: result.residual_norm,
                iterations: result.iterations,
            });
        }

        let x = result.x.as_slice();
        self.points
            .iter()
            .zip(&offsets)
            .map(|((name, m), &off)| {
                let sol = m.snapshot(
                    &x[off..off + m.n_unknowns()],
                    result.iterations,
                    result.residual_norm,
                    result.status,
                )?;
                Ok((name.clone(), sol))
            })
            .collect()
    }

    fn joint_residuals<D: DualNum<f64> + Copy>(
        &self,
        x: &[D],
        offsets: &[usize],
        resolved: &[(usize, usize, usize, Probe)],
    ) -> CycleResult<Vec<D>> {
        // evaluate every point at its slice
        let mut evals = Vec::with_capacity(self.points.len());
        for ((_, m), &off) in self.points.iter().zip(offsets) {
            evals.push(m.eval::<D>(&x[off..off + m.n_unknowns()])?);
        }

        // redirect cross-linked balance targets
        let mut overrides: Vec<Vec<Option<D>>> = self
            .points
            .iter()
            .map(|(_, m)| vec![None; m.balances.len()])
            .collect();
        for (pi, bi, ri, probe) in resolved {
            let v = self.points[*ri].1.probe(&evals[*ri], probe)?;
            overrides[*pi][*bi] = Some(v);
        }

        let mut r = Vec::new();
        for (k, (_, m)) in self.points.iter().enumerate() {
            r.extend(m.residuals(&evals[k], &overrides[k])?);
        }
        Ok(r)
    }
}
