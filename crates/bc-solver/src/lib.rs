//! Newton solver for cycle balance systems.
//!
//! This crate provides a reusable damped-Newton primitive, parameterized by
//! (residual function, Jacobian function, bounds, tolerances), applied at
//! every nesting level of a cycle model. The Jacobian is expected to be
//! analytic, assembled from exact dual-number partials via
//! [`jacobian::forward_jacobian`], with finite-difference variants retained
//! for cross-checking.
//!
//! Convergence failure is a [`SolveStatus`], not an error: the caller decides
//! whether a non-converged result is fatal (`err_on_non_converge`) or usable
//! as a best-effort state. A singular Jacobian, by contrast, is always a hard
//! [`SolverError`].

pub mod error;
pub mod jacobian;
pub mod newton;

pub use error::{SolverError, SolverResult};
pub use jacobian::{central_difference_jacobian, finite_difference_jacobian, forward_jacobian};
pub use newton::{Bounds, LineSearch, NewtonConfig, NewtonResult, SolveStatus, newton_solve};
