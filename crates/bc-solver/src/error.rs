//! Error types for solver operations.

use thiserror::Error;

/// Errors that can occur during a Newton solve.
///
/// Note that running out of iterations is *not* an error; it is reported
/// through [`crate::SolveStatus`] so the caller can apply its own policy.
#[derive(Error, Debug)]
pub enum SolverError {
    /// The problem is malformed (dimension mismatches, bad bounds).
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    /// The linear solve failed; the Jacobian is singular or ill-conditioned.
    /// No automatic recovery is attempted.
    #[error("Singular Jacobian at iteration {iteration}")]
    SingularJacobian { iteration: usize },

    /// A residual or Jacobian evaluation failed in the model.
    #[error("Residual evaluation failed: {what}")]
    Residual { what: String },

    /// Non-finite numbers appeared in the iteration.
    #[error("Numeric error: {what}")]
    Numeric { what: String },
}

pub type SolverResult<T> = Result<T, SolverError>;
