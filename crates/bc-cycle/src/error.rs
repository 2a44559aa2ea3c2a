//! Cycle-level errors.

use bc_elements::ElemError;
use bc_solver::SolverError;
use bc_thermo::ThermoError;
use thiserror::Error;

pub type CycleResult<T> = Result<T, CycleError>;

/// Errors from cycle assembly and solving.
#[derive(Error, Debug)]
pub enum CycleError {
    /// Malformed model description, rejected at build time.
    #[error("Configuration error: {what}")]
    Config { what: String },

    /// A named element does not exist (or has the wrong kind).
    #[error("Unknown element '{name}' ({context})")]
    UnknownElement { name: String, context: &'static str },

    /// A balance's unknown has no influence path to its own residual; the
    /// Jacobian would be structurally singular.
    #[error("Balance '{balance}' unknown cannot influence its residual")]
    NoInfluence { balance: String },

    /// Element evaluation failure.
    #[error("Element '{name}' failed: {source}")]
    Element {
        name: String,
        #[source]
        source: ElemError,
    },

    /// Property-engine failure outside any element.
    #[error("Thermo error: {0}")]
    Thermo(#[from] ThermoError),

    /// Newton solver failure (singular Jacobian, setup error).
    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    /// The solve ran out of iterations and `err_on_non_converge` was set.
    #[error("Solve did not converge: residual norm {residual_norm:.3e} after {iterations} iterations")]
    NotConverged {
        residual_norm: f64,
        iterations: usize,
    },
}
