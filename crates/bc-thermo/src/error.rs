//! Thermodynamic property errors.

use bc_core::CoreError;
use thiserror::Error;

/// Result type for property operations.
pub type ThermoResult<T> = Result<T, ThermoError>;

/// Errors that can occur during property evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThermoError {
    /// Non-physical values (negative pressure, temperature, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Malformed table data (fails fast at build time).
    #[error("Bad table data: {what}")]
    TableShape { what: String },

    /// Convergence failure in a nested inverse solve.
    #[error("Convergence failed for {what}")]
    ConvergenceFailed { what: &'static str },
}

impl From<ThermoError> for CoreError {
    fn from(err: ThermoError) -> Self {
        match err {
            ThermoError::NonPhysical { what } => CoreError::Invariant { what },
            ThermoError::InvalidArg { what } => CoreError::InvalidArg { what },
            ThermoError::TableShape { .. } => CoreError::InvalidArg {
                what: "table data",
            },
            ThermoError::ConvergenceFailed { what } => CoreError::Invariant { what },
        }
    }
}
