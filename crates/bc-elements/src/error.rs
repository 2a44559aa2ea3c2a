//! Element model errors.

use bc_maps::MapError;
use bc_thermo::ThermoError;
use thiserror::Error;

/// Result type for element computations.
pub type ElemResult<T> = Result<T, ElemError>;

/// Errors from element configuration and evaluation.
#[derive(Error, Debug)]
pub enum ElemError {
    /// Bad configuration value, rejected at construction.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Physically impossible state encountered during evaluation.
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Property-engine error.
    #[error("Thermo error: {0}")]
    Thermo(#[from] ThermoError),

    /// Map error.
    #[error("Map error: {0}")]
    Map(#[from] MapError),
}
