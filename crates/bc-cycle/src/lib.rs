//! bc-cycle: cycle-model assembly and solving for braycycle.
//!
//! A cycle model is a directed acyclic graph of named elements connected by
//! flow links, plus a secondary shaft-coupling graph and a set of balances:
//! implicit equations `lhs(state) − rhs = 0`, each paired with a free unknown
//! the Newton solver adjusts. Off-design elements contribute their own
//! intrinsic unknowns (compressor map coordinate, turbine pressure ratio)
//! and flow-match residuals.
//!
//! Build-time validation is strict and fails fast: dangling connections,
//! double-fed inlets, missing shafts, and balances whose unknown cannot
//! influence their own residual are all rejected before any iteration runs.
//!
//! The solve packs unknowns into a scaled vector, evaluates the whole graph
//! in topological order (generically over the dual scalar, so the Jacobian
//! is exact), and drives the residuals to zero with `bc-solver`.

pub mod balance;
pub mod builder;
pub mod calibration;
pub mod error;
pub mod model;
pub mod multipoint;
pub mod outputs;

pub use balance::{Balance, Param, Probe, Target};
pub use builder::CycleBuilder;
pub use calibration::Calibration;
pub use error::{CycleError, CycleResult};
pub use model::{CycleModel, SolveOptions};
pub use multipoint::{CrossLink, MultiPoint};
pub use outputs::{CycleSolution, MotorRecord, PerfRecord, ShaftRecord, StationRecord};
