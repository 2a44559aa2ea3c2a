//! bc-thermo: thermodynamic property engine for braycycle.
//!
//! Provides:
//! - Perfect-gas (constant-Cp) property relations with exact inverses
//! - Table-backed gas properties built by integrating cp(T) data
//! - Fuel specification and air/fuel mixing math
//! - Total ↔ static state relations (Mach, area, and static-pressure modes)
//!
//! # Architecture
//!
//! All property computations are generic over `num_dual::DualNum<f64>`, so the
//! same code path yields values (`f64`) and exact analytic partial derivatives
//! (`Dual64`). The outer Newton solver relies on those partials; nothing in
//! this crate differentiates by finite differences.
//!
//! The two evaluation strategies are variants of [`GasModel`]. A chemical
//! equilibrium (CEA-style) backend would slot in as a third variant; it is
//! out of scope here.
//!
//! # Example
//!
//! ```
//! use bc_thermo::{GasModel, PerfectGas};
//!
//! let air = GasModel::ConstantCp(PerfectGas::air());
//! let tot = air.total_from_tp(288.15, 101_325.0).unwrap();
//!
//! // forward/inverse lookups round-trip
//! let back = air.total_from_hp(tot.h, tot.p).unwrap();
//! assert!((back.t - 288.15_f64).abs() < 1e-9);
//! ```

pub mod air_data;
pub mod error;
pub mod gas;
pub mod mix;
pub mod model;
pub mod statics;
pub mod table;
pub mod tabular;

// Re-exports for ergonomics
pub use error::{ThermoError, ThermoResult};
pub use gas::PerfectGas;
pub use mix::{FuelMix, FuelSpec, mix_fuel};
pub use model::{GasModel, TotalState};
pub use statics::{StaticState, static_from_area, static_from_mach, static_from_ps};
pub use table::Table1D;
pub use tabular::TabularGas;

/// Specific enthalpy [J/kg].
///
/// Not part of uom's standard set, so we use f64 with clear documentation.
pub type SpecEnthalpy = f64;

/// Specific entropy [J/(kg·K)].
pub type SpecEntropy = f64;

/// Specific heat capacity [J/(kg·K)].
pub type SpecHeatCapacity = f64;
