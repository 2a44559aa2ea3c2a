//! bc-elements: element model library for braycycle.
//!
//! Each element is a pure computation `inputs -> outputs`, generic over the
//! dual scalar so analytic partials flow through every model. Elements hold
//! immutable configuration fixed at model-build time; the design/off-design
//! distinction is a tagged variant because the two modes partition
//! known/unknown quantities differently (design sizes geometry and map
//! scalars; off-design holds them frozen and frees speeds and map
//! coordinates).
//!
//! The wiring of elements into a cycle (which balance unknown feeds which
//! element input, which shaft collects which torque) lives in `bc-cycle`.

pub mod ambient;
pub mod bleed;
pub mod burner;
pub mod compressor;
pub mod duct;
pub mod element;
pub mod error;
pub mod inlet;
pub mod motor;
pub mod nozzle;
pub mod performance;
pub mod shaft;
pub mod splitter;
pub mod station;
pub mod turbine;

pub use ambient::{Ambient, FlightConditions};
pub use bleed::{Bleed, BleedOut, BleedPort};
pub use burner::{Burner, BurnerOut};
pub use compressor::{Compressor, CompressorMode, CompressorOut};
pub use duct::Duct;
pub use element::Element;
pub use error::{ElemError, ElemResult};
pub use inlet::{Inlet, InletOut};
pub use motor::{Motor, MotorOut};
pub use nozzle::{Nozzle, NozzleOut};
pub use performance::{PerfSummary, Performance};
pub use shaft::{ShaftDef, ShaftOut};
pub use splitter::Splitter;
pub use station::{
    FlowState, GasId, GasSet, StaticsMode, corrected_flow, corrected_speed, parameter_flow,
    parameter_speed,
};
pub use turbine::{CoolingFlow, Turbine, TurbineMode, TurbineOut};
