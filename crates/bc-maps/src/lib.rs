//! bc-maps: turbomachinery performance maps for braycycle.
//!
//! Provides:
//! - Rectangular 2-D map tables with bilinear interpolation ([`MapGrid`])
//! - Compressor maps over (corrected speed, R-line) with design scaling
//! - Turbine maps over (corrected speed, pressure ratio) with design scaling
//! - JSON map-file loading (read once at model-build time)
//!
//! Maps are normalized: the design point of the raw table sits at map value
//! 1.0 on every output, and [`MapScalars`] stretch the map so the scaled
//! lookup reproduces a cycle's design point exactly. Off-design solves then
//! move across the same (scaled) map with fixed scalars.
//!
//! # Example
//!
//! ```
//! use bc_maps::CompressorMap;
//!
//! let map = CompressorMap::default_axial();
//! // calibrate the normalized map onto a physical design point
//! let scalars = map.calibrate(66.9, 13.5, 0.83, 845.0);
//! let pt = map.lookup(&scalars, 845.0, 2.0);
//! assert!((pt.pr - 13.5_f64).abs() < 1e-9);
//! ```

pub mod compressor;
pub mod error;
pub mod grid;
pub mod scaling;
pub mod turbine;

pub use compressor::{CompressorMap, CompressorMapPoint};
pub use error::{MapError, MapResult};
pub use grid::MapGrid;
pub use scaling::MapScalars;
pub use turbine::{TurbineMap, TurbineMapPoint};
