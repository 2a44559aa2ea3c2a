//! Map data errors.

use thiserror::Error;

/// Result type for map operations.
pub type MapResult<T> = Result<T, MapError>;

/// Errors from map construction and lookup.
///
/// All of these surface at model-build time; lookups themselves never fail
/// (out-of-range inputs extrapolate along the boundary cells).
#[derive(Error, Debug)]
pub enum MapError {
    #[error("Bad map data: {what}")]
    BadData { what: String },

    #[error("Map shape violation: {what}")]
    ShapeViolation { what: String },

    #[error("Map file parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
