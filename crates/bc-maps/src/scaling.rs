//! Design-point map scaling.

use crate::error::{MapError, MapResult};

/// Calibration scalars tying a normalized map to a physical design point.
///
/// Computed once from a converged design solve, then frozen as inputs for
/// every off-design solve of the same engine:
///
/// ```text
/// W   = s_w   · W_map(N/s_n, β)
/// PR  = 1 + s_pr · PR_map(N/s_n, β)
/// eff = s_eff · eff_map(N/s_n, β)
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapScalars {
    /// Corrected-flow scalar
    pub s_w: f64,
    /// Pressure-ratio scalar (applies to PR − 1)
    pub s_pr: f64,
    /// Efficiency scalar
    pub s_eff: f64,
    /// Corrected-speed scalar
    pub s_n: f64,
}

impl MapScalars {
    /// Validate that every scalar is positive and finite.
    pub fn validate(&self) -> MapResult<()> {
        for (name, v) in [
            ("s_w", self.s_w),
            ("s_pr", self.s_pr),
            ("s_eff", self.s_eff),
            ("s_n", self.s_n),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(MapError::BadData {
                    what: format!("map scalar {name} must be positive and finite, got {v}"),
                });
            }
        }
        Ok(())
    }
}
