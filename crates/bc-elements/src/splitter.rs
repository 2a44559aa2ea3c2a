//! Splitter: bypass-ratio flow division.

use crate::error::{ElemError, ElemResult};
use crate::station::{FlowState, GasSet, StaticsMode};
use num_dual::DualNum;

/// Splits one stream into core (outlet 1) and bypass (outlet 2) by bypass
/// ratio `BPR = W_bypass / W_core`. Per-unit thermodynamic state is
/// preserved on both legs; only mass flow divides.
#[derive(Debug, Clone, PartialEq)]
pub struct Splitter {
    /// Base bypass ratio; usually overridden by a balance unknown
    pub bpr: f64,
    /// Statics mode for the core leg
    pub statics1: StaticsMode,
    /// Statics mode for the bypass leg
    pub statics2: StaticsMode,
}

impl Splitter {
    pub fn new(bpr: f64, statics1: StaticsMode, statics2: StaticsMode) -> ElemResult<Self> {
        if !bpr.is_finite() || bpr < 0.0 {
            return Err(ElemError::InvalidArg {
                what: "base bypass ratio must be non-negative and finite",
            });
        }
        Ok(Self {
            bpr,
            statics1,
            statics2,
        })
    }

    /// Split `fs_in` at bypass ratio `bpr`, returning (core, bypass).
    pub fn compute<D: DualNum<f64> + Copy>(
        &self,
        gases: &GasSet,
        fs_in: &FlowState<D>,
        bpr: D,
    ) -> ElemResult<(FlowState<D>, FlowState<D>)> {
        if bpr.re() < 0.0 {
            return Err(ElemError::NonPhysical {
                what: "bypass ratio must be non-negative",
            });
        }
        let w_core = fs_in.w / (bpr + 1.0);
        let w_byp = fs_in.w * bpr / (bpr + 1.0);
        let core = FlowState::from_total(
            gases,
            fs_in.gas,
            fs_in.tot,
            w_core,
            fs_in.far,
            self.statics1,
        )?;
        let byp = FlowState::from_total(
            gases,
            fs_in.gas,
            fs_in.tot,
            w_byp,
            fs_in.far,
            self.statics2,
        )?;
        Ok((core, byp))
    }
}
