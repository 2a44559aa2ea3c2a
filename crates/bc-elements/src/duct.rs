//! Duct: fractional total-pressure loss, no work or chemistry.

use crate::error::{ElemError, ElemResult};
use crate::station::{FlowState, GasSet, StaticsMode};
use num_dual::DualNum;

/// Duct with a fractional total-pressure loss `dPqP`.
///
/// `Pt_out = Pt_in (1 − dPqP)`; total enthalpy, composition and mass flow
/// pass through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Duct {
    pub dpqp: f64,
    pub statics: StaticsMode,
}

impl Duct {
    pub fn new(dpqp: f64, statics: StaticsMode) -> ElemResult<Self> {
        if !dpqp.is_finite() || !(0.0..1.0).contains(&dpqp) {
            return Err(ElemError::InvalidArg {
                what: "duct dPqP must be in [0, 1)",
            });
        }
        Ok(Self { dpqp, statics })
    }

    pub fn compute<D: DualNum<f64> + Copy>(
        &self,
        gases: &GasSet,
        fs_in: &FlowState<D>,
    ) -> ElemResult<FlowState<D>> {
        let gas = gases.get(fs_in.gas);
        let pt_out = fs_in.tot.p * (1.0 - self.dpqp);
        let tot = gas.total_from_hp(fs_in.tot.h, pt_out)?;
        FlowState::from_total(gases, fs_in.gas, tot, fs_in.w, fs_in.far, self.statics)
    }
}
