//! Inlet: ram recovery and ram drag.

use crate::error::{ElemError, ElemResult};
use crate::station::{FlowState, GasSet, StaticsMode};
use num_dual::DualNum;

/// Engine inlet.
///
/// Applies the total-pressure ram recovery factor and charges the stream with
/// ram drag `F_ram = W · V₀` taken at the free-stream velocity. Mass flow
/// passes straight through; whether W is a given (design) or a balance-driven
/// unknown (off-design) is decided by the cycle wiring, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct Inlet {
    /// Total-pressure recovery Pt_out / Pt_in
    pub ram_recovery: f64,
    pub statics: StaticsMode,
}

/// Inlet outputs: downstream station plus ram drag [N].
#[derive(Debug, Clone, Copy)]
pub struct InletOut<D> {
    pub fs_out: FlowState<D>,
    pub f_ram: D,
}

impl Inlet {
    pub fn new(ram_recovery: f64, statics: StaticsMode) -> ElemResult<Self> {
        if !ram_recovery.is_finite() || ram_recovery <= 0.0 || ram_recovery > 1.0 {
            return Err(ElemError::InvalidArg {
                what: "ram recovery must be in (0, 1]",
            });
        }
        Ok(Self {
            ram_recovery,
            statics,
        })
    }

    pub fn compute<D: DualNum<f64> + Copy>(
        &self,
        gases: &GasSet,
        fs_in: &FlowState<D>,
    ) -> ElemResult<InletOut<D>> {
        let gas = gases.get(fs_in.gas);
        let pt_out = fs_in.tot.p * self.ram_recovery;
        let tot = gas.total_from_hp(fs_in.tot.h, pt_out)?;
        let fs_out = FlowState::from_total(
            gases,
            fs_in.gas,
            tot,
            fs_in.w,
            fs_in.far,
            self.statics,
        )?;
        let f_ram = fs_in.w * fs_in.stat.v;
        Ok(InletOut { fs_out, f_ram })
    }
}
