//! Bleed: named fractional mass-flow offtakes.

use crate::error::{ElemError, ElemResult};
use crate::station::{FlowState, GasSet, StaticsMode};
use crate::turbine::CoolingFlow;
use num_dual::DualNum;

/// One named offtake, extracting a fixed fraction of the inlet flow.
#[derive(Debug, Clone, PartialEq)]
pub struct BleedPort {
    pub name: String,
    pub frac: f64,
}

/// Bleed element: removes named fractions of the stream (e.g. turbine
/// cooling supply), preserving per-unit thermodynamic state.
#[derive(Debug, Clone, PartialEq)]
pub struct Bleed {
    pub ports: Vec<BleedPort>,
    pub statics: StaticsMode,
}

/// Bleed outputs: the reduced main stream plus one extracted flow per port,
/// in port order, ready to feed turbine cooling.
#[derive(Debug, Clone)]
pub struct BleedOut<D> {
    pub fs_out: FlowState<D>,
    pub flows: Vec<CoolingFlow<D>>,
}

impl Bleed {
    pub fn new(ports: Vec<BleedPort>, statics: StaticsMode) -> ElemResult<Self> {
        let mut total = 0.0;
        for p in &ports {
            if !p.frac.is_finite() || p.frac < 0.0 {
                return Err(ElemError::InvalidArg {
                    what: "bleed fraction must be non-negative and finite",
                });
            }
            total += p.frac;
        }
        if total >= 1.0 {
            return Err(ElemError::InvalidArg {
                what: "bleed fractions must sum to less than 1",
            });
        }
        Ok(Self { ports, statics })
    }

    pub fn compute<D: DualNum<f64> + Copy>(
        &self,
        gases: &GasSet,
        fs_in: &FlowState<D>,
    ) -> ElemResult<BleedOut<D>> {
        let mut w_out = fs_in.w;
        let mut flows = Vec::with_capacity(self.ports.len());
        for p in &self.ports {
            let w_bld = fs_in.w * p.frac;
            w_out = w_out - w_bld;
            flows.push(CoolingFlow {
                w: w_bld,
                h: fs_in.tot.h,
                far: fs_in.far,
            });
        }
        let fs_out = FlowState::from_total(
            gases,
            fs_in.gas,
            fs_in.tot,
            w_out,
            fs_in.far,
            self.statics,
        )?;
        Ok(BleedOut { fs_out, flows })
    }
}
