//! Burner: fuel mixing, heat release, and pressure loss.

use crate::error::{ElemError, ElemResult};
use crate::station::{FlowState, GasId, GasSet, StaticsMode};
use bc_thermo::{FuelSpec, mix_fuel};
use num_dual::DualNum;

/// Combustor: mixes fuel at a given FAR into the incoming air stream, applies
/// a fractional total-pressure loss, and hands the stream over to the
/// vitiated-products gas model.
///
/// The fuel-air ratio is normally a balance unknown (driven by a turbine
/// inlet temperature or thrust target) wired in by the cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Burner {
    pub fuel: FuelSpec,
    pub dpqp: f64,
    /// Base fuel-air ratio; usually overridden by a balance unknown
    pub far: f64,
    pub statics: StaticsMode,
}

/// Burner outputs.
#[derive(Debug, Clone, Copy)]
pub struct BurnerOut<D> {
    pub fs_out: FlowState<D>,
    /// Fuel mass flow added [kg/s]
    pub w_fuel: D,
    /// Mixture molecular weight [g/mol], reported for diagnostics
    pub mw_out: D,
}

impl Burner {
    pub fn new(fuel: FuelSpec, dpqp: f64, far: f64, statics: StaticsMode) -> ElemResult<Self> {
        fuel.validate()?;
        if !dpqp.is_finite() || !(0.0..1.0).contains(&dpqp) {
            return Err(ElemError::InvalidArg {
                what: "burner dPqP must be in [0, 1)",
            });
        }
        if !far.is_finite() || far < 0.0 {
            return Err(ElemError::InvalidArg {
                what: "base fuel-air ratio must be non-negative",
            });
        }
        Ok(Self {
            fuel,
            dpqp,
            far,
            statics,
        })
    }

    pub fn compute<D: DualNum<f64> + Copy>(
        &self,
        gases: &GasSet,
        fs_in: &FlowState<D>,
        far: D,
    ) -> ElemResult<BurnerOut<D>> {
        if far.re() < 0.0 {
            return Err(ElemError::NonPhysical {
                what: "fuel-air ratio must be non-negative",
            });
        }
        let air_mw = gases.get(fs_in.gas).mw();
        let mix = mix_fuel(fs_in.w, far, fs_in.tot.h, air_mw, &self.fuel);

        let p_out = fs_in.tot.p * (1.0 - self.dpqp);
        let products = gases.get(GasId::Products);
        let tot = products.total_from_hp(mix.h_out, p_out)?;

        let fs_out = FlowState::from_total(
            gases,
            GasId::Products,
            tot,
            mix.w_out,
            far,
            self.statics,
        )?;
        Ok(BurnerOut {
            fs_out,
            w_fuel: mix.w_fuel,
            mw_out: mix.mw_out,
        })
    }
}
