//! Convergent nozzle with velocity-coefficient loss.

use crate::error::{ElemError, ElemResult};
use crate::station::{FlowState, GasSet};
use bc_thermo::{static_from_mach, static_from_ps};
use num_dual::DualNum;

/// Convergent nozzle expanding to the ambient static pressure.
///
/// The ideal expansion follows the total entropy down to `Ps_exhaust`. If the
/// resulting Mach number exceeds 1 the nozzle is choked and the throat sits
/// at MN = 1 with a pressure-area thrust term; otherwise the exit is fully
/// expanded. The velocity coefficient `Cv` degrades the momentum thrust:
///
/// ```text
/// Fg = Cv · W · V_throat + (Ps_throat − Ps_exhaust) · A_throat
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Nozzle {
    pub cv: f64,
}

/// Nozzle outputs.
#[derive(Debug, Clone, Copy)]
pub struct NozzleOut<D> {
    /// Throat (exit) station
    pub fs_throat: FlowState<D>,
    /// Gross thrust [N]
    pub fg: D,
    /// Throat area [m²] (frozen geometry for off-design flow matching)
    pub throat_area: D,
    /// Nozzle pressure ratio Pt / Ps_exhaust
    pub pr: D,
    /// True if the throat is sonic
    pub choked: bool,
}

impl Nozzle {
    pub fn new(cv: f64) -> ElemResult<Self> {
        if !cv.is_finite() || cv <= 0.0 || cv > 1.0 {
            return Err(ElemError::InvalidArg {
                what: "nozzle velocity coefficient must be in (0, 1]",
            });
        }
        Ok(Self { cv })
    }

    pub fn compute<D: DualNum<f64> + Copy>(
        &self,
        gases: &GasSet,
        fs_in: &FlowState<D>,
        ps_exhaust: D,
    ) -> ElemResult<NozzleOut<D>> {
        if ps_exhaust.re() <= 0.0 {
            return Err(ElemError::NonPhysical {
                what: "exhaust static pressure must be positive",
            });
        }
        let gas = gases.get(fs_in.gas);
        let pr = fs_in.tot.p / ps_exhaust;

        // ideal (isentropic) full expansion to ambient
        let ideal = static_from_ps(gas, &fs_in.tot, fs_in.w, ps_exhaust)?;

        let (stat, choked) = if ideal.mn.re() <= 1.0 {
            (ideal, false)
        } else {
            // choked: throat rides at MN = 1
            let sonic = static_from_mach(gas, &fs_in.tot, fs_in.w, D::from(1.0))?;
            (sonic, true)
        };

        let fg = fs_in.w * stat.v * self.cv + (stat.p - ps_exhaust) * stat.area;
        let fs_throat = FlowState {
            tot: fs_in.tot,
            stat,
            w: fs_in.w,
            far: fs_in.far,
            gas: fs_in.gas,
        };
        Ok(NozzleOut {
            fs_throat,
            fg,
            throat_area: stat.area,
            pr,
            choked,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::station::{GasId, StaticsMode};
    use approx::assert_relative_eq;
    use bc_core::units::constants::P_SL;

    fn turbine_exit(gases: &GasSet, pt: f64, tt: f64) -> FlowState<f64> {
        let tot = gases.products.total_from_tp(tt, pt).unwrap();
        FlowState::from_total(gases, GasId::Products, tot, 68.0, 0.0175, StaticsMode::Mach(0.4))
            .unwrap()
    }

    #[test]
    fn high_pressure_ratio_chokes() {
        let gases = GasSet::constant_cp();
        let fs = turbine_exit(&gases, 3.4e5, 950.0);
        let nozz = Nozzle::new(0.99).unwrap();
        let out = nozz.compute(&gases, &fs, P_SL).unwrap();
        assert!(out.choked);
        assert_relative_eq!(out.fs_throat.stat.mn, 1.0, max_relative = 1e-9);
        // choked throat pressure stays above ambient
        assert!(out.fs_throat.stat.p > P_SL);
        assert!(out.fg > 0.0);
    }

    #[test]
    fn low_pressure_ratio_stays_subsonic() {
        let gases = GasSet::constant_cp();
        let fs = turbine_exit(&gases, 1.5e5, 800.0);
        let nozz = Nozzle::new(0.99).unwrap();
        let out = nozz.compute(&gases, &fs, P_SL).unwrap();
        assert!(!out.choked);
        assert!(out.fs_throat.stat.mn < 1.0);
        // fully expanded: no pressure-area term
        assert_relative_eq!(
            out.fg,
            68.0 * out.fs_throat.stat.v * 0.99,
            max_relative = 1e-9
        );
    }

    #[test]
    fn velocity_coefficient_reduces_thrust() {
        let gases = GasSet::constant_cp();
        let fs = turbine_exit(&gases, 3.4e5, 950.0);
        let ideal = Nozzle::new(1.0).unwrap().compute(&gases, &fs, P_SL).unwrap();
        let lossy = Nozzle::new(0.95).unwrap().compute(&gases, &fs, P_SL).unwrap();
        assert!(lossy.fg < ideal.fg);
        // the loss only touches the momentum term
        assert_relative_eq!(
            ideal.fg - lossy.fg,
            0.05 * 68.0 * ideal.fs_throat.stat.v,
            max_relative = 1e-9
        );
    }

    #[test]
    fn thrust_grows_with_supply_pressure() {
        let gases = GasSet::tabular();
        let nozz = Nozzle::new(0.99).unwrap();
        let lo = nozz
            .compute(&gases, &turbine_exit(&gases, 2.0e5, 900.0), P_SL)
            .unwrap();
        let hi = nozz
            .compute(&gases, &turbine_exit(&gases, 4.0e5, 900.0), P_SL)
            .unwrap();
        assert!(hi.fg > lo.fg);
    }
}
