//! Turbine element.

use crate::error::{ElemError, ElemResult};
use crate::station::{FlowState, GasSet, StaticsMode, parameter_flow, parameter_speed};
use bc_maps::{MapScalars, TurbineMap};
use num_dual::DualNum;

/// Design/off-design operating mode.
///
/// - **Design**: efficiency is given and the pressure ratio arrives from a
///   shaft-power balance unknown; map calibration scalars and the exit area
///   are produced as outputs.
/// - **Off-design**: calibration and area are frozen; the pressure ratio is
///   the element's own implicit unknown, closed by the corrected-flow match
///   against the scaled map (which also supplies the efficiency).
#[derive(Debug, Clone)]
pub enum TurbineMode {
    Design { eff: f64, mn_exit: f64 },
    OffDesign { scalars: MapScalars, area: f64 },
}

/// A cooling (or other secondary) stream mixed in at the turbine exit.
///
/// Mixing happens downstream of the rotor: the stream adds mass and enthalpy
/// but does no work.
#[derive(Debug, Clone, Copy)]
pub struct CoolingFlow<D> {
    /// Mass flow [kg/s]
    pub w: D,
    /// Total specific enthalpy [J/kg]
    pub h: D,
    /// Fuel-air ratio of the stream (usually 0: compressor bleed air)
    pub far: D,
}

/// Map-based turbine.
#[derive(Debug, Clone)]
pub struct Turbine {
    pub mode: TurbineMode,
    pub map: TurbineMap,
}

/// Turbine outputs.
#[derive(Debug, Clone, Copy)]
pub struct TurbineOut<D> {
    pub fs_out: FlowState<D>,
    /// Power delivered to the shaft [W]; positive (the turbine drives)
    pub pwr: D,
    /// Torque on the shaft [N·m]; positive
    pub trq: D,
    /// Operating isentropic efficiency
    pub eff: D,
    /// Design mode: calibration scalars for off-design reuse
    pub scalars: Option<MapScalars>,
    /// Off-design mode: normalized corrected-flow match residual
    pub wp_resid: Option<D>,
}

impl Turbine {
    pub fn new(mode: TurbineMode, map: TurbineMap) -> ElemResult<Self> {
        if let TurbineMode::Design { eff, .. } = &mode {
            if !eff.is_finite() || *eff <= 0.0 || *eff > 1.0 {
                return Err(ElemError::InvalidArg {
                    what: "turbine efficiency must be in (0, 1]",
                });
            }
        }
        if let TurbineMode::OffDesign { scalars, area } = &mode {
            scalars.validate()?;
            if !area.is_finite() || *area <= 0.0 {
                return Err(ElemError::InvalidArg {
                    what: "turbine exit area must be positive",
                });
            }
        }
        Ok(Self { mode, map })
    }

    /// Compute the expansion process.
    ///
    /// `nmech` is the mechanical shaft speed [rad/s]; `pr` the expansion
    /// pressure ratio `Pt_in / Pt_out` (a balance unknown in design mode, the
    /// element's own unknown in off-design). Cooling flows mix in at the exit.
    pub fn compute<D: DualNum<f64> + Copy>(
        &self,
        gases: &GasSet,
        fs_in: &FlowState<D>,
        nmech: D,
        pr: D,
        cooling: &[CoolingFlow<D>],
    ) -> ElemResult<TurbineOut<D>> {
        if pr.re() <= 1.0 {
            return Err(ElemError::NonPhysical {
                what: "turbine PR must exceed 1",
            });
        }
        let gas = gases.get(fs_in.gas);
        let np = parameter_speed(&fs_in.tot, nmech);
        let wp = parameter_flow(&fs_in.tot, fs_in.w);

        let (eff, statics, scalars, wp_resid) = match &self.mode {
            TurbineMode::Design { eff, mn_exit } => {
                let scalars = self.map.calibrate(wp.re(), pr.re(), *eff, np.re());
                (D::from(*eff), StaticsMode::Mach(*mn_exit), Some(scalars), None)
            }
            TurbineMode::OffDesign { scalars, area } => {
                let pt = self.map.lookup(scalars, np, pr);
                let resid = (wp - pt.wp) / scalars.s_w;
                (pt.eff, StaticsMode::Area(*area), None, Some(resid))
            }
        };

        // isentropic exit, then efficiency-degraded actual work
        let p_out = fs_in.tot.p / pr;
        let t_ideal = gas.t_from_s(fs_in.tot.s, p_out)?;
        let dh_ideal = fs_in.tot.h - gas.h(t_ideal);
        let dh = dh_ideal * eff;
        let h_out = fs_in.tot.h - dh;

        // work is extracted from the core flow only; cooling mixes in after
        let pwr = fs_in.w * dh;
        let trq = pwr / nmech;

        let mut w_mix = fs_in.w;
        let mut wh_mix = fs_in.w * h_out;
        let mut w_fuel = fs_in.w_fuel();
        let mut w_air = fs_in.w_air();
        for c in cooling {
            w_mix = w_mix + c.w;
            wh_mix = wh_mix + c.w * c.h;
            w_fuel = w_fuel + c.w * c.far / (c.far + 1.0);
            w_air = w_air + c.w / (c.far + 1.0);
        }
        let h_mix = wh_mix / w_mix;
        let far_out = w_fuel / w_air;

        let tot = gas.total_from_hp(h_mix, p_out)?;
        let fs_out = FlowState::from_total(gases, fs_in.gas, tot, w_mix, far_out, statics)?;

        Ok(TurbineOut {
            fs_out,
            pwr,
            trq,
            eff,
            scalars,
            wp_resid,
        })
    }
}
