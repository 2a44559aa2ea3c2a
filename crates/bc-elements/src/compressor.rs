//! Compressor element.

use crate::error::{ElemError, ElemResult};
use crate::station::{FlowState, GasSet, StaticsMode, corrected_flow, corrected_speed};
use bc_maps::{CompressorMap, MapScalars};
use num_dual::DualNum;

/// Design/off-design operating mode.
///
/// The two variants partition knowns and unknowns differently, which is a
/// structural property of the model, not a runtime toggle:
/// - **Design**: pressure ratio and efficiency are given; the map calibration
///   scalars and the exit flow area are produced as outputs.
/// - **Off-design**: calibration and area are frozen inputs; the map β
///   coordinate becomes an implicit unknown whose residual is the
///   corrected-flow match against the scaled map.
#[derive(Debug, Clone)]
pub enum CompressorMode {
    Design { pr: f64, eff: f64, mn_exit: f64 },
    OffDesign { scalars: MapScalars, area: f64 },
}

/// Map-based compressor.
#[derive(Debug, Clone)]
pub struct Compressor {
    pub mode: CompressorMode,
    pub map: CompressorMap,
}

/// Compressor outputs.
#[derive(Debug, Clone, Copy)]
pub struct CompressorOut<D> {
    pub fs_out: FlowState<D>,
    /// Power delivered to the shaft [W]; negative (the compressor consumes)
    pub pwr: D,
    /// Torque on the shaft [N·m]; negative
    pub trq: D,
    /// Operating pressure ratio
    pub pr: D,
    /// Operating isentropic efficiency
    pub eff: D,
    /// Design mode: calibration scalars for off-design reuse
    pub scalars: Option<MapScalars>,
    /// Off-design mode: normalized corrected-flow match residual
    pub wc_resid: Option<D>,
}

impl Compressor {
    pub fn new(mode: CompressorMode, map: CompressorMap) -> ElemResult<Self> {
        if let CompressorMode::Design { pr, eff, .. } = &mode {
            if !pr.is_finite() || *pr <= 1.0 {
                return Err(ElemError::InvalidArg {
                    what: "compressor design PR must be > 1",
                });
            }
            if !eff.is_finite() || *eff <= 0.0 || *eff > 1.0 {
                return Err(ElemError::InvalidArg {
                    what: "compressor efficiency must be in (0, 1]",
                });
            }
        }
        if let CompressorMode::OffDesign { scalars, area } = &mode {
            scalars.validate()?;
            if !area.is_finite() || *area <= 0.0 {
                return Err(ElemError::InvalidArg {
                    what: "compressor exit area must be positive",
                });
            }
        }
        Ok(Self { mode, map })
    }

    /// Compute the compression process.
    ///
    /// `nmech` is the mechanical shaft speed [rad/s]. `beta` is the map
    /// coordinate: required in off-design mode, ignored in design mode.
    pub fn compute<D: DualNum<f64> + Copy>(
        &self,
        gases: &GasSet,
        fs_in: &FlowState<D>,
        nmech: D,
        beta: Option<D>,
    ) -> ElemResult<CompressorOut<D>> {
        let gas = gases.get(fs_in.gas);
        let nc = corrected_speed(&fs_in.tot, nmech);
        let wc = corrected_flow(&fs_in.tot, fs_in.w);

        let (pr, eff, statics, scalars, wc_resid) = match &self.mode {
            CompressorMode::Design { pr, eff, mn_exit } => {
                let scalars = self
                    .map
                    .calibrate(wc.re(), *pr, *eff, nc.re());
                (
                    D::from(*pr),
                    D::from(*eff),
                    StaticsMode::Mach(*mn_exit),
                    Some(scalars),
                    None,
                )
            }
            CompressorMode::OffDesign { scalars, area } => {
                let beta = beta.ok_or(ElemError::InvalidArg {
                    what: "off-design compressor requires a map beta value",
                })?;
                let pt = self.map.lookup(scalars, nc, beta);
                let resid = (wc - pt.wc) / scalars.s_w;
                (
                    pt.pr,
                    pt.eff,
                    StaticsMode::Area(*area),
                    None,
                    Some(resid),
                )
            }
        };

        if eff.re() <= 0.0 {
            return Err(ElemError::NonPhysical {
                what: "compressor efficiency collapsed to zero",
            });
        }

        // isentropic exit, then efficiency-degraded actual exit
        let p_out = fs_in.tot.p * pr;
        let t_ideal = gas.t_from_s(fs_in.tot.s, p_out)?;
        let dh_ideal = gas.h(t_ideal) - fs_in.tot.h;
        let dh = dh_ideal / eff;
        let h_out = fs_in.tot.h + dh;

        let tot = gas.total_from_hp(h_out, p_out)?;
        let fs_out = FlowState::from_total(gases, fs_in.gas, tot, fs_in.w, fs_in.far, statics)?;

        // the compressor consumes shaft power
        let pwr = -(fs_in.w * dh);
        let trq = pwr / nmech;

        Ok(CompressorOut {
            fs_out,
            pwr,
            trq,
            pr,
            eff,
            scalars,
            wc_resid,
        })
    }
}
