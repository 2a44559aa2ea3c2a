//! Shaft: signed torque summation across mechanically coupled elements.

use crate::error::{ElemError, ElemResult};
use num_dual::DualNum;

/// Mechanical shaft tying rotating elements together.
///
/// The shaft is not part of the flow path; it is the secondary coupling
/// graph. Connected elements report power with a common sign convention
/// (turbines positive, compressors negative), and at equilibrium the net
/// power must vanish; that residual drives either the turbine PR (design)
/// or the shaft speed (off-design).
///
/// `hpx` models a constant accessory power extraction charged to the shaft.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaftDef {
    /// Accessory power extraction [W]
    pub hpx: f64,
}

/// Shaft bookkeeping for one iteration.
#[derive(Debug, Clone, Copy)]
pub struct ShaftOut<D> {
    /// Net power on the shaft [W]; zero at equilibrium
    pub pwr_net: D,
    /// Power delivered into the shaft by turbines [W]
    pub pwr_in: D,
    /// Power drawn from the shaft (compressors + extraction) [W]
    pub pwr_out: D,
    /// Net torque [N·m] at the mechanical speed
    pub trq_net: D,
}

impl ShaftDef {
    pub fn new(hpx: f64) -> ElemResult<Self> {
        if !hpx.is_finite() || hpx < 0.0 {
            return Err(ElemError::InvalidArg {
                what: "shaft power extraction must be non-negative",
            });
        }
        Ok(Self { hpx })
    }

    /// Sum signed load powers at mechanical speed `nmech` [rad/s].
    pub fn balance<D: DualNum<f64> + Copy>(&self, loads: &[D], nmech: D) -> ShaftOut<D> {
        let mut pwr_in = D::from(0.0);
        let mut pwr_out = D::from(self.hpx);
        for &p in loads {
            if p.re() >= 0.0 {
                pwr_in = pwr_in + p;
            } else {
                pwr_out = pwr_out - p;
            }
        }
        let pwr_net = pwr_in - pwr_out;
        ShaftOut {
            pwr_net,
            pwr_in,
            pwr_out,
            trq_net: pwr_net / nmech,
        }
    }
}
