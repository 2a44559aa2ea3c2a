//! Electric drive motor with an efficiency map.

use crate::error::{ElemError, ElemResult};
use bc_maps::MapGrid;
use num_dual::DualNum;

/// Electric propulsor drive.
///
/// Efficiency comes from a 2-D map over (speed fraction, load fraction) of
/// the rated point; torque delivered to the shaft follows `τ = P/ω` and the
/// electrical input power is `P/η`.
#[derive(Debug, Clone)]
pub struct Motor {
    /// Rated mechanical speed [rad/s]
    pub rated_speed: f64,
    /// Rated shaft power [W]
    pub rated_power: f64,
    /// Efficiency over (N/N_rated, P/P_rated)
    pub eff_map: MapGrid,
}

/// Motor outputs.
#[derive(Debug, Clone, Copy)]
pub struct MotorOut<D> {
    /// Electrical input power [W]
    pub pwr_elec: D,
    /// Drive efficiency at the operating point
    pub eff: D,
    /// Torque delivered to the shaft [N·m]
    pub trq: D,
}

impl Motor {
    pub fn new(rated_speed: f64, rated_power: f64, eff_map: MapGrid) -> ElemResult<Self> {
        if !rated_speed.is_finite() || rated_speed <= 0.0 {
            return Err(ElemError::InvalidArg {
                what: "motor rated speed must be positive",
            });
        }
        if !rated_power.is_finite() || rated_power <= 0.0 {
            return Err(ElemError::InvalidArg {
                what: "motor rated power must be positive",
            });
        }
        Ok(Self {
            rated_speed,
            rated_power,
            eff_map,
        })
    }

    /// Generic induction-machine-shaped efficiency map: peak near rated
    /// conditions, drooping toward low speed and light load.
    pub fn default_map() -> MapGrid {
        MapGrid::new(
            vec![0.2, 0.4, 0.6, 0.8, 1.0, 1.1],
            vec![0.1, 0.3, 0.5, 0.75, 1.0, 1.15],
            vec![
                vec![0.70, 0.78, 0.82, 0.84, 0.84, 0.83],
                vec![0.78, 0.86, 0.89, 0.90, 0.90, 0.89],
                vec![0.83, 0.90, 0.93, 0.94, 0.93, 0.92],
                vec![0.86, 0.92, 0.95, 0.96, 0.95, 0.94],
                vec![0.87, 0.93, 0.95, 0.96, 0.96, 0.95],
                vec![0.86, 0.92, 0.94, 0.95, 0.95, 0.94],
            ],
        )
        .expect("embedded motor map is well-formed")
    }

    /// Deliver `pwr_shaft` [W] at speed `nmech` [rad/s].
    pub fn compute<D: DualNum<f64> + Copy>(&self, pwr_shaft: D, nmech: D) -> ElemResult<MotorOut<D>> {
        if pwr_shaft.re() < 0.0 {
            return Err(ElemError::NonPhysical {
                what: "motor shaft power demand must be non-negative",
            });
        }
        let n_frac = nmech / self.rated_speed;
        let p_frac = pwr_shaft / self.rated_power;
        let eff = self.eff_map.eval(n_frac, p_frac);
        if eff.re() <= 0.0 {
            return Err(ElemError::NonPhysical {
                what: "motor efficiency collapsed to zero",
            });
        }
        Ok(MotorOut {
            pwr_elec: pwr_shaft / eff,
            eff,
            trq: pwr_shaft / nmech,
        })
    }
}
