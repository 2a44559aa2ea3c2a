//! Atmosphere model and flight conditions.

use crate::error::{ElemError, ElemResult};
use crate::station::{FlowState, GasId, GasSet};
use num_dual::DualNum;

/// US Standard Atmosphere 1976, troposphere and lower stratosphere.
///
/// Valid to 20 km geometric altitude; `dts` is a day-type temperature offset
/// added to the standard static temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ambient {
    /// Geometric altitude [m]
    pub alt: f64,
    /// Temperature offset from standard day [K]
    pub dts: f64,
}

impl Ambient {
    const LAPSE: f64 = 0.0065; // K/m
    const T_TROPOPAUSE: f64 = 216.65; // K
    const P_TROPOPAUSE: f64 = 22_632.06; // Pa
    const H_TROPOPAUSE: f64 = 11_000.0; // m
    const GMR: f64 = 9.806_65 / (287.052_87 * 0.0065); // g / (R·L), exponent base

    pub fn new(alt: f64, dts: f64) -> ElemResult<Self> {
        if !alt.is_finite() || !(-500.0..=20_000.0).contains(&alt) {
            return Err(ElemError::InvalidArg {
                what: "altitude must be within -500..20000 m",
            });
        }
        Ok(Self { alt, dts })
    }

    /// Static temperature [K] at altitude (standard + offset).
    pub fn ts(&self) -> f64 {
        use bc_core::units::constants::T_SL;
        let t_std = if self.alt <= Self::H_TROPOPAUSE {
            T_SL - Self::LAPSE * self.alt
        } else {
            Self::T_TROPOPAUSE
        };
        t_std + self.dts
    }

    /// Static pressure [Pa] at altitude (unaffected by the day-type offset).
    pub fn ps(&self) -> f64 {
        use bc_core::units::constants::{P_SL, T_SL};
        if self.alt <= Self::H_TROPOPAUSE {
            let theta = (T_SL - Self::LAPSE * self.alt) / T_SL;
            P_SL * theta.powf(Self::GMR)
        } else {
            let scale = -9.806_65 * (self.alt - Self::H_TROPOPAUSE)
                / (287.052_87 * Self::T_TROPOPAUSE);
            Self::P_TROPOPAUSE * scale.exp()
        }
    }
}

/// Free-stream flow station from altitude, Mach number, and mass flow.
///
/// The ambient statics come from the atmosphere model; totals follow from the
/// isentropic compression to stagnation, which both gas paths invert
/// analytically (no nested balance needed here).
#[derive(Debug, Clone, PartialEq)]
pub struct FlightConditions {
    pub ambient: Ambient,
    /// Flight Mach number
    pub mn: f64,
    /// Base mass flow [kg/s]; usually overridden by a balance unknown
    pub w: f64,
}

impl FlightConditions {
    pub fn new(ambient: Ambient, mn: f64, w: f64) -> ElemResult<Self> {
        if !mn.is_finite() || mn < 0.0 {
            return Err(ElemError::InvalidArg {
                what: "flight Mach number must be non-negative and finite",
            });
        }
        if !w.is_finite() || w <= 0.0 {
            return Err(ElemError::InvalidArg {
                what: "base mass flow must be positive and finite",
            });
        }
        Ok(Self { ambient, mn, w })
    }

    /// Produce the free-stream station for a given mass flow.
    pub fn compute<D: DualNum<f64> + Copy>(
        &self,
        gases: &GasSet,
        w: D,
    ) -> ElemResult<FlowState<D>> {
        let gas = gases.get(GasId::Air);
        let ts = D::from(self.ambient.ts());
        let ps = D::from(self.ambient.ps());

        // stagnation via the energy equation: ht = hs + V²/2
        let gamma = gas.gamma(ts);
        let vsonic = (gamma * ts * gas.r()).sqrt();
        let v = vsonic * self.mn;
        let ht = gas.h(ts) + v * v * 0.5;
        let tt = gas.t_from_h(ht)?;
        // isentropic: total entropy equals static entropy
        let s = gas.s(ts, ps);
        let pt = gas.p_from_ts(tt, s);

        let tot = gas.total_from_tp(tt, pt)?;
        FlowState::from_total_ps(gases, GasId::Air, tot, w, D::from(0.0), ps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sea_level_standard_day() {
        let amb = Ambient::new(0.0, 0.0).unwrap();
        assert_relative_eq!(amb.ts(), 288.15, max_relative = 1e-12);
        assert_relative_eq!(amb.ps(), 101_325.0, max_relative = 1e-12);
    }

    #[test]
    fn altitude_11km_matches_tropopause_tables() {
        let amb = Ambient::new(11_000.0, 0.0).unwrap();
        assert_relative_eq!(amb.ts(), 216.65, max_relative = 1e-6);
        assert_relative_eq!(amb.ps(), 22_632.06, max_relative = 2e-3);
    }

    #[test]
    fn stratosphere_pressure_decays_exponentially() {
        let lo = Ambient::new(12_000.0, 0.0).unwrap();
        let hi = Ambient::new(16_000.0, 0.0).unwrap();
        assert!(hi.ps() < lo.ps());
        assert_relative_eq!(hi.ts(), 216.65, max_relative = 1e-12);
    }

    #[test]
    fn rejects_out_of_range_altitude() {
        assert!(Ambient::new(30_000.0, 0.0).is_err());
        assert!(Ambient::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn static_conditions_recovered_at_low_mach() {
        let gases = GasSet::constant_cp();
        let fc =
            FlightConditions::new(Ambient::new(0.0, 0.0).unwrap(), 1e-6, 66.9).unwrap();
        let fs = fc.compute(&gases, 66.9).unwrap();
        assert_relative_eq!(fs.stat.t, 288.15, max_relative = 1e-9);
        assert_relative_eq!(fs.stat.p, 101_325.0, max_relative = 1e-6);
        // totals collapse onto statics when stagnant
        assert_relative_eq!(fs.tot.t, 288.15, max_relative = 1e-9);
    }

    #[test]
    fn cruise_totals_exceed_statics() {
        let gases = GasSet::tabular();
        let fc = FlightConditions::new(Ambient::new(10_668.0, 0.0).unwrap(), 0.8, 100.0).unwrap();
        let fs = fc.compute(&gases, 100.0).unwrap();
        assert!(fs.tot.t.re() > fs.stat.t.re());
        assert!(fs.tot.p.re() > fs.stat.p.re());
        // Mach number round-trips through the static-pressure path
        assert_relative_eq!(fs.stat.mn, 0.8, max_relative = 1e-6);
    }
}
