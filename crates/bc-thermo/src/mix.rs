//! Fuel specification and air/fuel mixing.

use crate::error::{ThermoError, ThermoResult};
use num_dual::DualNum;

/// Fuel description for the burner energy balance.
#[derive(Debug, Clone, PartialEq)]
pub struct FuelSpec {
    pub name: &'static str,
    /// Molecular weight [g/mol]
    pub mw: f64,
    /// Lower heating value [J/kg], released at the enthalpy datum temperature
    pub lhv: f64,
}

impl FuelSpec {
    /// Kerosene-class jet fuel.
    pub fn jet_a() -> Self {
        Self {
            name: "Jet-A",
            mw: 167.3,
            lhv: 43.19e6,
        }
    }

    pub fn validate(&self) -> ThermoResult<()> {
        if !self.mw.is_finite() || self.mw <= 0.0 {
            return Err(ThermoError::InvalidArg {
                what: "fuel molecular weight must be positive and finite",
            });
        }
        if !self.lhv.is_finite() || self.lhv <= 0.0 {
            return Err(ThermoError::InvalidArg {
                what: "fuel heating value must be positive and finite",
            });
        }
        Ok(())
    }
}

/// Result of mixing fuel into an air stream at a given fuel-air ratio.
#[derive(Debug, Clone, Copy)]
pub struct FuelMix<D> {
    /// Total mass flow out [kg/s]: W_air (1 + FAR)
    pub w_out: D,
    /// Fuel mass flow [kg/s]: W_air · FAR
    pub w_fuel: D,
    /// Mixture molecular weight [g/mol] from mole-fraction averaging
    pub mw_out: D,
    /// Mass-averaged exit enthalpy [J/kg] including the heating-value release
    pub h_out: D,
}

/// Mix fuel into an air stream.
///
/// Mass balance and mole-fraction molecular weight:
///
/// ```text
/// W_out  = W_air (1 + FAR)
/// x_air  = 1/(1+FAR)          x_fuel = FAR/(1+FAR)      (mass fractions)
/// y_i    = (x_i/MW_i) / Σ(x_j/MW_j)                     (mole fractions)
/// MW_out = Σ y_i MW_i
/// ```
///
/// The energy balance releases the fuel's lower heating value explicitly
/// (both gas datums are anchored at the same reference temperature):
///
/// ```text
/// h_out = (h_air + FAR·LHV) / (1 + FAR)
/// ```
pub fn mix_fuel<D: DualNum<f64> + Copy>(
    w_air: D,
    far: D,
    h_air: D,
    air_mw: f64,
    fuel: &FuelSpec,
) -> FuelMix<D> {
    let w_out = w_air * (far + 1.0);
    let w_fuel = w_air * far;

    let one_plus = far + 1.0;
    let x_air = D::from(1.0) / one_plus;
    let x_fuel = far / one_plus;

    let n_air = x_air / air_mw;
    let n_fuel = x_fuel / fuel.mw;
    let n_sum = n_air + n_fuel;
    let y_air = n_air / n_sum;
    let y_fuel = n_fuel / n_sum;
    let mw_out = y_air * air_mw + y_fuel * fuel.mw;

    let h_out = (h_air + far * fuel.lhv) / one_plus;

    FuelMix {
        w_out,
        w_fuel,
        mw_out,
        h_out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_far_is_identity() {
        let mix = mix_fuel(66.9, 0.0, 3.6e5, 28.9651784, &FuelSpec::jet_a());
        assert_relative_eq!(mix.w_out, 66.9);
        assert_relative_eq!(mix.w_fuel, 0.0);
        assert_relative_eq!(mix.mw_out, 28.9651784, max_relative = 1e-12);
        assert_relative_eq!(mix.h_out, 3.6e5);
    }

    #[test]
    fn mass_conservation() {
        let mix = mix_fuel(66.9, 0.0175, 3.6e5, 28.9651784, &FuelSpec::jet_a());
        assert_relative_eq!(mix.w_out, 66.9 * 1.0175, max_relative = 1e-12);
        assert_relative_eq!(mix.w_fuel, 66.9 * 0.0175, max_relative = 1e-12);
        assert_relative_eq!(mix.w_out, 66.9 + mix.w_fuel, max_relative = 1e-12);
    }

    #[test]
    fn mixture_mw_between_components() {
        let fuel = FuelSpec::jet_a();
        let mix = mix_fuel(1.0, 0.05, 0.0, 28.9651784, &fuel);
        assert!(mix.mw_out > 28.9651784);
        assert!(mix.mw_out < fuel.mw);
    }

    #[test]
    fn heat_release_raises_enthalpy() {
        let mix = mix_fuel(66.9, 0.0175, 3.6e5, 28.9651784, &FuelSpec::jet_a());
        assert!(mix.h_out > 3.6e5);
    }

    #[test]
    fn enthalpy_partial_wrt_far() {
        use num_dual::Dual64;
        let fuel = FuelSpec::jet_a();
        let far = Dual64::from(0.0175).derivative();
        let mix = mix_fuel(Dual64::from(66.9), far, Dual64::from(3.6e5), 28.9651784, &fuel);
        // d/dFAR [(h + FAR·LHV)/(1+FAR)] = (LHV(1+FAR) − (h + FAR·LHV)) / (1+FAR)²
        let far_v: f64 = 0.0175;
        let expect = (fuel.lhv * (1.0 + far_v) - (3.6e5 + far_v * fuel.lhv)) / (1.0 + far_v).powi(2);
        assert_relative_eq!(mix.h_out.eps, expect, max_relative = 1e-10);
    }

    #[test]
    fn bad_fuel_rejected() {
        let bad = FuelSpec {
            name: "bad",
            mw: -1.0,
            lhv: 43.0e6,
        };
        assert!(bad.validate().is_err());
    }
}
