//! Table-backed gas properties.

use crate::air_data;
use crate::error::{ThermoError, ThermoResult};
use crate::table::Table1D;
use bc_core::units::constants::{P_REF, R_UNIVERSAL};
use num_dual::DualNum;

/// Gas with temperature-dependent specific heat, backed by lookup tables.
///
/// Construction integrates a cp(T) point set into monotone `T → h` and
/// `T → φ` tables (trapezoidal rule over the knots), where φ is the entropy
/// function at the reference pressure:
///
/// ```text
/// h(T)   = ∫ cp dT          (anchored so h(T_ref) = h_ref)
/// φ(T)   = ∫ cp/T dT        (anchored so φ(T_ref) = s_ref)
/// s(T,P) = φ(T) − R ln(P / P_ref)
/// ```
///
/// Inverse lookups run against the forward tables (bisection to the segment,
/// then exact linear solve). Out-of-range temperatures extrapolate along the
/// boundary segments; see [`Table1D`] for why that leniency exists.
#[derive(Debug, Clone)]
pub struct TabularGas {
    name: &'static str,
    mw: f64,
    h_tab: Table1D,
    phi_tab: Table1D,
    cp_tab: Table1D,
}

impl TabularGas {
    /// Build from cp(T) knots, anchoring the datums at `t_ref`.
    ///
    /// # Errors
    /// Fails fast on malformed data: mismatched lengths, non-increasing
    /// temperatures, non-positive cp, or `t_ref` outside the knot range.
    pub fn from_cp_points(
        name: &'static str,
        mw: f64,
        t_pts: &[f64],
        cp_pts: &[f64],
        t_ref: f64,
        h_ref: f64,
        s_ref: f64,
    ) -> ThermoResult<Self> {
        if !mw.is_finite() || mw <= 0.0 {
            return Err(ThermoError::InvalidArg {
                what: "molecular weight must be positive and finite",
            });
        }
        if cp_pts.iter().any(|cp| !cp.is_finite() || *cp <= 0.0) {
            return Err(ThermoError::TableShape {
                what: "cp must be positive and finite at every knot".to_string(),
            });
        }

        // Cumulative trapezoidal integration over the knots.
        let n = t_pts.len();
        let mut h = vec![0.0; n];
        let mut phi = vec![0.0; n];
        for i in 1..n {
            let dt = t_pts[i] - t_pts[i - 1];
            h[i] = h[i - 1] + 0.5 * (cp_pts[i] + cp_pts[i - 1]) * dt;
            phi[i] = phi[i - 1] + 0.5 * (cp_pts[i] / t_pts[i] + cp_pts[i - 1] / t_pts[i - 1]) * dt;
        }

        let cp_tab = Table1D::new(t_pts.to_vec(), cp_pts.to_vec())?;
        let h_raw = Table1D::new(t_pts.to_vec(), h)?;
        let phi_raw = Table1D::new(t_pts.to_vec(), phi)?;

        let (t_lo, t_hi) = h_raw.x_range();
        if t_ref < t_lo || t_ref > t_hi {
            return Err(ThermoError::TableShape {
                what: format!("reference temperature {t_ref} K outside table range"),
            });
        }

        // Shift datums so h(t_ref) = h_ref and φ(t_ref) = s_ref.
        let dh = h_ref - h_raw.eval(t_ref);
        let dphi = s_ref - phi_raw.eval(t_ref);
        let h_vals: Vec<f64> = (0..n).map(|i| h_raw.eval(t_pts[i]) + dh).collect();
        let phi_vals: Vec<f64> = (0..n).map(|i| phi_raw.eval(t_pts[i]) + dphi).collect();

        Ok(Self {
            name,
            mw,
            h_tab: Table1D::new(t_pts.to_vec(), h_vals)?,
            phi_tab: Table1D::new(t_pts.to_vec(), phi_vals)?,
            cp_tab,
        })
    }

    /// Dry air from the embedded cp data, same datum as the perfect-gas path.
    pub fn air() -> Self {
        Self::from_cp_points(
            "air",
            28.965_178_4,
            &air_data::T_PTS,
            &air_data::AIR_CP,
            302.462_981_9,
            0.0,
            6875.3,
        )
        .expect("embedded air data is well-formed")
    }

    /// Vitiated combustion products from the embedded cp data.
    pub fn combustion_products() -> Self {
        Self::from_cp_points(
            "combustion-products",
            28.8,
            &air_data::T_PTS,
            &air_data::PRODUCTS_CP,
            302.462_981_9,
            0.0,
            7000.0,
        )
        .expect("embedded products data is well-formed")
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Molecular weight [g/mol].
    pub fn mw(&self) -> f64 {
        self.mw
    }

    /// Specific gas constant [J/(kg·K)].
    pub fn r(&self) -> f64 {
        R_UNIVERSAL / self.mw
    }

    /// Enthalpy at temperature [J/kg].
    pub fn h<D: DualNum<f64> + Copy>(&self, t: D) -> D {
        self.h_tab.eval(t)
    }

    /// Temperature from enthalpy [K] (inverse against the forward table).
    pub fn t_from_h<D: DualNum<f64> + Copy>(&self, h: D) -> ThermoResult<D> {
        self.h_tab.inverse(h)
    }

    /// Entropy function φ(T) [J/(kg·K)].
    pub fn phi<D: DualNum<f64> + Copy>(&self, t: D) -> D {
        self.phi_tab.eval(t)
    }

    /// Temperature from the entropy function.
    pub fn t_from_phi<D: DualNum<f64> + Copy>(&self, phi: D) -> ThermoResult<D> {
        self.phi_tab.inverse(phi)
    }

    /// Entropy at (T, P) [J/(kg·K)].
    pub fn s<D: DualNum<f64> + Copy>(&self, t: D, p: D) -> D {
        self.phi(t) - (p / P_REF).ln() * self.r()
    }

    /// Temperature from entropy and pressure.
    pub fn t_from_s<D: DualNum<f64> + Copy>(&self, s: D, p: D) -> ThermoResult<D> {
        self.t_from_phi(s + (p / P_REF).ln() * self.r())
    }

    /// Specific heat at constant pressure [J/(kg·K)].
    pub fn cp<D: DualNum<f64> + Copy>(&self, t: D) -> D {
        self.cp_tab.eval(t)
    }

    /// Ratio of specific heats at temperature.
    pub fn gamma<D: DualNum<f64> + Copy>(&self, t: D) -> D {
        let cp = self.cp(t);
        cp / (cp - self.r())
    }

    /// Density from the ideal gas law [kg/m³].
    pub fn rho<D: DualNum<f64> + Copy>(&self, p: D, t: D) -> D {
        p / (t * self.r())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn air_datum_matches_reference() {
        let air = TabularGas::air();
        assert_relative_eq!(air.h(302.462_981_9), 0.0, epsilon = 1e-6);
        assert_relative_eq!(air.phi(302.462_981_9), 6875.3, epsilon = 1e-6);
    }

    #[test]
    fn enthalpy_round_trip_over_range() {
        let air = TabularGas::air();
        for t in [60.0, 250.0, 302.46, 700.0, 1316.67, 1999.0] {
            let h = air.h(t);
            assert_relative_eq!(air.t_from_h(h).unwrap(), t, max_relative = 1e-10);
        }
    }

    #[test]
    fn entropy_round_trip_over_range() {
        let air = TabularGas::air();
        for t in [150.0, 400.0, 900.0, 1800.0] {
            for p in [0.5e5, 1.01325e5, 21.0e5] {
                let s = air.s(t, p);
                assert_relative_eq!(air.t_from_s(s, p).unwrap(), t, max_relative = 1e-10);
            }
        }
    }

    #[test]
    fn extrapolation_beyond_range_is_clamped_not_fatal() {
        let air = TabularGas::air();
        // 2500 K is above the last knot; slope continues from the end segment.
        let h_hi = air.h(2500.0);
        assert!(h_hi > air.h(2000.0));
        let t_back = air.t_from_h(h_hi).unwrap();
        assert_relative_eq!(t_back, 2500.0, max_relative = 1e-9);
    }

    #[test]
    fn cp_rises_with_temperature() {
        let air = TabularGas::air();
        assert!(air.cp(1500.0) > air.cp(300.0));
        // gamma correspondingly falls
        assert!(air.gamma(1500.0) < air.gamma(300.0));
    }

    #[test]
    fn products_hotter_than_air_at_same_enthalpy() {
        // products cp > air cp, so for the same enthalpy rise products end cooler;
        // equivalently h_products(T) > h_air(T) above the shared datum.
        let air = TabularGas::air();
        let prod = TabularGas::combustion_products();
        assert!(prod.h(1300.0) > air.h(1300.0));
    }

    #[test]
    fn near_perfect_gas_at_room_temperature() {
        use crate::gas::PerfectGas;
        let tab = TabularGas::air();
        let pg = PerfectGas::air();
        // Around the datum both paths agree closely.
        assert_relative_eq!(tab.h(320.0), pg.h(320.0), max_relative = 2e-2);
    }
}
