//! Perfect-gas (constant-Cp) property relations.

use crate::error::{ThermoError, ThermoResult};
use bc_core::units::constants::{P_REF, R_UNIVERSAL};
use num_dual::DualNum;

/// Calorically perfect gas: fixed molecular weight and ratio of specific heats.
///
/// Enthalpy and the entropy function φ(T) have closed forms, so every inverse
/// lookup is direct analytic inversion (no iteration):
///
/// ```text
/// h(T)   = h_ref + Cp (T − T_ref)
/// φ(T)   = s_ref + Cp ln(T / T_ref)
/// s(T,P) = φ(T) − R ln(P / P_ref)
/// ```
///
/// `Cp` is derived from γ and R (`Cp = γR/(γ−1)`) so the enthalpy, entropy and
/// density relations stay mutually consistent.
#[derive(Debug, Clone, PartialEq)]
pub struct PerfectGas {
    name: &'static str,
    /// Molecular weight [g/mol]
    mw: f64,
    /// Ratio of specific heats (constant)
    gamma: f64,
    /// Reference temperature [K] where h = h_ref
    t_ref: f64,
    /// Enthalpy at the reference temperature [J/kg]
    h_ref: f64,
    /// Entropy at (T_ref, P_ref) [J/(kg·K)]
    s_ref: f64,
}

impl PerfectGas {
    /// Create a perfect gas from molecular weight and gamma.
    ///
    /// # Errors
    /// Returns an error if `mw` is not positive or `gamma` is not > 1.
    pub fn new(
        name: &'static str,
        mw: f64,
        gamma: f64,
        t_ref: f64,
        h_ref: f64,
        s_ref: f64,
    ) -> ThermoResult<Self> {
        if !mw.is_finite() || mw <= 0.0 {
            return Err(ThermoError::InvalidArg {
                what: "molecular weight must be positive and finite",
            });
        }
        if !gamma.is_finite() || gamma <= 1.0 {
            return Err(ThermoError::InvalidArg {
                what: "gamma must be > 1 and finite",
            });
        }
        if !t_ref.is_finite() || t_ref <= 0.0 {
            return Err(ThermoError::InvalidArg {
                what: "reference temperature must be positive and finite",
            });
        }
        Ok(Self {
            name,
            mw,
            gamma,
            t_ref,
            h_ref,
            s_ref,
        })
    }

    /// Dry air with the standard reference datum.
    pub fn air() -> Self {
        // MW and datum values carried over from the property-table generator
        // for the dry-air mixture.
        Self {
            name: "air",
            mw: 28.965_178_4,
            gamma: 1.4,
            t_ref: 302.462_981_9,
            h_ref: 0.0,
            s_ref: 6875.3,
        }
    }

    /// Vitiated combustion products (air + kerosene-class fuel).
    ///
    /// Same enthalpy datum temperature as [`PerfectGas::air`] so the burner
    /// energy balance can use an explicit heating-value release term.
    pub fn combustion_products() -> Self {
        Self {
            name: "combustion-products",
            mw: 28.8,
            gamma: 1.35,
            t_ref: 302.462_981_9,
            h_ref: 0.0,
            s_ref: 7000.0,
        }
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

    /// Ratio of specific heats.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Specific heat at constant pressure [J/(kg·K)].
    pub fn cp(&self) -> f64 {
        self.gamma * self.r() / (self.gamma - 1.0)
    }

    /// Specific heat at constant volume [J/(kg·K)].
    pub fn cv(&self) -> f64 {
        self.cp() / self.gamma
    }

    /// Enthalpy at temperature [J/kg].
    pub fn h<D: DualNum<f64> + Copy>(&self, t: D) -> D {
        (t - self.t_ref) * self.cp() + self.h_ref
    }

    /// Temperature from enthalpy [K]; exact inverse of [`Self::h`].
    pub fn t_from_h<D: DualNum<f64> + Copy>(&self, h: D) -> D {
        (h - self.h_ref) / self.cp() + self.t_ref
    }

    /// Entropy function φ(T) = s(T, P_ref) [J/(kg·K)].
    pub fn phi<D: DualNum<f64> + Copy>(&self, t: D) -> D {
        (t / self.t_ref).ln() * self.cp() + self.s_ref
    }

    /// Temperature from the entropy function; exact inverse of [`Self::phi`].
    pub fn t_from_phi<D: DualNum<f64> + Copy>(&self, phi: D) -> D {
        ((phi - self.s_ref) / self.cp()).exp() * self.t_ref
    }

    /// Entropy at (T, P) [J/(kg·K)].
    pub fn s<D: DualNum<f64> + Copy>(&self, t: D, p: D) -> D {
        self.phi(t) - (p / P_REF).ln() * self.r()
    }

    /// Temperature from entropy and pressure; exact inverse of [`Self::s`].
    pub fn t_from_s<D: DualNum<f64> + Copy>(&self, s: D, p: D) -> D {
        self.t_from_phi(s + (p / P_REF).ln() * self.r())
    }

    /// Density from the ideal gas law [kg/m³].
    pub fn rho<D: DualNum<f64> + Copy>(&self, p: D, t: D) -> D {
        p / (t * self.r())
    }
}
