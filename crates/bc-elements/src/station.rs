//! Flow stations: the total + static state bundle passed between elements.

use crate::error::ElemResult;
use bc_thermo::{GasModel, PerfectGas, StaticState, TabularGas, TotalState};
use bc_thermo::{static_from_area, static_from_mach, static_from_ps};
use num_dual::DualNum;

/// Which working gas a stream carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasId {
    /// Dry air, upstream of the burner.
    Air,
    /// Vitiated combustion products, downstream of the burner.
    Products,
}

/// The pair of gas models a cycle evaluates against.
///
/// The lookup tables inside are read-only; one `GasSet` is shared by every
/// station of a model (and may be shared across independently-solved points).
#[derive(Debug, Clone)]
pub struct GasSet {
    pub air: GasModel,
    pub products: GasModel,
}

impl GasSet {
    /// Constant-Cp pair (fastest; all inverses closed-form).
    pub fn constant_cp() -> Self {
        Self {
            air: GasModel::ConstantCp(PerfectGas::air()),
            products: GasModel::ConstantCp(PerfectGas::combustion_products()),
        }
    }

    /// Table-backed pair with temperature-dependent specific heats.
    pub fn tabular() -> Self {
        Self {
            air: GasModel::Tabular(TabularGas::air()),
            products: GasModel::Tabular(TabularGas::combustion_products()),
        }
    }

    pub fn get(&self, id: GasId) -> &GasModel {
        match id {
            GasId::Air => &self.air,
            GasId::Products => &self.products,
        }
    }
}

/// How an element computes the static condition at its exit station.
///
/// Design mode sizes the flow area from a target Mach number; off-design
/// holds the area from the design solve and back-solves the Mach number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StaticsMode {
    /// Target exit Mach number (design): area becomes an output.
    Mach(f64),
    /// Frozen exit area [m²] (off-design): Mach number becomes an output.
    Area(f64),
}

/// A flow station: total and static thermodynamic condition plus mass flow.
///
/// Created fresh by an upstream element every solver iteration and consumed
/// read-only downstream; never mutated after creation.
#[derive(Debug, Clone, Copy)]
pub struct FlowState<D> {
    pub tot: TotalState<D>,
    pub stat: StaticState<D>,
    /// Mass flow [kg/s]
    pub w: D,
    /// Fuel-air ratio carried by the stream (0 upstream of the burner)
    pub far: D,
    pub gas: GasId,
}

impl<D: DualNum<f64> + Copy> FlowState<D> {
    /// Assemble a station from its total state, resolving statics per mode.
    pub fn from_total(
        gases: &GasSet,
        gas: GasId,
        tot: TotalState<D>,
        w: D,
        far: D,
        statics: StaticsMode,
    ) -> ElemResult<Self> {
        let model = gases.get(gas);
        let stat = match statics {
            StaticsMode::Mach(mn) => static_from_mach(model, &tot, w, D::from(mn))?,
            StaticsMode::Area(area) => static_from_area(model, &tot, w, D::from(area))?,
        };
        Ok(Self {
            tot,
            stat,
            w,
            far,
            gas,
        })
    }

    /// Assemble a station whose static pressure is known (free stream).
    pub fn from_total_ps(
        gases: &GasSet,
        gas: GasId,
        tot: TotalState<D>,
        w: D,
        far: D,
        ps: D,
    ) -> ElemResult<Self> {
        let stat = static_from_ps(gases.get(gas), &tot, w, ps)?;
        Ok(Self {
            tot,
            stat,
            w,
            far,
            gas,
        })
    }

    /// Fuel mass flow carried by the stream [kg/s]: `W · FAR / (1 + FAR)`.
    pub fn w_fuel(&self) -> D {
        self.w * self.far / (self.far + 1.0)
    }

    /// Air mass flow carried by the stream [kg/s]: `W / (1 + FAR)`.
    pub fn w_air(&self) -> D {
        self.w / (self.far + 1.0)
    }
}

/// Corrected mass flow `W √(Tt/T_std) / (Pt/P_std)` [kg/s].
pub fn corrected_flow<D: DualNum<f64> + Copy>(tot: &TotalState<D>, w: D) -> D {
    use bc_core::units::constants::{P_SL, T_SL};
    w * (tot.t / T_SL).sqrt() / (tot.p / P_SL)
}

/// Corrected shaft speed `N / √(Tt/T_std)` [rad/s].
pub fn corrected_speed<D: DualNum<f64> + Copy>(tot: &TotalState<D>, n: D) -> D {
    use bc_core::units::constants::T_SL;
    n / (tot.t / T_SL).sqrt()
}

/// Parameter (turbine) corrected flow `W √Tt / Pt`.
pub fn parameter_flow<D: DualNum<f64> + Copy>(tot: &TotalState<D>, w: D) -> D {
    w * tot.t.sqrt() / tot.p
}

/// Parameter (turbine) corrected speed `N / √Tt`.
pub fn parameter_speed<D: DualNum<f64> + Copy>(tot: &TotalState<D>, n: D) -> D {
    n / tot.t.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mach_then_area_round_trip() {
        let gases = GasSet::constant_cp();
        let tot = gases.air.total_from_tp(450.0, 3.0e5).unwrap();
        let fs = FlowState::from_total(&gases, GasId::Air, tot, 50.0, 0.0, StaticsMode::Mach(0.4))
            .unwrap();
        let area = fs.stat.area;
        let fs2 =
            FlowState::from_total(&gases, GasId::Air, tot, 50.0, 0.0, StaticsMode::Area(area))
                .unwrap();
        assert_relative_eq!(fs2.stat.mn, 0.4, max_relative = 1e-5);
    }

    #[test]
    fn fuel_and_air_split_consistent() {
        let gases = GasSet::constant_cp();
        let tot = gases.products.total_from_tp(1300.0, 12.0e5).unwrap();
        let fs = FlowState::from_total(
            &gases,
            GasId::Products,
            tot,
            68.0,
            0.0175,
            StaticsMode::Mach(0.2),
        )
        .unwrap();
        assert_relative_eq!(fs.w_fuel() + fs.w_air(), 68.0, max_relative = 1e-12);
        assert_relative_eq!(fs.w_fuel() / fs.w_air(), 0.0175, max_relative = 1e-12);
    }

    #[test]
    fn corrected_flow_is_physical_flow_at_std_day() {
        let gases = GasSet::constant_cp();
        let tot = gases.air.total_from_tp(288.15, 101_325.0).unwrap();
        assert_relative_eq!(corrected_flow(&tot, 66.9), 66.9, max_relative = 1e-12);
    }
}
