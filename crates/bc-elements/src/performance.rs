//! Engine-level performance summary.

use num_dual::DualNum;

/// Performance roll-up configuration (which metrics are meaningful depends on
/// the cycle: thrust engines report TSFC, shaft engines PSFC).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Performance;

/// Derived engine-level quantities for one operating point.
#[derive(Debug, Clone, Copy)]
pub struct PerfSummary<D> {
    /// Gross thrust [N]
    pub fg: D,
    /// Ram drag [N]
    pub f_ram: D,
    /// Net thrust [N]
    pub fn_net: D,
    /// Overall pressure ratio Pt_burner_inlet / Pt_engine_inlet
    pub opr: D,
    /// Thrust-specific fuel consumption [kg/(N·s)]
    pub tsfc: D,
    /// Power-specific fuel consumption [kg/J]
    pub psfc: D,
}

impl Performance {
    /// Roll up performance from element outputs.
    ///
    /// `power` is the delivered shaft power for turboshaft-style cycles
    /// (pass the net turbine output); thrust cycles pass the residualized
    /// shaft power, which leaves PSFC meaningless but harmless.
    #[allow(clippy::too_many_arguments)]
    pub fn summarize<D: DualNum<f64> + Copy>(
        &self,
        fg: D,
        f_ram: D,
        w_fuel: D,
        pt_inlet: D,
        pt_burner_inlet: D,
        power: D,
    ) -> PerfSummary<D> {
        let fn_net = fg - f_ram;
        PerfSummary {
            fg,
            f_ram,
            fn_net,
            opr: pt_burner_inlet / pt_inlet,
            tsfc: w_fuel / fn_net,
            psfc: w_fuel / power,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn net_thrust_and_opr() {
        let perf = Performance;
        let s = perf.summarize(52_500.0, 10.0, 1.18, 101_325.0, 13.5 * 101_325.0, 1.0e6);
        assert_relative_eq!(s.fn_net, 52_490.0, max_relative = 1e-12);
        assert_relative_eq!(s.opr, 13.5, max_relative = 1e-12);
        assert_relative_eq!(s.tsfc, 1.18 / 52_490.0, max_relative = 1e-12);
    }

    #[test]
    fn static_test_stand_has_no_ram_drag() {
        let perf = Performance;
        let s = perf.summarize(52_500.0, 0.0, 1.18, 101_325.0, 13.5 * 101_325.0, 1.0e6);
        assert_relative_eq!(s.fg, s.fn_net);
    }
}
