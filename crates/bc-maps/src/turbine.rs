//! Turbine performance maps.

use crate::error::{MapError, MapResult};
use crate::grid::MapGrid;
use crate::scaling::MapScalars;
use num_dual::DualNum;

/// Scaled turbine operating point.
#[derive(Debug, Clone, Copy)]
pub struct TurbineMapPoint<D> {
    /// Corrected (parameter) flow [kg·√K/(s·Pa)] scaled to physical units
    pub wp: D,
    /// Isentropic efficiency
    pub eff: D,
}

/// Turbine map over (normalized corrected speed, normalized PR − 1).
///
/// Unlike the compressor, the pressure ratio is itself a map coordinate:
/// turbine corrected flow is nearly independent of speed and rises toward
/// choking with expansion ratio, so `(Np, PR)` locates the operating point
/// directly and no auxiliary β coordinate is needed.
#[derive(Debug, Clone)]
pub struct TurbineMap {
    wp: MapGrid,
    eff: MapGrid,
    design_np: f64,
    design_prn: f64,
}

impl TurbineMap {
    /// Assemble a map from its output grids.
    ///
    /// Corrected flow must strictly increase with expansion ratio (approach
    /// to choke); axes of both grids must agree.
    pub fn new(wp: MapGrid, eff: MapGrid, design_np: f64, design_prn: f64) -> MapResult<Self> {
        if eff.x_axis() != wp.x_axis() || eff.y_axis() != wp.y_axis() {
            return Err(MapError::BadData {
                what: "eff grid axes differ from wp grid axes".to_string(),
            });
        }
        if !wp.increasing_in_y() {
            return Err(MapError::ShapeViolation {
                what: "turbine corrected flow must increase with pressure ratio".to_string(),
            });
        }
        let (x0, x1) = (wp.x_axis()[0], *wp.x_axis().last().expect("nonempty"));
        let (y0, y1) = (wp.y_axis()[0], *wp.y_axis().last().expect("nonempty"));
        if design_np < x0 || design_np > x1 || design_prn < y0 || design_prn > y1 {
            return Err(MapError::BadData {
                what: format!("design point ({design_np}, {design_prn}) outside map"),
            });
        }
        Ok(Self {
            wp,
            eff,
            design_np,
            design_prn,
        })
    }

    /// Embedded generic axial-turbine map.
    pub fn default_axial() -> Self {
        let np = vec![0.40, 0.60, 0.80, 1.00, 1.20];
        let prn = vec![0.30, 0.55, 0.80, 1.00, 1.20, 1.40];
        let wp = vec![
            vec![0.554295, 0.750519, 0.905160, 1.012000, 1.108590, 1.197415],
            vec![0.552104, 0.747553, 0.901583, 1.008000, 1.104209, 1.192682],
            vec![0.549913, 0.744586, 0.898005, 1.004000, 1.099827, 1.187949],
            vec![0.547723, 0.741620, 0.894427, 1.000000, 1.095445, 1.183216],
            vec![0.545532, 0.738653, 0.890849, 0.996000, 1.091063, 1.178483],
        ];
        let eff = vec![
            vec![0.836500, 0.879625, 0.904000, 0.910000, 0.904000, 0.886000],
            vec![0.886500, 0.929625, 0.954000, 0.960000, 0.954000, 0.936000],
            vec![0.916500, 0.959625, 0.984000, 0.990000, 0.984000, 0.966000],
            vec![0.926500, 0.969625, 0.994000, 1.000000, 0.994000, 0.976000],
            vec![0.916500, 0.959625, 0.984000, 0.990000, 0.984000, 0.966000],
        ];
        Self::new(
            MapGrid::new(np.clone(), prn.clone(), wp).expect("embedded wp grid"),
            MapGrid::new(np, prn, eff).expect("embedded eff grid"),
            1.0,
            1.0,
        )
        .expect("embedded turbine map is well-formed")
    }

    /// Map coordinates of the design point.
    pub fn design_coords(&self) -> (f64, f64) {
        (self.design_np, self.design_prn)
    }

    /// Normalized PR-axis bounds, useful as solver bounds for the off-design
    /// pressure-ratio unknown.
    pub fn prn_range(&self) -> (f64, f64) {
        let y = self.wp.y_axis();
        (y[0], *y.last().expect("nonempty"))
    }

    /// Compute calibration scalars from a physical design point.
    pub fn calibrate(&self, wp_des: f64, pr_des: f64, eff_des: f64, np_des: f64) -> MapScalars {
        let wp_map: f64 = self.wp.eval(self.design_np, self.design_prn);
        let eff_map: f64 = self.eff.eval(self.design_np, self.design_prn);
        MapScalars {
            s_w: wp_des / wp_map,
            s_pr: (pr_des - 1.0) / self.design_prn,
            s_eff: eff_des / eff_map,
            s_n: np_des / self.design_np,
        }
    }

    /// Scaled lookup at physical corrected speed and pressure ratio.
    pub fn lookup<D: DualNum<f64> + Copy>(
        &self,
        scalars: &MapScalars,
        np: D,
        pr: D,
    ) -> TurbineMapPoint<D> {
        let np_map = np / scalars.s_n;
        let prn = (pr - 1.0) / scalars.s_pr;
        TurbineMapPoint {
            wp: self.wp.eval(np_map, prn) * scalars.s_w,
            eff: self.eff.eval(np_map, prn) * scalars.s_eff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn calibrated_map_reproduces_design_point() {
        let map = TurbineMap::default_axial();
        let scalars = map.calibrate(3.1e-3, 3.88, 0.86, 22.0);
        let pt = map.lookup(&scalars, 22.0, 3.88);
        assert_relative_eq!(pt.wp, 3.1e-3, max_relative = 1e-10);
        assert_relative_eq!(pt.eff, 0.86, max_relative = 1e-10);
    }

    #[test]
    fn flow_rises_toward_choke() {
        let map = TurbineMap::default_axial();
        let scalars = map.calibrate(3.1e-3, 3.88, 0.86, 22.0);
        let lo = map.lookup(&scalars, 22.0, 2.5);
        let hi = map.lookup(&scalars, 22.0, 4.5);
        assert!(hi.wp > lo.wp);
    }

    #[test]
    fn efficiency_falls_off_design() {
        let map = TurbineMap::default_axial();
        let scalars = map.calibrate(3.1e-3, 3.88, 0.86, 22.0);
        let on = map.lookup(&scalars, 22.0, 3.88);
        let off = map.lookup(&scalars, 13.0, 2.0);
        assert!(off.eff < on.eff);
    }
}
