//! Compressor performance maps.

use crate::error::{MapError, MapResult};
use crate::grid::MapGrid;
use crate::scaling::MapScalars;
use num_dual::DualNum;

/// Scaled compressor operating point.
#[derive(Debug, Clone, Copy)]
pub struct CompressorMapPoint<D> {
    /// Corrected flow [kg/s]
    pub wc: D,
    /// Pressure ratio
    pub pr: D,
    /// Isentropic efficiency
    pub eff: D,
}

/// Compressor map over (normalized corrected speed, R-line β).
///
/// The β axis parameterizes position along a speed line from choke (low β,
/// high flow, low PR) to surge (high β, low flow, high PR). All three output
/// tables are normalized so the raw map reads 1.0 at the design coordinates;
/// [`MapScalars`] stretch the map onto a physical design point.
#[derive(Debug, Clone)]
pub struct CompressorMap {
    wc: MapGrid,
    pr: MapGrid,
    eff: MapGrid,
    /// Map coordinates of the design point
    design_nc: f64,
    design_beta: f64,
}

impl CompressorMap {
    /// Assemble a map from its three output grids.
    ///
    /// Fails fast if the grids disagree on axes, if the design coordinates
    /// fall outside the grid, or if the map shape violates the physical
    /// monotonicity invariants:
    /// - corrected flow strictly increases with corrected speed,
    /// - corrected flow does not increase with β,
    /// - pressure ratio strictly increases with β.
    ///
    /// Together these guarantee that raising corrected speed at fixed
    /// pressure ratio never lowers corrected flow.
    pub fn new(
        wc: MapGrid,
        pr: MapGrid,
        eff: MapGrid,
        design_nc: f64,
        design_beta: f64,
    ) -> MapResult<Self> {
        for (name, g) in [("pr", &pr), ("eff", &eff)] {
            if g.x_axis() != wc.x_axis() || g.y_axis() != wc.y_axis() {
                return Err(MapError::BadData {
                    what: format!("{name} grid axes differ from wc grid axes"),
                });
            }
        }
        let (nx0, nx1) = (wc.x_axis()[0], *wc.x_axis().last().expect("nonempty"));
        let (by0, by1) = (wc.y_axis()[0], *wc.y_axis().last().expect("nonempty"));
        if design_nc < nx0 || design_nc > nx1 || design_beta < by0 || design_beta > by1 {
            return Err(MapError::BadData {
                what: format!("design point ({design_nc}, {design_beta}) outside map"),
            });
        }
        if !wc.increasing_in_x() {
            return Err(MapError::ShapeViolation {
                what: "corrected flow must increase with corrected speed".to_string(),
            });
        }
        if !wc.non_increasing_in_y() {
            return Err(MapError::ShapeViolation {
                what: "corrected flow must not increase with beta".to_string(),
            });
        }
        if !pr.increasing_in_y() {
            return Err(MapError::ShapeViolation {
                what: "pressure ratio must increase with beta".to_string(),
            });
        }
        Ok(Self {
            wc,
            pr,
            eff,
            design_nc,
            design_beta,
        })
    }

    /// Embedded generic axial-compressor map.
    pub fn default_axial() -> Self {
        let nc = vec![0.50, 0.60, 0.70, 0.80, 0.90, 1.00, 1.10];
        let beta = vec![1.0, 1.5, 2.0, 2.5, 3.0];
        let wc = vec![
            vec![0.374767, 0.364160, 0.353553, 0.342947, 0.332340],
            vec![0.492643, 0.478701, 0.464758, 0.450815, 0.436873],
            vec![0.620802, 0.603232, 0.585662, 0.568092, 0.550522],
            vec![0.758474, 0.737008, 0.715542, 0.694076, 0.672609],
            vec![0.905044, 0.879429, 0.853815, 0.828201, 0.802586],
            vec![1.060000, 1.030000, 1.000000, 0.970000, 0.940000],
            vec![1.222911, 1.188300, 1.153690, 1.119079, 1.084468],
        ];
        let pr = vec![
            vec![0.184992, 0.201315, 0.217638, 0.233960, 0.250283],
            vec![0.276281, 0.300659, 0.325037, 0.349415, 0.373793],
            vec![0.387824, 0.422044, 0.456263, 0.490483, 0.524703],
            vec![0.520256, 0.566161, 0.612066, 0.657971, 0.703875],
            vec![0.674144, 0.733627, 0.793110, 0.852593, 0.912077],
            vec![0.850000, 0.925000, 1.000000, 1.075000, 1.150000],
            vec![1.048293, 1.140790, 1.233286, 1.325783, 1.418279],
        ];
        let eff = vec![
            vec![0.865000, 0.910000, 0.925000, 0.910000, 0.865000],
            vec![0.892000, 0.937000, 0.952000, 0.937000, 0.892000],
            vec![0.913000, 0.958000, 0.973000, 0.958000, 0.913000],
            vec![0.928000, 0.973000, 0.988000, 0.973000, 0.928000],
            vec![0.937000, 0.982000, 0.997000, 0.982000, 0.937000],
            vec![0.940000, 0.985000, 1.000000, 0.985000, 0.940000],
            vec![0.937000, 0.982000, 0.997000, 0.982000, 0.937000],
        ];
        Self::new(
            MapGrid::new(nc.clone(), beta.clone(), wc).expect("embedded wc grid"),
            MapGrid::new(nc.clone(), beta.clone(), pr).expect("embedded pr grid"),
            MapGrid::new(nc, beta, eff).expect("embedded eff grid"),
            1.0,
            2.0,
        )
        .expect("embedded compressor map is well-formed")
    }

    /// Map coordinates of the design point (normalized speed, β).
    pub fn design_coords(&self) -> (f64, f64) {
        (self.design_nc, self.design_beta)
    }

    /// β-axis bounds, useful as solver bounds for the off-design unknown.
    pub fn beta_range(&self) -> (f64, f64) {
        let y = self.wc.y_axis();
        (y[0], *y.last().expect("nonempty"))
    }

    /// Compute calibration scalars so the scaled map reproduces a physical
    /// design point (corrected flow, PR, efficiency, corrected speed).
    pub fn calibrate(&self, wc_des: f64, pr_des: f64, eff_des: f64, nc_des: f64) -> MapScalars {
        let wc_map: f64 = self.wc.eval(self.design_nc, self.design_beta);
        let pr_map: f64 = self.pr.eval(self.design_nc, self.design_beta);
        let eff_map: f64 = self.eff.eval(self.design_nc, self.design_beta);
        MapScalars {
            s_w: wc_des / wc_map,
            s_pr: (pr_des - 1.0) / pr_map,
            s_eff: eff_des / eff_map,
            s_n: nc_des / self.design_nc,
        }
    }

    /// Scaled lookup at physical corrected speed and map β.
    pub fn lookup<D: DualNum<f64> + Copy>(
        &self,
        scalars: &MapScalars,
        nc: D,
        beta: D,
    ) -> CompressorMapPoint<D> {
        let nc_map = nc / scalars.s_n;
        CompressorMapPoint {
            wc: self.wc.eval(nc_map, beta) * scalars.s_w,
            pr: self.pr.eval(nc_map, beta) * scalars.s_pr + 1.0,
            eff: self.eff.eval(nc_map, beta) * scalars.s_eff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn calibrated_map_reproduces_design_point() {
        let map = CompressorMap::default_axial();
        let scalars = map.calibrate(66.9, 13.5, 0.83, 845.0);
        let pt = map.lookup(&scalars, 845.0, 2.0);
        assert_relative_eq!(pt.wc, 66.9, max_relative = 1e-10);
        assert_relative_eq!(pt.pr, 13.5, max_relative = 1e-10);
        assert_relative_eq!(pt.eff, 0.83, max_relative = 1e-10);
    }

    #[test]
    fn flow_rises_with_speed_at_fixed_beta() {
        let map = CompressorMap::default_axial();
        let scalars = map.calibrate(66.9, 13.5, 0.83, 845.0);
        let lo = map.lookup(&scalars, 760.0, 2.2);
        let hi = map.lookup(&scalars, 880.0, 2.2);
        assert!(hi.wc > lo.wc);
        assert!(hi.pr > lo.pr);
    }

    #[test]
    fn flow_never_drops_with_speed_at_fixed_pr() {
        // The map-shape invariants imply the constant-PR property; probe it
        // numerically by tracing a PR contour through beta at two speeds.
        let map = CompressorMap::default_axial();
        let scalars = map.calibrate(66.9, 13.5, 0.83, 845.0);
        let pr_target = 11.0;
        let wc_at = |nc: f64| {
            // bisect beta to hit pr_target on this speed line
            let (mut lo, mut hi) = map.beta_range();
            for _ in 0..60 {
                let mid = 0.5 * (lo + hi);
                let pt = map.lookup(&scalars, nc, mid);
                if pt.pr < pr_target {
                    lo = mid;
                } else {
                    hi = mid;
                }
            }
            map.lookup(&scalars, nc, 0.5 * (lo + hi)).wc
        };
        let w1 = wc_at(800.0);
        let w2 = wc_at(860.0);
        assert!(w2 >= w1, "corrected flow dropped with speed: {w1} -> {w2}");
    }

    #[test]
    fn shape_violation_rejected() {
        // flow increasing with beta violates the map shape
        let axis_x = vec![0.5, 1.0];
        let axis_y = vec![1.0, 2.0];
        let wc_bad = MapGrid::new(
            axis_x.clone(),
            axis_y.clone(),
            vec![vec![0.5, 0.6], vec![1.0, 1.1]],
        )
        .unwrap();
        let pr = MapGrid::new(
            axis_x.clone(),
            axis_y.clone(),
            vec![vec![0.4, 0.5], vec![0.9, 1.0]],
        )
        .unwrap();
        let eff = MapGrid::new(axis_x, axis_y, vec![vec![0.9, 0.91], vec![0.99, 1.0]]).unwrap();
        assert!(CompressorMap::new(wc_bad, pr, eff, 1.0, 2.0).is_err());
    }
}
