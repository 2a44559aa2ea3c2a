//! Rectangular 2-D lookup tables.

use crate::error::{MapError, MapResult};
use num_dual::DualNum;
use serde::Deserialize;

/// Bilinear-interpolated table over a rectangular (x, y) grid.
///
/// `z[i][j]` is the value at `(x[i], y[j])`. Both axes must be strictly
/// increasing. Lookups outside the grid extrapolate along the boundary cell,
/// matching the lenient extrapolation policy of the property tables: a Newton
/// iterate that briefly wanders off the map must not kill the solve.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct MapGrid {
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<Vec<f64>>,
}

/// On-disk form of a map table (see [`MapGrid::from_json_str`]).
#[derive(Debug, Deserialize)]
struct RawGrid {
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<Vec<f64>>,
}

impl TryFrom<RawGrid> for MapGrid {
    type Error = MapError;

    fn try_from(raw: RawGrid) -> MapResult<Self> {
        MapGrid::new(raw.x, raw.y, raw.z)
    }
}

impl MapGrid {
    /// Build a grid, failing fast on malformed data.
    pub fn new(x: Vec<f64>, y: Vec<f64>, z: Vec<Vec<f64>>) -> MapResult<Self> {
        if x.len() < 2 || y.len() < 2 {
            return Err(MapError::BadData {
                what: format!("need at least a 2x2 grid, got {}x{}", x.len(), y.len()),
            });
        }
        if z.len() != x.len() {
            return Err(MapError::BadData {
                what: format!("z row count {} != x length {}", z.len(), x.len()),
            });
        }
        for (i, row) in z.iter().enumerate() {
            if row.len() != y.len() {
                return Err(MapError::BadData {
                    what: format!("z row {} length {} != y length {}", i, row.len(), y.len()),
                });
            }
        }
        for axis in [&x, &y] {
            for w in axis.windows(2) {
                if !(w[1] > w[0]) {
                    return Err(MapError::BadData {
                        what: format!("axis not strictly increasing at {}", w[0]),
                    });
                }
            }
        }
        if x.iter()
            .chain(y.iter())
            .chain(z.iter().flatten())
            .any(|v| !v.is_finite())
        {
            return Err(MapError::BadData {
                what: "non-finite grid entry".to_string(),
            });
        }
        Ok(Self { x, y, z })
    }

    /// Load a grid from its JSON form: `{"x": [...], "y": [...], "z": [[...]]}`.
    pub fn from_json_str(s: &str) -> MapResult<Self> {
        let grid: MapGrid = serde_json::from_str(s)?;
        Ok(grid)
    }

    pub fn x_axis(&self) -> &[f64] {
        &self.x
    }

    pub fn y_axis(&self) -> &[f64] {
        &self.y
    }

    fn cell(axis: &[f64], v: f64) -> usize {
        match axis.binary_search_by(|a| a.partial_cmp(&v).expect("finite")) {
            Ok(i) => i.min(axis.len() - 2),
            Err(0) => 0,
            Err(i) => (i - 1).min(axis.len() - 2),
        }
    }

    /// Bilinear interpolation (boundary-cell extrapolation outside the grid).
    pub fn eval<D: DualNum<f64> + Copy>(&self, x: D, y: D) -> D {
        let i = Self::cell(&self.x, x.re());
        let j = Self::cell(&self.y, y.re());

        let tx = (x - self.x[i]) / (self.x[i + 1] - self.x[i]);
        let ty = (y - self.y[j]) / (self.y[j + 1] - self.y[j]);

        let z00 = self.z[i][j];
        let z10 = self.z[i + 1][j];
        let z01 = self.z[i][j + 1];
        let z11 = self.z[i + 1][j + 1];

        // bilinear form keeps the in-cell gradient exact for dual numbers
        let a = tx * (z10 - z00) + z00;
        let b = tx * (z11 - z01) + z01;
        ty * (b - a) + a
    }

    /// True if values increase strictly along the x axis at every y knot.
    pub fn increasing_in_x(&self) -> bool {
        (0..self.y.len()).all(|j| (1..self.x.len()).all(|i| self.z[i][j] > self.z[i - 1][j]))
    }

    /// True if values increase strictly along the y axis at every x knot.
    pub fn increasing_in_y(&self) -> bool {
        (0..self.x.len()).all(|i| (1..self.y.len()).all(|j| self.z[i][j] > self.z[i][j - 1]))
    }

    /// True if values decrease (non-strictly) along the y axis at every x knot.
    pub fn non_increasing_in_y(&self) -> bool {
        (0..self.x.len()).all(|i| (1..self.y.len()).all(|j| self.z[i][j] <= self.z[i][j - 1]))
    }
}
