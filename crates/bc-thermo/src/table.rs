//! Monotone 1-D lookup tables with lenient extrapolation.

use crate::error::{ThermoError, ThermoResult};
use num_dual::DualNum;

/// Piecewise-linear lookup table over a strictly increasing abscissa.
///
/// Evaluation outside the table range extrapolates linearly along the
/// boundary segment instead of erroring. That leniency is deliberate: Newton
/// iterates may transiently leave the physical range, and a hard error there
/// would kill an otherwise-convergent solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Table1D {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Table1D {
    /// Build a table from matching x/y arrays.
    ///
    /// Fails fast if the arrays are shorter than 2 points, differ in length,
    /// contain non-finite values, or x is not strictly increasing.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> ThermoResult<Self> {
        if x.len() != y.len() {
            return Err(ThermoError::TableShape {
                what: format!("x/y length mismatch: {} != {}", x.len(), y.len()),
            });
        }
        if x.len() < 2 {
            return Err(ThermoError::TableShape {
                what: format!("need at least 2 points, got {}", x.len()),
            });
        }
        for v in x.iter().chain(y.iter()) {
            if !v.is_finite() {
                return Err(ThermoError::TableShape {
                    what: "non-finite table entry".to_string(),
                });
            }
        }
        for w in x.windows(2) {
            if w[1] <= w[0] {
                return Err(ThermoError::TableShape {
                    what: format!("abscissa not strictly increasing at x={}", w[0]),
                });
            }
        }
        Ok(Self { x, y })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        false // construction requires >= 2 points
    }

    /// Inclusive abscissa range covered by the table.
    pub fn x_range(&self) -> (f64, f64) {
        (self.x[0], *self.x.last().expect("nonempty"))
    }

    /// True if the ordinate is strictly increasing (required for inversion).
    pub fn is_monotone_increasing(&self) -> bool {
        self.y.windows(2).all(|w| w[1] > w[0])
    }

    /// Index of the segment used for abscissa `x` (clamped to end segments).
    fn segment(&self, x: f64) -> usize {
        match self.x.binary_search_by(|v| v.partial_cmp(&x).expect("finite")) {
            Ok(i) => i.min(self.x.len() - 2),
            Err(0) => 0,
            Err(i) => (i - 1).min(self.x.len() - 2),
        }
    }

    /// Interpolate (or extrapolate along the boundary segment).
    pub fn eval<D: DualNum<f64> + Copy>(&self, x: D) -> D {
        let i = self.segment(x.re());
        let slope = (self.y[i + 1] - self.y[i]) / (self.x[i + 1] - self.x[i]);
        (x - self.x[i]) * slope + self.y[i]
    }

    /// Local slope dy/dx at abscissa `x` (segment slope).
    pub fn slope_at(&self, x: f64) -> f64 {
        let i = self.segment(x);
        (self.y[i + 1] - self.y[i]) / (self.x[i + 1] - self.x[i])
    }

    /// Invert the table: find x such that eval(x) == y.
    ///
    /// Requires a strictly increasing ordinate; the segment is located by
    /// bisection against the forward table, then solved exactly. Out-of-range
    /// values extrapolate along the boundary segment.
    pub fn inverse<D: DualNum<f64> + Copy>(&self, y: D) -> ThermoResult<D> {
        if !self.is_monotone_increasing() {
            return Err(ThermoError::InvalidArg {
                what: "table ordinate not strictly increasing; cannot invert",
            });
        }
        let yv = y.re();
        let i = match self
            .y
            .binary_search_by(|v| v.partial_cmp(&yv).expect("finite"))
        {
            Ok(i) => i.min(self.y.len() - 2),
            Err(0) => 0,
            Err(i) => (i - 1).min(self.y.len() - 2),
        };
        let slope = (self.y[i + 1] - self.y[i]) / (self.x[i + 1] - self.x[i]);
        Ok((y - self.y[i]) / slope + self.x[i])
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn inverse_of_eval_is_identity(x in -2.0_f64..6.0) {
            let t = Table1D::new(
                vec![0.0, 0.7, 1.9, 3.2, 4.0],
                vec![1.0, 2.1, 4.4, 7.0, 9.5],
            ).unwrap();
            let y = t.eval(x);
            let back = t.inverse(y).unwrap();
            prop_assert!((back - x).abs() < 1e-9);
        }
    }
}
