//! Design → off-design calibration transfer.

use crate::model::{CycleModel, Evaluated};
use bc_elements::Element;
use bc_maps::MapScalars;

/// Everything a fixed-geometry (off-design) model inherits from a converged
/// design solve: turbomachinery map scalars, every station's flow area, and
/// nozzle throat areas.
///
/// This pack is the boundary between the two modes: the off-design model's
/// free unknowns (shaft speeds, map coordinates, turbine PRs) are exactly the
/// quantities these frozen values used to determine.
#[derive(Debug, Clone, Default)]
pub struct Calibration {
    /// Compressor map scalars by element name
    pub comp_scalars: Vec<(String, MapScalars)>,
    /// Turbine map scalars by element name
    pub turb_scalars: Vec<(String, MapScalars)>,
    /// Exit flow area [m²] by element name
    pub areas: Vec<(String, f64)>,
    /// Nozzle throat area [m²] by element name
    pub nozzle_throat: Vec<(String, f64)>,
}

impl Calibration {
    pub(crate) fn extract(model: &CycleModel, ev: &Evaluated<f64>) -> Self {
        let mut cal = Calibration::default();
        for (i, ne) in model.elems.iter().enumerate() {
            if let Some(s) = ev.comp_scalars[i] {
                cal.comp_scalars.push((ne.name.clone(), s));
            }
            if let Some(s) = ev.turb_scalars[i] {
                cal.turb_scalars.push((ne.name.clone(), s));
            }
            if let Some(fs) = &ev.station[i] {
                if !matches!(ne.elem, Element::Nozzle(_)) {
                    cal.areas.push((ne.name.clone(), fs.stat.area));
                }
            }
            if let Some(a) = ev.nozzle_area[i] {
                cal.nozzle_throat.push((ne.name.clone(), a));
            }
        }
        cal
    }

    pub fn comp(&self, name: &str) -> Option<MapScalars> {
        self.comp_scalars
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| *s)
    }

    pub fn turb(&self, name: &str) -> Option<MapScalars> {
        self.turb_scalars
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| *s)
    }

    /// Exit area of a named element [m²].
    pub fn area(&self, name: &str) -> Option<f64> {
        self.areas.iter().find(|(n, _)| n == name).map(|(_, a)| *a)
    }

    /// Throat area of a named nozzle [m²].
    pub fn throat(&self, name: &str) -> Option<f64> {
        self.nozzle_throat
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, a)| *a)
    }
}
