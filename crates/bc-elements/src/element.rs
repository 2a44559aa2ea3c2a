//! The element sum type used by cycle assembly.

use crate::ambient::FlightConditions;
use crate::bleed::Bleed;
use crate::burner::Burner;
use crate::compressor::Compressor;
use crate::duct::Duct;
use crate::inlet::Inlet;
use crate::motor::Motor;
use crate::nozzle::Nozzle;
use crate::shaft::ShaftDef;
use crate::splitter::Splitter;
use crate::turbine::Turbine;

/// A typed element in a cycle graph.
///
/// Tagged variants (not trait objects): element computations are generic over
/// the dual scalar, and the cycle evaluator dispatches on the variant to wire
/// stations, shaft couplings and implicit unknowns correctly. Map-carrying
/// variants are boxed to keep the enum small.
#[derive(Debug, Clone)]
pub enum Element {
    FlightConditions(FlightConditions),
    Inlet(Inlet),
    Compressor(Box<Compressor>),
    Burner(Burner),
    Turbine(Box<Turbine>),
    Duct(Duct),
    Nozzle(Nozzle),
    Splitter(Splitter),
    Bleed(Bleed),
    Shaft(ShaftDef),
    Motor(Box<Motor>),
}

impl Element {
    /// Short kind name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Element::FlightConditions(_) => "flight-conditions",
            Element::Inlet(_) => "inlet",
            Element::Compressor(_) => "compressor",
            Element::Burner(_) => "burner",
            Element::Turbine(_) => "turbine",
            Element::Duct(_) => "duct",
            Element::Nozzle(_) => "nozzle",
            Element::Splitter(_) => "splitter",
            Element::Bleed(_) => "bleed",
            Element::Shaft(_) => "shaft",
            Element::Motor(_) => "motor",
        }
    }

    /// Whether the element consumes an upstream flow station.
    pub fn has_flow_inlet(&self) -> bool {
        !matches!(
            self,
            Element::FlightConditions(_) | Element::Shaft(_) | Element::Motor(_)
        )
    }

    /// Number of flow outlets the element produces.
    pub fn n_flow_outlets(&self) -> usize {
        match self {
            Element::Splitter(_) => 2,
            Element::Shaft(_) | Element::Motor(_) => 0,
            // the nozzle's throat station is a reported output, not a link source
            Element::Nozzle(_) => 0,
            _ => 1,
        }
    }

    /// Whether the element couples to a shaft.
    pub fn is_rotating(&self) -> bool {
        matches!(
            self,
            Element::Compressor(_) | Element::Turbine(_) | Element::Motor(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::station::StaticsMode;

    #[test]
    fn port_counts_by_kind() {
        let duct = Element::Duct(Duct::new(0.02, StaticsMode::Mach(0.3)).unwrap());
        assert!(duct.has_flow_inlet());
        assert_eq!(duct.n_flow_outlets(), 1);
        assert!(!duct.is_rotating());

        let shaft = Element::Shaft(ShaftDef::new(0.0).unwrap());
        assert!(!shaft.has_flow_inlet());
        assert_eq!(shaft.n_flow_outlets(), 0);

        let split = Element::Splitter(
            Splitter::new(5.0, StaticsMode::Mach(0.3), StaticsMode::Mach(0.45)).unwrap(),
        );
        assert_eq!(split.n_flow_outlets(), 2);
    }
}
