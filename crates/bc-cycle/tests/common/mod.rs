#![allow(dead_code)] // each test binary uses a different subset

//! Shared single-spool turbojet builders for the integration tests.
//!
//! Sea-level-static design point: thrust target 52.49 kN (11800 lbf),
//! turbine inlet temperature 1316.67 K (2370 °R), compressor PR 13.5 at
//! 0.83 efficiency, turbine efficiency 0.86, burner loss 3%, nozzle Cv 0.99,
//! 8070 rpm.

use bc_core::units::rpm;
use bc_cycle::{Balance, CycleBuilder, CycleModel, CycleSolution, Param, Probe, Target};
use bc_elements::{
    Ambient, Burner, Compressor, CompressorMode, Element, FlightConditions, GasSet, Inlet, Nozzle,
    ShaftDef, StaticsMode, Turbine, TurbineMode,
};
use bc_maps::{CompressorMap, TurbineMap};
use bc_thermo::FuelSpec;

pub const FN_TARGET: f64 = 52_489.0; // N, 11800 lbf
pub const T4_TARGET: f64 = 1316.67; // K, 2370 °R
pub const NMECH_RPM: f64 = 8070.0;

/// Design-mode turbojet on the given gas path with a net-thrust target.
pub fn turbojet_design_with(gases: GasSet, fn_target: f64) -> CycleModel {
    let mut b = CycleBuilder::new(gases);
    b.add(
        "fc",
        Element::FlightConditions(
            FlightConditions::new(Ambient::new(0.0, 0.0).unwrap(), 1e-6, 75.0).unwrap(),
        ),
    );
    b.add(
        "inlet",
        Element::Inlet(Inlet::new(1.0, StaticsMode::Mach(0.60)).unwrap()),
    );
    b.add(
        "comp",
        Element::Compressor(Box::new(
            Compressor::new(
                CompressorMode::Design {
                    pr: 13.5,
                    eff: 0.83,
                    mn_exit: 0.02,
                },
                CompressorMap::default_axial(),
            )
            .unwrap(),
        )),
    );
    b.add(
        "burner",
        Element::Burner(
            Burner::new(FuelSpec::jet_a(), 0.03, 0.017, StaticsMode::Mach(0.02)).unwrap(),
        ),
    );
    b.add(
        "turb",
        Element::Turbine(Box::new(
            Turbine::new(
                TurbineMode::Design {
                    eff: 0.86,
                    mn_exit: 0.4,
                },
                TurbineMap::default_axial(),
            )
            .unwrap(),
        )),
    );
    b.add("nozz", Element::Nozzle(Nozzle::new(0.99).unwrap()));
    b.add_shaft("shaft", ShaftDef::new(0.0).unwrap(), rpm(NMECH_RPM));

    b.connect("fc", "inlet")
        .connect("inlet", "comp")
        .connect("comp", "burner")
        .connect("burner", "turb")
        .connect("turb", "nozz");
    b.on_shaft("comp", "shaft").on_shaft("turb", "shaft");

    b.add_balance(
        Balance::new(
            "W",
            Param::MassFlow,
            75.0,
            Probe::NetThrust,
            Target::Value(fn_target),
        )
        .with_bounds(10.0, 300.0),
    );
    b.add_balance(
        Balance::new(
            "FAR",
            Param::Far("burner".into()),
            0.0175,
            Probe::TotalT("burner".into()),
            Target::Value(T4_TARGET),
        )
        .with_bounds(1e-4, 0.05),
    );
    b.add_balance(
        Balance::new(
            "turb_PR",
            Param::TurbinePr("turb".into()),
            4.0,
            Probe::ShaftNetPower("shaft".into()),
            Target::Value(0.0),
        )
        .with_bounds(1.1, 8.0),
    );

    b.build().unwrap()
}

/// Design-mode turbojet on the constant-Cp gas path.
pub fn turbojet_design() -> CycleModel {
    turbojet_design_with(GasSet::constant_cp(), FN_TARGET)
}

/// Fixed-geometry (off-design) turbojet from a converged design solution.
///
/// The calibration pack supplies map scalars and frozen areas; the free
/// unknowns re-partition (shaft speed and map coordinates open up, geometry
/// closes down), which is the structural difference between the two modes.
pub fn turbojet_offdesign(design: &CycleSolution, fn_target: f64) -> CycleModel {
    let cal = &design.calibration;
    let mut b = CycleBuilder::new(GasSet::constant_cp());
    b.add(
        "fc",
        Element::FlightConditions(
            FlightConditions::new(Ambient::new(0.0, 0.0).unwrap(), 1e-6, 75.0).unwrap(),
        ),
    );
    b.add(
        "inlet",
        Element::Inlet(Inlet::new(1.0, StaticsMode::Area(cal.area("inlet").unwrap())).unwrap()),
    );
    b.add(
        "comp",
        Element::Compressor(Box::new(
            Compressor::new(
                CompressorMode::OffDesign {
                    scalars: cal.comp("comp").unwrap(),
                    area: cal.area("comp").unwrap(),
                },
                CompressorMap::default_axial(),
            )
            .unwrap(),
        )),
    );
    b.add(
        "burner",
        Element::Burner(
            Burner::new(
                FuelSpec::jet_a(),
                0.03,
                0.017,
                StaticsMode::Area(cal.area("burner").unwrap()),
            )
            .unwrap(),
        ),
    );
    b.add(
        "turb",
        Element::Turbine(Box::new(
            Turbine::new(
                TurbineMode::OffDesign {
                    scalars: cal.turb("turb").unwrap(),
                    area: cal.area("turb").unwrap(),
                },
                TurbineMap::default_axial(),
            )
            .unwrap(),
        )),
    );
    b.add("nozz", Element::Nozzle(Nozzle::new(0.99).unwrap()));
    b.add_shaft("shaft", ShaftDef::new(0.0).unwrap(), rpm(NMECH_RPM));

    b.connect("fc", "inlet")
        .connect("inlet", "comp")
        .connect("comp", "burner")
        .connect("burner", "turb")
        .connect("turb", "nozz");
    b.on_shaft("comp", "shaft").on_shaft("turb", "shaft");

    // fixed geometry: the nozzle throat must swallow the flow
    b.add_balance(
        Balance::new(
            "W",
            Param::MassFlow,
            design.unknown("W").unwrap(),
            Probe::NozzleThroatArea("nozz".into()),
            Target::Value(cal.throat("nozz").unwrap()),
        )
        .with_bounds(10.0, 300.0),
    );
    b.add_balance(
        Balance::new(
            "FAR",
            Param::Far("burner".into()),
            design.unknown("FAR").unwrap(),
            Probe::NetThrust,
            Target::Value(fn_target),
        )
        .with_bounds(1e-4, 0.05),
    );
    b.add_balance(
        Balance::new(
            "Nmech",
            Param::ShaftSpeed("shaft".into()),
            rpm(NMECH_RPM).value,
            Probe::ShaftNetPower("shaft".into()),
            Target::Value(0.0),
        )
        .with_bounds(rpm(0.3 * NMECH_RPM).value, rpm(1.3 * NMECH_RPM).value),
    );

    b.build().unwrap()
}
