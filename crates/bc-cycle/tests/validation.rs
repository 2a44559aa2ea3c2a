//! Build-time validation: configuration errors must fail fast, before any
//! iteration runs.

use bc_core::units::rpm;
use bc_cycle::{Balance, CycleBuilder, CycleError, Param, Probe, Target};
use bc_elements::{
    Ambient, Burner, Compressor, CompressorMode, Duct, Element, FlightConditions, GasSet, Inlet,
    Nozzle, ShaftDef, StaticsMode, Turbine, TurbineMode,
};
use bc_maps::{CompressorMap, TurbineMap};
use bc_thermo::FuelSpec;

fn fc() -> Element {
    Element::FlightConditions(
        FlightConditions::new(Ambient::new(0.0, 0.0).unwrap(), 0.2, 50.0).unwrap(),
    )
}

fn inlet() -> Element {
    Element::Inlet(Inlet::new(0.9995, StaticsMode::Mach(0.5)).unwrap())
}

fn burner() -> Element {
    Element::Burner(Burner::new(FuelSpec::jet_a(), 0.03, 0.017, StaticsMode::Mach(0.1)).unwrap())
}

fn duct() -> Element {
    Element::Duct(Duct::new(0.01, StaticsMode::Mach(0.3)).unwrap())
}

#[test]
fn duplicate_names_rejected() {
    let mut b = CycleBuilder::new(GasSet::constant_cp());
    b.add("fc", fc());
    b.add("fc", inlet());
    let err = b.build().unwrap_err();
    assert!(matches!(err, CycleError::Config { .. }), "{err}");
}

#[test]
fn dangling_connection_rejected() {
    let mut b = CycleBuilder::new(GasSet::constant_cp());
    b.add("fc", fc());
    b.connect("fc", "nowhere");
    let err = b.build().unwrap_err();
    assert!(matches!(err, CycleError::UnknownElement { .. }), "{err}");
}

#[test]
fn unfed_inlet_rejected() {
    let mut b = CycleBuilder::new(GasSet::constant_cp());
    b.add("fc", fc());
    b.add("inlet", inlet());
    // no connect("fc", "inlet")
    let err = b.build().unwrap_err();
    assert!(matches!(err, CycleError::Config { .. }), "{err}");
}

#[test]
fn doubly_fed_inlet_rejected() {
    let mut b = CycleBuilder::new(GasSet::constant_cp());
    b.add("fc", fc());
    b.add("d1", duct());
    b.add("d2", duct());
    b.connect("fc", "d1");
    b.connect("fc", "d2"); // same outlet twice
    let err = b.build().unwrap_err();
    assert!(matches!(err, CycleError::Config { .. }), "{err}");
}

#[test]
fn flow_cycle_rejected() {
    let mut b = CycleBuilder::new(GasSet::constant_cp());
    b.add("d1", duct());
    b.add("d2", duct());
    b.connect("d1", "d2");
    b.connect("d2", "d1");
    let err = b.build().unwrap_err();
    assert!(matches!(err, CycleError::Config { .. }), "{err}");
}

#[test]
fn unmounted_compressor_rejected() {
    let mut b = CycleBuilder::new(GasSet::constant_cp());
    b.add("fc", fc());
    b.add(
        "comp",
        Element::Compressor(Box::new(
            Compressor::new(
                CompressorMode::Design {
                    pr: 10.0,
                    eff: 0.85,
                    mn_exit: 0.3,
                },
                CompressorMap::default_axial(),
            )
            .unwrap(),
        )),
    );
    b.connect("fc", "comp");
    let err = b.build().unwrap_err();
    assert!(matches!(err, CycleError::Config { .. }), "{err}");
}

#[test]
fn design_turbine_without_pr_balance_rejected() {
    let mut b = CycleBuilder::new(GasSet::constant_cp());
    b.add("fc", fc());
    b.add("burner", burner());
    b.add(
        "turb",
        Element::Turbine(Box::new(
            Turbine::new(
                TurbineMode::Design {
                    eff: 0.88,
                    mn_exit: 0.4,
                },
                TurbineMap::default_axial(),
            )
            .unwrap(),
        )),
    );
    b.add_shaft("shaft", ShaftDef::new(0.0).unwrap(), rpm(10_000.0));
    b.connect("fc", "burner");
    b.connect("burner", "turb");
    b.on_shaft("turb", "shaft");
    let err = b.build().unwrap_err();
    assert!(matches!(err, CycleError::Config { .. }), "{err}");
}

#[test]
fn disconnected_balance_unknown_rejected() {
    // The FAR unknown lives at the burner; probing an upstream station means
    // the unknown cannot influence its own residual.
    let mut b = CycleBuilder::new(GasSet::constant_cp());
    b.add("fc", fc());
    b.add("inlet", inlet());
    b.add("burner", burner());
    b.add("nozz", Element::Nozzle(Nozzle::new(0.99).unwrap()));
    b.connect("fc", "inlet");
    b.connect("inlet", "burner");
    b.connect("burner", "nozz");
    b.add_balance(Balance::new(
        "FAR",
        Param::Far("burner".into()),
        0.017,
        Probe::TotalT("inlet".into()),
        Target::Value(400.0),
    ));
    let err = b.build().unwrap_err();
    assert!(matches!(err, CycleError::NoInfluence { .. }), "{err}");
}

#[test]
fn influence_check_accepts_downstream_probe() {
    let mut b = CycleBuilder::new(GasSet::constant_cp());
    b.add("fc", fc());
    b.add("inlet", inlet());
    b.add("burner", burner());
    b.add("nozz", Element::Nozzle(Nozzle::new(0.99).unwrap()));
    b.connect("fc", "inlet");
    b.connect("inlet", "burner");
    b.connect("burner", "nozz");
    b.add_balance(Balance::new(
        "FAR",
        Param::Far("burner".into()),
        0.017,
        Probe::TotalT("burner".into()),
        Target::Value(1300.0),
    ));
    assert!(b.build().is_ok());
}

#[test]
fn off_design_turbine_with_pr_balance_rejected() {
    let scalars = bc_maps::MapScalars {
        s_w: 3.0e-3,
        s_pr: 2.9,
        s_eff: 0.87,
        s_n: 22.0,
    };
    let mut b = CycleBuilder::new(GasSet::constant_cp());
    b.add("fc", fc());
    b.add("burner", burner());
    b.add(
        "turb",
        Element::Turbine(Box::new(
            Turbine::new(
                TurbineMode::OffDesign {
                    scalars,
                    area: 0.2,
                },
                TurbineMap::default_axial(),
            )
            .unwrap(),
        )),
    );
    b.add_shaft("shaft", ShaftDef::new(0.0).unwrap(), rpm(10_000.0));
    b.connect("fc", "burner");
    b.connect("burner", "turb");
    b.on_shaft("turb", "shaft");
    b.add_balance(Balance::new(
        "turb_PR",
        Param::TurbinePr("turb".into()),
        3.0,
        Probe::ShaftNetPower("shaft".into()),
        Target::Value(0.0),
    ));
    let err = b.build().unwrap_err();
    assert!(matches!(err, CycleError::Config { .. }), "{err}");
}
