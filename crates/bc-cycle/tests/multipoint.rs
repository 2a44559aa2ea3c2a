//! Multi-point solving: independent points in parallel, coupled points in
//! one joint Newton space.

mod common;

use approx::assert_relative_eq;
use bc_cycle::{CrossLink, MultiPoint, Probe, SolveOptions};
use common::{FN_TARGET, turbojet_design, turbojet_design_with};
use bc_elements::GasSet;

#[test]
fn independent_points_solve_in_parallel() {
    let mut mp = MultiPoint::new();
    mp.add_point("full", turbojet_design_with(GasSet::constant_cp(), FN_TARGET));
    mp.add_point(
        "derate",
        turbojet_design_with(GasSet::constant_cp(), 0.9 * FN_TARGET),
    );

    let sols = mp.solve_independent(&SolveOptions::default()).unwrap();
    assert_eq!(sols.len(), 2);
    let full = &sols[0].1;
    let derate = &sols[1].1;
    assert!(full.converged() && derate.converged());
    assert_relative_eq!(full.perf.fn_net, FN_TARGET, max_relative = 1e-6);
    assert_relative_eq!(derate.perf.fn_net, 0.9 * FN_TARGET, max_relative = 1e-6);
    // less thrust needs less flow
    assert!(derate.unknown("W").unwrap() < full.unknown("W").unwrap());

    // parallel solutions match solving each point alone
    let alone = turbojet_design().solve(&SolveOptions::default()).unwrap();
    assert_relative_eq!(
        full.unknown("W").unwrap(),
        alone.unknown("W").unwrap(),
        max_relative = 1e-10
    );
}

#[test]
fn cross_linked_points_share_one_newton_space() {
    // point B's thrust balance stops targeting its own value and instead
    // matches point A's gross thrust; the two points must then agree
    let mut mp = MultiPoint::new();
    mp.add_point("A", turbojet_design_with(GasSet::constant_cp(), FN_TARGET));
    mp.add_point(
        "B",
        turbojet_design_with(GasSet::constant_cp(), 0.8 * FN_TARGET),
    );

    let cross = [CrossLink {
        point: "B".into(),
        balance: "W".into(),
        rhs_point: "A".into(),
        rhs_probe: Probe::GrossThrust,
    }];
    let sols = mp.solve_joint(&cross, &SolveOptions::default()).unwrap();
    let a = &sols[0].1;
    let b = &sols[1].1;
    assert!(a.converged() && b.converged());

    // A keeps its own target; B now matches A (its 0.8x target is overridden)
    assert_relative_eq!(a.perf.fn_net, FN_TARGET, max_relative = 1e-6);
    assert_relative_eq!(b.perf.fn_net, a.perf.fg, max_relative = 1e-6);
    assert_relative_eq!(
        b.unknown("W").unwrap(),
        a.unknown("W").unwrap(),
        max_relative = 1e-4
    );
}

#[test]
fn unknown_point_in_cross_link_is_rejected() {
    let mut mp = MultiPoint::new();
    mp.add_point("A", turbojet_design());
    let cross = [CrossLink {
        point: "missing".into(),
        balance: "W".into(),
        rhs_point: "A".into(),
        rhs_probe: Probe::GrossThrust,
    }];
    assert!(mp.solve_joint(&cross, &SolveOptions::default()).is_err());
}
