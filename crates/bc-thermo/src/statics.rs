//! Total ↔ static state relations.
//!
//! Three entry points, matching the three ways a flow station gets its static
//! condition:
//! - [`static_from_mach`]: Mach number known (design sizing; yields area)
//! - [`static_from_area`]: flow area known (off-design; solves subsonic Mach)
//! - [`static_from_ps`]: static pressure known (free stream, nozzle exit)
//!
//! The nested solves are bounded-iteration local Newton loops run in dual
//! arithmetic, so the implicit derivatives converge along with the values.

use crate::error::ThermoResult;
use crate::model::{GasModel, TotalState};
use num_dual::DualNum;
use tracing::warn;

/// Static (local-flow) condition derived from a total state.
#[derive(Debug, Clone, Copy)]
pub struct StaticState<D> {
    /// Static temperature [K]
    pub t: D,
    /// Static pressure [Pa]
    pub p: D,
    /// Density [kg/m³]
    pub rho: D,
    /// Mach number
    pub mn: D,
    /// Velocity [m/s]
    pub v: D,
    /// Speed of sound [m/s]
    pub vsonic: D,
    /// Flow area [m²]
    pub area: D,
}

const MAX_LOCAL_ITER: usize = 40;
const LOCAL_TOL: f64 = 1e-11;

/// Static temperature satisfying the energy equation at a given Mach number:
/// `h(Ts) + MN²·γ(Ts)·R·Ts/2 = ht`.
///
/// Newton with an analytic slope approximation (`cp + MN²γR/2`); the small
/// neglected dγ/dT term only affects the convergence rate, not the converged
/// value or its derivatives.
fn solve_static_t<D: DualNum<f64> + Copy>(gas: &GasModel, tot: &TotalState<D>, mn: D) -> D {
    let r = gas.r();
    let mut ts = tot.t / ((mn * mn) * ((tot.gamma - 1.0) * 0.5) + 1.0);
    for _ in 0..MAX_LOCAL_ITER {
        let gamma = gas.gamma(ts);
        let resid = gas.h(ts) + (mn * mn) * gamma * ts * (0.5 * r) - tot.h;
        let slope = gas.cp(ts) + (mn * mn) * gamma * (0.5 * r);
        ts = ts - resid / slope;
        if resid.re().abs() < LOCAL_TOL * tot.h.re().abs().max(1.0e4) {
            break;
        }
    }
    ts
}

/// Static state from total state, mass flow, and Mach number.
///
/// The static entropy equals the total entropy (isentropic deceleration), so
/// the static pressure follows from the entropy inverse. The flow area comes
/// from continuity: `A = W / (ρ V)`.
pub fn static_from_mach<D: DualNum<f64> + Copy>(
    gas: &GasModel,
    tot: &TotalState<D>,
    w: D,
    mn: D,
) -> ThermoResult<StaticState<D>> {
    let ts = solve_static_t(gas, tot, mn);
    let p = gas.p_from_ts(ts, tot.s);
    let gamma = gas.gamma(ts);
    let vsonic = (gamma * ts * gas.r()).sqrt();
    let v = mn * vsonic;
    let rho = gas.rho(p, ts);
    let area = w / (rho * v);
    Ok(StaticState {
        t: ts,
        p,
        rho,
        mn,
        v,
        vsonic,
        area,
    })
}

/// Static state from total state, mass flow, and flow area.
///
/// Solves the subsonic branch of the continuity equation
/// `ρ(MN)·V(MN)·A = W` for the Mach number with a bounded Newton loop; the
/// slope uses the perfect-gas corrected-flow derivative, which is accurate
/// enough for both property paths. If no subsonic solution exists (the area
/// is choked for the requested flow), the iterate rides the MN → 1 bound and
/// a diagnostic is emitted; the outer iteration is left to self-correct.
pub fn static_from_area<D: DualNum<f64> + Copy>(
    gas: &GasModel,
    tot: &TotalState<D>,
    w: D,
    area: D,
) -> ThermoResult<StaticState<D>> {
    let mut mn = D::from(0.5);
    let mut converged = false;
    for _ in 0..MAX_LOCAL_ITER {
        let st = static_from_mach(gas, tot, w, mn)?;
        // continuity residual in flow units
        let w_calc = st.rho * st.v * area;
        let resid = w_calc - w;
        if resid.re().abs() < LOCAL_TOL.sqrt() * w.re().abs().max(1e-3) {
            converged = true;
            break;
        }
        // d(W)/d(MN) from the perfect-gas mass-flow function
        let gamma = gas.gamma(st.t);
        let base = (mn * mn) * ((gamma - 1.0) * 0.5) + 1.0;
        let dlnw_dmn = D::from(1.0) / mn - mn * (gamma + 1.0) * 0.5 / base;
        let slope = w_calc * dlnw_dmn;
        mn = mn - resid / slope;
        // keep the iterate on the subsonic branch
        if mn.re() <= 1e-6 {
            mn = D::from(1e-6);
        } else if mn.re() >= 0.999_999 {
            mn = D::from(0.999_999);
        }
    }
    if !converged {
        warn!(
            mn = mn.re(),
            "area-to-Mach inversion did not converge; continuing with bounded iterate"
        );
    }
    static_from_mach(gas, tot, w, mn)
}

/// Static state from total state, mass flow, and static pressure.
///
/// The static temperature follows the total entropy down to `Ps`; the Mach
/// number comes from the enthalpy difference. When the total enthalpy is
/// (numerically) below the static enthalpy the radicand goes negative; the
/// sign-flipped, physically-invalid-but-continuable form is substituted with
/// a diagnostic so a transient Newton excursion cannot crash the solve.
pub fn static_from_ps<D: DualNum<f64> + Copy>(
    gas: &GasModel,
    tot: &TotalState<D>,
    w: D,
    ps: D,
) -> ThermoResult<StaticState<D>> {
    let ts = gas.t_from_s(tot.s, ps)?;
    let gamma = gas.gamma(ts);
    let vsonic = (gamma * ts * gas.r()).sqrt();
    let dh = tot.h - gas.h(ts);
    let mn = if dh.re() >= 0.0 {
        (dh * 2.0).sqrt() / vsonic
    } else {
        warn!(
            tt = tot.t.re(),
            ts = ts.re(),
            "total enthalpy below static enthalpy; Mach number is unphysical (sign-flip continuation)"
        );
        (dh * (-2.0)).sqrt() / vsonic
    };
    let v = mn * vsonic;
    let rho = gas.rho(ps, ts);
    let area = w / (rho * v);
    Ok(StaticState {
        t: ts,
        p: ps,
        rho,
        mn,
        v,
        vsonic,
        area,
    })
}
