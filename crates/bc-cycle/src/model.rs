//! The assembled cycle model: evaluation and solving.

use crate::balance::{Balance, Probe, Target};
use crate::calibration::Calibration;
use crate::error::{CycleError, CycleResult};
use crate::outputs::{CycleSolution, MotorRecord, PerfRecord, ShaftRecord, StationRecord};
use bc_elements::{CoolingFlow, Element, FlowState, GasSet, MotorOut, PerfSummary, Performance, ShaftOut};
use bc_maps::MapScalars;
use bc_solver::{
    Bounds, NewtonConfig, SolveStatus, forward_jacobian, newton_solve,
};
use nalgebra::DVector;
use num_dual::{Dual64, DualNum};
use std::collections::HashMap;
use tracing::debug;

/// A named element inside a model.
#[derive(Debug, Clone)]
pub(crate) struct NamedElement {
    pub name: String,
    pub elem: Element,
}

/// One entry of the flat unknown vector.
#[derive(Debug, Clone)]
pub(crate) struct UnknownDef {
    pub name: String,
    pub init: f64,
    pub lower: f64,
    pub upper: f64,
    /// Scaling reference: the solver iterates on x/x_ref ≈ O(1)
    pub x_ref: f64,
}

/// Element-intrinsic implicit unknowns (off-design flow matching).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IntrinsicKind {
    /// Off-design compressor map coordinate β
    CompBeta,
    /// Off-design turbine pressure ratio
    TurbPr,
}

/// Fully-validated cycle model, ready to evaluate and solve.
///
/// Construction goes through [`crate::CycleBuilder`]; all graph topology is
/// frozen here (the `order` field is a topological ordering over elements
/// including flow, cooling, and shaft dependencies).
#[derive(Debug, Clone)]
pub struct CycleModel {
    pub(crate) gases: GasSet,
    pub(crate) elems: Vec<NamedElement>,
    pub(crate) order: Vec<usize>,
    /// Per element: which (element, outlet-port) feeds its flow inlet
    pub(crate) inflow: Vec<Option<(usize, u8)>>,
    /// Per turbine: cooling supplies as (bleed element, port index)
    pub(crate) cooling: Vec<Vec<(usize, usize)>>,
    /// Per rotating element: the shaft element it is mounted on
    pub(crate) shaft_of: Vec<Option<usize>>,
    /// Per shaft element: base mechanical speed [rad/s]
    pub(crate) shaft_speed: Vec<f64>,
    /// The flight-conditions element (supplies ambient statics to nozzles)
    pub(crate) fc_idx: Option<usize>,
    pub(crate) balances: Vec<Balance>,
    pub(crate) unknowns: Vec<UnknownDef>,
    pub(crate) intrinsics: Vec<(usize, IntrinsicKind)>,
    // unknown routing tables (element index -> unknown index)
    pub(crate) w_unknown: Option<usize>,
    pub(crate) far_unknown: HashMap<usize, usize>,
    pub(crate) pr_unknown: HashMap<usize, usize>,
    pub(crate) speed_unknown: HashMap<usize, usize>,
    pub(crate) bpr_unknown: HashMap<usize, usize>,
    pub(crate) beta_unknown: HashMap<usize, usize>,
    pub(crate) prx_unknown: HashMap<usize, usize>,
}

/// All element outputs for one evaluation pass.
#[derive(Debug, Clone)]
pub(crate) struct Evaluated<D> {
    pub station: Vec<Option<FlowState<D>>>,
    /// Splitter secondary (bypass) outlet
    pub station2: Vec<Option<FlowState<D>>>,
    pub f_ram: Vec<Option<D>>,
    /// Signed shaft power per rotating element [W]
    pub pwr: Vec<Option<D>>,
    pub wfuel: Vec<Option<D>>,
    pub nozzle_fg: Vec<Option<D>>,
    pub nozzle_area: Vec<Option<D>>,
    pub nozzle_pr: Vec<Option<D>>,
    pub shaft_out: Vec<Option<ShaftOut<D>>>,
    pub motor_out: Vec<Option<MotorOut<D>>>,
    pub comp_scalars: Vec<Option<MapScalars>>,
    pub turb_scalars: Vec<Option<MapScalars>>,
    pub comp_resid: Vec<Option<D>>,
    pub turb_resid: Vec<Option<D>>,
    pub bleed_flows: Vec<Option<Vec<CoolingFlow<D>>>>,
    pub perf: PerfSummary<D>,
}

/// Solve configuration: the Newton settings plus the non-convergence policy.
#[derive(Debug, Clone)]
pub struct SolveOptions {
    pub newton: NewtonConfig,
    /// If true, a non-converged solve is an error; otherwise the best-effort
    /// state is returned with its status.
    pub err_on_non_converge: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            newton: NewtonConfig::default(),
            err_on_non_converge: true,
        }
    }
}

impl CycleModel {
    pub fn n_unknowns(&self) -> usize {
        self.unknowns.len()
    }

    pub(crate) fn idx_of(&self, name: &str) -> Option<usize> {
        self.elems.iter().position(|e| e.name == name)
    }

    fn wrap_elem<T>(&self, i: usize, r: bc_elements::ElemResult<T>) -> CycleResult<T> {
        r.map_err(|source| CycleError::Element {
            name: self.elems[i].name.clone(),
            source,
        })
    }

    fn unknown_value<D: DualNum<f64> + Copy>(&self, x: &[D], u: usize) -> D {
        x[u] * self.unknowns[u].x_ref
    }

    fn param<D: DualNum<f64> + Copy>(&self, x: &[D], u: Option<&usize>, base: f64) -> D {
        match u {
            Some(&u) => self.unknown_value(x, u),
            None => D::from(base),
        }
    }

    fn speed_of<D: DualNum<f64> + Copy>(&self, x: &[D], i: usize) -> CycleResult<D> {
        let s = self.shaft_of[i].ok_or_else(|| CycleError::Config {
            what: format!("element '{}' is not mounted on a shaft", self.elems[i].name),
        })?;
        Ok(self.param(x, self.speed_unknown.get(&s), self.shaft_speed[s]))
    }

    fn in_station<D: DualNum<f64> + Copy>(
        &self,
        ev: &Evaluated<D>,
        i: usize,
    ) -> CycleResult<FlowState<D>> {
        let (src, port) = self.inflow[i].ok_or_else(|| CycleError::Config {
            what: format!("element '{}' has no flow feed", self.elems[i].name),
        })?;
        let st = match port {
            0 => ev.station[src],
            _ => ev.station2[src],
        };
        st.ok_or_else(|| CycleError::Config {
            what: format!(
                "station of '{}' not computed before '{}'",
                self.elems[src].name, self.elems[i].name
            ),
        })
    }

    /// Forward evaluation of the full graph at the scaled unknown vector.
    pub(crate) fn eval<D: DualNum<f64> + Copy>(&self, x: &[D]) -> CycleResult<Evaluated<D>> {
        let n = self.elems.len();
        let mut ev = Evaluated {
            station: vec![None; n],
            station2: vec![None; n],
            f_ram: vec![None; n],
            pwr: vec![None; n],
            wfuel: vec![None; n],
            nozzle_fg: vec![None; n],
            nozzle_area: vec![None; n],
            nozzle_pr: vec![None; n],
            shaft_out: vec![None; n],
            motor_out: vec![None; n],
            comp_scalars: vec![None; n],
            turb_scalars: vec![None; n],
            comp_resid: vec![None; n],
            turb_resid: vec![None; n],
            bleed_flows: vec![None; n],
            perf: Performance.summarize(
                D::from(0.0),
                D::from(0.0),
                D::from(0.0),
                D::from(1.0),
                D::from(1.0),
                D::from(1.0),
            ),
        };

        for &i in &self.order {
            match &self.elems[i].elem {
                Element::FlightConditions(fc) => {
                    let w = self.param(x, self.w_unknown.as_ref(), fc.w);
                    let fs = self.wrap_elem(i, fc.compute(&self.gases, w))?;
                    ev.station[i] = Some(fs);
                }
                Element::Inlet(inl) => {
                    let fin = self.in_station(&ev, i)?;
                    let out = self.wrap_elem(i, inl.compute(&self.gases, &fin))?;
                    ev.station[i] = Some(out.fs_out);
                    ev.f_ram[i] = Some(out.f_ram);
                }
                Element::Compressor(c) => {
                    let fin = self.in_station(&ev, i)?;
                    let nmech = self.speed_of(x, i)?;
                    let beta = self.beta_unknown.get(&i).map(|&u| self.unknown_value(x, u));
                    let out = self.wrap_elem(i, c.compute(&self.gases, &fin, nmech, beta))?;
                    ev.station[i] = Some(out.fs_out);
                    ev.pwr[i] = Some(out.pwr);
                    ev.comp_scalars[i] = out.scalars;
                    ev.comp_resid[i] = out.wc_resid;
                }
                Element::Burner(b) => {
                    let fin = self.in_station(&ev, i)?;
                    let far = self.param(x, self.far_unknown.get(&i), b.far);
                    let out = self.wrap_elem(i, b.compute(&self.gases, &fin, far))?;
                    ev.station[i] = Some(out.fs_out);
                    ev.wfuel[i] = Some(out.w_fuel);
                }
                Element::Turbine(t) => {
                    let fin = self.in_station(&ev, i)?;
                    let nmech = self.speed_of(x, i)?;
                    let pr = if let Some(&u) = self.pr_unknown.get(&i) {
                        self.unknown_value(x, u)
                    } else if let Some(&u) = self.prx_unknown.get(&i) {
                        self.unknown_value(x, u)
                    } else {
                        return Err(CycleError::Config {
                            what: format!(
                                "turbine '{}' has no pressure-ratio source",
                                self.elems[i].name
                            ),
                        });
                    };
                    let mut cool = Vec::with_capacity(self.cooling[i].len());
                    for &(bld, port) in &self.cooling[i] {
                        let flows = ev.bleed_flows[bld].as_ref().ok_or_else(|| {
                            CycleError::Config {
                                what: format!(
                                    "bleed '{}' not computed before turbine '{}'",
                                    self.elems[bld].name, self.elems[i].name
                                ),
                            }
                        })?;
                        cool.push(flows[port]);
                    }
                    let out = self.wrap_elem(i, t.compute(&self.gases, &fin, nmech, pr, &cool))?;
                    ev.station[i] = Some(out.fs_out);
                    ev.pwr[i] = Some(out.pwr);
                    ev.turb_scalars[i] = out.scalars;
                    ev.turb_resid[i] = out.wp_resid;
                }
                Element::Duct(d) => {
                    let fin = self.in_station(&ev, i)?;
                    let fs = self.wrap_elem(i, d.compute(&self.gases, &fin))?;
                    ev.station[i] = Some(fs);
                }
                Element::Nozzle(nz) => {
                    let fin = self.in_station(&ev, i)?;
                    let fc = self.fc_idx.ok_or_else(|| CycleError::Config {
                        what: "nozzle requires a flight-conditions element".to_string(),
                    })?;
                    let ps = ev.station[fc]
                        .as_ref()
                        .ok_or_else(|| CycleError::Config {
                            what: "free stream not computed before nozzle".to_string(),
                        })?
                        .stat
                        .p;
                    let out = self.wrap_elem(i, nz.compute(&self.gases, &fin, ps))?;
                    ev.station[i] = Some(out.fs_throat);
                    ev.nozzle_fg[i] = Some(out.fg);
                    ev.nozzle_area[i] = Some(out.throat_area);
                    ev.nozzle_pr[i] = Some(out.pr);
                }
                Element::Splitter(sp) => {
                    let fin = self.in_station(&ev, i)?;
                    let bpr = self.param(x, self.bpr_unknown.get(&i), sp.bpr);
                    let (core, byp) = self.wrap_elem(i, sp.compute(&self.gases, &fin, bpr))?;
                    ev.station[i] = Some(core);
                    ev.station2[i] = Some(byp);
                }
                Element::Bleed(bl) => {
                    let fin = self.in_station(&ev, i)?;
                    let out = self.wrap_elem(i, bl.compute(&self.gases, &fin))?;
                    ev.station[i] = Some(out.fs_out);
                    ev.bleed_flows[i] = Some(out.flows);
                }
                Element::Shaft(sh) => {
                    let nmech = self.param(x, self.speed_unknown.get(&i), self.shaft_speed[i]);
                    let mut loads = Vec::new();
                    let mut motor_idx = None;
                    for (j, s) in self.shaft_of.iter().enumerate() {
                        if *s != Some(i) {
                            continue;
                        }
                        match &self.elems[j].elem {
                            Element::Motor(_) => motor_idx = Some(j),
                            _ => {
                                if let Some(p) = ev.pwr[j] {
                                    loads.push(p);
                                }
                            }
                        }
                    }
                    // an attached motor makes up the shaft deficit at its
                    // map efficiency; turbine-driven shafts have none
                    if let Some(mj) = motor_idx {
                        let mut demand = D::from(0.0);
                        for &p in &loads {
                            demand = demand - p;
                        }
                        demand = demand + sh.hpx;
                        if demand.re() > 0.0 {
                            if let Element::Motor(m) = &self.elems[mj].elem {
                                let mo = self.wrap_elem(mj, m.compute(demand, nmech))?;
                                loads.push(demand);
                                ev.pwr[mj] = Some(demand);
                                ev.motor_out[mj] = Some(mo);
                            }
                        }
                    }
                    ev.shaft_out[i] = Some(sh.balance(&loads, nmech));
                }
                Element::Motor(_) => {
                    // computed as part of its shaft's balance
                }
            }
        }

        // engine-level roll-up
        let mut fg = D::from(0.0);
        let mut f_ram = D::from(0.0);
        let mut wfuel = D::from(0.0);
        let mut power = D::from(0.0);
        let mut pt2 = D::from(1.0);
        let mut pt3 = D::from(1.0);
        for i in 0..n {
            if let Some(v) = ev.nozzle_fg[i] {
                fg = fg + v;
            }
            if let Some(v) = ev.f_ram[i] {
                f_ram = f_ram + v;
            }
            if let Some(v) = ev.wfuel[i] {
                wfuel = wfuel + v;
            }
            if let Some(p) = ev.pwr[i] {
                if p.re() > 0.0 {
                    power = power + p;
                }
            }
            if matches!(self.elems[i].elem, Element::Inlet(_)) {
                if let Some(fs) = &ev.station[i] {
                    pt2 = fs.tot.p;
                }
            }
            if matches!(self.elems[i].elem, Element::Burner(_)) {
                if let Some((src, port)) = self.inflow[i] {
                    let fs = match port {
                        0 => &ev.station[src],
                        _ => &ev.station2[src],
                    };
                    if let Some(fs) = fs {
                        pt3 = fs.tot.p;
                    }
                }
            }
        }
        ev.perf = Performance.summarize(fg, f_ram, wfuel, pt2, pt3, power);

        Ok(ev)
    }

    /// Probe a scalar quantity out of an evaluation.
    pub(crate) fn probe<D: DualNum<f64> + Copy>(
        &self,
        ev: &Evaluated<D>,
        p: &Probe,
    ) -> CycleResult<D> {
        let by_name = |name: &String, context: &'static str| -> CycleResult<usize> {
            self.idx_of(name).ok_or_else(|| CycleError::UnknownElement {
                name: name.clone(),
                context,
            })
        };
        let station = |i: usize| -> CycleResult<&FlowState<D>> {
            ev.station[i].as_ref().ok_or_else(|| CycleError::Config {
                what: format!("no station at '{}'", self.elems[i].name),
            })
        };
        match p {
            Probe::NetThrust => Ok(ev.perf.fn_net),
            Probe::GrossThrust => Ok(ev.perf.fg),
            Probe::TotalT(name) => Ok(station(by_name(name, "TotalT probe")?)?.tot.t),
            Probe::TotalP(name) => Ok(station(by_name(name, "TotalP probe")?)?.tot.p),
            Probe::MassFlowAt(name) => Ok(station(by_name(name, "MassFlowAt probe")?)?.w),
            Probe::ShaftNetPower(name) => {
                let i = by_name(name, "ShaftNetPower probe")?;
                ev.shaft_out[i]
                    .as_ref()
                    .map(|s| s.pwr_net)
                    .ok_or_else(|| CycleError::UnknownElement {
                        name: name.clone(),
                        context: "not a shaft",
                    })
            }
            Probe::NozzleThroatArea(name) => {
                let i = by_name(name, "NozzleThroatArea probe")?;
                ev.nozzle_area[i].ok_or_else(|| CycleError::UnknownElement {
                    name: name.clone(),
                    context: "not a nozzle",
                })
            }
            Probe::NozzlePr(name) => {
                let i = by_name(name, "NozzlePr probe")?;
                ev.nozzle_pr[i].ok_or_else(|| CycleError::UnknownElement {
                    name: name.clone(),
                    context: "not a nozzle",
                })
            }
        }
    }

    /// Residual vector: user balances (with optional rhs overrides, used by
    /// multi-point cross links) followed by element-intrinsic residuals.
    pub(crate) fn residuals<D: DualNum<f64> + Copy>(
        &self,
        ev: &Evaluated<D>,
        rhs_override: &[Option<D>],
    ) -> CycleResult<Vec<D>> {
        let mut r = Vec::with_capacity(self.unknowns.len());
        for (bi, b) in self.balances.iter().enumerate() {
            let lhs = self.probe(ev, &b.lhs)?;
            let rhs = match rhs_override.get(bi).copied().flatten() {
                Some(v) => v,
                None => match &b.rhs {
                    Target::Value(v) => D::from(*v),
                    Target::Probe(p) => self.probe(ev, p)?,
                },
            };
            r.push((lhs - rhs) / b.residual_ref());
        }
        for &(i, kind) in &self.intrinsics {
            let resid = match kind {
                IntrinsicKind::CompBeta => ev.comp_resid[i],
                IntrinsicKind::TurbPr => ev.turb_resid[i],
            };
            r.push(resid.ok_or_else(|| CycleError::Config {
                what: format!(
                    "missing intrinsic residual from '{}'",
                    self.elems[i].name
                ),
            })?);
        }
        Ok(r)
    }

    pub(crate) fn scaled_bounds(&self) -> Bounds {
        Bounds {
            lower: self
                .unknowns
                .iter()
                .map(|u| u.lower / u.x_ref)
                .collect(),
            upper: self
                .unknowns
                .iter()
                .map(|u| u.upper / u.x_ref)
                .collect(),
        }
    }

    fn initial_vector(&self, warm: Option<&CycleSolution>) -> DVector<f64> {
        DVector::from_iterator(
            self.unknowns.len(),
            self.unknowns.iter().enumerate().map(|(i, u)| {
                let phys = warm
                    .and_then(|s| s.unknowns.get(i))
                    .map(|(_, v)| *v)
                    .unwrap_or(u.init);
                phys / u.x_ref
            }),
        )
    }

    /// Evaluate the residual vector at physical unknown values (diagnostics).
    pub fn residuals_at(&self, unknowns: &[f64]) -> CycleResult<Vec<f64>> {
        let x = self.to_scaled(unknowns)?;
        let ev = self.eval::<f64>(&x)?;
        let no_override = vec![None; self.balances.len()];
        self.residuals(&ev, &no_override)
    }

    /// Assemble the analytic Jacobian of the residual vector with respect to
    /// the physical unknowns (diagnostics; the solve scales internally).
    pub fn jacobian_at(&self, unknowns: &[f64]) -> CycleResult<nalgebra::DMatrix<f64>> {
        let x = self.to_scaled(unknowns)?;
        let xv = DVector::from_vec(x);
        let mut jac = forward_jacobian(&xv, |xd: &[Dual64]| {
            let ev = self
                .eval::<Dual64>(xd)
                .map_err(|e| bc_solver::SolverError::Residual { what: e.to_string() })?;
            let overrides = vec![None; self.balances.len()];
            self.residuals(&ev, &overrides)
                .map_err(|e| bc_solver::SolverError::Residual { what: e.to_string() })
        })?;
        // undo the unknown scaling so columns are per physical unit
        for (j, u) in self.unknowns.iter().enumerate() {
            for i in 0..jac.nrows() {
                jac[(i, j)] /= u.x_ref;
            }
        }
        Ok(jac)
    }

    fn to_scaled(&self, unknowns: &[f64]) -> CycleResult<Vec<f64>> {
        if unknowns.len() != self.unknowns.len() {
            return Err(CycleError::Config {
                what: format!(
                    "expected {} unknowns, got {}",
                    self.unknowns.len(),
                    unknowns.len()
                ),
            });
        }
        Ok(unknowns
            .iter()
            .zip(&self.unknowns)
            .map(|(v, u)| v / u.x_ref)
            .collect())
    }

    /// Solve the model from its configured initial guesses.
    pub fn solve(&self, opts: &SolveOptions) -> CycleResult<CycleSolution> {
        self.solve_impl(None, opts)
    }

    /// Solve the model warm-started from a previous solution.
    ///
    /// Re-solving an already-converged state returns in zero iterations with
    /// unchanged outputs.
    pub fn solve_from(
        &self,
        warm: &CycleSolution,
        opts: &SolveOptions,
    ) -> CycleResult<CycleSolution> {
        self.solve_impl(Some(warm), opts)
    }

    fn solve_impl(
        &self,
        warm: Option<&CycleSolution>,
        opts: &SolveOptions,
    ) -> CycleResult<CycleSolution> {
        let x0 = self.initial_vector(warm);
        let no_override = vec![None; self.balances.len()];

        let residual_fn = |xv: &DVector<f64>| {
            let ev = self
                .eval::<f64>(xv.as_slice())
                .map_err(|e| bc_solver::SolverError::Residual { what: e.to_string() })?;
            let r = self
                .residuals(&ev, &no_override)
                .map_err(|e| bc_solver::SolverError::Residual { what: e.to_string() })?;
            Ok(DVector::from_vec(r))
        };
        let jacobian_fn = |xv: &DVector<f64>| {
            forward_jacobian(xv, |xd: &[Dual64]| {
                let ev = self
                    .eval::<Dual64>(xd)
                    .map_err(|e| bc_solver::SolverError::Residual { what: e.to_string() })?;
                let overrides = vec![None; self.balances.len()];
                self.residuals(&ev, &overrides)
                    .map_err(|e| bc_solver::SolverError::Residual { what: e.to_string() })
            })
        };

        let result = newton_solve(
            x0,
            &self.scaled_bounds(),
            residual_fn,
            jacobian_fn,
            &opts.newton,
        )?;
        debug!(
            iterations = result.iterations,
            residual_norm = result.residual_norm,
            status = ?result.status,
            "cycle solve finished"
        );

        if opts.err_on_non_converge && result.status != SolveStatus::Converged {
            return Err(CycleError::NotConverged {
                residual_norm: result.residual_norm,
                iterations: result.iterations,
            });
        }

        self.snapshot(
            result.x.as_slice(),
            result.iterations,
            result.residual_norm,
            result.status,
        )
    }

    /// Freeze a converged solver state into an f64 solution record.
    pub(crate) fn snapshot(
        &self,
        x: &[f64],
        iterations: usize,
        residual_norm: f64,
        status: SolveStatus,
    ) -> CycleResult<CycleSolution> {
        let ev = self.eval::<f64>(x)?;
        let no_override = vec![None; self.balances.len()];
        let resids = self.residuals(&ev, &no_override)?;

        let unknowns: Vec<(String, f64)> = self
            .unknowns
            .iter()
            .zip(x.iter())
            .map(|(u, xs)| (u.name.clone(), xs * u.x_ref))
            .collect();

        let mut stations = Vec::new();
        for (i, ne) in self.elems.iter().enumerate() {
            if let Some(fs) = &ev.station[i] {
                stations.push(StationRecord::from_state(ne.name.clone(), fs));
            }
            if let Some(fs) = &ev.station2[i] {
                stations.push(StationRecord::from_state(format!("{}.byp", ne.name), fs));
            }
        }

        let mut shafts = Vec::new();
        let mut motors = Vec::new();
        for (i, ne) in self.elems.iter().enumerate() {
            if let Some(s) = &ev.shaft_out[i] {
                shafts.push((
                    ne.name.clone(),
                    ShaftRecord {
                        pwr_net: s.pwr_net,
                        pwr_in: s.pwr_in,
                        pwr_out: s.pwr_out,
                        trq_net: s.trq_net,
                    },
                ));
            }
            if let Some(m) = &ev.motor_out[i] {
                motors.push((
                    ne.name.clone(),
                    MotorRecord {
                        pwr_elec: m.pwr_elec,
                        eff: m.eff,
                        trq: m.trq,
                    },
                ));
            }
        }

        let balance_residuals: Vec<(String, f64)> = self
            .balances
            .iter()
            .map(|b| b.name.clone())
            .chain(
                self.intrinsics
                    .iter()
                    .map(|(i, _)| format!("{}.flow_match", self.elems[*i].name)),
            )
            .zip(resids.iter().copied())
            .collect();

        let calibration = Calibration::extract(self, &ev);

        Ok(CycleSolution {
            unknowns,
            stations,
            shafts,
            motors,
            perf: PerfRecord {
                fg: ev.perf.fg,
                f_ram: ev.perf.f_ram,
                fn_net: ev.perf.fn_net,
                opr: ev.perf.opr,
                tsfc: ev.perf.tsfc,
                psfc: ev.perf.psfc,
                wfuel: self
                    .elems
                    .iter()
                    .enumerate()
                    .filter_map(|(i, _)| ev.wfuel[i])
                    .sum(),
            },
            balance_residuals,
            calibration,
            iterations,
            residual_norm,
            status,
        })
    }
}
