//! Incremental cycle builder with build-time validation.

use crate::balance::{Balance, Param, Probe, Target};
use crate::error::{CycleError, CycleResult};
use crate::model::{CycleModel, IntrinsicKind, NamedElement, UnknownDef};
use bc_core::units::AngularVelocity;
use bc_elements::{CompressorMode, Element, GasSet, ShaftDef, TurbineMode};
use std::collections::{HashMap, HashSet, VecDeque};

/// Declarative cycle description.
///
/// Add named elements, connect flow (producer outlet → consumer inlet),
/// mount rotating elements on shafts, register balances, then [`build`]
/// validates everything and freezes an immutable [`CycleModel`].
///
/// Configuration errors never survive past `build`: dangling names, doubly
/// fed inlets, unmounted rotors, turbines with no pressure-ratio source, flow
/// cycles, and balances whose unknown cannot reach their own residual are
/// all rejected here, before any iteration starts.
///
/// [`build`]: CycleBuilder::build
#[derive(Debug, Default)]
pub struct CycleBuilder {
    gases: Option<GasSet>,
    elems: Vec<NamedElement>,
    links: Vec<(String, u8, String)>,
    cooling: Vec<(String, String, String)>,
    mounts: Vec<(String, String)>,
    shaft_speeds: Vec<(String, f64)>,
    balances: Vec<Balance>,
}

impl CycleBuilder {
    pub fn new(gases: GasSet) -> Self {
        Self {
            gases: Some(gases),
            ..Self::default()
        }
    }

    /// Add a named element.
    pub fn add(&mut self, name: impl Into<String>, elem: Element) -> &mut Self {
        self.elems.push(NamedElement {
            name: name.into(),
            elem,
        });
        self
    }

    /// Add a shaft element with its base mechanical speed.
    pub fn add_shaft(
        &mut self,
        name: impl Into<String>,
        shaft: ShaftDef,
        nmech: AngularVelocity,
    ) -> &mut Self {
        let name = name.into();
        use uom::si::angular_velocity::radian_per_second;
        self.shaft_speeds
            .push((name.clone(), nmech.get::<radian_per_second>()));
        self.add(name, Element::Shaft(shaft))
    }

    /// Connect the primary outlet of `src` to the flow inlet of `dst`.
    pub fn connect(&mut self, src: impl Into<String>, dst: impl Into<String>) -> &mut Self {
        self.links.push((src.into(), 0, dst.into()));
        self
    }

    /// Connect a specific outlet port (0 = primary, 1 = splitter bypass).
    pub fn connect_port(
        &mut self,
        src: impl Into<String>,
        port: u8,
        dst: impl Into<String>,
    ) -> &mut Self {
        self.links.push((src.into(), port, dst.into()));
        self
    }

    /// Route a named bleed offtake into a turbine as cooling supply.
    pub fn connect_cooling(
        &mut self,
        bleed: impl Into<String>,
        port: impl Into<String>,
        turbine: impl Into<String>,
    ) -> &mut Self {
        self.cooling.push((bleed.into(), port.into(), turbine.into()));
        self
    }

    /// Mount a rotating element (compressor, turbine, motor) on a shaft.
    pub fn on_shaft(&mut self, elem: impl Into<String>, shaft: impl Into<String>) -> &mut Self {
        self.mounts.push((elem.into(), shaft.into()));
        self
    }

    /// Register a balance.
    pub fn add_balance(&mut self, balance: Balance) -> &mut Self {
        self.balances.push(balance);
        self
    }

    /// Validate the description and freeze it into a [`CycleModel`].
    pub fn build(self) -> CycleResult<CycleModel> {
        let gases = self.gases.ok_or_else(|| CycleError::Config {
            what: "no gas set configured".to_string(),
        })?;
        let n = self.elems.len();

        // unique names
        let mut name_to_idx: HashMap<&str, usize> = HashMap::new();
        for (i, ne) in self.elems.iter().enumerate() {
            if name_to_idx.insert(ne.name.as_str(), i).is_some() {
                return Err(CycleError::Config {
                    what: format!("duplicate element name '{}'", ne.name),
                });
            }
        }
        let lookup = |name: &str, context: &'static str| -> CycleResult<usize> {
            name_to_idx
                .get(name)
                .copied()
                .ok_or_else(|| CycleError::UnknownElement {
                    name: name.to_string(),
                    context,
                })
        };

        // single flight-conditions element (nozzles need its ambient statics)
        let fc_list: Vec<usize> = self
            .elems
            .iter()
            .enumerate()
            .filter(|(_, ne)| matches!(ne.elem, Element::FlightConditions(_)))
            .map(|(i, _)| i)
            .collect();
        if fc_list.len() > 1 {
            return Err(CycleError::Config {
                what: "a cycle point supports one flight-conditions element".to_string(),
            });
        }
        let fc_idx = fc_list.first().copied();

        // flow links
        let mut inflow: Vec<Option<(usize, u8)>> = vec![None; n];
        let mut outlet_taken: HashSet<(usize, u8)> = HashSet::new();
        for (src, port, dst) in &self.links {
            let si = lookup(src, "flow link source")?;
            let di = lookup(dst, "flow link destination")?;
            if usize::from(*port) >= self.elems[si].elem.n_flow_outlets() {
                return Err(CycleError::Config {
                    what: format!("'{src}' has no outlet port {port}"),
                });
            }
            if !self.elems[di].elem.has_flow_inlet() {
                return Err(CycleError::Config {
                    what: format!("'{dst}' does not accept a flow connection"),
                });
            }
            if inflow[di].is_some() {
                return Err(CycleError::Config {
                    what: format!("'{dst}' is fed by more than one flow link"),
                });
            }
            if !outlet_taken.insert((si, *port)) {
                return Err(CycleError::Config {
                    what: format!("outlet {port} of '{src}' feeds more than one element"),
                });
            }
            inflow[di] = Some((si, *port));
        }
        for (i, ne) in self.elems.iter().enumerate() {
            if ne.elem.has_flow_inlet() && inflow[i].is_none() {
                return Err(CycleError::Config {
                    what: format!("'{}' has no incoming flow link", ne.name),
                });
            }
        }

        // cooling links
        let mut cooling: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
        for (bleed, port, turbine) in &self.cooling {
            let bi = lookup(bleed, "cooling source")?;
            let ti = lookup(turbine, "cooling destination")?;
            let Element::Bleed(b) = &self.elems[bi].elem else {
                return Err(CycleError::UnknownElement {
                    name: bleed.clone(),
                    context: "cooling source must be a bleed",
                });
            };
            let Some(pi) = b.ports.iter().position(|p| p.name == *port) else {
                return Err(CycleError::Config {
                    what: format!("bleed '{bleed}' has no port '{port}'"),
                });
            };
            if !matches!(self.elems[ti].elem, Element::Turbine(_)) {
                return Err(CycleError::UnknownElement {
                    name: turbine.clone(),
                    context: "cooling destination must be a turbine",
                });
            }
            cooling[ti].push((bi, pi));
        }

        // shaft mounts and speeds
        let mut shaft_of: Vec<Option<usize>> = vec![None; n];
        for (elem, shaft) in &self.mounts {
            let ei = lookup(elem, "shaft mount")?;
            let si = lookup(shaft, "shaft")?;
            if !self.elems[ei].elem.is_rotating() {
                return Err(CycleError::Config {
                    what: format!("'{elem}' is not a rotating element"),
                });
            }
            if !matches!(self.elems[si].elem, Element::Shaft(_)) {
                return Err(CycleError::UnknownElement {
                    name: shaft.clone(),
                    context: "shaft mount target",
                });
            }
            if shaft_of[ei].is_some() {
                return Err(CycleError::Config {
                    what: format!("'{elem}' is mounted on more than one shaft"),
                });
            }
            shaft_of[ei] = Some(si);
        }
        for (i, ne) in self.elems.iter().enumerate() {
            if ne.elem.is_rotating() && shaft_of[i].is_none() {
                return Err(CycleError::Config {
                    what: format!("rotating element '{}' is not mounted on a shaft", ne.name),
                });
            }
        }
        let mut shaft_speed = vec![0.0; n];
        for (i, ne) in self.elems.iter().enumerate() {
            if matches!(ne.elem, Element::Shaft(_)) {
                let speed = self
                    .shaft_speeds
                    .iter()
                    .find(|(name, _)| *name == ne.name)
                    .map(|(_, v)| *v)
                    .ok_or_else(|| CycleError::Config {
                        what: format!("shaft '{}' has no base speed", ne.name),
                    })?;
                if !speed.is_finite() || speed <= 0.0 {
                    return Err(CycleError::Config {
                        what: format!("shaft '{}' speed must be positive", ne.name),
                    });
                }
                shaft_speed[i] = speed;
            }
        }

        // user balances -> unknowns + routing
        let mut unknowns = Vec::new();
        let mut w_unknown = None;
        let mut far_unknown = HashMap::new();
        let mut pr_unknown = HashMap::new();
        let mut speed_unknown = HashMap::new();
        let mut bpr_unknown = HashMap::new();
        for (ui, b) in self.balances.iter().enumerate() {
            let claimed = match &b.unknown {
                Param::MassFlow => {
                    let _ = fc_idx.ok_or_else(|| CycleError::Config {
                        what: format!(
                            "balance '{}' frees mass flow but there is no flight-conditions element",
                            b.name
                        ),
                    })?;
                    w_unknown.replace(ui).is_some()
                }
                Param::Far(name) => {
                    let i = lookup(name, "FAR balance")?;
                    if !matches!(self.elems[i].elem, Element::Burner(_)) {
                        return Err(CycleError::UnknownElement {
                            name: name.clone(),
                            context: "FAR balance target must be a burner",
                        });
                    }
                    far_unknown.insert(i, ui).is_some()
                }
                Param::TurbinePr(name) => {
                    let i = lookup(name, "turbine PR balance")?;
                    let Element::Turbine(t) = &self.elems[i].elem else {
                        return Err(CycleError::UnknownElement {
                            name: name.clone(),
                            context: "PR balance target must be a turbine",
                        });
                    };
                    if matches!(t.mode, TurbineMode::OffDesign { .. }) {
                        return Err(CycleError::Config {
                            what: format!(
                                "off-design turbine '{name}' owns its PR; balance '{}' conflicts",
                                b.name
                            ),
                        });
                    }
                    pr_unknown.insert(i, ui).is_some()
                }
                Param::ShaftSpeed(name) => {
                    let i = lookup(name, "shaft speed balance")?;
                    if !matches!(self.elems[i].elem, Element::Shaft(_)) {
                        return Err(CycleError::UnknownElement {
                            name: name.clone(),
                            context: "speed balance target must be a shaft",
                        });
                    }
                    speed_unknown.insert(i, ui).is_some()
                }
                Param::Bpr(name) => {
                    let i = lookup(name, "BPR balance")?;
                    if !matches!(self.elems[i].elem, Element::Splitter(_)) {
                        return Err(CycleError::UnknownElement {
                            name: name.clone(),
                            context: "BPR balance target must be a splitter",
                        });
                    }
                    bpr_unknown.insert(i, ui).is_some()
                }
            };
            if claimed {
                return Err(CycleError::Config {
                    what: format!("two balances drive the same unknown ('{}')", b.name),
                });
            }
            unknowns.push(UnknownDef {
                name: b.name.clone(),
                init: b.init,
                lower: b.lower,
                upper: b.upper,
                x_ref: b.init.abs().max(1e-6),
            });
        }

        // element-intrinsic unknowns (off-design flow matching)
        let mut intrinsics = Vec::new();
        let mut beta_unknown = HashMap::new();
        let mut prx_unknown = HashMap::new();
        for (i, ne) in self.elems.iter().enumerate() {
            match &ne.elem {
                Element::Compressor(c) => {
                    if let CompressorMode::OffDesign { .. } = c.mode {
                        let (_, beta0) = c.map.design_coords();
                        let (blo, bhi) = c.map.beta_range();
                        beta_unknown.insert(i, unknowns.len());
                        intrinsics.push((i, IntrinsicKind::CompBeta));
                        unknowns.push(UnknownDef {
                            name: format!("{}.beta", ne.name),
                            init: beta0,
                            lower: blo,
                            upper: bhi,
                            x_ref: beta0.abs().max(1e-6),
                        });
                    }
                }
                Element::Turbine(t) => {
                    if let TurbineMode::OffDesign { scalars, .. } = &t.mode {
                        let (_, prn_hi) = t.map.prn_range();
                        let pr0 = 1.0 + scalars.s_pr * t.map.design_coords().1;
                        prx_unknown.insert(i, unknowns.len());
                        intrinsics.push((i, IntrinsicKind::TurbPr));
                        unknowns.push(UnknownDef {
                            name: format!("{}.pr", ne.name),
                            init: pr0,
                            lower: 1.001,
                            upper: 1.0 + scalars.s_pr * prn_hi * 1.5,
                            x_ref: pr0.abs().max(1e-6),
                        });
                    } else if !pr_unknown.contains_key(&i) {
                        return Err(CycleError::Config {
                            what: format!(
                                "design turbine '{}' needs a pressure-ratio balance",
                                ne.name
                            ),
                        });
                    }
                }
                _ => {}
            }
        }

        // dependency edges for ordering and influence analysis
        let mut edges: Vec<(usize, usize)> = Vec::new();
        for (i, f) in inflow.iter().enumerate() {
            if let Some((src, _)) = f {
                edges.push((*src, i));
            }
        }
        for (ti, list) in cooling.iter().enumerate() {
            for (bi, _) in list {
                edges.push((*bi, ti));
            }
        }
        for (i, s) in shaft_of.iter().enumerate() {
            if let Some(si) = s {
                edges.push((i, *si));
            }
        }
        if let Some(fc) = fc_idx {
            for (i, ne) in self.elems.iter().enumerate() {
                if matches!(ne.elem, Element::Nozzle(_)) && i != fc {
                    edges.push((fc, i));
                }
            }
        }

        let order = topo_sort(n, &edges).ok_or_else(|| CycleError::Config {
            what: "flow graph contains a cycle".to_string(),
        })?;

        let model = CycleModel {
            gases,
            elems: self.elems,
            order,
            inflow,
            cooling,
            shaft_of,
            shaft_speed,
            fc_idx,
            balances: self.balances,
            unknowns,
            intrinsics,
            w_unknown,
            far_unknown,
            pr_unknown,
            speed_unknown,
            bpr_unknown,
            beta_unknown,
            prx_unknown,
        };

        check_influence(&model, &edges)?;
        Ok(model)
    }
}

/// Kahn's algorithm; `None` if the graph has a cycle.
fn topo_sort(n: usize, edges: &[(usize, usize)]) -> Option<Vec<usize>> {
    let mut indeg = vec![0usize; n];
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];
    for &(a, b) in edges {
        adj[a].push(b);
        indeg[b] += 1;
    }
    let mut queue: VecDeque<usize> = (0..n).filter(|&i| indeg[i] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(i) = queue.pop_front() {
        order.push(i);
        for &j in &adj[i] {
            indeg[j] -= 1;
            if indeg[j] == 0 {
                queue.push_back(j);
            }
        }
    }
    (order.len() == n).then_some(order)
}

/// Verify every user balance's unknown can reach its own residual through
/// the element graph; a disconnected pair makes the Jacobian structurally
/// singular and is far easier to diagnose here than mid-iteration.
fn check_influence(model: &CycleModel, edges: &[(usize, usize)]) -> CycleResult<()> {
    let n = model.elems.len();
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];
    for &(a, b) in edges {
        adj[a].push(b);
    }

    let reachable = |seeds: Vec<usize>| -> HashSet<usize> {
        let mut seen: HashSet<usize> = seeds.iter().copied().collect();
        let mut stack = seeds;
        while let Some(i) = stack.pop() {
            for &j in &adj[i] {
                if seen.insert(j) {
                    stack.push(j);
                }
            }
        }
        seen
    };

    for b in &model.balances {
        let seeds: Vec<usize> = match &b.unknown {
            Param::MassFlow => model.fc_idx.into_iter().collect(),
            Param::Far(name) | Param::TurbinePr(name) | Param::Bpr(name) => {
                model.idx_of(name).into_iter().collect()
            }
            Param::ShaftSpeed(name) => {
                let si = model.idx_of(name);
                model
                    .shaft_of
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| **s == si)
                    .map(|(i, _)| i)
                    .chain(si)
                    .collect()
            }
        };
        let closure = reachable(seeds);

        let mut targets: Vec<usize> = probe_targets(model, &b.lhs);
        if let Target::Probe(p) = &b.rhs {
            targets.extend(probe_targets(model, p));
        }
        if !targets.iter().any(|t| closure.contains(t)) {
            return Err(CycleError::NoInfluence {
                balance: b.name.clone(),
            });
        }
    }
    Ok(())
}

fn probe_targets(model: &CycleModel, p: &Probe) -> Vec<usize> {
    match p {
        Probe::NetThrust => model
            .elems
            .iter()
            .enumerate()
            .filter(|(_, ne)| {
                matches!(ne.elem, Element::Nozzle(_)) || matches!(ne.elem, Element::Inlet(_))
            })
            .map(|(i, _)| i)
            .collect(),
        Probe::GrossThrust => model
            .elems
            .iter()
            .enumerate()
            .filter(|(_, ne)| matches!(ne.elem, Element::Nozzle(_)))
            .map(|(i, _)| i)
            .collect(),
        Probe::TotalT(name)
        | Probe::TotalP(name)
        | Probe::MassFlowAt(name)
        | Probe::ShaftNetPower(name)
        | Probe::NozzleThroatArea(name)
        | Probe::NozzlePr(name) => model.idx_of(name).into_iter().collect(),
    }
}
