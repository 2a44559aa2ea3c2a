//! Balances: implicit equations paired with free unknowns.

/// The model parameter a balance unknown drives.
///
/// Each variant names the element whose input is freed; the same parameter is
/// a fixed configuration value when no balance (and no off-design intrinsic
/// unknown) claims it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// Mass flow entering at the flight-conditions element [kg/s].
    MassFlow,
    /// Fuel-air ratio of the named burner.
    Far(String),
    /// Pressure ratio of the named turbine (design mode only; off-design
    /// turbines own their PR as an intrinsic flow-match unknown).
    TurbinePr(String),
    /// Mechanical speed of the named shaft [rad/s].
    ShaftSpeed(String),
    /// Bypass ratio of the named splitter.
    Bpr(String),
}

/// A scalar quantity probed from a converged (or in-iteration) model state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// Net thrust: gross thrust of all nozzles minus all ram drag [N].
    NetThrust,
    /// Gross thrust of all nozzles [N].
    GrossThrust,
    /// Total temperature at the named element's exit [K].
    TotalT(String),
    /// Total pressure at the named element's exit [Pa].
    TotalP(String),
    /// Mass flow at the named element's exit [kg/s].
    MassFlowAt(String),
    /// Net power on the named shaft [W].
    ShaftNetPower(String),
    /// Throat area of the named nozzle [m²].
    NozzleThroatArea(String),
    /// Pressure ratio Pt/Ps of the named nozzle.
    NozzlePr(String),
}

impl Probe {
    /// Default residual reference scale: the natural magnitude of the probed
    /// quantity, used to normalize residuals to O(1) for the solver.
    pub fn default_ref(&self) -> f64 {
        match self {
            Probe::NetThrust | Probe::GrossThrust => 1.0e4,
            Probe::TotalT(_) => 100.0,
            Probe::TotalP(_) => 1.0e4,
            Probe::MassFlowAt(_) => 10.0,
            Probe::ShaftNetPower(_) => 1.0e6,
            Probe::NozzleThroatArea(_) => 0.1,
            Probe::NozzlePr(_) => 1.0,
        }
    }
}

/// Right-hand side of a balance equation.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// A fixed target value (SI units of the lhs probe).
    Value(f64),
    /// Another probed quantity (drive lhs to match it).
    Probe(Probe),
}

/// One balance: `lhs − rhs = 0`, with `unknown` as the free variable.
///
/// The unknown must influence the residual through the element graph; this
/// is checked at build time (a disconnected pair would make the Jacobian
/// singular).
#[derive(Debug, Clone, PartialEq)]
pub struct Balance {
    pub name: String,
    pub unknown: Param,
    /// Initial guess for the unknown (SI units)
    pub init: f64,
    pub lower: f64,
    pub upper: f64,
    pub lhs: Probe,
    pub rhs: Target,
    /// Residual normalization scale; `None` uses the lhs probe's default
    pub ref_scale: Option<f64>,
}

impl Balance {
    /// Start a balance definition; defaults to unbounded with the probe's
    /// default residual scale. The lhs/rhs must be set before building.
    pub fn new(name: impl Into<String>, unknown: Param, init: f64, lhs: Probe, rhs: Target) -> Self {
        Self {
            name: name.into(),
            unknown,
            init,
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
            lhs,
            rhs,
            ref_scale: None,
        }
    }

    /// Bound the unknown to a closed interval.
    pub fn with_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.lower = lower;
        self.upper = upper;
        self
    }

    /// Override the residual normalization scale.
    pub fn with_ref(mut self, ref_scale: f64) -> Self {
        self.ref_scale = Some(ref_scale);
        self
    }

    /// The effective residual scale.
    pub fn residual_ref(&self) -> f64 {
        self.ref_scale.unwrap_or_else(|| self.lhs.default_ref())
    }
}
