//! Converged-solution records (f64 snapshots of a solve).

use crate::calibration::Calibration;
use bc_elements::FlowState;
use bc_solver::SolveStatus;

/// One flow station, frozen to plain numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct StationRecord {
    pub name: String,
    /// Total temperature [K]
    pub tt: f64,
    /// Total pressure [Pa]
    pub pt: f64,
    /// Total specific enthalpy [J/kg]
    pub ht: f64,
    /// Specific entropy [J/(kg·K)]
    pub s: f64,
    /// Mass flow [kg/s]
    pub w: f64,
    /// Fuel-air ratio
    pub far: f64,
    /// Static temperature [K]
    pub ts: f64,
    /// Static pressure [Pa]
    pub ps: f64,
    /// Mach number
    pub mn: f64,
    /// Velocity [m/s]
    pub v: f64,
    /// Flow area [m²]
    pub area: f64,
}

impl StationRecord {
    pub(crate) fn from_state(name: String, fs: &FlowState<f64>) -> Self {
        Self {
            name,
            tt: fs.tot.t,
            pt: fs.tot.p,
            ht: fs.tot.h,
            s: fs.tot.s,
            w: fs.w,
            far: fs.far,
            ts: fs.stat.t,
            ps: fs.stat.p,
            mn: fs.stat.mn,
            v: fs.stat.v,
            area: fs.stat.area,
        }
    }
}

/// Engine-level performance record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerfRecord {
    /// Gross thrust [N]
    pub fg: f64,
    /// Ram drag [N]
    pub f_ram: f64,
    /// Net thrust [N]
    pub fn_net: f64,
    /// Overall pressure ratio
    pub opr: f64,
    /// Thrust-specific fuel consumption [kg/(N·s)]
    pub tsfc: f64,
    /// Power-specific fuel consumption [kg/J]
    pub psfc: f64,
    /// Total fuel flow [kg/s]
    pub wfuel: f64,
}

/// Shaft bookkeeping record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaftRecord {
    pub pwr_net: f64,
    pub pwr_in: f64,
    pub pwr_out: f64,
    pub trq_net: f64,
}

/// Electric drive record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorRecord {
    /// Electrical input power [W]
    pub pwr_elec: f64,
    /// Drive efficiency at the operating point
    pub eff: f64,
    /// Torque delivered to the shaft [N·m]
    pub trq: f64,
}

/// Result of one cycle solve: every station, the converged unknowns, the
/// performance roll-up, the design calibration, and solver diagnostics.
#[derive(Debug, Clone)]
pub struct CycleSolution {
    /// Converged unknowns as (name, physical value) in registration order
    pub unknowns: Vec<(String, f64)>,
    pub stations: Vec<StationRecord>,
    pub shafts: Vec<(String, ShaftRecord)>,
    pub motors: Vec<(String, MotorRecord)>,
    pub perf: PerfRecord,
    /// Normalized residual of every balance (user balances, then intrinsic
    /// flow matches) at the returned state
    pub balance_residuals: Vec<(String, f64)>,
    /// Design calibration pack (map scalars, frozen areas)
    pub calibration: Calibration,
    pub iterations: usize,
    pub residual_norm: f64,
    pub status: SolveStatus,
}

impl CycleSolution {
    pub fn converged(&self) -> bool {
        self.status == SolveStatus::Converged
    }

    /// Station record by element name (`name.byp` for splitter bypass legs).
    pub fn station(&self, name: &str) -> Option<&StationRecord> {
        self.stations.iter().find(|s| s.name == name)
    }

    /// Converged unknown by balance name.
    pub fn unknown(&self, name: &str) -> Option<f64> {
        self.unknowns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    /// Motor record by element name.
    pub fn motor(&self, name: &str) -> Option<&MotorRecord> {
        self.motors
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, m)| m)
    }
}
