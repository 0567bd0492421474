//! Solver boundary: the capability trait, its output types, and the adapter
//! that guards every call.

mod peak_shaving;

use std::fmt;
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::error::SolverError;
use crate::forecast::Forecasts;
use crate::manager::EnergyManager;
use crate::measure::Measures;
use crate::table::TimeIndex;

pub use peak_shaving::PeakShavingSolver;

/// Grid import counts as over the demand threshold only beyond this margin (kW).
pub const THRESHOLD_TOLERANCE_KW: f64 = 1e-9;

/// Solver output table, indexed like the forecasts.
#[derive(Debug, Clone, PartialEq)]
pub struct Setpoints {
    index: TimeIndex,
    grid_power: Vec<f64>,
    pv_power_produced: Vec<f64>,
    battery_power: Vec<f64>,
    battery_soc: Vec<f64>,
}

impl Setpoints {
    /// Assembles a setpoints table.
    ///
    /// # Errors
    ///
    /// Returns `SolverError::Postcondition` if a column does not fill the index.
    pub fn new(
        index: TimeIndex,
        grid_power: Vec<f64>,
        pv_power_produced: Vec<f64>,
        battery_power: Vec<f64>,
        battery_soc: Vec<f64>,
    ) -> Result<Self, SolverError> {
        for (column, len) in [
            ("energy_hub_elec_ext_power", grid_power.len()),
            ("energy_hub_pv_power_produced", pv_power_produced.len()),
            ("energy_hub_battery_power", battery_power.len()),
            ("energy_hub_battery_soc", battery_soc.len()),
        ] {
            if len != index.len() {
                return Err(SolverError::Postcondition(format!(
                    "column {column} has {len} values for {} rows",
                    index.len()
                )));
            }
        }
        Ok(Self {
            index,
            grid_power,
            pv_power_produced,
            battery_power,
            battery_soc,
        })
    }

    pub fn index(&self) -> &TimeIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Grid exchange power (kW, positive = import).
    pub fn grid_power(&self) -> &[f64] {
        &self.grid_power
    }

    /// PV power delivered (kW, negative = generation).
    pub fn pv_power_produced(&self) -> &[f64] {
        &self.pv_power_produced
    }

    /// Battery power (kW, positive = charging).
    pub fn battery_power(&self) -> &[f64] {
        &self.battery_power
    }

    /// Battery SOC after each step (fraction).
    pub fn battery_soc(&self) -> &[f64] {
        &self.battery_soc
    }
}

/// Outcome reported by a solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// All constraints met.
    Solved,
    /// Feasible, but grid import exceeds the demand threshold in `steps` steps.
    ThresholdExceeded { steps: usize },
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solved => f.write_str("solved"),
            Self::ThresholdExceeded { steps } => write!(f, "threshold exceeded in {steps} steps"),
        }
    }
}

/// Solver diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverInfo {
    /// Name of the solver that produced the setpoints.
    pub solver: &'static str,
    pub status: SolveStatus,
    /// Wall-clock time of the call, filled in by [`solve_control_problem`].
    pub elapsed: Duration,
}

impl SolverInfo {
    pub fn new(solver: &'static str, status: SolveStatus) -> Self {
        Self {
            solver,
            status,
            elapsed: Duration::ZERO,
        }
    }
}

/// Energy-management solver capability.
///
/// Implementations receive validated inputs: `measures` is at `instant`, and
/// `forecasts` covers the configured horizon at the configured sample
/// period starting at `instant`. The manager's contract model is loaded.
pub trait Solver {
    /// Computes setpoints over the forecast horizon.
    ///
    /// # Errors
    ///
    /// Returns `SolverError` if the problem cannot be solved.
    fn solve(
        &self,
        instant: NaiveDateTime,
        measures: &Measures,
        forecasts: &Forecasts,
        manager: &EnergyManager,
    ) -> Result<(Setpoints, SolverInfo), SolverError>;
}

/// Validates the call contract, loads the contract model and runs `solver` once.
///
/// There is no retry and no fallback: any solver error is returned as is.
///
/// # Errors
///
/// Returns `SolverError` on a precondition violation (nothing is passed to the
/// solver), a solver failure, or setpoints that do not match the forecast index.
pub fn solve_control_problem(
    solver: &impl Solver,
    instant: NaiveDateTime,
    measures: &Measures,
    forecasts: &Forecasts,
    manager: &mut EnergyManager,
) -> Result<(Setpoints, SolverInfo), SolverError> {
    check_preconditions(instant, measures, forecasts, manager)?;

    let control = *manager.control_params();
    manager.contract_mut().load_tou_prices(forecasts, &control);

    let start = Instant::now();
    let (setpoints, mut solver_info) = solver.solve(instant, measures, forecasts, manager)?;
    solver_info.elapsed = start.elapsed();

    if setpoints.index() != forecasts.index() {
        return Err(SolverError::Postcondition(format!(
            "setpoints index {:?} differs from forecasts index {:?}",
            setpoints.index(),
            forecasts.index()
        )));
    }

    info!(
        solver = solver_info.solver,
        status = %solver_info.status,
        elapsed_ms = solver_info.elapsed.as_secs_f64() * 1000.0,
        "solved control problem"
    );
    if let SolveStatus::ThresholdExceeded { steps } = solver_info.status {
        warn!(steps, "grid import exceeds the demand threshold");
    }

    Ok((setpoints, solver_info))
}

fn check_preconditions(
    instant: NaiveDateTime,
    measures: &Measures,
    forecasts: &Forecasts,
    manager: &EnergyManager,
) -> Result<(), SolverError> {
    let control = manager.control_params();

    if measures.instant != instant {
        return Err(SolverError::MeasuresInstant {
            expected: instant,
            actual: measures.instant,
        });
    }
    if forecasts.index().start() != instant {
        return Err(SolverError::ForecastStart {
            expected: instant,
            actual: forecasts.index().start(),
        });
    }
    if forecasts.len() != control.nbr_time_step {
        return Err(SolverError::Horizon {
            expected: control.nbr_time_step,
            actual: forecasts.len(),
        });
    }
    let spacing_s = forecasts.index().step().num_seconds();
    if spacing_s != i64::from(control.sample_period) {
        return Err(SolverError::Spacing {
            expected_s: i64::from(control.sample_period),
            actual_s: spacing_s,
        });
    }
    Ok(())
}
