//! One-shot run: load, build, solve once, then present.

use std::path::PathBuf;

use tracing::info;

use crate::config::ScenarioConfig;
use crate::error::Error;
use crate::io::export::export_setpoints_csv;
use crate::io::web_service::export_json;
use crate::manager::EnergyManager;
use crate::plot::{self, PlotSeries};
use crate::profiles::ProfileSet;
use crate::scenario::{Scenario, build_scenario};
use crate::solver::{Setpoints, Solver, SolverInfo, solve_control_problem};
use crate::summary::SetpointSummary;

/// Presentation selected at invocation. Modes combine freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RunMode {
    /// Terminal chart of the solved horizon.
    Plot,
    /// Web-service JSON payload of the solver inputs.
    Export,
}

/// Inputs and outputs of a run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config_path: PathBuf,
    pub profiles_path: PathBuf,
    /// Scenario constants; built-in defaults when absent.
    pub scenario_path: Option<PathBuf>,
    pub export_path: PathBuf,
    pub modes: Vec<RunMode>,
    pub setpoints_out: Option<PathBuf>,
}

impl RunOptions {
    pub fn has_mode(&self, mode: RunMode) -> bool {
        self.modes.contains(&mode)
    }
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub manager: EnergyManager,
    pub scenario: Scenario,
    pub setpoints: Setpoints,
    pub solver_info: SolverInfo,
    pub summary: SetpointSummary,
}

/// Loads the solver context, the profiles and the scenario constants.
///
/// # Errors
///
/// Returns `Error::Config` or `Error::Data` if an input cannot be loaded.
pub fn load_inputs(
    options: &RunOptions,
) -> Result<(EnergyManager, ProfileSet, ScenarioConfig), Error> {
    let manager = EnergyManager::from_toml_file(&options.config_path)?;
    let profiles = ProfileSet::from_csv_path(&options.profiles_path)?;
    let scenario = match &options.scenario_path {
        Some(path) => {
            let cfg = ScenarioConfig::from_toml_file(path)?;
            info!(path = %path.display(), "loaded scenario constants");
            cfg
        }
        None => ScenarioConfig::default(),
    };
    Ok((manager, profiles, scenario))
}

/// Runs the pipeline once with `solver`.
///
/// Setpoints CSV, plot and export are written in that order; the first
/// failure stops the run.
///
/// # Errors
///
/// Returns the first `Error` raised by any stage.
pub fn run(solver: &impl Solver, options: &RunOptions) -> Result<RunReport, Error> {
    let (mut manager, profiles, scenario_cfg) = load_inputs(options)?;
    let scenario = build_scenario(&manager, &profiles, &scenario_cfg)?;

    let instant = scenario.measures.instant;
    let (setpoints, solver_info) = solve_control_problem(
        solver,
        instant,
        &scenario.measures,
        &scenario.forecasts,
        &mut manager,
    )?;

    let summary = SetpointSummary::from_setpoints(
        &setpoints,
        &scenario.forecasts,
        scenario.measures.non_coincidental_threshold,
        manager.control_params().dt_hours(),
    );

    if let Some(path) = &options.setpoints_out {
        export_setpoints_csv(&setpoints, path)?;
    }
    if options.has_mode(RunMode::Plot) {
        let series = PlotSeries::new(&setpoints, &scenario.forecasts, &scenario.measures, &manager);
        plot::show(&series)?;
    }
    if options.has_mode(RunMode::Export) {
        export_json(
            &options.export_path,
            &manager,
            &scenario.measures,
            &scenario.forecasts,
        )?;
    }

    Ok(RunReport {
        manager,
        scenario,
        setpoints,
        solver_info,
        summary,
    })
}
