//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use ems_microapp::config::ScenarioConfig;
use ems_microapp::error::SolverError;
use ems_microapp::forecast::Forecasts;
use ems_microapp::manager::EnergyManager;
use ems_microapp::measure::Measures;
use ems_microapp::pipeline::{RunMode, RunOptions};
use ems_microapp::profiles::ProfileSet;
use ems_microapp::scenario::{Scenario, build_scenario};
use ems_microapp::solver::{Setpoints, SolveStatus, Solver, SolverInfo};

/// Path of a file under `data/microapp/`.
pub fn data_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("data/microapp")
        .join(name)
}

/// 2018-04-01 00:00:00.
pub fn reference_instant() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2018, 4, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Shipped microapp configuration (900 s, 96 steps).
pub fn microapp_manager() -> EnergyManager {
    EnergyManager::from_toml_file(&data_path("config_microapp.toml"))
        .unwrap_or_else(|e| panic!("shipped config should load: {e}"))
}

/// Shipped load and PV profiles.
pub fn microapp_profiles() -> ProfileSet {
    ProfileSet::from_csv_path(&data_path("load_pv_microapp.csv"))
        .unwrap_or_else(|e| panic!("shipped profiles should load: {e}"))
}

/// Reference scenario built from the shipped inputs and default constants.
pub fn microapp_scenario(manager: &EnergyManager) -> Scenario {
    build_scenario(manager, &microapp_profiles(), &ScenarioConfig::default())
        .unwrap_or_else(|e| panic!("reference scenario should build: {e}"))
}

/// Run options over the shipped inputs, writing outputs into `out_dir`.
pub fn run_options(out_dir: &Path, modes: Vec<RunMode>) -> RunOptions {
    RunOptions {
        config_path: data_path("config_microapp.toml"),
        profiles_path: data_path("load_pv_microapp.csv"),
        scenario_path: None,
        export_path: out_dir.join("web/efoc_microapp.json"),
        modes,
        setpoints_out: None,
    }
}

/// Solver double: grid covers building plus PV, battery idle.
///
/// Counts calls and records the contract prices it was handed.
#[derive(Default)]
pub struct PassThroughSolver {
    pub calls: Cell<usize>,
    pub seen_prices: RefCell<Vec<f64>>,
}

impl Solver for PassThroughSolver {
    fn solve(
        &self,
        _instant: NaiveDateTime,
        measures: &Measures,
        forecasts: &Forecasts,
        manager: &EnergyManager,
    ) -> Result<(Setpoints, SolverInfo), SolverError> {
        self.calls.set(self.calls.get() + 1);
        self.seen_prices
            .replace(manager.contract().tou_price_buy().to_vec());

        let n = forecasts.len();
        let grid = forecasts
            .building_power()
            .iter()
            .zip(forecasts.pv_power())
            .map(|(b, p)| b + p)
            .collect();
        let setpoints = Setpoints::new(
            *forecasts.index(),
            grid,
            forecasts.pv_power().to_vec(),
            vec![0.0; n],
            vec![measures.battery_soc; n],
        )?;
        Ok((setpoints, SolverInfo::new("pass-through", SolveStatus::Solved)))
    }
}

/// Solver double that always fails.
pub struct FailingSolver;

impl Solver for FailingSolver {
    fn solve(
        &self,
        _instant: NaiveDateTime,
        _measures: &Measures,
        _forecasts: &Forecasts,
        _manager: &EnergyManager,
    ) -> Result<(Setpoints, SolverInfo), SolverError> {
        Err(SolverError::Infeasible("no feasible dispatch".to_string()))
    }
}
