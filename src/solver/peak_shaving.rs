//! Built-in rule-based solver: battery peak shaving against the
//! non-coincidental demand threshold with cheap-hour charging.

use chrono::NaiveDateTime;

use super::{Setpoints, SolveStatus, Solver, SolverInfo, THRESHOLD_TOLERANCE_KW};
use crate::devices::Battery;
use crate::error::SolverError;
use crate::forecast::Forecasts;
use crate::manager::EnergyManager;
use crate::measure::Measures;

/// Tolerance when comparing prices.
const EPS: f64 = 1e-9;

/// Greedy peak-shaving dispatcher.
///
/// Per step, with `net = building + pv`:
/// - above the threshold, discharge by `net - threshold`;
/// - below zero (PV surplus), absorb the surplus;
/// - in the cheapest-price steps of the horizon, charge up to the threshold;
/// - otherwise idle.
///
/// Battery limits come from the manager's storage model. When export is
/// disallowed, PV is curtailed so the grid never goes negative.
#[derive(Debug, Default, Clone, Copy)]
pub struct PeakShavingSolver;

impl PeakShavingSolver {
    pub const NAME: &'static str = "peak-shaving";

    /// Battery setpoint for one step before storage limits are applied.
    ///
    /// Feeder model: `grid_kw = net_kw + battery_kw`.
    pub fn battery_setpoint_kw(net_kw: f64, threshold_kw: f64, is_cheapest: bool) -> f64 {
        if net_kw > threshold_kw {
            threshold_kw - net_kw
        } else if net_kw < 0.0 {
            -net_kw
        } else if is_cheapest {
            threshold_kw - net_kw
        } else {
            0.0
        }
    }
}

impl Solver for PeakShavingSolver {
    fn solve(
        &self,
        _instant: NaiveDateTime,
        measures: &Measures,
        forecasts: &Forecasts,
        manager: &EnergyManager,
    ) -> Result<(Setpoints, SolverInfo), SolverError> {
        let threshold = measures.non_coincidental_threshold;
        if !(threshold >= 0.0) {
            return Err(SolverError::Infeasible(format!(
                "demand threshold {threshold} kW is negative"
            )));
        }

        let dt_hours = manager.control_params().dt_hours();
        let mut battery = Battery::new(manager.battery(), measures.battery_soc, dt_hours);
        let allow_export = manager.grid().allow_export;
        let cheapest = forecasts
            .buy_price()
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);

        let n = forecasts.len();
        let mut grid_power = Vec::with_capacity(n);
        let mut pv_power_produced = Vec::with_capacity(n);
        let mut battery_power = Vec::with_capacity(n);
        let mut battery_soc = Vec::with_capacity(n);
        let mut exceeded = 0_usize;

        for i in 0..n {
            let building = forecasts.building_power()[i];
            let mut pv = forecasts.pv_power()[i];
            let net = building + pv;
            let is_cheapest = forecasts.buy_price()[i] <= cheapest + EPS;

            let setpoint = Self::battery_setpoint_kw(net, threshold, is_cheapest);
            let actual = battery.apply(setpoint);
            let mut grid = net + actual;

            if !allow_export && grid < 0.0 {
                // curtail PV so the surplus stays on site
                pv = (pv - grid).min(0.0);
                grid = building + pv + actual;
            }
            if grid > threshold + THRESHOLD_TOLERANCE_KW {
                exceeded += 1;
            }

            grid_power.push(grid);
            pv_power_produced.push(pv);
            battery_power.push(actual);
            battery_soc.push(battery.soc);
        }

        let setpoints = Setpoints::new(
            *forecasts.index(),
            grid_power,
            pv_power_produced,
            battery_power,
            battery_soc,
        )?;
        let status = if exceeded == 0 {
            SolveStatus::Solved
        } else {
            SolveStatus::ThresholdExceeded { steps: exceeded }
        };
        Ok((setpoints, SolverInfo::new(Self::NAME, status)))
    }
}
