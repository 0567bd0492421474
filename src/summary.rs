//! Post-hoc summary of a solved horizon.

use std::fmt;

use crate::forecast::Forecasts;
use crate::solver::{Setpoints, THRESHOLD_TOLERANCE_KW};

/// Aggregate indicators derived from the setpoints of one solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SetpointSummary {
    /// Number of steps in the horizon.
    pub steps: usize,
    /// Peak grid import power (kW, positive).
    pub peak_import_kw: f64,
    /// Peak grid export power (kW, positive magnitude).
    pub peak_export_kw: f64,
    /// Steps where grid import exceeds the demand threshold.
    pub threshold_exceedances: usize,
    /// Energy imported from the grid (kWh).
    pub imported_kwh: f64,
    /// Cost of the imported energy at the buy price.
    pub buy_cost: f64,
    /// Total battery energy throughput (kWh, sum of |power| * dt).
    pub battery_throughput_kwh: f64,
    /// Battery SOC at the end of the horizon.
    pub final_soc: f64,
}

impl SetpointSummary {
    /// Computes the summary.
    ///
    /// `forecasts` supplies the hourly buy price per step; both tables share
    /// one index.
    pub fn from_setpoints(
        setpoints: &Setpoints,
        forecasts: &Forecasts,
        threshold_kw: f64,
        dt_hours: f64,
    ) -> Self {
        let mut peak_import = 0.0_f64;
        let mut peak_export = 0.0_f64;
        let mut exceedances = 0_usize;
        let mut imported = 0.0_f64;
        let mut cost = 0.0_f64;
        let mut throughput = 0.0_f64;

        for (i, &grid) in setpoints.grid_power().iter().enumerate() {
            peak_import = peak_import.max(grid);
            peak_export = peak_export.max(-grid);
            if grid > threshold_kw + THRESHOLD_TOLERANCE_KW {
                exceedances += 1;
            }

            let import_kwh = grid.max(0.0) * dt_hours;
            imported += import_kwh;
            cost += import_kwh * forecasts.buy_price().get(i).copied().unwrap_or(0.0);
            throughput += setpoints.battery_power()[i].abs() * dt_hours;
        }

        Self {
            steps: setpoints.len(),
            peak_import_kw: peak_import,
            peak_export_kw: peak_export,
            threshold_exceedances: exceedances,
            imported_kwh: imported,
            buy_cost: cost,
            battery_throughput_kwh: throughput,
            final_soc: setpoints.battery_soc().last().copied().unwrap_or(0.0),
        }
    }
}

impl fmt::Display for SetpointSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Setpoint Summary ({} steps) ---", self.steps)?;
        writeln!(f, "Peak import:           {:.2} kW", self.peak_import_kw)?;
        writeln!(f, "Peak export:           {:.2} kW", self.peak_export_kw)?;
        writeln!(f, "Threshold exceedances: {}", self.threshold_exceedances)?;
        writeln!(f, "Imported energy:       {:.2} kWh", self.imported_kwh)?;
        writeln!(f, "Buy cost:              {:.2}", self.buy_cost)?;
        writeln!(
            f,
            "Battery throughput:    {:.2} kWh",
            self.battery_throughput_kwh
        )?;
        write!(f, "Final SOC:             {:.1}%", self.final_soc * 100.0)
    }
}
