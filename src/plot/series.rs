//! Chart series derived from one solve, independent of any terminal.

use crate::forecast::Forecasts;
use crate::manager::EnergyManager;
use crate::measure::Measures;
use crate::solver::Setpoints;
use crate::table::DATETIME_FORMAT;

/// `(step, value)` points, the shape ratatui datasets take.
pub type Points = Vec<(f64, f64)>;

/// Every line drawn by the plot, indexed by step number.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    /// Timestamp of the first step.
    pub first_label: String,
    /// Timestamp of the last step.
    pub last_label: String,
    /// Grid exchange (kW).
    pub grid: Points,
    /// Building load (kW).
    pub building: Points,
    /// PV production (kW, negative).
    pub pv: Points,
    /// Battery power (kW).
    pub battery: Points,
    /// Building load plus delivered PV (kW).
    pub net_load: Points,
    /// Battery SOC (%).
    pub soc: Points,
    /// Hourly buy price reconstructed from the contract model.
    pub buy_price: Points,
    /// Non-coincidental demand threshold (kW).
    pub threshold_kw: f64,
}

fn points(values: impl IntoIterator<Item = f64>) -> Points {
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| (i as f64, v))
        .collect()
}

impl PlotSeries {
    /// Collects the plotted lines.
    ///
    /// The price row reads the manager's contract model, so it is filled only
    /// after the solver adapter has loaded the tariff.
    pub fn new(
        setpoints: &Setpoints,
        forecasts: &Forecasts,
        measures: &Measures,
        manager: &EnergyManager,
    ) -> Self {
        let per_hour = 3600.0 / f64::from(manager.control_params().sample_period);
        let label = |t: Option<chrono::NaiveDateTime>| {
            t.map(|t| t.format(DATETIME_FORMAT).to_string())
                .unwrap_or_default()
        };

        Self {
            first_label: label(setpoints.index().get(0)),
            last_label: label(setpoints.index().last()),
            grid: points(setpoints.grid_power().iter().copied()),
            building: points(forecasts.building_power().iter().copied()),
            pv: points(setpoints.pv_power_produced().iter().copied()),
            battery: points(setpoints.battery_power().iter().copied()),
            net_load: points(
                forecasts
                    .building_power()
                    .iter()
                    .zip(setpoints.pv_power_produced())
                    .map(|(b, p)| b + p),
            ),
            soc: points(setpoints.battery_soc().iter().map(|s| s * 100.0)),
            buy_price: points(
                manager
                    .contract()
                    .tou_price_buy()
                    .iter()
                    .map(|p| p * per_hour),
            ),
            threshold_kw: measures.non_coincidental_threshold,
        }
    }

    /// Last step number, at least 1 so axes never collapse.
    pub fn x_max(&self) -> f64 {
        self.grid.last().map_or(1.0, |p| p.0).max(1.0)
    }

    /// Horizontal line at `y` spanning the x axis.
    pub fn hline(&self, y: f64) -> Points {
        vec![(0.0, y), (self.x_max(), y)]
    }
}
